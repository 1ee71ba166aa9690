pub mod github;
pub mod local;
pub mod remote;

pub use github::GitHubFile;
pub use local::LocalLogStore;
pub use remote::{RemoteFile, RemoteLogStore, VersionedFile};

use crate::config::Config;
use crate::error::Result;
use chrono::FixedOffset;
use defect_lookup_common::{capture_timestamp, FeedbackDraft, FeedbackEntry, FeedbackLog};
use std::path::Path;
use std::time::Duration;

/// フィードバックログの保存先
pub enum FeedbackStore {
    Local(LocalLogStore),
    Remote(RemoteLogStore<GitHubFile>),
}

impl FeedbackStore {
    /// 設定から保存先を作る
    ///
    /// `remote` ならGitHub、そうでなければローカルファイル（`path` で上書き可）。
    pub fn from_config(config: &Config, remote: bool, path: Option<&Path>) -> Result<Self> {
        if remote {
            let remote = config.remote()?;
            let file = GitHubFile::new(
                remote,
                config.get_token()?,
                Duration::from_secs(config.timeout_seconds),
            )?;
            Ok(FeedbackStore::Remote(RemoteLogStore::new(
                file,
                config.log_layout,
                remote.max_retries,
                Duration::from_millis(remote.retry_delay_ms),
            )))
        } else {
            let path = path.unwrap_or(config.feedback_path.as_path());
            Ok(FeedbackStore::Local(LocalLogStore::new(path, config.log_layout)))
        }
    }

    pub fn describe(&self) -> String {
        match self {
            FeedbackStore::Local(store) => store.path().display().to_string(),
            FeedbackStore::Remote(store) => store.file().describe(),
        }
    }

    pub async fn read(&self) -> Result<FeedbackLog> {
        match self {
            FeedbackStore::Local(store) => store.read(),
            FeedbackStore::Remote(store) => store.read().await,
        }
    }

    pub async fn append(&self, entry: FeedbackEntry) -> Result<usize> {
        match self {
            FeedbackStore::Local(store) => store.append(entry),
            FeedbackStore::Remote(store) => store.append(entry).await,
        }
    }
}

/// 入力を検証し、提出時刻を付けて追記する
pub async fn submit_feedback(
    store: &FeedbackStore,
    draft: FeedbackDraft,
    offset: Option<FixedOffset>,
) -> Result<FeedbackEntry> {
    let entry = draft.into_entry(capture_timestamp(offset))?;
    let count = store.append(entry.clone()).await?;
    tracing::info!(
        store = %store.describe(),
        setup = %entry.setup_id,
        entries = count,
        "feedback submitted"
    );
    Ok(entry)
}
