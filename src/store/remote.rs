//! バージョン管理付きリモートストアへのフィードバック追記
//!
//! 更新には直前のバージョン参照（blob sha）が必要。
//! 参照が古い場合は Conflict となり、読み込みからやり直す。

use crate::error::{DefectLookupError, Result};
use defect_lookup_common::{parse_csv, write_csv, FeedbackEntry, FeedbackLog, LogLayout};
use std::time::Duration;

/// リモートに保存されたファイル
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteFile {
    pub content: String,
    /// 内容のバージョン参照
    pub sha: String,
    /// リモート側のバイト数
    pub size: u64,
}

/// バージョン付きファイルの読み書き
///
/// `put` は `sha` が現在のバージョンと一致しない場合
/// `DefectLookupError::Conflict` を返すこと。`sha` が `None` なら新規作成。
#[allow(async_fn_in_trait)]
pub trait VersionedFile {
    async fn get(&self) -> Result<Option<RemoteFile>>;
    async fn put(&self, content: &str, sha: Option<&str>, message: &str) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct RemoteLogStore<F> {
    file: F,
    layout: LogLayout,
    max_retries: u32,
    retry_delay: Duration,
}

impl<F: VersionedFile> RemoteLogStore<F> {
    pub fn new(file: F, layout: LogLayout, max_retries: u32, retry_delay: Duration) -> Self {
        Self {
            file,
            layout,
            max_retries,
            retry_delay,
        }
    }

    pub fn file(&self) -> &F {
        &self.file
    }

    pub async fn read(&self) -> Result<FeedbackLog> {
        let current = self.file.get().await?;
        self.decode(current.as_ref())
    }

    /// 取得内容をログに戻す
    ///
    /// 内容が `size` と一致しない（本文が返らなかった）場合は空扱いせずエラー。
    fn decode(&self, file: Option<&RemoteFile>) -> Result<FeedbackLog> {
        let Some(file) = file else {
            return Ok(FeedbackLog::new());
        };
        if file.content.len() as u64 != file.size {
            return Err(DefectLookupError::Remote(format!(
                "remote log content incomplete: expected {} bytes, got {}",
                file.size,
                file.content.len()
            )));
        }
        Ok(FeedbackLog::from_rows(&parse_csv(&file.content), self.layout)?)
    }

    fn encode(&self, log: &FeedbackLog) -> String {
        write_csv(&log.to_rows(self.layout))
    }

    /// 読み込み → 追加 → 条件付き書き込み
    ///
    /// 競合時は `max_retries` 回まで全体をやり直す。使い切った場合、
    /// リモートにまだファイルが無ければ新規作成し、あれば Write エラー。
    pub async fn append(&self, entry: FeedbackEntry) -> Result<usize> {
        let message = format!("Add feedback for setup {}", entry.setup_id);
        let mut last_conflict = String::new();

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                tokio::time::sleep(self.retry_delay).await;
            }

            let current = self
                .file
                .get()
                .await
                .map_err(|e| DefectLookupError::Write(e.to_string()))?;
            let mut log = self
                .decode(current.as_ref())
                .map_err(|e| DefectLookupError::Write(e.to_string()))?;
            log.push(entry.clone());

            let sha = current.as_ref().map(|f| f.sha.as_str());
            match self.file.put(&self.encode(&log), sha, &message).await {
                Ok(()) => {
                    tracing::debug!(attempt, entries = log.len(), "remote feedback log updated");
                    return Ok(log.len());
                }
                Err(DefectLookupError::Conflict(cause)) => {
                    tracing::warn!(attempt, cause = %cause, "remote feedback log changed concurrently");
                    last_conflict = cause;
                }
                Err(e) => return Err(DefectLookupError::Write(e.to_string())),
            }
        }

        // 再試行を使い切った
        let exists = self
            .file
            .get()
            .await
            .map_err(|e| DefectLookupError::Write(e.to_string()))?
            .is_some();
        if exists {
            return Err(DefectLookupError::Write(format!(
                "{}回試行しましたが競合が解消しませんでした: {}",
                self.max_retries + 1,
                last_conflict
            )));
        }

        tracing::warn!("remote feedback log missing after retries, creating it");
        let mut log = FeedbackLog::new();
        log.push(entry);
        self.file
            .put(&self.encode(&log), None, &message)
            .await
            .map_err(|e| DefectLookupError::Write(e.to_string()))?;
        Ok(log.len())
    }
}
