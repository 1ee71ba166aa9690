//! GitHub Contents API クライアント
//!
//! GET  /repos/{repo}/contents/{path}?ref={branch}
//! PUT  /repos/{repo}/contents/{path}  (sha付きで更新、なしで新規作成)

use super::remote::{RemoteFile, VersionedFile};
use crate::config::RemoteConfig;
use crate::error::{DefectLookupError, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const USER_AGENT: &str = concat!("defect-lookup/", env!("CARGO_PKG_VERSION"));

#[derive(Deserialize)]
struct ContentsResponse {
    #[serde(default)]
    content: String,
    /// 1MBを超えるファイルは `none` で本文が空
    #[serde(default)]
    encoding: String,
    sha: String,
    size: u64,
}

#[derive(Serialize)]
struct PutRequest<'a> {
    message: &'a str,
    content: String,
    branch: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<&'a str>,
}

#[derive(Debug, Clone)]
pub struct GitHubFile {
    http: Client,
    api_base: String,
    repo: String,
    path: String,
    branch: String,
    token: String,
}

impl GitHubFile {
    pub fn new(remote: &RemoteConfig, token: String, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| DefectLookupError::Remote(format!("HTTPクライアント初期化エラー: {}", e)))?;

        Ok(Self {
            http,
            api_base: remote.api_base.trim_end_matches('/').to_string(),
            repo: remote.repo.trim().to_string(),
            path: remote.path.trim_start_matches('/').to_string(),
            branch: remote.branch.clone(),
            token,
        })
    }

    pub fn contents_url(&self) -> String {
        format!("{}/repos/{}/contents/{}", self.api_base, self.repo, self.path)
    }

    pub fn describe(&self) -> String {
        format!("{}:{}@{}", self.repo, self.path, self.branch)
    }
}

impl GitHubFile {
    /// 本文をそのまま取得（大きなファイル用）
    async fn get_raw(&self) -> Result<String> {
        let response = self
            .http
            .get(self.contents_url())
            .query(&[("ref", self.branch.as_str())])
            .bearer_auth(&self.token)
            .header("Accept", "application/vnd.github.raw")
            .send()
            .await
            .map_err(|e| DefectLookupError::Remote(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DefectLookupError::Remote(format!("GET raw {}: {}", status, body)));
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|e| DefectLookupError::Remote(e.to_string()))?;
        String::from_utf8(bytes.to_vec()).map_err(|e| DefectLookupError::Remote(format!("UTF-8デコードエラー: {}", e)))
    }
}

impl VersionedFile for GitHubFile {
    async fn get(&self) -> Result<Option<RemoteFile>> {
        let response = self
            .http
            .get(self.contents_url())
            .query(&[("ref", self.branch.as_str())])
            .bearer_auth(&self.token)
            .header("Accept", "application/vnd.github+json")
            .send()
            .await
            .map_err(|e| DefectLookupError::Remote(e.to_string()))?;

        match response.status() {
            StatusCode::NOT_FOUND => return Ok(None),
            status if !status.is_success() => {
                let body = response.text().await.unwrap_or_default();
                return Err(DefectLookupError::Remote(format!("GET {}: {}", status, body)));
            }
            _ => {}
        }

        let contents: ContentsResponse = response
            .json()
            .await
            .map_err(|e| DefectLookupError::Remote(format!("レスポンスのパースに失敗: {}", e)))?;

        let content = if contents.encoding == "base64" {
            decode_content(&contents.content)?
        } else {
            tracing::debug!(encoding = %contents.encoding, size = contents.size, "fetching raw log content");
            self.get_raw().await?
        };
        Ok(Some(RemoteFile {
            content,
            sha: contents.sha,
            size: contents.size,
        }))
    }

    async fn put(&self, content: &str, sha: Option<&str>, message: &str) -> Result<()> {
        let request = PutRequest {
            message,
            content: STANDARD.encode(content.as_bytes()),
            branch: &self.branch,
            sha,
        };

        let response = self
            .http
            .put(self.contents_url())
            .bearer_auth(&self.token)
            .header("Accept", "application/vnd.github+json")
            .json(&request)
            .send()
            .await
            .map_err(|e| DefectLookupError::Remote(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        if is_conflict(status) {
            Err(DefectLookupError::Conflict(format!("PUT {}: {}", status, body)))
        } else {
            Err(DefectLookupError::Remote(format!("PUT {}: {}", status, body)))
        }
    }
}

/// sha不一致（409）と、作成時に既存ファイルがあった場合（422）
fn is_conflict(status: StatusCode) -> bool {
    status == StatusCode::CONFLICT || status == StatusCode::UNPROCESSABLE_ENTITY
}

/// APIはBase64を改行付きで返す
fn decode_content(encoded: &str) -> Result<String> {
    let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = STANDARD
        .decode(compact)
        .map_err(|e| DefectLookupError::Remote(format!("Base64デコードエラー: {}", e)))?;
    String::from_utf8(bytes).map_err(|e| DefectLookupError::Remote(format!("UTF-8デコードエラー: {}", e)))
}
