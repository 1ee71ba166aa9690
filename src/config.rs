use crate::error::{DefectLookupError, Result};
use chrono::FixedOffset;
use defect_lookup_common::{parse_utc_offset, LogLayout, DEFAULT_TOP_N};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// リモートログストア（GitHub）の設定
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// `owner/name`
    pub repo: String,
    /// リポジトリ内のファイルパス
    pub path: String,
    pub branch: String,
    pub api_base: String,
    pub token: Option<String>,
    /// 競合時の再試行回数
    pub max_retries: u32,
    pub retry_delay_ms: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            repo: String::new(),
            path: "feedback.csv".into(),
            branch: "main".into(),
            api_base: "https://api.github.com".into(),
            token: None,
            max_retries: 1,
            retry_delay_ms: 500,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub catalog_path: PathBuf,
    pub feedback_path: PathBuf,
    pub log_layout: LogLayout,
    pub top_n: usize,
    /// 例: `+09:00`。未設定ならローカル時刻
    pub utc_offset: Option<String>,
    pub timeout_seconds: u64,
    pub remote: Option<RemoteConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default_config())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| DefectLookupError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("defect-lookup").join("config.json"))
    }

    fn default_config() -> Self {
        Self {
            catalog_path: PathBuf::from("Defect Lookup.xlsx"),
            feedback_path: PathBuf::from("feedback.xlsx"),
            log_layout: LogLayout::Full,
            top_n: DEFAULT_TOP_N,
            utc_offset: None,
            timeout_seconds: 30,
            remote: None,
        }
    }

    pub fn offset(&self) -> Result<Option<FixedOffset>> {
        match self.utc_offset.as_deref() {
            Some(s) if !s.trim().is_empty() => Ok(Some(parse_utc_offset(s)?)),
            _ => Ok(None),
        }
    }

    pub fn remote(&self) -> Result<&RemoteConfig> {
        match &self.remote {
            Some(remote) if !remote.repo.trim().is_empty() => Ok(remote),
            _ => Err(DefectLookupError::Config(
                "リモートストアが未設定です（config.json の remote.repo）".into(),
            )),
        }
    }

    pub fn get_token(&self) -> Result<String> {
        // 環境変数を優先
        if let Ok(token) = std::env::var("GITHUB_TOKEN") {
            if !token.trim().is_empty() {
                return Ok(token);
            }
        }

        self.remote
            .as_ref()
            .and_then(|r| r.token.clone())
            .ok_or(DefectLookupError::MissingToken)
    }

    pub fn set_token(&mut self, token: String) -> Result<()> {
        self.remote.get_or_insert_with(RemoteConfig::default).token = Some(token);
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.top_n, 6);
        assert_eq!(config.catalog_path, PathBuf::from("Defect Lookup.xlsx"));
        assert_eq!(config.log_layout, LogLayout::Full);
        assert!(config.offset().unwrap().is_none());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: Config = serde_json::from_str(
            r#"{ "top_n": 3, "log_layout": "text-only", "remote": { "repo": "acme/line-feedback" } }"#,
        )
        .unwrap();
        assert_eq!(config.top_n, 3);
        assert_eq!(config.log_layout, LogLayout::TextOnly);
        let remote = config.remote().unwrap();
        assert_eq!(remote.branch, "main");
        assert_eq!(remote.max_retries, 1);
        assert_eq!(remote.path, "feedback.csv");
    }

    #[test]
    fn test_remote_requires_repo() {
        let config = Config::default();
        assert!(matches!(config.remote(), Err(DefectLookupError::Config(_))));
    }

    #[test]
    fn test_offset_parsing() {
        let config = Config {
            utc_offset: Some("+09:00".into()),
            ..Config::default()
        };
        assert_eq!(config.offset().unwrap().unwrap().local_minus_utc(), 9 * 3600);

        let bad = Config {
            utc_offset: Some("JST".into()),
            ..Config::default()
        };
        assert!(bad.offset().is_err());
    }
}
