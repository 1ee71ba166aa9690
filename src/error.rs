use thiserror::Error;

#[derive(Error, Debug)]
pub enum DefectLookupError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("GitHubトークンが設定されていません。環境変数 GITHUB_TOKEN か `defect-lookup config --set-token TOKEN` で設定してください")]
    MissingToken,

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("カタログ読み込みエラー: {0}")]
    CatalogRead(String),

    #[error("フィードバックログ読み込みエラー: {0}")]
    LogRead(String),

    /// リモートのバージョン参照が古い（他の書き込みと競合）
    #[error("書き込み競合: {0}")]
    Conflict(String),

    #[error("リモートAPIエラー: {0}")]
    Remote(String),

    /// フィードバックを保存できなかった（最終失敗）
    #[error("フィードバックの保存に失敗: {0}")]
    Write(String),

    #[error("入力エラー: {0}")]
    Input(String),

    #[error(transparent)]
    Common(#[from] defect_lookup_common::Error),
}

impl DefectLookupError {
    /// 必須列不足など、カタログの構造に起因するエラーか
    pub fn is_schema(&self) -> bool {
        matches!(self, DefectLookupError::Common(defect_lookup_common::Error::Schema(_)))
    }
}

pub type Result<T> = std::result::Result<T, DefectLookupError>;
