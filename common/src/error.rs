//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("Config error: {0}")]
    Config(String),

    /// 必須列がヘッダーに無い
    #[error("Schema error: missing column(s) {}", .0.join(", "))]
    Schema(Vec<String>),

    /// ログの列構成が設定と食い違う
    #[error("Parse error: {0}")]
    Parse(String),

    /// 入力値の検証エラー（空のオペレーター名など）
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
