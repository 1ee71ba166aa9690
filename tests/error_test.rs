//! エラーケーステスト
//!
//! 各種エラー条件でのエラーハンドリングを検証

use defect_lookup::error::DefectLookupError;

/// DefectLookupErrorのDisplay実装確認
#[test]
fn test_error_display() {
    let errors = vec![
        DefectLookupError::Config("テスト設定エラー".to_string()),
        DefectLookupError::FileNotFound("Defect Lookup.xlsx".to_string()),
        DefectLookupError::CatalogRead("壊れたファイル".to_string()),
        DefectLookupError::LogRead("壊れたログ".to_string()),
        DefectLookupError::Conflict("sha mismatch".to_string()),
        DefectLookupError::Remote("PUT 500".to_string()),
        DefectLookupError::Write("競合".to_string()),
        DefectLookupError::Input("入力中断".to_string()),
    ];

    for err in errors {
        let display = format!("{}", err);
        assert!(!display.is_empty(), "エラーメッセージが空: {:?}", err);
    }
}

/// MissingTokenエラーのメッセージ確認
#[test]
fn test_missing_token_message() {
    let err = DefectLookupError::MissingToken;
    let display = format!("{}", err);

    assert!(display.contains("GITHUB_TOKEN"));
    assert!(display.contains("defect-lookup config"));
}

/// Writeエラーは原因を含む
#[test]
fn test_write_error_keeps_cause() {
    let err = DefectLookupError::Write("PUT 409 Conflict".to_string());
    assert!(format!("{}", err).contains("PUT 409 Conflict"));
}

/// IOエラーからの変換
#[test]
fn test_io_error_conversion() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let err: DefectLookupError = io_err.into();

    assert!(matches!(err, DefectLookupError::Io(_)));
    let display = format!("{}", err);
    assert!(display.contains("IO"));
}

/// JSONエラーからの変換
#[test]
fn test_json_error_conversion() {
    let json_err = serde_json::from_str::<serde_json::Value>("{ invalid }").unwrap_err();
    let err: DefectLookupError = json_err.into();

    assert!(matches!(err, DefectLookupError::JsonParse(_)));
}

/// common::Errorからの変換
#[test]
fn test_common_error_conversion() {
    let common_err = defect_lookup_common::Error::Schema(vec!["Frequency".to_string()]);
    let err: DefectLookupError = common_err.into();

    assert!(matches!(err, DefectLookupError::Common(_)));
    assert!(err.is_schema());
}

/// エラーチェーン（透過的エラー）
#[test]
fn test_error_chain_transparent() {
    let common_err = defect_lookup_common::Error::Validation("operator name is required".to_string());
    let err: DefectLookupError = common_err.into();

    // 透過的エラーなのでメッセージがそのまま表示される
    assert_eq!(format!("{}", err), "Validation error: operator name is required");
    assert!(!err.is_schema());
}
