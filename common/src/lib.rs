//! Defect Lookup Common Library
//!
//! カタログ検索とフィードバックログのコアロジック（I/Oなし）

pub mod types;
pub mod error;
pub mod catalog;
pub mod csv;
pub mod feedback;

pub use types::{Catalog, DefectRecord, FeedbackEntry, Frequency, LogLayout, NOT_AVAILABLE, UNKNOWN_REVISION};
pub use error::{Error, Result};
pub use catalog::{build_catalog, lookup, normalize_setup_id, DEFAULT_TOP_N, REQUIRED_COLUMNS};
pub use csv::{parse_csv, write_csv};
pub use feedback::{capture_timestamp, is_valid_timestamp, parse_utc_offset, FeedbackDraft, FeedbackLog};
