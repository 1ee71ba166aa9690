//! Defect Lookup
//!
//! セットアップ番号から頻出不具合を検索し、
//! オペレーターのフィードバックをログに追記する。

pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod interactive;
pub mod report;
pub mod session;
pub mod store;
