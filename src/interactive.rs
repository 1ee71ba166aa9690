//! 対話式の検索・フィードバック入力モジュール
//!
//! セットアップ番号を入力するたびにカタログを読み直して表示し、
//! 必要ならフィードバックを送信する。

use crate::catalog::load_catalog;
use crate::config::Config;
use crate::error::{DefectLookupError, Result};
use crate::report::print_lookup;
use crate::session::Session;
use crate::store::{submit_feedback, FeedbackStore};
use defect_lookup_common::{lookup, FeedbackDraft, NOT_AVAILABLE};
use dialoguer::{Confirm, Input};
use std::path::Path;

/// メニュー操作
#[derive(Debug, PartialEq, Eq)]
pub enum MenuAction {
    /// セットアップ番号を検索
    Lookup(String),
    /// 表示中のセットアップにフィードバック
    Feedback,
    /// 終了
    Quit,
}

/// 入力文字列から操作を判定
///
/// 操作は `:` 始まり。それ以外はすべてセットアップ番号として扱う。
pub fn parse_menu_input(input: &str) -> MenuAction {
    match input.trim() {
        "" | ":q" | ":Q" => MenuAction::Quit,
        ":f" | ":F" => MenuAction::Feedback,
        other => MenuAction::Lookup(other.to_string()),
    }
}

pub async fn run_interactive(config: &Config, catalog_path: &Path, store: &FeedbackStore) -> Result<()> {
    // 最初に読めなければ検索できないので終了
    let catalog = load_catalog(catalog_path)?;
    println!("📋 不具合ルックアップ（カタログ: {}件, 更新日: {}）", catalog.len(), catalog.revision);
    println!("保存先: {}", store.describe());
    println!("---");
    println!("操作: [番号]検索 [:f]フィードバック [:q/Enter]終了");
    println!("---\n");

    let offset = config.offset()?;
    let mut session = Session::new();

    loop {
        let input: String = Input::new()
            .with_prompt("セットアップ番号")
            .allow_empty(true)
            .interact_text()
            .map_err(|e| DefectLookupError::Input(e.to_string()))?;

        match parse_menu_input(&input) {
            MenuAction::Quit => {
                println!("終了します");
                break;
            }
            MenuAction::Lookup(setup) => {
                // 表示のたびに読み直す
                let catalog = match load_catalog(catalog_path) {
                    Ok(c) => c,
                    Err(e) => {
                        println!("⚠ {}", e);
                        continue;
                    }
                };
                session.view(&setup);
                let results = lookup(&catalog, &setup, config.top_n);
                print_lookup(&setup, &catalog.revision, &results, config.top_n);
                println!();
            }
            MenuAction::Feedback => {
                let Some(draft) = prompt_draft(&session)? else {
                    println!("  送信をキャンセルしました\n");
                    continue;
                };
                if let Err(e) = session.begin_submit(&draft) {
                    println!("⚠ {}\n", e);
                    continue;
                }

                match submit_feedback(store, draft, offset).await {
                    Ok(entry) => {
                        session.finish_submit(true);
                        println!("✔ フィードバックを送信しました ({})\n", entry.timestamp);
                    }
                    Err(e) => {
                        session.finish_submit(false);
                        println!("⚠ {}\n  もう一度送信してください\n", e);
                    }
                }
            }
        }
    }

    Ok(())
}

/// フィードバック入力プロンプト
fn prompt_draft(session: &Session) -> Result<Option<FeedbackDraft>> {
    let setup_id = session.setup_id().unwrap_or_default().to_string();
    println!("  セットアップ: {}", if setup_id.is_empty() { NOT_AVAILABLE } else { setup_id.as_str() });

    let mut operator_input = Input::<String>::new().with_prompt("  オペレーター名");
    if let Some(prev) = session.operator() {
        operator_input = operator_input.default(prev.to_string());
    }
    let operator = operator_input
        .interact_text()
        .map_err(|e| DefectLookupError::Input(e.to_string()))?;

    let feedback: String = Input::new()
        .with_prompt("  フィードバック")
        .interact_text()
        .map_err(|e| DefectLookupError::Input(e.to_string()))?;

    let confirmed = Confirm::new()
        .with_prompt("  送信しますか？")
        .default(true)
        .interact()
        .map_err(|e| DefectLookupError::Input(e.to_string()))?;
    if !confirmed {
        return Ok(None);
    }

    Ok(Some(FeedbackDraft::new(setup_id, operator, feedback)))
}
