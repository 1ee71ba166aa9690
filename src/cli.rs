use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "defect-lookup")]
#[command(about = "生産ライン不具合ルックアップ・フィードバックツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// セットアップ番号の頻出不具合を表示
    Lookup {
        /// セットアップ番号
        #[arg(required = true)]
        setup: String,

        /// 表示件数（デフォルト: 設定値）
        #[arg(short = 'n', long)]
        top: Option<usize>,

        /// 不具合カタログ（Excel/CSV）
        #[arg(short, long)]
        catalog: Option<PathBuf>,

        /// JSONで出力
        #[arg(long)]
        json: bool,
    },

    /// フィードバックを送信
    Feedback {
        /// セットアップ番号（省略時は N/A）
        #[arg(short, long)]
        setup: Option<String>,

        /// オペレーター名（省略時は入力を促す）
        #[arg(short, long)]
        operator: Option<String>,

        /// フィードバック本文（省略時は入力を促す）
        #[arg(short, long)]
        text: Option<String>,

        /// リモート（GitHub）に保存
        #[arg(long)]
        remote: bool,

        /// ローカルのログファイル
        #[arg(long)]
        feedback_path: Option<PathBuf>,
    },

    /// フィードバックログを表示
    Log {
        /// リモート（GitHub）から読む
        #[arg(long)]
        remote: bool,

        /// ローカルのログファイル
        #[arg(long)]
        feedback_path: Option<PathBuf>,

        /// 最新N件のみ表示
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// カタログの改訂マーカーを表示
    Revision {
        /// 不具合カタログ（Excel/CSV）
        #[arg(short, long)]
        catalog: Option<PathBuf>,
    },

    /// 検索とフィードバックを対話的に行う
    Interactive {
        /// 不具合カタログ（Excel/CSV）
        #[arg(short, long)]
        catalog: Option<PathBuf>,

        /// リモート（GitHub）に保存
        #[arg(long)]
        remote: bool,
    },

    /// 設定を表示/編集
    Config {
        /// GitHubトークンを設定
        #[arg(long)]
        set_token: Option<String>,

        /// カタログのパスを設定
        #[arg(long)]
        set_catalog: Option<PathBuf>,

        /// フィードバックログのパスを設定
        #[arg(long)]
        set_feedback: Option<PathBuf>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}
