use clap::Parser;
use defect_lookup::{catalog, cli, config, error, interactive, report, store};
use cli::{Cli, Commands};
use config::Config;
use defect_lookup_common::{lookup, FeedbackDraft};
use dialoguer::Input;
use error::{DefectLookupError, Result};
use store::FeedbackStore;
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// 引数が無ければ入力を促す
fn value_or_prompt(value: Option<String>, prompt: &str) -> Result<String> {
    match value {
        Some(v) => Ok(v),
        None => Input::<String>::new()
            .with_prompt(prompt)
            .interact_text()
            .map_err(|e| DefectLookupError::Input(e.to_string())),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let config = Config::load()?;

    match cli.command {
        Commands::Lookup { setup, top, catalog, json } => {
            let catalog_path = catalog.unwrap_or_else(|| config.catalog_path.clone());
            let top_n = top.unwrap_or(config.top_n);

            let defects = catalog::load_catalog(&catalog_path)?;
            let results = lookup(&defects, &setup, top_n);

            if json {
                let report = report::LookupReport::new(setup.trim(), &defects.revision, &results);
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                report::print_lookup(&setup, &defects.revision, &results, top_n);
            }
        }

        Commands::Feedback { setup, operator, text, remote, feedback_path } => {
            println!("📝 defect-lookup - フィードバック送信\n");

            let operator = value_or_prompt(operator, "オペレーター名")?;
            let text = value_or_prompt(text, "フィードバック")?;
            let draft = FeedbackDraft::new(setup.unwrap_or_default(), operator, text);

            let store = FeedbackStore::from_config(&config, remote, feedback_path.as_deref())?;
            println!("- 保存中... ({})", store.describe());
            let entry = store::submit_feedback(&store, draft, config.offset()?).await?;
            println!("✔ 送信しました: [{}] {}", entry.timestamp, entry.setup_id);
        }

        Commands::Log { remote, feedback_path, limit } => {
            let store = FeedbackStore::from_config(&config, remote, feedback_path.as_deref())?;
            let log = store.read().await?;
            let entries = log.entries();
            let start = limit.map(|n| entries.len().saturating_sub(n)).unwrap_or(0);

            println!("フィードバックログ: {} ({}件)\n", store.describe(), entries.len());
            report::print_log(&entries[start..]);
        }

        Commands::Revision { catalog } => {
            let catalog_path = catalog.unwrap_or_else(|| config.catalog_path.clone());
            let defects = catalog::load_catalog(&catalog_path)?;
            println!("{}", defects.revision);
        }

        Commands::Interactive { catalog, remote } => {
            let catalog_path = catalog.unwrap_or_else(|| config.catalog_path.clone());
            let store = FeedbackStore::from_config(&config, remote, None)?;
            interactive::run_interactive(&config, &catalog_path, &store).await?;
        }

        Commands::Config { set_token, set_catalog, set_feedback, show } => {
            let mut config = config;

            if let Some(token) = set_token {
                config.set_token(token)?;
                println!("✔ GitHubトークンを設定しました");
            }

            if let Some(path) = set_catalog {
                config.catalog_path = path;
                config.save()?;
                println!("✔ カタログのパスを設定しました");
            }

            if let Some(path) = set_feedback {
                config.feedback_path = path;
                config.save()?;
                println!("✔ フィードバックログのパスを設定しました");
            }

            if show {
                println!("設定:");
                println!("  カタログ: {}", config.catalog_path.display());
                println!("  フィードバックログ: {} ({})", config.feedback_path.display(), config.log_layout);
                println!("  表示件数: {}", config.top_n);
                println!("  UTCオフセット: {}", config.utc_offset.as_deref().unwrap_or("ローカル"));
                match &config.remote {
                    Some(r) => {
                        println!("  リモート: {}:{}@{}", r.repo, r.path, r.branch);
                        println!("  再試行: {}回 / {}ms", r.max_retries, r.retry_delay_ms);
                        println!("  トークン: {}", if config.get_token().is_ok() { "設定済み" } else { "未設定" });
                    }
                    None => println!("  リモート: 未設定"),
                }
            }
        }
    }

    Ok(())
}
