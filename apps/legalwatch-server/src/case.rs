use anyhow::Result;
use case_monitor::{
    CaseFile, CaseMonitor, CaseMonitorClient, CaseMonitorConfig, CaseWorkflow, SearchParams,
    SessionManager, StaticToken,
};
use clap::Args;
use modkit::TracedClient;
use runtime::AppConfig;
use std::path::PathBuf;
use std::sync::Arc;

pub const MODULE_NAME: &str = "case_monitor";

const TOKEN_ENV: &str = "LEGALWATCH_ID_TOKEN";

#[derive(Args, Debug)]
pub struct CaseArgs {
    /// PDF case file to upload
    #[arg(long)]
    file: PathBuf,

    /// Identity token (falls back to LEGALWATCH_ID_TOKEN)
    #[arg(long)]
    token: Option<String>,

    /// Search window in days (overrides config)
    #[arg(long)]
    days_back: Option<u32>,

    /// Maximum search results (overrides config)
    #[arg(long)]
    max_results: Option<u32>,

    /// Result indices to analyze, e.g. `--select 0,3`; defaults to the first results
    #[arg(long, value_delimiter = ',')]
    select: Vec<usize>,
}

pub async fn run(config: &AppConfig, args: CaseArgs) -> Result<()> {
    let cfg: CaseMonitorConfig = config.module_config(MODULE_NAME)?;
    let token = args
        .token
        .or_else(|| std::env::var(TOKEN_ENV).ok())
        .unwrap_or_default();

    let client = CaseMonitorClient::new(TracedClient::default(), &cfg)?;
    let sessions = Arc::new(SessionManager::new(
        Arc::new(StaticToken::new(token, chrono::Duration::hours(1))),
        chrono::Duration::seconds(cfg.token_refresh_skew_secs),
    ));
    let mut monitor = CaseMonitor::new(
        client,
        sessions,
        CaseWorkflow::new(cfg.analyze_fallback_count),
    );

    let file = CaseFile::from_path(&args.file).await?;
    println!("Selected {} ({:.2} MB)", file.name, file.size_mb());
    monitor.select_file(file)?;

    let mut progress = monitor.subscribe_progress();
    let reporter = tokio::spawn(async move {
        while progress.changed().await.is_ok() {
            let pct = *progress.borrow_and_update();
            tracing::debug!(progress = pct, "Uploading case file");
        }
    });
    let uploaded = monitor.upload().await;
    reporter.abort();
    let receipt = uploaded?;
    println!("Uploaded: {receipt}");

    let params = SearchParams {
        days_back: args.days_back.unwrap_or(cfg.default_days_back),
        max_results: args.max_results.unwrap_or(cfg.default_max_results),
    };
    let articles = monitor.search(params).await?;
    println!("Found {} articles:", articles.len());
    for (i, a) in articles.iter().enumerate() {
        println!("  [{i}] {} <{}>", a.title, a.link);
    }

    for index in args.select {
        monitor.toggle_article(index)?;
    }
    let analysis = monitor.analyze().await?;
    println!("{}", serde_json::to_string_pretty(&analysis)?);
    Ok(())
}
