use anyhow::Result;
use defi_tracker::{
    config::{AppConfig, OutputFormat},
    dashboard::{Commit, Dashboard, ViewState, drain_queries},
    position::PositionAggregator,
    providers::HttpPortfolioSource,
    render, utils,
};
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

fn print_state(state: &ViewState, format: OutputFormat) {
    match format {
        OutputFormat::Text => print!("{}", render::render_text(state)),
        OutputFormat::Json => match render::render_json(state) {
            Ok(json) => println!("{json}"),
            Err(e) => tracing::error!(error = %e, "[RENDER] failed to serialize view state"),
        },
    }
    prompt();
}

fn prompt() {
    print!("Enter wallet address (or `quit`): ");
    let _ = std::io::stdout().flush();
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    utils::init_logging();

    let config = AppConfig::load()?;
    tracing::info!(
        policy = ?config.balance_failure_policy,
        format = ?config.output_format,
        "[INIT] defi-tracker starting"
    );
    if config.quicknode_api_url.is_none() {
        tracing::warn!("[INIT] QUICKNODE_API_URL not set; token balance lookups will fail");
    }
    if config.etherscan_api_key.is_none() {
        tracing::warn!("[INIT] ETHERSCAN_API_KEY not set; ETH balance lookups will fail");
    }

    let source = Arc::new(HttpPortfolioSource::from_config(&config)?);
    let dashboard = Arc::new(Dashboard::new(PositionAggregator::new(
        source,
        config.balance_failure_policy,
    )));

    // Renderer: redraw the panel whenever the view record changes -----------
    let render_task = {
        let mut state_rx = dashboard.subscribe();
        let format = config.output_format;
        tokio::spawn(async move {
            let initial = state_rx.borrow_and_update().clone();
            print_state(&initial, format);
            while state_rx.changed().await.is_ok() {
                let state = state_rx.borrow_and_update().clone();
                print_state(&state, format);
            }
        })
    };

    // Input: one query per line; a newer query supersedes any in flight -----
    let mut queries = Vec::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let input = line.trim().to_string();
        if matches!(input.as_str(), "quit" | "exit") {
            break;
        }
        let dashboard = dashboard.clone();
        queries.push(tokio::spawn(async move {
            match dashboard.submit(&input).await {
                Ok(Commit::Applied) => {}
                Ok(Commit::Stale) => tracing::debug!("[QUERY] stale result discarded"),
                Err(e) => {
                    println!("{}", e.user_message());
                    prompt();
                }
            }
        }));
    }

    // Let in-flight queries land before closing the channel
    drain_queries(queries).await;
    drop(dashboard);
    let _ = render_task.await;
    println!();
    Ok(())
}
