//! Pool Report - mUSD/USDC Balancer pool staking report
//!
//! Run with: cargo run
//!
//! Reads the pool, its staking contract and CoinGecko prices once, then
//! prints pool composition, your staking share and MTA reward estimates.

use color_eyre::eyre::Result;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tracing::error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod amount;
mod config;
mod context;
mod metrics;
mod price_feed;
mod reader;
mod report;
mod tokens;

use config::Config;
use context::ReportContext;

fn print_banner() {
    println!();
    println!(
        "{}",
        style("═══════════════════════════════════════════════════════════════").cyan()
    );
    println!(
        "{}",
        style(" mUSD/USDC Balancer Pool - Staking Report").cyan().bold()
    );
    println!(
        "{}",
        style("═══════════════════════════════════════════════════════════════").cyan()
    );
    println!();
}

fn loading_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message("Connecting...");
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("pool_report=info".parse()?),
        )
        .init();

    print_banner();

    // Load configuration
    let config = Config::load()?;

    if let Err(e) = config.validate() {
        error!("Configuration validation failed: {}", e);
        error!("Please check your .env file");
        return Err(e);
    }

    config.print_summary();
    println!();

    let spinner = loading_spinner();

    let result: Result<report::Report> = async {
        let ctx = ReportContext::connect(&config).await?;
        report::build_report(&ctx, &spinner, &mut std::io::stdout()).await
    }
    .await;

    match result {
        Ok(report) => {
            spinner.finish_and_clear();
            println!();
            report.print();
            Ok(())
        }
        Err(e) => {
            spinner.abandon_with_message(format!("{}", style("✗ Report failed").red()));
            Err(e)
        }
    }
}
