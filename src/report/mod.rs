//! The pool report
//!
//! `build_report` performs every read in order, then renders the metrics
//! into a list of lines. Rendering is deterministic: identical inputs give
//! byte-identical text.

mod format;

pub use format::{to_dollar, to_fixed};

use console::{style, Term};
use eyre::{Result, WrapErr};
use indicatif::ProgressBar;
use std::io::Write;
use tracing::debug;

use crate::amount::TokenAmount;
use crate::context::ReportContext;
use crate::metrics::{AssetPrices, DerivedMetrics, PoolSnapshot, RewardSnapshot};
use crate::price_feed::PriceFeed;
use crate::reader::ChainReader;
use crate::tokens::{self, BPT, BPT_STAKING_POOL, MUSD, USDC};

const BAL_REWARDS_URL: &str = "https://www.predictions.exchange/balancer/";
const BAL_REWARDS_TEXT: &str = "Check http://www.predictions.exchange/balancer/ for accurate %";

/// One printed line of the report
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    Heading(String),
    Text(String),
    Blank,
    Link { text: String, url: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Report {
    lines: Vec<Line>,
}

impl Report {
    #[cfg(test)]
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    fn heading(&mut self, s: &str) {
        self.lines.push(Line::Heading(s.to_string()));
    }

    fn text(&mut self, s: String) {
        self.lines.push(Line::Text(s));
    }

    fn blank(&mut self) {
        self.lines.push(Line::Blank);
    }

    /// Lay out the four report sections
    pub fn render(m: &DerivedMetrics, reward: &RewardSnapshot) -> Self {
        let mut r = Report::default();
        let p = &m.prices;

        r.heading("========== PRICES ==========");
        r.text(format!("1 MTA  = ${}", p.reward));
        r.text(format!("1 MUSD = ${}", p.asset_b));
        r.text(format!("1 USDC = ${}", p.asset_a));
        r.blank();
        r.text(format!("1 BPT  = [{} MUSD, {} USDC]", m.asset_b_per_share, m.asset_a_per_share));
        r.text(format!("       = {}", to_dollar(m.share_price)));
        r.blank();

        r.heading("========== STAKING =========");
        r.text(format!(
            "There are total   : {} BPT issued by mUSD-USDC Balancer Pool.",
            m.total_shares
        ));
        r.text(format!("                  = {}", to_dollar(m.total_shares * m.share_price)));
        r.text(format!("There are total   : {} BPT staked.", m.total_staked));
        r.text(format!("                  = {}", to_dollar(m.total_staked * m.share_price)));
        r.blank();
        r.text(format!(
            "You are staking   : {} BPT ({}% of the pool)",
            m.your_shares,
            to_fixed(m.your_stake_percent, 3)
        ));
        r.text(format!(
            "                  = [{} USDC, {} mUSD]",
            m.asset_a_per_share * m.your_shares,
            m.asset_b_per_share * m.your_shares
        ));
        r.text(format!("                  = {}", to_dollar(m.your_shares * m.share_price)));
        r.blank();

        r.heading("======== MTA REWARDS ========");
        r.text(format!(
            "Daily estimate    : {} MTA = {} (out of total {} MTA)",
            to_fixed(m.daily_estimate(), 2),
            to_dollar(m.daily_estimate() * p.reward),
            to_fixed(m.daily_reward(), 2)
        ));
        r.text(format!(
            "Weekly estimate   : {} MTA = {} (out of total {} MTA)",
            to_fixed(m.weekly_estimate, 2),
            to_dollar(m.weekly_estimate * p.reward),
            m.weekly_reward
        ));
        if let Some(finish) = reward.period_finish {
            r.text(format!("Reward period end : {}", finish.format("%Y-%m-%d %H:%M UTC")));
        }
        r.blank();
        r.text(format!("Daily ROI in USD  : {}%", to_fixed(m.daily_roi_percent(), 4)));
        r.text(format!("Weekly ROI in USD : {}%", to_fixed(m.weekly_roi_percent, 4)));
        r.text(format!("APY (unstable)    : {}%", to_fixed(m.apy_percent(), 4)));
        r.blank();

        r.heading("======== BAL REWARDS ========");
        r.lines.push(Line::Link {
            text: BAL_REWARDS_TEXT.to_string(),
            url: BAL_REWARDS_URL.to_string(),
        });

        r
    }

    /// Unstyled text, one line per entry
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            match line {
                Line::Heading(s) | Line::Text(s) => out.push_str(s),
                Line::Blank => {}
                Line::Link { text, .. } => out.push_str(text),
            }
            out.push('\n');
        }
        out
    }

    /// Print to stdout, with styled headings and a terminal hyperlink
    pub fn print(&self) {
        let hyperlinks = Term::stdout().features().colors_supported();

        for line in &self.lines {
            match line {
                Line::Heading(s) => println!("{}", style(s).cyan().bold()),
                Line::Text(s) => println!("{}", s),
                Line::Blank => println!(),
                Line::Link { text, url } if hyperlinks => {
                    println!("\x1b]8;;{}\x1b\\{}\x1b]8;;\x1b\\", url, text)
                }
                Line::Link { text, .. } => println!("{}", text),
            }
        }
    }
}

/// Read every pool and staking balance, in order
pub async fn read_pool_snapshot<R: ChainReader>(
    reader: &R,
    caller: alloy_primitives::Address,
) -> Result<PoolSnapshot> {
    let total_shares = reader
        .total_supply(BPT.address)
        .await
        .wrap_err_with(|| format!("Failed to read {} supply", BPT.symbol))?;
    let total_staked = reader
        .balance_of(BPT.address, BPT_STAKING_POOL)
        .await
        .wrap_err("Failed to read staked BPT")?;
    let your_shares = reader
        .staked_balance(BPT_STAKING_POOL, caller)
        .await
        .wrap_err("Failed to read your staked BPT")?;
    let reserve_a = reader
        .pool_balance(BPT.address, USDC.address)
        .await
        .wrap_err_with(|| format!("Failed to read {} reserve", USDC.symbol))?;
    let reserve_b = reader
        .pool_balance(BPT.address, MUSD.address)
        .await
        .wrap_err_with(|| format!("Failed to read {} reserve", MUSD.symbol))?;

    Ok(PoolSnapshot {
        total_shares: TokenAmount::new(total_shares, BPT.decimals),
        total_staked: TokenAmount::new(total_staked, BPT.decimals),
        your_shares: TokenAmount::new(your_shares, BPT.decimals),
        reserve_a: TokenAmount::new(reserve_a, USDC.decimals),
        reserve_b: TokenAmount::new(reserve_b, MUSD.decimals),
    })
}

/// Write a progress line to `out` with the spinner cleared.
/// Reaches `out` even when the spinner is hidden (stderr not a terminal).
fn progress_line<W: Write>(progress: &ProgressBar, out: &mut W, line: &str) -> Result<()> {
    progress.suspend(|| writeln!(out, "{}", line))?;
    Ok(())
}

/// Run every read and derive the report, writing progress lines to `out`
pub async fn build_report<R: ChainReader, F: PriceFeed, W: Write>(
    ctx: &ReportContext<R, F>,
    progress: &ProgressBar,
    out: &mut W,
) -> Result<Report> {
    progress_line(progress, out, &format!("Initialized {}", ctx.caller))?;
    progress_line(progress, out, "Reading smart contracts...")?;
    progress.set_message("Reading smart contracts...");

    let pool = read_pool_snapshot(&ctx.reader, ctx.caller).await?;
    let reward = ctx
        .reader
        .weekly_reward(BPT_STAKING_POOL)
        .await
        .wrap_err("Failed to read weekly reward")?;
    debug!("Pool snapshot: {:?}", pool);

    progress_line(progress, out, "Finished reading smart contracts... Looking up prices...")?;
    progress_line(progress, out, "")?;
    progress.set_message("Looking up prices...");

    let snapshot = ctx
        .feed
        .lookup_prices(&tokens::price_ids())
        .await
        .wrap_err("Failed to look up prices")?;
    let prices = AssetPrices::from_snapshot(&snapshot)?;

    let metrics = DerivedMetrics::compute(&pool, &reward, prices)?;
    Ok(Report::render(&metrics, &reward))
}

// ============================================
// TESTS
// ============================================
