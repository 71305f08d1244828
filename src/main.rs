//! Command-line entry point.
//!
//! # Usage
//!
//! ```bash
//! # Weekly run: full aggregation into this week's worksheet
//! campaign-metrics weekly "Friday Bulletin"
//!
//! # Same, for the week of another date, printed instead of published
//! campaign-metrics weekly "Friday Bulletin" --date 2026-10-09 --dry-run
//!
//! # One campaign into a known spreadsheet, provider percentages
//! campaign-metrics report "Test1" --to-google-sheet 1AbC...
//!
//! # Same, with rates recomputed from raw click records
//! campaign-metrics report "Test1" -g 1AbC... --recompute
//! ```
//!
//! # Environment Variables
//!
//! See [`campaign_metrics::config`].

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use colored::*;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use campaign_metrics::application::retry::RetryingCaller;
use campaign_metrics::application::services::{AggregationMode, ReportPipeline};
use campaign_metrics::config;
use campaign_metrics::domain::entities::CampaignReport;
use campaign_metrics::domain::gateways::{
    ArchiveSource, CampaignProvider, PublishTarget, SheetPublisher,
};
use campaign_metrics::error::AppError;
use campaign_metrics::infrastructure::archive::HttpArchiveSource;
use campaign_metrics::infrastructure::mailchimp::MailchimpClient;
use campaign_metrics::infrastructure::sheets::GoogleSheetsPublisher;
use campaign_metrics::utils::calendar::{sheet_name, spreadsheet_name, week_friday};
use campaign_metrics::utils::timezone::today_central;

/// Per-URL click rates of email campaigns, published to Google Sheets.
#[derive(Parser)]
#[command(name = "campaign-metrics")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Recompute a campaign's rates and write this week's worksheet
    Weekly {
        /// Campaign search text; the first hit is used
        query: String,

        /// Any day of the target week (default: today, US Central)
        #[arg(short, long)]
        date: Option<NaiveDate>,

        /// Print the report instead of publishing it
        #[arg(long)]
        dry_run: bool,
    },

    /// Write one campaign into a worksheet named after it
    Report {
        /// Campaign name, also used as the worksheet name
        name: String,

        /// Target spreadsheet id
        #[arg(short = 'g', long = "to-google-sheet")]
        spreadsheet_id: String,

        /// Recompute rates from raw click records instead of using the
        /// provider's per-link percentages
        #[arg(long)]
        recompute: bool,

        /// Print the report instead of publishing it
        #[arg(long)]
        dry_run: bool,
    },
}

struct RunPlan {
    query: String,
    mode: AggregationMode,
    target: PublishTarget,
    dry_run: bool,
}

impl From<Commands> for RunPlan {
    fn from(command: Commands) -> Self {
        match command {
            Commands::Weekly {
                query,
                date,
                dry_run,
            } => RunPlan {
                query,
                mode: AggregationMode::Full,
                target: PublishTarget::Weekly {
                    run_date: date.unwrap_or_else(today_central),
                },
                dry_run,
            },
            Commands::Report {
                name,
                spreadsheet_id,
                recompute,
                dry_run,
            } => RunPlan {
                query: name,
                mode: if recompute {
                    AggregationMode::Full
                } else {
                    AggregationMode::Passthrough
                },
                target: PublishTarget::Campaign { spreadsheet_id },
                dry_run,
            },
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = config::load_from_env().context("Failed to load configuration")?;
    init_logging(&config.log_level, &config.log_format)?;
    config.print_summary();

    let plan = RunPlan::from(cli.command);
    if !plan.dry_run && !config.can_publish() {
        anyhow::bail!("GOOGLE_ACCESS_TOKEN must be set to publish (or pass --dry-run)");
    }

    let caller = RetryingCaller::from_config(&config);
    let provider = Arc::new(
        MailchimpClient::new(&config).context("Failed to create Mailchimp client")?,
    );
    let archives =
        Arc::new(HttpArchiveSource::new(&config).context("Failed to create archive client")?);

    tracing::info!(query = %plan.query, mode = ?plan.mode, target = ?plan.target, "Starting run");

    let report = if plan.dry_run {
        execute(provider, archives, Arc::new(ConsolePublisher), caller, &plan).await?
    } else {
        let publisher = Arc::new(
            GoogleSheetsPublisher::new(&config).context("Failed to create Sheets publisher")?,
        );
        execute(provider, archives, publisher, caller, &plan).await?
    };

    tracing::info!(
        campaign_id = %report.campaign_id,
        urls = report.url_rates.len(),
        "Run finished"
    );
    Ok(())
}

async fn execute<P, A, S>(
    provider: Arc<P>,
    archives: Arc<A>,
    publisher: Arc<S>,
    caller: RetryingCaller,
    plan: &RunPlan,
) -> Result<CampaignReport>
where
    P: CampaignProvider,
    A: ArchiveSource,
    S: SheetPublisher,
{
    let pipeline = ReportPipeline::new(provider, archives, publisher, caller);

    pipeline
        .run(&plan.query, plan.mode, &plan.target)
        .await
        .with_context(|| format!("Run for campaign '{}' failed", plan.query))
}

fn init_logging(level: &str, format: &str) -> Result<()> {
    let filter = EnvFilter::try_new(level)
        .or_else(|_| EnvFilter::try_new("info"))
        .map_err(|e| anyhow::anyhow!("invalid log level: {}", e))?;

    let registry = tracing_subscriber::registry().with(filter);
    if format == "json" {
        registry.with(fmt::layer().json().with_target(true)).init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_thread_ids(false))
            .init();
    }

    Ok(())
}

/// `--dry-run` destination: the report goes to stdout.
struct ConsolePublisher;

#[async_trait]
impl SheetPublisher for ConsolePublisher {
    async fn publish(&self, target: &PublishTarget, report: &CampaignReport) -> Result<(), AppError> {
        print_report(target, report);
        Ok(())
    }
}

/// Prints the report the way it would land in the sheet.
///
/// # Output Format
///
/// ```text
/// 📊 Test1 (947a654248)
///   Target:      spreadsheet 1AbC..., sheet Test1
///   Open rate:   24.56%
///   Click rate:  1.23%
///
///   URL                                                Clicks   Unique
///   ──────────────────────────────────────────────────────────────────
///   https://www.youtube.com/                          40.02%    2.93%
/// ```
fn print_report(target: &PublishTarget, report: &CampaignReport) {
    let destination = match target {
        PublishTarget::Campaign { spreadsheet_id } => {
            format!("spreadsheet {}, sheet {}", spreadsheet_id, report.campaign_name)
        }
        PublishTarget::Weekly { run_date } => {
            let friday = week_friday(*run_date);
            format!(
                "spreadsheet '{}', sheet '{}'",
                spreadsheet_name(friday),
                sheet_name(friday)
            )
        }
    };

    println!();
    println!(
        "{} {}",
        format!("📊 {}", report.campaign_name).bright_blue().bold(),
        format!("({})", report.campaign_id).bright_black()
    );
    println!("  Target:      {}", destination.cyan());
    println!(
        "  Open rate:   {}",
        percent(report.summary.open_rate).bright_white().bold()
    );
    println!(
        "  Click rate:  {}",
        percent(report.summary.click_rate).bright_white().bold()
    );
    println!();

    if report.url_rates.is_empty() {
        println!("{}", "  No tracked links".yellow());
        println!();
        return;
    }

    println!(
        "  {:<50} {:>8} {:>8}",
        "URL".bright_white().bold(),
        "Clicks".bright_white().bold(),
        "Unique".bright_white().bold()
    );
    println!("  {}", "─".repeat(68).bright_black());

    for rate in &report.url_rates {
        println!(
            "  {:<50} {:>8} {:>8}",
            rate.url.cyan(),
            percent(rate.click_rate).green(),
            percent(rate.unique_click_rate).bright_black()
        );
    }

    println!();
    println!(
        "  {} {}",
        "(dry run)".yellow(),
        "nothing was written".bright_black()
    );
    println!();
}

fn percent(rate: f64) -> String {
    format!("{:.2}%", rate * 100.0)
}
