use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use salesdash_core::{DateRange, FilterSelection, Ledger};
use salesdash_ingest::csv_source::read_rows_from_path;
use salesdash_ingest::{Normalizer, RawRow, sheet};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod render;

use config::{Config, OutputFormat};

#[derive(Parser, Debug)]
#[command(name = "salesdash", version, about = "Sales ledger dashboard in the terminal")]
struct Cli {
    /// More log output on stderr (-v info, -vv debug). Overrides RUST_LOG.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Filter the ledger and print totals, breakdowns, daily series and top buyers
    Report {
        #[command(flatten)]
        source: SourceArgs,

        /// Keep only these products (repeatable)
        #[arg(long = "product")]
        products: Vec<String>,

        /// Keep only these sellers (repeatable)
        #[arg(long = "seller")]
        sellers: Vec<String>,

        /// Keep only these payment types (repeatable)
        #[arg(long = "payment-type")]
        payment_types: Vec<String>,

        /// Keep only these sales channels (repeatable)
        #[arg(long = "channel")]
        channels: Vec<String>,

        /// First day to include (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,

        /// Last day to include (YYYY-MM-DD)
        #[arg(long)]
        to: Option<NaiveDate>,

        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
    },

    /// List the values each filter can take, and the ledger's date span
    Domains {
        #[command(flatten)]
        source: SourceArgs,

        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
    },

    /// Manage ~/.salesdash/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Args, Debug)]
struct SourceArgs {
    /// Ledger CSV export (defaults to the config, then ./sales.csv)
    #[arg(long, conflicts_with_all = ["url", "sheet_id"])]
    csv: Option<PathBuf>,

    /// URL of a CSV export (e.g. a Google Sheets export link)
    #[arg(long, conflicts_with = "sheet_id")]
    url: Option<String>,

    /// Google Sheets document id; its CSV export is downloaded
    #[arg(long)]
    sheet_id: Option<String>,
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default config file if none exists
    Init,
    /// Print the effective config
    Show,
}

enum Source {
    Csv(PathBuf),
    Sheet(String),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Report {
            source,
            products,
            sellers,
            payment_types,
            channels,
            from,
            to,
            format,
        } => {
            let cfg = config::load_config()?;
            let ledger = load_ledger(&source, &cfg).await?;

            let mut selection = FilterSelection::new()
                .with_products(products)
                .with_sellers(sellers)
                .with_payment_types(payment_types)
                .with_channels(channels);
            if let Some(range) = date_range(from, to)? {
                selection = selection.with_date_range(range);
            }

            let view = ledger.view(&selection);
            let format = format.unwrap_or(cfg.report.format);
            println!("{}", render::render_view(&view, format, &cfg.report.currency)?);
        }

        Command::Domains { source, format } => {
            let cfg = config::load_config()?;
            let ledger = load_ledger(&source, &cfg).await?;
            let format = format.unwrap_or(cfg.report.format);
            println!("{}", render::render_domains(&ledger.domains(), format)?);
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => {
                let cfg = config::load_config()?;
                println!("# {}\n", config::config_path()?.display());
                println!("{}", config::to_toml(&cfg)?);
            }
        },
    }

    Ok(())
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        _ => EnvFilter::new("debug"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn default_sales_csv() -> PathBuf {
    PathBuf::from("sales.csv")
}

/// Flags beat config; within each, path > url > sheet id.
fn resolve_source(args: &SourceArgs, cfg: &Config) -> Source {
    if let Some(path) = &args.csv {
        return Source::Csv(path.clone());
    }
    if let Some(url) = &args.url {
        return Source::Sheet(url.clone());
    }
    if let Some(id) = &args.sheet_id {
        return Source::Sheet(sheet::export_url(id));
    }
    if let Some(url) = &cfg.source.sheet_url {
        return Source::Sheet(url.clone());
    }
    if let Some(id) = &cfg.source.sheet_id {
        return Source::Sheet(sheet::export_url(id));
    }
    Source::Csv(cfg.source.csv_path.clone().unwrap_or_else(default_sales_csv))
}

async fn load_ledger(args: &SourceArgs, cfg: &Config) -> Result<Ledger> {
    let rows: Vec<RawRow> = match resolve_source(args, cfg) {
        Source::Csv(path) => {
            if !path.exists() {
                bail!("CSV not found: {} (pass --csv <path> or --url <url>)", path.display());
            }
            read_rows_from_path(&path).with_context(|| format!("reading {}", path.display()))?
        }
        Source::Sheet(url) => {
            let client = reqwest::Client::new();
            sheet::fetch_rows(&client, &url)
                .await
                .with_context(|| format!("downloading {url}"))?
        }
    };

    let normalizer = Normalizer::new(cfg.ingest.date_formats.iter().cloned());
    let report = normalizer
        .normalize_batch(&rows, cfg.ingest.quantity_policy)
        .context("normalizing ledger rows")?;

    if !report.skipped.is_empty() {
        eprintln!(
            "warning: skipped {} row(s) without a unit quantity (first: row {})",
            report.skipped.len(),
            report.skipped[0].row + 1
        );
    }
    let ledger = report.into_ledger();
    if ledger.is_empty() {
        warn!("ledger has no usable rows");
    }
    info!(transactions = ledger.len(), "ledger loaded");

    Ok(ledger)
}

/// A missing bound is open-ended.
fn date_range(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Result<Option<DateRange>> {
    if from.is_none() && to.is_none() {
        return Ok(None);
    }
    let start = from.unwrap_or(NaiveDate::MIN);
    let end = to.unwrap_or(NaiveDate::MAX);
    Ok(Some(DateRange::new(start, end).context("invalid --from/--to")?))
}
