// journal: command line front end for the dashboard engine. Prints JSON on stdout.
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use engine::calendar::parse_month;
use engine::config::EngineSettings;
use engine::data::csv_parser::CandleCsvParser;
use engine::data::market_data::prepare_session;
use engine::data::trade_log::TradeLog;
use engine::services::DashboardService;
use serde::Serialize;
use shared::models::MarketData;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "journal", version, about = "Trading journal dashboard engine")]
struct Cli {
    /// Settings JSON; built-in defaults when omitted
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Annotated chart for the reference trade
    Chart {
        /// Intraday bar export (CSV)
        #[arg(long)]
        candles: PathBuf,
    },
    /// Month grid for the navigation calendar
    Calendar {
        #[arg(long)]
        year: i32,
        /// Number or name, e.g. 11 or November
        #[arg(long)]
        month: String,
        /// Print a text table instead of JSON
        #[arg(long)]
        text: bool,
    },
    /// Chart, calendar and trade log in one document
    Snapshot {
        #[arg(long)]
        candles: PathBuf,
        #[arg(long)]
        year: i32,
        #[arg(long)]
        month: String,
        /// Trade log exported from the journal sheet (CSV)
        #[arg(long)]
        trade_log: Option<PathBuf>,
        /// Edit link of the journal sheet; its CSV export link goes into the snapshot
        #[arg(long)]
        trade_log_sheet: Option<String>,
    },
}

fn main() -> Result<()> {
    // Logs go to stderr so stdout stays parseable JSON.
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    let settings = match &cli.config {
        Some(path) => EngineSettings::load(path).with_context(|| format!("loading settings {}", path.display()))?,
        None => EngineSettings::default(),
    };
    let service = DashboardService::new(settings)?;

    match cli.command {
        Command::Chart { candles } => {
            let data = load_session(&service, &candles)?;
            let view = service.chart_view(&data)?;
            info!(shapes = view.annotations.len(), "Chart view ready");
            print_json(&view)
        }
        Command::Calendar { year, month, text } => {
            let month = parse_month(&month)?;
            let grid = service.month_grid(year, month)?;
            if text {
                println!("{}", grid.render_text());
                Ok(())
            } else {
                print_json(&grid)
            }
        }
        Command::Snapshot {
            candles,
            year,
            month,
            trade_log,
            trade_log_sheet,
        } => {
            let month = parse_month(&month)?;
            let data = load_session(&service, &candles)?;
            let log = trade_log
                .map(|path| TradeLog::load_from_csv(&path).with_context(|| format!("loading trade log {}", path.display())))
                .transpose()?;
            let mut snapshot = service.snapshot(&data, year, month, log)?;
            if let Some(url) = trade_log_sheet {
                snapshot = snapshot.with_trade_log_sheet(&url)?;
            }
            info!(year, month, "Dashboard snapshot ready");
            print_json(&snapshot)
        }
    }
}

fn load_session(service: &DashboardService, path: &Path) -> Result<MarketData> {
    info!(path = %path.display(), "Loading candles");
    let candles = CandleCsvParser::load_candles_from_csv(path)?;
    let settings = service.settings();
    // The chart covers the trade's own session.
    let day = Some(settings.trade_setup.entry_time.date_naive());
    Ok(prepare_session(&settings.symbol, settings.sampling_interval, candles, day))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("serializing output")?;
    println!("{}", json);
    Ok(())
}
