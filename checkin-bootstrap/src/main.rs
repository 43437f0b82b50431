use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;

use checkin_bootstrap::{logging, lifecycle, AppContext};
use checkin_infrastructure::{AppConfig, CONFIG_ENV};

#[derive(Parser, Debug)]
#[command(name = "checkin-station")]
#[command(about = "Event check-in scanning station", long_about = None)]
struct Args {
    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the presenter HTTP API (default)
    Serve,
    /// Feed payloads through a scan session back to back
    Scan {
        #[arg(required = true)]
        raw: Vec<String>,
    },
    /// Print the most recent local check-ins
    Recent {
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    if let Some(config) = &args.config {
        std::env::set_var(CONFIG_ENV, config);
    }

    let config = {
        let _startup = tracing::subscriber::set_default(logging::startup_subscriber(
            logging::default_filter(),
            std::io::stdout,
        ));
        AppConfig::load().await?
    };
    let _log_guard = logging::init(args.log_json, config.log_dir.as_deref())?;
    info!(
        "check-in station starting for event {} at {}",
        config.event_id, config.entrance_name
    );

    let context = AppContext::new(&config)?;
    match args.command.unwrap_or(Command::Serve) {
        Command::Serve => lifecycle::run_standalone(context).await,
        Command::Scan { raw } => lifecycle::run_scans(context, raw).await,
        Command::Recent { limit } => lifecycle::print_recent(context, limit).await,
    }
}
