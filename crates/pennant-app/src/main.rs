// pennant entry point.
//
// Startup sequence:
// 1. Parse arguments
// 2. Initialize tracing (log to file, not terminal)
// 3. Load config and the player name map
// 4. Build the Stats API client and progress tracker
// 5. Render the requested page to stdout

use std::sync::Arc;

use anyhow::Context;
use chrono::Local;
use tracing::{info, warn};

use pennant_app::app::{self, Services};
use pennant_app::cli::{self, USAGE};
use pennant_core::config;
use pennant_core::directory::PlayerDirectory;
use pennant_core::progress::ProgressTracker;
use pennant_mlb::MlbStatsClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Parse arguments
    let args = cli::parse_args(std::env::args().skip(1))?;
    if args.help {
        println!("{USAGE}");
        return Ok(());
    }

    // 2. Initialize tracing
    init_tracing()?;
    info!("pennant starting up");

    // 3. Load config and player names
    let base_dir = std::env::current_dir().context("failed to read current directory")?;
    let config = config::load_config_from(&base_dir).context("failed to load configuration")?;
    info!(
        "Config loaded: league {}, {} seasons configured",
        config.league.league_id,
        config.seasons.len()
    );

    let directory = match PlayerDirectory::load_csv(&base_dir.join(&config.league.player_map)) {
        Ok(directory) => {
            info!("Loaded {} player names", directory.len());
            directory
        }
        Err(e) => {
            warn!("Player names unavailable, showing ids instead: {e}");
            PlayerDirectory::default()
        }
    };

    // 4. Providers
    let client = Arc::new(MlbStatsClient::new(config.league.stats_api_url.clone()));
    let services = Services {
        stats: client.clone(),
        progress: Arc::new(ProgressTracker::new(client)),
        directory,
    };

    // 5. Render
    let output = app::run(&config, &base_dir, &args, &services, Local::now().naive_local()).await?;
    print!("{output}");

    info!("pennant finished");
    Ok(())
}

fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("pennant.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("pennant=info,pennant_app=info,pennant_core=info,pennant_mlb=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
