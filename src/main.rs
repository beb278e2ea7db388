use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand, crate_description, crate_name, crate_version};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use weatherdash::config::LoggingConfig;
use weatherdash::{
    Dashboard, DashboardConfig, DashboardSettings, DashboardView, FixedPosition, LocalStore,
    LocationOutcome, LocationUpdate, OpenWeatherClient, SavedLocations,
};

mod terminal;

use terminal::TerminalView;

/// CLI options
#[derive(Parser)]
#[command(name = crate_name!(), about = crate_description!(), version = crate_version!())]
struct Opts {
    /// configuration file.
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,
    /// Verbose mode.
    #[arg(short = 'v', long)]
    verbose: bool,
    /// Sub-commands (see below).
    #[command(subcommand)]
    subcmd: SubCommand,
}

#[derive(Subcommand)]
enum SubCommand {
    /// Show the weather at coordinates
    Coords {
        #[arg(allow_negative_numbers = true)]
        latitude: f64,
        #[arg(allow_negative_numbers = true)]
        longitude: f64,
    },
    /// Search a place by name (or "lat,lon") and show its weather
    Search {
        #[arg(required = true)]
        query: Vec<String>,
    },
    /// Show the weather at the configured home position
    Here,
    /// Search a place and add it to the saved locations
    Save {
        #[arg(required = true)]
        query: Vec<String>,
    },
    /// List saved locations
    Saved,
}

fn init_logging(logging: &LoggingConfig, verbose: bool) {
    let level = if verbose { "debug" } else { logging.level.as_str() };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if logging.format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn open_saved_locations(config: &DashboardConfig) -> Result<SavedLocations> {
    let path = config.storage_path();
    let store = LocalStore::open(&path)
        .with_context(|| format!("cannot open saved locations in {}", path.display()))?;
    Ok(SavedLocations::new(store))
}

fn build_dashboard(config: &DashboardConfig, view: Arc<TerminalView>) -> Result<Dashboard> {
    let client = OpenWeatherClient::new(&config.weather)?;
    let dashboard = Dashboard::new(
        Arc::new(client),
        view,
        open_saved_locations(config)?,
        DashboardSettings::from(config),
    );

    Ok(match config.home_position() {
        Some((latitude, longitude)) => {
            dashboard.with_position_source(Arc::new(FixedPosition::new(latitude, longitude)))
        }
        None => dashboard,
    })
}

/// Wait for the historical chart, then turn a failed update into an error
async fn finish(update: Option<LocationUpdate>) -> Result<bool> {
    let Some(mut update) = update else {
        return Ok(false);
    };

    if let Some(history) = update.history.take() {
        history.await.context("historical flow panicked")?;
    }

    match update.outcome {
        LocationOutcome::Rendered(snapshot) => {
            debug!("Rendered {}", snapshot.conditions.city_name);
            Ok(true)
        }
        LocationOutcome::Superseded => Ok(false),
        LocationOutcome::Failed(err) => Err(anyhow!(err.user_message())).context(err),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let opts = Opts::parse();

    let config = DashboardConfig::load_from_path(opts.config.clone())?;
    init_logging(&config.logging, opts.verbose);
    info!("{} {}", crate_name!(), weatherdash::VERSION);

    let view = Arc::new(TerminalView);

    match opts.subcmd {
        SubCommand::Saved => {
            let names = open_saved_locations(&config)?.load().await?;
            view.render_saved_locations(&names);
        }
        SubCommand::Coords {
            latitude,
            longitude,
        } => {
            let dashboard = build_dashboard(&config, view)?;
            finish(Some(dashboard.resolve_location(latitude, longitude).await)).await?;
        }
        SubCommand::Search { query } => {
            let dashboard = build_dashboard(&config, view)?;
            finish(dashboard.resolve_by_text_query(&query.join(" ")).await).await?;
        }
        SubCommand::Here => {
            let dashboard = build_dashboard(&config, view)?;
            finish(dashboard.resolve_by_current_device_position().await).await?;
        }
        SubCommand::Save { query } => {
            let dashboard = build_dashboard(&config, view)?;
            let update = dashboard.resolve_by_text_query(&query.join(" ")).await;
            if finish(update).await? {
                dashboard.add_current_location_to_saved().await;
            }
        }
    }

    Ok(())
}
