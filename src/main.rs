use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use atm_finder::{
    config::Config,
    engine::{EngineBuilder, EngineSettings},
    geo::Coordinate,
    geolocation::StaticGeolocation,
    state::{AppState, Transition, WithdrawAmount},
    view::StateView,
    web::{self, WebServerConfig},
};

#[derive(Debug, Parser)]
#[command(author, version, about = "Nearby ATM finder")]
struct Cli {
    /// Path to the YAML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the random seed used for generated ATMs
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve the map page; the browser supplies its own position
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
    /// Print ATMs around a fixed coordinate
    Nearby {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lng: f64,
        /// Withdrawal amount in rupees
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        amount: String,
        /// Print the full view as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => Config::from_yaml(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => Config::default(),
    };

    tracing_subscriber::fmt()
        .with_max_level(config.logging.tracing_level()?)
        .init();

    let engine = EngineBuilder::new(EngineSettings {
        seed: cli.seed.or(config.random_seed),
    })
    .build();

    match cli.command {
        Command::Serve { host, port } => {
            info!("Starting {} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
            web::run(WebServerConfig {
                engine,
                map: config.map.clone(),
                host: host.unwrap_or(config.server.host),
                port: port.unwrap_or(config.server.port),
            })
            .await
        }
        Command::Nearby {
            lat,
            lng,
            amount,
            json,
        } => {
            let mut engine = engine;
            let mut state = AppState::new();
            let provider = StaticGeolocation::new(Coordinate::new(lat, lng));
            engine.run(&mut state, &provider).await;
            state.apply(Transition::AmountChanged(WithdrawAmount::coerce(&amount)));

            let view = StateView::from_state(&state, &config.map);
            if json {
                println!("{}", serde_json::to_string_pretty(&view)?);
            } else {
                println!("Nearby ATMs (seed {})", engine.seed());
                for entry in &view.entries {
                    let badge = if entry.show_cash_badge {
                        "  [Cash Available]"
                    } else {
                        ""
                    };
                    println!("{:<8}{:>10}{badge}", entry.label, entry.distance_text);
                }
            }
            Ok(())
        }
    }
}
