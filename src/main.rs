// Copyright 2026 Qupid Contributors
// SPDX-License-Identifier: Apache-2.0

//! Qupid server and command-line runner
//!
//! # Usage
//!
//! ```bash
//! # Start the REST server
//! qupid serve
//!
//! # Start with custom config
//! qupid --config /path/to/config.yaml serve --port 8080
//!
//! # Simulate the demo couple and save the plot
//! qupid run --plot-out dynamics.svg
//!
//! # Simulate a saved 14-field request
//! qupid run --params request.json --json
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use base64::Engine;
use clap::{Parser, Subcommand};
use serde_json::Value;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use qupid_floquet::{
    config::{Config, LoggingConfig},
    params::SimulationParameters,
    render::{SvgRenderer, TrajectoryRenderer},
    run_simulation, server,
    validation::validate_run_request,
    Error, Result, VERSION,
};

/// Qupid Floquet-Markov relationship engine
#[derive(Parser)]
#[command(name = "qupid")]
#[command(author = "Qupid Contributors")]
#[command(version = VERSION)]
#[command(about = "Floquet-Markov simulation behind the Qupid relationship report")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the REST server
    Serve {
        /// REST port
        #[arg(long, env = "QUPID_PORT")]
        port: Option<u16>,
    },

    /// Run one simulation and print the report
    Run {
        /// JSON file holding a 14-field request (defaults to the demo couple)
        #[arg(long)]
        params: Option<PathBuf>,

        /// Write the trajectory plot (SVG) to this file
        #[arg(long)]
        plot_out: Option<PathBuf>,

        /// Print the JSON output instead of the report text
        #[arg(long)]
        json: bool,
    },

    /// Show effective configuration
    Config,

    /// Validate configuration file
    Validate,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())?;
    init_logging(&config.logging);

    match cli.command {
        Commands::Serve { port } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            config.validate()?;

            info!(
                version = VERSION,
                port = config.server.port,
                render = config.render.enabled,
                "Starting Qupid server"
            );

            server::run_server(Arc::new(server::ServerState::new(config))).await?;
        }

        Commands::Run {
            params,
            plot_out,
            json,
        } => {
            config.validate()?;

            let params = match params {
                Some(path) => {
                    let body: Value = serde_json::from_str(&std::fs::read_to_string(&path)?)?;
                    SimulationParameters::from_request(validate_run_request(&body)?)
                }
                None => SimulationParameters::default(),
            };

            let renderer = (config.render.enabled || plot_out.is_some())
                .then(|| SvgRenderer::from_config(&config.render));
            let settings = config.simulation.clone();
            let report = tokio::task::spawn_blocking(move || {
                let renderer = renderer.as_ref().map(|r| r as &dyn TrajectoryRenderer);
                run_simulation(&params, &settings, renderer)
            })
            .await
            .map_err(|e| Error::Server(format!("simulation task failed: {}", e)))??;

            if let (Some(path), Some(plot)) = (&plot_out, &report.plot_base64) {
                let svg = base64::engine::general_purpose::STANDARD
                    .decode(plot)
                    .map_err(|e| Error::Render(format!("plot is not valid base64: {}", e)))?;
                std::fs::write(path, svg)?;
                info!(path = %path.display(), "Plot written");
            }

            if json {
                println!("{}", serde_json::to_string_pretty(&report.output())?);
            } else {
                println!("{}", report.report_text);
            }
        }

        Commands::Config => {
            println!("{}", serde_yaml::to_string(&config)?);
        }

        Commands::Validate => match config.validate() {
            Ok(()) => {
                println!("Configuration is valid");
            }
            Err(e) => {
                eprintln!("Configuration error: {}", e);
                std::process::exit(1);
            }
        },
    }

    Ok(())
}

/// Initialize logging with tracing.
///
/// `RUST_LOG` takes precedence over the configured level.
fn init_logging(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let registry = tracing_subscriber::registry().with(filter);
    if logging.format == "json" {
        registry.with(fmt::layer().json().with_target(true)).init();
    } else {
        registry.with(fmt::layer().pretty().with_target(true)).init();
    }
}
