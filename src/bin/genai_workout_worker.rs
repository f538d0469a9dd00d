// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # GenAI Workout Worker Binary
//!
//! Loads configuration, wires the plan generator and serves the HTTP routes.

use anyhow::{Context, Result};
use clap::Parser;
use flexfit_genai_worker::{
    config::ServerConfig,
    logging,
    planner::WorkoutPlanGenerator,
    routes::{self, AppState},
};
use std::net::{IpAddr, SocketAddr};
use tracing::info;

#[derive(Parser)]
#[command(name = "genai-workout-worker")]
#[command(about = "FlexFit workout plan generation worker")]
#[command(version)]
pub struct Args {
    /// Port to listen on (overrides configuration)
    #[arg(short, long)]
    port: Option<u16>,

    /// Configuration file path (TOML)
    #[arg(short, long)]
    config: Option<String>,

    /// Force mock synthesis regardless of configuration
    #[arg(long, default_value = "false")]
    mock: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    logging::init_from_env()?;

    let mut config = ServerConfig::load(args.config)?;
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if args.mock {
        config.generation.mock_mode = true;
    }
    config.validate()?;

    info!("{}", config.summary());

    let generator = WorkoutPlanGenerator::from_config(&config)?;

    let host: IpAddr = config
        .server
        .host
        .parse()
        .with_context(|| format!("Invalid bind address: {}", config.server.host))?;
    let addr = SocketAddr::new(host, config.server.port);

    let routes = routes::routes(AppState::new(generator, config.server.clone()));

    info!("Workout worker listening on {}", addr);
    warp::serve(routes).run(addr).await;

    Ok(())
}
