use std::sync::Arc;

use clap::Parser;
use lingo_config::Config;

pub mod cli;
pub mod commands;
pub mod controller;
pub mod events;
pub mod logging;
pub mod state;


use self::cli::Cli;
use self::controller::AppController;
use self::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = cli.apply(Config::new());

    logging::init_logging(config.log_json);

    let state = Arc::new(AppState::new(config));
    let controller = AppController::new(state);

    controller.run(cli.command).await
}
