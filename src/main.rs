mod app;
mod config;
mod daynight;
mod error;
mod host;
mod pet;
mod platform;
mod sprite;
mod timer;
mod tray;

use clap::Parser;

fn main() {
    env_logger::init();
    let args = config::Args::parse();
    log::info!("Chill starting up");

    if let Err(e) = app::run(config::PetConfig::from_args(&args)) {
        log::error!("Fatal error: {e}");
        std::process::exit(1);
    }
}
