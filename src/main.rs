mod config;
mod console;
mod error;
mod game;

use anyhow::Result;
use config::GameConfig;

fn main() -> Result<()> {
    // Diagnostics go to stderr. Control verbosity with RUST_LOG:
    //   RUST_LOG=info   wonderland        # rounds, restarts, quit
    //   RUST_LOG=debug  wonderland        # + transitions, effects, round summaries
    //   RUST_LOG=trace  wonderland        # + raw input lines
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp_millis()
        .init();

    // Usage: wonderland [seed] [wrap_width]
    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = GameConfig::from_args(&args);

    log::info!("Starting with {config:?}");

    game::run(&config)
}
