mod android;
mod cli;
mod color;
mod config;
mod daemon;
mod doze;
#[cfg(test)]
mod mock;
mod sunlight;
mod tsp;
mod udfps;

use crate::cli::{Cli, Command};
use crate::config::DisplaydConfigs;
use anyhow::Result;
use log::LevelFilter;
use tokio::runtime::Builder;

#[cfg(target_os = "android")]
fn init_logcat(level: LevelFilter) -> bool {
    // RUST_LOG means we were started from a shell, keep output on stderr
    if std::env::var_os("RUST_LOG").is_some() {
        return false;
    }

    android_logger::init_once(
        android_logger::Config::default()
            .with_max_level(level)
            .with_tag("displayd"),
    );

    true
}

#[cfg(not(target_os = "android"))]
fn init_logcat(_level: LevelFilter) -> bool {
    false
}

fn init_logger() {
    let level = if cfg!(debug_assertions) {
        LevelFilter::Trace
    } else {
        LevelFilter::Info
    };

    if !init_logcat(level) {
        env_logger::Builder::new()
            .filter_level(level)
            .parse_default_env()
            .init();
    }
}

fn main() -> Result<()> {
    init_logger();

    let args = Cli::parse_args();
    DisplaydConfigs::init(&args)?;

    match args.command {
        Command::Doze(command) => doze::dispatch(command),
        Command::Sunlight { state } => sunlight::dispatch(state.map(Into::into)),
        Command::Udfps { daemon: true } => daemon::launch_daemon(),
        Command::Udfps { daemon: false } => {
            daemon::daemonize_if_needed()?;

            Builder::new_current_thread()
                .enable_all()
                .build()?
                .block_on(udfps::serve())
        }
    }
}
