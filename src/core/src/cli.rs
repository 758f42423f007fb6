use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(about = "displayd - doze and under-display fingerprint helpers", version)]
pub struct Cli {
    #[clap(long, global = true, help = "Load configs from a TOML file")]
    pub config: Option<PathBuf>,

    #[clap(long, global = true, help = "Touchscreen command node")]
    pub tsp_cmd_path: Option<PathBuf>,

    #[clap(long, global = true, help = "Property carrying the finger state")]
    pub finger_prop: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Always-on display and touchscreen AOD control
    #[command(subcommand)]
    Doze(DozeCommand),

    /// Suspend night display and extra dim during fingerprint scans
    Udfps {
        #[clap(long, help = "Run as a daemon (usually used from a module's service.sh)")]
        daemon: bool,
    },

    /// Sunlight enhancement: pin the panel to high brightness, or print its state
    Sunlight { state: Option<Toggle> },
}

#[derive(Subcommand)]
pub enum DozeCommand {
    /// Print the doze and always-on preferences
    Status,
    /// Start or stop the doze service to match the preferences
    Check,
    /// Update the always-on preference, then re-check the doze service
    AlwaysOn { state: Toggle },
    /// Enable or disable the touchscreen AOD region
    Aod { state: Toggle },
    /// Program the fingerprint-on-display region
    Fod,
    /// Enable or disable the single tap wake gesture
    SingleTap { state: Toggle },
}

#[derive(Copy, Clone, ValueEnum)]
pub enum Toggle {
    On,
    Off,
}

impl From<Toggle> for bool {
    fn from(value: Toggle) -> Self {
        matches!(value, Toggle::On)
    }
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
