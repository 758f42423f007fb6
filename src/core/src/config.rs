use crate::cli::Cli;
use crate::udfps::Timing;
use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Duration;

static INSTANCE: OnceLock<DisplaydConfigs> = OnceLock::new();

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DisplaydConfigs {
    pub tsp_cmd_path: PathBuf,
    pub finger_prop: String,
    pub doze_service: String,
    pub poll_interval_ms: u64,
    pub scan_hold_ms: u64,
    pub brightness_path: PathBuf,
    pub sunlight_saved_prop: String,
}

impl Default for DisplaydConfigs {
    fn default() -> Self {
        Self {
            tsp_cmd_path: PathBuf::from("/sys/class/sec/tsp/cmd"),
            finger_prop: "vendor.finger.down".into(),
            doze_service: "vendor.displayd.doze".into(),
            poll_interval_ms: 100,
            scan_hold_ms: 2000,
            brightness_path: PathBuf::from("/sys/class/backlight/panel0-backlight/brightness"),
            sunlight_saved_prop: "vendor.displayd.sunlight.saved".into(),
        }
    }
}

impl DisplaydConfigs {
    pub fn init(cli: &Cli) -> Result<()> {
        let config = Self::load(cli)?;

        INSTANCE
            .set(config)
            .map_err(|_| anyhow!("duplicate called"))?;

        Ok(())
    }

    pub fn instance() -> &'static Self {
        INSTANCE.get().expect("configs not initialized")
    }

    pub fn timing(&self) -> Timing {
        Timing {
            poll_interval: Duration::from_millis(self.poll_interval_ms),
            scan_hold: Duration::from_millis(self.scan_hold_ms),
        }
    }

    fn load(cli: &Cli) -> Result<Self> {
        let mut config = match &cli.config {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        config.apply_cli(cli);
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;

        Self::from_toml(&text).with_context(|| format!("invalid config {}", path.display()))
    }

    fn from_toml(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;

        if config.poll_interval_ms == 0 {
            return Err(anyhow!("poll_interval_ms must be positive"));
        }

        Ok(config)
    }

    fn apply_cli(&mut self, cli: &Cli) {
        if let Some(path) = &cli.tsp_cmd_path {
            self.tsp_cmd_path = path.clone();
        }

        if let Some(prop) = &cli.finger_prop {
            self.finger_prop = prop.clone();
        }
    }
}
