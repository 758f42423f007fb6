use crate::config::DisplaydConfigs;
use anyhow::{Context, Result};
use displayd_misc::props;
use log::{debug, info};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Panel brightness used while sunlight enhancement is on.
pub const SUNLIGHT_BRIGHTNESS: &str = "365";

pub trait BrightnessNode {
    fn is_accessible(&self) -> bool;
    fn read(&self) -> Result<String>;
    fn write(&self, value: &str) -> Result<()>;
}

pub struct SysfsBrightness {
    path: PathBuf,
}

impl SysfsBrightness {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl BrightnessNode for SysfsBrightness {
    fn is_accessible(&self) -> bool {
        OpenOptions::new()
            .read(true)
            .write(true)
            .open(&self.path)
            .is_ok()
    }

    fn read(&self) -> Result<String> {
        let value = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read {}", self.path.display()))?;

        Ok(value.trim().to_string())
    }

    fn write(&self, value: &str) -> Result<()> {
        OpenOptions::new()
            .write(true)
            .truncate(true)
            .open(&self.path)
            .and_then(|mut file| file.write_all(value.as_bytes()))
            .with_context(|| format!("failed to write {value} to {}", self.path.display()))
    }
}

/// Pins the backlight to [`SUNLIGHT_BRIGHTNESS`]. The brightness it replaced is
/// kept in a property so a later invocation can put it back.
pub struct SunlightEnhancement<N> {
    node: N,
    saved_prop: String,
}

impl<N: BrightnessNode> SunlightEnhancement<N> {
    pub fn new(node: N, saved_prop: &str) -> Self {
        Self {
            node,
            saved_prop: saved_prop.into(),
        }
    }

    pub fn is_supported(&self) -> bool {
        self.node.is_accessible()
    }

    pub fn is_enabled(&self) -> Result<bool> {
        Ok(self.node.read()? == SUNLIGHT_BRIGHTNESS)
    }

    pub fn set_enabled(&self, enable: bool) -> Result<()> {
        if enable {
            let current = self.node.read()?;

            // already boosted, keep the value saved by the first enable
            if current != SUNLIGHT_BRIGHTNESS {
                props::set(&self.saved_prop, &current)?;
            }

            self.node.write(SUNLIGHT_BRIGHTNESS)?;
            info!("sunlight enhancement on, saved brightness {current}");
            return Ok(());
        }

        let Some(saved) = props::get(&self.saved_prop) else {
            debug!("no saved brightness, leaving the panel alone");
            return Ok(());
        };

        self.node.write(&saved)?;
        props::set(&self.saved_prop, "")?;
        info!("sunlight enhancement off, brightness back to {}", &*saved);

        Ok(())
    }
}

pub fn dispatch(state: Option<bool>) -> Result<()> {
    let config = DisplaydConfigs::instance();
    let sunlight = SunlightEnhancement::new(
        SysfsBrightness::new(&config.brightness_path),
        &config.sunlight_saved_prop,
    );

    match state {
        Some(enable) => sunlight.set_enabled(enable)?,
        None => {
            let supported = sunlight.is_supported();
            println!("supported={supported}");
            if supported {
                println!("enabled={}", sunlight.is_enabled()?);
            }
        }
    }

    Ok(())
}
