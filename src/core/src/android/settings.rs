use anyhow::{Context, Result, bail};
use log::trace;
use std::process::Command;

const SETTINGS_BIN: &str = "/system/bin/settings";

pub const DOZE_ENABLED: &str = "doze_enabled";
pub const DOZE_ALWAYS_ON: &str = "doze_always_on";
pub const NIGHT_DISPLAY_ACTIVATED: &str = "night_display_activated";
pub const NIGHT_DISPLAY_COLOR_TEMPERATURE: &str = "night_display_color_temperature";
pub const REDUCE_BRIGHT_COLORS_ACTIVATED: &str = "reduce_bright_colors_activated";

/// Key/value access to the secure settings table of one user.
pub trait SettingsStore {
    /// `None` when the key has never been written.
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn put(&self, key: &str, value: &str) -> Result<()>;

    fn get_int(&self, key: &str) -> Result<Option<i32>> {
        let Some(value) = self.get(key)? else {
            return Ok(None);
        };

        value
            .parse()
            .map(Some)
            .with_context(|| format!("{key} is not an integer: {value:?}"))
    }

    fn get_bool(&self, key: &str, fallback: bool) -> Result<bool> {
        Ok(self.get_int(key)?.map_or(fallback, |value| value != 0))
    }

    fn put_int(&self, key: &str, value: i32) -> Result<()> {
        self.put(key, &value.to_string())
    }

    fn put_bool(&self, key: &str, value: bool) -> Result<()> {
        self.put_int(key, value as i32)
    }
}

/// Secure settings reached through the platform `settings` tool.
pub struct SecureSettings {
    user: String,
}

impl SecureSettings {
    pub fn current_user() -> Self {
        Self {
            user: "current".into(),
        }
    }

    fn exec(&self, args: &[&str]) -> Result<String> {
        let output = Command::new(SETTINGS_BIN)
            .arg("--user")
            .arg(&self.user)
            .args(args)
            .output()
            .context("failed to execute `settings`")?;

        if !output.status.success() {
            bail!(
                "`settings {}` exited with {}: {}",
                args.join(" "),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

impl SettingsStore for SecureSettings {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self.exec(&["get", "secure", key])?;
        trace!("secure {key} = {value:?}");

        if value.is_empty() || value == "null" {
            Ok(None)
        } else {
            Ok(Some(value))
        }
    }

    fn put(&self, key: &str, value: &str) -> Result<()> {
        trace!("secure {key} <- {value:?}");
        self.exec(&["put", "secure", key, value]).map(|_| ())
    }
}
