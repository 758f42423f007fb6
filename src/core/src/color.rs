use crate::android::settings::{
    NIGHT_DISPLAY_ACTIVATED, NIGHT_DISPLAY_COLOR_TEMPERATURE, REDUCE_BRIGHT_COLORS_ACTIVATED,
    SettingsStore,
};
use anyhow::Result;

/// AOSP's default white balance.
pub const NEUTRAL_TEMPERATURE: i32 = 6500;

// config_nightDisplayColorTemperatureDefault
const DEFAULT_NIGHT_TEMPERATURE: i32 = 2850;

/// The subset of the platform color display manager used while a finger is on the sensor.
pub trait ColorDisplay {
    fn night_display_temperature(&self) -> Result<i32>;
    fn set_night_display_temperature(&self, kelvin: i32) -> Result<()>;
    fn is_night_display_activated(&self) -> Result<bool>;
    fn is_reduce_bright_colors_activated(&self) -> Result<bool>;
    fn set_reduce_bright_colors_activated(&self, activated: bool) -> Result<()>;
}

/// Color display state backed by the secure settings that `ColorDisplayService` observes.
pub struct SettingsColorDisplay<S> {
    settings: S,
}

impl<S: SettingsStore> SettingsColorDisplay<S> {
    pub fn new(settings: S) -> Self {
        Self { settings }
    }
}

impl<S: SettingsStore> ColorDisplay for SettingsColorDisplay<S> {
    fn night_display_temperature(&self) -> Result<i32> {
        Ok(self
            .settings
            .get_int(NIGHT_DISPLAY_COLOR_TEMPERATURE)?
            .unwrap_or(DEFAULT_NIGHT_TEMPERATURE))
    }

    fn set_night_display_temperature(&self, kelvin: i32) -> Result<()> {
        self.settings.put_int(NIGHT_DISPLAY_COLOR_TEMPERATURE, kelvin)
    }

    fn is_night_display_activated(&self) -> Result<bool> {
        self.settings.get_bool(NIGHT_DISPLAY_ACTIVATED, false)
    }

    fn is_reduce_bright_colors_activated(&self) -> Result<bool> {
        self.settings.get_bool(REDUCE_BRIGHT_COLORS_ACTIVATED, false)
    }

    fn set_reduce_bright_colors_activated(&self, activated: bool) -> Result<()> {
        self.settings.put_bool(REDUCE_BRIGHT_COLORS_ACTIVATED, activated)
    }
}
