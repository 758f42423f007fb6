//! Keeps night display and extra dim out of the way of the under-display
//! fingerprint sensor while a finger is on it.
//!
//! The sensor side publishes contact through a system property. The loop
//! samples it, neutralizes the color filters on `"1"`, and writes `"0"` back
//! so that the first sample after the scan hold restores them. The restore
//! resets the property to `"-1"`.

use crate::android::settings::SecureSettings;
use crate::color::{ColorDisplay, NEUTRAL_TEMPERATURE, SettingsColorDisplay};
use crate::config::DisplaydConfigs;
use crate::daemon;
use anyhow::{Context, Result};
use displayd_misc::{debug_on, props};
use displayd_utils::ext::ResultExt;
use log::{debug, error, info, trace};
use std::time::Duration;
use strum_macros::{AsRefStr, EnumString};
use tokio::time;

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, AsRefStr, EnumString)]
pub enum FingerState {
    #[default]
    #[strum(serialize = "-1")]
    Unknown,
    #[strum(serialize = "0")]
    Up,
    #[strum(serialize = "1")]
    Down,
}

impl FingerState {
    /// Anything that is not exactly `"0"` or `"1"` reads as unknown.
    pub fn parse(value: Option<&str>) -> Self {
        value.and_then(|v| v.parse().ok()).unwrap_or_default()
    }
}

pub trait FingerSignal {
    fn get(&self) -> FingerState;
    fn set(&self, state: FingerState) -> Result<()>;
}

pub struct PropertySignal {
    name: String,
}

impl PropertySignal {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl FingerSignal for PropertySignal {
    fn get(&self) -> FingerState {
        FingerState::parse(props::get(&self.name).as_deref())
    }

    fn set(&self, state: FingerState) -> Result<()> {
        props::set(&self.name, state.as_ref())
    }
}

/// Display state captured when a finger lands, restored when it lifts.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct DimState {
    pub saved_temperature: i32,
    pub extra_dim_was_active: bool,
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Idle,
    /// Filters neutralized, scan hold in progress.
    Contacting,
    Contacted,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Transition {
    None,
    Dimmed,
    Restored,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Timing {
    pub poll_interval: Duration,
    pub scan_hold: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(100),
            scan_hold: Duration::from_millis(2000),
        }
    }
}

impl Transition {
    /// Time until the next sample.
    pub fn delay(self, timing: &Timing) -> Duration {
        match self {
            Transition::Dimmed => timing.scan_hold + timing.poll_interval,
            Transition::None | Transition::Restored => timing.poll_interval,
        }
    }
}

pub struct UdfpsDimmer<C, F> {
    color: C,
    signal: F,
    timing: Timing,
    phase: Phase,
    dim: DimState,
}

impl<C: ColorDisplay, F: FingerSignal> UdfpsDimmer<C, F> {
    pub fn new(color: C, signal: F, timing: Timing) -> Self {
        Self {
            color,
            signal,
            timing,
            phase: Phase::Idle,
            dim: DimState::default(),
        }
    }

    #[cfg(test)]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[cfg(test)]
    pub fn dim_state(&self) -> DimState {
        self.dim
    }

    fn reset(&mut self) {
        self.phase = Phase::Idle;
        self.dim = DimState::default();
        self.signal
            .set(FingerState::Unknown)
            .ok_or_log("reset finger state");
    }

    /// Samples the signal once and applies the resulting transition.
    pub fn step(&mut self) -> Transition {
        if self.phase == Phase::Contacting {
            self.phase = Phase::Contacted;
        }

        let state = self.signal.get();

        if debug_on!("udfps") {
            trace!("sample {state:?} in {:?}", self.phase);
        }

        match state {
            FingerState::Down if self.phase == Phase::Idle => match self.disable() {
                Ok(()) => Transition::Dimmed,
                Err(err) => {
                    error!("failed to dim for finger down: {err:?}");
                    Transition::None
                }
            },
            FingerState::Down => {
                // a scan is already dimmed, only hand the signal back to the restore path
                self.signal
                    .set(FingerState::Up)
                    .ok_or_log("acknowledge repeated finger down");
                Transition::None
            }
            FingerState::Up => self.enable(),
            FingerState::Unknown => Transition::None,
        }
    }

    fn disable(&mut self) -> Result<()> {
        debug!("finger down, turning night display and extra dim off");

        let saved_temperature = self
            .color
            .night_display_temperature()
            .context("failed to read night display temperature")?;
        let night_display = self
            .color
            .is_night_display_activated()
            .context("failed to read night display state")?;
        let extra_dim = self
            .color
            .is_reduce_bright_colors_activated()
            .context("failed to read extra dim state")?;

        self.dim = DimState {
            saved_temperature,
            extra_dim_was_active: extra_dim,
        };
        self.phase = Phase::Contacting;

        if night_display {
            self.color
                .set_night_display_temperature(NEUTRAL_TEMPERATURE)
                .ok_or_log("neutralize night display");
        }

        if extra_dim {
            self.color
                .set_reduce_bright_colors_activated(false)
                .ok_or_log("turn extra dim off");
        }

        self.signal
            .set(FingerState::Up)
            .ok_or_log("acknowledge finger down");

        Ok(())
    }

    fn enable(&mut self) -> Transition {
        self.signal
            .set(FingerState::Unknown)
            .ok_or_log("acknowledge finger up");

        if self.phase == Phase::Idle {
            debug!("finger up without a dimmed scan, nothing to restore");
            return Transition::None;
        }

        debug!("finger up, restoring night display and extra dim: {:?}", self.dim);

        self.color
            .set_night_display_temperature(self.dim.saved_temperature)
            .ok_or_log("restore night display temperature");
        self.color
            .set_reduce_bright_colors_activated(self.dim.extra_dim_was_active)
            .ok_or_log("restore extra dim");

        self.phase = Phase::Idle;
        self.dim = DimState::default();

        Transition::Restored
    }

    /// Polls until `shutdown` resolves. A scan still in progress at that
    /// point gets its display state restored.
    pub async fn run<S: Future<Output = ()>>(mut self, shutdown: S) {
        self.reset();
        tokio::pin!(shutdown);

        let mut delay = Duration::ZERO;

        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                _ = time::sleep(delay) => {}
            }

            delay = self.step().delay(&self.timing);
        }

        if self.phase != Phase::Idle {
            info!("stopping during a scan, restoring display state");
            self.enable();
        }
    }
}

pub async fn serve() -> Result<()> {
    let config = DisplaydConfigs::instance();
    let timing = config.timing();

    let dimmer = UdfpsDimmer::new(
        SettingsColorDisplay::new(SecureSettings::current_user()),
        PropertySignal::new(&config.finger_prop),
        timing,
    );
    let shutdown = daemon::shutdown_signal()?;

    info!(
        "watching {} every {:?} (hold {:?})",
        config.finger_prop, timing.poll_interval, timing.scan_hold
    );
    daemon::notify_launcher_if_needed();

    dimmer.run(shutdown).await;
    info!("udfps dimmer stopped");

    Ok(())
}
