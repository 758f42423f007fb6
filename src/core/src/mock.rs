//! In-memory stand-ins for the platform capabilities.

use crate::android::service::ServiceControl;
use crate::android::settings::SettingsStore;
use crate::color::ColorDisplay;
use crate::sunlight::BrightnessNode;
use crate::tsp::CommandSink;
use crate::udfps::{FingerSignal, FingerState};
use anyhow::{Result, bail};
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

#[derive(Clone, Default)]
pub struct MockSettings {
    values: Arc<Mutex<HashMap<String, String>>>,
    read_only: Arc<Mutex<bool>>,
}

impl MockSettings {
    pub fn with(pairs: &[(&str, &str)]) -> Self {
        let settings = Self::default();
        {
            let mut values = settings.values.lock();
            for (key, value) in pairs {
                values.insert(key.to_string(), value.to_string());
            }
        }
        settings
    }

    pub fn value(&self, key: &str) -> Option<String> {
        self.values.lock().get(key).cloned()
    }

    pub fn fail_writes(&self) {
        *self.read_only.lock() = true;
    }
}

impl SettingsStore for MockSettings {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.value(key))
    }

    fn put(&self, key: &str, value: &str) -> Result<()> {
        if *self.read_only.lock() {
            bail!("settings provider rejected {key}");
        }
        self.values.lock().insert(key.into(), value.into());
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceCall {
    Start(String),
    Stop(String),
}

#[derive(Clone, Default)]
pub struct MockServices {
    calls: Arc<Mutex<Vec<ServiceCall>>>,
}

impl MockServices {
    pub fn calls(&self) -> Vec<ServiceCall> {
        self.calls.lock().clone()
    }
}

impl ServiceControl for MockServices {
    fn start(&self, name: &str) -> Result<()> {
        self.calls.lock().push(ServiceCall::Start(name.into()));
        Ok(())
    }

    fn stop(&self, name: &str) -> Result<()> {
        self.calls.lock().push(ServiceCall::Stop(name.into()));
        Ok(())
    }
}

#[derive(Default)]
struct SinkLog {
    attempted: Vec<String>,
    applied: Vec<String>,
}

#[derive(Clone, Default)]
pub struct MockSink {
    log: Arc<Mutex<SinkLog>>,
    fail_at: Option<usize>,
}

impl MockSink {
    /// Rejects the write with the given attempt index.
    pub fn failing_at(index: usize) -> Self {
        Self {
            fail_at: Some(index),
            ..Default::default()
        }
    }

    pub fn writes(&self) -> Vec<String> {
        self.log.lock().attempted.clone()
    }

    pub fn applied(&self) -> Vec<String> {
        self.log.lock().applied.clone()
    }
}

impl CommandSink for MockSink {
    fn write_line(&self, line: &str) -> bool {
        let mut log = self.log.lock();
        let index = log.attempted.len();
        log.attempted.push(line.into());

        if self.fail_at == Some(index) {
            return false;
        }

        log.applied.push(line.into());
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorCall {
    Temperature(i32),
    ExtraDim(bool),
}

struct ColorInner {
    night_display: bool,
    temperature: i32,
    extra_dim: bool,
    fail_reads: bool,
    writes: Vec<ColorCall>,
}

#[derive(Clone)]
pub struct MockColorDisplay {
    inner: Arc<Mutex<ColorInner>>,
}

impl MockColorDisplay {
    pub fn new(night_display: bool, temperature: i32, extra_dim: bool) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ColorInner {
                night_display,
                temperature,
                extra_dim,
                fail_reads: false,
                writes: Vec::new(),
            })),
        }
    }

    /// Changes the user-visible state without recording a write.
    pub fn set_state(&self, night_display: bool, temperature: i32, extra_dim: bool) {
        let mut inner = self.inner.lock();
        inner.night_display = night_display;
        inner.temperature = temperature;
        inner.extra_dim = extra_dim;
    }

    pub fn fail_reads(&self) {
        self.inner.lock().fail_reads = true;
    }

    pub fn temperature(&self) -> i32 {
        self.inner.lock().temperature
    }

    pub fn extra_dim(&self) -> bool {
        self.inner.lock().extra_dim
    }

    pub fn writes(&self) -> Vec<ColorCall> {
        self.inner.lock().writes.clone()
    }

    fn read<T>(&self, f: impl FnOnce(&ColorInner) -> T) -> Result<T> {
        let inner = self.inner.lock();
        if inner.fail_reads {
            bail!("color display service unavailable");
        }
        Ok(f(&inner))
    }
}

impl ColorDisplay for MockColorDisplay {
    fn night_display_temperature(&self) -> Result<i32> {
        self.read(|inner| inner.temperature)
    }

    fn set_night_display_temperature(&self, kelvin: i32) -> Result<()> {
        let mut inner = self.inner.lock();
        inner.temperature = kelvin;
        inner.writes.push(ColorCall::Temperature(kelvin));
        Ok(())
    }

    fn is_night_display_activated(&self) -> Result<bool> {
        self.read(|inner| inner.night_display)
    }

    fn is_reduce_bright_colors_activated(&self) -> Result<bool> {
        self.read(|inner| inner.extra_dim)
    }

    fn set_reduce_bright_colors_activated(&self, activated: bool) -> Result<()> {
        let mut inner = self.inner.lock();
        inner.extra_dim = activated;
        inner.writes.push(ColorCall::ExtraDim(activated));
        Ok(())
    }
}

#[derive(Default)]
struct SignalInner {
    value: FingerState,
    script: VecDeque<FingerState>,
    reads: usize,
    writes: Vec<FingerState>,
}

/// A property cell; scripted samples take precedence over the stored value.
#[derive(Clone, Default)]
pub struct MockSignal {
    inner: Arc<Mutex<SignalInner>>,
}

impl MockSignal {
    pub fn scripted(samples: &[FingerState]) -> Self {
        let signal = Self::default();
        signal.inner.lock().script.extend(samples);
        signal
    }

    /// A write from the sensor side: replaces the value without recording it.
    pub fn produce(&self, state: FingerState) {
        self.inner.lock().value = state;
    }

    pub fn push(&self, sample: FingerState) {
        self.inner.lock().script.push_back(sample);
    }

    pub fn reads(&self) -> usize {
        self.inner.lock().reads
    }

    pub fn writes(&self) -> Vec<FingerState> {
        self.inner.lock().writes.clone()
    }
}

impl FingerSignal for MockSignal {
    fn get(&self) -> FingerState {
        let mut inner = self.inner.lock();
        inner.reads += 1;
        if let Some(sample) = inner.script.pop_front() {
            inner.value = sample;
        }
        inner.value
    }

    fn set(&self, state: FingerState) -> Result<()> {
        let mut inner = self.inner.lock();
        inner.value = state;
        inner.writes.push(state);
        Ok(())
    }
}

#[derive(Default)]
struct BrightnessInner {
    value: String,
    writes: Vec<String>,
}

#[derive(Clone, Default)]
pub struct MockBrightness {
    inner: Arc<Mutex<BrightnessInner>>,
    missing: bool,
}

impl MockBrightness {
    pub fn new(value: &str) -> Self {
        let node = Self::default();
        node.inner.lock().value = value.into();
        node
    }

    pub fn missing() -> Self {
        Self {
            missing: true,
            ..Default::default()
        }
    }

    pub fn value(&self) -> String {
        self.inner.lock().value.clone()
    }

    pub fn writes(&self) -> Vec<String> {
        self.inner.lock().writes.clone()
    }
}

impl BrightnessNode for MockBrightness {
    fn is_accessible(&self) -> bool {
        !self.missing
    }

    fn read(&self) -> Result<String> {
        if self.missing {
            bail!("no backlight node");
        }
        Ok(self.value())
    }

    fn write(&self, value: &str) -> Result<()> {
        if self.missing {
            bail!("no backlight node");
        }
        let mut inner = self.inner.lock();
        inner.value = value.into();
        inner.writes.push(value.into());
        Ok(())
    }
}
