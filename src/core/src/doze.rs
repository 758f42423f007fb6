use crate::android::service::{InitServices, ServiceControl};
use crate::android::settings::{DOZE_ALWAYS_ON, DOZE_ENABLED, SecureSettings, SettingsStore};
use crate::cli::DozeCommand;
use crate::config::DisplaydConfigs;
use crate::tsp::{Bounds, CommandSink, Region, SysfsNode, TspCommand};
use anyhow::{Result, bail};
use displayd_utils::ext::ResultExt;
use log::{debug, info};

const AOD_REGION: Region = Region::new(872, 849, 78, 579);
const FOD_BOUNDS: Bounds = Bounds::new(426, 2031, 654, 2259);

// AmbientDisplayConfiguration defaults when the user never touched the toggles
const DOZE_ENABLED_DEFAULT: bool = true;
const ALWAYS_ON_DEFAULT: bool = false;

pub struct DozeController<S, C, W> {
    settings: S,
    services: C,
    tsp: W,
    service_name: String,
}

impl<S: SettingsStore, C: ServiceControl, W: CommandSink> DozeController<S, C, W> {
    pub fn new(settings: S, services: C, tsp: W, service_name: impl Into<String>) -> Self {
        Self {
            settings,
            services,
            tsp,
            service_name: service_name.into(),
        }
    }

    /// Pulse-on-notification preference of the current user.
    pub fn is_doze_enabled(&self) -> bool {
        self.settings
            .get_bool(DOZE_ENABLED, DOZE_ENABLED_DEFAULT)
            .ok_or_warn()
            .unwrap_or(DOZE_ENABLED_DEFAULT)
    }

    pub fn is_always_on_enabled(&self) -> bool {
        self.settings
            .get_bool(DOZE_ALWAYS_ON, ALWAYS_ON_DEFAULT)
            .ok_or_warn()
            .unwrap_or(ALWAYS_ON_DEFAULT)
    }

    pub fn enable_always_on(&self, enable: bool) -> bool {
        info!("always-on display -> {enable}");
        self.settings
            .put_bool(DOZE_ALWAYS_ON, enable)
            .ok_or_log("write always-on preference")
            .is_some()
    }

    pub fn check_doze_service(&self) {
        if self.is_doze_enabled() && self.is_always_on_enabled() {
            self.services.start(&self.service_name).log_if_error();
        } else {
            self.services.stop(&self.service_name).log_if_error();
        }
    }

    /// The AOD region is set after enabling and cleared before disabling.
    pub fn enable_aod(&self, enable: bool) {
        let commands = if enable {
            [TspCommand::AodEnable(true), TspCommand::SetAodRect(AOD_REGION)]
        } else {
            [TspCommand::SetAodRect(Region::EMPTY), TspCommand::AodEnable(false)]
        };

        self.send_all(&commands);
    }

    pub fn setup_fod(&self) {
        self.send_all(&[TspCommand::SetFodRect(FOD_BOUNDS), TspCommand::FodEnable]);
    }

    /// Wake on a single tap while the screen is off.
    pub fn enable_single_tap(&self, enable: bool) -> bool {
        self.tsp.send(TspCommand::SingleTapEnable(enable))
    }

    fn send_all(&self, commands: &[TspCommand]) {
        for command in commands {
            if !self.tsp.send(*command) {
                debug!("{command} was not applied");
            }
        }
    }
}

pub fn dispatch(command: DozeCommand) -> Result<()> {
    let config = DisplaydConfigs::instance();
    let controller = DozeController::new(
        SecureSettings::current_user(),
        InitServices,
        SysfsNode::new(&config.tsp_cmd_path),
        &config.doze_service,
    );

    match command {
        DozeCommand::Status => {
            println!("doze_enabled={}", controller.is_doze_enabled());
            println!("always_on_enabled={}", controller.is_always_on_enabled());
        }
        DozeCommand::Check => controller.check_doze_service(),
        DozeCommand::AlwaysOn { state } => {
            if !controller.enable_always_on(state.into()) {
                bail!("failed to update always-on preference");
            }
            controller.check_doze_service();
        }
        DozeCommand::Aod { state } => controller.enable_aod(state.into()),
        DozeCommand::Fod => controller.setup_fod(),
        DozeCommand::SingleTap { state } => {
            if !controller.enable_single_tap(state.into()) {
                bail!("failed to update single tap gesture");
            }
        }
    }

    Ok(())
}
