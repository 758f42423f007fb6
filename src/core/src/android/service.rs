use anyhow::{Context, Result};
use displayd_misc::props;
use log::{debug, info};
use strum_macros::EnumString;

#[derive(Debug, Copy, Clone, PartialEq, Eq, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum ServiceState {
    Running,
    Restarting,
    Stopping,
    Stopped,
}

pub trait ServiceControl {
    fn start(&self, name: &str) -> Result<()>;
    fn stop(&self, name: &str) -> Result<()>;
}

/// Services managed by init, driven through `ctl.start` / `ctl.stop`.
pub struct InitServices;

impl InitServices {
    pub fn state(name: &str) -> Option<ServiceState> {
        props::get(&format!("init.svc.{name}"))?.parse().ok()
    }
}

impl ServiceControl for InitServices {
    fn start(&self, name: &str) -> Result<()> {
        if matches!(
            Self::state(name),
            Some(ServiceState::Running | ServiceState::Restarting)
        ) {
            debug!("service {name} already running");
            return Ok(());
        }

        info!("starting service {name}");
        props::set("ctl.start", name).context("failed to request service start")
    }

    fn stop(&self, name: &str) -> Result<()> {
        if matches!(
            Self::state(name),
            None | Some(ServiceState::Stopped | ServiceState::Stopping)
        ) {
            debug!("service {name} already stopped");
            return Ok(());
        }

        info!("stopping service {name}");
        props::set("ctl.stop", name).context("failed to request service stop")
    }
}

#[cfg(all(test, not(target_os = "android")))]
mod tests {
    use super::*;

    #[test]
    fn parses_init_states() {
        props::set("init.svc.displayd-test-a", "running").unwrap();
        props::set("init.svc.displayd-test-b", "gone").unwrap();

        assert_eq!(InitServices::state("displayd-test-a"), Some(ServiceState::Running));
        assert_eq!(InitServices::state("displayd-test-b"), None);
        assert_eq!(InitServices::state("displayd-test-c"), None);
    }

    #[test]
    fn start_is_skipped_while_running() {
        props::set("init.svc.displayd-test-d", "running").unwrap();
        InitServices.start("displayd-test-d").unwrap();
        assert_ne!(props::get("ctl.start").as_deref(), Some("displayd-test-d"));

        InitServices.stop("displayd-test-d").unwrap();
        assert_eq!(props::get("ctl.stop").as_deref(), Some("displayd-test-d"));
    }
}
