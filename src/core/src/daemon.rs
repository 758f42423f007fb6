use anyhow::{Context, Result};
use daemonize::Daemonize;
use displayd_utils::ext::ResultExt;
use log::{info, warn};
use nix::sys::signal;
use nix::sys::signal::Signal;
use nix::unistd::Pid;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Once;
use std::time::{Duration, Instant};
use std::{env, process};
use tokio::runtime::Builder;
use tokio::signal::unix;
use tokio::signal::unix::SignalKind;
use tokio::sync::oneshot;
use tokio::{task, time};

const ENV_LAUNCHER_PID: &str = "DISPLAYD_LAUNCHER_PID";
const LAUNCH_TIMEOUT: Duration = Duration::from_secs(5);

static NOTIFY_ONCE: Once = Once::new();

/// Re-executes this binary without `--daemon` and waits for it to report readiness.
pub fn launch_daemon() -> Result<()> {
    Builder::new_current_thread()
        .enable_all()
        .build()?
        .block_on(launch_daemon_async())?;

    Ok(())
}

async fn launch_daemon_async() -> Result<()> {
    let mut sig = unix::signal(SignalKind::user_defined1())?;
    let (tx, rx) = oneshot::channel::<()>();

    task::spawn(async move {
        info!("waiting for signal...");
        let _ = sig.recv().await;
        let _ = tx.send(());
    });

    let start = Instant::now();
    let child = Command::new(env::current_exe()?)
        .args(env::args_os().skip(1).filter(|arg| arg != "--daemon"))
        .env(ENV_LAUNCHER_PID, process::id().to_string())
        .spawn()
        .context("failed to spawn daemon")?;

    info!("spawned daemon launcher child {}", child.id());

    tokio::select! {
        _ = rx => {
            let elapsed = start.elapsed();
            info!("daemon started in {elapsed:.2?}");
        }
        _ = time::sleep(LAUNCH_TIMEOUT) => {
            warn!("daemon start timeout!");
        }
    }

    Ok(())
}

fn module_dir() -> Option<PathBuf> {
    let exe = env::current_exe().ok()?; // e.g. /data/adb/modules/displayd/bin/displayd

    exe.ancestors()
        .skip(1)
        .find(|dir| dir.join("module.prop").exists())
        .map(Path::to_path_buf)
}

pub fn daemonize_if_needed() -> Result<()> {
    if env::var(ENV_LAUNCHER_PID).is_err() {
        info!("not in daemon mode, skip daemonize");
        return Ok(());
    }

    let dir = module_dir().unwrap_or_else(|| PathBuf::from("/"));
    Daemonize::new().working_directory(dir).start()?;

    Ok(())
}

pub fn notify_launcher_if_needed() {
    NOTIFY_ONCE.call_once(|| {
        let result: Result<()> = (|| {
            let Ok(pid) = env::var(ENV_LAUNCHER_PID) else {
                info!("not in daemon mode, skip notify");
                return Ok(());
            };

            let pid = Pid::from_raw(pid.parse()?);

            signal::kill(pid, Signal::SIGUSR1)?;
            info!("notifying launcher...");

            Ok(())
        })();

        result.log_if_error();
    })
}

/// Resolves on SIGTERM or SIGINT. Handlers are installed before this returns.
pub fn shutdown_signal() -> Result<impl Future<Output = ()>> {
    let mut term = unix::signal(SignalKind::terminate())?;
    let mut int = unix::signal(SignalKind::interrupt())?;

    Ok(async move {
        tokio::select! {
            _ = term.recv() => info!("received SIGTERM"),
            _ = int.recv() => info!("received SIGINT"),
        }
    })
}
