use log::{debug, error, warn};
use std::fmt;
use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// AOD region as origin plus size.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    pub const EMPTY: Region = Region::new(0, 0, 0, 0);

    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{},{}", self.x, self.y, self.width, self.height)
    }
}

/// FOD sensor area as edge coordinates.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Bounds {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl Bounds {
    pub const fn new(left: u32, top: u32, right: u32, bottom: u32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }
}

impl fmt::Display for Bounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{},{}", self.left, self.top, self.right, self.bottom)
    }
}

/// Commands understood by the touchscreen controller's `cmd` node.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TspCommand {
    AodEnable(bool),
    SetAodRect(Region),
    FodEnable,
    SetFodRect(Bounds),
    SingleTapEnable(bool),
}

impl fmt::Display for TspCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TspCommand::AodEnable(enable) => write!(f, "aod_enable,{}", u8::from(*enable)),
            TspCommand::SetAodRect(region) => write!(f, "set_aod_rect,{region}"),
            TspCommand::FodEnable => f.write_str("fod_enable,1,1,0"),
            TspCommand::SetFodRect(bounds) => write!(f, "set_fod_rect,{bounds}"),
            TspCommand::SingleTapEnable(enable) => {
                write!(f, "singletap_enable,{}", u8::from(*enable))
            }
        }
    }
}

pub trait CommandSink {
    /// Best effort; failures are logged and reported as `false`.
    fn write_line(&self, line: &str) -> bool;

    fn send(&self, command: TspCommand) -> bool {
        self.write_line(&command.to_string())
    }
}

pub struct SysfsNode {
    path: PathBuf,
}

impl SysfsNode {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl CommandSink for SysfsNode {
    fn write_line(&self, line: &str) -> bool {
        let path = self.path.display();
        let result = OpenOptions::new()
            .write(true)
            .truncate(true)
            .open(&self.path)
            .and_then(|mut file| file.write_all(line.as_bytes()));

        match result {
            Ok(()) => {
                debug!("{path} <- {line}");
                true
            }
            Err(err) if err.kind() == ErrorKind::NotFound => {
                warn!("no such file {path} for writing");
                false
            }
            Err(err) => {
                error!("could not write {line:?} to {path}: {err}");
                false
            }
        }
    }
}
