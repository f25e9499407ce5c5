//! Capability interface for the block-device mapper scripts that attach and
//! detach disk images on the hypervisor host. The actual loop/qcow2 mapping
//! logic lives outside this crate; the lifecycle controller only selects the
//! right implementation and sequences the calls.

use std::fmt::Display;
use std::path::{Path, PathBuf};

/// Image formats the driver knows how to map. This is a closed set; a
/// descriptor naming any other driver is rejected while parsing.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DiskDriver {
    Raw,
    Qcow2,
}

impl std::str::FromStr for DiskDriver {
    type Err = UnknownDriver;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "raw" => Ok(DiskDriver::Raw),
            "qcow2" => Ok(DiskDriver::Qcow2),
            other => Err(UnknownDriver(other.to_owned())),
        }
    }
}

impl Display for DiskDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DiskDriver::Raw => write!(f, "raw"),
            DiskDriver::Qcow2 => write!(f, "qcow2"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown disk driver {0:?}")]
pub struct UnknownDriver(pub String);

/// Direction of a mapping operation.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MapAction {
    /// Attach the image and mount it at the mountpoint.
    Map,
    /// Unmount and detach.
    Unmap,
}

impl Display for MapAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MapAction::Map => write!(f, "map"),
            MapAction::Unmap => write!(f, "unmap"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("failed to {action} {device:?} at {mountpoint:?}")]
pub struct MapperError {
    pub action: MapAction,
    pub mountpoint: PathBuf,
    pub device: PathBuf,
    #[source]
    pub source: Box<dyn std::error::Error + Send + Sync>,
}

/// A single mapper implementation (one image format).
pub trait StorageMapper {
    /// Attach or detach `device` at `mountpoint`, blocking until done.
    fn run(&self, action: MapAction, mountpoint: &Path, device: &Path) -> Result<(), MapperError>;
}

/// The full set of mappers the controller dispatches over, one per
/// [`DiskDriver`] variant. Context images are always raw.
pub struct Mappers {
    pub raw: Box<dyn StorageMapper>,
    pub qcow2: Box<dyn StorageMapper>,
}

impl Mappers {
    pub fn select(&self, driver: DiskDriver) -> &dyn StorageMapper {
        match driver {
            DiskDriver::Raw => self.raw.as_ref(),
            DiskDriver::Qcow2 => self.qcow2.as_ref(),
        }
    }
}
