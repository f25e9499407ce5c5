//! Container lifecycle control: create-or-override, storage mapping and
//! start with rollback. One driver invocation is one synchronous pass; the
//! controller holds no durable state of its own.

mod create;
mod resource;
mod start;
mod status;
mod storage;

pub use resource::{Container, ContainerResource, ResourceError};
pub use status::ContainerStatus;

use crate::config::DriverConf;
use crate::mapper::Mappers;

/// Drives a container through its lifecycle against the
/// [`ContainerResource`] and [`crate::mapper::StorageMapper`] capabilities.
///
/// Ordering invariant: storage is mapped before a start is attempted, and
/// unmapped before the container is deleted during rollback.
pub struct LifecycleController {
    pub(crate) resource: Box<dyn ContainerResource>,
    pub(crate) mappers: Mappers,
    pub(crate) conf: DriverConf,
}

impl LifecycleController {
    pub fn new(resource: Box<dyn ContainerResource>, mappers: Mappers, conf: DriverConf) -> Self {
        Self {
            resource,
            mappers,
            conf,
        }
    }
}
