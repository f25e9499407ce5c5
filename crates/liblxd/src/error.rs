use crate::container::{ContainerStatus, ResourceError};
use crate::mapper::MapperError;
use crate::template::TemplateError;

/// Top level error type for the driver core. Every operation surfaces its
/// failure to the caller through this enum; nothing is swallowed or retried
/// here.
#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    #[error(transparent)]
    MalformedDescriptor(#[from] TemplateError),
    #[error("a container named {name} is already running")]
    AlreadyRunning { name: String },
    #[error("container {name} failed to start, status is {status}")]
    StartFailed {
        name: String,
        status: ContainerStatus,
    },
    #[error(transparent)]
    Resource(#[from] ResourceError),
    #[error(transparent)]
    Mapper(#[from] MapperError),
}
