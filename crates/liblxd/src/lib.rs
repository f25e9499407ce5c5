//! Driver core translating OpenNebula VM descriptors into LXD container
//! definitions and driving the container create/start lifecycle.
//!
//! The HTTP transport to the LXD API and the block-device mapper scripts are
//! not part of this crate; they are consumed through the
//! [`container::ContainerResource`] and [`mapper::StorageMapper`] traits.

pub mod config;
pub mod container;
pub mod error;
pub mod mapper;
pub mod spec;
pub mod template;

#[cfg(test)]
pub(crate) mod test_utils;

pub use config::DriverConf;
pub use container::{Container, ContainerStatus, LifecycleController};
pub use error::DriverError;
pub use spec::ContainerSpec;
pub use template::VmDescriptor;
