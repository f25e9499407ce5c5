//! Capability interface for LXD's container resource. The REST transport
//! implementing it lives outside this crate.

use std::collections::HashMap;

use crate::container::ContainerStatus;
use crate::spec::ContainerSpec;

/// Handle to a container as known by LXD: its committed config/devices maps
/// and the status observed when the handle was fetched.
#[derive(Debug, Clone, PartialEq)]
pub struct Container {
    pub name: String,
    pub config: HashMap<String, String>,
    pub devices: HashMap<String, HashMap<String, String>>,
    pub status: ContainerStatus,
}

impl Container {
    pub fn from_spec(spec: &ContainerSpec, status: ContainerStatus) -> Self {
        Self {
            name: spec.name.clone(),
            config: spec.config.clone(),
            devices: spec.devices.clone(),
            status,
        }
    }

    /// Merges new config keys in. Keys not mentioned are retained, mentioned
    /// ones are overwritten.
    pub fn update_config(&mut self, config: HashMap<String, String>) {
        self.config.extend(config);
    }

    /// Same merge semantics as [`Self::update_config`], per device name.
    pub fn update_devices(&mut self, devices: HashMap<String, HashMap<String, String>>) {
        self.devices.extend(devices);
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ResourceError {
    #[error("container {name} does not exist")]
    NotFound { name: String },
    #[error("LXD API rejected the request: {reason}")]
    Api { reason: String },
    #[error("transport failure talking to LXD")]
    Transport {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Operations the LXD management API offers on containers. Every call blocks
/// until the API answers; retries and timeouts belong to the transport.
///
/// `exists` followed by `get`/`create` is not atomic. Concurrent deploys of
/// the same VM must be serialized by the caller.
pub trait ContainerResource {
    fn exists(&self, name: &str) -> Result<bool, ResourceError>;
    fn get(&self, name: &str) -> Result<Container, ResourceError>;
    fn create(&self, spec: &ContainerSpec) -> Result<Container, ResourceError>;
    /// Commits the handle's config and devices maps.
    fn update(&self, container: &Container) -> Result<(), ResourceError>;
    fn start(&self, container: &Container) -> Result<ContainerStatus, ResourceError>;
    fn status(&self, container: &Container) -> Result<ContainerStatus, ResourceError>;
    fn delete(&self, container: &Container) -> Result<(), ResourceError>;
}
