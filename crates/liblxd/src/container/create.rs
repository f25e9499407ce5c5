use tracing::instrument;

use crate::container::{Container, LifecycleController};
use crate::error::DriverError;
use crate::spec::ContainerSpec;

impl LifecycleController {
    /// Creates the container described by `spec`, or overrides an existing
    /// one of the same name. A running container is never clobbered; the
    /// call fails and the existing container stays untouched. On the
    /// override path the new config/devices are merged into the existing
    /// definition and committed, the container is not restarted and nothing
    /// is deleted.
    #[instrument(skip_all, fields(name = %spec.name))]
    pub fn create(&self, spec: &ContainerSpec) -> Result<Container, DriverError> {
        if self.resource.exists(&spec.name)? {
            let mut container = self.resource.get(&spec.name)?;
            if !container.status.can_override() {
                return Err(DriverError::AlreadyRunning {
                    name: spec.name.clone(),
                });
            }

            tracing::info!("overriding existing container definition");
            container.update_config(spec.config.clone());
            container.update_devices(spec.devices.clone());
            self.resource.update(&container)?;
            Ok(container)
        } else {
            tracing::debug!("creating container");
            Ok(self.resource.create(spec)?)
        }
    }
}
