use tracing::instrument;

use crate::container::{Container, LifecycleController};
use crate::error::DriverError;
use crate::mapper::MapAction;
use crate::template::VmDescriptor;

impl LifecycleController {
    /// Starts a created container. When the container does not reach
    /// `Running`, the partially applied deployment is rolled back: storage
    /// mappings are released, the container is deleted, and the start
    /// failure is re-signaled. Rollback steps are best-effort; their own
    /// failures are logged and never mask the start failure. A transport
    /// error from the start call itself propagates without rollback.
    #[instrument(skip_all, fields(name = %container.name))]
    pub fn start(&self, container: &Container, vm: &VmDescriptor) -> Result<(), DriverError> {
        let status = self.resource.start(container)?;
        if status.is_running() {
            return Ok(());
        }

        tracing::error!(%status, "container failed to start, rolling back");
        if let Err(err) = self.storage(vm, MapAction::Unmap) {
            tracing::error!(error = %err, "could not unmap storage during rollback");
        }
        if let Err(err) = self.resource.delete(container) {
            tracing::error!(error = %err, "could not delete container during rollback");
        }

        Err(DriverError::StartFailed {
            name: container.name.clone(),
            status,
        })
    }
}
