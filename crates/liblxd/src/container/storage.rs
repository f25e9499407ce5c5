use tracing::instrument;

use crate::container::LifecycleController;
use crate::error::DriverError;
use crate::mapper::{DiskDriver, MapAction};
use crate::template::VmDescriptor;

impl LifecycleController {
    /// Maps or unmaps every disk image of the VM, dispatching on each disk's
    /// driver. The root disk is mounted at the container's host rootfs path,
    /// every other disk at its own device path, and the context image (when
    /// present) at its mapper mount point. Map before start, unmap before
    /// delete.
    #[instrument(skip_all, fields(vm_id = %vm.vm_id, %action))]
    pub fn storage(&self, vm: &VmDescriptor, action: MapAction) -> Result<(), DriverError> {
        for disk in &vm.disks {
            let device = vm.device_path(&disk.disk_id);
            let mountpoint = if disk.disk_id == vm.root_disk_id {
                self.conf.container_rootfs(&vm.vm_id)
            } else {
                device.clone()
            };
            self.mappers
                .select(disk.driver)
                .run(action, &mountpoint, &device)?;
        }

        if let Some(context) = &vm.context {
            // context images are always raw
            let device = vm.device_path(&context.disk_id);
            let mountpoint = vm.mapper_device_path(&context.disk_id);
            self.mappers
                .select(DiskDriver::Raw)
                .run(action, &mountpoint, &device)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::path::PathBuf;
    use std::rc::Rc;

    use crate::config::DriverConf;
    use crate::container::LifecycleController;
    use crate::mapper::MapAction;
    use crate::test_utils::{mappers, sample_descriptor, Event, RecordingResource};

    #[test]
    fn test_map_covers_disks_and_context() -> anyhow::Result<()> {
        let log = Rc::new(RefCell::new(Vec::new()));
        let controller = LifecycleController::new(
            Box::new(RecordingResource::new(log.clone())),
            mappers(&log),
            DriverConf::default(),
        );
        let vm = sample_descriptor();

        controller.storage(&vm, MapAction::Map)?;

        assert_eq!(
            *log.borrow(),
            vec![
                Event::MapperRun {
                    driver: "raw".to_owned(),
                    action: MapAction::Map,
                    mountpoint: PathBuf::from("/var/lib/one/datastores/0/65/disk.0"),
                    device: PathBuf::from("/var/lib/one/datastores/0/65/disk.0"),
                },
                Event::MapperRun {
                    driver: "qcow2".to_owned(),
                    action: MapAction::Map,
                    mountpoint: PathBuf::from("/var/lib/lxd/containers/one-65"),
                    device: PathBuf::from("/var/lib/one/datastores/0/65/disk.1"),
                },
                Event::MapperRun {
                    driver: "raw".to_owned(),
                    action: MapAction::Map,
                    mountpoint: PathBuf::from("/var/lib/one/datastores/0/65/mapper/disk.2"),
                    device: PathBuf::from("/var/lib/one/datastores/0/65/disk.2"),
                },
            ]
        );
        Ok(())
    }

    #[test]
    fn test_no_context_no_extra_run() -> anyhow::Result<()> {
        let log = Rc::new(RefCell::new(Vec::new()));
        let controller = LifecycleController::new(
            Box::new(RecordingResource::new(log.clone())),
            mappers(&log),
            DriverConf::default(),
        );
        let mut vm = sample_descriptor();
        vm.context = None;

        controller.storage(&vm, MapAction::Unmap)?;

        assert_eq!(log.borrow().len(), vm.disks.len());
        Ok(())
    }
}
