//! Recording doubles for the driver's two capabilities plus a sample
//! descriptor, shared by the unit tests.

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::container::{Container, ContainerResource, ContainerStatus, ResourceError};
use crate::mapper::{MapAction, MapperError, Mappers, StorageMapper};
use crate::spec::ContainerSpec;
use crate::template::VmDescriptor;

/// Everything the doubles observed, in call order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Exists(String),
    Get(String),
    Create(String),
    Update(String),
    Start(String),
    Status(String),
    Delete(String),
    MapperRun {
        driver: String,
        action: MapAction,
        mountpoint: PathBuf,
        device: PathBuf,
    },
}

pub type EventLog = Rc<RefCell<Vec<Event>>>;

/// In-memory stand-in for the LXD container resource. Holds at most one
/// container, which is what the lifecycle tests need.
pub struct RecordingResource {
    pub log: EventLog,
    pub existing: Rc<RefCell<Option<Container>>>,
    pub start_status: ContainerStatus,
}

impl RecordingResource {
    pub fn new(log: EventLog) -> Self {
        Self {
            log,
            existing: Rc::new(RefCell::new(None)),
            start_status: ContainerStatus::Running,
        }
    }

    fn record(&self, event: Event) {
        self.log.borrow_mut().push(event);
    }
}

impl ContainerResource for RecordingResource {
    fn exists(&self, name: &str) -> Result<bool, ResourceError> {
        self.record(Event::Exists(name.to_owned()));
        Ok(self.existing.borrow().is_some())
    }

    fn get(&self, name: &str) -> Result<Container, ResourceError> {
        self.record(Event::Get(name.to_owned()));
        self.existing
            .borrow()
            .clone()
            .ok_or_else(|| ResourceError::NotFound {
                name: name.to_owned(),
            })
    }

    fn create(&self, spec: &ContainerSpec) -> Result<Container, ResourceError> {
        self.record(Event::Create(spec.name.clone()));
        let container = Container::from_spec(spec, ContainerStatus::Stopped);
        *self.existing.borrow_mut() = Some(container.clone());
        Ok(container)
    }

    fn update(&self, container: &Container) -> Result<(), ResourceError> {
        self.record(Event::Update(container.name.clone()));
        *self.existing.borrow_mut() = Some(container.clone());
        Ok(())
    }

    fn start(&self, container: &Container) -> Result<ContainerStatus, ResourceError> {
        self.record(Event::Start(container.name.clone()));
        Ok(self.start_status.clone())
    }

    fn status(&self, container: &Container) -> Result<ContainerStatus, ResourceError> {
        self.record(Event::Status(container.name.clone()));
        Ok(self
            .existing
            .borrow()
            .as_ref()
            .map(|c| c.status.clone())
            .unwrap_or(ContainerStatus::Stopped))
    }

    fn delete(&self, container: &Container) -> Result<(), ResourceError> {
        self.record(Event::Delete(container.name.clone()));
        *self.existing.borrow_mut() = None;
        Ok(())
    }
}

pub struct RecordingMapper {
    driver: &'static str,
    log: EventLog,
}

impl StorageMapper for RecordingMapper {
    fn run(&self, action: MapAction, mountpoint: &Path, device: &Path) -> Result<(), MapperError> {
        self.log.borrow_mut().push(Event::MapperRun {
            driver: self.driver.to_owned(),
            action,
            mountpoint: mountpoint.to_path_buf(),
            device: device.to_path_buf(),
        });
        Ok(())
    }
}

/// A mapper set whose raw and qcow2 members record into the same log.
pub fn mappers(log: &EventLog) -> Mappers {
    Mappers {
        raw: Box::new(RecordingMapper {
            driver: "raw",
            log: log.clone(),
        }),
        qcow2: Box::new(RecordingMapper {
            driver: "qcow2",
            log: log.clone(),
        }),
    }
}

/// A representative driver action document: VM 65, a raw data disk, a
/// readonly qcow2 boot disk, one bridged NIC with inbound QoS and a context
/// image.
pub fn sample_xml() -> String {
    r#"<VMM_DRIVER_ACTION_DATA>
  <VM>
    <ID>65</ID>
    <TEMPLATE>
      <VMID>65</VMID>
      <MEMORY>2048</MEMORY>
      <CPU>0.5</CPU>
      <VCPU>2</VCPU>
      <OS><BOOT>disk1,nic0</BOOT></OS>
      <DISK>
        <DISK_ID>0</DISK_ID>
        <DRIVER>raw</DRIVER>
        <SOURCE>/var/lib/one/datastores/104/ab12cd</SOURCE>
        <DATASTORE_ID>104</DATASTORE_ID>
        <TARGET>hda</TARGET>
        <READ_BYTES_SEC>102400</READ_BYTES_SEC>
      </DISK>
      <DISK>
        <DISK_ID>1</DISK_ID>
        <DRIVER>qcow2</DRIVER>
        <SOURCE>/var/lib/one/datastores/104/ef34ab</SOURCE>
        <DATASTORE_ID>104</DATASTORE_ID>
        <TARGET>hdb</TARGET>
        <READONLY>YES</READONLY>
      </DISK>
      <NIC>
        <NIC_ID>0</NIC_ID>
        <TARGET>one-65-0</TARGET>
        <BRIDGE>br0</BRIDGE>
        <MAC>02:00:c0:a8:00:68</MAC>
        <INBOUND_AVG_BW>1000</INBOUND_AVG_BW>
      </NIC>
      <CONTEXT>
        <DISK_ID>2</DISK_ID>
        <TARGET>hdc</TARGET>
      </CONTEXT>
    </TEMPLATE>
    <HISTORY_RECORDS>
      <HISTORY>
        <DS_ID>0</DS_ID>
      </HISTORY>
    </HISTORY_RECORDS>
  </VM>
</VMM_DRIVER_ACTION_DATA>
"#
    .to_owned()
}

pub fn sample_descriptor() -> VmDescriptor {
    VmDescriptor::parse(&sample_xml()).expect("sample descriptor must parse")
}
