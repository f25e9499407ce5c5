//! Reader for the OpenNebula VM descriptor document.
//!
//! The orchestrator delivers one XML document per driver action, rooted at
//! `VM` (possibly wrapped in the driver action envelope) with the template
//! fields under `TEMPLATE`. Parsing is pure; the result is a read-only
//! [`VmDescriptor`] the rest of the driver works from.

use std::path::PathBuf;

use roxmltree::{Document, Node};

use crate::mapper::{DiskDriver, UnknownDriver};

#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("descriptor is not well-formed XML")]
    Xml {
        #[source]
        source: roxmltree::Error,
    },
    #[error("descriptor is missing required element {path}")]
    MissingElement { path: String },
    #[error("descriptor field {field} has unparsable value {value:?}")]
    InvalidValue { field: String, value: String },
    #[error(transparent)]
    UnknownDriver(#[from] UnknownDriver),
}

/// Per-disk I/O throttling, present only where the orchestrator supplied a
/// value. Absent fields never become zero-valued limits downstream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiskIoLimits {
    pub read_bytes_sec: Option<u64>,
    pub write_bytes_sec: Option<u64>,
    pub total_bytes_sec: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiskDescriptor {
    pub disk_id: String,
    pub driver: DiskDriver,
    pub readonly: bool,
    /// Mount target as the orchestrator states it. May be a real path or a
    /// legacy device label such as `hda`.
    pub target: Option<String>,
    pub io: DiskIoLimits,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NicIoLimits {
    pub inbound_avg_bw: Option<u64>,
    pub outbound_avg_bw: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NicDescriptor {
    pub nic_id: String,
    pub target: Option<String>,
    pub bridge: Option<String>,
    pub mac: Option<String>,
    pub io: NicIoLimits,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextDescriptor {
    pub disk_id: String,
}

/// Typed view of the VM descriptor, built once per invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct VmDescriptor {
    pub vm_id: String,
    /// Datastore path prefix, derived from the first disk's source path with
    /// the datastore id suffix cut off.
    pub datastore_base: String,
    /// Datastore holding the instance-specific disk state.
    pub system_ds_id: String,
    /// Id of the bootable disk, `"0"` when the template does not say.
    pub root_disk_id: String,
    pub memory_mb: u64,
    pub cpu_share: f64,
    pub vcpu_count: Option<u32>,
    pub disks: Vec<DiskDescriptor>,
    pub nics: Vec<NicDescriptor>,
    pub context: Option<ContextDescriptor>,
}

impl VmDescriptor {
    pub fn parse(text: &str) -> Result<Self, TemplateError> {
        let doc = Document::parse(text).map_err(|source| TemplateError::Xml { source })?;
        let root = doc.root_element();
        let vm = if root.has_tag_name("VM") {
            root
        } else {
            root.descendants()
                .find(|n| n.has_tag_name("VM"))
                .ok_or_else(|| missing("VM"))?
        };
        let template = child(vm, "TEMPLATE").ok_or_else(|| missing("TEMPLATE"))?;

        let vm_id = required_text(template, "VMID")?;
        let system_ds_id = vm
            .descendants()
            .find(|n| n.has_tag_name("HISTORY"))
            .and_then(|h| child_text(h, "DS_ID"))
            .map(str::to_owned)
            .ok_or_else(|| missing("HISTORY_RECORDS/HISTORY/DS_ID"))?;

        let memory_mb = required_number::<u64>(template, "MEMORY")?;
        let cpu_share = required_number::<f64>(template, "CPU")?;
        let vcpu_count = optional_number::<u32>(template, "VCPU")?;

        let disk_nodes: Vec<Node> = children(template, "DISK").collect();
        let first = disk_nodes.first().ok_or_else(|| missing("DISK"))?;
        let datastore_base = datastore_base(*first)?;

        let disks = disk_nodes
            .into_iter()
            .map(parse_disk)
            .collect::<Result<Vec<_>, _>>()?;
        let nics = children(template, "NIC")
            .map(parse_nic)
            .collect::<Result<Vec<_>, _>>()?;

        let context = match child(template, "CONTEXT") {
            Some(ctx) => Some(ContextDescriptor {
                disk_id: required_text(ctx, "DISK_ID")
                    .map_err(|_| missing("CONTEXT/DISK_ID"))?,
            }),
            None => None,
        };

        Ok(Self {
            root_disk_id: root_disk_id(template),
            vm_id,
            datastore_base,
            system_ds_id,
            memory_mb,
            cpu_share,
            vcpu_count,
            disks,
            nics,
            context,
        })
    }

    /// Host path of the image backing `disk_id`. Pure function of the
    /// descriptor's datastore fields; must stay bit-exact, other tooling
    /// derives the same path independently.
    pub fn device_path(&self, disk_id: &str) -> PathBuf {
        PathBuf::from(format!(
            "{}/{}/{}/disk.{}",
            self.datastore_base, self.system_ds_id, self.vm_id, disk_id
        ))
    }

    /// Mount point the storage mapper exposes for `disk_id`. Same shape as
    /// [`Self::device_path`] with a `mapper` segment after the VM id.
    pub fn mapper_device_path(&self, disk_id: &str) -> PathBuf {
        PathBuf::from(format!(
            "{}/{}/{}/mapper/disk.{}",
            self.datastore_base, self.system_ds_id, self.vm_id, disk_id
        ))
    }
}

/// Reads the bootable disk id out of `OS/BOOT`. The field lists boot entries
/// like `disk1,nic0`; the first entry's trailing character is taken as the
/// disk id, so ids above 9 are not representable here. Missing or empty boot
/// order means disk `0`.
fn root_disk_id(template: Node) -> String {
    child(template, "OS")
        .and_then(|os| child_text(os, "BOOT"))
        .and_then(|boot| boot.split(',').next())
        .and_then(|entry| entry.chars().last())
        .map(String::from)
        .unwrap_or_else(|| "0".to_owned())
}

/// Cuts the datastore path prefix out of the first disk's source path. For a
/// source `/var/lib/one/datastores/104/ab12cd` on datastore `104` this
/// yields `/var/lib/one/datastores`.
fn datastore_base(disk: Node) -> Result<String, TemplateError> {
    let source = required_text(disk, "SOURCE").map_err(|_| missing("DISK/SOURCE"))?;
    let ds_id = required_text(disk, "DATASTORE_ID").map_err(|_| missing("DISK/DATASTORE_ID"))?;
    let marker = format!("{ds_id}/");
    let base = match source.find(&marker) {
        Some(at) => &source[..at],
        None => source.as_str(),
    };
    Ok(base.trim_end_matches('/').to_owned())
}

fn parse_disk(node: Node) -> Result<DiskDescriptor, TemplateError> {
    let disk_id = required_text(node, "DISK_ID").map_err(|_| missing("DISK/DISK_ID"))?;
    let driver: DiskDriver = required_text(node, "DRIVER")
        .map_err(|_| missing("DISK/DRIVER"))?
        .parse()?;
    let readonly = child_text(node, "READONLY")
        .map(|v| v.eq_ignore_ascii_case("yes"))
        .unwrap_or(false);

    Ok(DiskDescriptor {
        disk_id,
        driver,
        readonly,
        target: child_text(node, "TARGET").map(str::to_owned),
        io: DiskIoLimits {
            read_bytes_sec: optional_number(node, "READ_BYTES_SEC")?,
            write_bytes_sec: optional_number(node, "WRITE_BYTES_SEC")?,
            total_bytes_sec: optional_number(node, "TOTAL_BYTES_SEC")?,
        },
    })
}

fn parse_nic(node: Node) -> Result<NicDescriptor, TemplateError> {
    let nic_id = required_text(node, "NIC_ID").map_err(|_| missing("NIC/NIC_ID"))?;

    Ok(NicDescriptor {
        nic_id,
        target: child_text(node, "TARGET").map(str::to_owned),
        bridge: child_text(node, "BRIDGE").map(str::to_owned),
        mac: child_text(node, "MAC").map(str::to_owned),
        io: NicIoLimits {
            inbound_avg_bw: optional_number(node, "INBOUND_AVG_BW")?,
            outbound_avg_bw: optional_number(node, "OUTBOUND_AVG_BW")?,
        },
    })
}

fn child<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|n| n.is_element() && n.tag_name().name() == name)
}

fn children<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    name: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    node.children()
        .filter(move |n| n.is_element() && n.tag_name().name() == name)
}

/// Element text, trimmed. Empty elements count as absent, matching how the
/// orchestrator emits unset template fields.
fn child_text<'a>(node: Node<'a, '_>, name: &str) -> Option<&'a str> {
    let text = child(node, name)?.text()?.trim();
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

fn required_text(node: Node, name: &str) -> Result<String, TemplateError> {
    child_text(node, name)
        .map(str::to_owned)
        .ok_or_else(|| missing(name))
}

fn required_number<T: std::str::FromStr>(node: Node, name: &str) -> Result<T, TemplateError> {
    let raw = required_text(node, name)?;
    raw.parse().map_err(|_| TemplateError::InvalidValue {
        field: name.to_owned(),
        value: raw,
    })
}

fn optional_number<T: std::str::FromStr>(
    node: Node,
    name: &str,
) -> Result<Option<T>, TemplateError> {
    match child_text(node, name) {
        None => Ok(None),
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| TemplateError::InvalidValue {
                field: name.to_owned(),
                value: raw.to_owned(),
            }),
    }
}

fn missing(path: &str) -> TemplateError {
    TemplateError::MissingElement {
        path: path.to_owned(),
    }
}
