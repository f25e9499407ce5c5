//! Builders for the per-device attribute maps of an LXD container
//! definition.

use std::collections::HashMap;

use crate::spec::units::{extend_present, nic_bandwidth};
use crate::template::{ContextDescriptor, DiskDescriptor, NicDescriptor, VmDescriptor};

/// Builds the `eth<nicId>` device entry for one NIC.
pub fn nic_device(nic: &NicDescriptor) -> (String, HashMap<String, String>) {
    let name = format!("eth{}", nic.nic_id);
    let mut device = HashMap::from([
        ("name".to_owned(), name.clone()),
        ("nictype".to_owned(), "bridged".to_owned()),
        ("type".to_owned(), "nic".to_owned()),
    ]);
    extend_present(
        &mut device,
        &[
            ("host_name", nic.target.clone()),
            ("parent", nic.bridge.clone()),
            ("hwaddr", nic.mac.clone()),
            ("limits.ingress", nic.io.inbound_avg_bw.map(nic_bandwidth)),
            ("limits.egress", nic.io.outbound_avg_bw.map(nic_bandwidth)),
        ],
    );
    (name, device)
}

/// Builds the `disk<diskId>` entry for a non-root disk. The mount path is
/// the orchestrator target when it already is a path; legacy device labels
/// (`hda`, `hdb`, ...) fall back to `/media/<diskId>`.
pub fn data_disk_device(vm: &VmDescriptor, disk: &DiskDescriptor) -> (String, HashMap<String, String>) {
    let path = match &disk.target {
        Some(target) if target.contains('/') => target.clone(),
        _ => format!("/media/{}", disk.disk_id),
    };
    let mut device = HashMap::from([
        ("type".to_owned(), "disk".to_owned()),
        (
            "source".to_owned(),
            vm.device_path(&disk.disk_id).display().to_string(),
        ),
        ("path".to_owned(), path),
    ]);
    device.extend(disk_limits(disk));
    (format!("disk{}", disk.disk_id), device)
}

/// Builds the `root` entry, mounted at `/` out of LXD's storage pool.
pub fn root_disk_device(disk: &DiskDescriptor) -> HashMap<String, String> {
    let mut device = HashMap::from([
        ("type".to_owned(), "disk".to_owned()),
        ("path".to_owned(), "/".to_owned()),
        ("pool".to_owned(), "default".to_owned()),
    ]);
    device.extend(disk_limits(disk));
    device
}

/// Builds the `context` entry, sourced from the mapper mount point of the
/// context image and mounted at a fixed location.
pub fn context_device(vm: &VmDescriptor, context: &ContextDescriptor) -> HashMap<String, String> {
    HashMap::from([
        ("type".to_owned(), "disk".to_owned()),
        (
            "source".to_owned(),
            vm.mapper_device_path(&context.disk_id).display().to_string(),
        ),
        ("path".to_owned(), "/mnt".to_owned()),
    ])
}

/// Readonly flag plus whatever I/O limits the orchestrator supplied, as LXD
/// string values. Limit values stay bare byte counts.
fn disk_limits(disk: &DiskDescriptor) -> HashMap<String, String> {
    let mut limits = HashMap::from([("readonly".to_owned(), disk.readonly.to_string())]);
    extend_present(
        &mut limits,
        &[
            ("limits.read", disk.io.read_bytes_sec.map(|v| v.to_string())),
            ("limits.write", disk.io.write_bytes_sec.map(|v| v.to_string())),
            ("limits.max", disk.io.total_bytes_sec.map(|v| v.to_string())),
        ],
    );
    limits
}
