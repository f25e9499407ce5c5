//! Assembly of the LXD container definition out of a parsed VM descriptor.
//!
//! Assembly is total and deterministic; it never talks to the hypervisor or
//! the storage mappers.

pub mod devices;
pub mod units;

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::template::{DiskDescriptor, VmDescriptor};

/// The container definition LXD's management API accepts: a name, a flat
/// config map and a per-device attribute map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerSpec {
    pub name: String,
    pub config: HashMap<String, String>,
    pub devices: HashMap<String, HashMap<String, String>>,
}

/// Translates the descriptor into a [`ContainerSpec`]. Exactly one device is
/// keyed `root`; it is built from the disk matching the descriptor's root
/// disk id, ahead of all other disks and independent of input order.
pub fn assemble(vm: &VmDescriptor) -> ContainerSpec {
    let mut config = HashMap::new();
    config.insert("limits.memory".to_owned(), units::memory_limit(vm.memory_mb));
    config.insert(
        "limits.cpu.allowance".to_owned(),
        units::cpu_allowance(vm.cpu_share),
    );
    if let Some(vcpu) = vm.vcpu_count {
        config.insert("limits.cpu".to_owned(), vcpu.to_string());
    }

    let mut dev_map = HashMap::new();
    for nic in &vm.nics {
        let (name, device) = devices::nic_device(nic);
        dev_map.insert(name, device);
    }

    let disks = ordered_disks(vm);
    if let Some((root, rest)) = disks.split_first() {
        for disk in rest {
            let (name, device) = devices::data_disk_device(vm, disk);
            dev_map.insert(name, device);
        }
        dev_map.insert("root".to_owned(), devices::root_disk_device(root));
    }

    if let Some(context) = &vm.context {
        dev_map.insert("context".to_owned(), devices::context_device(vm, context));
    }

    ContainerSpec {
        name: format!("one-{}", vm.vm_id),
        config,
        devices: dev_map,
    }
}

/// Disks deduplicated by id (first occurrence wins) with the root disk moved
/// to the front. When no disk id matches the root disk id the first disk
/// plays root; single-disk templates often carry no boot order at all.
fn ordered_disks(vm: &VmDescriptor) -> Vec<&DiskDescriptor> {
    let mut seen = HashSet::new();
    let mut disks: Vec<&DiskDescriptor> = vm
        .disks
        .iter()
        .filter(|d| seen.insert(d.disk_id.as_str()))
        .collect();
    if let Some(at) = disks.iter().position(|d| d.disk_id == vm.root_disk_id) {
        let root = disks.remove(at);
        disks.insert(0, root);
    }
    disks
}
