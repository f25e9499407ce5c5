use std::path::PathBuf;

/// Stock location where LXD keeps container root filesystems.
const DEFAULT_CONTAINERS_ROOT: &str = "/var/lib/lxd/containers";

/// Driver configuration handed to the [`crate::LifecycleController`] at
/// construction. There is no process-wide state; callers that need a
/// different LXD storage location build their own value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverConf {
    /// Host directory holding the container root filesystems.
    pub containers_root: PathBuf,
}

impl Default for DriverConf {
    fn default() -> Self {
        Self {
            containers_root: PathBuf::from(DEFAULT_CONTAINERS_ROOT),
        }
    }
}

impl DriverConf {
    pub fn new<P: Into<PathBuf>>(containers_root: P) -> Self {
        Self {
            containers_root: containers_root.into(),
        }
    }

    /// Host path of the root filesystem of the container backing `vm_id`.
    pub fn container_rootfs(&self, vm_id: &str) -> PathBuf {
        self.containers_root.join(format!("one-{vm_id}"))
    }
}
