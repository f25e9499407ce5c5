//! Lifecycle status of an LXD container as reported by the management API.

use std::fmt::Display;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContainerStatus {
    Running,
    Stopped,
    Starting,
    Stopping,
    Frozen,
    Error,
    /// Status string this driver does not know. Kept verbatim so errors and
    /// logs show what the API actually said.
    Unknown(String),
}

impl ContainerStatus {
    /// Parses the status string an LXD API response carries.
    pub fn from_api(status: &str) -> Self {
        match status {
            "Running" => ContainerStatus::Running,
            "Stopped" => ContainerStatus::Stopped,
            "Starting" => ContainerStatus::Starting,
            "Stopping" => ContainerStatus::Stopping,
            "Frozen" => ContainerStatus::Frozen,
            "Error" => ContainerStatus::Error,
            other => ContainerStatus::Unknown(other.to_owned()),
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self, ContainerStatus::Running)
    }

    /// A container definition may only be overridden while the container is
    /// not live.
    pub fn can_override(&self) -> bool {
        !self.is_running()
    }
}

impl Display for ContainerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let print = match self {
            Self::Running => "Running",
            Self::Stopped => "Stopped",
            Self::Starting => "Starting",
            Self::Stopping => "Stopping",
            Self::Frozen => "Frozen",
            Self::Error => "Error",
            Self::Unknown(other) => other,
        };

        write!(f, "{print}")
    }
}
