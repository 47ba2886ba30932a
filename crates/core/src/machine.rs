//! Machine registry vocabulary.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Location reported for machines that are only known from their readings.
pub const DEFAULT_LOCATION: &str = "Factory Floor";

/// Operational state of a registered machine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MachineStatus {
    #[default]
    Online,
    Offline,
    Maintenance,
}

impl MachineStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            MachineStatus::Online => "online",
            MachineStatus::Offline => "offline",
            MachineStatus::Maintenance => "maintenance",
        }
    }
}

impl fmt::Display for MachineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MachineStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "online" => Ok(MachineStatus::Online),
            "offline" => Ok(MachineStatus::Offline),
            "maintenance" => Ok(MachineStatus::Maintenance),
            other => Err(CoreError::Validation(format!(
                "status must be one of online, offline, maintenance; got '{other}'"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_status_is_online() {
        assert_eq!(MachineStatus::default(), MachineStatus::Online);
    }

    #[test]
    fn parses_known_statuses_only() {
        assert_eq!("maintenance".parse::<MachineStatus>().unwrap(), MachineStatus::Maintenance);
        assert!("broken".parse::<MachineStatus>().is_err());
    }
}
