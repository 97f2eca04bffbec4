//! The assembled, display-ready hardware summary

use chrono::{DateTime, Local};
use std::fmt;

/// Provider domains queried during one collection pass, in query order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Domain {
    Os,
    Computer,
    Motherboard,
    Cpu,
    Memory,
    Gpu,
    Drivers,
    Drives,
    Network,
    Audio,
    Monitors,
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Domain::Os => "os",
            Domain::Computer => "computer",
            Domain::Motherboard => "motherboard",
            Domain::Cpu => "cpu",
            Domain::Memory => "memory",
            Domain::Gpu => "gpu",
            Domain::Drivers => "drivers",
            Domain::Drives => "drives",
            Domain::Network => "network",
            Domain::Audio => "audio",
            Domain::Monitors => "monitors",
        };
        f.write_str(name)
    }
}

/// Outcome of querying one domain
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainStatus {
    /// The provider returned this many records
    Collected(usize),
    /// The provider answered with no records
    Empty,
    /// The capability is absent or access was denied; the field keeps its default
    Unavailable(String),
    /// An unexpected fault; reported through the OS identity field
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainReport {
    pub domain: Domain,
    pub status: DomainStatus,
}

/// Immutable output of one collection pass.
///
/// Every field is a rendered string. Fields whose domain produced nothing
/// stay empty; fields with records but no usable value read `Unknown`.
#[derive(Debug, Clone)]
pub struct HardwareSummary {
    pub manufacturer: String,
    pub motherboard: String,
    pub model: String,
    pub cpu: String,
    pub ram: String,
    pub gpu: String,
    pub hdd: String,
    pub network: String,
    pub audio: String,
    pub display: String,

    pub computer_name: String,
    pub os_info: String,
    pub version: String,
    pub install_time: String,
    pub boot_time: String,

    pub collected_at: DateTime<Local>,
    pub report: Vec<DomainReport>,
}

impl Default for HardwareSummary {
    fn default() -> Self {
        Self {
            manufacturer: String::new(),
            motherboard: String::new(),
            model: String::new(),
            cpu: String::new(),
            ram: String::new(),
            gpu: String::new(),
            hdd: String::new(),
            network: String::new(),
            audio: String::new(),
            display: String::new(),
            computer_name: String::new(),
            os_info: String::new(),
            version: String::new(),
            install_time: String::new(),
            boot_time: String::new(),
            collected_at: Local::now(),
            report: Vec::new(),
        }
    }
}

impl HardwareSummary {
    pub fn status(&self, domain: Domain) -> Option<&DomainStatus> {
        self.report
            .iter()
            .find(|r| r.domain == domain)
            .map(|r| &r.status)
    }

    /// Domains that hit an unexpected fault during the pass
    pub fn failed_domains(&self) -> Vec<Domain> {
        self.report
            .iter()
            .filter(|r| matches!(r.status, DomainStatus::Failed(_)))
            .map(|r| r.domain)
            .collect()
    }

    pub fn is_degraded(&self) -> bool {
        self.report
            .iter()
            .any(|r| matches!(r.status, DomainStatus::Failed(_)))
    }

    /// Look up a rendered field by its config name
    pub fn field(&self, name: &str) -> Option<&str> {
        let value = match name {
            "manufacturer" => &self.manufacturer,
            "motherboard" => &self.motherboard,
            "model" => &self.model,
            "cpu" => &self.cpu,
            "ram" => &self.ram,
            "gpu" => &self.gpu,
            "hdd" => &self.hdd,
            "network" => &self.network,
            "audio" => &self.audio,
            "display" => &self.display,
            "computer_name" => &self.computer_name,
            "os" => &self.os_info,
            "version" => &self.version,
            "install_time" => &self.install_time,
            "boot_time" => &self.boot_time,
            _ => return None,
        };
        Some(value.as_str())
    }
}
