//! Raw operating system and computer identity records

/// Operating system identity
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OsRecord {
    pub caption: String,
    pub architecture: String,
    /// Windows-style build number, empty on other systems
    pub build_number: String,
    pub version: String,
    /// `YYYYMMDDHHMMSS...` timestamp
    pub install_date: String,
    /// `YYYYMMDDHHMMSS...` timestamp
    pub last_boot_up_time: String,
}

/// Computer system identity
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComputerRecord {
    pub name: String,
    pub manufacturer: String,
    pub model: String,
}
