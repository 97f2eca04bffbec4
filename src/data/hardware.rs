//! Raw hardware records as returned by a provider
//!
//! Fields are copied verbatim from the provider. Empty strings and zero
//! numbers mean "not reported"; the aggregators substitute the `Unknown`
//! sentinel when rendering.

/// One processor package
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CpuRecord {
    pub name: String,
    pub cores: u32,
    pub threads: u32,
    /// Maximum clock in MHz, 0 when unknown
    pub max_clock_mhz: u32,
}

/// One installed memory module (SMBIOS type 17 or equivalent)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryModuleRecord {
    pub manufacturer: String,
    pub part_number: String,
    pub capacity_bytes: u64,
    /// Configured speed in MHz (MT/s), 0 when unknown
    pub speed_mhz: u32,
}

impl MemoryModuleRecord {
    pub fn new(manufacturer: &str, part_number: &str, capacity_bytes: u64, speed_mhz: u32) -> Self {
        Self {
            manufacturer: manufacturer.to_string(),
            part_number: part_number.to_string(),
            capacity_bytes,
            speed_mhz,
        }
    }
}

/// A detected video controller
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GpuRecord {
    pub name: String,
    pub adapter_ram_bytes: u64,
}

/// An installed display-class driver
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DriverRecord {
    pub device_name: String,
    pub version: String,
    /// Raw `YYYYMMDDHHMMSS...` timestamp, may be empty
    pub date: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DriveRecord {
    pub model: String,
    pub size_bytes: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NetworkAdapterRecord {
    pub name: String,
    /// Hardware address, empty when the adapter has none
    pub mac_address: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AudioDeviceRecord {
    pub name: String,
}

/// A monitor as named by the provider, e.g. `Generic PnP Monitor (DELL U2720Q)`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonitorRecord {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MotherboardRecord {
    pub manufacturer: String,
    pub product: String,
}
