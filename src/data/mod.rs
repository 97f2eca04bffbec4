//! Data structures shared between providers and aggregators

pub mod hardware;
pub mod summary;
pub mod system;

pub use hardware::{
    AudioDeviceRecord, CpuRecord, DriveRecord, DriverRecord, GpuRecord, MemoryModuleRecord,
    MonitorRecord, MotherboardRecord, NetworkAdapterRecord,
};
pub use summary::{Domain, DomainReport, DomainStatus, HardwareSummary};
pub use system::{ComputerRecord, OsRecord};
