//! Provider boundary and the sysfs-backed reference provider
//!
//! A provider answers one synchronous query per hardware domain. A missing
//! capability (no sound cards, no DRM) is `Ok(vec![])`; errors are reserved
//! for queries that could not be answered.

pub mod hardware;
pub mod system;

use crate::data::{
    AudioDeviceRecord, ComputerRecord, CpuRecord, DriveRecord, DriverRecord, GpuRecord,
    MemoryModuleRecord, MonitorRecord, MotherboardRecord, NetworkAdapterRecord, OsRecord,
};
use crate::error::Result;
use std::path::{Path, PathBuf};

/// Where monitor names are read from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorSource {
    /// Device-level records (EDID on Linux)
    Primary,
    /// Consulted only when the primary source yields no usable names
    Fallback,
}

pub trait Provider: Send + Sync {
    fn operating_system(&self) -> Result<Vec<OsRecord>>;
    fn computer(&self) -> Result<Vec<ComputerRecord>>;
    fn motherboards(&self) -> Result<Vec<MotherboardRecord>>;
    fn cpus(&self) -> Result<Vec<CpuRecord>>;
    fn memory_modules(&self) -> Result<Vec<MemoryModuleRecord>>;
    fn video_controllers(&self) -> Result<Vec<GpuRecord>>;
    fn display_drivers(&self) -> Result<Vec<DriverRecord>>;
    fn drives(&self) -> Result<Vec<DriveRecord>>;
    fn network_adapters(&self) -> Result<Vec<NetworkAdapterRecord>>;
    fn audio_devices(&self) -> Result<Vec<AudioDeviceRecord>>;
    fn monitors(&self, source: MonitorSource) -> Result<Vec<MonitorRecord>>;
}

/// Reads `/proc`, `/sys` and SMBIOS tables below a filesystem root.
///
/// The root is `/` on a live host; tests point it at a fake tree.
#[derive(Debug, Clone)]
pub struct SysfsProvider {
    root: PathBuf,
}

impl Default for SysfsProvider {
    fn default() -> Self {
        Self::new("/")
    }
}

impl SysfsProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Join a root-relative path such as `sys/class/net`
    pub(crate) fn path(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    /// External tools describe the live host only
    pub(crate) fn is_live(&self) -> bool {
        self.root == Path::new("/")
    }
}

impl Provider for SysfsProvider {
    fn operating_system(&self) -> Result<Vec<OsRecord>> {
        system::read_os(self).map(|os| vec![os])
    }

    fn computer(&self) -> Result<Vec<ComputerRecord>> {
        system::read_computer(self).map(|computer| vec![computer])
    }

    fn motherboards(&self) -> Result<Vec<MotherboardRecord>> {
        system::read_motherboards(self)
    }

    fn cpus(&self) -> Result<Vec<CpuRecord>> {
        hardware::read_cpus(self)
    }

    fn memory_modules(&self) -> Result<Vec<MemoryModuleRecord>> {
        hardware::read_memory_modules(self)
    }

    fn video_controllers(&self) -> Result<Vec<GpuRecord>> {
        hardware::read_video_controllers(self)
    }

    fn display_drivers(&self) -> Result<Vec<DriverRecord>> {
        hardware::read_display_drivers(self)
    }

    fn drives(&self) -> Result<Vec<DriveRecord>> {
        hardware::read_drives(self)
    }

    fn network_adapters(&self) -> Result<Vec<NetworkAdapterRecord>> {
        hardware::read_network_adapters(self)
    }

    fn audio_devices(&self) -> Result<Vec<AudioDeviceRecord>> {
        hardware::read_audio_devices(self)
    }

    fn monitors(&self, source: MonitorSource) -> Result<Vec<MonitorRecord>> {
        match source {
            MonitorSource::Primary => hardware::read_edid_monitors(self),
            MonitorSource::Fallback => hardware::read_connector_monitors(self),
        }
    }
}
