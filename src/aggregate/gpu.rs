//! Pairs video controllers with installed display drivers

use crate::data::{DriverRecord, GpuRecord};
use crate::utils::format::{format_byte_size, join_vertical, SizeUnits, UNKNOWN};
use crate::utils::parsing::format_driver_date;

/// Vendor keywords; a driver matches a controller when both names contain
/// the same keyword.
const VENDOR_KEYWORDS: &[&str] = &["nvidia", "geforce", "amd", "radeon"];

/// Adapters that are never shown (hypervisor and fallback framebuffers)
const EXCLUDED_ADAPTERS: &[&str] = &["virtual", "microsoft basic display", "basic display adapter"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverInfo {
    pub version: String,
    /// `YYYY/MM/DD`, empty when the provider gave no usable date
    pub date: String,
}

#[derive(Debug, Clone)]
struct DriverEntry {
    key: String,
    info: DriverInfo,
}

/// Display drivers keyed by device name, case-insensitive, insertion ordered
#[derive(Debug, Clone, Default)]
pub struct DriverIndex {
    entries: Vec<DriverEntry>,
}

impl DriverIndex {
    /// Build the index, skipping drivers without a name or version
    pub fn build(drivers: &[DriverRecord]) -> Self {
        let mut index = Self::default();
        for driver in drivers {
            let name = driver.device_name.trim();
            let version = driver.version.trim();
            if name.is_empty() || version.is_empty() {
                continue;
            }
            index.insert(
                name,
                DriverInfo {
                    version: version.to_string(),
                    date: format_driver_date(&driver.date),
                },
            );
        }
        index
    }

    /// Insert or replace; a replaced entry keeps its original position
    pub fn insert(&mut self, device_name: &str, info: DriverInfo) {
        let key = device_name.to_lowercase();
        match self.entries.iter_mut().find(|e| e.key == key) {
            Some(entry) => entry.info = info,
            None => self.entries.push(DriverEntry { key, info }),
        }
    }

    /// First driver sharing a vendor keyword with the controller, otherwise
    /// the first driver in the index as a best-effort guess.
    pub fn match_controller(&self, controller_name: &str) -> Option<&DriverInfo> {
        let controller = controller_name.to_lowercase();

        self.entries
            .iter()
            .find(|entry| {
                VENDOR_KEYWORDS
                    .iter()
                    .any(|kw| entry.key.contains(kw) && controller.contains(kw))
            })
            .or_else(|| self.entries.first())
            .map(|entry| &entry.info)
    }
}

pub fn is_excluded_adapter(name: &str) -> bool {
    let lower = name.to_lowercase();
    EXCLUDED_ADAPTERS.iter().any(|marker| lower.contains(marker))
}

/// Render one controller with its VRAM and resolved driver
pub fn render_controller(gpu: &GpuRecord, drivers: &DriverIndex) -> String {
    let name = match gpu.name.trim() {
        "" => UNKNOWN,
        trimmed => trimmed,
    };

    let mut display = name.to_string();
    let vram = format_byte_size(gpu.adapter_ram_bytes, SizeUnits::GigabytesOrMegabytes);
    if vram != UNKNOWN {
        display.push_str(&format!(" ({})", vram));
    }

    match drivers.match_controller(name) {
        Some(driver) => {
            display.push_str(&format!("\nDriver: {}", driver.version));
            if !driver.date.is_empty() {
                display.push_str(&format!(" ({})", driver.date));
            }
        }
        None => display.push_str("\nDriver: not detected"),
    }
    display
}

/// Rendered GPU field; empty when no controllers were detected
pub fn render_gpus(gpus: &[GpuRecord], drivers: &[DriverRecord]) -> String {
    if gpus.is_empty() {
        return String::new();
    }

    let index = DriverIndex::build(drivers);
    let rendered: Vec<String> = gpus
        .iter()
        .filter(|gpu| !is_excluded_adapter(&gpu.name))
        .map(|gpu| render_controller(gpu, &index))
        .collect();

    join_vertical(&rendered)
}
