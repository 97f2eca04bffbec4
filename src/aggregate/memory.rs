//! Memory module grouping and DDR generation inference

use crate::data::MemoryModuleRecord;
use crate::utils::format::{format_byte_size, infer_ddr_generation, SizeUnits, UNKNOWN};

const UNKNOWN_MANUFACTURER: &str = "Unknown manufacturer";
const UNKNOWN_PART: &str = "Unknown part";

/// Modules sharing a (manufacturer, part number) key.
///
/// The capacity is taken from the first module of the group; modules of the
/// same part are assumed to be the same size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryGroup {
    pub manufacturer: String,
    pub part_number: String,
    pub count: usize,
    pub capacity_bytes: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryReport {
    pub total_bytes: u64,
    pub groups: Vec<MemoryGroup>,
    /// Most common positive speed, first seen wins a tie
    pub modal_speed_mhz: Option<u32>,
    pub mixed_speeds: bool,
}

impl MemoryReport {
    pub fn ddr_generation(&self) -> &'static str {
        infer_ddr_generation(self.modal_speed_mhz.unwrap_or(0))
    }

    pub fn frequency_display(&self) -> String {
        match self.modal_speed_mhz {
            Some(speed) if self.mixed_speeds => format!("{}MHz (mixed)", speed),
            Some(speed) => format!("{}MHz", speed),
            None => UNKNOWN.to_string(),
        }
    }

    /// Summary line followed by one line per group
    pub fn render(&self) -> String {
        let mut lines = vec![format!(
            "{} {} {}",
            format_byte_size(self.total_bytes, SizeUnits::Gigabytes { precision: 2 }),
            self.ddr_generation(),
            self.frequency_display()
        )];

        for group in &self.groups {
            lines.push(format!(
                "{} ({} x {} [{}])",
                group.manufacturer,
                group.count,
                format_byte_size(group.capacity_bytes, SizeUnits::Gigabytes { precision: 0 }),
                group.part_number
            ));
        }
        lines.join("\n")
    }
}

fn normalize(value: &str, fallback: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}

/// Group modules by exact (manufacturer, part) key.
///
/// Manufacturers keep first-seen order and parts keep first-seen order within
/// their manufacturer. The key is case-sensitive, so `Kingston` and
/// `KINGSTON` land in separate groups.
pub fn aggregate_memory(modules: &[MemoryModuleRecord]) -> MemoryReport {
    let mut by_manufacturer: Vec<(String, Vec<MemoryGroup>)> = Vec::new();
    let mut total_bytes: u64 = 0;
    let mut speeds: Vec<(u32, usize)> = Vec::new();

    for module in modules {
        total_bytes = total_bytes.saturating_add(module.capacity_bytes);

        let manufacturer = normalize(&module.manufacturer, UNKNOWN_MANUFACTURER);
        let part_number = normalize(&module.part_number, UNKNOWN_PART);

        let idx = match by_manufacturer.iter().position(|(m, _)| *m == manufacturer) {
            Some(idx) => idx,
            None => {
                by_manufacturer.push((manufacturer.clone(), Vec::new()));
                by_manufacturer.len() - 1
            }
        };
        let parts = &mut by_manufacturer[idx].1;

        match parts.iter_mut().find(|g| g.part_number == part_number) {
            Some(group) => group.count += 1,
            None => parts.push(MemoryGroup {
                manufacturer,
                part_number,
                count: 1,
                capacity_bytes: module.capacity_bytes,
            }),
        }

        if module.speed_mhz > 0 {
            match speeds.iter_mut().find(|(speed, _)| *speed == module.speed_mhz) {
                Some((_, count)) => *count += 1,
                None => speeds.push((module.speed_mhz, 1)),
            }
        }
    }

    // max_by_key keeps the last maximum, so scan in reverse to favour first seen
    let modal_speed_mhz = speeds
        .iter()
        .rev()
        .max_by_key(|(_, count)| *count)
        .map(|(speed, _)| *speed);

    MemoryReport {
        total_bytes,
        groups: by_manufacturer.into_iter().flat_map(|(_, g)| g).collect(),
        modal_speed_mhz,
        mixed_speeds: speeds.len() > 1,
    }
}

/// Rendered RAM field; empty when no modules were reported
pub fn render_memory(modules: &[MemoryModuleRecord]) -> String {
    if modules.is_empty() {
        return String::new();
    }
    aggregate_memory(modules).render()
}
