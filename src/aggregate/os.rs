//! OS identity, computer identity and CPU rendering

use crate::data::{ComputerRecord, CpuRecord, MotherboardRecord, OsRecord};
use crate::utils::format::{clean_cpu_name, UNKNOWN};
use crate::utils::parsing::{format_timestamp, format_uptime};

/// Minimum Windows build number → marketing version, highest threshold first
const DISPLAY_VERSIONS: &[(u32, &str)] = &[
    (26000, "25H2"),
    (25300, "25H1"),
    (22621, "23H2"),
    (22600, "23H1"),
    (22000, "22H2"),
    (20348, "21H2"),
    (19045, "22H2"),
    (19044, "21H2"),
    (19043, "21H1"),
    (19042, "20H2"),
    (19041, "2004"),
    (18363, "1909"),
    (18362, "1903"),
    (17763, "1809"),
    (17134, "1803"),
    (16299, "1709"),
    (15063, "1703"),
    (14393, "1607"),
    (10586, "1511"),
    (10240, "1507"),
];

/// Marketing version for a build number, `None` when unknown or unparseable
pub fn display_version(build_number: &str) -> Option<&'static str> {
    let build: u32 = build_number.trim().parse().ok()?;
    DISPLAY_VERSIONS
        .iter()
        .find(|(min, _)| build >= *min)
        .map(|(_, label)| *label)
}

fn normalize_architecture(architecture: &str) -> String {
    let architecture = architecture.trim();
    if architecture.is_empty() || architecture.contains("64") {
        "X64".to_string()
    } else if architecture.contains("32") {
        "X86".to_string()
    } else {
        architecture.to_string()
    }
}

fn or_unknown(value: &str) -> String {
    match value.trim() {
        "" => UNKNOWN.to_string(),
        trimmed => trimmed.to_string(),
    }
}

/// Rendered OS fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OsIdentity {
    pub os_info: String,
    pub version: String,
    pub install_time: String,
    pub boot_time: String,
}

pub fn render_os(os: &OsRecord) -> OsIdentity {
    let caption = or_unknown(&os.caption.replace("Microsoft", ""));
    let version = os.version.trim();

    OsIdentity {
        os_info: format!("{} {}", caption, normalize_architecture(&os.architecture)),
        version: match display_version(&os.build_number) {
            Some(label) if version.is_empty() => label.to_string(),
            Some(label) => format!("{} {}", label, version),
            None => version.to_string(),
        },
        install_time: format_timestamp(os.install_date.trim()),
        boot_time: format_uptime(os.last_boot_up_time.trim()),
    }
}

/// (manufacturer, model) of the computer system
pub fn render_computer(computer: &ComputerRecord) -> (String, String) {
    (or_unknown(&computer.manufacturer), or_unknown(&computer.model))
}

pub fn render_motherboard(board: &MotherboardRecord) -> String {
    format!("{} {}", board.manufacturer.trim(), or_unknown(&board.product))
        .trim()
        .to_string()
}

pub fn render_cpu(cpu: &CpuRecord) -> String {
    let max_speed = if cpu.max_clock_mhz > 0 {
        cpu.max_clock_mhz.to_string()
    } else {
        UNKNOWN.to_string()
    };
    format!(
        "{} ({} cores/{} threads {}MHz)",
        clean_cpu_name(&cpu.name),
        cpu.cores,
        cpu.threads,
        max_speed
    )
}
