//! Aggregation: runs every provider domain and assembles the summary
//!
//! Each domain query is isolated. A failing or panicking provider only
//! costs its own field, and the first unexpected fault is surfaced through
//! the OS identity field so the pass never fails as a whole.

pub mod gpu;
pub mod memory;
pub mod monitor;
pub mod os;

use crate::collectors::{MonitorSource, Provider};
use crate::data::{
    DomainReport, DomainStatus, DriveRecord, Domain, HardwareSummary, NetworkAdapterRecord,
};
use crate::error::Result;
use crate::utils::format::{format_byte_size, join_vertical, SizeUnits};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Drives below this size are placeholders (card readers, virtual media)
pub const MIN_DRIVE_BYTES: u64 = 10 * 1024 * 1024 * 1024;

/// Case-sensitive name markers for adapters that are not physical NICs
const EXCLUDED_NETWORK_MARKERS: &[&str] = &["WAN Miniport", "Bluetooth", "蓝牙", "Loopback"];

pub const FAILURE_PREFIX: &str = "Error while collecting system information";

pub fn is_listed_network_adapter(adapter: &NetworkAdapterRecord) -> bool {
    let name = adapter.name.trim();
    !name.is_empty()
        && !name.to_lowercase().contains("virtual")
        && !EXCLUDED_NETWORK_MARKERS.iter().any(|m| name.contains(m))
        && !adapter.mac_address.trim().is_empty()
}

pub fn is_listed_drive(drive: &DriveRecord) -> bool {
    !drive.model.trim().is_empty() && drive.size_bytes >= MIN_DRIVE_BYTES
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "provider panicked".to_string()
    }
}

/// Run one domain query, record its outcome and hand back the records.
///
/// `None` when the query did not produce an answer.
fn probe<T>(
    report: &mut Vec<DomainReport>,
    domain: Domain,
    query: impl FnOnce() -> Result<Vec<T>>,
) -> Option<Vec<T>> {
    let (status, records) = match panic::catch_unwind(AssertUnwindSafe(query)) {
        Ok(Ok(records)) if records.is_empty() => (DomainStatus::Empty, Some(records)),
        Ok(Ok(records)) => (DomainStatus::Collected(records.len()), Some(records)),
        Ok(Err(err)) if err.is_unavailable() => {
            debug!("{} unavailable: {}", domain, err);
            (DomainStatus::Unavailable(err.to_string()), None)
        }
        Ok(Err(err)) => {
            warn!("{} query failed: {}", domain, err);
            (DomainStatus::Failed(err.to_string()), None)
        }
        Err(payload) => {
            let msg = panic_message(payload.as_ref());
            error!("{} provider panicked: {}", domain, msg);
            (DomainStatus::Failed(msg), None)
        }
    };

    debug!(domain = %domain, status = ?status, "domain collected");
    report.push(DomainReport { domain, status });
    records
}

/// A primary monitor fault is not a pass failure once the fallback source
/// has produced names.
fn excuse_primary_failure(primary: &mut DomainReport) {
    if let DomainStatus::Failed(reason) = &primary.status {
        debug!("primary monitor source failed, fallback answered: {}", reason);
        primary.status = DomainStatus::Unavailable(reason.clone());
    }
}

/// Collect one summary from the provider. Never fails; faults are folded
/// into the summary.
pub fn collect_summary(provider: &dyn Provider) -> HardwareSummary {
    let started = Instant::now();
    let mut summary = HardwareSummary::default();
    let mut report = Vec::new();

    if let Some(record) = probe(&mut report, Domain::Os, || provider.operating_system())
        .and_then(|records| records.into_iter().next())
    {
        let identity = os::render_os(&record);
        summary.os_info = identity.os_info;
        summary.version = identity.version;
        summary.install_time = identity.install_time;
        summary.boot_time = identity.boot_time;
    }

    if let Some(record) = probe(&mut report, Domain::Computer, || provider.computer())
        .and_then(|records| records.into_iter().next())
    {
        summary.computer_name = record.name.trim().to_string();
        let (manufacturer, model) = os::render_computer(&record);
        summary.manufacturer = manufacturer;
        summary.model = model;
    }

    if let Some(board) = probe(&mut report, Domain::Motherboard, || provider.motherboards())
        .and_then(|records| records.into_iter().next())
    {
        summary.motherboard = os::render_motherboard(&board);
    }

    if let Some(cpu) = probe(&mut report, Domain::Cpu, || provider.cpus())
        .and_then(|records| records.into_iter().next())
    {
        summary.cpu = os::render_cpu(&cpu);
    }

    if let Some(modules) = probe(&mut report, Domain::Memory, || provider.memory_modules()) {
        summary.ram = memory::render_memory(&modules);
    }

    if let Some(gpus) = probe(&mut report, Domain::Gpu, || provider.video_controllers()) {
        if !gpus.is_empty() {
            let drivers = probe(&mut report, Domain::Drivers, || provider.display_drivers())
                .unwrap_or_default();
            summary.gpu = gpu::render_gpus(&gpus, &drivers);
        }
    }

    if let Some(drives) = probe(&mut report, Domain::Drives, || provider.drives()) {
        if !drives.is_empty() {
            let listed: Vec<String> = drives
                .iter()
                .filter(|d| is_listed_drive(d))
                .map(|d| {
                    format!(
                        "{} ({})",
                        d.model.trim(),
                        format_byte_size(d.size_bytes, SizeUnits::TerabytesOrGigabytes)
                    )
                })
                .collect();
            summary.hdd = join_vertical(&listed);
        }
    }

    if let Some(adapters) = probe(&mut report, Domain::Network, || provider.network_adapters()) {
        if !adapters.is_empty() {
            let listed: Vec<String> = adapters
                .iter()
                .filter(|a| is_listed_network_adapter(a))
                .map(|a| a.name.trim().to_string())
                .collect();
            summary.network = join_vertical(&listed);
        }
    }

    if let Some(devices) = probe(&mut report, Domain::Audio, || provider.audio_devices()) {
        if !devices.is_empty() {
            let listed: Vec<String> = devices
                .iter()
                .map(|d| d.name.trim().to_string())
                .filter(|name| !name.is_empty())
                .collect();
            summary.audio = join_vertical(&listed);
        }
    }

    let primary_at = report.len();
    let mut displays = probe(&mut report, Domain::Monitors, || {
        provider.monitors(MonitorSource::Primary)
    })
    .map(|records| monitor::resolve_monitors(&records))
    .unwrap_or_default();
    if displays.is_empty() {
        debug!("no usable monitor names from primary source, trying fallback");
        displays = probe(&mut report, Domain::Monitors, || {
            provider.monitors(MonitorSource::Fallback)
        })
        .map(|records| monitor::resolve_monitors(&records))
        .unwrap_or_default();
        if !displays.is_empty() {
            excuse_primary_failure(&mut report[primary_at]);
        }
    }
    summary.display = join_vertical(&displays);

    if let Some((domain, reason)) = report.iter().find_map(|r| match &r.status {
        DomainStatus::Failed(reason) => Some((r.domain, reason.clone())),
        _ => None,
    }) {
        summary.os_info = format!("{}: {} ({})", FAILURE_PREFIX, reason, domain);
    }

    summary.report = report;
    info!(
        elapsed_ms = started.elapsed().as_millis() as u64,
        degraded = summary.is_degraded(),
        "hardware summary collected"
    );
    summary
}
