//! Hardware record collection (CPU, memory, GPU, drives, network, audio, monitors)

use super::SysfsProvider;
use crate::data::{
    AudioDeviceRecord, CpuRecord, DriveRecord, DriverRecord, GpuRecord, MemoryModuleRecord,
    MonitorRecord, NetworkAdapterRecord,
};
use crate::error::{HwdashError, Result};
use crate::utils::{command::*, file::*, parsing::extract_after_colon};
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader};
use tracing::debug;

const PCI_IDS_PATHS: &[&str] = &[
    "usr/share/hwdata/pci.ids",
    "usr/share/misc/pci.ids",
    "usr/share/pci.ids",
];

/// Block devices that never describe physical drives
const PSEUDO_BLOCK_PREFIXES: &[&str] = &["loop", "ram", "zram", "dm-", "sr", "fd"];

// CPU

/// One record per physical package found in `/proc/cpuinfo`
pub fn read_cpus(provider: &SysfsProvider) -> Result<Vec<CpuRecord>> {
    let file = File::open(provider.path("proc/cpuinfo"))?;
    let reader = BufReader::new(file);

    // (physical id, model name, cpu cores, siblings, logical processors, cpu MHz)
    let mut packages: Vec<(String, String, u32, u32, u32, f64)> = Vec::new();
    let mut physical_id = String::from("0");
    let mut block: Vec<(String, String)> = Vec::new();

    let mut flush = |block: &mut Vec<(String, String)>, physical_id: &str| {
        // trailing board blocks on ARM carry no "processor" entry
        if !block.iter().any(|(k, _)| k == "processor") {
            block.clear();
            return;
        }
        let get = |key: &str| {
            block
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str())
        };
        let name = get("model name")
            .or_else(|| get("Model"))
            .unwrap_or_default()
            .to_string();
        let cores = get("cpu cores").and_then(|v| v.parse().ok()).unwrap_or(0);
        let siblings = get("siblings").and_then(|v| v.parse().ok()).unwrap_or(0);
        let mhz = get("cpu MHz").and_then(|v| v.parse().ok()).unwrap_or(0.0);

        match packages.iter_mut().find(|p| p.0 == physical_id) {
            Some(package) => package.4 += 1,
            None => packages.push((physical_id.to_string(), name, cores, siblings, 1, mhz)),
        }
        block.clear();
    };

    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            flush(&mut block, &physical_id);
            physical_id = String::from("0");
            continue;
        }
        let Some((key, _)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim().to_string();
        let value = extract_after_colon(&line).unwrap_or_default();
        if key == "physical id" {
            physical_id = value.clone();
        }
        block.push((key, value));
    }
    flush(&mut block, &physical_id);

    let max_khz = read_optional(provider.path("sys/devices/system/cpu/cpu0/cpufreq/cpuinfo_max_freq"))?
        .and_then(|raw| raw.parse::<u64>().ok());

    Ok(packages
        .into_iter()
        .map(|(_, name, cores, siblings, logical, mhz)| {
            let threads = if siblings > 0 { siblings } else { logical };
            CpuRecord {
                name,
                cores: if cores > 0 { cores } else { threads },
                threads,
                max_clock_mhz: match max_khz {
                    Some(khz) => (khz / 1000) as u32,
                    None => mhz.round() as u32,
                },
            }
        })
        .collect())
}

// Memory

fn le_u16(raw: &[u8], offset: usize) -> Option<u16> {
    raw.get(offset..offset + 2)
        .map(|b| u16::from_le_bytes([b[0], b[1]]))
}

fn le_u32(raw: &[u8], offset: usize) -> Option<u32> {
    raw.get(offset..offset + 4)
        .map(|b| u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
}

/// Resolve a 1-based SMBIOS string index from the strings area after the
/// formatted section.
fn smbios_string(raw: &[u8], formatted_len: usize, index: u8) -> String {
    if index == 0 {
        return String::new();
    }
    raw.get(formatted_len..)
        .unwrap_or_default()
        .split(|b| *b == 0)
        .nth(index as usize - 1)
        .map(|s| String::from_utf8_lossy(s).trim().to_string())
        .unwrap_or_default()
}

/// Decode an SMBIOS type 17 (Memory Device) structure.
///
/// `None` for empty slots and structures that are not type 17.
pub fn parse_memory_device(raw: &[u8]) -> Option<MemoryModuleRecord> {
    if raw.first() != Some(&17) {
        return None;
    }
    let formatted_len = *raw.get(1)? as usize;

    let size = le_u16(raw, 0x0C)?;
    let capacity_bytes = match size {
        0 | 0xFFFF => return None,
        0x7FFF => (le_u32(raw, 0x1C)? & 0x7FFF_FFFF) as u64 * 1024 * 1024,
        s if s & 0x8000 != 0 => (s & 0x7FFF) as u64 * 1024,
        s => s as u64 * 1024 * 1024,
    };

    let speed_mhz = match le_u16(raw, 0x15).unwrap_or(0) {
        0xFFFF => le_u32(raw, 0x54).unwrap_or(0),
        0 => le_u16(raw, 0x20).map(u32::from).unwrap_or(0),
        speed => speed as u32,
    };

    Some(MemoryModuleRecord {
        manufacturer: smbios_string(raw, formatted_len, raw.get(0x17).copied().unwrap_or(0)),
        part_number: smbios_string(raw, formatted_len, raw.get(0x1A).copied().unwrap_or(0)),
        capacity_bytes,
        speed_mhz,
    })
}

/// Installed modules from the SMBIOS type 17 entries exported by the kernel.
/// The raw tables are root-only on most systems, which reads as unavailable.
pub fn read_memory_modules(provider: &SysfsProvider) -> Result<Vec<MemoryModuleRecord>> {
    let entries_dir = provider.path("sys/firmware/dmi/entries");
    let mut modules = Vec::new();

    for entry in list_dir(&entries_dir)? {
        if !entry.starts_with("17-") {
            continue;
        }
        let raw = fs::read(entries_dir.join(&entry).join("raw"))?;
        match parse_memory_device(&raw) {
            Some(module) => modules.push(module),
            None => debug!("skipping empty memory slot {}", entry),
        }
    }
    Ok(modules)
}

// PCI naming

fn vendor_label(vendor: &str) -> String {
    if vendor.contains("NVIDIA") {
        "NVIDIA".to_string()
    } else if vendor.contains("Advanced Micro Devices") || vendor.contains("AMD") {
        "AMD".to_string()
    } else if vendor.contains("Intel") {
        "Intel".to_string()
    } else {
        vendor.trim().to_string()
    }
}

fn vendor_label_from_id(vendor_id: u64) -> &'static str {
    match vendor_id {
        0x10de => "NVIDIA",
        0x1002 => "AMD",
        0x8086 => "Intel",
        0x1af4 => "Red Hat Virtio",
        0x15ad => "VMware Virtual",
        0x1234 => "QEMU Virtual",
        _ => "Unknown vendor",
    }
}

/// Compose a marketing name from PCI vendor and device strings, e.g.
/// `NVIDIA Corporation` + `AD103 [GeForce RTX 4080]` gives `NVIDIA GeForce RTX 4080`.
pub fn compose_device_name(vendor: &str, device: &str) -> String {
    let label = vendor_label(vendor);

    let model = match (device.rfind('['), device.rfind(']')) {
        (Some(start), Some(end)) if end > start + 1 => last_in_range(&device[start + 1..end]),
        _ => device.trim().to_string(),
    };

    if model.is_empty() {
        label
    } else if model.starts_with(&label) {
        model
    } else {
        format!("{} {}", label, model)
    }
}

/// Pick the last model of a range such as "Radeon RX 7700 XT / 7800 XT",
/// carrying over the family words the later entries leave out.
fn last_in_range(models: &str) -> String {
    let first = models.split(" / ").next().unwrap_or(models).trim();
    let last = models.rsplit(" / ").next().unwrap_or(models).trim();

    let first_words: Vec<&str> = first.split_whitespace().collect();
    let last_len = last.split_whitespace().count();
    if last_len == 0 || last_len >= first_words.len() {
        return last.to_string();
    }
    let family = first_words[..first_words.len() - last_len].join(" ");
    format!("{} {}", family, last)
}

/// Look up vendor and device names in a pci.ids database below the root
fn lookup_pci_ids(provider: &SysfsProvider, vendor_id: u64, device_id: u64) -> Option<(String, String)> {
    let path = PCI_IDS_PATHS
        .iter()
        .map(|p| provider.path(p))
        .find(|p| p.exists())?;
    let reader = BufReader::new(File::open(path).ok()?);

    let vendor_key = format!("{:04x}", vendor_id);
    let device_key = format!("\t{:04x}", device_id);
    let mut vendor_name: Option<String> = None;

    for line in reader.lines() {
        let line = line.ok()?;
        match &vendor_name {
            None => {
                if line.starts_with(&vendor_key) {
                    vendor_name = Some(line[vendor_key.len()..].trim().to_string());
                }
            }
            Some(vendor) => {
                if line.starts_with(&device_key) {
                    return Some((vendor.clone(), line[device_key.len()..].trim().to_string()));
                }
                // next vendor block: device is not listed
                if !line.starts_with('\t') && !line.starts_with('#') && !line.is_empty() {
                    return Some((vendor.clone(), String::new()));
                }
            }
        }
    }
    vendor_name.map(|vendor| (vendor, String::new()))
}

fn lookup_lspci(slot: &str) -> Option<(String, String)> {
    let output = run_command("lspci", &["-mm", "-s", slot]).ok()?;
    let fields = split_machine_fields(output.lines().next()?);
    Some((fields.get(2)?.clone(), fields.get(3)?.clone()))
}

fn uevent_value(provider: &SysfsProvider, relative: &str, key: &str) -> Option<String> {
    let uevent = read_optional(provider.path(relative)).ok().flatten()?;
    uevent
        .lines()
        .find_map(|line| line.strip_prefix(key)?.strip_prefix('='))
        .map(|v| v.trim().to_string())
}

/// Name a PCI function by its vendor/device ids
fn pci_device_name(provider: &SysfsProvider, device_dir: &str) -> Option<String> {
    let vendor_id = read_number(provider.path(&format!("{}/vendor", device_dir))).ok()?;
    let device_id = read_number(provider.path(&format!("{}/device", device_dir))).ok()?;

    let names = lookup_pci_ids(provider, vendor_id, device_id).or_else(|| {
        let slot = uevent_value(provider, &format!("{}/uevent", device_dir), "PCI_SLOT_NAME")?;
        provider.is_live().then(|| lookup_lspci(&slot)).flatten()
    });

    Some(match names {
        Some((vendor, device)) => compose_device_name(&vendor, &device),
        None => format!(
            "{} [{:04x}:{:04x}]",
            vendor_label_from_id(vendor_id),
            vendor_id,
            device_id
        ),
    })
}

// GPU

struct DrmCard {
    name: String,
    driver: String,
    vram_bytes: u64,
}

fn is_drm_card(entry: &str) -> bool {
    entry
        .strip_prefix("card")
        .map(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()))
        .unwrap_or(false)
}

fn read_drm_cards(provider: &SysfsProvider) -> Result<Vec<DrmCard>> {
    let mut cards = Vec::new();

    for entry in list_dir(provider.path("sys/class/drm"))? {
        if !is_drm_card(&entry) {
            continue;
        }
        let device_dir = format!("sys/class/drm/{}/device", entry);
        let Some(name) = pci_device_name(provider, &device_dir) else {
            debug!("{} has no PCI identity, skipping", entry);
            continue;
        };

        cards.push(DrmCard {
            name,
            driver: uevent_value(provider, &format!("{}/uevent", device_dir), "DRIVER")
                .unwrap_or_default(),
            vram_bytes: read_number(provider.path(&format!("{}/mem_info_vram_total", device_dir)))
                .unwrap_or(0),
        });
    }
    Ok(cards)
}

pub fn read_video_controllers(provider: &SysfsProvider) -> Result<Vec<GpuRecord>> {
    Ok(read_drm_cards(provider)?
        .into_iter()
        .map(|card| GpuRecord {
            name: card.name,
            adapter_ram_bytes: card.vram_bytes,
        })
        .collect())
}

fn nvidia_driver_version(provider: &SysfsProvider) -> Option<String> {
    // "NVRM version: NVIDIA UNIX x86_64 Kernel Module  550.54.14  Thu Feb 22 01:44:30 UTC 2024"
    let raw = read_optional(provider.path("proc/driver/nvidia/version")).ok().flatten()?;
    let line = raw.lines().next()?;
    let after = line.split("Kernel Module").nth(1)?;
    after.split_whitespace().next().map(str::to_string)
}

/// One driver per DRM card, named after the card it drives
pub fn read_display_drivers(provider: &SysfsProvider) -> Result<Vec<DriverRecord>> {
    let kernel_release = read_attribute(provider.path("proc/sys/kernel/osrelease"));
    let mut drivers = Vec::new();

    for card in read_drm_cards(provider)? {
        if card.driver.is_empty() {
            continue;
        }
        let module_version = read_attribute(provider.path(&format!("sys/module/{}/version", card.driver)));
        let version = if !module_version.is_empty() {
            module_version
        } else if card.driver == "nvidia" {
            nvidia_driver_version(provider).unwrap_or_default()
        } else {
            // in-tree drivers are versioned with the kernel
            kernel_release.clone()
        };

        drivers.push(DriverRecord {
            device_name: card.name,
            version,
            date: String::new(),
        });
    }
    Ok(drivers)
}

// Drives

pub fn read_drives(provider: &SysfsProvider) -> Result<Vec<DriveRecord>> {
    let mut drives = Vec::new();

    for entry in list_dir(provider.path("sys/block"))? {
        if PSEUDO_BLOCK_PREFIXES.iter().any(|p| entry.starts_with(p)) {
            continue;
        }
        let sectors = read_number(provider.path(&format!("sys/block/{}/size", entry))).unwrap_or(0);
        drives.push(DriveRecord {
            model: read_attribute(provider.path(&format!("sys/block/{}/device/model", entry))),
            size_bytes: sectors.saturating_mul(512),
        });
    }
    Ok(drives)
}

// Network

fn normalize_mac(address: &str) -> String {
    let address = address.trim();
    if address.is_empty() || address.bytes().all(|b| b == b'0' || b == b':') {
        String::new()
    } else {
        address.to_string()
    }
}

/// Interfaces without a backing device are software-defined (bridges, veth,
/// tunnels) and are labelled as virtual.
pub fn read_network_adapters(provider: &SysfsProvider) -> Result<Vec<NetworkAdapterRecord>> {
    let mut adapters = Vec::new();

    for iface in list_dir(provider.path("sys/class/net"))? {
        let device_dir = format!("sys/class/net/{}/device", iface);
        let name = if !provider.path(&device_dir).exists() {
            format!("Virtual adapter {}", iface)
        } else {
            match pci_device_name(provider, &device_dir) {
                Some(product) => format!("{} ({})", product, iface),
                None => iface.clone(),
            }
        };

        adapters.push(NetworkAdapterRecord {
            name,
            mac_address: normalize_mac(&read_attribute(provider.path(&format!(
                "sys/class/net/{}/address",
                iface
            )))),
        });
    }
    Ok(adapters)
}

// Audio

/// Card names from `/proc/asound/cards`:
/// ` 0 [PCH            ]: HDA-Intel - HDA Intel PCH`
pub fn parse_asound_cards(content: &str) -> Vec<AudioDeviceRecord> {
    content
        .lines()
        .filter(|line| line.trim_start().starts_with(|c: char| c.is_ascii_digit()))
        .filter_map(|line| line.split_once("]:"))
        .map(|(_, rest)| {
            let name = rest.split_once(" - ").map(|(_, n)| n).unwrap_or(rest);
            AudioDeviceRecord {
                name: name.trim().to_string(),
            }
        })
        .collect()
}

pub fn read_audio_devices(provider: &SysfsProvider) -> Result<Vec<AudioDeviceRecord>> {
    Ok(read_optional(provider.path("proc/asound/cards"))?
        .map(|content| parse_asound_cards(&content))
        .unwrap_or_default())
}

// Monitors

const EDID_HEADER: [u8; 8] = [0x00, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x00];
const EDID_DESCRIPTORS: [usize; 4] = [54, 72, 90, 108];
const EDID_MONITOR_NAME: u8 = 0xFC;

/// Monitor label from an EDID base block: the name descriptor when present,
/// otherwise the PNP manufacturer id and product code the way Windows
/// labels an unnamed monitor.
pub fn parse_edid_name(edid: &[u8]) -> Option<String> {
    if edid.len() < 128 || edid[..8] != EDID_HEADER {
        return None;
    }

    for offset in EDID_DESCRIPTORS {
        let descriptor = &edid[offset..offset + 18];
        if descriptor[0] == 0 && descriptor[1] == 0 && descriptor[3] == EDID_MONITOR_NAME {
            let text: Vec<u8> = descriptor[5..]
                .iter()
                .copied()
                .take_while(|b| *b != 0x0A)
                .collect();
            let name = String::from_utf8_lossy(&text).trim().to_string();
            if !name.is_empty() {
                return Some(name);
            }
        }
    }

    let id = u16::from_be_bytes([edid[8], edid[9]]);
    let letter = |shift: u16| (((id >> shift) & 0x1F) as u8 + b'A' - 1) as char;
    let product = u16::from_le_bytes([edid[10], edid[11]]);
    Some(format!(
        "Generic PnP Monitor ({}{}{}{:04X})",
        letter(10),
        letter(5),
        letter(0),
        product
    ))
}

/// Connected DRM connectors as `(connector, directory)` pairs
fn connected_connectors(provider: &SysfsProvider) -> Result<Vec<(String, String)>> {
    let mut connectors = Vec::new();
    for entry in list_dir(provider.path("sys/class/drm"))? {
        let Some((card, connector)) = entry.split_once('-') else {
            continue;
        };
        if !is_drm_card(card) {
            continue;
        }
        let dir = format!("sys/class/drm/{}", entry);
        if read_attribute(provider.path(&format!("{}/status", dir))) == "connected" {
            connectors.push((connector.to_string(), dir));
        }
    }
    Ok(connectors)
}

pub fn read_edid_monitors(provider: &SysfsProvider) -> Result<Vec<MonitorRecord>> {
    let mut monitors = Vec::new();
    for (connector, dir) in connected_connectors(provider)? {
        let edid = match fs::read(provider.path(&format!("{}/edid", dir))) {
            Ok(edid) => edid,
            Err(err) if err.kind() == io::ErrorKind::NotFound => Vec::new(),
            Err(err) => return Err(HwdashError::from(err)),
        };
        let name = parse_edid_name(&edid).unwrap_or_else(|| {
            debug!("no usable EDID on {}", connector);
            "Generic PnP Monitor".to_string()
        });
        monitors.push(MonitorRecord { name });
    }
    Ok(monitors)
}

pub fn read_connector_monitors(provider: &SysfsProvider) -> Result<Vec<MonitorRecord>> {
    Ok(connected_connectors(provider)?
        .into_iter()
        .map(|(connector, _)| MonitorRecord { name: connector })
        .collect())
}
