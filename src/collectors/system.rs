//! Operating system and computer identity collection

use super::SysfsProvider;
use crate::data::{ComputerRecord, MotherboardRecord, OsRecord};
use crate::error::Result;
use crate::utils::file::*;
use crate::utils::parsing::to_timestamp;
use chrono::{DateTime, Local};
use std::ffi::CStr;
use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::time::{Duration, SystemTime};

pub fn read_os(provider: &SysfsProvider) -> Result<OsRecord> {
    Ok(OsRecord {
        caption: read_os_name(provider)?,
        architecture: read_architecture(provider),
        build_number: String::new(),
        version: read_attribute(provider.path("proc/sys/kernel/osrelease")),
        install_date: read_install_date(provider),
        last_boot_up_time: read_boot_time(provider)?,
    })
}

pub fn read_computer(provider: &SysfsProvider) -> Result<ComputerRecord> {
    let mut name = read_attribute(provider.path("proc/sys/kernel/hostname"));
    if name.is_empty() && provider.is_live() {
        name = uname_field(|u| u.nodename.as_slice()).unwrap_or_default();
    }

    Ok(ComputerRecord {
        name,
        manufacturer: read_attribute(provider.path("sys/class/dmi/id/sys_vendor")),
        model: read_attribute(provider.path("sys/class/dmi/id/product_name")),
    })
}

pub fn read_motherboards(provider: &SysfsProvider) -> Result<Vec<MotherboardRecord>> {
    let board = MotherboardRecord {
        manufacturer: read_attribute(provider.path("sys/class/dmi/id/board_vendor")),
        product: read_attribute(provider.path("sys/class/dmi/id/board_name")),
    };

    if board.manufacturer.is_empty() && board.product.is_empty() {
        Ok(Vec::new())
    } else {
        Ok(vec![board])
    }
}

fn read_os_name(provider: &SysfsProvider) -> Result<String> {
    for candidate in ["etc/os-release", "usr/lib/os-release"] {
        let file = match File::open(provider.path(candidate)) {
            Ok(file) => file,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => continue,
            Err(err) => return Err(err.into()),
        };

        let mut name = None;
        for line in BufReader::new(file).lines() {
            let line = line?;
            if let Some(value) = line.strip_prefix("PRETTY_NAME=") {
                return Ok(value.trim().trim_matches('"').to_string());
            }
            if let Some(value) = line.strip_prefix("NAME=") {
                name = Some(value.trim().trim_matches('"').to_string());
            }
        }
        if let Some(name) = name {
            return Ok(name);
        }
    }
    Ok(String::new())
}

fn uname_field(select: impl Fn(&libc::utsname) -> &[libc::c_char]) -> Option<String> {
    // SAFETY: uname fills a zeroed struct of NUL-terminated fixed-size arrays
    let info = unsafe {
        let mut info: libc::utsname = std::mem::zeroed();
        if libc::uname(&mut info) != 0 {
            return None;
        }
        info
    };
    let field = select(&info);
    let text = unsafe { CStr::from_ptr(field.as_ptr()) };
    Some(text.to_string_lossy().into_owned())
}

fn read_architecture(provider: &SysfsProvider) -> String {
    let arch = read_attribute(provider.path("proc/sys/kernel/arch"));
    if !arch.is_empty() || !provider.is_live() {
        return arch;
    }
    uname_field(|u| u.machine.as_slice()).unwrap_or_default()
}

/// Birth time of the root filesystem, used as the installation date
fn read_install_date(provider: &SysfsProvider) -> String {
    fs::metadata(provider.root())
        .and_then(|meta| meta.created())
        .map(|created| to_timestamp(DateTime::<Local>::from(created).naive_local()))
        .unwrap_or_default()
}

fn read_boot_time(provider: &SysfsProvider) -> Result<String> {
    let Some(uptime) = read_optional(provider.path("proc/uptime"))? else {
        return Ok(String::new());
    };
    let boot = uptime
        .split_whitespace()
        .next()
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|seconds| *seconds > 0.0)
        .and_then(|seconds| Duration::try_from_secs_f64(seconds).ok())
        .and_then(|elapsed| SystemTime::now().checked_sub(elapsed));
    Ok(boot
        .map(|boot| to_timestamp(DateTime::<Local>::from(boot).naive_local()))
        .unwrap_or_default())
}
