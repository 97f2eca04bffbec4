//! File reading utilities for sysfs/procfs style trees

use crate::error::{HwdashError, Result};
use std::fs;
use std::io;
use std::path::Path;

/// Read a file to string, trimmed
pub fn read_trimmed<P: AsRef<Path>>(path: P) -> Result<String> {
    Ok(fs::read_to_string(path)?.trim().to_string())
}

/// Read a file that may legitimately be missing; `None` when absent
pub fn read_optional<P: AsRef<Path>>(path: P) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content.trim().to_string())),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err.into()),
    }
}

/// Read an optional attribute, mapping absence to an empty string
pub fn read_attribute<P: AsRef<Path>>(path: P) -> String {
    read_optional(path).ok().flatten().unwrap_or_default()
}

/// Read a decimal (or `0x` prefixed hex) number from a single-value file
pub fn read_number<P: AsRef<Path>>(path: P) -> Result<u64> {
    let path = path.as_ref();
    let raw = read_trimmed(path)?;
    parse_number(&raw)
        .ok_or_else(|| HwdashError::Parse(format!("{}: invalid number '{}'", path.display(), raw)))
}

pub fn parse_number(raw: &str) -> Option<u64> {
    match raw.strip_prefix("0x") {
        Some(hex) => u64::from_str_radix(hex, 16).ok(),
        None => raw.parse().ok(),
    }
}

/// Sorted names of the entries in a directory; empty when it does not exist
pub fn list_dir<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let entries = match fs::read_dir(path) {
        Ok(entries) => entries,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => return Err(err.into()),
    };

    let mut names = Vec::new();
    for entry in entries {
        names.push(entry?.file_name().to_string_lossy().into_owned());
    }
    names.sort();
    Ok(names)
}
