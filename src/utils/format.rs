//! Human-readable rendering helpers shared by the aggregators

/// Sentinel rendered for any value the provider did not report
pub const UNKNOWN: &str = "Unknown";

const MIB: f64 = 1024.0 * 1024.0;
const GIB: f64 = MIB * 1024.0;
const TIB: f64 = GIB * 1024.0;

/// Keywords marking placeholder device names. Matched case-insensitively.
const GENERIC_KEYWORDS: &[&str] = &[
    "generic", "通用", "默认", "default", "monitor", "监视器", "display", "显示器", "plug", "play",
    "即插即用",
];

/// Unit selection for [`format_byte_size`], one per call site
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeUnits {
    /// Always gigabytes with a fixed number of decimals (RAM totals and modules)
    Gigabytes { precision: usize },
    /// `x.xGB` from 1 GiB upwards, whole megabytes below (video memory)
    GigabytesOrMegabytes,
    /// `x.xTB` from 1 TiB upwards, whole gigabytes below (drives)
    TerabytesOrGigabytes,
}

/// Render a byte count using binary units; `Unknown` for zero
pub fn format_byte_size(bytes: u64, units: SizeUnits) -> String {
    if bytes == 0 {
        return UNKNOWN.to_string();
    }
    let bytes = bytes as f64;

    match units {
        SizeUnits::Gigabytes { precision } => format!("{:.*}GB", precision, bytes / GIB),
        SizeUnits::GigabytesOrMegabytes => {
            let gb = bytes / GIB;
            if gb >= 1.0 {
                format!("{:.1}GB", gb)
            } else {
                format!("{:.0}MB", bytes / MIB)
            }
        }
        SizeUnits::TerabytesOrGigabytes => {
            let tb = bytes / TIB;
            if tb >= 1.0 {
                format!("{:.1}TB", tb)
            } else {
                format!("{:.0}GB", bytes / GIB)
            }
        }
    }
}

/// One item per line; `Unknown` when there is nothing to show
pub fn join_vertical<S: AsRef<str>>(items: &[S]) -> String {
    match items {
        [] => UNKNOWN.to_string(),
        [single] => single.as_ref().to_string(),
        _ => items
            .iter()
            .map(|s| s.as_ref())
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

/// Whether a device label is an OS placeholder rather than a real model name
pub fn is_generic_name(name: &str) -> bool {
    if name.is_empty() {
        return true;
    }

    let lower = name.to_lowercase();
    if GENERIC_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
        return true;
    }

    let has_letter = name.chars().any(char::is_alphabetic);
    let has_digit = name.chars().any(|c| c.is_ascii_digit());
    if has_letter && has_digit {
        return false;
    }

    name.chars().count() < 4
}

/// Strip the `@ 3.60GHz` style frequency suffix from a CPU brand string
pub fn clean_cpu_name(name: &str) -> String {
    let name = name.trim();
    if name.is_empty() {
        return UNKNOWN.to_string();
    }
    match name.find('@') {
        Some(at) if at > 0 => name[..at].trim().to_string(),
        _ => name.to_string(),
    }
}

/// Guess the DDR generation from a module speed. Heuristic, not a part lookup.
pub fn infer_ddr_generation(frequency_mhz: u32) -> &'static str {
    match frequency_mhz {
        f if f >= 4800 => "DDR5",
        f if f >= 2133 => "DDR4",
        f if f >= 800 => "DDR3",
        f if f > 0 => "DDR2 or earlier",
        _ => UNKNOWN,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GB: u64 = 1024 * 1024 * 1024;

    #[test]
    fn byte_size_per_call_site() {
        assert_eq!(format_byte_size(32 * GB, SizeUnits::Gigabytes { precision: 2 }), "32.00GB");
        assert_eq!(format_byte_size(8 * GB, SizeUnits::Gigabytes { precision: 0 }), "8GB");
        assert_eq!(format_byte_size(12 * GB, SizeUnits::GigabytesOrMegabytes), "12.0GB");
        assert_eq!(format_byte_size(512 * 1024 * 1024, SizeUnits::GigabytesOrMegabytes), "512MB");
        assert_eq!(format_byte_size(2048 * GB, SizeUnits::TerabytesOrGigabytes), "2.0TB");
        assert_eq!(format_byte_size(500 * GB, SizeUnits::TerabytesOrGigabytes), "500GB");
    }

    #[test]
    fn byte_size_zero_is_unknown() {
        assert_eq!(format_byte_size(0, SizeUnits::GigabytesOrMegabytes), UNKNOWN);
        assert_eq!(format_byte_size(0, SizeUnits::Gigabytes { precision: 2 }), UNKNOWN);
    }

    #[test]
    fn vertical_join() {
        let empty: [&str; 0] = [];
        assert_eq!(join_vertical(&empty), UNKNOWN);
        assert_eq!(join_vertical(&["x"]), "x");
        assert_eq!(join_vertical(&["x", "y"]), "x\ny");
    }

    #[test]
    fn generic_names() {
        assert!(is_generic_name("GENERIC"));
        assert!(is_generic_name("generic"));
        assert!(is_generic_name("Generic PnP Monitor"));
        assert!(is_generic_name("通用即插即用监视器"));
        assert!(is_generic_name(""));
        assert!(is_generic_name("ABC"));
        assert!(!is_generic_name("DELL U2720Q"));
        assert!(!is_generic_name("LG ULTRAGEAR"));
        assert!(!is_generic_name("A1"));
        // superscripts and fractions are not model digits
        assert!(is_generic_name("A²"));
        assert!(is_generic_name("X½"));
    }

    #[test]
    fn cpu_name_cleanup() {
        assert_eq!(clean_cpu_name("Intel(R) Core(TM) i7-8700K CPU @ 3.70GHz"), "Intel(R) Core(TM) i7-8700K CPU");
        assert_eq!(clean_cpu_name("  AMD Ryzen 9 7950X 16-Core Processor  "), "AMD Ryzen 9 7950X 16-Core Processor");
        assert_eq!(clean_cpu_name(""), UNKNOWN);
    }

    #[test]
    fn ddr_generation_bands() {
        assert_eq!(infer_ddr_generation(6000), "DDR5");
        assert_eq!(infer_ddr_generation(4800), "DDR5");
        assert_eq!(infer_ddr_generation(3200), "DDR4");
        assert_eq!(infer_ddr_generation(2133), "DDR4");
        assert_eq!(infer_ddr_generation(1600), "DDR3");
        assert_eq!(infer_ddr_generation(667), "DDR2 or earlier");
        assert_eq!(infer_ddr_generation(0), UNKNOWN);
    }
}
