//! Monitor label extraction

use crate::data::MonitorRecord;
use crate::utils::format::is_generic_name;

/// Resolve a provider monitor name to a display label.
///
/// A non-generic model code inside the last parenthesised group wins
/// (`Generic PnP Monitor (DELL U2720Q)` gives `DELL U2720Q`); otherwise the
/// text before that group is used. `None` when only placeholders remain.
pub fn resolve_monitor_name(raw: &str) -> Option<String> {
    let mut candidate = raw.trim();

    if candidate.contains('(') && candidate.contains(')') {
        if let Some(start) = candidate.rfind('(') {
            if let Some(end) = candidate.rfind(')').filter(|end| *end > start) {
                let inside = candidate[start + 1..end].trim();
                if !inside.is_empty() && !is_generic_name(inside) {
                    return Some(inside.to_string());
                }
            }
            candidate = candidate[..start].trim();
        }
    }

    if is_generic_name(candidate) {
        None
    } else {
        Some(candidate.to_string())
    }
}

/// Resolve every record, dropping placeholders
pub fn resolve_monitors(monitors: &[MonitorRecord]) -> Vec<String> {
    monitors
        .iter()
        .filter(|m| !m.name.is_empty())
        .filter_map(|m| resolve_monitor_name(&m.name))
        .collect()
}
