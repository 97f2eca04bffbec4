use crate::config::{Config, ConfigEntry};
use crate::data::HardwareSummary;
use crate::utils::format::UNKNOWN;
use unicode_width::UnicodeWidthStr;
use tracing::warn;

const RESET: &str = "\x1b[0m";

pub fn hex_to_ansi(color: &str) -> String {
    // First try ANSI color names
    if let Some(ansi_code) = get_ansi_color_code(color) {
        return ansi_code.to_string();
    }

    if color.starts_with('#') && color.len() == 7 && color.is_ascii() {
        if let (Ok(r), Ok(g), Ok(b)) = (
            u8::from_str_radix(&color[1..3], 16),
            u8::from_str_radix(&color[3..5], 16),
            u8::from_str_radix(&color[5..7], 16),
        ) {
            return format!("\x1b[38;2;{};{};{}m", r, g, b);
        }
    }

    warn!("unknown color '{}', falling back to default", color);
    RESET.to_string()
}

fn get_ansi_color_code(color_name: &str) -> Option<&'static str> {
    let code = match color_name.to_lowercase().as_str() {
        "black" => "\x1b[30m",
        "red" => "\x1b[31m",
        "green" => "\x1b[32m",
        "yellow" => "\x1b[33m",
        "blue" => "\x1b[34m",
        "magenta" | "purple" => "\x1b[35m",
        "cyan" => "\x1b[36m",
        "white" => "\x1b[37m",

        "bright_black" | "gray" | "grey" => "\x1b[90m",
        "bright_red" | "orange" => "\x1b[91m",
        "bright_green" => "\x1b[92m",
        "bright_yellow" => "\x1b[93m",
        "bright_blue" => "\x1b[94m",
        "bright_magenta" | "violet" => "\x1b[95m",
        "bright_cyan" => "\x1b[96m",
        "bright_white" => "\x1b[97m",

        "reset" | "default" => RESET,
        _ => return None,
    };
    Some(code)
}

/// Resolve a color key through the `[colors]` table, then as a literal
/// color name or hex value.
fn resolve_color(config: &Config, key: Option<&String>) -> String {
    match key {
        Some(key) => match config.colors.get(key) {
            Some(color) => hex_to_ansi(color),
            None => hex_to_ansi(key),
        },
        None => RESET.to_string(),
    }
}

fn output_value(entry: &ConfigEntry, summary: &HardwareSummary) -> String {
    match entry.r#type.as_str() {
        "default" => match summary.field(&entry.value) {
            Some("") => UNKNOWN.to_string(),
            Some(value) => value.to_string(),
            None => "Unknown default value".to_string(),
        },
        "text" => entry.value.clone(),
        _ => "Invalid type".to_string(),
    }
}

/// Render the configured items as terminal lines. Keys are padded to a
/// common display width and continuation lines of multi-line values are
/// indented under the first.
pub fn render_summary(config: &Config, summary: &HardwareSummary) -> String {
    let separator = config.display.separator.as_deref().unwrap_or(": ");
    let key_width = config
        .display
        .items
        .iter()
        .filter(|entry| entry.r#type != "text")
        .map(|entry| UnicodeWidthStr::width(entry.key.as_str()))
        .max()
        .unwrap_or(0);
    let indent = " ".repeat(key_width + UnicodeWidthStr::width(separator));

    let mut out = String::new();
    for entry in &config.display.items {
        let key_color = resolve_color(config, entry.color.as_ref());
        let value_color = resolve_color(config, entry.value_color.as_ref());
        let value = output_value(entry, summary);

        if entry.r#type == "text" {
            if value.is_empty() {
                out.push('\n');
            } else {
                out.push_str(&format!("{}{}{}\n", key_color, value, RESET));
            }
            continue;
        }

        let padding = " ".repeat(key_width - UnicodeWidthStr::width(entry.key.as_str()));
        let mut lines = value.lines();
        let first = lines.next().unwrap_or_default();
        out.push_str(&format!(
            "{}{}{}{}{}{}{}{}\n",
            key_color, entry.key, padding, separator, RESET, value_color, first, RESET
        ));
        for line in lines {
            out.push_str(&format!("{}{}{}{}\n", indent, value_color, line, RESET));
        }
    }
    out
}
