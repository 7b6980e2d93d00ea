//! Display helpers for tool calls.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::{Map, Value};

/// Formats a tool name for display: `"book_appointment"` -> `"Book Appointment"`.
pub fn format_tool_name(name: &str) -> String {
    name.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn parse_timestamp(timestamp: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(timestamp) {
        return Some(parsed.with_timezone(&Utc));
    }
    // Timestamps without an offset are taken as UTC.
    NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Formats `timestamp` relative to `now`: "just now", "12s ago", "3m ago",
/// "2h ago". Timestamps in the future count as "just now"; unparseable ones
/// are returned as given.
pub fn format_relative_time(timestamp: &str, now: DateTime<Utc>) -> String {
    let Some(then) = parse_timestamp(timestamp) else {
        return timestamp.to_string();
    };

    let seconds = (now - then).num_seconds();
    if seconds < 5 {
        return "just now".to_string();
    }
    if seconds < 60 {
        return format!("{}s ago", seconds);
    }
    let minutes = seconds / 60;
    if minutes < 60 {
        return format!("{}m ago", minutes);
    }
    format!("{}h ago", minutes / 60)
}

/// Badge color for a tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolColor {
    Blue,
    Purple,
    Green,
    Amber,
    Red,
    Orange,
    Gray,
}

impl ToolColor {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Blue => "blue",
            Self::Purple => "purple",
            Self::Green => "green",
            Self::Amber => "amber",
            Self::Red => "red",
            Self::Orange => "orange",
            Self::Gray => "gray",
        }
    }

    /// ANSI SGR foreground code.
    pub fn ansi_code(self) -> u8 {
        match self {
            Self::Blue => 34,
            Self::Purple => 35,
            Self::Green => 32,
            Self::Amber => 33,
            Self::Red => 31,
            Self::Orange => 91,
            Self::Gray => 90,
        }
    }
}

/// Returns the badge color for a tool name. Unknown tools are gray.
pub fn tool_color(tool_name: &str) -> ToolColor {
    match tool_name {
        "identify_user" => ToolColor::Blue,
        "fetch_slots" => ToolColor::Purple,
        "book_appointment" => ToolColor::Green,
        "retrieve_appointments" => ToolColor::Amber,
        "cancel_appointment" => ToolColor::Red,
        "modify_appointment" => ToolColor::Orange,
        _ => ToolColor::Gray,
    }
}

/// Pretty-prints a tool result as JSON.
pub fn format_result(result: &Map<String, Value>) -> String {
    serde_json::to_string_pretty(result).unwrap_or_else(|_| format!("{:?}", result))
}

/// Formats one argument value: strings bare, everything else as JSON.
pub fn format_argument(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
