//! Command implementations for the blackroad CLI.
//!
//! Each submodule implements the logic for a command group.

pub mod agent;
pub mod codex;
pub mod memory;

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use serde_json::Value;

/// Print any serializable value as pretty JSON.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{rendered}");
    Ok(())
}

/// Print a free-form API response: objects as aligned `key: value` lines,
/// anything else as pretty JSON.
pub fn print_value(value: &Value) -> Result<()> {
    let Value::Object(map) = value else {
        return print_json(value);
    };

    let width = map.keys().map(|k| k.len()).max().unwrap_or(0);
    for (key, value) in map {
        println!("  {}  {}", format!("{key:width$}").bold(), render_scalar(value));
    }
    Ok(())
}

fn render_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "-".dimmed().to_string(),
        other => other.to_string(),
    }
}

/// First 8 characters of an ID
pub fn short_id(id: &str) -> &str {
    match id.char_indices().nth(8) {
        Some((idx, _)) => &id[..idx],
        None => id,
    }
}

/// Truncate to `max` characters, marking the cut with `...`
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{kept}...")
}
