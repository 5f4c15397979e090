//! Shared rendering helpers for CLI commands.

use anyhow::{Result, bail};
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;
use serde::Serialize;

use swapmatch_core::repository::directory::DirectoryRepository;
use swapmatch_types::availability::{DayBitmask, Weekday};
use swapmatch_types::skill::{Skill, SkillId};
use swapmatch_types::swap::SwapStatus;

use crate::state::AppState;

/// Pretty-print `value` as JSON on stdout.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn success(message: impl std::fmt::Display) {
    println!();
    println!("  {} {message}", style("✓").green().bold());
    println!();
}

/// Dimmed hint shown when a listing comes back empty.
pub fn empty_hint(message: impl std::fmt::Display, hint: Option<&str>) {
    println!();
    println!("  {} {message}", style("i").blue().bold());
    if let Some(hint) = hint {
        println!("  {}", style(hint).dim());
    }
    println!();
}

pub fn field(label: &str, value: impl std::fmt::Display) {
    println!("  {}  {value}", style(label).bold());
}

/// A table in the house style with a bold white header row.
pub fn table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(
            headers
                .iter()
                .map(|h| Cell::new(h).fg(Color::White))
                .collect::<Vec<_>>(),
        );
    table
}

/// Print a table followed by a dimmed count footer.
pub fn print_table(table: &Table, count: usize, noun: &str) {
    println!();
    println!("{table}");
    let plural = if count == 1 { "" } else { "s" };
    println!("  {}", style(format!("{count} {noun}{plural}")).dim());
    println!();
}

pub fn status_cell(status: SwapStatus) -> Cell {
    let color = match status {
        SwapStatus::Pending => Color::Yellow,
        SwapStatus::Accepted => Color::Green,
        SwapStatus::Rejected => Color::Red,
        SwapStatus::Cancelled => Color::DarkGrey,
    };
    Cell::new(status.as_str()).fg(color)
}

pub fn format_status(status: SwapStatus) -> String {
    match status {
        SwapStatus::Pending => format!("{}", style("● pending").yellow()),
        SwapStatus::Accepted => format!("{}", style("● accepted").green()),
        SwapStatus::Rejected => format!("{}", style("○ rejected").red()),
        SwapStatus::Cancelled => format!("{}", style("◌ cancelled").dim()),
    }
}

pub fn format_relative_time(dt: &chrono::DateTime<chrono::Utc>) -> String {
    let diff = chrono::Utc::now() - *dt;

    if diff.num_minutes() < 1 {
        "just now".to_string()
    } else if diff.num_hours() < 1 {
        format!("{}m ago", diff.num_minutes())
    } else if diff.num_days() < 1 {
        format!("{}h ago", diff.num_hours())
    } else if diff.num_days() < 30 {
        format!("{}d ago", diff.num_days())
    } else {
        dt.format("%Y-%m-%d").to_string()
    }
}

/// Look a skill up by ID, falling back to an exact name match.
pub async fn resolve_skill(state: &AppState, key: &str) -> Result<Skill> {
    if let Ok(id) = key.parse::<SkillId>() {
        if let Some(skill) = state.directory.skill(&id).await? {
            return Ok(skill);
        }
    }
    match state.directory.skill_by_name(key.trim()).await? {
        Some(skill) => Ok(skill),
        None => bail!("skill '{key}' not found (create it with `swapmatch skill create`)"),
    }
}

/// Parse a day selection: a raw bitmask such as `21`, or comma-separated
/// day names such as `mon,wed,fri`.
///
/// Returns the raw mask so range checking stays with slot validation.
pub fn parse_days(raw: &str) -> Result<i64> {
    let raw = raw.trim();
    if let Ok(mask) = raw.parse::<i64>() {
        return Ok(mask);
    }
    let days = raw
        .split(',')
        .filter(|part| !part.trim().is_empty())
        .map(str::parse::<Weekday>)
        .collect::<Result<Vec<_>, _>>()?;
    match DayBitmask::from_days(&days) {
        Some(mask) => Ok(i64::from(mask)),
        None => bail!("no days given"),
    }
}
