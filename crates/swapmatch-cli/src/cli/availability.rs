//! Availability slot commands and schedule comparison.

use anyhow::Result;
use comfy_table::Cell;
use console::style;

use swapmatch_types::availability::{AvailabilitySlot, SlotId, SlotInput, format_time_of_day};
use swapmatch_types::user::UserId;

use super::output::{empty_hint, field, parse_days, print_json, print_table, success, table};
use crate::state::AppState;

fn slot_input(label: String, days: &str, start: String, end: String) -> Result<SlotInput> {
    Ok(SlotInput {
        label,
        day_bitmask: parse_days(days)?,
        start_time: start,
        end_time: end,
    })
}

fn print_slot(slot: &AvailabilitySlot) {
    field("Label:", style(&slot.label).cyan());
    field("Days: ", &slot.day_bitmask);
    field(
        "Time: ",
        format!(
            "{}-{}",
            format_time_of_day(&slot.start_time),
            format_time_of_day(&slot.end_time)
        ),
    );
    field("ID:   ", style(slot.id).dim());
    println!();
}

fn slot_table(slots: &[AvailabilitySlot]) {
    let mut t = table(&["Label", "Days", "From", "To", "ID"]);
    for slot in slots {
        t.add_row(vec![
            Cell::new(&slot.label),
            Cell::new(slot.day_bitmask),
            Cell::new(format_time_of_day(&slot.start_time)),
            Cell::new(format_time_of_day(&slot.end_time)),
            Cell::new(slot.id.to_string()),
        ]);
    }
    print_table(&t, slots.len(), "slot");
}

pub async fn add_slot(
    state: &AppState,
    user: &UserId,
    label: String,
    days: &str,
    start: String,
    end: String,
    json: bool,
) -> Result<()> {
    let input = slot_input(label, days, start, end)?;
    let slot = state.availability_service.create_slot(user, &input).await?;

    if json {
        return print_json(&slot);
    }

    success("Availability slot added");
    print_slot(&slot);
    Ok(())
}

pub async fn list_slots(state: &AppState, user: &UserId, json: bool) -> Result<()> {
    let slots = state.availability_service.list_slots(user).await?;

    if json {
        return print_json(&slots);
    }

    if slots.is_empty() {
        empty_hint(
            "No availability slots.",
            Some("Add one with: swapmatch slot add <USER> --label Evenings --days mon,wed --start 18:00 --end 21:00"),
        );
        return Ok(());
    }

    slot_table(&slots);
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub async fn update_slot(
    state: &AppState,
    slot_id: &SlotId,
    user: &UserId,
    label: String,
    days: &str,
    start: String,
    end: String,
    json: bool,
) -> Result<()> {
    let input = slot_input(label, days, start, end)?;
    let slot = state
        .availability_service
        .update_slot(slot_id, user, &input)
        .await?;

    if json {
        return print_json(&slot);
    }

    success("Availability slot updated");
    print_slot(&slot);
    Ok(())
}

pub async fn remove_slot(state: &AppState, slot_id: &SlotId, user: &UserId, json: bool) -> Result<()> {
    state.availability_service.delete_slot(slot_id, user).await?;

    if json {
        return print_json(&serde_json::json!({ "id": slot_id, "deleted": true }));
    }

    success(format!("Slot {slot_id} removed"));
    Ok(())
}

pub async fn common(state: &AppState, user_a: &UserId, user_b: &UserId, json: bool) -> Result<()> {
    let windows = state
        .availability_service
        .find_common_availability(user_a, user_b)
        .await?;

    if json {
        return print_json(&windows);
    }

    if windows.is_empty() {
        empty_hint("These users share no availability.", None);
        return Ok(());
    }

    let mut t = table(&["Day", "From", "To", "Minutes"]);
    for window in &windows {
        t.add_row(vec![
            Cell::new(window.day),
            Cell::new(format_time_of_day(&window.start_time)),
            Cell::new(format_time_of_day(&window.end_time)),
            Cell::new(window.duration_minutes),
        ]);
    }
    print_table(&t, windows.len(), "window");
    Ok(())
}

pub async fn covering(
    state: &AppState,
    user: &UserId,
    day: i64,
    start: &str,
    end: &str,
    json: bool,
) -> Result<()> {
    let slots = state
        .availability_service
        .availability_by_day_and_time(user, day, start, end)
        .await?;

    if json {
        return print_json(&slots);
    }

    if slots.is_empty() {
        empty_hint(format!("No slot covers {start}-{end} on that day."), None);
        return Ok(());
    }

    slot_table(&slots);
    Ok(())
}
