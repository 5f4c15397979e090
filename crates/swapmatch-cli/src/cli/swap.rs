//! Swap request commands: propose, resolve, inspect and list.

use anyhow::Result;
use comfy_table::Cell;
use console::style;

use swapmatch_core::repository::SortOrder;
use swapmatch_core::repository::swap_request::SwapSortField;
use swapmatch_core::service::detail::load_swap_detail;
use swapmatch_core::service::swap::SwapListQuery;
use swapmatch_types::swap::{CreateSwapRequest, SwapId, SwapRequest, SwapRequestDetail, SwapStatus};
use swapmatch_types::user::UserId;

use super::output::{
    empty_hint, field, format_relative_time, format_status, print_json, print_table,
    resolve_skill, status_cell, success, table,
};
use crate::state::AppState;

/// Propose a swap from `from` to `to`.
///
/// # Examples
///
/// ```bash
/// swapmatch swap propose --from <ALICE> --to <BOB> --offer Rust --want Piano
/// ```
pub async fn propose(
    state: &AppState,
    from: UserId,
    to: UserId,
    offer: &str,
    want: &str,
    json: bool,
) -> Result<()> {
    let offered = resolve_skill(state, offer).await?;
    let wanted = resolve_skill(state, want).await?;

    let swap = state
        .swap_service
        .create_swap_request(CreateSwapRequest {
            requester_id: from,
            responder_id: to,
            offered_skill_id: offered.id,
            wanted_skill_id: wanted.id,
        })
        .await?;

    if json {
        return print_json(&swap);
    }

    success(format!(
        "Proposed {} for {}",
        style(&offered.name).cyan(),
        style(&wanted.name).cyan()
    ));
    field("Swap:", style(swap.id).dim());
    field("Status:", format_status(swap.status));
    println!();
    println!(
        "  The responder can accept with: {}",
        style(format!("swapmatch swap accept {} --as {to}", swap.id)).yellow()
    );
    println!();
    Ok(())
}

/// Move a pending swap to `status` on behalf of `acting`.
pub async fn transition(
    state: &AppState,
    swap_id: &SwapId,
    acting: &UserId,
    status: SwapStatus,
    json: bool,
) -> Result<()> {
    let swap = state
        .swap_service
        .update_status(swap_id, acting, status)
        .await?;

    if json {
        return print_json(&swap);
    }

    success(format!("Swap {} is now {}", swap.id, format_status(swap.status)));
    Ok(())
}

pub async fn delete(state: &AppState, swap_id: &SwapId, acting: &UserId, json: bool) -> Result<()> {
    state
        .swap_service
        .delete_swap_request(swap_id, acting)
        .await?;

    if json {
        return print_json(&serde_json::json!({ "id": swap_id, "deleted": true }));
    }

    success(format!("Swap {swap_id} deleted"));
    Ok(())
}

pub async fn show(state: &AppState, swap_id: &SwapId, json: bool) -> Result<()> {
    let swap = state.swap_service.get_swap(swap_id).await?;
    let detail = load_swap_detail(&state.directory, swap).await?;

    if json {
        return print_json(&detail);
    }

    println!();
    println!(
        "  {} {} {} {}",
        style(&detail.requester.name).cyan().bold(),
        style("⇄").dim(),
        style(&detail.responder.name).cyan().bold(),
        format_status(detail.request.status)
    );
    println!();
    field("Offers:  ", &detail.offered_skill.name);
    field("Wants:   ", &detail.wanted_skill.name);
    field("Created: ", format_relative_time(&detail.request.created_at));
    field("Updated: ", format_relative_time(&detail.request.updated_at));
    field("ID:      ", style(detail.request.id).dim());
    println!();
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub async fn list(
    state: &AppState,
    user: &UserId,
    sent: bool,
    received: bool,
    status: Option<SwapStatus>,
    sort_by: Option<SwapSortField>,
    sort_order: Option<SortOrder>,
    limit: Option<u32>,
    offset: Option<u32>,
    json: bool,
) -> Result<()> {
    let swaps = state
        .swap_service
        .list_swap_requests(
            user,
            SwapListQuery {
                sent,
                received,
                status,
                sort_by,
                sort_order,
                limit,
                offset,
            },
        )
        .await?;

    if json {
        return print_json(&swaps);
    }

    render(state, user, &swaps, "No swap requests match.").await
}

pub async fn overview(state: &AppState, user: &UserId, json: bool) -> Result<()> {
    let swaps = state.swap_service.swaps_for_user(user).await?;

    if json {
        return print_json(&swaps);
    }

    println!();
    println!("  {}", style("Sent").bold().underlined());
    render(state, user, &swaps.sent, "Nothing sent.").await?;
    println!("  {}", style("Received").bold().underlined());
    render(state, user, &swaps.received, "Nothing received.").await
}

pub async fn pending(state: &AppState, user: &UserId, json: bool) -> Result<()> {
    let swaps = state.swap_service.pending_swap_requests(user).await?;

    if json {
        return print_json(&swaps);
    }

    render(state, user, &swaps, "No pending swap requests.").await
}

pub async fn history(state: &AppState, user: &UserId, json: bool) -> Result<()> {
    let swaps = state.swap_service.swap_history(user).await?;

    if json {
        return print_json(&swaps);
    }

    render(state, user, &swaps, "No resolved swaps yet.").await
}

/// Render swaps from `viewer`'s point of view, hydrating names.
async fn render(state: &AppState, viewer: &UserId, swaps: &[SwapRequest], empty: &str) -> Result<()> {
    if swaps.is_empty() {
        empty_hint(empty, None);
        return Ok(());
    }

    let mut details = Vec::with_capacity(swaps.len());
    for swap in swaps {
        details.push(load_swap_detail(&state.directory, swap.clone()).await?);
    }

    let mut t = table(&["Direction", "With", "Offers", "Wants", "Status", "Updated", "ID"]);
    for detail in &details {
        let (direction, other) = direction_of(detail, viewer);
        t.add_row(vec![
            Cell::new(direction),
            Cell::new(other),
            Cell::new(&detail.offered_skill.name),
            Cell::new(&detail.wanted_skill.name),
            status_cell(detail.request.status),
            Cell::new(format_relative_time(&detail.request.updated_at)),
            Cell::new(detail.request.id.to_string()),
        ]);
    }
    print_table(&t, details.len(), "swap");
    Ok(())
}

fn direction_of<'a>(detail: &'a SwapRequestDetail, viewer: &UserId) -> (&'static str, &'a str) {
    if detail.request.requester_id == *viewer {
        ("→ sent", detail.responder.name.as_str())
    } else {
        ("← received", detail.requester.name.as_str())
    }
}
