//! Partner matching command.

use anyhow::Result;
use comfy_table::{Cell, Color};
use console::style;

use swapmatch_types::user::UserId;

use super::output::{empty_hint, print_json, print_table, table};
use crate::state::AppState;

/// List users who want what `user` teaches and teach what `user` wants.
pub async fn find_matches(state: &AppState, user: &UserId, json: bool) -> Result<()> {
    let matches = state.match_service.find_potential_matches(user).await?;

    if json {
        return print_json(&matches);
    }

    if matches.is_empty() {
        empty_hint(
            "No trade partners found.",
            Some("Partners need to want a skill you offer and offer a skill you want."),
        );
        return Ok(());
    }

    let mut t = table(&["Partner", "Location", "You teach", "They teach", "Score", "Partner ID"]);
    for m in &matches {
        t.add_row(vec![
            Cell::new(&m.user.name).fg(Color::Cyan),
            Cell::new(m.user.location.as_deref().unwrap_or("-")),
            Cell::new(&m.offered_skill.name),
            Cell::new(&m.wanted_skill.name),
            Cell::new(m.match_score),
            Cell::new(m.user.id.to_string()),
        ]);
    }
    print_table(&t, matches.len(), "result");
    println!(
        "  Propose with: {}",
        style(format!("swapmatch swap propose --from {user} --to <PARTNER> --offer <SKILL> --want <SKILL>")).yellow()
    );
    println!();
    Ok(())
}
