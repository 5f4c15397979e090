//! User and skill catalog commands.
//!
//! These seed the directory the swap engine reads from: register users,
//! build the skill catalog and record who offers or wants what.

use anyhow::{Result, anyhow, bail};
use console::style;

use swapmatch_core::repository::directory::DirectoryRepository;
use swapmatch_types::error::RepositoryError;
use swapmatch_types::user::{UserId, UserSummary};

use super::output::{
    empty_hint, field, format_relative_time, print_json, print_table, resolve_skill, success,
    table,
};
use crate::state::AppState;

fn user_not_found(user: &UserId) -> impl FnOnce(RepositoryError) -> anyhow::Error + '_ {
    move |e| match e {
        RepositoryError::NotFound => anyhow!("user {user} not found"),
        other => other.into(),
    }
}

async fn require_user(state: &AppState, user: &UserId) -> Result<UserSummary> {
    match state.directory.user_summary(user).await? {
        Some(summary) => Ok(summary),
        None => bail!("user {user} not found"),
    }
}

pub async fn create_user(
    state: &AppState,
    name: &str,
    location: Option<&str>,
    json: bool,
) -> Result<()> {
    let name = name.trim();
    if name.is_empty() {
        bail!("user name cannot be empty");
    }
    let user = state.directory.create_user(name, location).await?;

    if json {
        return print_json(&user);
    }

    success(format!("User {} created", style(&user.name).cyan()));
    field("ID:", style(user.id).dim());
    if let Some(location) = &user.location {
        field("Location:", location);
    }
    println!();
    Ok(())
}

pub async fn list_users(state: &AppState, json: bool) -> Result<()> {
    let users = state.directory.list_users().await?;

    if json {
        return print_json(&users);
    }

    if users.is_empty() {
        empty_hint("No users yet.", Some("Create one with: swapmatch user create <NAME>"));
        return Ok(());
    }

    let mut t = table(&["Name", "Location", "ID"]);
    for user in &users {
        t.add_row(vec![
            user.name.clone(),
            user.location.clone().unwrap_or_else(|| "-".to_string()),
            user.id.to_string(),
        ]);
    }
    print_table(&t, users.len(), "user");
    Ok(())
}

pub async fn set_visibility(state: &AppState, user: &UserId, public: bool, json: bool) -> Result<()> {
    state
        .directory
        .set_public(user, public)
        .await
        .map_err(user_not_found(user))?;

    if json {
        return print_json(&serde_json::json!({ "user_id": user, "is_public": public }));
    }

    if public {
        success(format!("User {user} is visible to partner matching"));
    } else {
        success(format!("User {user} is hidden from partner matching"));
    }
    Ok(())
}

pub async fn delete_user(state: &AppState, user: &UserId, json: bool) -> Result<()> {
    state
        .directory
        .soft_delete_user(user)
        .await
        .map_err(user_not_found(user))?;

    if json {
        return print_json(&serde_json::json!({ "user_id": user, "deleted": true }));
    }

    success(format!("User {user} deleted"));
    Ok(())
}

pub async fn create_skill(state: &AppState, name: &str, json: bool) -> Result<()> {
    if name.trim().is_empty() {
        bail!("skill name cannot be empty");
    }
    let skill = state.directory.create_skill(name).await?;

    if json {
        return print_json(&skill);
    }

    success(format!("Skill {} added to the catalog", style(&skill.name).cyan()));
    field("ID:", style(skill.id).dim());
    println!();
    Ok(())
}

pub async fn list_skills(state: &AppState, json: bool) -> Result<()> {
    let skills = state.directory.list_skills().await?;

    if json {
        return print_json(&skills);
    }

    if skills.is_empty() {
        empty_hint(
            "The skill catalog is empty.",
            Some("Add one with: swapmatch skill create <NAME>"),
        );
        return Ok(());
    }

    let mut t = table(&["Skill", "Added", "ID"]);
    for skill in &skills {
        t.add_row(vec![
            skill.name.clone(),
            format_relative_time(&skill.created_at),
            skill.id.to_string(),
        ]);
    }
    print_table(&t, skills.len(), "skill");
    Ok(())
}

/// Which side of a trade a skill link records.
#[derive(Debug, Clone, Copy)]
pub enum SkillSide {
    Offered,
    Wanted,
}

pub async fn link_skill(
    state: &AppState,
    user: &UserId,
    skill_key: &str,
    side: SkillSide,
    json: bool,
) -> Result<()> {
    let summary = require_user(state, user).await?;
    let skill = resolve_skill(state, skill_key).await?;

    match side {
        SkillSide::Offered => state.directory.add_offered(user, &skill.id).await?,
        SkillSide::Wanted => state.directory.add_wanted(user, &skill.id).await?,
    }

    if json {
        let side = match side {
            SkillSide::Offered => "offered",
            SkillSide::Wanted => "wanted",
        };
        return print_json(&serde_json::json!({
            "user_id": user,
            "skill_id": skill.id,
            "side": side,
        }));
    }

    let verb = match side {
        SkillSide::Offered => "teaches",
        SkillSide::Wanted => "wants to learn",
    };
    success(format!(
        "{} {verb} {}",
        style(&summary.name).cyan(),
        style(&skill.name).cyan()
    ));
    Ok(())
}
