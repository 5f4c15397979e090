//! Rating commands: rate a finished swap and read reputation.

use anyhow::Result;
use comfy_table::{Cell, Color};
use console::style;

use swapmatch_core::repository::rating::RatingFilter;
use swapmatch_types::rating::{RatingId, Score, SwapRating};
use swapmatch_types::swap::SwapId;
use swapmatch_types::user::UserId;

use super::output::{
    empty_hint, field, format_relative_time, print_json, print_table, success, table,
};
use crate::state::AppState;

fn stars(score: Score) -> String {
    let filled = usize::from(score.value());
    format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled))
}

fn print_rating(rating: &SwapRating) {
    field("Score:  ", style(stars(rating.score)).yellow());
    if let Some(comment) = &rating.comment {
        field("Comment:", comment);
    }
    field("Ratee:  ", rating.ratee_id);
    field("ID:     ", style(rating.id).dim());
    println!();
}

fn rating_table(ratings: &[SwapRating]) {
    let mut t = table(&["Score", "Rater", "Ratee", "Comment", "When", "ID"]);
    for rating in ratings {
        t.add_row(vec![
            Cell::new(stars(rating.score)).fg(Color::Yellow),
            Cell::new(rating.rater_id.to_string()),
            Cell::new(rating.ratee_id.to_string()),
            Cell::new(rating.comment.as_deref().unwrap_or("")),
            Cell::new(format_relative_time(&rating.created_at)),
            Cell::new(rating.id.to_string()),
        ]);
    }
    print_table(&t, ratings.len(), "rating");
}

pub async fn create(
    state: &AppState,
    swap_id: &SwapId,
    rater: &UserId,
    score: i64,
    comment: Option<String>,
    json: bool,
) -> Result<()> {
    let rating = state
        .rating_service
        .create_rating(swap_id, rater, score, comment)
        .await?;

    if json {
        return print_json(&rating);
    }

    success("Rating recorded");
    print_rating(&rating);
    Ok(())
}

pub async fn check(state: &AppState, swap_id: &SwapId, user: &UserId, json: bool) -> Result<()> {
    let allowed = state.rating_service.can_rate(swap_id, user).await?;

    if json {
        return print_json(&serde_json::json!({
            "swap_id": swap_id,
            "user_id": user,
            "can_rate": allowed,
        }));
    }

    println!();
    if allowed {
        println!("  {} {user} can rate swap {swap_id}", style("✓").green().bold());
    } else {
        println!("  {} {user} cannot rate swap {swap_id}", style("✗").red().bold());
    }
    println!();
    Ok(())
}

pub async fn update(
    state: &AppState,
    rating_id: &RatingId,
    rater: &UserId,
    score: i64,
    comment: Option<String>,
    json: bool,
) -> Result<()> {
    let rating = state
        .rating_service
        .update_rating(rating_id, rater, score, comment)
        .await?;

    if json {
        return print_json(&rating);
    }

    success("Rating updated");
    print_rating(&rating);
    Ok(())
}

pub async fn delete(state: &AppState, rating_id: &RatingId, rater: &UserId, json: bool) -> Result<()> {
    state.rating_service.delete_rating(rating_id, rater).await?;

    if json {
        return print_json(&serde_json::json!({ "id": rating_id, "deleted": true }));
    }

    success(format!("Rating {rating_id} deleted"));
    Ok(())
}

pub async fn for_swap(state: &AppState, swap_id: &SwapId, json: bool) -> Result<()> {
    let ratings = state.rating_service.swap_ratings(swap_id).await?;

    if json {
        return print_json(&ratings);
    }

    if ratings.is_empty() {
        empty_hint("Nobody has rated this swap yet.", None);
        return Ok(());
    }

    rating_table(&ratings);
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub async fn for_user(
    state: &AppState,
    user: &UserId,
    given: bool,
    received: bool,
    min: Option<i64>,
    max: Option<i64>,
    limit: Option<u32>,
    offset: Option<u32>,
    json: bool,
) -> Result<()> {
    let filter = RatingFilter {
        as_rater: given,
        as_ratee: received,
        min_score: min.map(Score::new).transpose()?,
        max_score: max.map(Score::new).transpose()?,
        limit,
        offset,
    };
    let ratings = state.rating_service.user_ratings(user, &filter).await?;

    if json {
        return print_json(&ratings);
    }

    if ratings.is_empty() {
        empty_hint("No ratings match.", None);
        return Ok(());
    }

    rating_table(&ratings);
    Ok(())
}

pub async fn stats(state: &AppState, user: &UserId, json: bool) -> Result<()> {
    let stats = state.rating_service.user_rating_stats(user).await?;

    if json {
        return print_json(&stats);
    }

    if stats.total_ratings == 0 {
        empty_hint(format!("{user} has not been rated yet."), None);
        return Ok(());
    }

    println!();
    println!(
        "  {} {:.2} average over {} rating{}",
        style("★").yellow().bold(),
        stats.average_rating,
        stats.total_ratings,
        if stats.total_ratings == 1 { "" } else { "s" }
    );
    println!();

    let widest = stats.score_counts.iter().copied().max().unwrap_or(0).max(1);
    for raw in (Score::MIN..=Score::MAX).rev() {
        let score = Score::new(raw)?;
        let count = stats.count_for(score);
        let bar_len = (count * 30 / widest) as usize;
        println!(
            "  {} {} {}",
            score.value(),
            style("█".repeat(bar_len)).yellow(),
            style(count).dim()
        );
    }
    println!();
    Ok(())
}
