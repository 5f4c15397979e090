//! Swapmatch CLI entry point.
//!
//! Binary name: `swapmatch`
//!
//! Parses CLI arguments, initializes database and services, then dispatches
//! to the appropriate command handler.

mod cli;
mod state;

use clap::Parser;

use cli::{Cli, Commands, RatingCommand, SkillCommand, SlotCommand, SwapCommand, UserCommand};
use cli::directory::SkillSide;
use state::AppState;
use swapmatch_types::swap::SwapStatus;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info,swapmatch=debug",
        _ => "trace",
    };

    swapmatch_observe::tracing_setup::init_tracing(filter, cli.otel)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let state = AppState::init().await?;
    let result = run(cli, &state).await;

    state.db_pool.close().await;
    swapmatch_observe::tracing_setup::shutdown_tracing();
    result
}

async fn run(cli: Cli, state: &AppState) -> anyhow::Result<()> {
    let json = cli.json;

    match cli.command {
        Commands::User { action } => match action {
            UserCommand::Create { name, location } => {
                cli::directory::create_user(state, &name, location.as_deref(), json).await?;
            }
            UserCommand::List => cli::directory::list_users(state, json).await?,
            UserCommand::Hide { user } => {
                cli::directory::set_visibility(state, &user, false, json).await?;
            }
            UserCommand::Unhide { user } => {
                cli::directory::set_visibility(state, &user, true, json).await?;
            }
            UserCommand::Delete { user } => cli::directory::delete_user(state, &user, json).await?,
        },

        Commands::Skill { action } => match action {
            SkillCommand::Create { name } => cli::directory::create_skill(state, &name, json).await?,
            SkillCommand::List => cli::directory::list_skills(state, json).await?,
            SkillCommand::Offer { user, skill } => {
                cli::directory::link_skill(state, &user, &skill, SkillSide::Offered, json).await?;
            }
            SkillCommand::Want { user, skill } => {
                cli::directory::link_skill(state, &user, &skill, SkillSide::Wanted, json).await?;
            }
        },

        Commands::Swap { action } => match action {
            SwapCommand::Propose {
                from,
                to,
                offer,
                want,
            } => {
                cli::swap::propose(state, from, to, &offer, &want, json).await?;
            }
            SwapCommand::Accept { swap, acting } => {
                cli::swap::transition(state, &swap, &acting, SwapStatus::Accepted, json).await?;
            }
            SwapCommand::Reject { swap, acting } => {
                cli::swap::transition(state, &swap, &acting, SwapStatus::Rejected, json).await?;
            }
            SwapCommand::Cancel { swap, acting } => {
                cli::swap::transition(state, &swap, &acting, SwapStatus::Cancelled, json).await?;
            }
            SwapCommand::Delete { swap, acting } => {
                cli::swap::delete(state, &swap, &acting, json).await?;
            }
            SwapCommand::Show { swap } => cli::swap::show(state, &swap, json).await?,
            SwapCommand::List {
                user,
                sent,
                received,
                status,
                sort,
                order,
                limit,
                offset,
            } => {
                cli::swap::list(
                    state, &user, sent, received, status, sort, order, limit, offset, json,
                )
                .await?;
            }
            SwapCommand::Overview { user } => cli::swap::overview(state, &user, json).await?,
            SwapCommand::Pending { user } => cli::swap::pending(state, &user, json).await?,
            SwapCommand::History { user } => cli::swap::history(state, &user, json).await?,
        },

        Commands::Matches { user } => cli::matching::find_matches(state, &user, json).await?,

        Commands::Slot { action } => match action {
            SlotCommand::Add {
                user,
                label,
                days,
                start,
                end,
            } => {
                cli::availability::add_slot(state, &user, label, &days, start, end, json).await?;
            }
            SlotCommand::List { user } => cli::availability::list_slots(state, &user, json).await?,
            SlotCommand::Update {
                slot,
                user,
                label,
                days,
                start,
                end,
            } => {
                cli::availability::update_slot(state, &slot, &user, label, &days, start, end, json)
                    .await?;
            }
            SlotCommand::Remove { slot, user } => {
                cli::availability::remove_slot(state, &slot, &user, json).await?;
            }
            SlotCommand::Common { user_a, user_b } => {
                cli::availability::common(state, &user_a, &user_b, json).await?;
            }
            SlotCommand::At {
                user,
                day,
                start,
                end,
            } => {
                cli::availability::covering(state, &user, day, &start, &end, json).await?;
            }
        },

        Commands::Rating { action } => match action {
            RatingCommand::Create {
                swap,
                rater,
                score,
                comment,
            } => {
                cli::rating::create(state, &swap, &rater, score, comment, json).await?;
            }
            RatingCommand::Check { swap, user } => {
                cli::rating::check(state, &swap, &user, json).await?;
            }
            RatingCommand::Update {
                rating,
                rater,
                score,
                comment,
            } => {
                cli::rating::update(state, &rating, &rater, score, comment, json).await?;
            }
            RatingCommand::Delete { rating, rater } => {
                cli::rating::delete(state, &rating, &rater, json).await?;
            }
            RatingCommand::Swap { swap } => cli::rating::for_swap(state, &swap, json).await?,
            RatingCommand::List {
                user,
                given,
                received,
                min,
                max,
                limit,
                offset,
            } => {
                cli::rating::for_user(
                    state, &user, given, received, min, max, limit, offset, json,
                )
                .await?;
            }
            RatingCommand::Stats { user } => cli::rating::stats(state, &user, json).await?,
        },
    }

    Ok(())
}
