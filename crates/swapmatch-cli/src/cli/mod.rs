//! CLI command definitions for the `swapmatch` binary.
//!
//! Uses clap derive macros for argument parsing. The CLI follows a
//! noun-verb pattern (e.g., `swapmatch swap propose`, `swapmatch slot list`).

pub mod availability;
pub mod directory;
pub mod matching;
pub mod output;
pub mod rating;
pub mod swap;

use clap::{Parser, Subcommand};
use swapmatch_core::repository::SortOrder;
use swapmatch_core::repository::swap_request::SwapSortField;
use swapmatch_types::availability::SlotId;
use swapmatch_types::rating::RatingId;
use swapmatch_types::swap::{SwapId, SwapStatus};
use swapmatch_types::user::UserId;

/// Peer-to-peer skill swapping: propose trades, find partners, line up schedules.
#[derive(Parser)]
#[command(name = "swapmatch", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Export spans to stdout via OpenTelemetry.
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage users (seeding and visibility).
    User {
        #[command(subcommand)]
        action: UserCommand,
    },

    /// Manage the skill catalog and who offers or wants what.
    Skill {
        #[command(subcommand)]
        action: SkillCommand,
    },

    /// Propose, resolve and browse swap requests.
    Swap {
        #[command(subcommand)]
        action: SwapCommand,
    },

    /// Find reciprocal trade partners for a user.
    Matches {
        /// User to find partners for.
        user: UserId,
    },

    /// Manage weekly availability slots and compare schedules.
    Slot {
        #[command(subcommand)]
        action: SlotCommand,
    },

    /// Rate the other participant of an accepted swap.
    Rating {
        #[command(subcommand)]
        action: RatingCommand,
    },
}

#[derive(Subcommand)]
pub enum UserCommand {
    /// Register a user.
    Create {
        name: String,

        #[arg(long)]
        location: Option<String>,
    },

    /// List users that are not deleted.
    #[command(alias = "ls")]
    List,

    /// Hide a user from partner matching.
    Hide { user: UserId },

    /// Make a user visible to partner matching again.
    Unhide { user: UserId },

    /// Soft-delete a user.
    #[command(alias = "rm")]
    Delete { user: UserId },
}

#[derive(Subcommand)]
pub enum SkillCommand {
    /// Add a skill to the catalog.
    Create { name: String },

    /// List the catalog.
    #[command(alias = "ls")]
    List,

    /// Record that a user teaches a skill.
    Offer {
        user: UserId,
        /// Skill name or ID.
        skill: String,
    },

    /// Record that a user wants to learn a skill.
    Want {
        user: UserId,
        /// Skill name or ID.
        skill: String,
    },
}

#[derive(Subcommand)]
pub enum SwapCommand {
    /// Propose a swap: teach `--offer` to `--to` in exchange for `--want`.
    Propose {
        #[arg(long)]
        from: UserId,

        #[arg(long)]
        to: UserId,

        /// Skill the proposer teaches (name or ID).
        #[arg(long)]
        offer: String,

        /// Skill the proposer wants in return (name or ID).
        #[arg(long)]
        want: String,
    },

    /// Accept a pending swap (responder only).
    Accept {
        swap: SwapId,
        #[arg(long = "as")]
        acting: UserId,
    },

    /// Reject a pending swap (responder only).
    Reject {
        swap: SwapId,
        #[arg(long = "as")]
        acting: UserId,
    },

    /// Cancel a pending swap (either participant).
    Cancel {
        swap: SwapId,
        #[arg(long = "as")]
        acting: UserId,
    },

    /// Delete a pending swap (requester only).
    #[command(alias = "rm")]
    Delete {
        swap: SwapId,
        #[arg(long = "as")]
        acting: UserId,
    },

    /// Show a swap with participant and skill details.
    Show { swap: SwapId },

    /// List a user's swaps.
    #[command(alias = "ls")]
    List {
        user: UserId,

        /// Only swaps the user proposed.
        #[arg(long)]
        sent: bool,

        /// Only swaps proposed to the user.
        #[arg(long)]
        received: bool,

        #[arg(long)]
        status: Option<SwapStatus>,

        /// created_at or updated_at.
        #[arg(long)]
        sort: Option<SwapSortField>,

        /// asc or desc.
        #[arg(long)]
        order: Option<SortOrder>,

        #[arg(long)]
        limit: Option<u32>,

        #[arg(long)]
        offset: Option<u32>,
    },

    /// Sent and received swaps side by side.
    Overview { user: UserId },

    /// Swaps awaiting a decision.
    Pending { user: UserId },

    /// Resolved swaps, most recent first.
    History { user: UserId },
}

#[derive(Subcommand)]
pub enum SlotCommand {
    /// Add a weekly availability slot.
    Add {
        user: UserId,

        #[arg(long)]
        label: String,

        /// Bitmask 1-127 (Monday = 1) or day names, e.g. "mon,wed,fri".
        #[arg(long)]
        days: String,

        /// HH:MM
        #[arg(long)]
        start: String,

        /// HH:MM
        #[arg(long)]
        end: String,
    },

    /// List a user's slots.
    #[command(alias = "ls")]
    List { user: UserId },

    /// Replace a slot's label, days and times.
    Update {
        slot: SlotId,

        #[arg(long)]
        user: UserId,

        #[arg(long)]
        label: String,

        #[arg(long)]
        days: String,

        #[arg(long)]
        start: String,

        #[arg(long)]
        end: String,
    },

    /// Remove a slot.
    #[command(alias = "rm")]
    Remove {
        slot: SlotId,

        #[arg(long)]
        user: UserId,
    },

    /// Weekday/time windows two users share.
    Common { user_a: UserId, user_b: UserId },

    /// Slots covering a time window on a weekday.
    At {
        user: UserId,

        /// 1 (Monday) to 7 (Sunday).
        #[arg(long)]
        day: i64,

        #[arg(long)]
        start: String,

        #[arg(long)]
        end: String,
    },
}

#[derive(Subcommand)]
pub enum RatingCommand {
    /// Rate the other participant of an accepted swap.
    Create {
        swap: SwapId,

        #[arg(long = "as")]
        rater: UserId,

        /// 1 to 5.
        #[arg(long)]
        score: i64,

        #[arg(long)]
        comment: Option<String>,
    },

    /// Whether a user may rate a swap now.
    Check {
        swap: SwapId,

        #[arg(long = "as")]
        user: UserId,
    },

    /// Change a rating (rater only).
    Update {
        rating: RatingId,

        #[arg(long = "as")]
        rater: UserId,

        #[arg(long)]
        score: i64,

        #[arg(long)]
        comment: Option<String>,
    },

    /// Remove a rating (rater only).
    #[command(alias = "rm")]
    Delete {
        rating: RatingId,

        #[arg(long = "as")]
        rater: UserId,
    },

    /// Ratings left on one swap.
    Swap { swap: SwapId },

    /// Ratings involving a user (received by default).
    #[command(alias = "ls")]
    List {
        user: UserId,

        /// Include ratings the user gave.
        #[arg(long)]
        given: bool,

        /// Include ratings the user received.
        #[arg(long)]
        received: bool,

        #[arg(long)]
        min: Option<i64>,

        #[arg(long)]
        max: Option<i64>,

        #[arg(long)]
        limit: Option<u32>,

        #[arg(long)]
        offset: Option<u32>,
    },

    /// Average and distribution of ratings received.
    Stats { user: UserId },
}
