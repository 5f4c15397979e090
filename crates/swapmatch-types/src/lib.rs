//! Shared domain types for the swap matching engine.
//!
//! Users, skills, swap requests, availability slots, ratings, configuration,
//! and the typed error enums every service returns.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

mod id;

pub mod availability;
pub mod config;
pub mod error;
pub mod rating;
pub mod skill;
pub mod swap;
pub mod user;
