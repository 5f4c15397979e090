//! Infrastructure layer for SwapMatch.
//!
//! Contains the SQLite implementations of the repository traits defined in
//! `swapmatch-core`, plus configuration loading and data-directory
//! resolution.

pub mod config;
pub mod sqlite;
