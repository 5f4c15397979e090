//! Business logic and repository trait definitions for SwapMatch.
//!
//! This crate defines the "ports" (repository traits) that the infrastructure
//! layer implements, and the services built on them. It depends only on
//! `swapmatch-types` -- never on `swapmatch-infra` or any database/IO crate.

pub mod overlap;
pub mod repository;
pub mod service;

#[cfg(test)]
mod test_support;
