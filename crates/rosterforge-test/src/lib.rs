//! Shared test fixtures for RosterForge crates.
//!
//! This crate provides player factories for tests. It depends only on
//! `rosterforge-core`, so every other crate can use it as a dev-dependency.
//!
//! - [`players`] - player and pool factories
//!
//! # Usage
//!
//! Add as a dev-dependency in your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! rosterforge-test = { workspace = true }
//! ```
//!
//! Then import the fixtures you need:
//!
//! ```ignore
//! use rosterforge_test::players::{uniform_players, ladder_players};
//! ```

pub mod players;

pub use players::{ladder_players, player, players_from_levels, pool_of, uniform_players};
