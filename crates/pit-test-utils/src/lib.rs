//! Shared test utilities for the pit workspace.
//!
//! This crate provides standardised test fixtures to eliminate duplication
//! across crate test suites. It is a dev-dependency only and never published.
//!
//! # Modules
//!
//! - [`collection`]: [`TestCollection`](collection::TestCollection), a
//!   temporary working directory with file helpers

pub mod collection;
