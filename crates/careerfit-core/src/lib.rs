//! careerfit-core — Question catalog, scoring rules, and assessment sessions.
//!
//! This crate defines the data model, the TOML catalog loader, the scoring
//! arithmetic, and the per-assessment session state machine that the
//! `careerfit` CLI drives.

pub mod catalog;
pub mod error;
pub mod model;
pub mod parser;
pub mod report;
pub mod results;
pub mod scoring;
pub mod session;
