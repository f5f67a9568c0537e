//! Flow: a small self-hosted blogging backend.
//!
//! Markdown posts with derived slugs, a pinned-aware feed, per-post comments
//! and abuse reporting, exposed to the presentation layer as a JSON API.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
