//! Infrastructure adapters: database, legacy store, HTTP, telemetry.

pub mod db;
pub mod error;
pub mod http;
pub mod local;
pub mod telemetry;
