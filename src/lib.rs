// ABOUTME: Library root for atroctl - exposes the orchestrator, transport and watch loop.
// ABOUTME: The main binary is in main.rs.

pub mod assets;
pub mod bundle;
pub mod config;
pub mod deploy;
pub mod error;
pub mod output;
pub mod secrets;
pub mod strategy;
pub mod target;
pub mod types;
pub mod watch;
