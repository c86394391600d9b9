//! Command handler layer.
//!
//! This module owns CLI-oriented orchestration and output wiring.
//!
//! ## Files
//! - `job.rs` — `run`.
//! - `admin.rs` — `check` and `config show`.
//!
//! ## Principles
//! - Parse/match CLI inputs here.
//! - Delegate business logic to `services/*`.
//! - Handlers return the process exit code; plumbing errors bubble up as `anyhow`.

pub mod admin;
pub mod job;

pub use admin::{handle_check, handle_config_commands};
pub use job::handle_run;
