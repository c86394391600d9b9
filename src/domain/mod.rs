//! Shared data model layer (structs/constants only).
//!
//! ## Files
//! - `models.rs` — job configuration, run/check reports, JSON envelopes.
//! - `constants.rs` — fixed mail subjects and default paths.
//!
//! ## Rule of thumb
//! Domain types should be data-only: no filesystem/process side effects.
//!
//! ## Compatibility note
//! `RunReport` and `CheckReport` are the `--json` output schema; cron
//! monitoring may parse them.

pub mod constants;
pub mod models;
