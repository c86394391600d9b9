//! Service layer containing the job logic and side-effect helpers.
//!
//! ## Service map
//! - `pipeline.rs` — the job runner: ordered, short-circuiting steps.
//! - `environment.rs` — bootstrap variables for the reporter (env file/command).
//! - `scratch.rs` — the scoped temp-file pair.
//! - `reporter.rs` — reporter seam + subprocess implementation.
//! - `mailer.rs` — mailer seam + `mail`-command implementation.
//! - `doctor.rs` — preflight checks behind `check`.
//! - `config.rs` — TOML loading, validation, redaction.
//! - `telemetry.rs` — tracing subscriber setup.
//! - `output.rs` — JSON/text output helpers.
//!
//! ## Conventions
//! - External programs are reached only through the `Reporter`/`Mailer` traits.
//! - Pipeline steps return `JobError`; plumbing returns `anyhow::Result`.
//! - Keep command handlers thin; delegate to services.

pub mod config;
pub mod doctor;
pub mod environment;
pub mod mailer;
pub mod output;
pub mod pipeline;
pub mod reporter;
pub mod scratch;
pub mod telemetry;
