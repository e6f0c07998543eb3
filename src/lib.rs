//! chatcheck — conformance checker for OpenAI-compatible chat endpoints.
//!
//! Exercises five capability surfaces of a locally running service — model
//! listing, single-shot chat, streamed chat, streamed "thinking" chat, and
//! tool calling — against the default (`…/v1`) and CLI (`…/cli/v1`) endpoint
//! roots, and reports pass/fail per scenario plus an aggregate exit code.

pub mod classify;
pub mod client;
pub mod config;
pub mod errors;
pub mod report;
pub mod runner;
pub mod scenarios;
pub mod streaming;
pub mod types;

// Re-exports for convenience
pub use classify::{classify, Completion, ToolInvocation};
pub use client::ApiClient;
pub use config::HarnessConfig;
pub use errors::CheckError;
pub use report::{print_summary, ScenarioResult};
pub use runner::{run_all, Scenario};
pub use streaming::{accumulate, StreamOutcome};
