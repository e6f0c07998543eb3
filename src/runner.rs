//! Sequential scenario execution.
//!
//! One generic loop runs a fixed, data-driven table of named scenarios.
//! A scenario's error becomes a failed verdict and the run continues; the
//! only thing that ends the run early is Ctrl-C, and verdicts recorded
//! before the interruption are kept.

use futures::future::{BoxFuture, FutureExt};
use std::future::Future;

use crate::errors::CheckError;
use crate::report::ScenarioResult;

/// A named, single-use test scenario.
pub struct Scenario {
    pub name: &'static str,
    pub operation: BoxFuture<'static, Result<bool, CheckError>>,
}

impl Scenario {
    pub fn new<F>(name: &'static str, operation: F) -> Self
    where
        F: Future<Output = Result<bool, CheckError>> + Send + 'static,
    {
        Self {
            name,
            operation: operation.boxed(),
        }
    }
}

/// Drive one scenario operation against an interrupt signal.
///
/// Returns `None` when the signal fired first — the run should stop. A
/// signal source that fails to register is logged and ignored; the
/// scenario still runs to completion.
async fn run_until_interrupt<I>(
    mut operation: BoxFuture<'static, Result<bool, CheckError>>,
    interrupt: I,
) -> Option<Result<bool, CheckError>>
where
    I: Future<Output = std::io::Result<()>>,
{
    tokio::select! {
        biased;
        signal = interrupt => match signal {
            Ok(()) => None,
            Err(e) => {
                tracing::warn!(error = %e, "interrupt handler unavailable");
                Some(operation.await)
            }
        },
        outcome = &mut operation => Some(outcome),
    }
}

/// Run every scenario in order, collecting one verdict per scenario.
///
/// `Ok(passed)` records the verdict as-is. `Err` records `false` and logs
/// the error — it never propagates past the scenario boundary or stops
/// later scenarios. Ctrl-C aborts the remaining list.
pub async fn run_all(scenarios: Vec<Scenario>) -> Vec<ScenarioResult> {
    let mut results = Vec::with_capacity(scenarios.len());

    for scenario in scenarios {
        println!("{}", "=".repeat(50));

        let outcome = match run_until_interrupt(scenario.operation, tokio::signal::ctrl_c()).await
        {
            Some(outcome) => outcome,
            None => {
                println!("\n⚠️ run interrupted");
                tracing::warn!(completed = results.len(), "interrupted by user");
                break;
            }
        };

        let passed = match outcome {
            Ok(passed) => passed,
            Err(e) => {
                println!("❌ {} failed: {e}", scenario.name);
                tracing::error!(scenario = scenario.name, error = %e, "scenario error");
                false
            }
        };

        results.push(ScenarioResult {
            name: scenario.name,
            passed,
        });
    }

    results
}

// ─── Tests ───────────────────────────────────────────────────────────────────
