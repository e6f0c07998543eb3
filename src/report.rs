//! Result summary and exit code.
//!
//! Pure function of the ordered result list (plus printing): no retries, no
//! network access, same output and exit code every time it runs.

/// Verdict for one executed scenario.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioResult {
    pub name: &'static str,
    pub passed: bool,
}

/// Print the per-scenario verdicts and the aggregate count.
///
/// Returns the process exit code: 0 iff every scenario passed, else 1.
pub fn print_summary(results: &[ScenarioResult]) -> i32 {
    println!("{}", "=".repeat(50));
    println!("📋 results:");

    let mut passed = 0usize;
    for result in results {
        let marker = if result.passed { "✅ pass" } else { "❌ fail" };
        println!("   {}: {marker}", result.name);
        if result.passed {
            passed += 1;
        }
    }

    println!("\n🎯 total: {passed}/{}", results.len());

    if passed == results.len() {
        println!("🎉 all checks passed — the service looks healthy.");
        0
    } else {
        println!("⚠️ some checks failed — inspect the service configuration.");
        1
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
