//! CLI entry point: build the two endpoint clients, run every scenario in
//! order, print the summary, and exit 0 only if everything passed.

use std::sync::Arc;

use anyhow::Context;

use chatcheck::config::HarnessConfig;
use chatcheck::report::print_summary;
use chatcheck::runner::run_all;
use chatcheck::scenarios::build_scenarios;
use chatcheck::ApiClient;

/// Initialize the tracing subscriber.
///
/// Logs go to stderr so scenario progress on stdout stays clean. Filtering
/// defaults to `chatcheck=info,warn` and is overridable via `RUST_LOG`.
fn init_tracing() {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("chatcheck=info,warn"));

    fmt::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(true)
        .init();
}

/// Print the startup banner with the resolved endpoints, mirroring what the
/// harness is about to exercise.
fn print_banner(config: &HarnessConfig) {
    println!("🚀 checking OpenAI-compatible service...");
    println!("📡 service URL: {}", config.base_url());
    println!("🔧 CLI endpoint URL: {}", config.cli_base_url());
    println!("🔑 API key: {}", config.api_key);

    if config.uses_default_key() {
        println!("💡 using the default API key; set API_KEY in .env to change it");
    } else {
        println!("✅ API key read from the environment");
    }
    if config.uses_default_port() {
        println!("💡 using the default port; set SERVICE_PORT in .env to change it");
    } else {
        println!("✅ service port read from the environment: {}", config.service_port);
    }
}

async fn run() -> anyhow::Result<i32> {
    let config = HarnessConfig::load();
    print_banner(&config);

    let default_client = Arc::new(
        ApiClient::new(config.base_url(), config.api_key.clone())
            .context("failed to build default endpoint client")?,
    );
    let cli_client = Arc::new(
        ApiClient::new(config.cli_base_url(), config.api_key.clone())
            .context("failed to build CLI endpoint client")?,
    );

    let scenarios = build_scenarios(default_client, cli_client);
    let results = run_all(scenarios).await;

    Ok(print_summary(&results))
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    init_tracing();

    let code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("❌ fatal: {e:#}");
            1
        }
    };

    std::process::exit(code);
}
