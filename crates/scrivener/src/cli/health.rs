//! Health command.

use super::commands::OutputFormat;
use super::output;
use scrivener::{ScrivenerConfig, ScrivenerResult, build_orchestrator};

/// Probe the store and retrievers. Exits non-zero when degraded.
pub async fn report_health(config: &ScrivenerConfig, format: OutputFormat) -> ScrivenerResult<()> {
    let orchestrator = build_orchestrator(config, false).await?;
    let report = orchestrator.health().await;

    output::emit(&report, format, output::health)?;

    if !report.is_healthy() {
        std::process::exit(1);
    }
    Ok(())
}
