//! Chapter generation command.

use super::commands::OutputFormat;
use super::output;
use scrivener::{ChapterId, ChapterRequest, ScrivenerConfig, ScrivenerResult, build_orchestrator};
use tracing::info;

/// Arguments of `scrivener generate`.
#[derive(Debug, Clone)]
pub struct GenerateArgs {
    pub summary: String,
    pub genre: String,
    pub previous_chapter_id: Option<i64>,
    pub format: OutputFormat,
    pub offline: bool,
}

/// Generate one chapter, abandoning it on Ctrl-C.
pub async fn generate_chapter(config: &ScrivenerConfig, args: GenerateArgs) -> ScrivenerResult<()> {
    let orchestrator = build_orchestrator(config, args.offline).await?;
    let request = ChapterRequest::new(args.summary, args.genre)
        .with_previous_chapter_id(args.previous_chapter_id.map(ChapterId::new));

    info!(genre = %request.genre(), "Generating chapter");
    let result = orchestrator
        .generate_with_cancel(&request, interrupted())
        .await?;

    output::emit(&result, args.format, output::chapter_result)
}

/// Resolves on Ctrl-C. Never resolves if the handler cannot be installed.
async fn interrupted() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}
