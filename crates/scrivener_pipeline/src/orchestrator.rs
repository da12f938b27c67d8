//! The chapter pipeline.

use crate::{
    HealthReport, PassageSource, PipelineSettings, RetrieverChain, ServiceHealth, derive_title,
};
use futures::StreamExt;
use scrivener_agents::{AgentContext, AgentRoster};
use scrivener_config::MissingPredecessorPolicy;
use scrivener_core::{
    Chapter, ChapterBrief, ChapterCommit, ChapterId, ChapterRequest, ChapterResult,
    CharacterRecord, LoreRecord, NewChapter, PlotPoint, StyleGuide,
};
use scrivener_error::{
    BuilderError, PipelineError, PipelineErrorKind, ScrivenerError, ScrivenerResult,
};
use scrivener_interface::{ChapterStore, PipelineObserver, Stage, TextGenerator, TracingObserver};
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

/// Where a chapter sits in its thread.
#[derive(Debug, Clone)]
struct Continuation {
    previous_content: Option<String>,
    chapter_number: u32,
    previous_chapter_id: Option<ChapterId>,
}

impl Continuation {
    fn fresh() -> Self {
        Self {
            previous_content: None,
            chapter_number: 1,
            previous_chapter_id: None,
        }
    }
}

/// Everything stages 1 through 6 produce.
#[derive(Debug)]
struct Draft {
    content: String,
    style_guide: StyleGuide,
    characters: Vec<CharacterRecord>,
    lore: Vec<LoreRecord>,
}

/// Runs one chapter request through every agent and persists the result.
///
/// Collaborators are injected; the orchestrator itself holds no per-request
/// state and can serve concurrent requests.
///
/// # Examples
///
/// ```no_run
/// use scrivener_core::ChapterRequest;
/// use scrivener_interface::{ChapterStore, TextGenerator};
/// use scrivener_pipeline::{ChapterOrchestrator, RetrieverChain};
/// use std::sync::Arc;
///
/// async fn first_chapter(
///     generator: Arc<dyn TextGenerator>,
///     store: Arc<dyn ChapterStore>,
/// ) -> scrivener_error::ScrivenerResult<()> {
///     let orchestrator = ChapterOrchestrator::new(generator, store)
///         .with_retrievers(RetrieverChain::new());
///     let result = orchestrator
///         .generate(&ChapterRequest::new("A lighthouse keeper finds a door in the sea", "fantasy"))
///         .await?;
///     assert_eq!(*result.chapter_number(), 1);
///     Ok(())
/// }
/// ```
pub struct ChapterOrchestrator {
    generator: Arc<dyn TextGenerator>,
    store: Arc<dyn ChapterStore>,
    retrievers: RetrieverChain,
    observer: Arc<dyn PipelineObserver>,
    settings: PipelineSettings,
    context: AgentContext,
    agents: AgentRoster,
}

impl std::fmt::Debug for ChapterOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChapterOrchestrator")
            .field("provider", &self.generator.provider_name())
            .field("model", &self.generator.model_name())
            .field("retrievers", &self.retrievers)
            .field("settings", &self.settings)
            .finish()
    }
}

impl ChapterOrchestrator {
    /// Orchestrator with default settings, no retrievers, and tracing events.
    pub fn new(generator: Arc<dyn TextGenerator>, store: Arc<dyn ChapterStore>) -> Self {
        let settings = PipelineSettings::default();
        let context = AgentContext::new(generator.clone());
        let agents = AgentRoster::new(context.clone());
        Self {
            generator,
            store,
            retrievers: RetrieverChain::new().with_timeout(*settings.retrieval_timeout()),
            observer: Arc::new(TracingObserver),
            settings,
            context,
            agents,
        }
        .rebuild_agents()
    }

    /// Use `retrievers` for grounding passages.
    ///
    /// The chain's deadline is replaced by the configured retrieval timeout.
    pub fn with_retrievers(mut self, retrievers: RetrieverChain) -> Self {
        self.retrievers = retrievers.with_timeout(*self.settings.retrieval_timeout());
        self
    }

    /// Send stage events to `observer`.
    pub fn with_observer(mut self, observer: Arc<dyn PipelineObserver>) -> Self {
        self.observer = observer;
        self.rebuild_agents()
    }

    /// Replace the tuning.
    pub fn with_settings(mut self, settings: PipelineSettings) -> Self {
        self.retrievers = self.retrievers.with_timeout(*settings.retrieval_timeout());
        self.settings = settings;
        self.rebuild_agents()
    }

    /// Current tuning.
    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    /// The chapter store.
    pub fn store(&self) -> &Arc<dyn ChapterStore> {
        &self.store
    }

    /// The retriever chain.
    pub fn retrievers(&self) -> &RetrieverChain {
        &self.retrievers
    }

    fn rebuild_agents(mut self) -> Self {
        self.context = AgentContext::new(self.generator.clone())
            .with_observer(self.observer.clone())
            .with_timeout(*self.settings.agent_timeout());
        self.agents = AgentRoster::new(self.context.clone())
            .with_style_store(self.store.clone())
            .with_style_cache(self.settings.style_cache().clone());
        self
    }

    /// Generate, persist, and return one chapter.
    ///
    /// # Errors
    ///
    /// Fails on a blank summary, on a missing predecessor under
    /// [`MissingPredecessorPolicy::Reject`], and when the store rejects the
    /// chapter. Agent failures are absorbed by their fallbacks.
    pub async fn generate(&self, request: &ChapterRequest) -> ScrivenerResult<ChapterResult> {
        self.generate_with_cancel(request, std::future::pending()).await
    }

    /// Like [`generate`](Self::generate), abandoning the request if `cancel`
    /// resolves before persistence starts.
    ///
    /// In-flight agent calls are dropped and nothing is stored. Once the commit
    /// has begun it runs to completion.
    ///
    /// # Errors
    ///
    /// As [`generate`](Self::generate), plus [`PipelineErrorKind::Cancelled`].
    #[tracing::instrument(
        skip_all,
        fields(
            genre = %request.genre(),
            previous_chapter_id = ?request.previous_chapter_id(),
        )
    )]
    pub async fn generate_with_cancel<C>(
        &self,
        request: &ChapterRequest,
        cancel: C,
    ) -> ScrivenerResult<ChapterResult>
    where
        C: Future<Output = ()>,
    {
        let started = Instant::now();
        let outcome = self.run(request, cancel, started).await;
        if let Err(e) = &outcome {
            tracing::error!(error = %e, "Chapter request failed");
        }
        outcome
    }

    async fn run<C>(
        &self,
        request: &ChapterRequest,
        cancel: C,
        started: Instant,
    ) -> ScrivenerResult<ChapterResult>
    where
        C: Future<Output = ()>,
    {
        request.validate()?;
        let continuation = self.resolve_continuation(request).await?;

        let draft = tokio::select! {
            biased;
            _ = cancel => {
                tracing::warn!("Cancelled before persistence");
                return Err(PipelineError::new(PipelineErrorKind::Cancelled).into());
            }
            draft = self.draft(request, &continuation) => draft?,
        };

        let chapter = self.persist(request, &continuation, &draft).await?;
        let title = derive_title(chapter.content(), request.genre());

        let result = ChapterResult::builder()
            .chapter_id(*chapter.id())
            .title(title)
            .content(chapter.content().clone())
            .word_count(chapter.word_count())
            .style_guide(draft.style_guide.formatted())
            .characters(draft.characters)
            .lore(draft.lore)
            .chapter_number(*chapter.chapter_number())
            .previous_chapter_id(*chapter.previous_chapter_id())
            .build()
            .map_err(|e| BuilderError::incomplete("ChapterResult", e))?;

        self.context.emit(
            Stage::Chapter,
            started,
            false,
            Some(format!("chapter {}", result.chapter_id())),
        );
        tracing::info!(
            chapter_id = %result.chapter_id(),
            chapter_number = result.chapter_number(),
            word_count = result.word_count(),
            "Chapter generated"
        );
        Ok(result)
    }

    async fn resolve_continuation(
        &self,
        request: &ChapterRequest,
    ) -> ScrivenerResult<Continuation> {
        let Some(id) = *request.previous_chapter_id() else {
            return Ok(Continuation::fresh());
        };

        match self.store.chapter(id).await.map_err(persistence)? {
            Some(previous) => Ok(Continuation {
                previous_content: Some(previous.content().clone()),
                chapter_number: previous.chapter_number().saturating_add(1),
                previous_chapter_id: Some(id),
            }),
            None => match self.settings.missing_predecessor() {
                MissingPredecessorPolicy::FreshThread => {
                    tracing::warn!(
                        previous_chapter_id = %id,
                        "Previous chapter not found, starting a new thread"
                    );
                    Ok(Continuation::fresh())
                }
                MissingPredecessorPolicy::Reject => {
                    Err(PipelineError::new(PipelineErrorKind::MissingPredecessor(id.get())).into())
                }
            },
        }
    }

    async fn draft(
        &self,
        request: &ChapterRequest,
        continuation: &Continuation,
    ) -> ScrivenerResult<Draft> {
        let summary = request.summary();
        let genre = request.genre();

        let brief = self
            .agents
            .intent()
            .analyze(summary, continuation.previous_content.as_deref(), genre)
            .await;
        let plot_points = self.agents.scout().deconstruct(summary).await;
        let style_guide = self.agents.style().research(genre).await;

        let sections = self
            .weave_sections(&plot_points, genre, &brief, &style_guide)
            .await;
        let raw_chapter = sections.join("\n\n");
        tracing::debug!(
            sections = sections.len(),
            raw_len = raw_chapter.len(),
            "Sections assembled"
        );

        let content = self
            .agents
            .polish()
            .polish(&raw_chapter, &style_guide, &brief)
            .await;
        if content.trim().is_empty() {
            return Err(PipelineError::new(PipelineErrorKind::GenerationFailed(
                "polished chapter is empty".to_string(),
            ))
            .into());
        }

        let (characters, lore) = tokio::join!(
            self.agents.characters().extract(&content),
            self.agents.lore().extract(&content),
        );

        Ok(Draft {
            content,
            style_guide,
            characters,
            lore,
        })
    }

    /// One section per plot point, in plot point order.
    async fn weave_sections(
        &self,
        plot_points: &[PlotPoint],
        genre: &str,
        brief: &ChapterBrief,
        style_guide: &StyleGuide,
    ) -> Vec<String> {
        futures::stream::iter(plot_points.iter().enumerate())
            .map(|(index, plot_point)| {
                self.weave_section(index, plot_point, genre, brief, style_guide)
            })
            .buffered(self.settings.effective_concurrency())
            .collect()
            .await
    }

    #[tracing::instrument(skip(self, plot_point, genre, brief, style_guide))]
    async fn weave_section(
        &self,
        index: usize,
        plot_point: &PlotPoint,
        genre: &str,
        brief: &ChapterBrief,
        style_guide: &StyleGuide,
    ) -> String {
        let query = self.agents.scout().query_for(plot_point, genre, brief).await;

        let started = Instant::now();
        let passage = self.retrievers.fetch(&query).await;
        let (fallback, detail) = match passage.source() {
            PassageSource::Retriever(name) => (false, name.clone()),
            PassageSource::Placeholder => (true, "placeholder".to_string()),
        };
        self.context
            .emit(Stage::Retrieval, started, fallback, Some(detail));

        self.agents
            .weaver()
            .weave(plot_point, passage.text(), style_guide, brief)
            .await
    }

    async fn persist(
        &self,
        request: &ChapterRequest,
        continuation: &Continuation,
        draft: &Draft,
    ) -> ScrivenerResult<Chapter> {
        let started = Instant::now();
        let commit = ChapterCommit::new(
            NewChapter::new(
                request.summary().clone(),
                request.genre().clone(),
                draft.content.clone(),
                continuation.chapter_number,
                continuation.previous_chapter_id,
            ),
            draft.characters.clone(),
            draft.lore.clone(),
        );

        let id = self.store.commit(&commit).await.map_err(persistence)?;
        let chapter = self
            .store
            .chapter(id)
            .await
            .map_err(persistence)?
            .ok_or_else(|| {
                PipelineError::new(PipelineErrorKind::Persistence(format!(
                    "chapter {} missing after commit",
                    id
                )))
            })?;

        self.context
            .emit(Stage::Persist, started, false, Some(format!("chapter {}", id)));
        Ok(chapter)
    }

    /// Probe the store and every retriever.
    pub async fn health(&self) -> HealthReport {
        let (store, retrievers) = tokio::join!(self.store.health(), self.retrievers.health());
        let mut services = vec![ServiceHealth::new("store", store)];
        services.extend(
            retrievers
                .into_iter()
                .map(|(name, status)| ServiceHealth::new(name, status)),
        );
        HealthReport::from_services(services)
    }
}

fn persistence(error: ScrivenerError) -> ScrivenerError {
    PipelineError::new(PipelineErrorKind::Persistence(error.kind().to_string())).into()
}
