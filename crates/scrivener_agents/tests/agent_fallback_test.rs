//! Every agent degrades to deterministic output when generation fails.

mod test_utils;

use scrivener_agents::{
    AgentContext, CharacterExtractor, CorrectionPolish, IntentAnalyst, LoreMaster, MasterWeaver,
    SceneScout, StyleAnalyst, fallback_section,
};
use scrivener_core::{ChapterBrief, PlotPoint, StyleGuide};
use scrivener_error::GenerationErrorKind;
use scrivener_interface::{RecordingObserver, Stage};
use std::sync::Arc;
use test_utils::MockGenerator;

const BIRTHDAY_SUMMARY: &str =
    "A young woman wakes up on her 18th birthday feeling strange and different, and discovers she has magical powers";

fn failing_context() -> (AgentContext, Arc<MockGenerator>, Arc<RecordingObserver>) {
    let generator = Arc::new(MockGenerator::new_error(GenerationErrorKind::Unavailable(
        "offline".to_string(),
    )));
    let observer = Arc::new(RecordingObserver::new());
    let context = AgentContext::new(generator.clone()).with_observer(observer.clone());
    (context, generator, observer)
}

#[tokio::test]
async fn test_intent_fallback_is_deterministic() {
    let (context, _generator, observer) = failing_context();
    let analyst = IntentAnalyst::new(context);

    let first = analyst.analyze(BIRTHDAY_SUMMARY, None, "fantasy").await;
    let second = analyst.analyze(BIRTHDAY_SUMMARY, None, "fantasy").await;

    assert_eq!(first, second);
    assert!(first.as_str().starts_with("CHAPTER BRIEF - Fantasy Genre"));
    assert_eq!(observer.fallback_count(Stage::Intent), 2);
}

#[tokio::test]
async fn test_scout_fallbacks() {
    let (context, _generator, observer) = failing_context();
    let scout = SceneScout::new(context);

    let points = scout.deconstruct(BIRTHDAY_SUMMARY).await;
    assert_eq!(points.len(), 4);
    assert_eq!(points, scout.deconstruct(BIRTHDAY_SUMMARY).await);
    assert_eq!(
        points[1].as_str(),
        "She discovers she has magical powers when objects start moving around her"
    );

    let brief = ChapterBrief::new("brief");
    let query = scout.query_for(&points[1], "fantasy", &brief).await;
    assert_eq!(query, "fantasy discovering magical abilities descriptive scene");

    assert_eq!(observer.fallback_count(Stage::Deconstruct), 2);
    assert_eq!(observer.fallback_count(Stage::Query), 1);
}

#[tokio::test]
async fn test_weaver_fallback_matches_template() {
    let (context, _generator, _observer) = failing_context();
    let weaver = MasterWeaver::new(context);
    let point = PlotPoint::new("The storm breaks over the harbor.");

    let section = weaver
        .weave(&point, "retrieved", &StyleGuide::canned("noir"), &ChapterBrief::new("b"))
        .await;

    assert_eq!(section, fallback_section(&point));
}

#[tokio::test]
async fn test_polish_fallback_is_mechanical() {
    let (context, _generator, _observer) = failing_context();
    let polish = CorrectionPolish::new(context);

    let text = polish
        .polish(
            "First  paragraph .\n\n\n\nSecond , paragraph.",
            &StyleGuide::canned("noir"),
            &ChapterBrief::new("b"),
        )
        .await;

    assert_eq!(text, "First paragraph.\n\nSecond, paragraph.");
}

#[tokio::test]
async fn test_extractors_never_empty() {
    let (context, _generator, observer) = failing_context();
    let characters = CharacterExtractor::new(context.clone());
    let lore = LoreMaster::new(context);

    for text in ["Sarah felt her powers stir that morning.", "Fog.", "x"] {
        assert!(!characters.extract(text).await.is_empty());
        assert!(!lore.extract(text).await.is_empty());
    }

    let first = characters.extract("Sarah and her mom").await;
    assert_eq!(first, characters.extract("Sarah and her mom").await);
    assert_eq!(first.len(), 2);

    assert_eq!(observer.fallback_count(Stage::Characters), 5);
    assert_eq!(observer.fallback_count(Stage::Lore), 3);
}

#[tokio::test]
async fn test_style_fallback_is_canned_guide() {
    let (context, _generator, observer) = failing_context();
    let analyst = StyleAnalyst::new(context);

    let guide = analyst.research("fantasy").await;

    assert_eq!(guide.formatted(), StyleGuide::canned("fantasy").formatted());
    assert_eq!(observer.fallback_count(Stage::Style), 1);
}
