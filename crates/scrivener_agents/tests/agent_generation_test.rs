//! Agents parse generated output and send their documented parameters.

mod test_utils;

use scrivener_agents::{
    AgentContext, CharacterExtractor, CorrectionPolish, IntentAnalyst, LoreMaster, MasterWeaver,
    SceneScout, fallback_plot_points,
};
use scrivener_core::{ChapterBrief, PlotPoint, StyleGuide};
use scrivener_interface::{RecordingObserver, Stage};
use std::sync::Arc;
use test_utils::{MockGenerator, MockResponse};

fn context_for(generator: &Arc<MockGenerator>) -> (AgentContext, Arc<RecordingObserver>) {
    let observer = Arc::new(RecordingObserver::new());
    let context = AgentContext::new(generator.clone()).with_observer(observer.clone());
    (context, observer)
}

#[tokio::test]
async fn test_intent_uses_generated_brief() -> anyhow::Result<()> {
    let generator = Arc::new(MockGenerator::new_success("  Keep the tone hushed.  "));
    let (context, observer) = context_for(&generator);

    let brief = IntentAnalyst::new(context)
        .analyze("A keeper tends a drowned light", Some("Chapter one text"), "gothic")
        .await;

    assert_eq!(brief.as_str(), "Keep the tone hushed.");
    let request = &generator.requests()[0];
    assert_eq!(*request.max_tokens(), 1500);
    assert!((request.temperature() - 0.7).abs() < f32::EPSILON);
    assert!(request.prompt().contains("PREVIOUS CHAPTER: Chapter one text"));
    assert_eq!(observer.fallback_count(Stage::Intent), 0);
    Ok(())
}

#[tokio::test]
async fn test_deconstruct_parses_list() {
    let generator = Arc::new(MockGenerator::new_success(
        "1. The keeper finds the lamp lit\n2. A ship answers from the fog\n3. The keeper rows out to meet it\n4. No one is aboard",
    ));
    let (context, _observer) = context_for(&generator);

    let points = SceneScout::new(context).deconstruct("summary").await;

    assert_eq!(points.len(), 4);
    assert_eq!(points[3].as_str(), "No one is aboard");
    assert_eq!(*generator.requests()[0].max_tokens(), 800);
}

#[tokio::test]
async fn test_degenerate_list_uses_fallback_arc() {
    let generator = Arc::new(MockGenerator::new_success("1. Too short\n2. Also"));
    let (context, observer) = context_for(&generator);

    let points = SceneScout::new(context).deconstruct("a quiet story").await;

    assert_eq!(points, fallback_plot_points("a quiet story"));
    assert_eq!(observer.fallback_count(Stage::Deconstruct), 1);
}

#[tokio::test]
async fn test_query_prompt_truncates_brief() {
    let generator = Arc::new(MockGenerator::new_success(
        "\"abandoned lighthouse interior at night\"",
    ));
    let (context, _observer) = context_for(&generator);
    let brief = ChapterBrief::new("b".repeat(500));

    let query = SceneScout::new(context)
        .query_for(&PlotPoint::new("The keeper climbs the stairs"), "gothic", &brief)
        .await;

    assert_eq!(query, "abandoned lighthouse interior at night");
    let prompt = generator.requests()[0].prompt().clone();
    assert!(prompt.contains(&format!("CHAPTER BRIEF CONTEXT: {}...", "b".repeat(200))));
    assert!(!prompt.contains(&"b".repeat(201)));
}

#[tokio::test]
async fn test_weave_and_polish_trim_output() {
    let generator = Arc::new(MockGenerator::new_sequence(vec![
        MockResponse::Text("\nThe lamp flared.\n".to_string()),
        MockResponse::Text("  The lamp flared brightly.  ".to_string()),
    ]));
    let (context, _observer) = context_for(&generator);
    let style = StyleGuide::canned("gothic");
    let brief = ChapterBrief::new("b");

    let section = MasterWeaver::new(context.clone())
        .weave(&PlotPoint::new("The lamp flares"), "passage", &style, &brief)
        .await;
    let polished = CorrectionPolish::new(context).polish(&section, &style, &brief).await;

    assert_eq!(section, "The lamp flared.");
    assert_eq!(polished, "The lamp flared brightly.");
    let requests = generator.requests();
    assert_eq!(*requests[0].max_tokens(), 500);
    assert_eq!(*requests[1].max_tokens(), 2000);
}

#[tokio::test]
async fn test_extractors_parse_routed_json() {
    let generator = Arc::new(MockGenerator::new_routed(vec![
        (
            "CharacterExtractor",
            MockResponse::Text(
                "```json\n[{\"name\": \"Mara\", \"description\": \"The keeper\"}]\n```".to_string(),
            ),
        ),
        (
            "LoreMaster",
            MockResponse::Text(
                "[{\"type\": \"location\", \"name\": \"Drowned Light\"}]".to_string(),
            ),
        ),
    ]));
    let (context, observer) = context_for(&generator);
    let text = "Mara climbed the Drowned Light.";

    let character_extractor = CharacterExtractor::new(context.clone());
    let lore_master = LoreMaster::new(context);
    let (characters, lore) = tokio::join!(
        character_extractor.extract(text),
        lore_master.extract(text)
    );

    assert_eq!(characters.len(), 1);
    assert_eq!(characters[0].description(), "The keeper");
    assert_eq!(lore[0].category(), "location");
    assert_eq!(lore[0].name(), "Drowned Light");
    assert_eq!(observer.fallback_count(Stage::Characters), 0);
    assert_eq!(observer.fallback_count(Stage::Lore), 0);
}

#[tokio::test]
async fn test_unparseable_extraction_falls_back() {
    let generator = Arc::new(MockGenerator::new_success("I could not find anyone."));
    let (context, observer) = context_for(&generator);

    let characters = CharacterExtractor::new(context).extract("Sarah woke.").await;

    assert_eq!(characters[0].name(), "Sarah");
    assert_eq!(observer.fallback_count(Stage::Characters), 1);
}
