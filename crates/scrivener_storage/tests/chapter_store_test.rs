//! Behaviour shared by every chapter store, plus file-store durability.

use scrivener_core::{
    ChapterCommit, ChapterId, CharacterRecord, LoreRecord, NewChapter, StyleGuide,
};
use scrivener_error::{ScrivenerErrorKind, StorageErrorKind};
use scrivener_interface::{ChapterFilter, ChapterStore};
use scrivener_storage::{FileChapterStore, InMemoryChapterStore};
use tempfile::TempDir;

fn chapter(genre: &str, number: u32, previous: Option<ChapterId>) -> NewChapter {
    NewChapter::new(
        "Sarah discovers her powers",
        genre,
        "Sarah woke to light pouring through the curtains.",
        number,
        previous,
    )
}

async fn exercise_thread(store: &dyn ChapterStore) -> anyhow::Result<()> {
    let first = store.append_chapter(&chapter("fantasy", 1, None)).await?;
    let second = store
        .append_chapter(&chapter("fantasy", 2, Some(first)))
        .await?;
    let other = store.append_chapter(&chapter("noir", 1, None)).await?;

    assert!(first < second && second < other);

    let stored = store.chapter(second).await?.expect("second chapter stored");
    assert_eq!(*stored.chapter_number(), 2);
    assert_eq!(*stored.previous_chapter_id(), Some(first));

    let latest = store.latest_chapter().await?.expect("latest exists");
    assert_eq!(*latest.id(), other);

    let fantasy = store
        .list_chapters(&ChapterFilter::new().with_genre("FANTASY"))
        .await?;
    assert_eq!(fantasy.len(), 2);

    assert!(store.chapter(ChapterId::new(999)).await?.is_none());
    Ok(())
}

async fn exercise_dangling_reference(store: &dyn ChapterStore) -> anyhow::Result<()> {
    let err = store
        .append_chapter(&chapter("fantasy", 2, Some(ChapterId::new(42))))
        .await
        .unwrap_err();
    match err.kind() {
        ScrivenerErrorKind::Storage(e) => {
            assert_eq!(e.kind, StorageErrorKind::DanglingReference(42))
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(store.latest_chapter().await?.is_none());
    Ok(())
}

async fn exercise_metadata(store: &dyn ChapterStore) -> anyhow::Result<()> {
    let commit = ChapterCommit::new(
        chapter("fantasy", 1, None),
        vec![
            CharacterRecord::new("Sarah", "A teenager", "", "curious", "Wakes up"),
            CharacterRecord::new("Mother", "Sarah's mother", "", "", ""),
        ],
        vec![LoreRecord::new("location", "Suburban Town", "Quiet", "", "")],
    );
    let id = store.commit(&commit).await?;
    assert!(store.chapter(id).await?.is_some());

    store
        .upsert_characters(&[CharacterRecord::new("Sarah", "A young mage", "", "", "")])
        .await?;

    let found = store.find_characters("sar").await?;
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].description(), "A young mage");

    assert_eq!(store.list_lore(Some("location")).await?.len(), 1);
    assert!(store.list_lore(Some("time")).await?.is_empty());

    assert!(store.style_guide("Fantasy").await?.is_none());
    let guide = StyleGuide::canned("fantasy");
    store.store_style_guide("Fantasy", &guide).await?;
    assert_eq!(store.style_guide(" fantasy ").await?, Some(guide));
    Ok(())
}

#[tokio::test]
async fn test_memory_store_thread() -> anyhow::Result<()> {
    exercise_thread(&InMemoryChapterStore::new()).await
}

#[tokio::test]
async fn test_memory_store_rejects_dangling_reference() -> anyhow::Result<()> {
    exercise_dangling_reference(&InMemoryChapterStore::new()).await
}

#[tokio::test]
async fn test_memory_store_metadata() -> anyhow::Result<()> {
    exercise_metadata(&InMemoryChapterStore::new()).await
}

#[tokio::test]
async fn test_file_store_thread() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let store = FileChapterStore::open(dir.path().join("chapters.json")).await?;
    exercise_thread(&store).await
}

#[tokio::test]
async fn test_file_store_rejects_dangling_reference() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let store = FileChapterStore::open(dir.path().join("chapters.json")).await?;
    exercise_dangling_reference(&store).await
}

#[tokio::test]
async fn test_file_store_metadata() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let store = FileChapterStore::open(dir.path().join("chapters.json")).await?;
    exercise_metadata(&store).await
}

#[tokio::test]
async fn test_file_store_survives_reopen() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("nested").join("chapters.json");

    let id = {
        let store = FileChapterStore::open(&path).await?;
        let commit = ChapterCommit::new(
            chapter("fantasy", 1, None),
            vec![CharacterRecord::new("Sarah", "", "", "", "")],
            vec![],
        );
        store.commit(&commit).await?
    };

    let reopened = FileChapterStore::open(&path).await?;
    let stored = reopened.chapter(id).await?.expect("chapter persisted");
    assert_eq!(stored.genre(), "fantasy");
    assert_eq!(reopened.find_characters("Sarah").await?.len(), 1);

    // Ids continue after reopen
    let next = reopened.append_chapter(&chapter("fantasy", 2, Some(id))).await?;
    assert!(next > id);

    assert!(!path.with_extension("json.tmp").exists());
    Ok(())
}

#[tokio::test]
async fn test_file_store_rejects_corrupt_document() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("chapters.json");
    std::fs::write(&path, b"{ not json")?;

    let err = FileChapterStore::open(&path).await.unwrap_err();
    assert!(matches!(
        err.kind(),
        ScrivenerErrorKind::Storage(e) if matches!(e.kind, StorageErrorKind::Serialization(_))
    ));
    Ok(())
}

#[tokio::test]
async fn test_file_store_health() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let store = FileChapterStore::open(dir.path().join("chapters.json")).await?;
    assert!(store.health().await.is_healthy());
    Ok(())
}
