//! Chapter stores for Scrivener.
//!
//! Two [`ChapterStore`](scrivener_interface::ChapterStore) implementations share
//! one set of table semantics:
//!
//! - [`InMemoryChapterStore`]: process-local, for tests and `--offline` runs
//! - [`FileChapterStore`]: a single JSON document, rewritten atomically
//!   (temp file + rename) on every mutation
//!
//! # Example
//!
//! ```
//! use scrivener_core::NewChapter;
//! use scrivener_interface::ChapterStore;
//! use scrivener_storage::InMemoryChapterStore;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = InMemoryChapterStore::new();
//! let chapter = NewChapter::new("A storm reaches the valley", "fantasy", "Rain fell.", 1, None);
//!
//! let id = store.append_chapter(&chapter).await?;
//! let latest = store.latest_chapter().await?.expect("one chapter stored");
//! assert_eq!(*latest.id(), id);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod file;
mod memory;
mod tables;

pub use file::FileChapterStore;
pub use memory::InMemoryChapterStore;
pub use tables::StoreTables;
