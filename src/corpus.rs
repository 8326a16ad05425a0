//! Cached verse corpus with one-shot initialization
//!
//! The verse list and its index are published together as one immutable
//! snapshot. Readers clone the `Arc` and keep a consistent view even if a
//! reload swaps in a new snapshot behind them.

use crate::error::ScriptureError;
use crate::index::VerseCorpusIndex;
use crate::model::Verse;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};

#[derive(Debug)]
pub struct Corpus {
    pub verses: Vec<Verse>,
    pub index: VerseCorpusIndex,
    /// Increases with every published snapshot
    pub generation: u64,
}

impl Corpus {
    /// Orders verses by (book, chapter, verse) and builds the index.
    pub fn build(mut verses: Vec<Verse>, generation: u64) -> Self {
        verses.sort_by(|a, b| {
            let (a, b) = (&a.verse_ref, &b.verse_ref);
            (&a.book, a.chapter, a.verse).cmp(&(&b.book, b.chapter, b.verse))
        });
        let index = VerseCorpusIndex::build(&verses);
        Self { verses, index, generation }
    }
}

#[derive(Debug, Default)]
pub struct CorpusCache {
    slot: RwLock<Option<Arc<Corpus>>>,
    build_lock: Mutex<()>,
    generations: AtomicU64,
}

impl CorpusCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The published snapshot, if any.
    pub fn current(&self) -> Result<Option<Arc<Corpus>>, ScriptureError> {
        let guard = self
            .slot
            .read()
            .map_err(|_| ScriptureError::Lock("Failed to acquire corpus read lock".to_string()))?;
        Ok(guard.clone())
    }

    /// Returns the cached corpus, running `load` at most once to create it.
    ///
    /// Concurrent first callers block on the build lock; the winner loads and
    /// publishes, the others find the snapshot on re-check. A failed load
    /// publishes nothing, so the next call retries.
    pub fn get_or_load<F>(&self, load: F) -> Result<Arc<Corpus>, ScriptureError>
    where
        F: FnOnce() -> anyhow::Result<Vec<Verse>>,
    {
        if let Some(corpus) = self.current()? {
            return Ok(corpus);
        }

        let _build = self
            .build_lock
            .lock()
            .map_err(|_| ScriptureError::Lock("Failed to acquire corpus build lock".to_string()))?;

        if let Some(corpus) = self.current()? {
            return Ok(corpus);
        }

        let verses = load().map_err(|e| ScriptureError::AssetLoad(format!("{e:#}")))?;
        self.publish(verses)
    }

    /// Swaps in a snapshot built from `verses`, replacing any existing one.
    pub fn replace(&self, verses: Vec<Verse>) -> Result<Arc<Corpus>, ScriptureError> {
        let _build = self
            .build_lock
            .lock()
            .map_err(|_| ScriptureError::Lock("Failed to acquire corpus build lock".to_string()))?;
        self.publish(verses)
    }

    /// Drops the snapshot so the next `get_or_load` builds a fresh one.
    pub fn invalidate(&self) -> Result<(), ScriptureError> {
        let mut guard = self
            .slot
            .write()
            .map_err(|_| ScriptureError::Lock("Failed to acquire corpus write lock".to_string()))?;
        *guard = None;
        Ok(())
    }

    // Callers hold the build lock.
    fn publish(&self, verses: Vec<Verse>) -> Result<Arc<Corpus>, ScriptureError> {
        let generation = self.generations.fetch_add(1, Ordering::SeqCst) + 1;
        let corpus = Arc::new(Corpus::build(verses, generation));

        tracing::info!(
            generation,
            verses = corpus.verses.len(),
            books = corpus.index.books().len(),
            "corpus published"
        );

        let mut guard = self
            .slot
            .write()
            .map_err(|_| ScriptureError::Lock("Failed to acquire corpus write lock".to_string()))?;
        *guard = Some(Arc::clone(&corpus));
        Ok(corpus)
    }
}
