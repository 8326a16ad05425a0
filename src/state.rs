//! Application state management
//!
//! `AppState` is what the mobile shell holds: it owns the corpus cache, the
//! search engine and the user store, and loads the bible asset on first use.

use crate::assets::{AssetFile, VerseSource};
use crate::cache::{SearchCache, SearchKey};
use crate::config::AppConfig;
use crate::corpus::{Corpus, CorpusCache};
use crate::daily::verse_of_the_day_index;
use crate::error::ScriptureError;
use crate::model::{Bookmark, Highlight, SearchResult, Verse, VerseRef};
use crate::normalize::query_tokens;
use crate::prefs::{FontStyle, ReadingPreferences, TextAlignment, ThemeMode};
use crate::search::SearchEngine;
use crate::store::UserStore;
use chrono::NaiveDate;
use std::sync::Arc;

pub struct AppState {
    pub config: AppConfig,
    pub search_engine: SearchEngine,
    pub search_cache: Arc<SearchCache>,
    pub user_store: Arc<UserStore>,
    corpus: Arc<CorpusCache>,
    source: Arc<dyn VerseSource>,
}

impl AppState {
    /// Initialize application state from the files under `config.data_dir`.
    ///
    /// The asset is not read here; the first corpus access loads it.
    pub fn new(config: AppConfig) -> Result<Self, ScriptureError> {
        let mut asset = AssetFile::new(&config.asset_path);
        asset.expected_sha256 = config.asset_sha256.clone();
        let user_store = UserStore::open(&config.settings_db_path)?;

        Ok(Self::with_parts(
            config,
            Arc::new(asset),
            Arc::new(CorpusCache::new()),
            Arc::new(user_store),
        ))
    }

    pub fn with_parts(
        config: AppConfig,
        source: Arc<dyn VerseSource>,
        corpus: Arc<CorpusCache>,
        user_store: Arc<UserStore>,
    ) -> Self {
        let search_cache = Arc::new(SearchCache::new(config.search_cache_capacity));
        Self {
            config,
            search_engine: SearchEngine::new(),
            search_cache,
            user_store,
            corpus,
            source,
        }
    }

    /// The cached corpus, loading it on first call.
    pub fn ensure_loaded(&self) -> Result<Arc<Corpus>, ScriptureError> {
        self.corpus.get_or_load(|| self.source.load_verses())
    }

    /// Re-reads the source and swaps in a fresh corpus.
    ///
    /// Snapshots handed out earlier stay valid. On failure the current
    /// corpus is kept.
    pub fn reload(&self) -> Result<Arc<Corpus>, ScriptureError> {
        let verses = self
            .source
            .load_verses()
            .map_err(|e| ScriptureError::AssetLoad(format!("{e:#}")))?;
        let corpus = self.corpus.replace(verses)?;
        self.search_cache.clear();
        Ok(corpus)
    }

    // ============ Search ============

    /// Searches the corpus; `limit` defaults to `config.default_search_limit`.
    pub fn search(
        &self,
        query: &str,
        limit: Option<usize>,
    ) -> Result<Arc<Vec<SearchResult>>, ScriptureError> {
        let limit = limit.unwrap_or(self.config.default_search_limit);
        let tokens = query_tokens(query);
        if tokens.is_empty() || limit == 0 {
            return Ok(Arc::new(Vec::new()));
        }

        let corpus = self.ensure_loaded()?;
        let key = SearchKey::new(corpus.generation, tokens, limit);
        if let Some(results) = self.search_cache.get(&key) {
            tracing::debug!(tokens = key.tokens.len(), "search cache hit");
            return Ok(results);
        }

        let results = Arc::new(
            self.search_engine
                .search_tokens(&corpus.verses, &key.tokens, limit),
        );
        tracing::debug!(
            tokens = key.tokens.len(),
            results = results.len(),
            "search completed"
        );
        self.search_cache.put(key, Arc::clone(&results));
        Ok(results)
    }

    /// Runs [`AppState::search`] on the blocking thread pool.
    pub async fn search_async(
        self: Arc<Self>,
        query: String,
        limit: Option<usize>,
    ) -> Result<Arc<Vec<SearchResult>>, ScriptureError> {
        tokio::task::spawn_blocking(move || self.search(&query, limit))
            .await
            .map_err(|e| ScriptureError::Task(format!("Task join error: {}", e)))?
    }

    /// `(entries, capacity)`
    pub fn search_cache_stats(&self) -> (usize, usize) {
        self.search_cache.stats()
    }

    pub fn clear_search_cache(&self) {
        self.search_cache.clear();
    }

    // ============ Navigation ============

    pub fn books(&self) -> Result<Vec<String>, ScriptureError> {
        Ok(self.ensure_loaded()?.index.books().to_vec())
    }

    pub fn chapters(&self, book: &str) -> Result<Vec<u32>, ScriptureError> {
        Ok(self.ensure_loaded()?.index.chapters(book).to_vec())
    }

    /// Verses of a chapter in verse order; empty for unknown chapters.
    pub fn verses(&self, book: &str, chapter: u32) -> Result<Vec<Verse>, ScriptureError> {
        let corpus = self.ensure_loaded()?;
        Ok(corpus
            .index
            .verses_in_chapter(book, chapter)
            .into_iter()
            .cloned()
            .collect())
    }

    pub fn first_verse_ref(
        &self,
        book: &str,
        chapter: u32,
    ) -> Result<Option<VerseRef>, ScriptureError> {
        let corpus = self.ensure_loaded()?;
        Ok(corpus
            .index
            .verses_in_chapter(book, chapter)
            .into_iter()
            .min_by_key(|v| v.verse_ref.verse)
            .map(|v| v.verse_ref.clone()))
    }

    pub fn verse_by_id(&self, verse_id: &str) -> Result<Option<Verse>, ScriptureError> {
        Ok(self.ensure_loaded()?.index.verse(verse_id).cloned())
    }

    pub fn verse_of_the_day(&self, date: NaiveDate) -> Result<Verse, ScriptureError> {
        let corpus = self.ensure_loaded()?;
        let idx = verse_of_the_day_index(date, corpus.verses.len())
            .ok_or(ScriptureError::EmptyCorpus)?;
        Ok(corpus.verses[idx].clone())
    }

    /// Verse of the day for the device's local calendar date.
    pub fn verse_of_the_day_today(&self) -> Result<Verse, ScriptureError> {
        self.verse_of_the_day(chrono::Local::now().date_naive())
    }

    // ============ User data ============

    pub fn add_bookmark(&self, verse_id: &str) -> Result<(), ScriptureError> {
        self.user_store.add_bookmark(verse_id, now_epoch_ms())
    }

    pub fn remove_bookmark(&self, verse_id: &str) -> Result<(), ScriptureError> {
        self.user_store.remove_bookmark(verse_id)
    }

    pub fn get_bookmark(&self, verse_id: &str) -> Result<Option<Bookmark>, ScriptureError> {
        self.user_store.get_bookmark(verse_id)
    }

    pub fn is_bookmarked(&self, verse_id: &str) -> Result<bool, ScriptureError> {
        self.user_store.is_bookmarked(verse_id)
    }

    pub fn bookmarks(&self) -> Result<Vec<Bookmark>, ScriptureError> {
        self.user_store.list_bookmarks()
    }

    pub fn set_highlight(&self, verse_id: &str, color_argb: i32) -> Result<(), ScriptureError> {
        self.user_store.set_highlight(verse_id, color_argb, now_epoch_ms())
    }

    pub fn clear_highlight(&self, verse_id: &str) -> Result<(), ScriptureError> {
        self.user_store.clear_highlight(verse_id)
    }

    pub fn get_highlight(&self, verse_id: &str) -> Result<Option<Highlight>, ScriptureError> {
        self.user_store.get_highlight(verse_id)
    }

    pub fn is_highlighted(&self, verse_id: &str) -> Result<bool, ScriptureError> {
        self.user_store.is_highlighted(verse_id)
    }

    pub fn highlights(&self) -> Result<Vec<Highlight>, ScriptureError> {
        self.user_store.list_highlights()
    }

    // ============ Reading preferences ============

    pub fn reading_preferences(&self) -> Result<ReadingPreferences, ScriptureError> {
        self.user_store.reading_preferences()
    }

    pub fn update_font_size_sp(&self, value: f32) -> Result<(), ScriptureError> {
        self.user_store.update_font_size_sp(value)
    }

    pub fn update_line_height_multiplier(&self, value: f32) -> Result<(), ScriptureError> {
        self.user_store.update_line_height_multiplier(value)
    }

    pub fn update_font_style(&self, value: FontStyle) -> Result<(), ScriptureError> {
        self.user_store.update_font_style(value)
    }

    pub fn update_theme_mode(&self, value: ThemeMode) -> Result<(), ScriptureError> {
        self.user_store.update_theme_mode(value)
    }

    pub fn update_text_alignment(&self, value: TextAlignment) -> Result<(), ScriptureError> {
        self.user_store.update_text_alignment(value)
    }

    pub fn reset_reading_preferences(&self) -> Result<(), ScriptureError> {
        self.user_store.reset_reading_preferences()
    }
}

fn now_epoch_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
