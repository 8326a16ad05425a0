//! Navigation lookups derived from a verse list
//!
//! Built in one pass and never updated; a new verse list means a new index.

use crate::model::Verse;
use std::collections::{BTreeSet, HashMap};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerseCorpusIndex {
    books: Vec<String>,
    chapters_by_book: HashMap<String, Vec<u32>>,
    verse_ids_by_book_chapter: HashMap<(String, u32), Vec<String>>,
    verse_by_id: HashMap<String, Verse>,
}

impl VerseCorpusIndex {
    /// Builds every lookup table from `verses`.
    ///
    /// Ids are expected to be unique; on duplicates the last verse wins in
    /// id lookups.
    pub fn build(verses: &[Verse]) -> Self {
        let mut books: BTreeSet<String> = BTreeSet::new();
        let mut chapters: HashMap<String, BTreeSet<u32>> = HashMap::new();
        let mut grouped: HashMap<(String, u32), Vec<(u32, String)>> = HashMap::new();
        let mut verse_by_id = HashMap::with_capacity(verses.len());

        for verse in verses {
            let r = &verse.verse_ref;
            books.insert(r.book.clone());
            chapters.entry(r.book.clone()).or_default().insert(r.chapter);
            grouped
                .entry((r.book.clone(), r.chapter))
                .or_default()
                .push((r.verse, verse.id.clone()));
            verse_by_id.insert(verse.id.clone(), verse.clone());
        }

        let chapters_by_book = chapters
            .into_iter()
            .map(|(book, set)| (book, set.into_iter().collect()))
            .collect();

        let verse_ids_by_book_chapter = grouped
            .into_iter()
            .map(|(key, mut ids)| {
                // stable, so equal verse numbers keep corpus order
                ids.sort_by_key(|(verse, _)| *verse);
                (key, ids.into_iter().map(|(_, id)| id).collect())
            })
            .collect();

        Self {
            books: books.into_iter().collect(),
            chapters_by_book,
            verse_ids_by_book_chapter,
            verse_by_id,
        }
    }

    /// Distinct book names, sorted.
    pub fn books(&self) -> &[String] {
        &self.books
    }

    /// Chapter numbers of `book` in ascending order; empty for unknown books.
    pub fn chapters(&self, book: &str) -> &[u32] {
        self.chapters_by_book
            .get(book)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Verse ids of a chapter in ascending verse order; empty if unknown.
    pub fn verse_ids(&self, book: &str, chapter: u32) -> &[String] {
        self.verse_ids_by_book_chapter
            .get(&(book.to_string(), chapter))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn verse(&self, id: &str) -> Option<&Verse> {
        self.verse_by_id.get(id)
    }

    /// Verses of a chapter resolved through the id map.
    pub fn verses_in_chapter(&self, book: &str, chapter: u32) -> Vec<&Verse> {
        self.verse_ids(book, chapter)
            .iter()
            .filter_map(|id| self.verse(id))
            .collect()
    }

    pub fn verse_count(&self) -> usize {
        self.verse_by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.verse_by_id.is_empty()
    }
}
