//! Verse, search and reading-data types

use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Separator used in verse ids. Book names never contain it.
pub const VERSE_ID_SEPARATOR: char = '|';

#[derive(Debug, Clone, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerseRef {
    pub book: String,
    pub chapter: u32,
    pub verse: u32,
}

impl VerseRef {
    pub fn new(book: impl Into<String>, chapter: u32, verse: u32) -> Self {
        Self { book: book.into(), chapter, verse }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verse {
    pub id: String,
    #[serde(rename = "ref")]
    pub verse_ref: VerseRef,
    pub text: String,
}

impl Verse {
    /// Builds a verse whose id is derived from its reference.
    pub fn new(book: impl Into<String>, chapter: u32, verse: u32, text: impl Into<String>) -> Self {
        let verse_ref = VerseRef::new(book, chapter, verse);
        Self {
            id: Self::make_id(&verse_ref.book, chapter, verse),
            verse_ref,
            text: text.into(),
        }
    }

    /// `book|chapter|verse`, the key bookmarks and highlights join on.
    pub fn make_id(book: &str, chapter: u32, verse: u32) -> String {
        format!("{book}{VERSE_ID_SEPARATOR}{chapter}{VERSE_ID_SEPARATOR}{verse}")
    }
}

/// Half-open range over a verse text, in UTF-16 code units.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MatchRange {
    pub start: usize,
    pub end: usize,
}

impl MatchRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Maps this range onto UTF-8 byte offsets of `text`.
    ///
    /// Returns `None` when either bound falls outside the text or inside a
    /// surrogate pair.
    pub fn byte_range(&self, text: &str) -> Option<Range<usize>> {
        let mut start = None;
        let mut end = None;
        let mut units = 0usize;

        for (byte_idx, ch) in text.char_indices() {
            if units == self.start {
                start = Some(byte_idx);
            }
            if units == self.end {
                end = Some(byte_idx);
            }
            units += ch.len_utf16();
        }
        if units == self.start {
            start = Some(text.len());
        }
        if units == self.end {
            end = Some(text.len());
        }

        Some(start?..end?)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub verse: Verse,
    pub match_ranges: Vec<MatchRange>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bookmark {
    pub verse_id: String,
    pub created_at_epoch_ms: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Highlight {
    pub verse_id: String,
    pub color_argb: i32,
    pub created_at_epoch_ms: i64,
}
