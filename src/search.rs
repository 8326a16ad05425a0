//! Offline verse search
//!
//! Conjunctive substring search: a verse matches when every query token
//! occurs somewhere in its text, case-insensitively and without word
//! boundaries. Ranges are UTF-16 code unit offsets into the original text.

use crate::model::{MatchRange, SearchResult, Verse};
use crate::normalize::{lowercase_for_search, query_tokens};

/// Results returned when the caller does not pass a limit
pub const DEFAULT_SEARCH_LIMIT: usize = 200;

#[derive(Debug, Clone, Copy, Default)]
pub struct SearchEngine;

impl SearchEngine {
    pub fn new() -> Self {
        Self
    }

    /// Search `verses` in order, stopping once `limit` results are collected.
    pub fn search(&self, verses: &[Verse], query: &str, limit: usize) -> Vec<SearchResult> {
        let tokens = query_tokens(query);
        self.search_tokens(verses, &tokens, limit)
    }

    /// Search with tokens already produced by [`query_tokens`].
    pub(crate) fn search_tokens(
        &self,
        verses: &[Verse],
        tokens: &[String],
        limit: usize,
    ) -> Vec<SearchResult> {
        if tokens.is_empty() || limit == 0 {
            return Vec::new();
        }

        let needles: Vec<Vec<u16>> = tokens.iter().map(|t| t.encode_utf16().collect()).collect();
        let mut results = Vec::with_capacity(limit.min(64));

        for verse in verses {
            if let Some(match_ranges) = find_all_token_matches(&verse.text, &needles) {
                results.push(SearchResult {
                    verse: verse.clone(),
                    match_ranges,
                });
                if results.len() >= limit {
                    break;
                }
            }
        }

        results
    }
}

/// Merged ranges if every needle occurs in `text`, otherwise `None`.
fn find_all_token_matches(text: &str, needles: &[Vec<u16>]) -> Option<Vec<MatchRange>> {
    let lowered: Vec<u16> = lowercase_for_search(text).encode_utf16().collect();
    let mut ranges = Vec::with_capacity(needles.len() * 2);

    for needle in needles {
        let before = ranges.len();
        let mut from = 0;

        while let Some(idx) = find_from(&lowered, needle, from) {
            ranges.push(MatchRange::new(idx, idx + needle.len()));
            // Resume one unit later so overlapping occurrences are kept
            from = idx + 1;
        }

        if ranges.len() == before {
            return None;
        }
    }

    Some(merge_ranges(ranges))
}

fn find_from(haystack: &[u16], needle: &[u16], from: usize) -> Option<usize> {
    if needle.is_empty() || from > haystack.len() || needle.len() > haystack.len() - from {
        return None;
    }
    haystack[from..]
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|pos| pos + from)
}

/// Sorts ranges by `(start, end)` and coalesces overlapping or touching ones.
pub fn merge_ranges(mut ranges: Vec<MatchRange>) -> Vec<MatchRange> {
    if ranges.is_empty() {
        return ranges;
    }

    ranges.sort_unstable();
    let mut merged = Vec::with_capacity(ranges.len());
    let mut current = ranges[0];

    for range in &ranges[1..] {
        if range.start <= current.end {
            current.end = current.end.max(range.end);
        } else {
            merged.push(current);
            current = *range;
        }
    }

    merged.push(current);
    merged
}
