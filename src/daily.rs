//! Verse of the day
//!
//! The pick depends only on the calendar date and the corpus size, so every
//! device with the same corpus shows the same verse on the same day.

use chrono::{Datelike, NaiveDate};

/// Index into a corpus of `len` verses for `date`; `None` when empty.
pub fn verse_of_the_day_index(date: NaiveDate, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    // Month and day are not zero-padded
    let seed = format!("{}-{}-{}|{}", date.year(), date.month(), date.day(), len);
    let hash = string_hash(&seed).unsigned_abs() as usize;
    Some(hash % len)
}

/// 32-bit polynomial hash over UTF-16 units: `s[0]*31^(n-1) + ... + s[n-1]`.
fn string_hash(s: &str) -> i32 {
    s.encode_utf16()
        .fold(0i32, |h, unit| h.wrapping_mul(31).wrapping_add(i32::from(unit)))
}
