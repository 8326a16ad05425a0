//! Bundled Bible asset loading
//!
//! Expected layout:
//!
//! ```json
//! {
//!   "version": "kjv",
//!   "books": [
//!     {"name": "Genesis", "chapters": [{"chapter": 1, "verses": [{"verse": 1, "text": "..."}]}]}
//!   ]
//! }
//! ```

use crate::model::Verse;
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};

/// Anything able to produce the full verse list in one call.
pub trait VerseSource: Send + Sync {
    fn load_verses(&self) -> Result<Vec<Verse>>;
}

impl<F> VerseSource for F
where
    F: Fn() -> Result<Vec<Verse>> + Send + Sync,
{
    fn load_verses(&self) -> Result<Vec<Verse>> {
        self()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BibleAsset {
    pub version: String,
    pub books: Vec<BookAsset>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BookAsset {
    pub name: String,
    pub chapters: Vec<ChapterAsset>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChapterAsset {
    pub chapter: u32,
    pub verses: Vec<VerseAsset>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VerseAsset {
    pub verse: u32,
    pub text: String,
}

impl BibleAsset {
    /// Flattens books -> chapters -> verses in document order.
    pub fn into_verses(self) -> Vec<Verse> {
        let mut out = Vec::with_capacity(1024);
        for book in self.books {
            for chapter in book.chapters {
                for v in chapter.verses {
                    out.push(Verse::new(book.name.as_str(), chapter.chapter, v.verse, v.text));
                }
            }
        }
        out
    }
}

pub fn parse_bible_json(content: &str) -> Result<BibleAsset> {
    serde_json::from_str(content).context("Failed to parse bible asset JSON")
}

/// A bible JSON file on disk, optionally pinned to a SHA-256 digest.
#[derive(Debug, Clone)]
pub struct AssetFile {
    pub path: PathBuf,
    pub expected_sha256: Option<String>,
}

impl AssetFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), expected_sha256: None }
    }

    pub fn with_sha256(mut self, hash: impl Into<String>) -> Self {
        self.expected_sha256 = Some(hash.into());
        self
    }
}

impl VerseSource for AssetFile {
    fn load_verses(&self) -> Result<Vec<Verse>> {
        if let Some(expected) = &self.expected_sha256 {
            if !verify_file_hash(&self.path, expected)? {
                tracing::warn!(path = %self.path.display(), "bible asset hash mismatch");
                bail!("Hash mismatch for {:?}", self.path);
            }
        }

        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read bible asset at {:?}", self.path))?;
        let asset = parse_bible_json(&content)?;
        let version = asset.version.clone();
        let verses = asset.into_verses();

        tracing::info!(%version, verses = verses.len(), "loaded bible asset");
        Ok(verses)
    }
}

/// Verify file hash matches expected (`sha256:`-prefixed or bare hex)
pub fn verify_file_hash(path: &Path, expected_hash: &str) -> Result<bool> {
    let expected = expected_hash.strip_prefix("sha256:").unwrap_or(expected_hash);

    let mut file = fs::File::open(path)
        .with_context(|| format!("Failed to open {:?} for hashing", path))?;
    let mut hasher = Sha256::new();
    std::io::copy(&mut file, &mut hasher)?;
    let actual = hex::encode(hasher.finalize());

    Ok(actual.eq_ignore_ascii_case(expected))
}
