//! ScriptureFlow - offline scripture reader
//!
//! Backend library providing verse loading, navigation, search and reading data.

// Model types must be defined first as they're used everywhere else
pub mod model;
pub mod normalize;
pub mod search;
pub mod index;
pub mod cache;
pub mod assets;
pub mod corpus;
pub mod store;
pub mod prefs;
pub mod daily;
pub mod config;
pub mod error;
pub mod state;

pub use error::ScriptureError;
pub use state::AppState;
pub use model::{Bookmark, Highlight, MatchRange, SearchResult, Verse, VerseRef};
pub use normalize::{lowercase_for_search, query_tokens};
pub use search::{merge_ranges, SearchEngine, DEFAULT_SEARCH_LIMIT};
pub use index::VerseCorpusIndex;
pub use cache::{SearchCache, SearchKey};
pub use assets::{parse_bible_json, verify_file_hash, AssetFile, BibleAsset, VerseSource};
pub use corpus::{Corpus, CorpusCache};
pub use store::UserStore;
pub use prefs::{FontStyle, ReadingPreferences, TextAlignment, ThemeMode};
pub use daily::verse_of_the_day_index;
pub use config::{get_data_dir, AppConfig};
