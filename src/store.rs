//! Bookmarks, highlights and key-value settings in SQLite
//!
//! One row per verse in each of `bookmarks` and `highlights`; writes are
//! upserts so repeating an action is harmless.

use crate::error::ScriptureError;
use crate::model::{Bookmark, Highlight};
use rusqlite::{Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS bookmarks (
        verse_id TEXT PRIMARY KEY,
        created_at_epoch_ms INTEGER NOT NULL
    );

    CREATE TABLE IF NOT EXISTS highlights (
        verse_id TEXT PRIMARY KEY,
        color_argb INTEGER NOT NULL,
        created_at_epoch_ms INTEGER NOT NULL
    );

    -- Reading preferences and other app settings
    CREATE TABLE IF NOT EXISTS app_settings (
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_bookmarks_created
    ON bookmarks(created_at_epoch_ms DESC);

    CREATE INDEX IF NOT EXISTS idx_highlights_created
    ON highlights(created_at_epoch_ms DESC);
"#;

pub struct UserStore {
    conn: Mutex<Connection>,
}

impl UserStore {
    /// Opens (creating if needed) the settings database at `path`.
    pub fn open(path: &Path) -> Result<Self, ScriptureError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ScriptureError::Database(format!("Failed to create data directory: {}", e))
            })?;
        }

        let conn = Connection::open(path)?;
        tracing::debug!(path = %path.display(), "opened user store");
        Self::init(conn)
    }

    pub fn open_in_memory() -> Result<Self, ScriptureError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, ScriptureError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn: Mutex::new(conn) })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, ScriptureError> {
        self.conn
            .lock()
            .map_err(|_| ScriptureError::Lock("Failed to acquire user store lock".to_string()))
    }

    // ============ Bookmarks ============

    pub fn add_bookmark(&self, verse_id: &str, now_epoch_ms: i64) -> Result<(), ScriptureError> {
        self.conn()?.execute(
            "INSERT OR REPLACE INTO bookmarks (verse_id, created_at_epoch_ms) VALUES (?1, ?2)",
            rusqlite::params![verse_id, now_epoch_ms],
        )?;
        Ok(())
    }

    pub fn remove_bookmark(&self, verse_id: &str) -> Result<(), ScriptureError> {
        self.conn()?
            .execute("DELETE FROM bookmarks WHERE verse_id = ?1", [verse_id])?;
        Ok(())
    }

    pub fn get_bookmark(&self, verse_id: &str) -> Result<Option<Bookmark>, ScriptureError> {
        let bookmark = self
            .conn()?
            .query_row(
                "SELECT verse_id, created_at_epoch_ms FROM bookmarks WHERE verse_id = ?1 LIMIT 1",
                [verse_id],
                row_to_bookmark,
            )
            .optional()?;
        Ok(bookmark)
    }

    pub fn is_bookmarked(&self, verse_id: &str) -> Result<bool, ScriptureError> {
        let exists: bool = self.conn()?.query_row(
            "SELECT EXISTS(SELECT 1 FROM bookmarks WHERE verse_id = ?1)",
            [verse_id],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    /// All bookmarks, newest first.
    pub fn list_bookmarks(&self) -> Result<Vec<Bookmark>, ScriptureError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT verse_id, created_at_epoch_ms FROM bookmarks ORDER BY created_at_epoch_ms DESC",
        )?;
        let bookmarks = stmt
            .query_map([], row_to_bookmark)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(bookmarks)
    }

    // ============ Highlights ============

    pub fn set_highlight(
        &self,
        verse_id: &str,
        color_argb: i32,
        now_epoch_ms: i64,
    ) -> Result<(), ScriptureError> {
        self.conn()?.execute(
            "INSERT OR REPLACE INTO highlights (verse_id, color_argb, created_at_epoch_ms)
             VALUES (?1, ?2, ?3)",
            rusqlite::params![verse_id, color_argb, now_epoch_ms],
        )?;
        Ok(())
    }

    pub fn clear_highlight(&self, verse_id: &str) -> Result<(), ScriptureError> {
        self.conn()?
            .execute("DELETE FROM highlights WHERE verse_id = ?1", [verse_id])?;
        Ok(())
    }

    pub fn get_highlight(&self, verse_id: &str) -> Result<Option<Highlight>, ScriptureError> {
        let highlight = self
            .conn()?
            .query_row(
                "SELECT verse_id, color_argb, created_at_epoch_ms FROM highlights
                 WHERE verse_id = ?1 LIMIT 1",
                [verse_id],
                row_to_highlight,
            )
            .optional()?;
        Ok(highlight)
    }

    pub fn is_highlighted(&self, verse_id: &str) -> Result<bool, ScriptureError> {
        let exists: bool = self.conn()?.query_row(
            "SELECT EXISTS(SELECT 1 FROM highlights WHERE verse_id = ?1)",
            [verse_id],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    /// All highlights, newest first.
    pub fn list_highlights(&self) -> Result<Vec<Highlight>, ScriptureError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT verse_id, color_argb, created_at_epoch_ms FROM highlights
             ORDER BY created_at_epoch_ms DESC",
        )?;
        let highlights = stmt
            .query_map([], row_to_highlight)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(highlights)
    }

    // ============ Settings ============

    pub fn get_setting(&self, key: &str) -> Result<Option<String>, ScriptureError> {
        let value = self
            .conn()?
            .query_row("SELECT value FROM app_settings WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    pub fn set_setting(&self, key: &str, value: &str) -> Result<(), ScriptureError> {
        self.conn()?.execute(
            "INSERT OR REPLACE INTO app_settings (key, value) VALUES (?1, ?2)",
            rusqlite::params![key, value],
        )?;
        Ok(())
    }
}

fn row_to_bookmark(row: &Row) -> rusqlite::Result<Bookmark> {
    Ok(Bookmark {
        verse_id: row.get(0)?,
        created_at_epoch_ms: row.get(1)?,
    })
}

fn row_to_highlight(row: &Row) -> rusqlite::Result<Highlight> {
    Ok(Highlight {
        verse_id: row.get(0)?,
        color_argb: row.get(1)?,
        created_at_epoch_ms: row.get(2)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bookmarks_upsert_and_order() {
        let store = UserStore::open_in_memory().unwrap();
        store.add_bookmark("Genesis|1|1", 100).unwrap();
        store.add_bookmark("John|3|16", 300).unwrap();
        store.add_bookmark("Genesis|1|1", 200).unwrap();

        let ids: Vec<String> = store.list_bookmarks().unwrap().into_iter().map(|b| b.verse_id).collect();
        assert_eq!(ids, ["John|3|16", "Genesis|1|1"]);
        assert_eq!(store.get_bookmark("Genesis|1|1").unwrap().unwrap().created_at_epoch_ms, 200);
    }

    #[test]
    fn test_remove_bookmark() {
        let store = UserStore::open_in_memory().unwrap();
        store.add_bookmark("Ruth|1|16", 1).unwrap();
        assert!(store.is_bookmarked("Ruth|1|16").unwrap());

        store.remove_bookmark("Ruth|1|16").unwrap();
        assert!(!store.is_bookmarked("Ruth|1|16").unwrap());
        assert!(store.get_bookmark("Ruth|1|16").unwrap().is_none());
        // removing again is fine
        store.remove_bookmark("Ruth|1|16").unwrap();
    }

    #[test]
    fn test_highlights() {
        let store = UserStore::open_in_memory().unwrap();
        let yellow = 0xFFFF_EB3Bu32 as i32;

        store.set_highlight("John|1|1", yellow, 10).unwrap();
        store.set_highlight("John|1|1", 0x7F00_FF00, 20).unwrap();
        store.set_highlight("John|1|2", yellow, 15).unwrap();

        let highlight = store.get_highlight("John|1|1").unwrap().unwrap();
        assert_eq!(highlight.color_argb, 0x7F00_FF00);
        assert_eq!(store.list_highlights().unwrap().len(), 2);
        assert_eq!(store.list_highlights().unwrap()[0].verse_id, "John|1|1");
        assert_eq!(store.get_highlight("John|1|2").unwrap().unwrap().color_argb, yellow);

        store.clear_highlight("John|1|1").unwrap();
        assert!(!store.is_highlighted("John|1|1").unwrap());
        assert!(store.is_highlighted("John|1|2").unwrap());
    }

    #[test]
    fn test_settings() {
        let store = UserStore::open_in_memory().unwrap();
        assert!(store.get_setting("theme_mode").unwrap().is_none());

        store.set_setting("theme_mode", "dark").unwrap();
        store.set_setting("theme_mode", "light").unwrap();
        assert_eq!(store.get_setting("theme_mode").unwrap().as_deref(), Some("light"));
    }

    #[test]
    fn test_open_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.db");
        {
            let store = UserStore::open(&path).unwrap();
            store.add_bookmark("Psalms|23|1", 5).unwrap();
        }
        let reopened = UserStore::open(&path).unwrap();
        assert!(reopened.is_bookmarked("Psalms|23|1").unwrap());
    }

    #[test]
    fn test_open_error_message_not_repeated() {
        let dir = tempfile::tempdir().unwrap();
        // A directory cannot hold a database
        let err = match UserStore::open(dir.path()) {
            Ok(_) => panic!("opening a directory should fail"),
            Err(e) => e,
        };
        assert!(matches!(err, ScriptureError::Database(_)));
        let msg = err.to_string();
        assert!(msg.starts_with("Database error: "));
        assert!(msg.matches("unable to open database file").count() <= 1, "{msg}");
    }
}
