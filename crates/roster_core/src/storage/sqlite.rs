//! SQLite-backed slot store.

use super::{KeyValueStore, StorageResult};
use rusqlite::{params, Connection, OptionalExtension};

/// Slot store over the `kv_slots` table.
///
/// Owns its connection; open it with [`super::open_db`] so the table exists.
pub struct SqliteKeyValueStore {
    conn: Connection,
}

impl SqliteKeyValueStore {
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    /// Borrows the underlying connection, mainly for diagnostics.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl KeyValueStore for SqliteKeyValueStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_slots WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        self.conn.execute(
            "INSERT INTO kv_slots (key, value)
             VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> StorageResult<()> {
        self.conn
            .execute("DELETE FROM kv_slots WHERE key = ?1;", [key])?;
        Ok(())
    }
}
