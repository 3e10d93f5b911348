//! SQLite-backed pick table.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use rusqlite::{Connection, OptionalExtension, params};

use crate::{pick::PickRow, types::Uwi};

use super::{PersistResult, PickSink};

/// SQLite implementation of [`crate::persist::PickSink`].
pub struct SqlitePickSink {
    conn: Connection,
    path: Option<PathBuf>,
}

impl SqlitePickSink {
    /// Opens or creates a database at `path`.
    ///
    /// Enables WAL mode and sets `synchronous=NORMAL`.
    pub fn open(path: impl AsRef<Path>) -> PersistResult<Self> {
        let conn = Connection::open(path.as_ref())?;
        Self::init_connection(conn, Some(path.as_ref().to_path_buf()))
    }

    /// Opens an in-memory database.
    pub fn open_in_memory() -> PersistResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_connection(conn, None)
    }

    fn init_connection(conn: Connection, path: Option<PathBuf>) -> PersistResult<Self> {
        conn.execute_batch(include_str!("schema.sql"))?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        Ok(Self { conn, path })
    }

    /// Number of completed saves recorded in this database.
    pub fn save_count(&self) -> PersistResult<usize> {
        let n: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM saves", [], |row| row.get(0))?;
        Ok(n as usize)
    }

    /// Timestamp of the last completed save, in milliseconds.
    pub fn last_saved_ms(&self) -> PersistResult<Option<u64>> {
        let ts: Option<i64> = self
            .conn
            .query_row(
                "SELECT ts_ms FROM saves ORDER BY id DESC LIMIT 1",
                [],
                |row| row.get(0),
            )
            .optional()?;
        Ok(ts.map(|v| v as u64))
    }
}

impl PickSink for SqlitePickSink {
    fn save(&mut self, rows: &[PickRow]) -> PersistResult<()> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM picks", [])?;
        {
            // INSERT OR REPLACE keeps the last row for a repeated (uwi, pick).
            let mut stmt =
                tx.prepare("INSERT OR REPLACE INTO picks(uwi, pick, md) VALUES (?1, ?2, ?3)")?;
            for row in rows {
                stmt.execute(params![row.uwi.as_str(), row.pick, row.md])?;
            }
        }
        tx.execute(
            "INSERT INTO saves(ts_ms, row_count) VALUES (?1, ?2)",
            params![now_ms() as i64, rows.len() as i64],
        )?;
        tx.commit()?;
        Ok(())
    }

    fn load(&mut self) -> PersistResult<Vec<PickRow>> {
        let mut stmt = self
            .conn
            .prepare("SELECT uwi, pick, md FROM picks ORDER BY uwi ASC, md ASC NULLS LAST, pick ASC")?;
        let rows = stmt.query_map([], |row| {
            let uwi: String = row.get(0)?;
            Ok(PickRow {
                uwi: Uwi::new(uwi),
                pick: row.get(1)?,
                md: row.get(2)?,
            })
        })?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    fn describe(&self) -> String {
        match &self.path {
            Some(p) => format!("sqlite:{}", p.display()),
            None => "sqlite::memory:".to_string(),
        }
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_depth_survives_the_table() {
        let mut sink = SqlitePickSink::open_in_memory().unwrap();
        let rows = vec![
            PickRow {
                uwi: Uwi::new("A-1"),
                pick: "Top_X".to_string(),
                md: None,
            },
            PickRow {
                uwi: Uwi::new("A-1"),
                pick: "Top_Y".to_string(),
                md: Some(0.0),
            },
        ];
        sink.save(&rows).unwrap();
        let loaded = sink.load().unwrap();
        assert_eq!(loaded[0].md, Some(0.0));
        assert_eq!(loaded[1].md, None);
        assert_eq!(sink.save_count().unwrap(), 1);
    }
}
