pub mod csv;
pub mod json;
pub mod sqlite;

use std::path::Path;

use tracing::info;

use crate::{core::store::StoreError, pick::PickRow, protocol::editor::SaveJob};

#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("csv error: {0}")]
    Csv(#[from] ::csv::Error),
    #[error("json error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("line {line}: {message}")]
    Format { line: usize, message: String },
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("{0}")]
    Message(String),
}

pub type PersistResult<T> = Result<T, PersistError>;

/// Destination for the full pick table. Every `save` replaces what was there.
pub trait PickSink: Send {
    fn save(&mut self, rows: &[PickRow]) -> PersistResult<()>;
    fn load(&mut self) -> PersistResult<Vec<PickRow>>;
    fn describe(&self) -> String;
}

/// On-disk encodings of the `[UWI, PICK, MD]` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickFormat {
    Csv,
    Json,
    Sqlite,
}

impl PickFormat {
    /// Chosen by extension; anything unrecognised is CSV.
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("json") => Self::Json,
            Some("db" | "sqlite" | "sqlite3") => Self::Sqlite,
            _ => Self::Csv,
        }
    }
}

pub fn open_sink(path: impl AsRef<Path>) -> PersistResult<Box<dyn PickSink>> {
    let path = path.as_ref();
    let sink: Box<dyn PickSink> = match PickFormat::from_path(path) {
        PickFormat::Csv => Box::new(csv::CsvPickFile::new(path)),
        PickFormat::Json => Box::new(json::JsonPickFile::new(path)),
        PickFormat::Sqlite => Box::new(sqlite::SqlitePickSink::open(path)?),
    };
    Ok(sink)
}

pub fn save_rows(path: impl AsRef<Path>, rows: &[PickRow]) -> PersistResult<()> {
    let mut sink = open_sink(path)?;
    sink.save(rows)?;
    info!(dest = %sink.describe(), rows = rows.len(), "picks saved");
    Ok(())
}

pub fn load_rows(path: impl AsRef<Path>) -> PersistResult<Vec<PickRow>> {
    let mut sink = open_sink(path)?;
    let rows = sink.load()?;
    info!(source = %sink.describe(), rows = rows.len(), "picks loaded");
    Ok(rows)
}

impl SaveJob {
    /// Writes the job synchronously.
    pub fn write(&self) -> PersistResult<()> {
        save_rows(&self.path, &self.rows)
    }
}
