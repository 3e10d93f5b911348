//! JSON array of `{"UWI", "PICK", "MD"}` objects; undefined depths are `null`.

use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

use crate::pick::PickRow;

use super::{PersistResult, PickSink};

/// JSON file sink.
pub struct JsonPickFile {
    path: PathBuf,
}

impl JsonPickFile {
    /// Sink writing to `path`.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl PickSink for JsonPickFile {
    fn save(&mut self, rows: &[PickRow]) -> PersistResult<()> {
        let mut out = BufWriter::new(File::create(&self.path)?);
        serde_json::to_writer_pretty(&mut out, rows)?;
        out.write_all(b"\n")?;
        out.flush()?;
        Ok(())
    }

    fn load(&mut self) -> PersistResult<Vec<PickRow>> {
        let rows = serde_json::from_reader(BufReader::new(File::open(&self.path)?))?;
        Ok(rows)
    }

    fn describe(&self) -> String {
        format!("json:{}", self.path.display())
    }
}
