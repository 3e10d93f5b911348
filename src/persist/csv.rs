//! Comma-separated pick table with an `UWI,PICK,MD` header.
//!
//! Undefined depths are written as an empty field. Top names are written and
//! read verbatim; quoting of commas, quotes and line breaks is left to the
//! `csv` crate.

use std::{
    fs::File,
    io::Write,
    path::{Path, PathBuf},
};

use crate::{
    pick::{PICK_COLUMNS, PickRow},
    types::Uwi,
};

use super::{PersistError, PersistResult, PickSink};

/// CSV file sink.
pub struct CsvPickFile {
    path: PathBuf,
}

impl CsvPickFile {
    /// Sink writing to `path`.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl PickSink for CsvPickFile {
    fn save(&mut self, rows: &[PickRow]) -> PersistResult<()> {
        let file = File::create(&self.path)?;
        write_rows(file, rows)
    }

    fn load(&mut self) -> PersistResult<Vec<PickRow>> {
        let file = File::open(&self.path)?;
        read_rows(file)
    }

    fn describe(&self) -> String {
        format!("csv:{}", self.path.display())
    }
}

/// Renders rows as CSV text.
pub fn encode(rows: &[PickRow]) -> PersistResult<String> {
    let mut buf = Vec::new();
    write_rows(&mut buf, rows)?;
    String::from_utf8(buf).map_err(|e| PersistError::Message(format!("csv output: {e}")))
}

/// Parses CSV text. Columns are located by header name (`PICK` or
/// `top_name`), so extra or reordered columns are tolerated.
pub fn decode(text: &str) -> PersistResult<Vec<PickRow>> {
    read_rows(text.as_bytes())
}

fn write_rows<W: Write>(out: W, rows: &[PickRow]) -> PersistResult<()> {
    let mut writer = ::csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(::csv::Terminator::Any(b'\n'))
        .from_writer(out);
    writer.write_record(PICK_COLUMNS)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

fn read_rows<R: std::io::Read>(input: R) -> PersistResult<Vec<PickRow>> {
    let mut reader = ::csv::ReaderBuilder::new()
        .flexible(true)
        .trim(::csv::Trim::None)
        .from_reader(input);

    let header = reader.headers()?.clone();
    if header.iter().all(|h| h.trim().is_empty()) {
        return Ok(Vec::new());
    }
    let col = |names: &[&str]| {
        header
            .iter()
            .position(|h| names.iter().any(|n| h.trim().eq_ignore_ascii_case(n)))
            .ok_or_else(|| PersistError::Format {
                line: 1,
                message: format!("missing column {}", names[0]),
            })
    };
    let uwi_col = col(&["UWI"])?;
    let pick_col = col(&["PICK", "top_name"])?;
    let md_col = col(&["MD"])?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let line = record.position().map_or(0, |p| p.line() as usize);
        let field = |i: usize| record.get(i).unwrap_or("");
        rows.push(PickRow {
            uwi: Uwi::new(field(uwi_col)),
            pick: field(pick_col).to_string(),
            md: parse_depth(field(md_col), line)?,
        });
    }
    Ok(rows)
}

fn parse_depth(raw: &str, line: usize) -> PersistResult<Option<f64>> {
    let raw = raw.trim();
    if raw.is_empty() || raw.eq_ignore_ascii_case("nan") || raw.eq_ignore_ascii_case("null") {
        return Ok(None);
    }
    raw.parse::<f64>()
        .map(|d| d.is_finite().then_some(d))
        .map_err(|e| PersistError::Format {
            line,
            message: format!("bad MD {raw:?}: {e}"),
        })
}
