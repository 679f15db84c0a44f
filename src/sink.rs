//! Output adapter: joined records as comma-delimited text.
//!
//! One row per record, no header row, CRLF line endings, fields quoted only
//! when they contain a delimiter, quote or line break. Text is written as
//! UTF-8.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::entity::JoinedRecord;

/// Error type for writing the output
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
}

/// CSV writer for [`JoinedRecord`]s.
pub struct CsvSink<W: Write> {
    writer: csv::Writer<W>,
    written: usize,
}

impl<W: Write> CsvSink<W> {
    /// Create a new CSV sink
    pub fn new(writer: W) -> Self {
        let writer = csv::WriterBuilder::new()
            .has_headers(false)
            .terminator(csv::Terminator::CRLF)
            .from_writer(writer);
        Self { writer, written: 0 }
    }

    /// Write a single record as one row
    pub fn write(&mut self, record: &JoinedRecord) -> Result<(), SinkError> {
        self.writer.serialize(record)?;
        self.written += 1;
        Ok(())
    }

    /// Write multiple records, preserving their order
    pub fn write_all(&mut self, records: &[JoinedRecord]) -> Result<(), SinkError> {
        for record in records {
            self.write(record)?;
        }
        Ok(())
    }

    /// Flush the underlying writer
    pub fn flush(&mut self) -> Result<(), SinkError> {
        self.writer.flush()?;
        Ok(())
    }

    /// Number of rows written so far
    pub fn written(&self) -> usize {
        self.written
    }
}

/// Write `records` to `path`.
///
/// Rows go to a temporary sibling file that is renamed over `path` once
/// complete, so a failure never leaves a partial output file behind.
pub fn write_file(path: &Path, records: &[JoinedRecord]) -> Result<usize, SinkError> {
    let staging = staging_path(path);

    let result = write_staged(&staging, records);
    match result {
        Ok(count) => {
            fs::rename(&staging, path)?;
            tracing::debug!("Wrote {} rows to {}", count, path.display());
            Ok(count)
        }
        Err(e) => {
            let _ = fs::remove_file(&staging);
            Err(e)
        }
    }
}

fn write_staged(staging: &Path, records: &[JoinedRecord]) -> Result<usize, SinkError> {
    let file = File::create(staging)?;
    let mut sink = CsvSink::new(BufWriter::new(file));
    sink.write_all(records)?;
    sink.flush()?;
    Ok(sink.written())
}

fn staging_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    path.with_file_name(format!(".{}.partial", name))
}
