//! Postal registry loader (GeoNames-style tab-delimited dump).

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{LoadError, RecordSource};
use crate::entity::{Entity, PostalRecord};
use crate::normalize::{PlaceNormalizer, Verbatim};

/// Column positions within each tab-delimited row (zero-based).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostalLayout {
    pub postal_code_column: usize,
    pub place_column: usize,
    pub latitude_column: usize,
    pub longitude_column: usize,
}

impl Default for PostalLayout {
    fn default() -> Self {
        Self {
            postal_code_column: 1,
            place_column: 2,
            latitude_column: 9,
            longitude_column: 10,
        }
    }
}

/// Reads [`PostalRecord`]s from a tab-delimited file.
///
/// The format has no header row and no quoting; every row must have the same
/// number of columns.
pub struct PostalTsvLoader {
    path: PathBuf,
    layout: PostalLayout,
    normalizer: Box<dyn PlaceNormalizer>,
}

impl PostalTsvLoader {
    /// Loader with the default layout. Place names are taken verbatim.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            layout: PostalLayout::default(),
            normalizer: Box::new(Verbatim),
        }
    }

    pub fn with_layout(mut self, layout: PostalLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_normalizer(mut self, normalizer: Box<dyn PlaceNormalizer>) -> Self {
        self.normalizer = normalizer;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read records from any byte stream in the loader's format.
    pub fn read_from<R: Read>(&self, reader: R) -> Result<Vec<PostalRecord>, LoadError> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .quoting(false)
            .flexible(false)
            .from_reader(reader);

        let mut records = Vec::new();
        let mut next_line = 1;
        for result in reader.byte_records() {
            let record = result?;

            // The reader drops blank lines; a gap in line numbers is an empty row.
            let line = record.position().map_or(next_line, |p| p.line());
            if line != next_line {
                return Err(LoadError::MissingColumn {
                    row: next_line as usize,
                    column: self.layout.postal_code_column,
                });
            }
            next_line = line + 1;
            let row = line as usize;

            let postal_code = field(&record, row, self.layout.postal_code_column)?;
            let place = field(&record, row, self.layout.place_column)?;
            let latitude = field(&record, row, self.layout.latitude_column)?;
            let longitude = field(&record, row, self.layout.longitude_column)?;

            records.push(PostalRecord::new(
                self.normalizer.normalize(place),
                postal_code,
                latitude,
                longitude,
            ));
        }

        tracing::debug!("Read {} {} rows", records.len(), PostalRecord::NAME);
        Ok(records)
    }
}

fn field(record: &csv::ByteRecord, row: usize, column: usize) -> Result<&str, LoadError> {
    let bytes = record
        .get(column)
        .ok_or(LoadError::MissingColumn { row, column })?;
    std::str::from_utf8(bytes).map_err(|source| LoadError::Decode { row, column, source })
}

impl RecordSource for PostalTsvLoader {
    type Record = PostalRecord;

    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> Result<Vec<PostalRecord>, LoadError> {
        if !self.path.exists() {
            return Err(LoadError::FileNotFound(self.path.display().to_string()));
        }

        let file = File::open(&self.path)?;
        self.read_from(file)
    }
}
