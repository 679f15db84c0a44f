//! Administrative registry loader (spreadsheet workbook).

use std::path::{Path, PathBuf};

use calamine::{open_workbook_auto, Data, Range, Reader};
use serde::{Deserialize, Serialize};

use super::{LoadError, RecordSource};
use crate::entity::{AdministrativeRecord, Entity};
use crate::normalize::{CapitalDistricts, PlaceNormalizer};

/// Where the data lives inside the workbook.
///
/// Row and column indices are zero-based and absolute within the sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminLayout {
    /// Name of the data sheet
    pub sheet: String,
    /// Number of leading heading rows to skip
    pub header_rows: usize,
    /// Column holding the place name
    pub place_column: usize,
    /// Column holding the statistical code
    pub code_column: usize,
}

impl Default for AdminLayout {
    fn default() -> Self {
        Self {
            sheet: "Minden helység adata".to_string(),
            header_rows: 3,
            place_column: 0,
            code_column: 1,
        }
    }
}

/// Reads [`AdministrativeRecord`]s from a workbook (`.xls`, `.xlsx`, `.ods`).
pub struct AdminSheetLoader {
    path: PathBuf,
    layout: AdminLayout,
    normalizer: Box<dyn PlaceNormalizer>,
}

impl AdminSheetLoader {
    /// Loader with the default layout and the capital district rule.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            layout: AdminLayout::default(),
            normalizer: Box::new(CapitalDistricts::default()),
        }
    }

    pub fn with_layout(mut self, layout: AdminLayout) -> Self {
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

    /// Extract records from an already loaded sheet.
    ///
    /// Heading rows are skipped, as are rows whose place cell is empty.
    pub fn records_from_range(
        &self,
        range: &Range<Data>,
    ) -> Result<Vec<AdministrativeRecord>, LoadError> {
        let (Some(start), Some(end)) = (range.start(), range.end()) else {
            return Ok(Vec::new());
        };

        let first_row = (start.0 as usize).max(self.layout.header_rows);
        let mut records = Vec::new();

        for row in first_row..=end.0 as usize {
            let place = self.cell_text(range, row, self.layout.place_column)?;
            if place.is_empty() {
                continue;
            }
            let code = self.cell_text(range, row, self.layout.code_column)?;

            records.push(AdministrativeRecord::new(
                self.normalizer.normalize(&place),
                code,
            ));
        }

        tracing::debug!(
            "Read {} {} rows from sheet '{}'",
            records.len(),
            AdministrativeRecord::NAME,
            self.layout.sheet
        );
        Ok(records)
    }

    fn cell_text(&self, range: &Range<Data>, row: usize, column: usize) -> Result<String, LoadError> {
        let position = (row as u32, column as u32);
        let cell = range.get_value(position).ok_or(LoadError::MissingColumn {
            row: row + 1,
            column,
        })?;

        match cell {
            Data::Empty => Ok(String::new()),
            Data::String(s) => Ok(s.clone()),
            Data::Error(e) => Err(LoadError::CellError {
                row: row + 1,
                column,
                value: e.to_string(),
            }),
            // Numeric cells print without a trailing ".0"
            other => Ok(other.to_string()),
        }
    }
}

impl RecordSource for AdminSheetLoader {
    type Record = AdministrativeRecord;

    fn describe(&self) -> String {
        format!("{} (sheet '{}')", self.path.display(), self.layout.sheet)
    }

    fn load(&self) -> Result<Vec<AdministrativeRecord>, LoadError> {
        if !self.path.exists() {
            return Err(LoadError::FileNotFound(self.path.display().to_string()));
        }

        let mut workbook = open_workbook_auto(&self.path)?;

        let sheet_names = workbook.sheet_names();
        if !sheet_names.iter().any(|name| name == &self.layout.sheet) {
            return Err(LoadError::SheetNotFound {
                sheet: self.layout.sheet.clone(),
                available: sheet_names.join(", "),
            });
        }

        let range = workbook.worksheet_range(&self.layout.sheet)?;
        self.records_from_range(&range)
    }
}
