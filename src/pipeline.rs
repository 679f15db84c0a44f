//! Load, merge and write in a single pass.
//!
//! Both registries are loaded completely before the output file is touched,
//! so a failing loader leaves no output behind.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::{ConfigError, PipelineConfig};
use crate::entity::{AdministrativeRecord, PostalRecord};
use crate::matcher::{self, Coverage};
use crate::normalize::{CapitalDistricts, NormalizeError, PlaceNormalizer};
use crate::sink::{self, SinkError};
use crate::source::{AdminSheetLoader, LoadError, PostalTsvLoader, RecordSource};

/// Error type for a pipeline run
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Failed to load administrative registry {source_name}: {error}")]
    AdminSource {
        source_name: String,
        #[source]
        error: LoadError,
    },

    #[error("Failed to load postal registry {source_name}: {error}")]
    PostalSource {
        source_name: String,
        #[source]
        error: LoadError,
    },

    #[error("Failed to write output: {0}")]
    Sink(#[from] SinkError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Normalize(#[from] NormalizeError),
}

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineReport {
    pub admin_records: usize,
    pub postal_records: usize,
    pub joined_records: usize,
    pub coverage: Coverage,
    pub output: PathBuf,
}

/// Run the pipeline with loaders built from `config`.
pub fn run(config: &PipelineConfig) -> Result<PipelineReport, PipelineError> {
    config.validate()?;
    let capital = config.capital.policy()?;

    let admin = AdminSheetLoader::new(&config.paths.admin)
        .with_layout(config.admin.clone())
        .with_normalizer(Box::new(capital.clone()));

    let mut postal = PostalTsvLoader::new(&config.paths.postal).with_layout(config.postal.clone());
    if config.normalize_postal {
        postal = postal.with_normalizer(Box::new(capital.clone()));
    }

    let report = run_with(&admin, &postal, &config.paths.output)?;

    if !config.normalize_postal {
        warn_on_unnormalized_postal(&capital, &config.paths.postal, &report);
    }
    Ok(report)
}

/// Run the pipeline against arbitrary sources.
pub fn run_with<A, P>(admin: &A, postal: &P, output: &Path) -> Result<PipelineReport, PipelineError>
where
    A: RecordSource<Record = AdministrativeRecord>,
    P: RecordSource<Record = PostalRecord>,
{
    let admin_records = admin.load().map_err(|error| PipelineError::AdminSource {
        source_name: admin.describe(),
        error,
    })?;
    tracing::info!(
        "Loaded {} administrative records from {}",
        admin_records.len(),
        admin.describe()
    );

    let postal_records = postal.load().map_err(|error| PipelineError::PostalSource {
        source_name: postal.describe(),
        error,
    })?;
    tracing::info!(
        "Loaded {} postal records from {}",
        postal_records.len(),
        postal.describe()
    );

    let joined = matcher::merge(&admin_records, &postal_records);
    let coverage = matcher::coverage(&admin_records, &postal_records);
    tracing::info!(
        "Matched {} of {} administrative places, {} joined records",
        coverage.matched_places,
        coverage.admin_places,
        joined.len()
    );
    tracing::debug!(
        "{} administrative and {} postal places have no counterpart",
        coverage.unmatched_admin.len(),
        coverage.unmatched_postal.len()
    );

    let written = sink::write_file(output, &joined)?;
    tracing::info!("Wrote {} rows to {}", written, output.display());

    Ok(PipelineReport {
        admin_records: admin_records.len(),
        postal_records: postal_records.len(),
        joined_records: joined.len(),
        coverage,
        output: output.to_path_buf(),
    })
}

/// Postal place names are taken verbatim. If any unmatched one carries the
/// capital marker it would silently miss the capital key, so say so.
fn warn_on_unnormalized_postal(capital: &CapitalDistricts, postal_path: &Path, report: &PipelineReport) {
    let variants = district_variants(capital, &report.coverage.unmatched_postal);
    if !variants.is_empty() {
        tracing::warn!(
            "{} postal place names in {} look like {} districts but were not normalized (e.g. '{}')",
            variants.len(),
            postal_path.display(),
            capital.canonical(),
            variants[0]
        );
    }
}

/// Names that the capital rule would rewrite.
pub fn district_variants<'a>(capital: &CapitalDistricts, places: &'a [String]) -> Vec<&'a str> {
    places
        .iter()
        .map(String::as_str)
        .filter(|place| capital.normalize(place) != *place)
        .collect()
}
