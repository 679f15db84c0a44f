//! # placemerge: Place-name registry reconciliation
//!
//! Joins an official administrative registry (place name → national
//! statistical code) with a postal registry (place name → postal code and
//! coordinates) into one denormalized table keyed by place name.
//!
//! ## Pipeline
//!
//! ```text
//! AdminSheetLoader ──► normalized records ──┐
//!                                           ├──► matcher::merge ──► CsvSink
//! PostalTsvLoader  ──► postal records ──────┘
//! ```
//!
//! - **Loaders** read the workbook and the tab-delimited dump fully into memory.
//! - **Normalization** collapses the capital's district variants
//!   ("Budapest 7. kerület") to the bare name used by the postal registry.
//! - **Matcher** pairs every administrative record with every postal record
//!   sharing its place name, in sorted order.
//! - **Sink** writes the joined rows as headerless CSV.
//!
//! ## Example
//!
//! ```
//! use placemerge::{merge, AdministrativeRecord, CapitalDistricts, PlaceNormalizer, PostalRecord};
//!
//! let capital = CapitalDistricts::budapest();
//! let admin = vec![
//!     AdministrativeRecord::new(capital.normalize("Budapest 5. kerület"), "0101"),
//!     AdministrativeRecord::new(capital.normalize("Szeged"), "0601"),
//! ];
//! let postal = vec![PostalRecord::new("Budapest", "1051", "47.50", "19.05")];
//!
//! let joined = merge(&admin, &postal);
//! assert_eq!(joined.len(), 1);
//! assert_eq!(joined[0].statistical_code, "0101");
//! ```

// Core modules
pub mod entity;
pub mod normalize;
pub mod matcher;

// Adapters
pub mod source;
pub mod sink;

// Orchestration
pub mod config;
pub mod pipeline;

// Re-export key types
pub use entity::{AdministrativeRecord, Entity, JoinedRecord, PostalRecord};
pub use normalize::{Aliases, CapitalDistricts, NormalizeError, PlaceNormalizer, Verbatim};
pub use matcher::{coverage, merge, merge_nested, Coverage};
pub use source::{AdminLayout, AdminSheetLoader, LoadError, PostalLayout, PostalTsvLoader, RecordSource};
pub use sink::{CsvSink, SinkError};
pub use config::{ConfigError, PipelineConfig};
pub use pipeline::{run, run_with, PipelineError, PipelineReport};
