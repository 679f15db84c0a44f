//! Record types shared by the loaders, the matcher and the sink.
//!
//! Field declaration order is significant: `Ord` is derived, so sorting a
//! collection of records orders it by place name first and then by the
//! remaining fields, left to right.

use serde::{Deserialize, Serialize};

/// Core trait for the records flowing through the pipeline.
pub trait Entity {
    /// The name of this entity type
    const NAME: &'static str;

    /// Join key (the normalized place name)
    fn key(&self) -> &str;
}

/// A row from the administrative registry: place name and statistical code.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AdministrativeRecord {
    pub place: String,
    pub statistical_code: String,
}

impl AdministrativeRecord {
    pub fn new(place: impl Into<String>, statistical_code: impl Into<String>) -> Self {
        Self {
            place: place.into(),
            statistical_code: statistical_code.into(),
        }
    }
}

impl Entity for AdministrativeRecord {
    const NAME: &'static str = "AdministrativeRecord";

    fn key(&self) -> &str {
        &self.place
    }
}

/// A row from the postal registry.
///
/// Coordinates are kept as the decimal strings found in the source so that
/// they are written out exactly as read.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PostalRecord {
    pub place: String,
    pub postal_code: String,
    pub latitude: String,
    pub longitude: String,
}

impl PostalRecord {
    pub fn new(
        place: impl Into<String>,
        postal_code: impl Into<String>,
        latitude: impl Into<String>,
        longitude: impl Into<String>,
    ) -> Self {
        Self {
            place: place.into(),
            postal_code: postal_code.into(),
            latitude: latitude.into(),
            longitude: longitude.into(),
        }
    }
}

impl Entity for PostalRecord {
    const NAME: &'static str = "PostalRecord";

    fn key(&self) -> &str {
        &self.place
    }
}

/// One matched administrative/postal pair. Serializes in output column order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct JoinedRecord {
    pub place: String,
    pub statistical_code: String,
    pub postal_code: String,
    pub latitude: String,
    pub longitude: String,
}

impl JoinedRecord {
    /// Combine an administrative record with a postal record sharing its key.
    pub fn from_pair(admin: &AdministrativeRecord, postal: &PostalRecord) -> Self {
        Self {
            place: admin.place.clone(),
            statistical_code: admin.statistical_code.clone(),
            postal_code: postal.postal_code.clone(),
            latitude: postal.latitude.clone(),
            longitude: postal.longitude.clone(),
        }
    }
}

impl Entity for JoinedRecord {
    const NAME: &'static str = "JoinedRecord";

    fn key(&self) -> &str {
        &self.place
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_records_sort_by_place_then_code() {
        let mut records = vec![
            AdministrativeRecord::new("Szeged", "0601"),
            AdministrativeRecord::new("Budapest", "0102"),
            AdministrativeRecord::new("Budapest", "0101"),
        ];
        records.sort();

        assert_eq!(records[0], AdministrativeRecord::new("Budapest", "0101"));
        assert_eq!(records[1], AdministrativeRecord::new("Budapest", "0102"));
        assert_eq!(records[2], AdministrativeRecord::new("Szeged", "0601"));
    }

    #[test]
    fn test_postal_records_sort_by_all_fields() {
        let mut records = vec![
            PostalRecord::new("Pécs", "7630", "46.07", "18.23"),
            PostalRecord::new("Pécs", "7600", "46.08", "18.23"),
            PostalRecord::new("Eger", "3300", "47.90", "20.37"),
        ];
        records.sort();

        assert_eq!(records[0].place, "Eger");
        assert_eq!(records[1].postal_code, "7600");
        assert_eq!(records[2].postal_code, "7630");
    }

    #[test]
    fn test_joined_from_pair() {
        let admin = AdministrativeRecord::new("Szeged", "0601");
        let postal = PostalRecord::new("Szeged", "6720", "46.25", "20.15");

        let joined = JoinedRecord::from_pair(&admin, &postal);
        assert_eq!(joined.place, "Szeged");
        assert_eq!(joined.statistical_code, "0601");
        assert_eq!(joined.postal_code, "6720");
        assert_eq!(joined.latitude, "46.25");
        assert_eq!(joined.longitude, "20.15");
        assert_eq!(joined.key(), "Szeged");
    }

    #[test]
    fn test_entity_names() {
        assert_eq!(AdministrativeRecord::NAME, "AdministrativeRecord");
        assert_eq!(PostalRecord::NAME, "PostalRecord");
        assert_eq!(JoinedRecord::NAME, "JoinedRecord");
    }
}
