//! Joins administrative records with postal records by place name.
//!
//! Both inputs are sorted by their natural field order before pairing. Every
//! administrative record is paired with every postal record sharing its
//! place name, so a key present `a` times on one side and `p` times on the
//! other yields `a * p` joined records. Records whose key has no counterpart
//! contribute nothing.

use std::collections::BTreeMap;

use indexmap::IndexMap;

use crate::entity::{AdministrativeRecord, Entity, JoinedRecord, PostalRecord};

/// Join the two registries.
///
/// Output order: administrative records in sorted order, and for each of
/// them the matching postal records in sorted order.
pub fn merge(admin: &[AdministrativeRecord], postal: &[PostalRecord]) -> Vec<JoinedRecord> {
    let admin = sorted(admin);
    let postal = sorted(postal);

    // Grouping the sorted postal records keeps each group in sorted order.
    let mut by_place: IndexMap<&str, Vec<&PostalRecord>> = IndexMap::new();
    for &record in &postal {
        by_place.entry(record.key()).or_default().push(record);
    }

    let mut joined = Vec::new();
    for a in &admin {
        if let Some(matches) = by_place.get(a.key()) {
            joined.extend(matches.iter().map(|p| JoinedRecord::from_pair(a, p)));
        }
    }
    joined
}

/// Reference nested-scan join, O(n * m). Produces exactly the output of
/// [`merge`].
pub fn merge_nested(admin: &[AdministrativeRecord], postal: &[PostalRecord]) -> Vec<JoinedRecord> {
    let admin = sorted(admin);
    let postal = sorted(postal);

    let mut joined = Vec::new();
    for a in &admin {
        for p in &postal {
            if a.place == p.place {
                joined.push(JoinedRecord::from_pair(a, p));
            }
        }
    }
    joined
}

fn sorted<T: Ord>(records: &[T]) -> Vec<&T> {
    let mut refs: Vec<&T> = records.iter().collect();
    refs.sort();
    refs
}

/// Key-level summary of how two inputs overlap.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Coverage {
    /// Distinct place names in the administrative input
    pub admin_places: usize,
    /// Distinct place names in the postal input
    pub postal_places: usize,
    /// Place names present on both sides
    pub matched_places: usize,
    /// Administrative place names with no postal counterpart, sorted
    pub unmatched_admin: Vec<String>,
    /// Postal place names with no administrative counterpart, sorted
    pub unmatched_postal: Vec<String>,
    /// Number of records [`merge`] produces for the same inputs
    pub expected_joined: usize,
}

/// Compute the [`Coverage`] of two inputs without joining them.
pub fn coverage(admin: &[AdministrativeRecord], postal: &[PostalRecord]) -> Coverage {
    let admin_counts = count_keys(admin);
    let postal_counts = count_keys(postal);

    let mut summary = Coverage {
        admin_places: admin_counts.len(),
        postal_places: postal_counts.len(),
        ..Coverage::default()
    };

    for (place, a) in &admin_counts {
        match postal_counts.get(place) {
            Some(p) => {
                summary.matched_places += 1;
                summary.expected_joined += a * p;
            }
            None => summary.unmatched_admin.push(place.to_string()),
        }
    }
    summary.unmatched_postal = postal_counts
        .keys()
        .filter(|place| !admin_counts.contains_key(*place))
        .map(|place| place.to_string())
        .collect();

    summary
}

fn count_keys<T: Entity>(records: &[T]) -> BTreeMap<&str, usize> {
    let mut counts = BTreeMap::new();
    for record in records {
        *counts.entry(record.key()).or_insert(0) += 1;
    }
    counts
}
