//! Place-name normalization policies.
//!
//! A policy is a pure `name -> name` function injected into a loader. The
//! administrative registry lists the capital once per district
//! ("Budapest 7. kerület"), while the postal registry uses the bare name, so
//! the administrative loader is given a [`CapitalDistricts`] policy and the
//! postal loader defaults to [`Verbatim`].

use std::collections::HashMap;

use regex::Regex;
use thiserror::Error;

/// Error type for building normalization policies
#[derive(Error, Debug)]
pub enum NormalizeError {
    #[error("Invalid capital marker pattern '{pattern}': {source}")]
    InvalidMarker {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Capital marker pattern '{0}' matches every place name")]
    MarkerMatchesEverything(String),

    #[error("Canonical capital name cannot be empty")]
    EmptyCanonical,
}

/// Trait for place-name normalization policies.
pub trait PlaceNormalizer: Send + Sync {
    /// Return the canonical form of `place`.
    fn normalize(&self, place: &str) -> String;
}

/// Simple function-based implementation of PlaceNormalizer
impl<F> PlaceNormalizer for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn normalize(&self, place: &str) -> String {
        self(place)
    }
}

/// Leaves every name untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct Verbatim;

impl PlaceNormalizer for Verbatim {
    fn normalize(&self, place: &str) -> String {
        place.to_string()
    }
}

/// Collapses every district-qualified variant of the capital into its bare
/// name.
///
/// The marker is searched anywhere in the string, not only at the start.
#[derive(Debug, Clone)]
pub struct CapitalDistricts {
    canonical: String,
    marker: Marker,
}

#[derive(Debug, Clone)]
enum Marker {
    Literal(String),
    Pattern(Regex),
}

impl CapitalDistricts {
    pub const BUDAPEST: &'static str = "Budapest";

    /// Build a policy from a canonical name and a regex marker.
    ///
    /// A marker that matches the empty string would rewrite every place, so
    /// it is rejected, as is an empty canonical name.
    pub fn new(canonical: impl Into<String>, marker: &str) -> Result<Self, NormalizeError> {
        let canonical = canonical.into();
        if canonical.is_empty() {
            return Err(NormalizeError::EmptyCanonical);
        }

        let regex = Regex::new(marker).map_err(|source| NormalizeError::InvalidMarker {
            pattern: marker.to_string(),
            source,
        })?;
        if regex.is_match("") {
            return Err(NormalizeError::MarkerMatchesEverything(marker.to_string()));
        }

        Ok(Self {
            canonical,
            marker: Marker::Pattern(regex),
        })
    }

    /// Policy whose marker is the canonical name itself, as a substring.
    pub fn literal(canonical: impl Into<String>) -> Result<Self, NormalizeError> {
        let canonical = canonical.into();
        if canonical.is_empty() {
            return Err(NormalizeError::EmptyCanonical);
        }

        Ok(Self {
            marker: Marker::Literal(canonical.clone()),
            canonical,
        })
    }

    /// The Hungarian capital rule.
    pub fn budapest() -> Self {
        Self {
            canonical: Self::BUDAPEST.to_string(),
            marker: Marker::Literal(Self::BUDAPEST.to_string()),
        }
    }

    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    /// True if `place` carries the capital marker.
    pub fn matches(&self, place: &str) -> bool {
        match &self.marker {
            Marker::Literal(needle) => place.contains(needle.as_str()),
            Marker::Pattern(regex) => regex.is_match(place),
        }
    }
}

impl Default for CapitalDistricts {
    fn default() -> Self {
        Self::budapest()
    }
}

impl PlaceNormalizer for CapitalDistricts {
    fn normalize(&self, place: &str) -> String {
        if self.matches(place) {
            self.canonical.clone()
        } else {
            place.to_string()
        }
    }
}

/// Exact-match lookup table, falling back to another policy for names not in
/// the table.
pub struct Aliases {
    table: HashMap<String, String>,
    fallback: Box<dyn PlaceNormalizer>,
}

impl Aliases {
    pub fn new() -> Self {
        Self {
            table: HashMap::new(),
            fallback: Box::new(Verbatim),
        }
    }

    /// Register `alias` as another spelling of `canonical`.
    pub fn with_alias(mut self, alias: impl Into<String>, canonical: impl Into<String>) -> Self {
        self.table.insert(alias.into(), canonical.into());
        self
    }

    pub fn with_fallback(mut self, fallback: Box<dyn PlaceNormalizer>) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl Default for Aliases {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<(String, String)> for Aliases {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            table: iter.into_iter().collect(),
            fallback: Box::new(Verbatim),
        }
    }
}

impl PlaceNormalizer for Aliases {
    fn normalize(&self, place: &str) -> String {
        match self.table.get(place) {
            Some(canonical) => canonical.clone(),
            None => self.fallback.normalize(place),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capital_district_collapses() {
        let rule = CapitalDistricts::budapest();

        assert_eq!(rule.normalize("Budapest 7. kerület"), "Budapest");
        assert_eq!(rule.normalize("Budapest 23. kerület"), "Budapest");
        assert_eq!(rule.normalize("Budapest"), "Budapest");
    }

    #[test]
    fn test_capital_marker_anywhere() {
        let rule = CapitalDistricts::budapest();

        assert_eq!(rule.normalize(" Budapest XI. ker."), "Budapest");
        assert_eq!(rule.normalize("(Budapest)"), "Budapest");
    }

    #[test]
    fn test_other_names_unchanged() {
        let rule = CapitalDistricts::budapest();

        for place in ["Szeged", "budapest 5. kerület", "Budakeszi", "", " Pécs "] {
            assert_eq!(rule.normalize(place), place);
        }
    }

    #[test]
    fn test_custom_capital_and_marker() {
        let rule = CapitalDistricts::new("Wien", r"^Wien,\s+\d+\.").unwrap();

        assert_eq!(rule.normalize("Wien, 3. Landstraße"), "Wien");
        assert_eq!(rule.normalize("Wiener Neustadt"), "Wiener Neustadt");
        assert_eq!(rule.canonical(), "Wien");
    }

    #[test]
    fn test_invalid_marker() {
        let result = CapitalDistricts::new("Budapest", "Budapest(");
        assert!(matches!(result, Err(NormalizeError::InvalidMarker { .. })));
    }

    #[test]
    fn test_empty_capital_rejected() {
        assert!(matches!(
            CapitalDistricts::literal(""),
            Err(NormalizeError::EmptyCanonical)
        ));
        assert!(matches!(
            CapitalDistricts::new("", "^Budapest"),
            Err(NormalizeError::EmptyCanonical)
        ));
    }

    #[test]
    fn test_marker_matching_everything_rejected() {
        for pattern in ["", ".*", "^", "(Budapest)?"] {
            let result = CapitalDistricts::new("Budapest", pattern);
            assert!(
                matches!(result, Err(NormalizeError::MarkerMatchesEverything(_))),
                "pattern {:?}",
                pattern
            );
        }
    }

    #[test]
    fn test_literal_marker_is_not_a_pattern() {
        let rule = CapitalDistricts::literal("St. Pölten").unwrap();

        assert_eq!(rule.normalize("St. Pölten-Land"), "St. Pölten");
        assert_eq!(rule.normalize("StX Pölten"), "StX Pölten");
    }

    #[test]
    fn test_aliases_with_fallback() {
        let aliases = Aliases::new()
            .with_alias("Győr-Ménfőcsanak", "Győr")
            .with_fallback(Box::new(CapitalDistricts::budapest()));

        assert_eq!(aliases.len(), 1);
        assert_eq!(aliases.normalize("Győr-Ménfőcsanak"), "Győr");
        assert_eq!(aliases.normalize("Budapest 2. kerület"), "Budapest");
        assert_eq!(aliases.normalize("Debrecen"), "Debrecen");
    }

    #[test]
    fn test_aliases_from_table() {
        let aliases: Aliases = [("Pest".to_string(), "Budapest".to_string())]
            .into_iter()
            .collect();

        assert!(!aliases.is_empty());
        assert_eq!(aliases.normalize("Pest"), "Budapest");
        assert_eq!(aliases.normalize("Buda"), "Buda");
    }

    #[test]
    fn test_closure_policy() {
        let upper = |place: &str| place.to_uppercase();
        let policy: Box<dyn PlaceNormalizer> = Box::new(upper);

        assert_eq!(policy.normalize("Eger"), "EGER");
    }

    #[test]
    fn test_verbatim() {
        assert_eq!(Verbatim.normalize("Budapest 5. kerület"), "Budapest 5. kerület");
    }
}
