// Structured query parameters
// Keys are restricted to the names the Health CRM understands

use serde::ser::{Serialize, SerializeSeq, Serializer};
use std::fmt;

/// Query parameter names recognized by the Health CRM endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKey {
    Page,
    PageSize,
    Service,
    Search,
    RefLocation,
    Distance,
    CrmServiceCode,
    IdentifierType,
    IdentifierValue,
    ServiceIds,
    FacilityIds,
}

impl QueryKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryKey::Page => "page",
            QueryKey::PageSize => "page_size",
            QueryKey::Service => "service",
            QueryKey::Search => "search",
            QueryKey::RefLocation => "ref_location",
            QueryKey::Distance => "distance",
            QueryKey::CrmServiceCode => "crm_service_code",
            QueryKey::IdentifierType => "identifier_type",
            QueryKey::IdentifierValue => "identifier_value",
            QueryKey::ServiceIds => "service_ids",
            QueryKey::FacilityIds => "facility_ids",
        }
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered list of query parameters
///
/// `append` keeps every value of a repeated key (`service=a&service=b`),
/// `set` replaces earlier values, and `join` sends a list as one
/// comma-separated value (`service_ids=a,b`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(QueryKey, String)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a value, keeping any existing values for the key
    pub fn append(&mut self, key: QueryKey, value: impl Into<String>) -> &mut Self {
        self.pairs.push((key, value.into()));
        self
    }

    /// Replace all values for the key with a single value
    pub fn set(&mut self, key: QueryKey, value: impl Into<String>) -> &mut Self {
        self.pairs.retain(|(k, _)| *k != key);
        self.pairs.push((key, value.into()));
        self
    }

    /// Replace all values for the key with a comma-separated list
    pub fn join<I, S>(&mut self, key: QueryKey, values: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let joined = values
            .into_iter()
            .map(|v| v.as_ref().to_string())
            .collect::<Vec<_>>()
            .join(",");
        self.set(key, joined)
    }

    /// All values recorded for a key, in insertion order
    pub fn get_all(&self, key: QueryKey) -> Vec<&str> {
        self.pairs
            .iter()
            .filter(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    /// First value recorded for a key
    pub fn get(&self, key: QueryKey) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

// Serialized as a sequence of pairs so reqwest's `.query()` repeats keys
impl Serialize for QueryParams {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.pairs.len()))?;
        for pair in self.iter() {
            seq.serialize_element(&pair)?;
        }
        seq.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_append_keeps_repeated_keys() {
        let mut params = QueryParams::new();
        params
            .append(QueryKey::Service, "1234")
            .append(QueryKey::Service, "4567");

        assert_eq!(params.get_all(QueryKey::Service), vec!["1234", "4567"]);
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn test_set_replaces_previous_values() {
        let mut params = QueryParams::new();
        params
            .append(QueryKey::Page, "1")
            .append(QueryKey::Page, "2")
            .set(QueryKey::Page, "3");

        assert_eq!(params.get_all(QueryKey::Page), vec!["3"]);
    }

    #[test]
    fn test_join_uses_commas() {
        let mut params = QueryParams::new();
        params.join(QueryKey::ServiceIds, ["a", "b", "c"]);

        assert_eq!(params.get(QueryKey::ServiceIds), Some("a,b,c"));
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn test_iter_preserves_insertion_order() {
        let mut params = QueryParams::new();
        params
            .set(QueryKey::PageSize, "10")
            .set(QueryKey::Page, "1")
            .set(QueryKey::CrmServiceCode, "05");

        let keys: Vec<_> = params.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["page_size", "page", "crm_service_code"]);
    }

    #[test]
    fn test_serializes_as_pairs() {
        let mut params = QueryParams::new();
        params
            .append(QueryKey::Service, "a")
            .append(QueryKey::Service, "b");

        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(json, serde_json::json!([["service", "a"], ["service", "b"]]));
    }

    #[test]
    fn test_key_names() {
        assert_eq!(QueryKey::RefLocation.to_string(), "ref_location");
        assert_eq!(QueryKey::FacilityIds.as_str(), "facility_ids");
        assert_eq!(QueryKey::IdentifierValue.as_str(), "identifier_value");
    }

    proptest! {
        #[test]
        fn prop_appended_values_are_never_lost(values in proptest::collection::vec("[a-z0-9-]{1,12}", 0..20)) {
            let mut params = QueryParams::new();
            for v in &values {
                params.append(QueryKey::Service, v.clone());
            }
            let stored: Vec<String> = params
                .get_all(QueryKey::Service)
                .into_iter()
                .map(str::to_string)
                .collect();
            prop_assert_eq!(stored, values);
        }
    }
}
