//! Metadata containment filter built from `metadata.<key>=<value>` query parameters.

use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;

/// Query-string prefix marking a metadata filter parameter.
pub const METADATA_PREFIX: &str = "metadata.";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum FilterError {
    #[error("no metadata filter present")]
    Missing,
}

/// JSON object bound as the right-hand side of `metadata @> $n::jsonb`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MetadataFilter(Map<String, Value>);

impl MetadataFilter {
    /// Filter with no keys. Contained in every object, so it matches all rows.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Collect every `metadata.`-prefixed parameter. The first value of a repeated key wins.
    /// Values that parse as base-10 integers become JSON numbers, the rest stay strings.
    pub fn from_pairs<'a, I>(pairs: I) -> Result<Self, FilterError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut map = Map::new();
        for (key, value) in pairs {
            let Some(meta_key) = key.strip_prefix(METADATA_PREFIX) else {
                continue;
            };
            if map.contains_key(meta_key) {
                continue;
            }
            let typed = match value.parse::<i64>() {
                Ok(n) => Value::Number(n.into()),
                Err(_) => Value::String(value.to_string()),
            };
            map.insert(meta_key.to_string(), typed);
        }
        if map.is_empty() {
            return Err(FilterError::Missing);
        }
        Ok(MetadataFilter(map))
    }

    /// Like [MetadataFilter::from_pairs], but an absent filter becomes [MetadataFilter::empty].
    pub fn from_pairs_or_empty<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        Self::from_pairs(pairs).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }
}

impl fmt::Display for MetadataFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Value::Object(self.0.clone()))
    }
}
