//! Extracted metadata: an ordered tag/value mapping.

use crate::constants::{LATITUDE_KEY, LONGITUDE_KEY};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single metadata value as produced by the extractor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl MetadataValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            MetadataValue::Number(n) => Some(*n),
            _ => None,
        }
    }
}

/// Coerces any value to display text.
impl fmt::Display for MetadataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetadataValue::Bool(b) => write!(f, "{}", b),
            MetadataValue::Number(n) => write!(f, "{}", n),
            MetadataValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for MetadataValue {
    fn from(value: &str) -> Self {
        MetadataValue::Text(value.to_string())
    }
}

impl From<String> for MetadataValue {
    fn from(value: String) -> Self {
        MetadataValue::Text(value)
    }
}

impl From<f64> for MetadataValue {
    fn from(value: f64) -> Self {
        MetadataValue::Number(value)
    }
}

impl From<bool> for MetadataValue {
    fn from(value: bool) -> Self {
        MetadataValue::Bool(value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataEntry {
    pub key: String,
    pub value: MetadataValue,
}

/// Decimal-degree coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GpsCoordinate {
    pub latitude: f64,
    pub longitude: f64,
}

/// Tag name to value mapping that keeps the order in which the extractor produced entries.
///
/// Keys are unique: inserting an existing key replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metadata {
    entries: Vec<MetadataEntry>,
}

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<MetadataValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|e| e.key == key) {
            Some(entry) => entry.value = value,
            None => self.entries.push(MetadataEntry { key, value }),
        }
    }

    pub fn get(&self, key: &str) -> Option<&MetadataValue> {
        self.entries.iter().find(|e| e.key == key).map(|e| &e.value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MetadataEntry> {
        self.entries.iter()
    }

    /// The GPS point, when both well-known keys hold finite numbers.
    pub fn coordinates(&self) -> Option<GpsCoordinate> {
        let latitude = self.get(LATITUDE_KEY)?.as_f64()?;
        let longitude = self.get(LONGITUDE_KEY)?.as_f64()?;
        if !latitude.is_finite() || !longitude.is_finite() {
            return None;
        }
        Some(GpsCoordinate {
            latitude,
            longitude,
        })
    }
}

impl<K: Into<String>, V: Into<MetadataValue>> FromIterator<(K, V)> for Metadata {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut metadata = Metadata::new();
        for (key, value) in iter {
            metadata.insert(key, value);
        }
        metadata
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_preserves_order_and_replaces_duplicates() {
        let mut metadata = Metadata::new();
        metadata.insert("Make", "Canon");
        metadata.insert("Model", "EOS R5");
        metadata.insert("Make", "Nikon");

        let keys: Vec<&str> = metadata.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["Make", "Model"]);
        assert_eq!(metadata.get("Make"), Some(&MetadataValue::from("Nikon")));
    }

    #[test]
    fn test_display_coercion() {
        assert_eq!(MetadataValue::Number(100.0).to_string(), "100");
        assert_eq!(MetadataValue::Number(40.7128).to_string(), "40.7128");
        assert_eq!(MetadataValue::Bool(true).to_string(), "true");
        assert_eq!(MetadataValue::from("f/2.8").to_string(), "f/2.8");
    }

    #[test]
    fn test_coordinates_require_both_numeric_keys() {
        let full: Metadata = [("latitude", 40.7128), ("longitude", -74.006)]
            .into_iter()
            .collect();
        assert_eq!(
            full.coordinates(),
            Some(GpsCoordinate {
                latitude: 40.7128,
                longitude: -74.006
            })
        );

        let only_lat: Metadata = [("latitude", 40.7128)].into_iter().collect();
        assert_eq!(only_lat.coordinates(), None);

        let mut textual = Metadata::new();
        textual.insert("latitude", "40.7128");
        textual.insert("longitude", -74.006);
        assert_eq!(textual.coordinates(), None);

        let non_finite: Metadata = [("latitude", f64::NAN), ("longitude", 1.0)]
            .into_iter()
            .collect();
        assert_eq!(non_finite.coordinates(), None);
    }

    #[test]
    fn test_serializes_as_ordered_entries() {
        let metadata: Metadata = [("Model", MetadataValue::from("X")), ("ISO", 200.0.into())]
            .into_iter()
            .collect();
        let json = serde_json::to_value(&metadata).unwrap();
        assert_eq!(
            json,
            serde_json::json!([
                { "key": "Model", "value": "X" },
                { "key": "ISO", "value": 200.0 }
            ])
        );
    }
}
