//! Externally produced per-session judgments
//!
//! Facets come from an analysis step outside this workspace, so every field
//! is read leniently: a value of the wrong shape is treated as absent rather
//! than failing the whole collection.

use serde::de::{self, Deserializer, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordered label -> count mapping as found in the facet document
///
/// Non-numeric and negative values are dropped when reading; fractional
/// values are truncated and values past `u64::MAX` saturate. All arithmetic
/// saturates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Counts(Vec<(String, u64)>);

impl Counts {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn get(&self, key: &str) -> u64 {
        self.0
            .iter()
            .filter(|(k, _)| k == key)
            .fold(0, |acc, (_, v)| acc.saturating_add(*v))
    }

    pub fn total(&self) -> u64 {
        self.0.iter().fold(0, |acc, (_, v)| acc.saturating_add(*v))
    }

    pub fn has_positive(&self) -> bool {
        self.0.iter().any(|(_, v)| *v > 0)
    }

    /// Entries in document order
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Add `n` to `key`, appending it on first sight
    pub fn add(&mut self, key: &str, n: u64) {
        match self.0.iter_mut().find(|(k, _)| k == key) {
            Some((_, v)) => *v = v.saturating_add(n),
            None => self.0.push((key.to_string(), n)),
        }
    }

    /// Fold every entry of `other` into this mapping
    pub fn merge(&mut self, other: &Counts) {
        for (k, v) in other.iter() {
            self.add(k, v);
        }
    }

    /// Non-zero entries by descending count; ties keep first-seen order
    pub fn ranked(&self) -> Vec<(&str, u64)> {
        let mut entries: Vec<(&str, u64)> = self.iter().filter(|(_, v)| *v > 0).collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        entries
    }
}

impl<K: Into<String>> FromIterator<(K, u64)> for Counts {
    fn from_iter<I: IntoIterator<Item = (K, u64)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

fn count_from_value(value: &serde_json::Value) -> Option<u64> {
    match value {
        serde_json::Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0)
                .map(|f| f as u64)
        }),
        _ => None,
    }
}

struct CountsVisitor;

impl<'de> Visitor<'de> for CountsVisitor {
    type Value = Counts;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a mapping of labels to counts")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Counts, A::Error> {
        let mut entries = Vec::new();
        while let Some((key, value)) = map.next_entry::<String, serde_json::Value>()? {
            if let Some(count) = count_from_value(&value) {
                entries.push((key, count));
            }
        }
        Ok(Counts(entries))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Counts, A::Error> {
        while seq.next_element::<IgnoredAny>()?.is_some() {}
        Ok(Counts::new())
    }

    fn visit_unit<E: de::Error>(self) -> Result<Counts, E> {
        Ok(Counts::new())
    }

    fn visit_none<E: de::Error>(self) -> Result<Counts, E> {
        Ok(Counts::new())
    }

    fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<Counts, D::Error> {
        d.deserialize_any(CountsVisitor)
    }

    fn visit_bool<E: de::Error>(self, _: bool) -> Result<Counts, E> {
        Ok(Counts::new())
    }

    fn visit_i64<E: de::Error>(self, _: i64) -> Result<Counts, E> {
        Ok(Counts::new())
    }

    fn visit_u64<E: de::Error>(self, _: u64) -> Result<Counts, E> {
        Ok(Counts::new())
    }

    fn visit_f64<E: de::Error>(self, _: f64) -> Result<Counts, E> {
        Ok(Counts::new())
    }

    fn visit_str<E: de::Error>(self, _: &str) -> Result<Counts, E> {
        Ok(Counts::new())
    }
}

impl<'de> Deserialize<'de> for Counts {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(CountsVisitor)
    }
}

impl Serialize for Counts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (k, v) in &self.0 {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Keeps non-empty strings; anything else reads as absent
fn lenient_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    let value = serde_json::Value::deserialize(d)?;
    Ok(match value {
        serde_json::Value::String(s) if !s.is_empty() => Some(s),
        _ => None,
    })
}

/// One session's qualitative judgment
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facet {
    #[serde(default, deserialize_with = "lenient_string")]
    pub session_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub outcome: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub claude_helpfulness: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub session_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub primary_success: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub brief_summary: Option<String>,
    #[serde(default)]
    pub user_satisfaction_counts: Counts,
    #[serde(default)]
    pub friction_counts: Counts,
    #[serde(default)]
    pub goal_categories: Counts,
}

impl Facet {
    pub fn session_id(&self) -> &str {
        self.session_id.as_deref().unwrap_or("")
    }

    /// Sum of every friction count; absent and all-zero both read as 0
    pub fn friction_total(&self) -> u64 {
        self.friction_counts.total()
    }

    /// `"None"` is how the analysis step spells a missing success label
    pub fn primary_success(&self) -> Option<&str> {
        self.primary_success.as_deref().filter(|s| *s != "None")
    }
}
