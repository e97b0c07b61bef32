use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use super::FieldValue;

/// Localized label table for one language, keyed by label name
/// (`sitio`, `buscar`, `noResultados`, ...).
///
/// Labels that are `null` are dropped when parsing, and blank labels
/// read as missing, so lookups fall back to their defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SiteConfig(BTreeMap<String, FieldValue>);

impl<'de> Deserialize<'de> for SiteConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = BTreeMap::<String, Option<FieldValue>>::deserialize(
            deserializer,
        )?;
        Ok(raw
            .into_iter()
            .filter_map(|(key, value)| Some((key, value?)))
            .collect())
    }
}

impl SiteConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.0.get(key)
    }

    /// Label text; sequences are comma joined. Blank labels are `None`.
    pub fn text(&self, key: &str) -> Option<String> {
        self.get(key)
            .map(FieldValue::display)
            .filter(|text| !text.trim().is_empty())
    }

    pub fn text_or(&self, key: &str, default: &str) -> String {
        self.text(key)
            .unwrap_or_else(|| default.to_string())
    }

    /// Site title, stored as a sequence of words.
    pub fn title(&self) -> Option<String> {
        self.get("sitio")
            .map(|value| value.joined(" "))
            .filter(|title| !title.trim().is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn insert<V: Into<FieldValue>>(&mut self, key: &str, value: V) {
        self.0.insert(key.to_string(), value.into());
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)>
    for SiteConfig
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
