use std::sync::Arc;

use serde::ser::{Serialize, SerializeMap, Serializer};
use smallvec::SmallVec;

type Entry = (Arc<str>, String);

/// One materialized record: column path to rendered value.
///
/// Entries keep column declaration order. Columns whose value is null for
/// this record are absent rather than present with a marker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    entries: SmallVec<[Entry; 8]>,
}

impl Row {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: SmallVec::with_capacity(capacity),
        }
    }

    /// Appends a value; callers guarantee paths are unique within a row.
    pub(crate) fn push(&mut self, path: Arc<str>, value: String) {
        debug_assert!(
            self.get(&path).is_none(),
            "column '{path}' inserted twice into one row"
        );
        self.entries.push((path, value));
    }

    #[must_use]
    pub fn get(&self, path: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key.as_ref() == path)
            .map(|(_, value)| value.as_str())
    }

    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_ref(), value.as_str()))
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_ref())
    }

    /// Consumes the row into owned `(path, value)` pairs.
    #[must_use]
    pub fn into_pairs(self) -> Vec<(String, String)> {
        self.entries
            .into_iter()
            .map(|(key, value)| (key.to_string(), value))
            .collect()
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key.as_ref(), value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, &str)]) -> Row {
        let mut row = Row::new();
        for (key, value) in pairs {
            row.push(Arc::from(*key), (*value).to_owned());
        }
        row
    }

    #[test]
    fn lookups_and_order() {
        let row = row(&[("b", "2"), ("a", "1")]);
        assert_eq!(row.get("a"), Some("1"));
        assert_eq!(row.get("c"), None);
        assert!(row.contains("b"));
        assert_eq!(row.paths().collect::<Vec<_>>(), ["b", "a"]);
        assert_eq!(
            row.into_pairs(),
            vec![("b".to_owned(), "2".to_owned()), ("a".to_owned(), "1".to_owned())]
        );
    }

    #[test]
    fn serializes_as_an_ordered_map() {
        let row = row(&[("z", "last"), ("a.b", "")]);
        let json = serde_json::to_string(&row).expect("serialize row");
        assert_eq!(json, r#"{"z":"last","a.b":""}"#);
    }
}
