//! Grouping of ordered rows by key.

use std::hash::Hash;

use indexmap::IndexMap;
use serde_json::Value;

use super::types::{BatchDocument, EntityEnvelope, EntityItem, ExportRow};

/// Groups `rows` by `key_of`, keeping first-seen key order and the input
/// order of rows within each group.
///
/// Rows whose key is `None` are dropped.
pub fn group_rows<T, K, F>(rows: impl IntoIterator<Item = T>, mut key_of: F) -> IndexMap<K, Vec<T>>
where
    K: Hash + Eq,
    F: FnMut(&T) -> Option<K>,
{
    let mut groups: IndexMap<K, Vec<T>> = IndexMap::new();
    for row in rows {
        if let Some(key) = key_of(&row) {
            groups.entry(key).or_default().push(row);
        }
    }
    groups
}

/// Nests the rows of one window into a batch document.
///
/// Rows must already be ordered by key, then by the order column.
pub fn build_batch_document(rows: Vec<ExportRow>, community_id: Value) -> BatchDocument {
    let entities = group_rows(rows, |row| Some(row.key.clone()))
        .into_values()
        .map(|group| EntityEnvelope {
            entity: group.into_iter().map(EntityItem::from).collect(),
        })
        .collect();
    BatchDocument {
        community_id,
        entities,
    }
}
