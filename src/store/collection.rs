//! A single named collection: documents plus an optional text index.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::store::text_index::{DocumentId, TextIndex};
use crate::store::{Document, Filter};

/// In-memory collection. Documents keep their insertion order.
#[derive(Debug, Clone, Default)]
pub struct Collection {
    next_id: DocumentId,
    docs: BTreeMap<DocumentId, Document>,
    text_index: Option<TextIndex>,
}

/// On-disk form of a collection. Text indexes are rebuilt on load.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CollectionSnapshot {
    #[serde(default)]
    pub text_index: bool,
    #[serde(default)]
    pub documents: Vec<Document>,
}

impl Collection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, doc: Document) {
        let id = self.next_id;
        self.next_id += 1;
        if let Some(index) = self.text_index.as_mut() {
            index.insert(id, &doc);
        }
        self.docs.insert(id, doc);
    }

    pub fn find(&self, filter: &Filter) -> Vec<Document> {
        self.docs
            .values()
            .filter(|d| filter.matches(d))
            .cloned()
            .collect()
    }

    /// Documents matching the text query, or `None` when no text index exists.
    pub fn find_text(&self, query: &str) -> Option<Vec<Document>> {
        let index = self.text_index.as_ref()?;
        Some(
            index
                .search(query)
                .into_iter()
                .filter_map(|id| self.docs.get(&id).cloned())
                .collect(),
        )
    }

    pub fn delete_many(&mut self, filter: &Filter) -> usize {
        let doomed: Vec<DocumentId> = self
            .docs
            .iter()
            .filter(|(_, d)| filter.matches(d))
            .map(|(id, _)| *id)
            .collect();
        for id in &doomed {
            if let Some(doc) = self.docs.remove(id) {
                if let Some(index) = self.text_index.as_mut() {
                    index.remove(*id, &doc);
                }
            }
        }
        doomed.len()
    }

    pub fn drop_indexes(&mut self) {
        self.text_index = None;
    }

    pub fn create_text_index(&mut self) {
        let mut index = TextIndex::new();
        for (id, doc) in &self.docs {
            index.insert(*id, doc);
        }
        self.text_index = Some(index);
    }

    pub fn has_text_index(&self) -> bool {
        self.text_index.is_some()
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    pub fn to_snapshot(&self) -> CollectionSnapshot {
        CollectionSnapshot {
            text_index: self.has_text_index(),
            documents: self.docs.values().cloned().collect(),
        }
    }

    pub fn from_snapshot(snapshot: CollectionSnapshot) -> Self {
        let mut collection = Collection::new();
        for doc in snapshot.documents {
            collection.insert(doc);
        }
        if snapshot.text_index {
            collection.create_text_index();
        }
        collection
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(v: serde_json::Value) -> Document {
        Document::try_from(v).unwrap()
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut c = Collection::new();
        c.insert(doc(json!({"classname": "b"})));
        c.insert(doc(json!({"classname": "a"})));
        let names: Vec<_> = c
            .find(&Filter::All)
            .iter()
            .map(|d| d.get_str("classname").unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[test]
    fn test_text_index_tracks_mutations() {
        let mut c = Collection::new();
        assert!(c.find_text("rifle").is_none());

        c.insert(doc(json!({"displayName": "Rifle", "type": "Primaries"})));
        c.create_text_index();
        c.insert(doc(json!({"displayName": "Other rifle", "type": "Primaries"})));
        assert_eq!(c.find_text("rifle").unwrap().len(), 2);

        assert_eq!(c.delete_many(&Filter::eq("displayName", "Rifle")), 1);
        assert_eq!(c.find_text("rifle").unwrap().len(), 1);

        c.drop_indexes();
        assert!(c.find_text("rifle").is_none());
    }

    #[test]
    fn test_snapshot_restores_index() {
        let mut c = Collection::new();
        c.insert(doc(json!({"displayName": "Map"})));
        c.create_text_index();

        let restored = Collection::from_snapshot(c.to_snapshot());
        assert_eq!(restored.len(), 1);
        assert_eq!(restored.find_text("map").unwrap().len(), 1);
    }
}
