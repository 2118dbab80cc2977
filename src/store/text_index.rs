//! Tokenized inverted index for full-text queries.
//!
//! # Responsibilities
//! - Tokenize every string value of a document (nested objects and arrays included)
//! - Map tokens to the ids of documents containing them
//! - Evaluate text queries: any positive term, minus negated terms
//!
//! # Design Decisions
//! - Documents and queries share one analyzer: alphanumeric runs, lowercased,
//!   folded to ASCII, English stop words dropped, Snowball English stemming
//! - A query made only of negated terms matches nothing

use std::collections::{BTreeSet, HashMap};
use std::sync::OnceLock;

use serde_json::Value;
use tantivy::tokenizer::{
    AsciiFoldingFilter, Language, LowerCaser, SimpleTokenizer, Stemmer, StopWordFilter,
    TextAnalyzer, TokenStream,
};

use crate::store::Document;

/// Internal id of a document within its collection.
pub type DocumentId = u64;

#[derive(Debug, Clone, Default)]
pub struct TextIndex {
    postings: HashMap<String, BTreeSet<DocumentId>>,
}

impl TextIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: DocumentId, doc: &Document) {
        for token in document_tokens(doc) {
            self.postings.entry(token).or_default().insert(id);
        }
    }

    pub fn remove(&mut self, id: DocumentId, doc: &Document) {
        for token in document_tokens(doc) {
            if let Some(ids) = self.postings.get_mut(&token) {
                ids.remove(&id);
                if ids.is_empty() {
                    self.postings.remove(&token);
                }
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }

    /// Ids of documents matching `query`, ascending.
    pub fn search(&self, query: &str) -> BTreeSet<DocumentId> {
        let mut positive = Vec::new();
        let mut negative = Vec::new();
        for word in query.split_whitespace() {
            match word.strip_prefix('-') {
                Some(negated) => negative.extend(tokenize(negated)),
                None => positive.extend(tokenize(word)),
            }
        }

        let mut hits: BTreeSet<DocumentId> = positive
            .iter()
            .filter_map(|t| self.postings.get(t))
            .flatten()
            .copied()
            .collect();
        for token in &negative {
            if let Some(excluded) = self.postings.get(token) {
                hits.retain(|id| !excluded.contains(id));
            }
        }
        hits
    }
}

fn analyzer() -> TextAnalyzer {
    static ANALYZER: OnceLock<TextAnalyzer> = OnceLock::new();
    ANALYZER
        .get_or_init(|| {
            let stop_words = StopWordFilter::new(Language::English)
                .unwrap_or_else(|| StopWordFilter::remove(Vec::<String>::new()));
            TextAnalyzer::builder(SimpleTokenizer::default())
                .filter(LowerCaser)
                .filter(AsciiFoldingFilter)
                .filter(stop_words)
                .filter(Stemmer::new(Language::English))
                .build()
        })
        .clone()
}

/// Split text into index terms.
pub fn tokenize(text: &str) -> Vec<String> {
    let mut analyzer = analyzer();
    let mut stream = analyzer.token_stream(text);
    let mut terms = Vec::new();
    stream.process(&mut |token| terms.push(token.text.clone()));
    terms
}

fn document_tokens(doc: &Document) -> BTreeSet<String> {
    let mut tokens = BTreeSet::new();
    for value in doc.fields().values() {
        collect_tokens(value, &mut tokens);
    }
    tokens
}

fn collect_tokens(value: &Value, tokens: &mut BTreeSet<String>) {
    match value {
        Value::String(s) => tokens.extend(tokenize(s)),
        Value::Array(items) => items.iter().for_each(|v| collect_tokens(v, tokens)),
        Value::Object(map) => map.values().for_each(|v| collect_tokens(v, tokens)),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(v: Value) -> Document {
        Document::try_from(v).unwrap()
    }

    #[test]
    fn test_tokenize_splits_identifiers() {
        assert_eq!(tokenize("rhs_weap_M4A1"), vec!["rhs", "weap", "m4a1"]);
    }

    #[test]
    fn test_tokenize_normalizes_words() {
        assert_eq!(tokenize("Rifles"), tokenize("rifle"));
        assert_eq!(tokenize("the rifle"), tokenize("rifle"));
        assert_eq!(tokenize("Ünïcödé"), tokenize("unicode"));
        assert!(tokenize("the of and").is_empty());
    }

    #[test]
    fn test_plural_query_matches_singular() {
        let mut index = TextIndex::new();
        index.insert(1, &doc(json!({"displayName": "MX Rifle"})));
        index.insert(2, &doc(json!({"displayName": "Compass"})));
        assert_eq!(index.search("rifles"), BTreeSet::from([1]));
        assert_eq!(index.search("compasses"), BTreeSet::from([2]));
    }

    #[test]
    fn test_search_any_term() {
        let mut index = TextIndex::new();
        index.insert(1, &doc(json!({"displayName": "Assault Rifle", "count": 30})));
        index.insert(2, &doc(json!({"displayName": "Sniper Rifle"})));
        index.insert(3, &doc(json!({"displayName": "Pistol", "tags": ["sidearm"]})));

        assert_eq!(index.search("rifle"), BTreeSet::from([1, 2]));
        assert_eq!(index.search("RIFLE sidearm"), BTreeSet::from([1, 2, 3]));
        assert!(index.search("30").is_empty());
        assert!(index.search("").is_empty());
    }

    #[test]
    fn test_search_negation() {
        let mut index = TextIndex::new();
        index.insert(1, &doc(json!({"displayName": "Assault Rifle"})));
        index.insert(2, &doc(json!({"displayName": "Sniper Rifle"})));

        assert_eq!(index.search("rifle -sniper"), BTreeSet::from([1]));
        assert!(index.search("-sniper").is_empty());
    }

    #[test]
    fn test_nested_values_indexed() {
        let mut index = TextIndex::new();
        index.insert(7, &doc(json!({"attachments": {"optic": "Holosight"}})));
        assert_eq!(index.search("holosight"), BTreeSet::from([7]));
    }

    #[test]
    fn test_remove() {
        let mut index = TextIndex::new();
        let d = doc(json!({"name": "compass"}));
        index.insert(1, &d);
        index.remove(1, &d);
        assert!(index.search("compass").is_empty());
        assert!(index.is_empty());
    }
}
