//! Query Engine: filtered, searched and paginated reads over the mod collections.

use std::sync::Arc;

use crate::catalog::{collection_name, sanitize, Catalog, ItemType};
use crate::query::{Pagination, QueryError};
use crate::store::{Document, DocumentStore, Filter, TextSearchable};

/// Numeric fields matched exactly by an integer search term.
pub const NUMERIC_SEARCH_FIELDS: [&str; 2] = ["count", "weight"];

/// Read-only query service over a store.
pub struct QueryEngine<S> {
    store: Arc<S>,
    catalog: Catalog,
}

impl<S> QueryEngine<S>
where
    S: DocumentStore + TextSearchable,
{
    pub fn new(store: Arc<S>, catalog: Catalog) -> Self {
        Self { store, catalog }
    }

    /// List items, optionally restricted to one mod and/or one category.
    ///
    /// Returns each item as canonical JSON, de-duplicated and sorted by that
    /// JSON text.
    pub fn list_classes(
        &self,
        mod_name: Option<&str>,
        item_type: Option<&str>,
        pagination: Pagination,
    ) -> Result<Vec<String>, QueryError> {
        let mod_name = mod_name.map(sanitize).unwrap_or_default();
        let item_type = item_type.map(sanitize).unwrap_or_default();

        self.catalog.validate_mod(&mod_name)?;
        let item_type = self.catalog.validate_type(&item_type)?;

        let target = (!mod_name.is_empty()).then(|| collection_name(&mod_name));
        let mut docs = Vec::new();
        for name in self.store.list_collection_names() {
            match &target {
                Some(target) if *target == name => {
                    docs.extend(self.filter_by_type(&name, item_type)?);
                    break;
                }
                Some(_) => continue,
                None => docs.extend(self.filter_by_type(&name, item_type)?),
            }
        }

        tracing::debug!(
            mod_name = %mod_name,
            item_type = ?item_type,
            matched = docs.len(),
            "Collected classes"
        );
        Ok(finish(docs, pagination))
    }

    /// Search every collection for `term`.
    ///
    /// An integer term matches items whose `count` or `weight` equals it;
    /// any other term is a full-text query.
    pub fn search(&self, term: &str, pagination: Pagination) -> Result<Vec<String>, QueryError> {
        let term = sanitize(term);
        let numeric = term.parse::<i64>().ok();

        let mut docs = Vec::new();
        for name in self.store.list_collection_names() {
            let collection = self.resolve_collection(&name)?;
            let matched = match numeric {
                Some(n) => {
                    let filter = Filter::or(NUMERIC_SEARCH_FIELDS.map(|f| Filter::eq(f, n)));
                    self.store.find(&collection, &filter)?
                }
                None => self.store.find_text(&collection, &term)?,
            };
            docs.extend(matched);
        }

        tracing::debug!(term = %term, numeric = numeric.is_some(), matched = docs.len(), "Search complete");
        Ok(finish(docs, pagination))
    }

    /// Confirm `name` is a listed collection.
    pub fn resolve_collection(&self, name: &str) -> Result<String, QueryError> {
        if self.store.list_collection_names().iter().any(|n| n == name) {
            Ok(name.to_string())
        } else {
            Err(QueryError::NotFound(name.to_string()))
        }
    }

    fn filter_by_type(
        &self,
        name: &str,
        item_type: Option<ItemType>,
    ) -> Result<Vec<Document>, QueryError> {
        let collection = self.resolve_collection(name)?;
        let filter = match item_type {
            Some(t) => Filter::eq("type", t.as_str()),
            None => Filter::All,
        };
        Ok(self.store.find(&collection, &filter)?)
    }
}

/// Paginate in scan order, then serialize, sort and de-duplicate.
fn finish(docs: Vec<Document>, pagination: Pagination) -> Vec<String> {
    let mut rendered: Vec<String> = pagination
        .apply(docs)
        .iter()
        .map(Document::to_json)
        .collect();
    rendered.sort();
    rendered.dedup();
    rendered
}

/// Render results as a list body: `[a, b, c]`.
pub fn render(items: &[String]) -> String {
    format!("[{}]", items.join(", "))
}
