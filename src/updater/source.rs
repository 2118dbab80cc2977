//! Source file discovery and item conversion.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::catalog::ConfigItem;
use crate::store::Document;
use crate::updater::IngestError;

/// Source files found in a directory.
#[derive(Debug, Default)]
pub struct SourceListing {
    /// JSON files, in ascending path order.
    pub json: Vec<PathBuf>,
    /// Everything else.
    pub skipped: Vec<PathBuf>,
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}

/// List the regular files of `dir`, split into JSON sources and skipped files.
pub fn list_sources(dir: &Path) -> std::io::Result<SourceListing> {
    let mut listing = SourceListing::default();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        if is_json(&path) {
            listing.json.push(path);
        } else {
            listing.skipped.push(path);
        }
    }
    listing.json.sort();
    listing.skipped.sort();
    Ok(listing)
}

/// Read a source file as a JSON array of items.
pub fn read_items(path: &Path) -> Result<Vec<Value>, IngestError> {
    let content = fs::read_to_string(path).map_err(|source| IngestError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| IngestError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Convert one array element into a config item and its target collection.
///
/// Items must be objects with a non-empty string `type` and `mod`; all other
/// fields are carried through untouched.
pub fn to_config_item(index: usize, value: Value) -> Result<(String, ConfigItem), IngestError> {
    let doc = Document::try_from(value).map_err(|_| IngestError::NotAnObject { index })?;
    let item = ConfigItem::new(doc);
    if item.item_type().map_or(true, str::is_empty) {
        return Err(IngestError::MissingType { index });
    }
    let collection = item.collection().ok_or(IngestError::MissingMod { index })?;
    Ok((collection, item))
}
