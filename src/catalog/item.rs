//! Config item model and the fixed set of item categories.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::store::Document;

/// Prefix of every per-mod collection name.
pub const COLLECTION_PREFIX: &str = "data.";

/// Name of the collection owned by `mod_name`.
pub fn collection_name(mod_name: &str) -> String {
    format!("{COLLECTION_PREFIX}{mod_name}")
}

/// Item category. Serialized with the exact names used in source files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ItemType {
    Primaries,
    Secondaries,
    Launchers,
    Throwables,
    Explosives,
    Muzzles,
    Pointers,
    Optics,
    Bipods,
    Tools,
    Terminals,
    Maps,
    #[serde(rename = "GPSs")]
    Gpss,
    Radios,
    Compasses,
    Watches,
    Facewear,
    Headgear,
    Goggles,
    Binoculars,
    Magazines,
    Uniforms,
    Vests,
    Backpacks,
}

impl ItemType {
    pub const ALL: [ItemType; 24] = [
        ItemType::Primaries,
        ItemType::Secondaries,
        ItemType::Launchers,
        ItemType::Throwables,
        ItemType::Explosives,
        ItemType::Muzzles,
        ItemType::Pointers,
        ItemType::Optics,
        ItemType::Bipods,
        ItemType::Tools,
        ItemType::Terminals,
        ItemType::Maps,
        ItemType::Gpss,
        ItemType::Radios,
        ItemType::Compasses,
        ItemType::Watches,
        ItemType::Facewear,
        ItemType::Headgear,
        ItemType::Goggles,
        ItemType::Binoculars,
        ItemType::Magazines,
        ItemType::Uniforms,
        ItemType::Vests,
        ItemType::Backpacks,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            ItemType::Primaries => "Primaries",
            ItemType::Secondaries => "Secondaries",
            ItemType::Launchers => "Launchers",
            ItemType::Throwables => "Throwables",
            ItemType::Explosives => "Explosives",
            ItemType::Muzzles => "Muzzles",
            ItemType::Pointers => "Pointers",
            ItemType::Optics => "Optics",
            ItemType::Bipods => "Bipods",
            ItemType::Tools => "Tools",
            ItemType::Terminals => "Terminals",
            ItemType::Maps => "Maps",
            ItemType::Gpss => "GPSs",
            ItemType::Radios => "Radios",
            ItemType::Compasses => "Compasses",
            ItemType::Watches => "Watches",
            ItemType::Facewear => "Facewear",
            ItemType::Headgear => "Headgear",
            ItemType::Goggles => "Goggles",
            ItemType::Binoculars => "Binoculars",
            ItemType::Magazines => "Magazines",
            ItemType::Uniforms => "Uniforms",
            ItemType::Vests => "Vests",
            ItemType::Backpacks => "Backpacks",
        }
    }

    /// All category names, in declaration order.
    pub fn names() -> Vec<String> {
        Self::ALL.iter().map(|t| t.as_str().to_string()).collect()
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemType {
    type Err = ();

    /// Exact, case-sensitive match on the category name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|t| t.as_str() == s).ok_or(())
    }
}

/// A single game config entry (weapon, gear, ...).
///
/// Wraps the stored document and exposes the identity fields every item carries.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigItem(Document);

impl ConfigItem {
    pub const TYPE_FIELD: &'static str = "type";
    pub const MOD_FIELD: &'static str = "mod";
    pub const CLASSNAME_FIELD: &'static str = "class";

    pub fn new(document: Document) -> Self {
        Self(document)
    }

    /// Category as written in the source; may be empty for placeholder entries.
    pub fn item_type(&self) -> Option<&str> {
        self.0.get_str(Self::TYPE_FIELD)
    }

    pub fn mod_name(&self) -> Option<&str> {
        self.0.get_str(Self::MOD_FIELD)
    }

    /// Class identity; source files use either `class` or `classname`.
    pub fn classname(&self) -> Option<&str> {
        self.0
            .get_str(Self::CLASSNAME_FIELD)
            .or_else(|| self.0.get_str("classname"))
    }

    /// Collection this item belongs to, when it names its mod.
    pub fn collection(&self) -> Option<String> {
        self.mod_name()
            .filter(|m| !m.is_empty())
            .map(collection_name)
    }

    pub fn document(&self) -> &Document {
        &self.0
    }

    pub fn into_document(self) -> Document {
        self.0
    }
}
