//! Trade API snapshot parsing
//!
//! Snapshots are the raw responses of the trade site's data endpoints:
//!
//! - `api/trade2/data/stats` - stat ids grouped by modifier type
//! - `api/trade2/data/items` - base and unique item listing
//! - `api/trade2/data/static` - trade tags and images for currency-like items

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::items::Namespace;
use crate::normalize::convert_stat_name;
use crate::{Error, Result};

/// Shared envelope of all trade data endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct Catalog<T> {
    pub result: Vec<CatalogGroup<T>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogGroup<T> {
    pub entries: Vec<T>,
}

impl<T> Catalog<T> {
    /// All entries across groups, in file order
    pub fn entries(&self) -> impl Iterator<Item = &T> {
        self.result.iter().flat_map(|group| group.entries.iter())
    }
}

/// Load a catalog snapshot from disk
pub fn load_catalog<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<Catalog<T>> {
    if !path.exists() {
        return Err(Error::MissingFile(path.to_path_buf()));
    }

    let content = fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|source| Error::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Trade stat id, kept in whatever form the API used
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TradeId {
    Number(u64),
    Text(String),
}

/// Entry of the stats endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct StatEntry {
    pub id: TradeId,
    pub text: String,
    /// Modifier type, e.g. `explicit` or `implicit`
    #[serde(rename = "type")]
    pub stat_type: String,
}

/// Entry of the items endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct ItemEntry {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "type", default)]
    pub base_type: Option<String>,
}

/// Entry of the static endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct StaticEntry {
    pub id: String,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

/// Trade ids grouped by modifier type, in catalog order
pub type TradeIds = IndexMap<String, Vec<TradeId>>;

/// Lookup from normalized stat text to trade ids
#[derive(Debug, Default, Clone)]
pub struct TradeIdResolver {
    by_text: HashMap<String, TradeIds>,
}

impl TradeIdResolver {
    /// Index every stat entry by its normalized text
    ///
    /// The same text may appear under several modifier types; ids accumulate
    /// per type in file order.
    pub fn from_catalog(catalog: &Catalog<StatEntry>) -> Self {
        let mut by_text: HashMap<String, TradeIds> = HashMap::new();

        for entry in catalog.entries() {
            let Some(text) = convert_stat_name(&entry.text) else {
                continue;
            };

            by_text
                .entry(text)
                .or_default()
                .entry(entry.stat_type.clone())
                .or_default()
                .push(entry.id.clone());
        }

        Self { by_text }
    }

    /// Trade ids for a normalized stat text
    pub fn get(&self, text: &str) -> Option<&TradeIds> {
        self.by_text.get(text)
    }

    pub fn len(&self) -> usize {
        self.by_text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_text.is_empty()
    }
}

/// Trade tag and icon for an item name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StaticData {
    #[serde(rename = "tradeTag")]
    pub trade_tag: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// Lookup from display name to static trade data
#[derive(Debug, Default, Clone)]
pub struct StaticDataResolver {
    by_name: HashMap<String, StaticData>,
}

impl StaticDataResolver {
    /// Index static entries by display text, later entries replacing earlier ones
    ///
    /// Icons are the entry's image path prefixed with `icon_cdn`.
    pub fn from_catalog(catalog: &Catalog<StaticEntry>, icon_cdn: &str) -> Self {
        let mut by_name = HashMap::new();

        for entry in catalog.entries() {
            let Some(name) = &entry.text else {
                continue;
            };

            by_name.insert(
                name.clone(),
                StaticData {
                    trade_tag: entry.id.clone(),
                    icon: entry
                        .image
                        .as_ref()
                        .map(|image| format!("{}{}", icon_cdn, image)),
                },
            );
        }

        Self { by_name }
    }

    pub fn get(&self, name: &str) -> Option<&StaticData> {
        self.by_name.get(name)
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UniqueInfo {
    pub base: Option<String>,
}

/// Unique item listed by the trade site
///
/// Names come from the trade API and are not localized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UniqueItemRecord {
    pub name: String,
    #[serde(rename = "refName")]
    pub ref_name: String,
    pub namespace: Namespace,
    pub unique: UniqueInfo,
}

/// Every named entry of the items endpoint, in listing order
pub fn unique_items(catalog: &Catalog<ItemEntry>) -> Vec<UniqueItemRecord> {
    catalog
        .entries()
        .filter_map(|entry| {
            let name = entry.name.as_ref()?;
            Some(UniqueItemRecord {
                name: name.clone(),
                ref_name: name.clone(),
                namespace: Namespace::Unique,
                unique: UniqueInfo {
                    base: entry.base_type.clone(),
                },
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats_catalog() -> Catalog<StatEntry> {
        serde_json::from_str(
            r##"{"result": [
                {"id": "explicit", "label": "Explicit", "entries": [
                    {"id": "explicit.stat_3299347043", "text": "+# to maximum Life", "type": "explicit"},
                    {"id": "explicit.stat_1", "text": "Adds # to # [Fire|Fire] Damage", "type": "explicit"}
                ]},
                {"id": "implicit", "label": "Implicit", "entries": [
                    {"id": "implicit.stat_3299347043", "text": "+# to maximum Life", "type": "implicit"},
                    {"id": 42, "text": "+# to maximum Life", "type": "implicit"},
                    {"id": "implicit.stat_2", "text": "  ", "type": "implicit"}
                ]}
            ]}"##,
        )
        .unwrap()
    }

    #[test]
    fn test_trade_ids_accumulate_per_type() {
        let resolver = TradeIdResolver::from_catalog(&stats_catalog());

        let ids = resolver.get("+# to maximum Life").unwrap();
        assert_eq!(
            ids.get("explicit").unwrap(),
            &vec![TradeId::Text("explicit.stat_3299347043".to_string())]
        );
        assert_eq!(
            ids.get("implicit").unwrap(),
            &vec![
                TradeId::Text("implicit.stat_3299347043".to_string()),
                TradeId::Number(42)
            ]
        );

        assert!(resolver.get("Adds # to # Fire Damage").is_some());
        assert_eq!(resolver.len(), 2);
    }

    #[test]
    fn test_trade_id_types_keep_catalog_order() {
        let catalog: Catalog<StatEntry> = serde_json::from_str(
            r##"{"result": [
                {"id": "pseudo", "entries": [
                    {"id": "pseudo.pseudo_total_life", "text": "+# total maximum Life", "type": "pseudo"}
                ]},
                {"id": "explicit", "entries": [
                    {"id": "explicit.stat_3299347043", "text": "+# total maximum Life", "type": "explicit"}
                ]},
                {"id": "crafted", "entries": [
                    {"id": "crafted.stat_3299347043", "text": "+# total maximum Life", "type": "crafted"}
                ]}
            ]}"##,
        )
        .unwrap();

        let resolver = TradeIdResolver::from_catalog(&catalog);
        let ids = resolver.get("+# total maximum Life").unwrap();
        let types: Vec<&str> = ids.keys().map(String::as_str).collect();
        assert_eq!(types, vec!["pseudo", "explicit", "crafted"]);

        let json = serde_json::to_string(ids).unwrap();
        assert!(json.starts_with(r#"{"pseudo":"#));
    }

    #[test]
    fn test_static_data_last_write_wins() {
        let catalog: Catalog<StaticEntry> = serde_json::from_str(
            r#"{"result": [{"id": "Currency", "entries": [
                {"id": "exalted", "text": "Exalted Orb", "image": "/gen/image/exalted.png"},
                {"id": "exalted-2", "text": "Exalted Orb", "image": "/gen/image/exalted2.png"},
                {"id": "sep", "text": null},
                {"id": "chaos", "text": "Chaos Orb"}
            ]}]}"#,
        )
        .unwrap();

        let statics = StaticDataResolver::from_catalog(&catalog, "https://web.poecdn.com");
        assert_eq!(statics.len(), 2);

        let exalted = statics.get("Exalted Orb").unwrap();
        assert_eq!(exalted.trade_tag, "exalted-2");
        assert_eq!(
            exalted.icon.as_deref(),
            Some("https://web.poecdn.com/gen/image/exalted2.png")
        );
        assert_eq!(statics.get("Chaos Orb").unwrap().icon, None);
    }

    #[test]
    fn test_unique_items() {
        let catalog: Catalog<ItemEntry> = serde_json::from_str(
            r#"{"result": [{"id": "accessory", "label": "Accessories", "entries": [
                {"type": "Leather Belt"},
                {"name": "Headhunter", "type": "Leather Belt", "flags": {"unique": true}}
            ]}]}"#,
        )
        .unwrap();

        let uniques = unique_items(&catalog);
        assert_eq!(uniques.len(), 1);
        assert_eq!(uniques[0].name, "Headhunter");
        assert_eq!(uniques[0].unique.base.as_deref(), Some("Leather Belt"));

        let json = serde_json::to_string(&uniques[0]).unwrap();
        assert_eq!(
            json,
            r#"{"name":"Headhunter","refName":"Headhunter","namespace":"UNIQUE","unique":{"base":"Leather Belt"}}"#
        );
    }

    #[test]
    fn test_load_catalog_missing() {
        let temp_dir = tempfile::tempdir().unwrap();
        let err = load_catalog::<StatEntry>(&temp_dir.path().join("api_stats.json")).unwrap_err();
        assert!(matches!(err, Error::MissingFile(_)));
    }

    #[test]
    fn test_load_catalog_invalid_json() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("api_items.json");
        fs::write(&path, "{\"result\": 1}").unwrap();

        let err = load_catalog::<ItemEntry>(&path).unwrap_err();
        assert!(matches!(err, Error::Json { .. }));
    }
}
