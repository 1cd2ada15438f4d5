//! Game table rows
//!
//! Tables are JSON exports of the game's `.datc64` files (as produced by
//! poe-dat-viewer), one array of row objects per table. Foreign keys are row
//! indices into the referenced table; `_index` is the row's own index.

#![allow(non_snake_case)]

use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::{Error, Result};

#[derive(Debug, Clone, Deserialize)]
pub struct BaseItemType {
    #[serde(default)]
    pub _index: Option<u32>,
    #[serde(default)]
    pub Name: String,
    #[serde(default)]
    pub ItemClassesKey: Option<u32>,
    #[serde(default)]
    pub DropLevel: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ItemClass {
    #[serde(default)]
    pub _index: Option<u32>,
    /// Internal class id, e.g. `Belt`
    #[serde(default)]
    pub Id: String,
    /// Localized class name
    #[serde(default)]
    pub Name: String,
    #[serde(default)]
    pub ItemClassCategory: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ItemClassCategory {
    #[serde(default)]
    pub _index: Option<u32>,
    #[serde(default)]
    pub Id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArmourType {
    #[serde(default)]
    pub BaseItemTypesKey: Option<u32>,
    #[serde(default)]
    pub ArmourMin: i64,
    #[serde(default)]
    pub ArmourMax: i64,
    #[serde(default)]
    pub EvasionMin: i64,
    #[serde(default)]
    pub EvasionMax: i64,
    #[serde(default)]
    pub EnergyShieldMin: i64,
    #[serde(default)]
    pub EnergyShieldMax: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeaponType {
    #[serde(default)]
    pub BaseItemTypesKey: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SkillGem {
    #[serde(default)]
    pub BaseItemTypesKey: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SkillGemInfo {
    #[serde(default)]
    pub _index: Option<u32>,
    #[serde(default)]
    pub Id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Stat {
    #[serde(default)]
    pub _index: Option<u32>,
    /// Stat id as used by description files, e.g. `base_maximum_life`
    #[serde(default)]
    pub Id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Mod {
    #[serde(default)]
    pub Id: String,
    #[serde(default)]
    pub StatsKey1: Option<u32>,
}

/// All tables needed for one locale
#[derive(Debug, Clone, Default)]
pub struct Tables {
    pub base_items: Vec<BaseItemType>,
    pub item_classes: Vec<ItemClass>,
    pub item_class_categories: Vec<ItemClassCategory>,
    pub armour_types: Vec<ArmourType>,
    pub weapon_types: Vec<WeaponType>,
    pub skill_gems: Vec<SkillGem>,
    pub skill_gem_info: Vec<SkillGemInfo>,
    pub stats: Vec<Stat>,
    pub mods: Vec<Mod>,
}

impl Tables {
    /// Load every table from a locale's table directory
    pub fn load(dir: &Path) -> Result<Self> {
        let tables = Self {
            base_items: load_table(dir, "BaseItemTypes")?,
            item_classes: load_table(dir, "ItemClasses")?,
            item_class_categories: load_table(dir, "ItemClassCategories")?,
            armour_types: load_table(dir, "ArmourTypes")?,
            weapon_types: load_table(dir, "WeaponTypes")?,
            skill_gems: load_table(dir, "SkillGems")?,
            skill_gem_info: load_table(dir, "SkillGemInfo")?,
            stats: load_table(dir, "Stats")?,
            mods: load_table(dir, "Mods")?,
        };

        debug!(
            "Loaded {} base items, {} classes, {} gems ({} gem infos), {} stats, {} mods",
            tables.base_items.len(),
            tables.item_classes.len(),
            tables.skill_gems.len(),
            tables.skill_gem_info.len(),
            tables.stats.len(),
            tables.mods.len()
        );

        Ok(tables)
    }
}

/// Load `<dir>/<name>.json` as a list of rows
pub fn load_table<T: DeserializeOwned>(dir: &Path, name: &str) -> Result<Vec<T>> {
    let path = dir.join(format!("{}.json", name));
    if !path.exists() {
        return Err(Error::MissingFile(path));
    }

    let content = fs::read_to_string(&path)?;
    serde_json::from_str(&content).map_err(|source| Error::Json { path, source })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_item_row_defaults() {
        let rows: Vec<BaseItemType> = serde_json::from_str(
            r#"[
                {"_index": 0, "Name": "Leather Belt", "ItemClassesKey": 3, "DropLevel": 1, "Width": 2},
                {"_index": 1, "Name": "", "ItemClassesKey": null},
                {"Name": "No Index"}
            ]"#,
        )
        .unwrap();

        assert_eq!(rows[0]._index, Some(0));
        assert_eq!(rows[0].ItemClassesKey, Some(3));
        assert_eq!(rows[1].ItemClassesKey, None);
        assert_eq!(rows[1].DropLevel, None);
        assert_eq!(rows[2]._index, None);
    }

    #[test]
    fn test_load_table_missing() {
        let temp_dir = tempfile::tempdir().unwrap();
        let err = load_table::<Stat>(temp_dir.path(), "Stats").unwrap_err();
        match err {
            Error::MissingFile(path) => assert!(path.ends_with("Stats.json")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_load_tables() {
        let temp_dir = tempfile::tempdir().unwrap();
        let dir = temp_dir.path();
        for name in [
            "BaseItemTypes",
            "ItemClasses",
            "ItemClassCategories",
            "ArmourTypes",
            "WeaponTypes",
            "SkillGems",
            "SkillGemInfo",
            "Stats",
        ] {
            fs::write(dir.join(format!("{}.json", name)), "[]").unwrap();
        }
        fs::write(
            dir.join("Mods.json"),
            r#"[{"Id": "Strength1", "StatsKey1": 7}, {"Id": "Empty", "StatsKey1": null}]"#,
        )
        .unwrap();

        let tables = Tables::load(dir).unwrap();
        assert!(tables.base_items.is_empty());
        assert_eq!(tables.mods.len(), 2);
        assert_eq!(tables.mods[0].StatsKey1, Some(7));
        assert_eq!(tables.mods[1].StatsKey1, None);
    }
}
