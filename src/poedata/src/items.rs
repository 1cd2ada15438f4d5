//! Item record assembly
//!
//! Base item rows are merged with class, gem, weapon and armour rows into one
//! record per base item. Passes run in a fixed order and each one only
//! touches items created by the base pass.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::warn;

use crate::tables::Tables;
use crate::ICON_NOT_FOUND;

/// Coarse item kind used by poe-trade to pick search and rendering logic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Namespace {
    Item,
    Gem,
    Unique,
}

/// Class id and parent category code of an item class
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemClassInfo {
    pub name: String,
    pub short: Option<String>,
}

/// Item class, first as the raw table key and later as the class name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ItemClassRef {
    Key(Option<u32>),
    Name(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Craftable {
    pub category: String,
}

/// Armour, evasion and energy shield ranges as `[min, max]`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ArmourRanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ar: Option<[i64; 2]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ev: Option<[i64; 2]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub es: Option<[i64; 2]>,
}

impl ArmourRanges {
    pub fn is_empty(&self) -> bool {
        self.ar.is_none() && self.ev.is_none() && self.es.is_none()
    }
}

/// Only ranges reaching above 1 carry a real defence value
fn defence_range(min: i64, max: i64) -> Option<[i64; 2]> {
    (max > 1).then_some([min, max])
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GemInfo {
    pub awakened: bool,
    pub transfigured: bool,
}

/// A base item assembled from the game tables
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemRecord {
    pub name: String,
    #[serde(rename = "refName")]
    pub ref_name: String,
    pub namespace: Namespace,
    pub class: ItemClassRef,
    #[serde(rename = "dropLevel")]
    pub drop_level: Option<u32>,
    pub icon: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub craftable: Option<Craftable>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gem: Option<GemInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub armour: Option<ArmourRanges>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<ItemClassInfo>,
}

impl ItemRecord {
    fn class_key(&self) -> Option<u32> {
        match self.class {
            ItemClassRef::Key(key) => key,
            ItemClassRef::Name(_) => None,
        }
    }
}

/// Builds item records for one locale
pub struct ItemAssembler<'a> {
    tables: &'a Tables,
    classes: HashMap<u32, ItemClassInfo>,
    items: IndexMap<u32, ItemRecord>,
}

impl<'a> ItemAssembler<'a> {
    /// Index item classes by row, resolving their category codes
    pub fn new(tables: &'a Tables) -> Self {
        let categories: HashMap<u32, &str> = tables
            .item_class_categories
            .iter()
            .filter_map(|cat| Some((cat._index?, cat.Id.as_str())))
            .collect();

        let classes = tables
            .item_classes
            .iter()
            .filter_map(|class| {
                let index = class._index?;
                let short = class
                    .ItemClassCategory
                    .and_then(|cat| categories.get(&cat))
                    .map(|s| s.to_string());
                Some((
                    index,
                    ItemClassInfo {
                        name: class.Id.clone(),
                        short,
                    },
                ))
            })
            .collect();

        Self {
            tables,
            classes,
            items: IndexMap::new(),
        }
    }

    /// Class info for a class key
    pub fn class_info(&self, key: Option<u32>) -> Option<&ItemClassInfo> {
        self.classes.get(&key?)
    }

    /// Run all passes and return the items keyed by base item row
    pub fn assemble(mut self) -> IndexMap<u32, ItemRecord> {
        self.base_pass();
        self.gem_pass();
        self.weapon_pass();
        self.armour_pass();
        self.class_pass();
        self.items
    }

    fn base_pass(&mut self) {
        let tables = self.tables;
        for row in &tables.base_items {
            let Some(index) = row._index else {
                continue;
            };
            if row.Name.is_empty() {
                continue;
            }

            let craftable = match self.class_info(row.ItemClassesKey) {
                Some(info) => {
                    let category = if row.Name.to_lowercase().contains("flask") {
                        Some("Flask".to_string())
                    } else {
                        info.short.clone()
                    };
                    category.map(|category| Craftable { category })
                }
                None => {
                    warn!("No class info found for {}", row.Name);
                    None
                }
            };

            self.items.insert(
                index,
                ItemRecord {
                    name: row.Name.clone(),
                    ref_name: row.Name.clone(),
                    namespace: Namespace::Item,
                    class: ItemClassRef::Key(row.ItemClassesKey),
                    drop_level: row.DropLevel,
                    icon: ICON_NOT_FOUND.to_string(),
                    craftable,
                    gem: None,
                    armour: None,
                    category: None,
                },
            );
        }
    }

    fn gem_pass(&mut self) {
        let tables = self.tables;
        for row in &tables.skill_gems {
            let Some(item) = row.BaseItemTypesKey.and_then(|key| self.items.get_mut(&key)) else {
                continue;
            };

            item.namespace = Namespace::Gem;
            item.gem = Some(GemInfo {
                awakened: false,
                transfigured: false,
            });
        }
    }

    /// Weapons take their craftable category from their class, even where the
    /// base pass applied the flask override; without one the facet is dropped
    fn weapon_pass(&mut self) {
        let tables = self.tables;
        for row in &tables.weapon_types {
            let Some(item) = row.BaseItemTypesKey.and_then(|key| self.items.get_mut(&key)) else {
                continue;
            };

            let short = item
                .class_key()
                .and_then(|key| self.classes.get(&key))
                .and_then(|info| info.short.clone());

            if short.is_none() {
                warn!("No weapon category found for {}", item.name);
            }
            item.craftable = short.map(|category| Craftable { category });
        }
    }

    fn armour_pass(&mut self) {
        let tables = self.tables;
        for row in &tables.armour_types {
            let Some(item) = row.BaseItemTypesKey.and_then(|key| self.items.get_mut(&key)) else {
                continue;
            };

            item.armour = Some(ArmourRanges {
                ar: defence_range(row.ArmourMin, row.ArmourMax),
                ev: defence_range(row.EvasionMin, row.EvasionMax),
                es: defence_range(row.EnergyShieldMin, row.EnergyShieldMax),
            });
        }
    }

    /// Class rows are matched by their own index against the item keys
    fn class_pass(&mut self) {
        let tables = self.tables;
        for row in &tables.item_classes {
            let Some(index) = row._index else {
                continue;
            };
            let Some(item) = self.items.get_mut(&index) else {
                continue;
            };

            item.class = ItemClassRef::Name(row.Name.clone());
            item.category = self.classes.get(&index).cloned();
        }
    }
}
