//! Stat record assembly
//!
//! Every mod row points at its primary stat; the stat's translation supplies
//! display text and matchers, and the matchers are probed against the trade
//! stat texts for trade ids.

use indexmap::IndexMap;
use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

use crate::tables::Tables;
use crate::trade::{TradeIdResolver, TradeIds};
use crate::translations::{Matcher, ModTranslation, ModTranslations};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TradeInfo {
    pub ids: TradeIds,
}

/// A stat as consumed by poe-trade
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatRecord {
    #[serde(rename = "ref")]
    pub reference: Option<String>,
    /// Always 1, poe-trade does not use it yet
    pub better: i32,
    pub id: String,
    pub matchers: Vec<Matcher>,
    pub trade: TradeInfo,
}

/// Trade ids of the last matcher that has any
pub fn resolve_trade_ids(matchers: &[Matcher], trade: &TradeIdResolver) -> TradeIds {
    matchers
        .iter()
        .filter_map(|matcher| trade.get(&matcher.string))
        .last()
        .cloned()
        .unwrap_or_default()
}

fn stat_record(id: &str, translation: &ModTranslation, trade: &TradeIdResolver) -> StatRecord {
    StatRecord {
        reference: translation.reference.clone(),
        better: 1,
        id: id.to_string(),
        matchers: translation.matchers.clone(),
        trade: TradeInfo {
            ids: resolve_trade_ids(&translation.matchers, trade),
        },
    }
}

/// Build one stat record per translated stat referenced by a mod
pub fn assemble_stats(
    tables: &Tables,
    translations: &ModTranslations,
    trade: &TradeIdResolver,
) -> IndexMap<String, StatRecord> {
    let stat_ids: HashMap<u32, &str> = tables
        .stats
        .iter()
        .filter_map(|stat| Some((stat._index?, stat.Id.as_str())))
        .collect();

    let mut records = IndexMap::new();

    for row in &tables.mods {
        let Some(stats_key) = row.StatsKey1 else {
            continue;
        };
        let Some(stat_id) = stat_ids.get(&stats_key) else {
            debug!("Mod {} references unknown stat {}", row.Id, stats_key);
            continue;
        };
        let Some(translation) = translations.get(stat_id) else {
            debug!("No translation for stat {} of mod {}", stat_id, row.Id);
            continue;
        };

        let record = stat_record(stat_id, translation, trade);
        if record.trade.ids.is_empty() {
            debug!("No trade ids found for {}", stat_id);
        }
        records.insert(stat_id.to_string(), record);
    }

    records
}
