//! One locale run, from input files to written output
//!
//! Trade snapshots and the description file listing are loaded once and
//! shared read-only; everything else is built fresh for each locale.

use indexmap::IndexMap;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::emit::{EmitSummary, Emitter};
use crate::items::{ItemAssembler, ItemRecord, Namespace};
use crate::mods::{assemble_stats, StatRecord};
use crate::source::{DescriptionSource, DESCRIPTION_EXTENSION};
use crate::tables::Tables;
use crate::trade::{
    load_catalog, unique_items, ItemEntry, StatEntry, StaticDataResolver, StaticEntry,
    TradeIdResolver, UniqueItemRecord,
};
use crate::translations::ModTranslations;
use crate::Result;

/// Game language name (table directory) and output code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locale {
    pub name: String,
    pub code: String,
}

impl Locale {
    pub fn new(name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            code: code.into(),
        }
    }
}

/// Input and output locations of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunPaths {
    pub descriptions_dir: PathBuf,
    pub description_extension: String,
    pub tables_dir: PathBuf,
    pub api_stats: PathBuf,
    pub api_items: PathBuf,
    pub api_static: PathBuf,
    pub output_dir: PathBuf,
    pub dump_dir: PathBuf,
}

impl RunPaths {
    /// Standard layout below a working directory
    pub fn from_root(root: &Path) -> Self {
        Self {
            descriptions_dir: root.join("descriptions"),
            description_extension: DESCRIPTION_EXTENSION.to_string(),
            tables_dir: root.join("tables"),
            api_stats: root.join("api_stats.json"),
            api_items: root.join("api_items.json"),
            api_static: root.join("api_static.json"),
            output_dir: root.join("../renderer/public/data"),
            dump_dir: root.to_path_buf(),
        }
    }
}

/// Trade API data shared by all locales
#[derive(Debug, Clone)]
pub struct TradeSnapshots {
    pub trade_ids: TradeIdResolver,
    pub statics: StaticDataResolver,
    pub uniques: Vec<UniqueItemRecord>,
}

impl TradeSnapshots {
    /// Load the stats, items and static snapshots
    pub fn load(paths: &RunPaths, icon_cdn: &str) -> Result<Self> {
        let stats = load_catalog::<StatEntry>(&paths.api_stats)?;
        let items = load_catalog::<ItemEntry>(&paths.api_items)?;
        let statics = load_catalog::<StaticEntry>(&paths.api_static)?;

        let snapshots = Self {
            trade_ids: TradeIdResolver::from_catalog(&stats),
            statics: StaticDataResolver::from_catalog(&statics, icon_cdn),
            uniques: unique_items(&items),
        };

        info!(
            "Loaded trade data: {} stat texts, {} static entries, {} uniques",
            snapshots.trade_ids.len(),
            snapshots.statics.len(),
            snapshots.uniques.len()
        );

        Ok(snapshots)
    }
}

/// Assembled records of one locale
#[derive(Debug, Clone, Default)]
pub struct LocaleOutput {
    pub items: IndexMap<u32, ItemRecord>,
    pub stats: IndexMap<String, StatRecord>,
}

impl LocaleOutput {
    /// Assemble items and stats from loaded tables and translations
    pub fn assemble(
        tables: &Tables,
        translations: &ModTranslations,
        trade_ids: &TradeIdResolver,
    ) -> Self {
        let stats = assemble_stats(tables, translations, trade_ids);
        let items = ItemAssembler::new(tables).assemble();

        let gems = items
            .values()
            .filter(|item| item.namespace == Namespace::Gem)
            .count();
        info!(
            "Assembled {} items ({} gems) and {} stats",
            items.len(),
            gems,
            stats.len()
        );

        Self { items, stats }
    }
}

/// Run one locale: load tables, parse descriptions, assemble and write
pub fn run_locale(
    locale: &Locale,
    paths: &RunPaths,
    snapshots: &TradeSnapshots,
    descriptions: &DescriptionSource,
) -> Result<EmitSummary> {
    info!("Starting parser for {}", locale.name);

    let tables = Tables::load(&paths.tables_dir.join(&locale.name))?;

    let translations = ModTranslations::from_files(descriptions.read_all())?;
    info!(
        "Parsed {} description files into {} stat translations",
        descriptions.files().len(),
        translations.len()
    );

    let output = LocaleOutput::assemble(&tables, &translations, &snapshots.trade_ids);

    Emitter::new(paths.output_dir.join(&locale.code), &paths.dump_dir).write_all(
        &output.items,
        &snapshots.uniques,
        &snapshots.statics,
        &output.stats,
    )
}
