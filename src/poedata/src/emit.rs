//! Output writing
//!
//! poe-trade reads two line-delimited JSON files per locale:
//!
//! - `items.ndjson` - base items followed by uniques
//! - `stats.ndjson` - stat records, one per distinct content
//!
//! Full item and mod maps are also dumped as pretty JSON for inspection.

use indexmap::IndexMap;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use tracing::info;

use crate::items::{ArmourRanges, Craftable, GemInfo, ItemRecord, Namespace};
use crate::mods::StatRecord;
use crate::trade::{StaticDataResolver, UniqueItemRecord};
use crate::Result;

pub const ITEMS_FILE: &str = "items.ndjson";
pub const STATS_FILE: &str = "stats.ndjson";
pub const ITEMS_DUMP_FILE: &str = "items_dump.json";
pub const MODS_DUMP_FILE: &str = "mods_dump.json";

/// Item as written to `items.ndjson`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemOutput<'a> {
    pub name: &'a str,
    #[serde(rename = "refName")]
    pub ref_name: &'a str,
    pub namespace: Namespace,
    pub icon: &'a str,
    #[serde(rename = "tradeTag", skip_serializing_if = "Option::is_none")]
    pub trade_tag: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub craftable: Option<&'a Craftable>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub armour: Option<&'a ArmourRanges>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gem: Option<&'a GemInfo>,
}

impl<'a> ItemOutput<'a> {
    /// Project an item, taking trade tag and icon from static trade data
    pub fn project(item: &'a ItemRecord, statics: &'a StaticDataResolver) -> Self {
        let mut out = Self {
            name: &item.name,
            ref_name: &item.name,
            namespace: item.namespace,
            icon: &item.icon,
            trade_tag: None,
            craftable: item.craftable.as_ref(),
            armour: item.armour.as_ref().filter(|armour| !armour.is_empty()),
            gem: item.gem.as_ref(),
        };

        if let Some(data) = statics.get(&item.name) {
            out.trade_tag = Some(data.trade_tag.as_str());
            if let Some(icon) = data.icon.as_deref() {
                out.icon = icon;
            }
        }

        out
    }
}

/// Line counts of one emission
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmitSummary {
    pub items: usize,
    pub uniques: usize,
    pub stats: usize,
    pub duplicate_stats: usize,
}

/// Writes the output files of one locale
pub struct Emitter {
    out_dir: PathBuf,
    dump_dir: PathBuf,
}

impl Emitter {
    pub fn new(out_dir: impl Into<PathBuf>, dump_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
            dump_dir: dump_dir.into(),
        }
    }

    /// Write items, stats and dumps
    pub fn write_all(
        &self,
        items: &IndexMap<u32, ItemRecord>,
        uniques: &[UniqueItemRecord],
        statics: &StaticDataResolver,
        stats: &IndexMap<String, StatRecord>,
    ) -> Result<EmitSummary> {
        fs::create_dir_all(&self.out_dir)?;
        fs::create_dir_all(&self.dump_dir)?;

        let mut file = BufWriter::new(File::create(self.out_dir.join(ITEMS_FILE))?);
        write_items(&mut file, items, uniques, statics)?;
        file.flush()?;

        let mut file = BufWriter::new(File::create(self.out_dir.join(STATS_FILE))?);
        let (written, duplicates) = write_stats(&mut file, stats.values())?;
        file.flush()?;

        fs::write(
            self.dump_dir.join(ITEMS_DUMP_FILE),
            serde_json::to_string_pretty(items)?,
        )?;
        fs::write(
            self.dump_dir.join(MODS_DUMP_FILE),
            serde_json::to_string_pretty(stats)?,
        )?;

        let summary = EmitSummary {
            items: items.len(),
            uniques: uniques.len(),
            stats: written,
            duplicate_stats: duplicates,
        };

        info!(
            "Wrote {} items, {} uniques and {} stats ({} duplicates dropped) to {}",
            summary.items,
            summary.uniques,
            summary.stats,
            summary.duplicate_stats,
            self.out_dir.display()
        );

        Ok(summary)
    }
}

fn write_line<W: Write, T: Serialize>(out: &mut W, value: &T) -> Result<()> {
    serde_json::to_writer(&mut *out, value)?;
    out.write_all(b"\n")?;
    Ok(())
}

/// Write projected items followed by unique items, one per line
pub fn write_items<W: Write>(
    out: &mut W,
    items: &IndexMap<u32, ItemRecord>,
    uniques: &[UniqueItemRecord],
    statics: &StaticDataResolver,
) -> Result<()> {
    for item in items.values() {
        write_line(out, &ItemOutput::project(item, statics))?;
    }
    for unique in uniques {
        write_line(out, unique)?;
    }
    Ok(())
}

/// SHA-256 of a stat record's JSON form
pub fn content_hash(record: &StatRecord) -> Result<String> {
    let json = serde_json::to_vec(record)?;
    Ok(hex::encode(Sha256::digest(&json)))
}

/// Write stat records one per line, skipping repeated content
///
/// Returns the number of lines written and of records dropped.
pub fn write_stats<'a, W, I>(out: &mut W, records: I) -> Result<(usize, usize)>
where
    W: Write,
    I: IntoIterator<Item = &'a StatRecord>,
{
    let mut seen = HashSet::new();
    let mut written = 0;
    let mut duplicates = 0;

    for record in records {
        if !seen.insert(content_hash(record)?) {
            duplicates += 1;
            continue;
        }
        write_line(out, record)?;
        written += 1;
    }

    Ok((written, duplicates))
}
