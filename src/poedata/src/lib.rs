//! # poedata
//!
//! Generates the item and stat data files used by poe-trade from dumped
//! Path of Exile game tables, stat description files and trade API snapshots.
//!
//! # Data flow
//!
//! - `trade` - trade API snapshots: stat ids by text, static trade tags, uniques
//! - `normalize` - stat template normalization shared by both sides of the match
//! - `source` / `translations` - description files into per-stat matchers
//! - `tables` / `items` / `mods` - game tables into item and stat records
//! - `emit` - line-delimited JSON output and diagnostic dumps
//! - `pipeline` - one locale run end to end
//!
//! ## Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let normalized = poedata::convert_stat_name("Adds {0} to {1} [Fire|Fire] Damage");
//! assert_eq!(normalized.as_deref(), Some("Adds # to # Fire Damage"));
//!
//! let paths = poedata::RunPaths::from_root(Path::new("."));
//! let snapshots = poedata::TradeSnapshots::load(&paths, "https://web.poecdn.com/")?;
//! let descriptions =
//!     poedata::DescriptionSource::open(&paths.descriptions_dir, &paths.description_extension)?;
//! let locale = poedata::Locale::new("English", "en");
//! poedata::run_locale(&locale, &paths, &snapshots, &descriptions)?;
//! # Ok(())
//! # }
//! ```

pub mod emit;
pub mod items;
pub mod mods;
pub mod normalize;
pub mod pipeline;
pub mod source;
pub mod tables;
pub mod trade;
pub mod translations;

use std::path::PathBuf;

#[doc(inline)]
pub use emit::{EmitSummary, Emitter};
#[doc(inline)]
pub use items::{ItemAssembler, ItemClassInfo, ItemRecord, Namespace};
#[doc(inline)]
pub use mods::{assemble_stats, StatRecord};
#[doc(inline)]
pub use normalize::{convert_stat_name, normalize_placeholders, resolve_brackets};
#[doc(inline)]
pub use pipeline::{run_locale, Locale, LocaleOutput, RunPaths, TradeSnapshots};
#[doc(inline)]
pub use source::{DescriptionFile, DescriptionSource};
#[doc(inline)]
pub use tables::Tables;
#[doc(inline)]
pub use trade::{StaticDataResolver, TradeId, TradeIdResolver, UniqueItemRecord};
#[doc(inline)]
pub use translations::{Matcher, MatcherKind, ModTranslation, ModTranslations};

/// Sentinel icon for items the static trade data has no picture for
pub const ICON_NOT_FOUND: &str = "%NOT_FOUND%";

/// Errors from loading and parsing game data
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Required file not found: {}", .0.display())]
    MissingFile(PathBuf),

    #[error("Failed to parse JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize JSON: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Malformed description block in {} at line {line}: {reason}", path.display())]
    MalformedBlock {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("Invalid UTF-16 text in {}", .0.display())]
    Utf16(PathBuf),
}

pub type Result<T> = std::result::Result<T, Error>;
