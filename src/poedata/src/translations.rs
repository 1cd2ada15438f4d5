//! Stat description parsing and matcher derivation
//!
//! Description files are line oriented:
//!
//! ```text
//! description
//!     1 local_fire_damage
//!     1
//!         # "Adds {0} to {1} [Fire|Fire] Damage"
//! ```
//!
//! The first line after `description` lists the stat ids covered by the
//! block, the second the number of templates, followed by that many quoted
//! templates. Only the first template list (the default language) is read.
//!
//! Each template is turned into several matcher strings. The trade site's
//! stat texts do not follow one convention, so every plausible rendering is
//! kept and probed later.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::debug;

use crate::normalize::{convert_stat_name, normalize_placeholders};
use crate::source::DescriptionFile;
use crate::{Error, Result};

const BLOCK_START: &str = "description";
const NEGATE: &str = "negate";

/// Which rendering of a template a matcher string came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatcherKind {
    /// Canonical form with `+#` folded to `#`
    #[serde(rename = "matcher")]
    Matcher,
    /// Canonical form as shown in game
    #[serde(rename = "lang")]
    Lang,
    /// Template exactly as written in the description file
    #[serde(rename = "raw")]
    Raw,
    /// Raw template with number placeholders replaced
    #[serde(rename = "not_so_raw")]
    NotSoRaw,
    /// `NotSoRaw` with `+#` folded to `#`
    #[serde(rename = "not_so_raw_2")]
    NotSoRaw2,
}

/// A candidate string for matching a stat against trade stat texts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Matcher {
    pub string: String,
    pub negate: bool,
    #[serde(rename = "type")]
    pub kind: MatcherKind,
}

/// Display text and matchers for one stat id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModTranslation {
    #[serde(rename = "ref")]
    pub reference: Option<String>,
    pub matchers: Vec<Matcher>,
}

/// A raw `description` block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptionBlock {
    /// Stat ids covered by this block
    pub ids: Vec<String>,
    /// Quoted templates, with negated renderings cut at the `negate` marker
    pub templates: Vec<String>,
}

/// Ordered matcher list with unique strings
#[derive(Debug, Default)]
struct MatcherSet {
    matchers: Vec<Matcher>,
    seen: HashSet<String>,
}

impl MatcherSet {
    fn add(&mut self, string: &str, negate: bool, kind: MatcherKind) {
        if self.seen.insert(string.to_string()) {
            self.matchers.push(Matcher {
                string: string.to_string(),
                negate,
                kind,
            });
        }
    }
}

/// Parse all description blocks in a file
pub fn parse_blocks(path: &Path, content: &str) -> Result<Vec<DescriptionBlock>> {
    let lines: Vec<&str> = content.lines().collect();
    let malformed = |line: usize, reason: String| Error::MalformedBlock {
        path: path.to_path_buf(),
        line: line + 1,
        reason,
    };
    let line_at = |i: usize| {
        lines
            .get(i)
            .copied()
            .ok_or_else(|| malformed(i, "unexpected end of file".to_string()))
    };

    let mut blocks = Vec::new();

    for (i, line) in lines.iter().enumerate() {
        if *line != BLOCK_START {
            continue;
        }

        let ids = parse_id_line(line_at(i + 1)?);

        let count_line = line_at(i + 2)?.trim();
        let count: usize = count_line
            .parse()
            .map_err(|_| malformed(i + 2, format!("expected template count, got {:?}", count_line)))?;

        let mut templates = Vec::with_capacity(count);
        for j in 0..count {
            let index = i + 3 + j;
            let template = extract_template(line_at(index)?.trim())
                .ok_or_else(|| malformed(index, "template is not quoted".to_string()))?;
            templates.push(template);
        }

        blocks.push(DescriptionBlock { ids, templates });
    }

    Ok(blocks)
}

/// Stat ids from the line following `description`
///
/// The line starts with the id count, e.g. `2 stat_a stat_b`.
fn parse_id_line(line: &str) -> Vec<String> {
    let line = line.trim();
    let line = match line.split_once(char::is_whitespace) {
        Some((count, rest)) if count.chars().all(|c| c.is_ascii_digit()) => rest,
        _ => line,
    };

    line.replace('"', "")
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Text between the first and last quote of a template line
fn extract_template(line: &str) -> Option<String> {
    let start = line.find('"')?;
    let end = line.rfind('"')?;
    if end <= start {
        return None;
    }

    let template = &line[start + 1..end];

    match template.find(NEGATE) {
        Some(pos) => {
            let end = pos + NEGATE.len();
            let start = template.find('"').map(|q| q + 1).unwrap_or(0);
            Some(template.get(start..end).unwrap_or_default().to_string())
        }
        None => Some(template.to_string()),
    }
}

/// Cut a negated rendering before its quote, or before `negate` without one
fn strip_negated(text: &str) -> String {
    let cut = text
        .find('"')
        .or_else(|| text.find(NEGATE))
        .unwrap_or(text.len());
    text[..cut].trim().to_string()
}

/// Derive display text and matchers from a block's templates
///
/// Returns `None` for blocks without templates.
pub fn derive_translation(templates: &[String]) -> Option<ModTranslation> {
    if templates.is_empty() {
        return None;
    }

    let mut set = MatcherSet::default();
    let mut reference = None;

    for raw in templates {
        let Some(lang) = convert_stat_name(raw) else {
            continue;
        };

        let mut matcher = lang.replace("+#", "#");
        let negate = matcher.find(NEGATE).is_some_and(|pos| pos > 0);

        if negate {
            matcher = strip_negated(&matcher);
        }

        set.add(&matcher, negate, MatcherKind::Matcher);
        set.add(&lang, negate, MatcherKind::Lang);

        let raw = if negate { strip_negated(raw) } else { raw.clone() };
        set.add(&raw, negate, MatcherKind::Raw);

        let not_so_raw = normalize_placeholders(&raw);
        if not_so_raw != raw {
            set.add(&not_so_raw, negate, MatcherKind::NotSoRaw);
            if not_so_raw.contains("+#") {
                set.add(&not_so_raw.replace("+#", "#"), negate, MatcherKind::NotSoRaw2);
            }
        }

        if reference.is_none() {
            reference = Some(lang);
        }
    }

    Some(ModTranslation {
        reference,
        matchers: set.matchers,
    })
}

/// Translations keyed by stat id, built from every description file of a run
#[derive(Debug, Default, Clone)]
pub struct ModTranslations {
    by_id: HashMap<String, ModTranslation>,
}

impl ModTranslations {
    /// Create an empty translation table
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse description files in order; later blocks overwrite earlier ids
    pub fn from_files<I>(files: I) -> Result<Self>
    where
        I: IntoIterator<Item = Result<DescriptionFile>>,
    {
        let mut translations = Self::new();
        for file in files {
            let file = file?;
            translations.ingest(&file.path, &file.content)?;
        }
        Ok(translations)
    }

    /// Parse one description file into the table
    ///
    /// Returns the number of blocks read.
    pub fn ingest(&mut self, path: &Path, content: &str) -> Result<usize> {
        debug!("Parsing {}", path.display());

        let blocks = parse_blocks(path, content)?;
        for block in &blocks {
            let Some(translation) = derive_translation(&block.templates) else {
                continue;
            };
            for id in &block.ids {
                self.by_id.insert(id.clone(), translation.clone());
            }
        }

        Ok(blocks.len())
    }

    /// Translation for a stat id
    pub fn get(&self, id: &str) -> Option<&ModTranslation> {
        self.by_id.get(id)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}
