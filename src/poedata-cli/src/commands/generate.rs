//! Data generation command

use anyhow::{Context, Result};
use poedata::{run_locale, DescriptionSource, TradeSnapshots};
use std::path::Path;
use tracing::info;

use crate::config::Config;

/// Generate output for every selected locale
///
/// Trade snapshots and the description listing are loaded once; each locale
/// is then run from its own tables.
pub fn handle(root: &Path, config: &Config, locale: Option<&str>) -> Result<()> {
    let locales = config.select_locales(locale)?;
    let paths = config.run_paths(root);

    let snapshots = TradeSnapshots::load(&paths, &config.icon_cdn)
        .context("Failed to load trade API snapshots")?;

    let descriptions =
        DescriptionSource::open(&paths.descriptions_dir, &paths.description_extension)
            .with_context(|| {
                format!(
                    "Failed to list description files in {}",
                    paths.descriptions_dir.display()
                )
            })?;
    info!(
        "Found {} description files in {}",
        descriptions.files().len(),
        descriptions.root().display()
    );

    for locale in &locales {
        let summary = run_locale(locale, &paths, &snapshots, &descriptions)
            .with_context(|| format!("Failed to generate data for {}", locale.name))?;

        println!(
            "{} ({}): {} items, {} uniques, {} stats ({} duplicates dropped)",
            locale.name,
            locale.code,
            summary.items,
            summary.uniques,
            summary.stats,
            summary.duplicate_stats
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_missing_snapshots_fail() {
        let temp_dir = tempfile::tempdir().unwrap();
        let err = handle(temp_dir.path(), &Config::default(), None).unwrap_err();
        assert!(err.to_string().contains("trade API snapshots"));
    }

    #[test]
    fn test_unknown_locale_fails_before_loading() {
        let temp_dir = tempfile::tempdir().unwrap();
        let err = handle(temp_dir.path(), &Config::default(), Some("xx")).unwrap_err();
        assert!(err.to_string().contains("xx"));
    }

    #[test]
    fn test_generate_empty_locale() {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = temp_dir.path();

        for name in ["api_stats.json", "api_items.json", "api_static.json"] {
            fs::write(root.join(name), r#"{"result": []}"#).unwrap();
        }
        fs::create_dir_all(root.join("descriptions")).unwrap();
        let tables = root.join("tables/English");
        fs::create_dir_all(&tables).unwrap();
        for name in [
            "BaseItemTypes",
            "ItemClasses",
            "ItemClassCategories",
            "ArmourTypes",
            "WeaponTypes",
            "SkillGems",
            "SkillGemInfo",
            "Stats",
            "Mods",
        ] {
            fs::write(tables.join(format!("{}.json", name)), "[]").unwrap();
        }

        let config = Config {
            output_dir: "out".into(),
            ..Config::default()
        };
        handle(root, &config, Some("en")).unwrap();

        let items = fs::read_to_string(root.join("out/en/items.ndjson")).unwrap();
        assert!(items.is_empty());
        assert!(root.join("out/en/stats.ndjson").exists());
    }
}
