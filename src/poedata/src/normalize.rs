//! Stat text normalization
//!
//! Stat description templates and trade API stat texts are reduced to the
//! same canonical form so they can be compared as plain strings:
//!
//! - `[Lightning|Blitz]` style translation brackets resolve to their value
//! - `{0}` style number placeholders become `#`
//! - the `{0:+d}` signed placeholder becomes `+#`; other signed indices
//!   are left as written

use once_cell::sync::Lazy;
use regex::Regex;

static NUMBER_PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\d+\}").expect("number placeholder pattern"));

const SIGNED_PLACEHOLDER: &str = "{0:+d}";

/// Resolve all translation brackets in a stat template
///
/// A bracket holds either plain text or a `key|value` pair; the whole run is
/// replaced by the text or the value. Brackets are resolved left to right,
/// one per pass, until no `[...]` pair is left.
///
/// `"Adds {0} to {1} [Lightning|Lightning] Damage"` becomes
/// `"Adds {0} to {1} Lightning Damage"`.
pub fn resolve_brackets(text: &str) -> String {
    let mut out = text.to_string();

    while let Some(open) = out.find('[') {
        let Some(close) = out[open..].find(']').map(|i| open + i) else {
            break;
        };

        let inner = &out[open + 1..close];
        let resolved = match inner.split('|').nth(1) {
            Some(value) => value,
            None => inner,
        };

        out = format!("{}{}{}", &out[..open], resolved, &out[close + 1..]);
    }

    out
}

/// Replace number placeholders with `#` and `{0:+d}` with `+#`
pub fn normalize_placeholders(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let out = NUMBER_PLACEHOLDER.replace_all(text, "#");
    out.replace(SIGNED_PLACEHOLDER, "+#")
}

/// Convert a raw stat template into its canonical matcher form
///
/// Returns `None` when nothing usable is left after normalization.
pub fn convert_stat_name(text: &str) -> Option<String> {
    let text = resolve_brackets(text.trim());
    let text = normalize_placeholders(&text);

    if text.is_empty() {
        return None;
    }

    match text.strip_prefix("{}") {
        Some(rest) => Some(format!("#{}", rest)),
        None => Some(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_brackets_key_value() {
        assert_eq!(
            resolve_brackets("Adds {0} to {1} [Lightning|Lightning] Damage"),
            "Adds {0} to {1} Lightning Damage"
        );
        assert_eq!(
            resolve_brackets("Fügt {0} bis {1} [Lightning|Blitz]schaden hinzu"),
            "Fügt {0} bis {1} Blitzschaden hinzu"
        );
    }

    #[test]
    fn test_resolve_brackets_plain_and_sequential() {
        assert_eq!(resolve_brackets("[Armour] and [Evasion]"), "Armour and Evasion");
        assert_eq!(
            resolve_brackets("[Fire|Fire] or [Cold|Kalt]"),
            "Fire or Kalt"
        );
    }

    #[test]
    fn test_resolve_brackets_unbalanced() {
        assert_eq!(resolve_brackets("no brackets"), "no brackets");
        assert_eq!(resolve_brackets("open [only"), "open [only");
        assert_eq!(resolve_brackets("close] then [x]"), "close] then x");
        assert_eq!(resolve_brackets(""), "");
    }

    #[test]
    fn test_normalize_placeholders() {
        assert_eq!(
            normalize_placeholders("Adds {0} to {1} Damage"),
            "Adds # to # Damage"
        );
        for i in 0..10 {
            assert_eq!(normalize_placeholders(&format!("{{{}}}", i)), "#");
        }
        assert_eq!(normalize_placeholders("{0:+d} to Strength"), "+# to Strength");
        assert_eq!(normalize_placeholders("{12}% increased"), "#% increased");
        assert_eq!(
            normalize_placeholders("{0:+d} to {1:+d} Resistances"),
            "+# to {1:+d} Resistances"
        );
        assert_eq!(normalize_placeholders(""), "");
    }

    #[test]
    fn test_convert_stat_name() {
        assert_eq!(
            convert_stat_name("  Adds {0} to {1} [Fire|Fire] Damage  ").as_deref(),
            Some("Adds # to # Fire Damage")
        );
        assert_eq!(
            convert_stat_name("{0:+d} to [Strength]").as_deref(),
            Some("+# to Strength")
        );
    }

    #[test]
    fn test_convert_stat_name_empty() {
        assert_eq!(convert_stat_name(""), None);
        assert_eq!(convert_stat_name("   "), None);
        assert_eq!(convert_stat_name("[]"), None);
    }

    #[test]
    fn test_convert_stat_name_leading_empty_placeholder() {
        assert_eq!(
            convert_stat_name("{} Maximum Life").as_deref(),
            Some("# Maximum Life")
        );
        assert_eq!(convert_stat_name("{}").as_deref(), Some("#"));
    }

    #[test]
    fn test_convert_stat_name_idempotent() {
        let inputs = [
            "Adds {0} to {1} [Lightning|Lightning] Damage",
            "{0:+d} to maximum [Life]",
            "{}% increased Armour",
            "Regenerate {0} Life per second",
        ];

        for input in inputs {
            let once = convert_stat_name(input).unwrap();
            let twice = convert_stat_name(&once).unwrap();
            assert_eq!(once, twice, "not idempotent for {:?}", input);
        }
    }
}
