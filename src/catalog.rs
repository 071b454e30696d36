//! Item catalog and fuzzy name matching.
//!
//! The catalog maps canonical uppercase item names to their ducat values and
//! doubles as the vocabulary the OCR output is matched against. A built-in
//! table ships with the binary; a `catalog.json` next to the executable
//! (array of `[name, ducats]` pairs) replaces it when present, so the table
//! can be refreshed without a rebuild.

use regex::Regex;
use std::fs;
use std::sync::OnceLock;
use strsim::levenshtein;

/// Sentinel returned when no catalog entry is close enough to the OCR text.
pub const NOT_RECOGNIZED: &str = "NOT RECOGNIZED";

/// The zero-value conversion item. Its market listings are meaningless, so
/// pricing short-circuits on it (see `market::price_for`).
pub const ZERO_VALUE_ITEM: &str = "FORMA BLUEPRINT";

/// Built-in catalog: canonical name, ducat value. Order is fixed; the
/// matcher breaks distance ties in favor of the earlier entry.
const BUILTIN_CATALOG: &[(&str, u32)] = &[
    ("FORMA BLUEPRINT", 0),
    ("AKBRONCO PRIME LINK", 15),
    ("AKSTILETTO PRIME BARREL", 45),
    ("AKSTILETTO PRIME BLUEPRINT", 15),
    ("AKSTILETTO PRIME RECEIVER", 100),
    ("ASH PRIME BLUEPRINT", 45),
    ("ASH PRIME CHASSIS BLUEPRINT", 25),
    ("ASH PRIME NEUROPTICS BLUEPRINT", 45),
    ("ASH PRIME SYSTEMS BLUEPRINT", 65),
    ("BANSHEE PRIME BLUEPRINT", 25),
    ("BANSHEE PRIME CHASSIS BLUEPRINT", 15),
    ("BANSHEE PRIME NEUROPTICS BLUEPRINT", 45),
    ("BANSHEE PRIME SYSTEMS BLUEPRINT", 65),
    ("BRATON PRIME BARREL", 25),
    ("BRATON PRIME BLUEPRINT", 15),
    ("BRATON PRIME RECEIVER", 45),
    ("BRATON PRIME STOCK", 25),
    ("BURSTON PRIME BARREL", 15),
    ("BURSTON PRIME BLUEPRINT", 25),
    ("BURSTON PRIME RECEIVER", 25),
    ("BURSTON PRIME STOCK", 15),
    ("CERNOS PRIME BLUEPRINT", 25),
    ("CERNOS PRIME GRIP", 100),
    ("CERNOS PRIME LOWER LIMB", 15),
    ("CERNOS PRIME STRING", 45),
    ("CERNOS PRIME UPPER LIMB", 45),
    ("EMBER PRIME BLUEPRINT", 45),
    ("EMBER PRIME CHASSIS BLUEPRINT", 45),
    ("EMBER PRIME NEUROPTICS BLUEPRINT", 65),
    ("EMBER PRIME SYSTEMS BLUEPRINT", 25),
    ("EUPHONA PRIME BARREL", 100),
    ("EUPHONA PRIME BLUEPRINT", 15),
    ("EUPHONA PRIME RECEIVER", 65),
    ("FANG PRIME BLADE", 15),
    ("FANG PRIME BLUEPRINT", 15),
    ("FANG PRIME HANDLE", 25),
    ("FROST PRIME BLUEPRINT", 25),
    ("FROST PRIME CHASSIS BLUEPRINT", 15),
    ("FROST PRIME NEUROPTICS BLUEPRINT", 45),
    ("FROST PRIME SYSTEMS BLUEPRINT", 100),
    ("GALATINE PRIME BLADE", 65),
    ("GALATINE PRIME BLUEPRINT", 25),
    ("GALATINE PRIME HANDLE", 15),
    ("HELIOS PRIME BLUEPRINT", 25),
    ("HELIOS PRIME CARAPACE", 45),
    ("HELIOS PRIME CEREBRUM", 65),
    ("HELIOS PRIME SYSTEMS", 15),
    ("LEX PRIME BARREL", 45),
    ("LEX PRIME BLUEPRINT", 15),
    ("LEX PRIME RECEIVER", 25),
    ("NOVA PRIME BLUEPRINT", 65),
    ("NOVA PRIME CHASSIS BLUEPRINT", 45),
    ("NOVA PRIME NEUROPTICS BLUEPRINT", 100),
    ("NOVA PRIME SYSTEMS BLUEPRINT", 25),
    ("PARIS PRIME BLUEPRINT", 15),
    ("PARIS PRIME GRIP", 25),
    ("PARIS PRIME LOWER LIMB", 15),
    ("PARIS PRIME STRING", 45),
    ("PARIS PRIME UPPER LIMB", 45),
    ("SOMA PRIME BARREL", 100),
    ("SOMA PRIME BLUEPRINT", 15),
    ("SOMA PRIME RECEIVER", 45),
    ("SOMA PRIME STOCK", 25),
    ("TRINITY PRIME BLUEPRINT", 25),
    ("TRINITY PRIME CHASSIS BLUEPRINT", 15),
    ("TRINITY PRIME NEUROPTICS BLUEPRINT", 45),
    ("TRINITY PRIME SYSTEMS BLUEPRINT", 65),
    ("VECTIS PRIME BARREL", 65),
    ("VECTIS PRIME BLUEPRINT", 25),
    ("VECTIS PRIME RECEIVER", 100),
    ("VECTIS PRIME STOCK", 15),
];

static CATALOG: OnceLock<Vec<(String, u32)>> = OnceLock::new();

/// Loads catalog.json next to the executable, or falls back to the
/// built-in table.
fn load_catalog() -> Vec<(String, u32)> {
    let catalog_path = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|p| p.join("catalog.json")));

    if let Some(path) = catalog_path {
        if path.exists() {
            match fs::read_to_string(&path) {
                Ok(contents) => match serde_json::from_str::<Vec<(String, u32)>>(&contents) {
                    Ok(entries) if !entries.is_empty() => {
                        crate::log(&format!(
                            "Catalog loaded from catalog.json ({} items)",
                            entries.len()
                        ));
                        return entries;
                    }
                    Ok(_) => {
                        crate::log("catalog.json is empty. Using built-in catalog.");
                    }
                    Err(e) => {
                        crate::log(&format!(
                            "Failed to parse catalog.json: {}. Using built-in catalog.",
                            e
                        ));
                    }
                },
                Err(e) => {
                    crate::log(&format!(
                        "Failed to read catalog.json: {}. Using built-in catalog.",
                        e
                    ));
                }
            }
        }
    }

    BUILTIN_CATALOG
        .iter()
        .map(|&(name, ducats)| (name.to_string(), ducats))
        .collect()
}

fn catalog() -> &'static [(String, u32)] {
    CATALOG.get_or_init(load_catalog)
}

/// Returns the ducat value for a canonical name, or None for unknown names
/// (including the NOT_RECOGNIZED sentinel).
pub fn ducats(name: &str) -> Option<u32> {
    catalog()
        .iter()
        .find(|(n, _)| n == name)
        .map(|&(_, ducats)| ducats)
}

/// Normalizes raw OCR output into the catalog alphabet: uppercase, only
/// `A-Z`, `&` and spaces, runs of whitespace collapsed to one space.
pub fn normalize(raw: &str) -> String {
    static ALPHABET: OnceLock<Regex> = OnceLock::new();
    let alphabet = ALPHABET.get_or_init(|| Regex::new(r"[^A-Z& ]").unwrap());

    let upper = raw.to_uppercase().replace(['\n', '\r', '\t'], " ");
    let stripped = alphabet.replace_all(&upper, "");
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Finds the catalog entry closest to the raw OCR text by Levenshtein
/// distance. Ties break to the earlier catalog entry, so the result is
/// deterministic for identical input. Returns [`NOT_RECOGNIZED`] when even
/// the best candidate is more than `max_distance` edits away.
pub fn best_match(raw: &str, max_distance: usize) -> &'static str {
    let cleaned = normalize(raw);

    let mut best: Option<(&'static str, usize)> = None;
    for (name, _) in catalog() {
        let dist = levenshtein(&cleaned, name);
        match best {
            Some((_, best_dist)) if best_dist <= dist => {}
            _ => best = Some((name.as_str(), dist)),
        }
    }

    match best {
        Some((name, dist)) if dist <= max_distance => name,
        _ => NOT_RECOGNIZED,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAX_DISTANCE: usize = 10;

    #[test]
    fn test_exact_name_matches_with_distance_zero() {
        for &(name, _) in BUILTIN_CATALOG {
            assert_eq!(best_match(name, 0), name);
        }
    }

    #[test]
    fn test_noisy_text_matches_nearest_entry() {
        // Dropped letter, misread letter, stray spacing.
        assert_eq!(
            best_match("NOVA PRIM BLUEPRINT", MAX_DISTANCE),
            "NOVA PRIME BLUEPRINT"
        );
        assert_eq!(
            best_match("S0MA PRIME  RECEIVER", MAX_DISTANCE),
            "SOMA PRIME RECEIVER"
        );
        assert_eq!(
            best_match("FORMA BLUEPRNT", MAX_DISTANCE),
            "FORMA BLUEPRINT"
        );
    }

    #[test]
    fn test_lowercase_and_line_breaks_are_normalized() {
        assert_eq!(
            best_match("banshee prime\nsystems blueprint", MAX_DISTANCE),
            "BANSHEE PRIME SYSTEMS BLUEPRINT"
        );
    }

    #[test]
    fn test_garbage_beyond_threshold_is_not_recognized() {
        assert_eq!(best_match("XXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXX", 5), NOT_RECOGNIZED);
        assert_eq!(best_match("", MAX_DISTANCE), NOT_RECOGNIZED);
        assert_eq!(best_match("   \n  ", MAX_DISTANCE), NOT_RECOGNIZED);
    }

    #[test]
    fn test_match_is_deterministic() {
        let first = best_match("LEX PRIME BAROEL", MAX_DISTANCE);
        for _ in 0..10 {
            assert_eq!(best_match("LEX PRIME BAROEL", MAX_DISTANCE), first);
        }
    }

    #[test]
    fn test_normalize_strips_foreign_characters() {
        assert_eq!(normalize("Lex. Prime; Barrel!?"), "LEX PRIME BARREL");
        assert_eq!(normalize("dual keres & kama"), "DUAL KERES & KAMA");
        assert_eq!(normalize("  A \t B \n C  "), "A B C");
    }

    #[test]
    fn test_ducats_lookup() {
        assert_eq!(ducats("FORMA BLUEPRINT"), Some(0));
        assert_eq!(ducats("SOMA PRIME BARREL"), Some(100));
        assert_eq!(ducats(NOT_RECOGNIZED), None);
        assert_eq!(ducats("NO SUCH ITEM"), None);
    }
}
