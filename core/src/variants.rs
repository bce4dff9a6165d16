//! Long-press variant table.
//!
//! Maps a base key to the glyphs offered in the variant picker. The first
//! entry of every list is the base key itself; list order is the left-to-right
//! order of the picker.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Raw variant data, in keyboard order.
const VARIANT_DATA: &[(&str, &[&str])] = &[
    // Alif and hamza carriers
    ("ا", &["ا", "آ", "أ", "إ", "ء"]),
    ("ب", &["ب", "پ"]),
    ("ت", &["ت", "ة", "ث"]),
    ("ج", &["ج", "چ"]),
    ("ح", &["ح", "خ"]),
    ("ه", &["ه", "ة"]),
    ("د", &["د", "ذ"]),
    ("ر", &["ر", "ژ"]),
    ("س", &["س", "ش"]),
    ("ص", &["ص", "ض"]),
    ("ط", &["ط", "ظ"]),
    ("ع", &["ع", "غ"]),
    ("ف", &["ف", "ڤ"]),
    ("ق", &["ق", "ڨ"]),
    ("ك", &["ك", "گ"]),
    // Lam-alif is two code points
    ("ل", &["ل", "لا"]),
    ("ن", &["ن", "ں"]),
    ("و", &["و", "ؤ", "ۆ"]),
    ("ي", &["ي", "ی", "ئ", "ى"]),
    ("ء", &["ء", "أ", "إ", "آ", "ؤ", "ئ"]),
    // Arabic-Indic digits offer their Latin counterpart
    ("١", &["١", "1"]),
    ("٢", &["٢", "2"]),
    ("٣", &["٣", "3"]),
    ("٤", &["٤", "4"]),
    ("٥", &["٥", "5"]),
    ("٦", &["٦", "6"]),
    ("٧", &["٧", "7"]),
    ("٨", &["٨", "8"]),
    ("٩", &["٩", "9"]),
    ("٠", &["٠", "0"]),
    // Harakat: fatha, kasra, damma, sukun
    ("\u{064E}", &["\u{064E}", "\u{064B}", "\u{0651}"]),
    ("\u{0650}", &["\u{0650}", "\u{064D}"]),
    ("\u{064F}", &["\u{064F}", "\u{064C}"]),
    ("\u{0652}", &["\u{0652}", "\u{0651}"]),
];

static VARIANTS: Lazy<VariantTable> = Lazy::new(|| VariantTable::from_pairs(VARIANT_DATA));

/// Immutable mapping from a base key to its ordered variants.
#[derive(Debug, Clone)]
pub struct VariantTable {
    map: HashMap<&'static str, &'static [&'static str]>,
}

impl VariantTable {
    /// The built-in table, built once on first use.
    pub fn standard() -> &'static VariantTable {
        &VARIANTS
    }

    fn from_pairs(pairs: &[(&'static str, &'static [&'static str])]) -> Self {
        let map = pairs.iter().copied().collect();
        Self { map }
    }

    /// Variants for `key`, base first. `None` when the key has no entry.
    pub fn variants(&self, key: &str) -> Option<&'static [&'static str]> {
        self.map.get(key).copied()
    }

    /// Variants for `key`, falling back to the key alone.
    pub fn variants_or_self(&self, key: &str) -> Vec<String> {
        match self.variants(key) {
            Some(list) => list.iter().map(|v| v.to_string()).collect(),
            None => vec![key.to_string()],
        }
    }

    /// True when a long press on `key` should open the picker.
    pub fn has_alternatives(&self, key: &str) -> bool {
        self.variants(key).map_or(false, |list| list.len() > 1)
    }

    /// All base keys, sorted for stable output.
    pub fn keys(&self) -> Vec<&'static str> {
        let mut keys: Vec<_> = self.map.keys().copied().collect();
        keys.sort_unstable();
        keys
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn every_key_lists_itself_first() {
        let table = VariantTable::standard();
        for key in table.keys() {
            let list = table.variants(key).unwrap();
            assert!(!list.is_empty(), "empty list for {key}");
            assert_eq!(list[0], key);
            assert!(list.contains(&key));
        }
    }

    #[test]
    fn no_duplicate_variants() {
        let table = VariantTable::standard();
        for key in table.keys() {
            let list = table.variants(key).unwrap();
            let unique: HashSet<_> = list.iter().collect();
            assert_eq!(unique.len(), list.len(), "duplicate variant under {key}");
        }
    }

    #[test]
    fn lookups() {
        let table = VariantTable::standard();
        assert_eq!(table.variants("ل"), Some(&["ل", "لا"][..]));
        assert!(table.has_alternatives("ا"));
        assert!(!table.has_alternatives("م"));
        assert_eq!(table.variants_or_self("م"), vec!["م".to_string()]);
        assert_eq!(table.len(), VARIANT_DATA.len());
    }
}
