//! On-screen keyboard layout.

use crate::interaction::Key;
use crate::variants::VariantTable;

/// Character rows, top to bottom, in display order.
pub const KEYBOARD_ROWS: [&[&str]; 4] = [
    &["١", "٢", "٣", "٤", "٥", "٦", "٧", "٨", "٩", "٠", "-", "="],
    &["ض", "ص", "ث", "ق", "ف", "غ", "ع", "ه", "خ", "ح", "ج", "د"],
    &["ش", "س", "ي", "ب", "ل", "ا", "ت", "ن", "م", "ك", "ط", "ذ"],
    &["ئ", "ء", "ؤ", "ر", "ى", "ة", "و", "ز", "ظ"],
];

/// A special key and its label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecialKey {
    pub key: Key,
    pub label: &'static str,
}

/// The bottom row: space, enter, backspace.
pub fn special_keys() -> [SpecialKey; 3] {
    [
        SpecialKey { key: Key::Space, label: "Space" },
        SpecialKey { key: Key::Enter, label: "Enter" },
        SpecialKey { key: Key::Backspace, label: "⌫" },
    ]
}

/// Character keys in layout order.
pub fn character_keys() -> impl Iterator<Item = Key> {
    KEYBOARD_ROWS.iter().flat_map(|row| row.iter().map(|g| Key::char(*g)))
}

/// Whether the key at `glyph` shows a long-press hint.
pub fn has_variant_hint(glyph: &str) -> bool {
    VariantTable::standard().has_alternatives(glyph)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_sizes() {
        let sizes: Vec<usize> = KEYBOARD_ROWS.iter().map(|r| r.len()).collect();
        assert_eq!(sizes, vec![12, 12, 12, 9]);
        assert_eq!(character_keys().count(), 45);
    }

    #[test]
    fn every_letter_with_variants_is_on_the_keyboard() {
        let on_board: Vec<&str> = KEYBOARD_ROWS.iter().flat_map(|r| r.iter().copied()).collect();
        for key in VariantTable::standard().keys() {
            // harakat have no key of their own
            let is_mark = key.chars().all(|c| ('\u{064B}'..='\u{0652}').contains(&c));
            if !is_mark {
                assert!(on_board.contains(&key), "{key} missing from layout");
            }
        }
    }

    #[test]
    fn hints() {
        assert!(has_variant_hint("ا"));
        assert!(!has_variant_hint("ض"));
        assert!(special_keys().iter().all(|s| s.key.is_special()));
    }
}
