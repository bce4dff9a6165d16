// libarabic/core/src/translit.rs
//
// Phonetic Latin → Arabic transliteration ("auto convert").
//
// The rule table holds one- and two-letter Latin tokens. Conversion scans the
// input once, left to right, trying the two-letter token at the current
// position before the single letter. Anything without a rule (Arabic letters,
// punctuation, whitespace) is copied through unchanged.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Two-letter tokens, lowercase form.
const DIGRAPHS: &[(&str, &str)] = &[
    ("sh", "ش"),
    ("th", "ث"),
    ("kh", "خ"),
    ("gh", "غ"),
    ("dh", "ذ"),
    ("ch", "تش"),
    ("aa", "ا"),
    ("ee", "ي"),
    ("ii", "ي"),
    ("oo", "و"),
    ("uu", "و"),
    ("ou", "و"),
];

/// Single letters, lowercase form.
const LETTERS: &[(char, &str)] = &[
    ('a', "ا"),
    ('b', "ب"),
    ('t', "ت"),
    ('j', "ج"),
    ('g', "ج"),
    ('h', "ه"),
    ('d', "د"),
    ('r', "ر"),
    ('z', "ز"),
    ('s', "س"),
    ('f', "ف"),
    ('q', "ق"),
    ('k', "ك"),
    ('l', "ل"),
    ('m', "م"),
    ('n', "ن"),
    ('w', "و"),
    ('y', "ي"),
    ('i', "ي"),
    ('e', "ي"),
    ('u', "و"),
    ('o', "و"),
    ('p', "ب"),
    ('v', "ڤ"),
    ('x', "كس"),
];

const ARABIC_INDIC_DIGITS: [&str; 10] = ["٠", "١", "٢", "٣", "٤", "٥", "٦", "٧", "٨", "٩"];

static RULES: Lazy<HashMap<String, &'static str>> = Lazy::new(build_rules);

fn capitalize(token: &str) -> String {
    let mut chars = token.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn build_rules() -> HashMap<String, &'static str> {
    let mut m = HashMap::new();

    // Each case form is its own entry
    for &(token, arabic) in DIGRAPHS {
        m.insert(token.to_string(), arabic);
        m.insert(token.to_uppercase(), arabic);
        m.insert(capitalize(token), arabic);
    }
    for &(letter, arabic) in LETTERS {
        m.insert(letter.to_string(), arabic);
        m.insert(letter.to_uppercase().collect(), arabic);
    }
    for (digit, arabic) in ARABIC_INDIC_DIGITS.iter().enumerate() {
        m.insert(digit.to_string(), *arabic);
    }

    m
}

/// Longest-match-first transliterator over the static rule table.
///
/// Stateless; every call is a pure function of its input.
#[derive(Debug, Clone, Copy, Default)]
pub struct Transliterator;

impl Transliterator {
    pub fn new() -> Self {
        Self
    }

    /// Convert Latin text to Arabic.
    ///
    /// # Examples
    /// ```
    /// use libarabic_core::Transliterator;
    ///
    /// let t = Transliterator::new();
    /// assert_eq!(t.transliterate("shukran"), "شوكران");
    /// assert_eq!(t.transliterate("2024"), "٢٠٢٤");
    /// assert_eq!(t.transliterate("سلام?"), "سلام?");
    /// ```
    pub fn transliterate(&self, input: &str) -> String {
        let chars: Vec<char> = input.chars().collect();
        let mut out = String::with_capacity(input.len() * 2);
        let mut i = 0;

        while i < chars.len() {
            if i + 2 <= chars.len() {
                let pair: String = chars[i..i + 2].iter().collect();
                if let Some(arabic) = Self::lookup_pair(&pair) {
                    out.push_str(arabic);
                    i += 2;
                    continue;
                }
            }

            let mut buf = [0u8; 4];
            let single: &str = chars[i].encode_utf8(&mut buf);
            match RULES.get(single) {
                Some(arabic) => out.push_str(arabic),
                None => out.push(chars[i]),
            }
            i += 1;
        }

        out
    }

    /// Two-letter lookup: exact case form first, then the lowercase form.
    fn lookup_pair(pair: &str) -> Option<&'static str> {
        if let Some(arabic) = RULES.get(pair) {
            return Some(*arabic);
        }
        let lower = pair.to_lowercase();
        if lower.chars().count() != 2 {
            return None;
        }
        RULES.get(lower.as_str()).copied()
    }

    /// Whether `token` has an entry of its own (exact case).
    pub fn has_rule(&self, token: &str) -> bool {
        RULES.contains_key(token)
    }

    /// All rules sorted by token, two-letter tokens first.
    pub fn rules(&self) -> Vec<(&str, &'static str)> {
        let mut rules: Vec<_> = RULES.iter().map(|(k, v)| (k.as_str(), *v)).collect();
        rules.sort_by(|a, b| {
            b.0.chars()
                .count()
                .cmp(&a.0.chars().count())
                .then_with(|| a.0.cmp(b.0))
        });
        rules
    }
}

/// Convenience wrapper around [`Transliterator::transliterate`].
pub fn transliterate(input: &str) -> String {
    Transliterator.transliterate(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input() {
        assert_eq!(transliterate(""), "");
    }

    #[test]
    fn digraph_beats_two_letters() {
        assert_eq!(transliterate("sh"), "ش");
        assert_ne!(transliterate("sh"), format!("{}{}", transliterate("s"), transliterate("h")));
        assert_eq!(transliterate("khair"), "خاير");
    }

    #[test]
    fn digraph_case_forms() {
        assert_eq!(transliterate("sh"), "ش");
        assert_eq!(transliterate("Sh"), "ش");
        assert_eq!(transliterate("SH"), "ش");
        // Mixed case still goes through the lowercase lookup
        assert_eq!(transliterate("sH"), "ش");
    }

    #[test]
    fn single_letters_are_case_exact_entries() {
        assert_eq!(transliterate("b"), "ب");
        assert_eq!(transliterate("B"), "ب");
        assert!(Transliterator.has_rule("B"));
        assert!(!Transliterator.has_rule("?"));
    }

    #[test]
    fn digits_become_arabic_indic() {
        assert_eq!(transliterate("0123456789"), "٠١٢٣٤٥٦٧٨٩");
    }

    #[test]
    fn x_grows_output() {
        assert_eq!(transliterate("x"), "كس");
        assert_eq!(transliterate("x").chars().count(), 2);
    }

    #[test]
    fn trailing_prefix_without_own_rule_passes_through() {
        // `c` only exists as the start of `ch`
        assert_eq!(transliterate("c"), "c");
        assert_eq!(transliterate("bac"), "باc");
        assert_eq!(transliterate("ch"), "تش");
    }

    #[test]
    fn no_lookahead_past_next_char() {
        // "ash": a, then "sh"
        assert_eq!(transliterate("ash"), "اش");
        // "sha": "sh" wins at position 0, "a" follows
        assert_eq!(transliterate("sha"), "شا");
        // "aah": "aa" at 0 consumes both a's
        assert_eq!(transliterate("aah"), "اه");
    }

    #[test]
    fn unmapped_characters_pass_through() {
        let input = "مرحبا، كيف الحال? !.,;\n\t";
        assert_eq!(transliterate(input), input);
    }

    #[test]
    fn deterministic() {
        let s = "ahlan wa sahlan 123";
        assert_eq!(transliterate(s), transliterate(s));
        assert_eq!(transliterate(s), "اهلان وا ساهلان ١٢٣");
    }

    #[test]
    fn rules_list_digraphs_first() {
        let rules = Transliterator.rules();
        assert_eq!(rules[0].0.chars().count(), 2);
        assert!(rules.iter().any(|(k, v)| *k == "Kh" && *v == "خ"));
    }
}
