//! Edit-distance similarity used to suppress near-duplicate history saves.
//!
//! All lengths are counted in characters (Unicode scalar values), so an
//! Arabic letter counts as one unit regardless of its UTF-8 width.

/// Levenshtein distance with unit cost for insertion, deletion and substitution.
///
/// Runs in O(n·m) time and O(min(n, m)) space.
pub fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    // Keep the row over the shorter string
    let (long, short) = if a.len() >= b.len() { (a, b) } else { (b, a) };

    if short.is_empty() {
        return long.len();
    }

    let mut prev: Vec<usize> = (0..=short.len()).collect();
    let mut curr = vec![0usize; short.len() + 1];

    for (i, lc) in long.iter().enumerate() {
        curr[0] = i + 1;
        for (j, sc) in short.iter().enumerate() {
            let substitution = prev[j] + usize::from(lc != sc);
            let deletion = prev[j + 1] + 1;
            let insertion = curr[j] + 1;
            curr[j + 1] = substitution.min(deletion).min(insertion);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[short.len()]
}

/// Normalized similarity in `[0.0, 1.0]`: `(longer - distance) / longer`.
///
/// Two empty strings are identical (1.0).
pub fn similarity(a: &str, b: &str) -> f64 {
    let longer = a.chars().count().max(b.chars().count());
    if longer == 0 {
        return 1.0;
    }
    let distance = edit_distance(a, b);
    (longer - distance) as f64 / longer as f64
}

/// Thresholds deciding when a new snapshot is too close to a recent one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DuplicatePolicy {
    /// Length difference ratio must be strictly below this to compare content.
    pub max_length_diff_ratio: f64,
    /// Content similarity strictly above this is a duplicate.
    pub min_similarity: f64,
    /// Content is only compared when the longer text is shorter than this.
    pub max_compare_length: usize,
}

impl Default for DuplicatePolicy {
    fn default() -> Self {
        Self {
            max_length_diff_ratio: 0.1,
            min_similarity: 0.8,
            max_compare_length: 100,
        }
    }
}

impl DuplicatePolicy {
    /// Whether `candidate` should be skipped because of `existing`.
    ///
    /// Exact matches are always duplicates. Otherwise the two texts must have
    /// close lengths, be short enough to compare, and be similar enough.
    pub fn is_near_duplicate(&self, candidate: &str, existing: &str) -> bool {
        if candidate == existing {
            return true;
        }

        let cand_len = candidate.chars().count();
        let existing_len = existing.chars().count();
        let max_len = cand_len.max(existing_len);
        if max_len == 0 {
            return true;
        }

        let length_diff = cand_len.abs_diff(existing_len);
        if length_diff as f64 / max_len as f64 >= self.max_length_diff_ratio {
            return false;
        }
        if max_len >= self.max_compare_length {
            return false;
        }

        let distance = edit_distance(existing, candidate);
        let score = (max_len - distance) as f64 / max_len as f64;
        score > self.min_similarity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_basics() {
        assert_eq!(edit_distance("", ""), 0);
        assert_eq!(edit_distance("abc", ""), 3);
        assert_eq!(edit_distance("", "abc"), 3);
        assert_eq!(edit_distance("kitten", "sitting"), 3);
        assert_eq!(edit_distance("flaw", "lawn"), 2);
        assert_eq!(edit_distance("same", "same"), 0);
    }

    #[test]
    fn distance_is_symmetric() {
        assert_eq!(edit_distance("sunday", "saturday"), edit_distance("saturday", "sunday"));
    }

    #[test]
    fn distance_counts_characters_not_bytes() {
        // One substitution between two Arabic letters
        assert_eq!(edit_distance("سلام", "كلام"), 1);
        assert_eq!(edit_distance("مرحبا", "مرحب"), 1);
    }

    #[test]
    fn similarity_bounds() {
        assert_eq!(similarity("", ""), 1.0);
        assert_eq!(similarity("abc", "abc"), 1.0);
        assert_eq!(similarity("abc", "xyz"), 0.0);
        assert!((similarity("abcd", "abce") - 0.75).abs() < 1e-9);
    }

    #[test]
    fn one_change_in_twenty_chars_is_duplicate() {
        let policy = DuplicatePolicy::default();
        let base = "abcdefghijklmnopqrst";
        let changed = "abcdefghijXlmnopqrst";
        assert!(policy.is_near_duplicate(changed, base));
    }

    #[test]
    fn large_length_difference_is_not_duplicate() {
        let policy = DuplicatePolicy::default();
        let base = "abcdefghijklmnopqrst";
        let longer = "abcdefghijklmnopqrst0123456789";
        assert!(!policy.is_near_duplicate(longer, base));
    }

    #[test]
    fn long_texts_are_not_compared() {
        let policy = DuplicatePolicy::default();
        let a = "a".repeat(120);
        let mut b = a.clone();
        b.replace_range(0..1, "b");
        assert!(!policy.is_near_duplicate(&b, &a));
        // but exact matches are always caught
        assert!(policy.is_near_duplicate(&a, &a));
    }

    #[test]
    fn dissimilar_same_length_is_not_duplicate() {
        let policy = DuplicatePolicy::default();
        assert!(!policy.is_near_duplicate("abcdefghij", "klmnopqrst"));
    }
}
