//! Plain-text rendering for the terminal front end.

use chrono::{DateTime, Utc};
use libarabic_core::layout::{has_variant_hint, special_keys, KEYBOARD_ROWS};
use libarabic_core::{EditorContext, HistoryEntry, VariantPopover, VariantTable};

/// The keyboard as text rows. Keys with long-press variants carry a `•`.
pub fn render_layout() -> String {
    let mut out = String::new();
    for row in KEYBOARD_ROWS.iter() {
        let keys: Vec<String> = row
            .iter()
            .map(|g| {
                if has_variant_hint(g) {
                    format!("{}•", g)
                } else {
                    format!("{} ", g)
                }
            })
            .collect();
        out.push_str(&keys.join(" "));
        out.push('\n');
    }
    let specials: Vec<String> = special_keys().iter().map(|s| format!("[{}]", s.label)).collect();
    out.push_str(&specials.join(" "));
    out.push('\n');
    out
}

/// `key: v1 v2 ...` for one key, or every key when `key` is `None`.
pub fn render_variants(key: Option<&str>) -> Option<String> {
    let table = VariantTable::standard();
    match key {
        Some(k) => table.variants(k).map(|list| format!("{}: {}", k, list.join(" "))),
        None => {
            let lines: Vec<String> = table
                .keys()
                .into_iter()
                .filter_map(|k| table.variants(k).map(|list| format!("{}: {}", k, list.join(" "))))
                .collect();
            Some(lines.join("\n"))
        }
    }
}

/// Numbered picker contents, 1-based as typed by the user.
pub fn render_popover(popover: &VariantPopover) -> String {
    popover
        .variants
        .iter()
        .enumerate()
        .map(|(i, v)| format!("{}) {}", i + 1, v))
        .collect::<Vec<_>>()
        .join("  ")
}

/// One history line: id, age, preview.
pub fn render_entry(entry: &HistoryEntry, now: DateTime<Utc>) -> String {
    format!(
        "{}  {:>10}  {}",
        entry.id,
        entry.relative_age(now),
        entry.preview.replace('\n', " ")
    )
}

/// Status line under the buffer.
pub fn render_status(ctx: &EditorContext) -> String {
    let mut line = format!(
        "{} characters, {} words",
        ctx.char_count, ctx.word_count
    );
    if ctx.auto_convert {
        line.push_str(" | auto-convert");
    }
    if ctx.autosave_pending {
        line.push_str(" | unsaved");
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_marks_variant_keys() {
        let layout = render_layout();
        let lines: Vec<&str> = layout.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[2].contains("ا•"));
        assert!(lines[1].starts_with("ض "));
        assert_eq!(lines[4], "[Space] [Enter] [⌫]");
    }

    #[test]
    fn variants_for_one_key() {
        assert_eq!(render_variants(Some("ب")).as_deref(), Some("ب: ب پ"));
        assert_eq!(render_variants(Some("x")), None);
        assert!(render_variants(None).unwrap().lines().count() > 20);
    }

    #[test]
    fn status_flags() {
        let ctx = EditorContext {
            char_count: 5,
            word_count: 1,
            auto_convert: true,
            ..EditorContext::default()
        };
        assert_eq!(render_status(&ctx), "5 characters, 1 words | auto-convert");
    }
}
