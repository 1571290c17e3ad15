//! Text safety: every string that reaches a page goes through [`prepare`], which
//! clamps first and sanitizes second so width is measured on exactly what is drawn.

/// Appended when [`clamp`] shortens a value.
pub const ELLIPSIS: &str = "...";

/// Default character limit for a drawn value.
pub const DEFAULT_MAX_CHARS: usize = 100;

/// Truncates `text` to `max_chars` characters, appending [`ELLIPSIS`] when anything was cut.
/// Absent input is the empty string.
pub fn clamp(text: Option<&str>, max_chars: usize) -> String {
    let Some(text) = text else {
        return String::new();
    };
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => {
            let mut out = String::with_capacity(cut + ELLIPSIS.len());
            out.push_str(&text[..cut]);
            out.push_str(ELLIPSIS);
            out
        }
        None => text.to_string(),
    }
}

/// Removes every character outside printable ASCII (0x20..=0x7E), keeping newlines.
pub fn sanitize(text: &str) -> String {
    text.chars().filter(|ch| is_drawable(*ch)).collect()
}

pub fn is_drawable(ch: char) -> bool {
    ch == '\n' || (' '..='~').contains(&ch)
}

/// `clamp` then `sanitize`, the order every drawing call uses.
pub fn prepare(text: Option<&str>, max_chars: usize) -> String {
    sanitize(&clamp(text, max_chars))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn clamp_leaves_short_text_alone() {
        assert_eq!(clamp(Some("Softgel"), 100), "Softgel");
        assert_eq!(clamp(Some("abc"), 3), "abc");
    }

    #[test]
    fn clamp_truncates_and_appends_ellipsis() {
        assert_eq!(clamp(Some("abcdef"), 3), "abc...");
        assert_eq!(clamp(Some("abcdef"), 0), "...");
    }

    #[test]
    fn clamp_treats_absent_as_empty() {
        assert_eq!(clamp(None, 10), "");
    }

    #[test]
    fn clamp_counts_characters_not_bytes() {
        assert_eq!(clamp(Some("\u{e9}\u{e9}\u{e9}\u{e9}"), 2), "\u{e9}\u{e9}...");
    }

    #[test]
    fn sanitize_removes_rather_than_replaces() {
        assert_eq!(sanitize("Caf\u{e9} Latte\t\u{2122}"), "Caf Latte");
        assert_eq!(sanitize("line one\nline two"), "line one\nline two");
        assert_eq!(sanitize("\u{1F600}"), "");
    }

    #[test]
    fn prepare_measures_what_is_drawn() {
        // The cut happens before the non-ASCII character is stripped.
        assert_eq!(prepare(Some("ab\u{e9}cd"), 3), "ab...");
        assert_eq!(prepare(None, 3), "");
    }

    proptest! {
        #[test]
        fn prepared_text_is_bounded_and_printable(text in "\\PC*", max in 0usize..64) {
            let out = prepare(Some(&text), max);
            prop_assert!(out.chars().count() <= max + ELLIPSIS.len());
            prop_assert!(out.bytes().all(|b| b == b'\n' || (0x20..=0x7E).contains(&b)));
        }

        #[test]
        fn clamp_is_identity_within_limit(text in "[ -~]{0,20}") {
            prop_assert_eq!(clamp(Some(&text), 20), text);
        }
    }
}
