//! Display-title extraction and sanitization.
//!
//! The upstream model is asked for a two-word title, but it sometimes
//! returns a sentence of analysis narration instead ("Based on the
//! visible ingredients..."). Sanitization rejects anything that reads
//! like narration and falls back to the `**Title:**` marker in the
//! response text, then to nothing — the caller shows a generic "Meal"
//! label when no title survives.

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// How far into the response text the `**Title:**` marker is searched.
/// Titles are prompted onto the first line; anything deeper is prose.
pub const TITLE_SCAN_WINDOW: usize = 500;

/// Longest candidate accepted as a title. Real food names fit well
/// within this; narration does not.
pub const MAX_TITLE_LEN: usize = 30;

/// Phrases that mark a candidate as analysis narration rather than a
/// food name. Compared case-insensitively after accent folding.
const NARRATION_PHRASES: &[&str] = &[
    "analyzing",
    "calculation",
    "estimate",
    "based on",
    "looks like",
    "appears to be",
    "seems to be",
    "images together",
];

static TITLE_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\*\*Title:\*\*\s*([^\n]+)").expect("invalid title pattern"));

/// Sanitizes a candidate title, falling back to the response text.
///
/// A non-empty candidate is accepted unless it contains a narration
/// phrase or exceeds [`MAX_TITLE_LEN`] characters after trimming. A
/// rejected or absent candidate falls through to the `**Title:**` marker
/// scan over the first [`TITLE_SCAN_WINDOW`] characters of
/// `fallback_text`. Returns `None` when neither source yields a usable
/// title.
///
/// # Examples
///
/// ```
/// use nutriparse::title::sanitize;
///
/// assert_eq!(sanitize(Some("Grilled Chicken"), ""), Some("Grilled Chicken".into()));
/// assert_eq!(sanitize(Some("Based on the visible ingredients"), ""), None);
/// ```
pub fn sanitize(candidate: Option<&str>, fallback_text: &str) -> Option<String> {
    if let Some(raw) = candidate {
        let trimmed = raw.trim();
        if !trimmed.is_empty() && is_plausible_food_name(trimmed) {
            return Some(trimmed.to_string());
        }
    }
    from_text_marker(fallback_text)
}

/// Scans the head of the response text for a `**Title:**` line.
///
/// Markdown emphasis markers and brackets are stripped from the match —
/// the model tends to echo the prompt's placeholder formatting.
pub fn from_text_marker(text: &str) -> Option<String> {
    let head = head_chars(text, TITLE_SCAN_WINDOW);
    let captures = TITLE_MARKER.captures(head)?;
    let cleaned = captures[1]
        .replace("**", "")
        .replace(&['*', '[', ']'][..], "")
        .trim()
        .to_string();
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

/// Heuristic rejection of narration-shaped candidates.
fn is_plausible_food_name(candidate: &str) -> bool {
    if candidate.chars().count() > MAX_TITLE_LEN {
        return false;
    }
    let folded = fold_for_comparison(candidate);
    !NARRATION_PHRASES
        .iter()
        .any(|phrase| folded.contains(phrase))
}

/// Lowercases and strips combining marks so "Sautéed" and "sauteed"
/// compare equal against the deny list.
fn fold_for_comparison(s: &str) -> String {
    s.nfkd()
        .filter(|c| !unicode_normalization::char::is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
}

/// Takes at most `limit` characters from the front of `text`, landing on
/// a char boundary.
fn head_chars(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_two_word_title() {
        assert_eq!(
            sanitize(Some("Yogurt Berries"), ""),
            Some("Yogurt Berries".to_string())
        );
    }

    #[test]
    fn test_trims_candidate() {
        assert_eq!(
            sanitize(Some("  Chocolate Cookie  "), ""),
            Some("Chocolate Cookie".to_string())
        );
    }

    #[test]
    fn test_rejects_narration_phrases() {
        assert_eq!(sanitize(Some("Analyzing your meal"), ""), None);
        assert_eq!(sanitize(Some("Based on the photo"), ""), None);
        assert_eq!(sanitize(Some("This appears to be rice"), ""), None);
    }

    #[test]
    fn test_rejects_over_length() {
        let long = "A very long description of what is on the plate";
        assert_eq!(sanitize(Some(long), ""), None);
    }

    #[test]
    fn test_rejection_falls_back_to_marker() {
        let text = "**Title:** Grilled Salmon\n\nSome analysis follows.";
        assert_eq!(
            sanitize(Some("Based on the visible ingredients"), text),
            Some("Grilled Salmon".to_string())
        );
    }

    #[test]
    fn test_marker_strips_emphasis_and_brackets() {
        let text = "**Title:** [**Chicken Salad**]\n";
        assert_eq!(from_text_marker(text), Some("Chicken Salad".to_string()));
    }

    #[test]
    fn test_marker_beyond_window_ignored() {
        let mut text = "x".repeat(TITLE_SCAN_WINDOW + 10);
        text.push_str("\n**Title:** Late Title\n");
        assert_eq!(from_text_marker(&text), None);
    }

    #[test]
    fn test_accent_folding_in_deny_list() {
        // "estimate" hides behind an accent
        assert_eq!(sanitize(Some("éstimate update"), ""), None);
    }

    #[test]
    fn test_empty_candidate_and_no_marker() {
        assert_eq!(sanitize(Some("   "), "no marker here"), None);
        assert_eq!(sanitize(None, "no marker here"), None);
    }
}
