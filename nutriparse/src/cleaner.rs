//! Response cleaning for conversation display.
//!
//! The raw response interleaves user-facing prose with machine-facing
//! markers: the `**Title:**` line and the fenced NUTRITION_DATA block.
//! Neither is ever shown verbatim; this module strips them out and
//! appends a short invitation for follow-up detail.

use once_cell::sync::Lazy;
use regex::Regex;

/// Fixed invitation appended to every cleaned response. Callers clean
/// the raw response exactly once, so the invitation appears exactly once
/// in the conversation.
pub const FOLLOW_UP_INVITATION: &str = "Feel free to share any other details.";

static TITLE_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\*\*Title:\*\*[^\n]*\n+").expect("invalid title-line pattern"));

static NUTRITION_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)\*\*NUTRITION_DATA:\*\*\s*```(?:json)?\s*\{.*?\}\s*```")
        .expect("invalid nutrition-block pattern")
});

/// Produces the user-facing version of a raw analysis response.
///
/// Removes the `**Title:**` line and the entire structured-data block
/// (heading, fences and body), drops invisible characters the model
/// occasionally emits, trims surrounding whitespace, and appends
/// [`FOLLOW_UP_INVITATION`].
///
/// # Examples
///
/// ```
/// use nutriparse::cleaner::clean;
///
/// let raw = "**Title:** Greek Yogurt\n\nLooks great!\n\n**NUTRITION_DATA:**\n```json\n{\"calories\": 150}\n```";
/// let shown = clean(raw);
/// assert!(shown.starts_with("Looks great!"));
/// assert!(!shown.contains("NUTRITION_DATA"));
/// ```
pub fn clean(response_text: &str) -> String {
    let without_title = TITLE_LINE.replace(response_text, "");
    let without_block = NUTRITION_BLOCK.replace(&without_title, "");
    let visible = remove_invisible_chars(&without_block);
    let trimmed = visible.trim();
    format!("{trimmed}\n\n{FOLLOW_UP_INVITATION}")
}

/// Strips BOM, zero-width and directional characters that break display
/// and string matching.
fn remove_invisible_chars(input: &str) -> String {
    input
        .chars()
        .filter(|c| {
            !matches!(
                c,
                '\u{FEFF}' // BOM
                    | '\u{200B}' // zero-width space
                    | '\u{200C}' // zero-width non-joiner
                    | '\u{200D}' // zero-width joiner
                    | '\u{2060}' // word joiner
                    | '\u{200E}' // left-to-right mark
                    | '\u{200F}' // right-to-left mark
            )
        })
        .collect()
}
