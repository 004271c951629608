//! Legacy prose extraction strategy: the fallback path.
//!
//! Older or malformed responses present the final values as bullet lines
//! ("- Calories: 450 kcal") instead of a structured block. This strategy
//! regex-matches each field independently over the trailing slice of the
//! text, where nutrition summaries conventionally land.

use once_cell::sync::Lazy;
use regex::Regex;

use super::ExtractionStrategy;
use crate::{
    error::{ExtractError, Result},
    record::{ExtendedMetrics, ExtractionResult, ExtractionSource, MacroSet},
    title,
};

/// Default trailing-window size in characters. Tuned against observed
/// response lengths from the current upstream model; configurable via
/// [`LegacyTextStrategy::with_window`] in case a different model's
/// output shape invalidates it.
pub const DEFAULT_TRAIL_WINDOW: usize = 1500;

/// Prefer values inside a `**Macros:**` section when one exists.
static MACROS_SECTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)\*\*Macros:\*\*\s*(.*?)(?:\*\*Processed Food:\*\*|$)")
        .expect("invalid macros-section pattern")
});

// Each field gets its own named matcher so the fallback's behavior stays
// auditable. The optional trailing group stands in for a negative
// lookahead: a gram value followed by "x" is a portion multiplier
// ("2 x 30g"), not a macro line, and is skipped.
static CALORIES: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)[-•\s]*Calories:\s*([\d,]+)\s*kcal").expect("invalid calories pattern")
});
static PROTEIN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)[-•\s]*Protein:\s*([\d,]+)\s*g(\s*x)?").expect("invalid protein pattern")
});
static FAT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)[-•\s]*Fat:\s*([\d,]+)\s*g(\s*x)?").expect("invalid fat pattern"));
static CARBS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)[-•\s]*(?:Net\s+)?Carbs:\s*([\d,]+)\s*g(\s*x)?")
        .expect("invalid carbs pattern")
});
static PROCESSED_CALORIES: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)[-•\s]*Processed\s+calories:\s*([\d,]+)\s*kcal")
        .expect("invalid processed-calories pattern")
});
static PROCESSED_PERCENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)[-•\s]*Processed\s+percent:\s*([\d,]+)%")
        .expect("invalid processed-percent pattern")
});

/// Strategy that pattern-matches macro bullet lines in free text.
///
/// All four macro fields must match or the strategy fails — partial
/// macro sets are never produced. Processed-food values are matched
/// independently and yield a minimal [`ExtendedMetrics`] when present.
#[derive(Debug, Clone)]
pub struct LegacyTextStrategy {
    /// Size of the trailing slice scanned for values, in characters.
    trail_window: usize,
}

impl Default for LegacyTextStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl LegacyTextStrategy {
    /// Creates a strategy with the default trailing window.
    #[inline]
    pub fn new() -> Self {
        Self {
            trail_window: DEFAULT_TRAIL_WINDOW,
        }
    }

    /// Creates a strategy with a custom trailing window.
    #[inline]
    pub const fn with_window(trail_window: usize) -> Self {
        Self { trail_window }
    }

    /// First match of a gram value not followed by an `x` multiplier.
    fn match_grams(re: &Regex, text: &str) -> Option<f64> {
        re.captures_iter(text)
            .find(|cap| cap.get(2).is_none())
            .and_then(|cap| parse_separated_int(&cap[1]))
    }

    /// First match of a plain numeric value (kcal or percent lines).
    fn match_value(re: &Regex, text: &str) -> Option<f64> {
        re.captures(text).and_then(|cap| parse_separated_int(&cap[1]))
    }
}

impl ExtractionStrategy for LegacyTextStrategy {
    #[inline]
    fn name(&self) -> &'static str {
        "legacy_text"
    }

    fn extract(&self, response_text: &str) -> Result<ExtractionResult> {
        let trailing = tail_chars(response_text, self.trail_window);

        // Prefer the Macros: section when present; otherwise scan the
        // whole trailing slice.
        let macros_text = MACROS_SECTION
            .captures(trailing)
            .and_then(|cap| cap.get(1))
            .map_or(trailing, |m| m.as_str());

        let calories = Self::match_value(&CALORIES, macros_text);
        let protein = Self::match_grams(&PROTEIN, macros_text);
        let fat = Self::match_grams(&FAT, macros_text);
        let carbs = Self::match_grams(&CARBS, macros_text);

        // Best-effort, independent of whether the macros matched.
        let best_effort_title = title::from_text_marker(response_text);

        let (Some(calories), Some(protein), Some(fat), Some(carbs)) =
            (calories, protein, fat, carbs)
        else {
            return Err(ExtractError::NoMacroLines);
        };

        // Processed values live outside the Macros: section, so they are
        // matched against the full trailing slice.
        let processed_calories = Self::match_value(&PROCESSED_CALORIES, trailing);
        let processed_percent = Self::match_value(&PROCESSED_PERCENT, trailing);
        let extended_metrics = (processed_calories.is_some() || processed_percent.is_some()).then(
            || ExtendedMetrics {
                processed_calories,
                processed_percent,
                ..ExtendedMetrics::default()
            },
        );

        Ok(ExtractionResult {
            macros: Some(MacroSet::new(calories, protein, carbs, fat)),
            extended_metrics,
            title: best_effort_title,
            certainty: None,
            food_items: None,
            atwater_check: None,
            active_query: None,
            source: ExtractionSource::Legacy,
        })
    }
}

/// Parses an integer with optional thousands separators.
fn parse_separated_int(s: &str) -> Option<f64> {
    s.replace(',', "").parse::<i64>().ok().map(|n| n as f64)
}

/// Takes at most `limit` characters from the end of `text`, landing on a
/// char boundary.
fn tail_chars(text: &str, limit: usize) -> &str {
    let char_count = text.chars().count();
    if char_count <= limit {
        return text;
    }
    let skip = char_count - limit;
    match text.char_indices().nth(skip) {
        Some((idx, _)) => &text[idx..],
        None => text,
    }
}
