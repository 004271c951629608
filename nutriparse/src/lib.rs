//! # nutriparse
//!
//! Extraction and reconciliation pipeline for LLM meal-analysis responses.
//!
//! The remote analysis service answers with free-form text: a short title
//! marker, conversational prose, and (usually) a fenced `NUTRITION_DATA`
//! JSON block holding the estimate. This crate deterministically turns
//! that text into a validated nutrition record:
//!
//! - **Structured path**: locate and parse the fenced block, validate the
//!   four mandatory macros, and pass everything through verbatim.
//! - **Legacy fallback**: when the block is absent or broken, regex-match
//!   macro bullet lines in the trailing slice of the text.
//! - **Degraded result**: when both fail, return an all-null record — the
//!   caller keeps whatever values it was already showing.
//!
//! The pipeline is pure and synchronous: no I/O, no shared state, safe to
//! run concurrently on independent responses.
//!
//! ## Quick Start
//!
//! ```rust
//! use nutriparse::extract;
//!
//! let response = "**Title:** Chicken Bowl\n\n\
//!     Grilled chicken over rice. Mostly whole foods (NOVA 1).\n\n\
//!     **NUTRITION_DATA:**\n```json\n\
//!     {\"calories\": 520, \"protein\": 42, \"fat\": 14, \"carbs\": 55, \"certainty\": 8}\n```";
//!
//! let result = extract(response);
//! let macros = result.macros.unwrap();
//! assert_eq!(macros.calories, 520.0);
//! assert_eq!(result.title.as_deref(), Some("Chicken Bowl"));
//! ```
//!
//! ## Display text
//!
//! The same raw response also feeds the conversation UI, with the
//! machine-facing markers stripped:
//!
//! ```rust
//! use nutriparse::clean_response;
//!
//! let shown = clean_response("Short update.\n");
//! assert!(shown.starts_with("Short update."));
//! ```

pub mod cleaner;
pub mod coerce;
pub mod energy;
pub mod error;
pub mod extract;
pub mod metrics;
pub mod record;
pub mod title;

pub use error::{ExtractError, Result};
pub use extract::{ExtractionStrategy, LegacyTextStrategy, NutritionExtractor, StructuredStrategy};
pub use record::{
    AtwaterCheck, ExtendedMetrics, ExtractionResult, ExtractionSource, FoodItem, MacroSet,
};

/// Extracts a nutrition record from one analysis response.
///
/// This is the main entry point. It runs the default strategy chain
/// (structured block, then legacy prose) and never fails — malformed
/// input degrades to a narrower result instead.
///
/// Both the initial-analysis and refinement call shapes produce the same
/// response format, so both go through this one function; combine a
/// refinement's result with the previous one via
/// [`ExtractionResult::merge_over`].
///
/// # Examples
///
/// ```
/// use nutriparse::extract;
///
/// // Prose-only response: the legacy fallback picks up the bullet lines
/// let response = "- Calories: 450 kcal\n- Protein: 30 g\n- Fat: 12 g\n- Carbs: 50 g";
/// let result = extract(response);
/// assert_eq!(result.macros.unwrap().protein, 30.0);
/// ```
pub fn extract(response_text: &str) -> ExtractionResult {
    NutritionExtractor::new().extract(response_text)
}

/// Extracts a nutrition record using a custom extractor.
///
/// Lets callers reorder or replace strategies, e.g. to widen the legacy
/// trailing window for a more verbose upstream model.
///
/// # Examples
///
/// ```
/// use nutriparse::{extract_with, LegacyTextStrategy, NutritionExtractor};
///
/// let extractor = NutritionExtractor::with_strategies(vec![
///     Box::new(LegacyTextStrategy::with_window(4000)),
/// ]);
/// let result = extract_with("no values here", &extractor);
/// assert!(result.macros.is_none());
/// ```
pub fn extract_with(response_text: &str, extractor: &NutritionExtractor) -> ExtractionResult {
    extractor.extract(response_text)
}

/// Produces the user-facing version of a raw analysis response.
///
/// Strips the title marker and the structured-data block, then appends a
/// fixed invitation for more detail. See [`cleaner::clean`].
pub fn clean_response(response_text: &str) -> String {
    cleaner::clean(response_text)
}

#[cfg(test)]
mod tests {
    use super::*;

    const STRUCTURED: &str = "**Title:** Greek Yogurt\n\nPlain yogurt with berries.\n\n**NUTRITION_DATA:**\n```json\n{\"calories\": 206, \"protein\": 20, \"fat\": 4, \"carbs\": 22}\n```";

    #[test]
    fn test_extract_structured() {
        let result = extract(STRUCTURED);
        assert_eq!(result.macros.unwrap().calories, 206.0);
        assert_eq!(result.title.as_deref(), Some("Greek Yogurt"));
        assert_eq!(result.source, ExtractionSource::Structured);
    }

    #[test]
    fn test_extract_legacy_prose() {
        let response = "**Macros:**\n- Calories: 450 kcal\n- Protein: 30 g\n- Fat: 12 g\n- Carbs: 50 g";
        let result = extract(response);
        assert_eq!(result.source, ExtractionSource::Legacy);
    }

    #[test]
    fn test_extract_nothing() {
        let result = extract("The image is too blurry to analyze.");
        assert!(result.macros.is_none());
        assert_eq!(result.source, ExtractionSource::None);
    }

    #[test]
    fn test_clean_strips_markers() {
        let shown = clean_response(STRUCTURED);
        assert!(!shown.contains("NUTRITION_DATA"));
        assert!(!shown.contains("**Title:**"));
    }
}
