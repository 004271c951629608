//! Structured-block extraction strategy: the primary path.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use super::ExtractionStrategy;
use crate::{
    coerce,
    error::{ExtractError, Result},
    metrics,
    record::{AtwaterCheck, ExtractionResult, ExtractionSource, FoodItem, MacroSet},
    title,
};

/// Matches the `**NUTRITION_DATA:**` heading followed by a fenced code
/// region holding one JSON object. The capture is non-greedy but the
/// closing fence terminates it, so nested objects (`foodItems`,
/// `processed`, `atwaterCheck`) stay inside the body.
static NUTRITION_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)\*\*NUTRITION_DATA:\*\*\s*```(?:json)?\s*(\{.*?\})\s*```")
        .expect("invalid nutrition-block pattern")
});

/// Strategy that parses the fenced NUTRITION_DATA JSON block.
///
/// The block is ingested field-by-field: the four macros must be present
/// and numeric (pass-through, no rounding), everything else is optional
/// and independently nullable. Any failure is returned as an error so
/// the orchestrator can fall back to the legacy prose patterns.
///
/// # Examples
///
/// ```
/// use nutriparse::extract::{ExtractionStrategy, StructuredStrategy};
///
/// let response = "Nice meal!\n\n**NUTRITION_DATA:**\n```json\n{\"calories\": 520, \"protein\": 42, \"fat\": 14, \"carbs\": 55}\n```";
/// let result = StructuredStrategy.extract(response).unwrap();
/// assert_eq!(result.macros.unwrap().calories, 520.0);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuredStrategy;

impl StructuredStrategy {
    fn required_macro(block: &Value, field: &'static str) -> Result<f64> {
        block
            .get(field)
            .and_then(coerce::as_number)
            .ok_or(ExtractError::MissingField { field })
    }

    /// Accepts the array shape only; items themselves are built
    /// leniently and never reject the response.
    fn food_items(block: &Value) -> Option<Vec<FoodItem>> {
        block
            .get("foodItems")
            .and_then(Value::as_array)
            .map(|items| items.iter().map(FoodItem::from_value).collect())
    }

    /// Passes the upstream check through when it has a boolean `passed`;
    /// the client does not recompute it on this path.
    fn atwater_check(block: &Value) -> Option<AtwaterCheck> {
        let check = block.get("atwaterCheck")?;
        let passed = check.get("passed")?.as_bool()?;
        Some(AtwaterCheck {
            passed,
            calculated_calories: check
                .get("calculatedCalories")
                .map(coerce::to_number)
                .unwrap_or(0.0),
            difference: check.get("difference").map(coerce::to_number).unwrap_or(0.0),
        })
    }

    fn active_query(block: &Value) -> Option<String> {
        let query = block.get("activeQuery")?.as_str()?.trim();
        if query.is_empty() {
            None
        } else {
            Some(query.to_string())
        }
    }
}

impl ExtractionStrategy for StructuredStrategy {
    #[inline]
    fn name(&self) -> &'static str {
        "structured"
    }

    fn extract(&self, response_text: &str) -> Result<ExtractionResult> {
        let captures = NUTRITION_BLOCK
            .captures(response_text)
            .ok_or(ExtractError::MissingBlock)?;
        let body = captures[1].trim().to_string();

        let block: Value = serde_json::from_str(&body)?;

        let macros = MacroSet::new(
            Self::required_macro(&block, "calories")?,
            Self::required_macro(&block, "protein")?,
            Self::required_macro(&block, "carbs")?,
            Self::required_macro(&block, "fat")?,
        );

        let block_title = block.get("title").and_then(Value::as_str);

        Ok(ExtractionResult {
            macros: Some(macros),
            extended_metrics: metrics::reconcile(&block),
            title: title::sanitize(block_title, response_text),
            certainty: block.get("certainty").and_then(coerce::as_number),
            food_items: Self::food_items(&block),
            atwater_check: Self::atwater_check(&block),
            active_query: Self::active_query(&block),
            source: ExtractionSource::Structured,
        })
    }
}
