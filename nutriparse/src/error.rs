//! Error types for nutrition-response extraction.

/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractError>;

/// Errors that can occur while a single extraction strategy runs.
///
/// These never escape the pipeline: the orchestrator treats every variant
/// as "this strategy is not applicable, try the next one". They exist so
/// the fallback chain is an explicit, testable sequence of outcomes rather
/// than implicit control flow.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// No `NUTRITION_DATA` block was found in the response text.
    #[error("no structured nutrition block found in response")]
    MissingBlock,

    /// A block was found but its body is not parseable JSON.
    #[error("malformed nutrition block: {0}")]
    MalformedBlock(#[from] serde_json::Error),

    /// The block parsed but a required macro field is missing or non-numeric.
    #[error("nutrition block is missing required numeric field: {field}")]
    MissingField {
        /// Name of the missing or non-numeric field.
        field: &'static str,
    },

    /// The legacy prose patterns failed to match all four macro fields.
    #[error("macro lines did not match in response text")]
    NoMacroLines,
}

impl ExtractError {
    /// Creates a missing-field error.
    #[inline]
    pub fn missing_field(field: &'static str) -> Self {
        Self::MissingField { field }
    }
}
