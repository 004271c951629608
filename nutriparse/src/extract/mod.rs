//! Extraction strategies and the orchestrator that chains them.

mod legacy;
mod structured;

pub use legacy::{LegacyTextStrategy, DEFAULT_TRAIL_WINDOW};
pub use structured::StructuredStrategy;
use tracing::{debug, warn};

use crate::{error::Result, record::ExtractionResult, title};

/// Trait for strategies that recover a nutrition record from response
/// text.
///
/// Each strategy represents one way of locating and parsing the values.
/// A failed strategy returns an error, which the orchestrator treats as
/// "not applicable, try the next one" — no strategy failure ever reaches
/// the caller.
pub trait ExtractionStrategy: Send + Sync + std::fmt::Debug {
    /// Returns the name of this strategy for diagnostics.
    fn name(&self) -> &'static str;

    /// Attempts to extract a complete result from the response text.
    fn extract(&self, response_text: &str) -> Result<ExtractionResult>;
}

/// Orchestrator that tries extraction strategies in order and takes the
/// first success.
///
/// The default chain is the structured NUTRITION_DATA block first, then
/// the legacy prose patterns. When every strategy fails the orchestrator
/// produces a degraded all-null result (with a best-effort title from
/// the text marker) rather than an error — the caller's contract is to
/// retain previously displayed values when `macros` is `None`, never to
/// zero them out.
///
/// # Examples
///
/// ```
/// use nutriparse::extract::NutritionExtractor;
///
/// let extractor = NutritionExtractor::new();
/// let result = extractor.extract("nothing useful in here");
/// assert!(result.macros.is_none());
/// ```
#[derive(Debug)]
pub struct NutritionExtractor {
    /// Strategies in fallback order.
    strategies: Vec<Box<dyn ExtractionStrategy>>,
}

impl Default for NutritionExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl NutritionExtractor {
    /// Creates an extractor with the default strategy chain:
    /// structured block first, legacy prose second.
    pub fn new() -> Self {
        Self {
            strategies: vec![
                Box::new(StructuredStrategy),
                Box::new(LegacyTextStrategy::new()),
            ],
        }
    }

    /// Creates an extractor with a custom strategy chain, tried in the
    /// given order.
    pub fn with_strategies(strategies: Vec<Box<dyn ExtractionStrategy>>) -> Self {
        Self { strategies }
    }

    /// Extracts a nutrition record from one analysis response.
    ///
    /// Never fails: malformed input degrades through the fallback chain
    /// down to an all-null result.
    pub fn extract(&self, response_text: &str) -> ExtractionResult {
        for strategy in &self.strategies {
            match strategy.extract(response_text) {
                Ok(result) => {
                    debug!(strategy = strategy.name(), "extraction succeeded");
                    return result;
                }
                Err(err) => {
                    warn!(
                        strategy = strategy.name(),
                        error = %err,
                        "extraction strategy failed, falling back"
                    );
                }
            }
        }

        warn!("all extraction strategies failed, returning degraded result");
        ExtractionResult {
            title: title::from_text_marker(response_text),
            ..ExtractionResult::empty()
        }
    }

    /// Returns the names of the registered strategies in fallback order.
    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }
}
