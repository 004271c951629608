//! Extended-metrics assembly and reconciliation.
//!
//! The structured block optionally carries processed-food, fiber,
//! caffeine and fresh-produce estimates alongside the macros. Each field
//! is independently nullable, and the pair of processed/ultra-processed
//! values carries one cross-field invariant: ultra-processed food is a
//! subset of processed food, so the processed value can never sit below
//! the ultra-processed one.

use serde_json::Value;
use tracing::debug;

use crate::{coerce, record::ExtendedMetrics};

/// Assembles extended metrics from the structured block, or `None` when
/// no source field is numeric.
///
/// Field sources: `processed.calories`, `processed.percent`,
/// `ultraProcessed.calories`, `ultraProcessed.percent`, `fiber`,
/// `caffeine`, `freshProduce`. Returning `None` for an all-absent block
/// keeps "no data" distinct from "all zero".
///
/// The subset invariant is applied before returning: if the
/// ultra-processed percent (or calories) exceeds the processed one, the
/// processed value is raised to match. Ultra-processed is authoritative
/// and is never modified.
pub fn reconcile(block: &Value) -> Option<ExtendedMetrics> {
    let nested = |outer: &str, inner: &str| {
        block
            .get(outer)
            .and_then(|v| v.get(inner))
            .and_then(coerce::as_number)
    };
    let top = |name: &str| block.get(name).and_then(coerce::as_number);

    let mut metrics = ExtendedMetrics {
        processed_calories: nested("processed", "calories"),
        processed_percent: nested("processed", "percent"),
        ultra_processed_calories: nested("ultraProcessed", "calories"),
        ultra_processed_percent: nested("ultraProcessed", "percent"),
        fiber: top("fiber"),
        caffeine: top("caffeine"),
        fresh_produce: top("freshProduce"),
    };

    if metrics == ExtendedMetrics::default() {
        return None;
    }

    apply_subset_floor(&mut metrics);
    Some(metrics)
}

/// Raises processed values to the ultra-processed floor where both sides
/// of a pair are present. One-directional by design: ultra-processed is
/// never lowered.
pub fn apply_subset_floor(metrics: &mut ExtendedMetrics) {
    if let (Some(processed), Some(ultra)) =
        (metrics.processed_percent, metrics.ultra_processed_percent)
    {
        if processed < ultra {
            debug!(processed, ultra, "raising processed percent to ultra-processed floor");
            metrics.processed_percent = Some(ultra);
        }
    }
    if let (Some(processed), Some(ultra)) =
        (metrics.processed_calories, metrics.ultra_processed_calories)
    {
        if processed < ultra {
            debug!(processed, ultra, "raising processed calories to ultra-processed floor");
            metrics.processed_calories = Some(ultra);
        }
    }
}

impl ExtendedMetrics {
    /// Merges a newer record over this one, keeping the existing value
    /// wherever the newer one is null. Refinements that drop a metric
    /// must not erase what an earlier analysis established.
    pub fn merge(&self, newer: &ExtendedMetrics) -> ExtendedMetrics {
        ExtendedMetrics {
            processed_calories: newer.processed_calories.or(self.processed_calories),
            processed_percent: newer.processed_percent.or(self.processed_percent),
            ultra_processed_calories: newer
                .ultra_processed_calories
                .or(self.ultra_processed_calories),
            ultra_processed_percent: newer
                .ultra_processed_percent
                .or(self.ultra_processed_percent),
            fiber: newer.fiber.or(self.fiber),
            caffeine: newer.caffeine.or(self.caffeine),
            fresh_produce: newer.fresh_produce.or(self.fresh_produce),
        }
    }

    /// Range check for display-layer use: processed calories must be
    /// non-negative and processed percent within 0-100 when present.
    /// The reconciler itself does not clamp.
    pub fn is_valid(&self) -> bool {
        if matches!(self.processed_calories, Some(c) if c < 0.0) {
            return false;
        }
        if matches!(self.processed_percent, Some(p) if !(0.0..=100.0).contains(&p)) {
            return false;
        }
        true
    }
}

/// Aggregated processed-food totals across several meals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AggregatedProcessed {
    /// Summed processed calories across meals.
    pub processed_calories: f64,
    /// Summed reported calories across meals.
    pub total_calories: f64,
    /// Processed share of total calories, rounded to whole percent.
    pub processed_percent: f64,
}

/// Sums processed calories across a day's meals and derives the overall
/// processed percentage. Meals without extended metrics contribute only
/// to the total.
pub fn aggregate_processed<'a, I>(meals: I) -> AggregatedProcessed
where
    I: IntoIterator<Item = (f64, Option<&'a ExtendedMetrics>)>,
{
    let mut processed_calories = 0.0;
    let mut total_calories = 0.0;
    for (calories, metrics) in meals {
        total_calories += calories;
        if let Some(m) = metrics {
            processed_calories += m.processed_calories.unwrap_or(0.0);
        }
    }
    let processed_percent = if total_calories > 0.0 {
        (processed_calories / total_calories * 100.0).round()
    } else {
        0.0
    };
    AggregatedProcessed {
        processed_calories,
        total_calories,
        processed_percent,
    }
}
