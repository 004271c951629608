//! Nutrition record types produced by the extraction pipeline.

use serde::{Deserialize, Serialize};

use crate::coerce;

/// The four mandatory macro fields of a meal.
///
/// A `MacroSet` only exists when extraction produced all four values —
/// partial sets are never constructed. Calories are kcal, the rest grams.
/// Values are non-negative by convention but not clamped here; range
/// validation is a separate concern (see [`MacroSet::validate`]).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacroSet {
    /// Energy in kcal.
    pub calories: f64,
    /// Protein in grams.
    pub protein: f64,
    /// Carbohydrates in grams.
    pub carbs: f64,
    /// Fat in grams.
    pub fat: f64,
}

/// Caloric share of each macro relative to reported calories.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacroPercentages {
    /// Percent of calories from protein.
    pub protein: f64,
    /// Percent of calories from carbohydrates.
    pub carbs: f64,
    /// Percent of calories from fat.
    pub fat: f64,
}

impl MacroSet {
    /// Creates a macro set from the four required values.
    #[inline]
    pub const fn new(calories: f64, protein: f64, carbs: f64, fat: f64) -> Self {
        Self {
            calories,
            protein,
            carbs,
            fat,
        }
    }

    /// Sums an iterator of macro sets field-by-field.
    ///
    /// # Examples
    ///
    /// ```
    /// use nutriparse::record::MacroSet;
    ///
    /// let meals = [
    ///     MacroSet::new(400.0, 30.0, 40.0, 12.0),
    ///     MacroSet::new(250.0, 10.0, 30.0, 9.0),
    /// ];
    /// let day = MacroSet::sum(meals);
    /// assert_eq!(day.calories, 650.0);
    /// assert_eq!(day.protein, 40.0);
    /// ```
    pub fn sum<I: IntoIterator<Item = Self>>(sets: I) -> Self {
        sets.into_iter()
            .fold(Self::new(0.0, 0.0, 0.0, 0.0), |acc, m| {
                Self::new(
                    acc.calories + m.calories,
                    acc.protein + m.protein,
                    acc.carbs + m.carbs,
                    acc.fat + m.fat,
                )
            })
    }

    /// Caloric share of each macro at 4/4/9 kcal per gram, rounded to
    /// whole percent. Returns `None` when reported calories are zero.
    pub fn percentages(&self) -> Option<MacroPercentages> {
        if self.calories == 0.0 {
            return None;
        }
        let pct = |kcal: f64| (kcal / self.calories * 100.0).round();
        Some(MacroPercentages {
            protein: pct(self.protein * crate::energy::PROTEIN_KCAL_PER_G),
            carbs: pct(self.carbs * crate::energy::CARBS_KCAL_PER_G),
            fat: pct(self.fat * crate::energy::FAT_KCAL_PER_G),
        })
    }

    /// Remaining allowance against daily targets, floored at zero per field.
    pub fn remaining(&self, targets: &MacroSet) -> MacroSet {
        MacroSet::new(
            (targets.calories - self.calories).max(0.0),
            (targets.protein - self.protein).max(0.0),
            (targets.carbs - self.carbs).max(0.0),
            (targets.fat - self.fat).max(0.0),
        )
    }

    /// Range findings for a macro set. An empty vector means the values
    /// are plausible.
    pub fn validate(&self) -> Vec<&'static str> {
        let mut findings = Vec::new();
        if self.calories < 0.0 {
            findings.push("calories cannot be negative");
        }
        if self.protein < 0.0 {
            findings.push("protein cannot be negative");
        }
        if self.carbs < 0.0 {
            findings.push("carbs cannot be negative");
        }
        if self.fat < 0.0 {
            findings.push("fat cannot be negative");
        }
        if self.calories > 10_000.0 {
            findings.push("calories seem unusually high");
        }
        if self.protein > 1_000.0 {
            findings.push("protein seems unusually high");
        }
        findings
    }
}

/// Optional metrics beyond the four macros. Each field is independently
/// nullable; a record with every field `None` is never constructed (the
/// reconciler returns `None` for the whole record instead, so "no data"
/// stays distinct from "all zero").
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ExtendedMetrics {
    /// Calories from processed sources (NOVA 2-4), kcal.
    pub processed_calories: Option<f64>,
    /// Percent of calories from processed sources.
    pub processed_percent: Option<f64>,
    /// Calories from ultra-processed sources (NOVA 4 only), kcal.
    pub ultra_processed_calories: Option<f64>,
    /// Percent of calories from ultra-processed sources.
    pub ultra_processed_percent: Option<f64>,
    /// Dietary fiber in grams.
    pub fiber: Option<f64>,
    /// Caffeine in milligrams.
    pub caffeine: Option<f64>,
    /// Fresh fruit and vegetables in grams.
    pub fresh_produce: Option<f64>,
}

/// One analyzed food component, reported for transparency only.
///
/// Items are built leniently through numeric coercion and carry no
/// invariants beyond being part of an array in the response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodItem {
    /// Display name of the component.
    pub name: String,
    /// Estimated weight in grams.
    pub weight: f64,
    /// Energy in kcal.
    pub calories: f64,
    /// Protein in grams.
    pub protein: f64,
    /// Carbohydrates in grams.
    pub carbs: f64,
    /// Fat in grams.
    pub fat: f64,
    /// Upstream confidence in [0, 1].
    pub confidence: f64,
    /// Where the estimate came from (label, scale, visual, ...).
    pub source: String,
    /// Whether the item matched a known reference food.
    pub matched: bool,
}

impl FoodItem {
    /// Builds an item from a raw JSON value without failing.
    ///
    /// Missing or mistyped fields degrade to empty strings, zeros and
    /// `false` rather than rejecting the whole response.
    pub fn from_value(value: &serde_json::Value) -> Self {
        let str_field = |name: &str| {
            value
                .get(name)
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string()
        };
        let num_field = |name: &str| value.get(name).map(coerce::to_number).unwrap_or(0.0);

        Self {
            name: str_field("name"),
            weight: num_field("weight"),
            calories: num_field("calories"),
            protein: num_field("protein"),
            carbs: num_field("carbs"),
            fat: num_field("fat"),
            confidence: num_field("confidence"),
            source: str_field("source"),
            matched: value
                .get("matched")
                .and_then(|v| v.as_bool())
                .unwrap_or(false),
        }
    }
}

/// Result of the Atwater energy-consistency check.
///
/// Informational only — an inconsistent estimate is surfaced, never
/// blocked.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AtwaterCheck {
    /// Whether the reported calories are within tolerance of the
    /// macro-derived value.
    pub passed: bool,
    /// Calories derived from the macros at 4/4/9 kcal per gram.
    pub calculated_calories: f64,
    /// Absolute gap between reported and calculated calories.
    pub difference: f64,
}

/// Which extraction strategy produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExtractionSource {
    /// The structured NUTRITION_DATA block parsed and validated.
    Structured,
    /// The legacy prose patterns matched after the structured path failed.
    Legacy,
    /// Every strategy failed; the result is degraded.
    None,
}

/// Everything the pipeline can recover from one analysis response.
///
/// Constructed fresh per analysis or refinement call and never mutated
/// afterwards; the caller flattens it into a meal record. `macros` is
/// either complete or `None` — a `None` here means "extraction failed,
/// keep whatever you were showing before", never "zero everything out".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// The four mandatory macros, or `None` when extraction failed.
    pub macros: Option<MacroSet>,
    /// Optional extended metrics.
    pub extended_metrics: Option<ExtendedMetrics>,
    /// Sanitized display title.
    pub title: Option<String>,
    /// Upstream certainty rating (0-10).
    pub certainty: Option<f64>,
    /// Per-component breakdown, structured path only.
    pub food_items: Option<Vec<FoodItem>>,
    /// Upstream energy-consistency check, structured path only.
    pub atwater_check: Option<AtwaterCheck>,
    /// Follow-up question the upstream wants answered, if any.
    pub active_query: Option<String>,
    /// Which strategy produced this result.
    pub source: ExtractionSource,
}

impl ExtractionResult {
    /// A fully degraded result: every field null.
    pub fn empty() -> Self {
        Self {
            macros: None,
            extended_metrics: None,
            title: None,
            certainty: None,
            food_items: None,
            atwater_check: None,
            active_query: None,
            source: ExtractionSource::None,
        }
    }

    /// Applies this result over a previous one, expressing the caller's
    /// retention contract: a refinement that failed to parse must not
    /// wipe out previously extracted values.
    ///
    /// Macro-bearing results replace the previous state wholesale; a
    /// null-macro result keeps the previous macros and metrics and only
    /// carries forward whatever it did manage to recover (title).
    pub fn merge_over(self, previous: &Self) -> Self {
        if self.macros.is_some() {
            return self;
        }
        Self {
            macros: previous.macros,
            extended_metrics: previous.extended_metrics,
            title: self.title.or_else(|| previous.title.clone()),
            certainty: previous.certainty,
            food_items: previous.food_items.clone(),
            atwater_check: previous.atwater_check,
            active_query: self.active_query,
            source: self.source,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_macro_sum() {
        let total = MacroSet::sum([
            MacroSet::new(100.0, 10.0, 5.0, 2.0),
            MacroSet::new(200.0, 20.0, 15.0, 8.0),
        ]);
        assert_eq!(total, MacroSet::new(300.0, 30.0, 20.0, 10.0));
    }

    #[test]
    fn test_percentages() {
        let m = MacroSet::new(400.0, 25.0, 50.0, 10.0);
        let pct = m.percentages().unwrap();
        assert_eq!(pct.protein, 25.0); // 100 kcal of 400
        assert_eq!(pct.carbs, 50.0); // 200 kcal of 400
        assert_eq!(pct.fat, 23.0); // 90 kcal of 400, rounded
    }

    #[test]
    fn test_percentages_zero_calories() {
        assert!(MacroSet::new(0.0, 10.0, 10.0, 10.0).percentages().is_none());
    }

    #[test]
    fn test_remaining_floors_at_zero() {
        let consumed = MacroSet::new(1900.0, 160.0, 120.0, 80.0);
        let targets = MacroSet::new(2000.0, 150.0, 200.0, 70.0);
        let left = consumed.remaining(&targets);
        assert_eq!(left.calories, 100.0);
        assert_eq!(left.protein, 0.0);
        assert_eq!(left.carbs, 80.0);
        assert_eq!(left.fat, 0.0);
    }

    #[test]
    fn test_validate_flags_out_of_range() {
        let m = MacroSet::new(12_000.0, -5.0, 40.0, 10.0);
        let findings = m.validate();
        assert!(findings.contains(&"calories seem unusually high"));
        assert!(findings.contains(&"protein cannot be negative"));
        assert_eq!(MacroSet::new(500.0, 30.0, 40.0, 20.0).validate().len(), 0);
    }

    #[test]
    fn test_food_item_lenient_construction() {
        let item = FoodItem::from_value(&json!({
            "name": "Greek yogurt",
            "weight": "214g",
            "calories": 150,
            "confidence": 0.9,
            "source": "label",
            "matched": true
        }));
        assert_eq!(item.name, "Greek yogurt");
        assert_eq!(item.weight, 214.0);
        assert_eq!(item.protein, 0.0);
        assert!(item.matched);
    }

    #[test]
    fn test_merge_over_retains_previous_macros() {
        let previous = ExtractionResult {
            macros: Some(MacroSet::new(450.0, 30.0, 40.0, 18.0)),
            title: Some("Chicken Bowl".into()),
            ..ExtractionResult::empty()
        };
        let failed = ExtractionResult::empty();
        let merged = failed.merge_over(&previous);
        assert_eq!(merged.macros, previous.macros);
        assert_eq!(merged.title.as_deref(), Some("Chicken Bowl"));
    }

    #[test]
    fn test_merge_over_replaces_on_success() {
        let previous = ExtractionResult {
            macros: Some(MacroSet::new(450.0, 30.0, 40.0, 18.0)),
            ..ExtractionResult::empty()
        };
        let refined = ExtractionResult {
            macros: Some(MacroSet::new(520.0, 34.0, 44.0, 22.0)),
            source: ExtractionSource::Structured,
            ..ExtractionResult::empty()
        };
        let merged = refined.clone().merge_over(&previous);
        assert_eq!(merged, refined);
    }
}
