//! Focused tests for the legacy prose matchers and their quirks.

use nutriparse::{ExtractError, ExtractionStrategy, LegacyTextStrategy};
use pretty_assertions::assert_eq;

fn strategy() -> LegacyTextStrategy {
    LegacyTextStrategy::new()
}

#[test]
fn thousands_separators_are_stripped() {
    let text = "\
**Macros:**
- Calories: 1,250 kcal
- Protein: 45 g
- Fat: 38 g
- Carbs: 1,020 g
";
    let macros = strategy().extract(text).unwrap().macros.unwrap();
    assert_eq!(macros.calories, 1250.0);
    assert_eq!(macros.carbs, 1020.0);
}

#[test]
fn net_carbs_prefix_accepted() {
    let text = "\
- Calories: 480 kcal
- Protein: 35 g
- Fat: 20 g
- Net Carbs: 18 g
";
    let macros = strategy().extract(text).unwrap().macros.unwrap();
    assert_eq!(macros.carbs, 18.0);
}

#[test]
fn portion_multipliers_never_matched() {
    // Weight annotations like "2 x 120 g" must not satisfy the fat line
    let text = "\
Two patties at 120 g each.
- Fat: 9 g x 2
- Calories: 540 kcal
- Protein: 44 g
- Fat: 18 g
- Carbs: 4 g
";
    let macros = strategy().extract(text).unwrap().macros.unwrap();
    assert_eq!(macros.fat, 18.0);
}

#[test]
fn values_only_in_leading_text_are_ignored() {
    // Macro lines buried before the trailing window are by design unseen
    let mut text = String::from(
        "- Calories: 450 kcal\n- Protein: 30 g\n- Fat: 12 g\n- Carbs: 50 g\n",
    );
    text.push_str(&"The model then rambles on at length about NOVA groups.\n".repeat(40));
    let err = strategy().extract(&text).unwrap_err();
    assert!(matches!(err, ExtractError::NoMacroLines));
}

#[test]
fn macros_section_preferred_over_loose_lines() {
    // Loose bullet lines precede the section; the section's values win
    // because matching is scoped to it when the heading exists.
    let text = "\
Earlier rough guess:
- Calories: 600 kcal
- Protein: 40 g
- Fat: 25 g
- Carbs: 45 g

**Macros:**
- Calories: 520 kcal
- Protein: 38 g
- Fat: 21 g
- Carbs: 40 g
";
    let macros = strategy().extract(text).unwrap().macros.unwrap();
    assert_eq!(macros.calories, 520.0);
    assert_eq!(macros.protein, 38.0);
}

#[test]
fn processed_lines_build_minimal_metrics() {
    let text = "\
**Macros:**
- Calories: 700 kcal
- Protein: 28 g
- Fat: 32 g
- Carbs: 72 g

**Processed Food:**
- Processed calories: 430 kcal
- Processed percent: 61%
";
    let metrics = strategy().extract(text).unwrap().extended_metrics.unwrap();
    assert_eq!(metrics.processed_calories, Some(430.0));
    assert_eq!(metrics.processed_percent, Some(61.0));
    assert_eq!(metrics.ultra_processed_calories, None);
    assert_eq!(metrics.fiber, None);
}

#[test]
fn processed_percent_alone_still_builds_metrics() {
    let text = "\
- Calories: 700 kcal
- Protein: 28 g
- Fat: 32 g
- Carbs: 72 g
- Processed percent: 61%
";
    let metrics = strategy().extract(text).unwrap().extended_metrics.unwrap();
    assert_eq!(metrics.processed_percent, Some(61.0));
    assert_eq!(metrics.processed_calories, None);
}

#[test]
fn case_insensitive_matching() {
    let text = "\
- CALORIES: 450 KCAL
- protein: 30 G
- Fat: 12 g
- CARBS: 50 g
";
    let macros = strategy().extract(text).unwrap().macros.unwrap();
    assert_eq!(macros.calories, 450.0);
    assert_eq!(macros.protein, 30.0);
}

#[test]
fn multibyte_text_near_window_boundary() {
    // The window is measured in characters, not bytes; emoji padding
    // must not split a char or panic.
    let mut text = "🍜".repeat(1600);
    text.push_str(
        "\n- Calories: 450 kcal\n- Protein: 30 g\n- Fat: 12 g\n- Carbs: 50 g\n",
    );
    let macros = strategy().extract(&text).unwrap().macros.unwrap();
    assert_eq!(macros.calories, 450.0);
}
