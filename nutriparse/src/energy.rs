//! Atwater energy-consistency validation.
//!
//! Reported calories should agree with the calories implied by the macro
//! amounts at the standard Atwater factors. The check is informational:
//! a failed check is shown to the user as a warning, never used to block
//! logging a meal.

use crate::record::AtwaterCheck;

/// Atwater factor for protein, kcal per gram.
pub const PROTEIN_KCAL_PER_G: f64 = 4.0;
/// Atwater factor for carbohydrates, kcal per gram.
pub const CARBS_KCAL_PER_G: f64 = 4.0;
/// Atwater factor for fat, kcal per gram.
pub const FAT_KCAL_PER_G: f64 = 9.0;

/// Maximum kcal gap between reported and calculated calories that still
/// counts as consistent.
pub const TOLERANCE_KCAL: f64 = 10.0;

/// Checks reported calories against the macro-derived value.
///
/// `calculated = round(4*protein + 4*carbs + 9*fat)`, and the check
/// passes when `|reported - calculated| <= 10`.
///
/// The structured extraction path passes the upstream's own check through
/// verbatim; this client-side validator exists for verification and for
/// callers that want to warn on inconsistent estimates independently.
///
/// # Examples
///
/// ```
/// use nutriparse::energy::validate;
///
/// let check = validate(510.0, 46.0, 14.0, 32.0);
/// assert_eq!(check.calculated_calories, 528.0);
/// assert_eq!(check.difference, 18.0);
/// assert!(!check.passed);
/// ```
pub fn validate(calories: f64, protein: f64, carbs: f64, fat: f64) -> AtwaterCheck {
    let calculated_calories =
        (PROTEIN_KCAL_PER_G * protein + CARBS_KCAL_PER_G * carbs + FAT_KCAL_PER_G * fat).round();
    let difference = (calories - calculated_calories).abs();
    AtwaterCheck {
        passed: difference <= TOLERANCE_KCAL,
        calculated_calories,
        difference,
    }
}
