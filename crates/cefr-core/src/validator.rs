//! Post-validation of AI-proposed CEFR levels against the numeric score.
//!
//! The validator never fails. Degenerate numbers (zero or negative max
//! score, NaN, infinities) are scored as 0% and therefore land on the
//! table's floor, so a malformed upstream score cannot break a scoring run.

use crate::band::{BandTable, Resolution};
use crate::level::{CefrLevel, SuggestedLevel};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

lazy_static::lazy_static! {
    static ref REFERENCE_VALIDATOR: CefrValidator = CefrValidator::reference();
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreInput {
    pub score: f64,
    pub max_score: f64,
    pub ai_suggested_level: SuggestedLevel,
}

impl ScoreInput {
    pub fn new(score: f64, max_score: f64, ai_suggested_level: impl Into<SuggestedLevel>) -> Self {
        Self {
            score,
            max_score,
            ai_suggested_level: ai_suggested_level.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub validated_level: CefrLevel,
    pub was_corrected: bool,
    pub percentage: f64,
    pub ai_suggested_level: SuggestedLevel,
    /// Threshold of the matched band; `None` when the floor applied.
    pub band_threshold: Option<f64>,
    pub resolution: Resolution,
    /// True when the inputs could not produce a meaningful percentage.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub degenerate_input: bool,
}

/// Score percentage, or `None` when the inputs cannot produce one.
///
/// Finite inputs always produce a finite percentage: a quotient too large for
/// `f64` saturates at `f64::MAX` so huge scores still land in the top band.
pub fn percentage(score: f64, max_score: f64) -> Option<f64> {
    if !score.is_finite() || !max_score.is_finite() || max_score <= 0.0 {
        return None;
    }
    Some((score / max_score * 100.0).clamp(-f64::MAX, f64::MAX))
}

#[derive(Debug, Clone, PartialEq)]
pub struct CefrValidator {
    table: BandTable,
}

impl CefrValidator {
    pub fn new(table: BandTable) -> Self {
        Self { table }
    }

    pub fn reference() -> Self {
        Self::new(BandTable::reference())
    }

    pub fn table(&self) -> &BandTable {
        &self.table
    }

    pub fn validate(&self, input: &ScoreInput) -> ValidationResult {
        let (pct, degenerate) = match percentage(input.score, input.max_score) {
            Some(pct) if pct >= 0.0 => (pct, false),
            Some(pct) => {
                warn!(
                    score = input.score,
                    max_score = input.max_score,
                    percentage = pct,
                    "negative score, treating as floor"
                );
                (pct, true)
            }
            None => {
                warn!(
                    score = input.score,
                    max_score = input.max_score,
                    "score percentage undefined, treating as 0%"
                );
                (0.0, true)
            }
        };

        let resolved = self.table.resolve(pct, &input.ai_suggested_level);
        let was_corrected = !input.ai_suggested_level.is(resolved.level);

        if let SuggestedLevel::Unrecognized(raw) = &input.ai_suggested_level {
            warn!(
                label = %raw,
                validated = %resolved.level,
                "unrecognized AI level label corrected"
            );
        }
        debug!(
            percentage = pct,
            suggested = %input.ai_suggested_level,
            validated = %resolved.level,
            corrected = was_corrected,
            "validated CEFR level"
        );

        ValidationResult {
            validated_level: resolved.level,
            was_corrected,
            percentage: pct,
            ai_suggested_level: input.ai_suggested_level.clone(),
            band_threshold: resolved.band_threshold,
            resolution: resolved.resolution,
            degenerate_input: degenerate,
        }
    }
}

impl Default for CefrValidator {
    fn default() -> Self {
        Self::reference()
    }
}

/// Validate against the reference band table.
pub fn validate(
    score: f64,
    max_score: f64,
    ai_suggested_level: impl Into<SuggestedLevel>,
) -> ValidationResult {
    REFERENCE_VALIDATOR.validate(&ScoreInput::new(score, max_score, ai_suggested_level))
}

#[cfg(test)]
mod tests {
    use super::*;
    use CefrLevel::*;

    #[test]
    fn reference_scenarios() {
        let cases: &[(f64, f64, CefrLevel, CefrLevel, bool)] = &[
            (5.0, 14.0, C1, A2, true),
            (13.0, 14.0, C1, C1, false),
            (0.0, 14.0, A1, A1, false),
            (11.0, 14.0, A1, B2, true),
            (8.0, 10.0, B1, B2, true),
            (2.0, 5.0, B2, A2, true),
        ];
        for &(score, max, ai, expected, corrected) in cases {
            let r = validate(score, max, ai);
            assert_eq!(
                r.validated_level, expected,
                "validate({score}, {max}, {ai}) level"
            );
            assert_eq!(
                r.was_corrected, corrected,
                "validate({score}, {max}, {ai}) corrected"
            );
        }
    }

    #[test]
    fn optimistic_suggestion_below_thirty_percent_is_floored() {
        let r = validate(21.0, 100.0, B2);
        assert_eq!(r.validated_level, A1);
        assert!(r.was_corrected);
        assert_eq!(r.resolution, Resolution::Floor);
        assert_eq!(r.band_threshold, None);
    }

    #[test]
    fn zero_max_score_is_degenerate_floor() {
        let r = validate(7.0, 0.0, C2);
        assert_eq!(r.validated_level, A1);
        assert_eq!(r.percentage, 0.0);
        assert!(r.degenerate_input);
    }

    #[test]
    fn non_finite_and_negative_inputs_never_panic() {
        for (score, max) in [
            (f64::NAN, 10.0),
            (5.0, f64::NAN),
            (f64::INFINITY, 10.0),
            (5.0, f64::INFINITY),
            (-3.0, 10.0),
            (4.0, -10.0),
        ] {
            let r = validate(score, max, C1);
            assert_eq!(r.validated_level, A1, "({score}, {max})");
            assert!(r.was_corrected);
            assert!(r.degenerate_input);
        }
    }

    #[test]
    fn score_above_max_lands_in_top_band() {
        let r = validate(12.0, 10.0, C2);
        assert_eq!(r.validated_level, C2);
        assert!(!r.was_corrected);
        assert!(!r.degenerate_input);
    }

    #[test]
    fn exact_thresholds_are_inclusive() {
        assert_eq!(validate(3.0, 10.0, A1).validated_level, A1);
        assert_eq!(validate(3.0, 10.0, A1).band_threshold, Some(30.0));
        assert_eq!(validate(7.0, 10.0, B1).band_threshold, Some(70.0));
        assert_eq!(validate(9.0, 10.0, C2).validated_level, C2);
    }

    #[test]
    fn unrecognized_label_always_takes_fallback() {
        let r = validate(13.0, 14.0, "Native speaker");
        assert_eq!(r.validated_level, C1);
        assert!(r.was_corrected);
        assert_eq!(r.resolution, Resolution::Fallback);
        assert_eq!(r.ai_suggested_level.label(), "Native speaker");
    }

    #[test]
    fn level_labels_must_match_exactly() {
        for label in ["c1", " C1 ", "C1 "] {
            let r = validate(13.0, 14.0, label);
            assert_eq!(r.validated_level, C1, "{label:?}");
            assert!(r.was_corrected, "{label:?}");
            assert_eq!(r.resolution, Resolution::Fallback, "{label:?}");
            assert_eq!(r.ai_suggested_level.label(), label);
        }
        let r = validate(8.0, 10.0, "b2");
        assert_eq!(r.validated_level, B2);
        assert!(r.was_corrected);
    }

    #[test]
    fn huge_scores_stay_in_the_top_band() {
        for score in [1e305, 1e307, f64::MAX] {
            let r = validate(score, 1.0, C2);
            assert_eq!(r.validated_level, C2, "{score}");
            assert!(!r.was_corrected);
            assert!(!r.degenerate_input);
            assert!(r.percentage.is_finite());
        }
        let tiny_max = validate(5.0, f64::MIN_POSITIVE, C1);
        assert_eq!(tiny_max.validated_level, C1);
        assert!(!tiny_max.degenerate_input);
    }

    #[test]
    fn percentage_uses_the_given_denominator() {
        assert_eq!(percentage(4.0, 5.0), Some(80.0));
        assert_eq!(percentage(8.0, 10.0), Some(80.0));
        assert_eq!(percentage(80.0, 100.0), Some(80.0));
        assert_eq!(percentage(1.0, 0.0), None);
        assert_eq!(percentage(1e307, 1.0), Some(f64::MAX));
        let pct = percentage(5.0, 14.0).unwrap();
        assert!((pct - 35.714).abs() < 0.001);
    }
}
