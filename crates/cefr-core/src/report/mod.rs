//! Correction statistics: how often, and in which direction, the validator
//! overrode the AI's suggested level.

pub mod console;

use crate::level::SuggestedLevel;
use crate::validator::ValidationResult;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Current schema version for summary.json
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrectionSummary {
    pub schema_version: u32,
    pub generated_at: String,
    pub total: usize,
    pub corrected: usize,
    /// `corrected / total`, 0 when there were no results.
    pub correction_rate: f64,
    /// Validated level below the AI's suggestion.
    pub downgrades: usize,
    /// Validated level above the AI's suggestion.
    pub upgrades: usize,
    pub unrecognized_labels: usize,
    pub degenerate_inputs: usize,
    /// Answers that could not be scored at all.
    #[serde(default)]
    pub failed: usize,
    pub by_validated_level: BTreeMap<String, usize>,
    /// AI label -> validated level -> count.
    pub transitions: BTreeMap<String, BTreeMap<String, usize>>,
}

impl CorrectionSummary {
    pub fn from_results<'a, I>(results: I) -> Self
    where
        I: IntoIterator<Item = &'a ValidationResult>,
    {
        let mut summary = Self {
            schema_version: SCHEMA_VERSION,
            generated_at: chrono::Utc::now().to_rfc3339(),
            total: 0,
            corrected: 0,
            correction_rate: 0.0,
            downgrades: 0,
            upgrades: 0,
            unrecognized_labels: 0,
            degenerate_inputs: 0,
            failed: 0,
            by_validated_level: BTreeMap::new(),
            transitions: BTreeMap::new(),
        };

        for r in results {
            summary.total += 1;
            if r.was_corrected {
                summary.corrected += 1;
            }
            if r.degenerate_input {
                summary.degenerate_inputs += 1;
            }
            match &r.ai_suggested_level {
                SuggestedLevel::Known(suggested) => {
                    if r.validated_level < *suggested {
                        summary.downgrades += 1;
                    } else if r.validated_level > *suggested {
                        summary.upgrades += 1;
                    }
                }
                SuggestedLevel::Unrecognized(_) => summary.unrecognized_labels += 1,
            }
            *summary
                .by_validated_level
                .entry(r.validated_level.as_str().to_string())
                .or_default() += 1;
            *summary
                .transitions
                .entry(r.ai_suggested_level.label().to_string())
                .or_default()
                .entry(r.validated_level.as_str().to_string())
                .or_default() += 1;
        }

        if summary.total > 0 {
            summary.correction_rate = summary.corrected as f64 / summary.total as f64;
        }
        summary
    }

    pub fn with_failures(mut self, failed: usize) -> Self {
        self.failed = failed;
        self
    }

    pub fn write_json(&self, path: &Path) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .map_err(|e| anyhow::anyhow!("failed to write {}: {}", path.display(), e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::CefrLevel::*;
    use crate::validator::validate;

    #[test]
    fn counts_directions_and_transitions() {
        let results = vec![
            validate(5.0, 14.0, C1),     // C1 -> A2 down
            validate(13.0, 14.0, C1),    // kept
            validate(11.0, 14.0, A1),    // A1 -> B2 up
            validate(2.0, 5.0, "fluent"), // unrecognized -> A2
            validate(1.0, 0.0, A1),      // degenerate, kept
        ];
        let s = CorrectionSummary::from_results(&results);
        assert_eq!(s.total, 5);
        assert_eq!(s.corrected, 3);
        assert!((s.correction_rate - 0.6).abs() < 1e-9);
        assert_eq!(s.downgrades, 1);
        assert_eq!(s.upgrades, 1);
        assert_eq!(s.unrecognized_labels, 1);
        assert_eq!(s.degenerate_inputs, 1);
        assert_eq!(s.transitions["C1"]["A2"], 1);
        assert_eq!(s.transitions["C1"]["C1"], 1);
        assert_eq!(s.transitions["fluent"]["A2"], 1);
        assert_eq!(s.by_validated_level["A2"], 2);
    }

    #[test]
    fn empty_input_has_zero_rate() {
        let s = CorrectionSummary::from_results(&[]).with_failures(2);
        assert_eq!(s.total, 0);
        assert_eq!(s.correction_rate, 0.0);
        assert_eq!(s.failed, 2);
    }
}
