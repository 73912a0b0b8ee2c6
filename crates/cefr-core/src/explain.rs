//! Human-readable annotations for examiner-facing review.

use crate::band::{BandTable, Resolution};
use crate::validator::ValidationResult;

/// "AI suggested X; system corrected to Y based on score Z%", or `None` when
/// the AI suggestion was kept.
#[must_use]
pub fn correction_note(result: &ValidationResult) -> Option<String> {
    if !result.was_corrected {
        return None;
    }
    let mut note = format!(
        "AI suggested {}; system corrected to {} based on score {:.1}%",
        result.ai_suggested_level, result.validated_level, result.percentage
    );
    if result.degenerate_input {
        note.push_str(" (score could not be normalised)");
    }
    Some(note)
}

/// One-line description of the band a percentage falls in.
#[must_use]
pub fn describe_band(table: &BandTable, percentage: f64) -> String {
    let Some(band) = table.band_for(percentage) else {
        return format!(
            "below {}%: always {}",
            table.lowest_threshold(),
            table.floor()
        );
    };
    let range = match table.upper_bound(band) {
        Some(upper) => format!("{}% to <{}%", band.threshold, upper),
        None => format!(">= {}%", band.threshold),
    };
    let acceptable = band
        .acceptable
        .iter()
        .map(|l| l.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    let mut line = format!("{range}: accepts {{{acceptable}}}");
    if let Some(remap) = band.remap {
        line.push_str(&format!(", {} -> {}", remap.from, remap.to));
    }
    line.push_str(&format!(", otherwise {}", band.fallback));
    line
}

/// Short reason for the outcome, used in console output.
#[must_use]
pub fn resolution_reason(result: &ValidationResult) -> &'static str {
    match result.resolution {
        Resolution::Accepted => "suggestion consistent with score",
        Resolution::Remapped => "suggestion one level above band ceiling",
        Resolution::Fallback => "suggestion not plausible for score",
        Resolution::Floor => "score below lowest band",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::CefrLevel;
    use crate::validator::validate;

    #[test]
    fn note_is_emitted_only_for_corrections() {
        let kept = validate(13.0, 14.0, CefrLevel::C1);
        assert_eq!(correction_note(&kept), None);

        let corrected = validate(5.0, 14.0, CefrLevel::C1);
        assert_eq!(
            correction_note(&corrected).unwrap(),
            "AI suggested C1; system corrected to A2 based on score 35.7%"
        );
    }

    #[test]
    fn note_flags_degenerate_inputs() {
        let r = validate(3.0, 0.0, CefrLevel::B1);
        let note = correction_note(&r).unwrap();
        assert!(note.starts_with("AI suggested B1; system corrected to A1 based on score 0.0%"));
        assert!(note.ends_with("(score could not be normalised)"));
    }

    #[test]
    fn band_descriptions() {
        let t = BandTable::reference();
        assert_eq!(
            describe_band(&t, 95.0),
            ">= 90%: accepts {C2, C1}, otherwise C1"
        );
        assert_eq!(
            describe_band(&t, 85.0),
            "80% to <90%: accepts {B2, C1}, C2 -> C1, otherwise B2"
        );
        assert_eq!(describe_band(&t, 10.0), "below 30%: always A1");
    }

    #[test]
    fn reasons_follow_resolution() {
        assert_eq!(
            resolution_reason(&validate(85.0, 100.0, CefrLevel::C2)),
            "suggestion one level above band ceiling"
        );
        assert_eq!(
            resolution_reason(&validate(1.0, 100.0, CefrLevel::A1)),
            "score below lowest band"
        );
    }
}
