use crate::explain::{correction_note, resolution_reason};
use crate::report::CorrectionSummary;
use crate::validator::ValidationResult;

/// Single result line. Deterministic, unit-testable.
#[must_use]
pub fn format_result_line(id: &str, result: &ValidationResult) -> String {
    let marker = if result.was_corrected { "CORRECTED" } else { "OK" };
    let mut line = format!(
        "{:<9} {}: {:>5.1}% AI={} -> {} ({})",
        marker,
        id,
        result.percentage,
        result.ai_suggested_level,
        result.validated_level,
        resolution_reason(result)
    );
    if let Some(note) = correction_note(result) {
        line.push_str("\n          ");
        line.push_str(&note);
    }
    line
}

#[must_use]
pub fn format_summary(summary: &CorrectionSummary) -> Vec<String> {
    let mut lines = vec![format!(
        "Summary: {} validated, {} corrected ({:.1}%), {} downgraded, {} upgraded",
        summary.total,
        summary.corrected,
        summary.correction_rate * 100.0,
        summary.downgrades,
        summary.upgrades
    )];
    if summary.unrecognized_labels > 0 {
        lines.push(format!(
            "  {} unrecognized AI label(s) replaced",
            summary.unrecognized_labels
        ));
    }
    if summary.degenerate_inputs > 0 {
        lines.push(format!(
            "  {} input(s) without a usable score percentage",
            summary.degenerate_inputs
        ));
    }
    if summary.failed > 0 {
        lines.push(format!("  {} answer(s) could not be scored", summary.failed));
    }
    for (from, targets) in &summary.transitions {
        let changed: Vec<String> = targets
            .iter()
            .filter(|(to, _)| *to != from)
            .map(|(to, n)| format!("{} x{}", to, n))
            .collect();
        if !changed.is_empty() {
            lines.push(format!("  {} -> {}", from, changed.join(", ")));
        }
    }
    lines
}

pub fn print_summary(summary: &CorrectionSummary) {
    for line in format_summary(summary) {
        eprintln!("{}", line);
    }
}
