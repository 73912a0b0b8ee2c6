use crate::errors::ScoringError;
use crate::level::SuggestedLevel;

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ParsedAssessment {
    pub(crate) score: f64,
    pub(crate) suggested_level: SuggestedLevel,
    pub(crate) feedback: String,
}

/// Extract the first JSON object from a model reply.
///
/// Models wrap JSON in prose or code fences often enough that a strict
/// `from_str` on the whole reply is not usable.
pub(crate) fn parse_assessment(text: &str) -> Result<ParsedAssessment, ScoringError> {
    let text = text.trim();
    let start = text
        .find('{')
        .ok_or_else(|| ScoringError::malformed("no JSON object in scoring output"))?;

    let val: serde_json::Value = serde_json::Deserializer::from_str(&text[start..])
        .into_iter::<serde_json::Value>()
        .next()
        .ok_or_else(|| ScoringError::malformed("no JSON object in scoring output"))?
        .map_err(|e| ScoringError::malformed(format!("invalid JSON: {}", e)))?;

    let score = match val.get("score") {
        Some(serde_json::Value::Number(n)) => n.as_f64(),
        // Some models quote numbers.
        Some(serde_json::Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .ok_or_else(|| ScoringError::malformed("'score' missing or not a number"))?;

    let suggested_level = val
        .get("cefr_level")
        .or_else(|| val.get("level"))
        .and_then(|v| v.as_str())
        .map(SuggestedLevel::from)
        .unwrap_or_else(|| SuggestedLevel::Unrecognized(String::new()));

    let feedback = val
        .get("feedback")
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .to_string();

    Ok(ParsedAssessment {
        score,
        suggested_level,
        feedback,
    })
}
