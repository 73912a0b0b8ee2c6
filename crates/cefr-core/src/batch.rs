//! JSON Lines batch validation.

use crate::explain::correction_note;
use crate::level::SuggestedLevel;
use crate::validator::{CefrValidator, ScoreInput, ValidationResult};
use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchRecord {
    pub id: String,
    pub score: f64,
    #[serde(alias = "maxScore")]
    pub max_score: f64,
    #[serde(alias = "ai_suggested_level", alias = "aiSuggestedLevel")]
    pub ai_level: SuggestedLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchOutcome {
    pub id: String,
    pub score: f64,
    pub max_score: f64,
    #[serde(flatten)]
    pub result: ValidationResult,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correction_note: Option<String>,
}

pub fn validate_batch(validator: &CefrValidator, records: &[BatchRecord]) -> Vec<BatchOutcome> {
    records
        .iter()
        .map(|rec| {
            let result = validator.validate(&ScoreInput {
                score: rec.score,
                max_score: rec.max_score,
                ai_suggested_level: rec.ai_level.clone(),
            });
            BatchOutcome {
                id: rec.id.clone(),
                score: rec.score,
                max_score: rec.max_score,
                correction_note: correction_note(&result),
                result,
            }
        })
        .collect()
}

/// Parse JSON Lines from a reader. Blank lines and `#` comments are skipped.
pub fn parse_jsonl<T: DeserializeOwned, R: BufRead>(reader: R, origin: &str) -> anyhow::Result<Vec<T>> {
    let mut out = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("failed to read {}", origin))?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let item = serde_json::from_str(trimmed)
            .with_context(|| format!("{}:{}: invalid record", origin, idx + 1))?;
        out.push(item);
    }
    Ok(out)
}

pub fn read_jsonl<T: DeserializeOwned>(path: &Path) -> anyhow::Result<Vec<T>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    parse_jsonl(BufReader::new(file), &path.display().to_string())
}

pub fn write_jsonl<T: Serialize>(path: &Path, items: &[T]) -> anyhow::Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    let mut w = BufWriter::new(file);
    for item in items {
        serde_json::to_writer(&mut w, item)?;
        w.write_all(b"\n")?;
    }
    w.flush()?;
    Ok(())
}
