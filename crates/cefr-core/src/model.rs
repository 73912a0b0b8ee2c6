use crate::level::SuggestedLevel;
use crate::validator::ValidationResult;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmResponse {
    pub text: String,
    pub provider: String,
    pub model: String,
    #[serde(default)]
    pub meta: serde_json::Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Skill {
    Writing,
    Speaking,
}

impl Skill {
    pub fn as_str(self) -> &'static str {
        match self {
            Skill::Writing => "writing",
            Skill::Speaking => "speaking",
        }
    }
}

/// One open-ended answer to be scored. Speaking answers arrive as transcripts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringRequest {
    pub response_id: String,
    pub skill: Skill,
    pub task_prompt: String,
    pub response_text: String,
    pub max_score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub criteria: Option<String>,
}

/// What the AI model said about an answer, before validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiAssessment {
    pub score: f64,
    pub suggested_level: SuggestedLevel,
    #[serde(default)]
    pub feedback: String,
    pub provider: String,
    pub model: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreSource {
    Live,
    Cache,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredResponse {
    pub response_id: String,
    pub skill: Skill,
    pub max_score: f64,
    pub assessment: AiAssessment,
    pub validation: ValidationResult,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correction_note: Option<String>,
    pub source: ScoreSource,
    pub attempts: u32,
    pub scored_at: String,
}
