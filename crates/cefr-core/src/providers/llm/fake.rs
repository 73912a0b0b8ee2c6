//! Offline provider.
//!
//! `FakeClient::heuristic()` derives a score and level from the candidate
//! text's length so pipelines can run without network access.
//! `FakeClient::scripted(..)` replays canned replies in order, for tests.

use super::LlmClient;
use crate::model::LlmResponse;
use crate::scoring::prompt::{CANDIDATE_CLOSE, CANDIDATE_OPEN, MAX_SCORE_LABEL};
use async_trait::async_trait;
use serde_json::json;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Word count that earns a full heuristic score.
const FULL_MARKS_WORDS: usize = 200;

enum Mode {
    Heuristic,
    Scripted(Mutex<VecDeque<String>>),
}

pub struct FakeClient {
    mode: Mode,
    model: String,
}

impl FakeClient {
    pub fn heuristic() -> Self {
        Self {
            mode: Mode::Heuristic,
            model: "fake-scorer".to_string(),
        }
    }

    pub fn scripted<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            mode: Mode::Scripted(Mutex::new(replies.into_iter().map(Into::into).collect())),
            model: "fake-scripted".to_string(),
        }
    }

    fn heuristic_reply(prompt: &str) -> String {
        let candidate = section(prompt, CANDIDATE_OPEN, CANDIDATE_CLOSE).unwrap_or("");
        let words = candidate.split_whitespace().count();
        let max_score = prompt
            .lines()
            .find_map(|l| l.strip_prefix(MAX_SCORE_LABEL))
            .and_then(|v| v.trim().parse::<f64>().ok())
            .unwrap_or(10.0);

        let ratio = (words as f64 / FULL_MARKS_WORDS as f64).min(1.0);
        let score = (max_score * ratio).round();
        let level = match words {
            0..=19 => "A1",
            20..=49 => "A2",
            50..=99 => "B1",
            100..=149 => "B2",
            150..=199 => "C1",
            _ => "C2",
        };
        json!({
            "score": score,
            "cefr_level": level,
            "feedback": format!("{} words assessed by length heuristic", words),
        })
        .to_string()
    }
}

fn section<'a>(text: &'a str, open: &str, close: &str) -> Option<&'a str> {
    let start = text.find(open)? + open.len();
    let end = text[start..].find(close)? + start;
    Some(&text[start..end])
}

#[async_trait]
impl LlmClient for FakeClient {
    async fn complete(
        &self,
        prompt: &str,
        _context: Option<&[String]>,
    ) -> anyhow::Result<LlmResponse> {
        let text = match &self.mode {
            Mode::Heuristic => Self::heuristic_reply(prompt),
            Mode::Scripted(replies) => {
                let mut replies = replies
                    .lock()
                    .map_err(|_| anyhow::anyhow!("fake client reply queue poisoned"))?;
                replies
                    .pop_front()
                    .ok_or_else(|| anyhow::anyhow!("fake client has no more scripted replies"))?
            }
        };
        Ok(LlmResponse {
            text,
            provider: "fake".to_string(),
            model: self.model.clone(),
            meta: serde_json::Value::Null,
        })
    }

    fn provider_name(&self) -> &'static str {
        "fake"
    }
}
