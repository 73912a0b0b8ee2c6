//! AI scoring of open-ended answers followed by CEFR post-validation.
//!
//! Flow per answer: cache lookup, concurrency permit, provider call with
//! retry, JSON parse, validation against the band table.

pub mod cache;
pub(crate) mod parse;
pub(crate) mod prompt;
pub mod retry;

use crate::config::{ProviderKind, ScoringSettings};
use crate::errors::{ScoringError, ScoringErrorKind};
use crate::explain::correction_note;
use crate::model::{AiAssessment, ScoreSource, ScoredResponse, ScoringRequest};
use crate::providers::llm::fake::FakeClient;
use crate::providers::llm::openai::OpenAIClient;
use crate::providers::llm::LlmClient;
use crate::validator::{CefrValidator, ScoreInput};
use cache::ScoreCache;
use retry::RetryPolicy;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tracing::Instrument;

#[derive(Debug, Clone)]
pub struct ScoringRuntimeConfig {
    pub enabled: bool,
    pub provider: String,
    pub model: String,
    pub retry: RetryPolicy,
    pub max_concurrency: usize,
    /// Skip cache reads (results are still written).
    pub refresh: bool,
}

impl ScoringRuntimeConfig {
    pub fn from_settings(settings: &ScoringSettings) -> Self {
        Self {
            enabled: settings.provider != ProviderKind::None,
            provider: settings.provider.as_str().to_string(),
            model: settings.model_or_default().to_string(),
            retry: RetryPolicy {
                max_retries: settings.max_retries,
                backoff: Duration::from_millis(settings.retry_backoff_ms),
            },
            max_concurrency: settings.max_concurrency.max(1),
            refresh: false,
        }
    }
}

/// Build the provider client named in `settings`. `None` when scoring is disabled.
pub fn client_from_settings(
    settings: &ScoringSettings,
) -> anyhow::Result<Option<Arc<dyn LlmClient>>> {
    Ok(match settings.provider {
        ProviderKind::None => None,
        ProviderKind::Fake => Some(Arc::new(FakeClient::heuristic())),
        ProviderKind::OpenAi => Some(Arc::new(OpenAIClient::from_env(
            settings.model_or_default().to_string(),
            settings.temperature,
            settings.max_tokens,
        )?)),
    })
}

#[derive(Clone)]
pub struct ScoringService {
    config: ScoringRuntimeConfig,
    validator: Arc<CefrValidator>,
    client: Option<Arc<dyn LlmClient>>,
    cache: ScoreCache,
    permits: Arc<Semaphore>,
}

impl ScoringService {
    pub fn new(
        config: ScoringRuntimeConfig,
        validator: CefrValidator,
        client: Option<Arc<dyn LlmClient>>,
        cache: ScoreCache,
    ) -> Self {
        let permits = Arc::new(Semaphore::new(config.max_concurrency.max(1)));
        Self {
            config,
            validator: Arc::new(validator),
            client,
            cache,
            permits,
        }
    }

    pub async fn score(&self, request: &ScoringRequest) -> Result<ScoredResponse, ScoringError> {
        let span = tracing::info_span!(
            "cefr.score",
            response_id = %request.response_id,
            skill = request.skill.as_str(),
            provider = %self.config.provider,
        );
        self.score_inner(request).instrument(span).await
    }

    async fn score_inner(&self, request: &ScoringRequest) -> Result<ScoredResponse, ScoringError> {
        if !self.config.enabled {
            return Err(ScoringError::disabled().with_response_id(&request.response_id));
        }
        let client = self.client.clone().ok_or_else(|| {
            ScoringError::new(
                ScoringErrorKind::ProviderUnavailable,
                "scoring client not initialized",
            )
            .with_response_id(&request.response_id)
        })?;

        let prompt_text = prompt::build_prompt(request);
        let key = cache::cache_key(&self.config.model, &prompt_text, request.max_score);

        let cached = if self.config.refresh {
            None
        } else {
            self.cache.get(&key)
        };

        let (assessment, source, attempts) = match cached {
            Some(hit) => {
                tracing::debug!("scoring cache hit");
                (hit, ScoreSource::Cache, 0)
            }
            None => {
                let (assessment, attempts) =
                    self.call_provider(client, request, &prompt_text).await?;
                self.cache.put(key, assessment.clone());
                (assessment, ScoreSource::Live, attempts)
            }
        };

        let validation = self.validator.validate(&ScoreInput {
            score: assessment.score,
            max_score: request.max_score,
            ai_suggested_level: assessment.suggested_level.clone(),
        });
        let note = correction_note(&validation);
        if let Some(note) = &note {
            tracing::info!(
                suggested = %validation.ai_suggested_level,
                validated = %validation.validated_level,
                percentage = validation.percentage,
                "{}",
                note
            );
        }

        Ok(ScoredResponse {
            response_id: request.response_id.clone(),
            skill: request.skill,
            max_score: request.max_score,
            assessment,
            validation,
            correction_note: note,
            source,
            attempts,
            scored_at: chrono::Utc::now().to_rfc3339(),
        })
    }

    async fn call_provider(
        &self,
        client: Arc<dyn LlmClient>,
        request: &ScoringRequest,
        prompt_text: &str,
    ) -> Result<(AiAssessment, u32), ScoringError> {
        let _permit = self.permits.acquire().await.map_err(|_| {
            ScoringError::new(ScoringErrorKind::Other, "scoring service shut down")
        })?;

        let system = [prompt::system_prompt(request)];
        let provider = client.provider_name();
        retry::with_retries(self.config.retry, &request.response_id, || {
            let client = client.clone();
            let system = system.as_slice();
            async move {
                let resp = client
                    .complete(prompt_text, Some(system))
                    .await
                    .map_err(|e| ScoringError::from_provider_error(provider, &e))?;
                let parsed = parse::parse_assessment(&resp.text)?;
                Ok::<_, ScoringError>(AiAssessment {
                    score: parsed.score,
                    suggested_level: parsed.suggested_level,
                    feedback: parsed.feedback,
                    provider: resp.provider,
                    model: resp.model,
                })
            }
        })
        .await
    }

    /// Score every request concurrently. Output order matches input order.
    pub async fn score_all(
        &self,
        requests: &[ScoringRequest],
    ) -> Vec<Result<ScoredResponse, ScoringError>> {
        let mut set = tokio::task::JoinSet::new();
        for (idx, request) in requests.iter().cloned().enumerate() {
            let svc = self.clone();
            set.spawn(async move { (idx, svc.score(&request).await) });
        }

        let mut slots: Vec<Option<Result<ScoredResponse, ScoringError>>> =
            (0..requests.len()).map(|_| None).collect();
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok((idx, result)) => slots[idx] = Some(result),
                Err(e) => tracing::error!(error = %e, "scoring task panicked"),
            }
        }

        slots
            .into_iter()
            .zip(requests)
            .map(|(slot, request)| {
                slot.unwrap_or_else(|| {
                    Err(ScoringError::new(
                        ScoringErrorKind::Other,
                        "scoring task did not complete",
                    )
                    .with_response_id(&request.response_id))
                })
            })
            .collect()
    }
}
