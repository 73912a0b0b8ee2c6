use crate::band::PolicyError;
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("unsupported config version {found} (expected {expected})")]
    Version { found: u32, expected: u32 },

    #[error("invalid policy: {0}")]
    Policy(#[from] PolicyError),

    #[error("invalid scoring settings: {0}")]
    Scoring(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoringErrorKind {
    Disabled,
    ProviderUnavailable,
    ProviderRateLimit,
    ProviderTimeout,
    ProviderServer,
    MalformedResponse,
    Other,
}

impl ScoringErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ScoringErrorKind::Disabled => "disabled",
            ScoringErrorKind::ProviderUnavailable => "provider_unavailable",
            ScoringErrorKind::ProviderRateLimit => "provider_rate_limit",
            ScoringErrorKind::ProviderTimeout => "provider_timeout",
            ScoringErrorKind::ProviderServer => "provider_server",
            ScoringErrorKind::MalformedResponse => "malformed_response",
            ScoringErrorKind::Other => "other",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoringError {
    pub kind: ScoringErrorKind,
    pub message: String,
    pub response_id: Option<String>,
    pub provider: Option<String>,
    pub status: Option<u16>,
    pub detail: Option<String>,
}

impl ScoringError {
    pub fn new(kind: ScoringErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            response_id: None,
            provider: None,
            status: None,
            detail: None,
        }
    }

    pub fn with_response_id(mut self, id: impl Into<String>) -> Self {
        self.response_id = Some(id.into());
        self
    }

    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn disabled() -> Self {
        Self::new(
            ScoringErrorKind::Disabled,
            "AI scoring is disabled (scoring.provider = none)",
        )
    }

    pub fn malformed(detail: impl Into<String>) -> Self {
        let detail = detail.into();
        Self::new(
            ScoringErrorKind::MalformedResponse,
            format!("malformed scoring response: {}", detail),
        )
        .with_detail(detail)
    }

    /// Classify a provider failure from its HTTP status.
    pub fn from_status(status: u16, provider: &str, body: impl Into<String>) -> Self {
        let kind = match status {
            429 => ScoringErrorKind::ProviderRateLimit,
            408 | 504 => ScoringErrorKind::ProviderTimeout,
            500..=599 => ScoringErrorKind::ProviderServer,
            _ => ScoringErrorKind::Other,
        };
        Self::new(kind, format!("{} returned HTTP {}", provider, status))
            .with_status(status)
            .with_provider(provider)
            .with_detail(body)
    }

    /// Best-effort classification of errors surfaced through `anyhow`.
    pub fn from_provider_error(provider: &str, err: &anyhow::Error) -> Self {
        if let Some(scoring) = err.downcast_ref::<ScoringError>() {
            return scoring.clone();
        }
        if let Some(req) = err.downcast_ref::<reqwest::Error>() {
            if req.is_timeout() {
                return Self::new(ScoringErrorKind::ProviderTimeout, req.to_string())
                    .with_provider(provider);
            }
            if req.is_connect() {
                return Self::new(ScoringErrorKind::ProviderUnavailable, req.to_string())
                    .with_provider(provider);
            }
            if let Some(status) = req.status() {
                return Self::from_status(status.as_u16(), provider, req.to_string());
            }
        }
        Self::new(ScoringErrorKind::Other, err.to_string()).with_provider(provider)
    }

    pub fn is_retryable(&self) -> bool {
        matches!(
            self.kind,
            ScoringErrorKind::ProviderRateLimit
                | ScoringErrorKind::ProviderTimeout
                | ScoringErrorKind::ProviderServer
                | ScoringErrorKind::ProviderUnavailable
                | ScoringErrorKind::MalformedResponse
        )
    }
}

impl fmt::Display for ScoringError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind.as_str(), self.message)?;
        if let Some(id) = &self.response_id {
            write!(f, " (response {})", id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ScoringError {}
