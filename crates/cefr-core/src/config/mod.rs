//! `cefr.yaml` loading.
//!
//! Every section is optional. A file without `policy:` validates against the
//! reference band table; a file without `scoring:` uses the defaults below.

use crate::band::{BandTable, PolicySpec};
use crate::errors::ConfigError;
use crate::validator::CefrValidator;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_VERSION: u32 = 1;
pub const DEFAULT_CONFIG_FILE: &str = "cefr.yaml";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    OpenAi,
    #[default]
    Fake,
    None,
}

impl ProviderKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "openai",
            ProviderKind::Fake => "fake",
            ProviderKind::None => "none",
        }
    }
}

impl std::str::FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(ProviderKind::OpenAi),
            "fake" => Ok(ProviderKind::Fake),
            "none" => Ok(ProviderKind::None),
            other => Err(format!(
                "unknown provider '{}' (expected openai, fake or none)",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScoringSettings {
    pub provider: ProviderKind,
    pub model: Option<String>,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Upper bound on in-flight provider calls.
    pub max_concurrency: usize,
    /// Extra attempts after the first failed one.
    pub max_retries: u32,
    pub retry_backoff_ms: u64,
    /// Scored responses kept in memory; 0 disables caching.
    pub cache_capacity: usize,
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Fake,
            model: None,
            temperature: 0.0,
            max_tokens: 400,
            max_concurrency: 4,
            max_retries: 2,
            retry_backoff_ms: 250,
            cache_capacity: 256,
        }
    }
}

impl ScoringSettings {
    pub fn model_or_default(&self) -> &str {
        self.model.as_deref().unwrap_or(match self.provider {
            ProviderKind::OpenAi => "gpt-4o-mini",
            ProviderKind::Fake => "fake-scorer",
            ProviderKind::None => "none",
        })
    }

    fn check(&self) -> Result<(), ConfigError> {
        if self.max_concurrency == 0 {
            return Err(ConfigError::Scoring(
                "max_concurrency must be at least 1".into(),
            ));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::Scoring(format!(
                "temperature must be between 0.0 and 2.0, got {}",
                self.temperature
            )));
        }
        if self.max_tokens == 0 {
            return Err(ConfigError::Scoring("max_tokens must be positive".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default = "default_version")]
    version: u32,
    #[serde(default)]
    policy: Option<PolicySpec>,
    #[serde(default)]
    scoring: ScoringSettings,
}

fn default_version() -> u32 {
    CONFIG_VERSION
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub table: BandTable,
    pub scoring: ScoringSettings,
    /// File the config was loaded from, if any.
    pub source: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            table: BandTable::reference(),
            scoring: ScoringSettings::default(),
            source: None,
        }
    }
}

impl Config {
    pub fn validator(&self) -> CefrValidator {
        CefrValidator::new(self.table.clone())
    }

    pub fn uses_reference_policy(&self) -> bool {
        self.table == BandTable::reference()
    }
}

pub fn parse_config(yaml: &str, path: &Path) -> Result<Config, ConfigError> {
    let file: ConfigFile = serde_yaml::from_str(yaml).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    if file.version != CONFIG_VERSION {
        return Err(ConfigError::Version {
            found: file.version,
            expected: CONFIG_VERSION,
        });
    }
    file.scoring.check()?;
    let table = match file.policy {
        Some(spec) => spec.compile()?,
        None => BandTable::reference(),
    };
    Ok(Config {
        table,
        scoring: file.scoring,
        source: Some(path.to_path_buf()),
    })
}

pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let cfg = parse_config(&raw, path)?;
    tracing::debug!(
        path = %path.display(),
        bands = cfg.table.bands().len(),
        provider = cfg.scoring.provider.as_str(),
        "loaded config"
    );
    Ok(cfg)
}

/// Load `path` when given; otherwise fall back to defaults.
pub fn load_or_default(path: Option<&Path>) -> Result<Config, ConfigError> {
    match path {
        Some(p) => load_config(p),
        None => Ok(Config::default()),
    }
}

/// Render a config file that reproduces `table` and `scoring`.
pub fn render_config(table: &BandTable, scoring: &ScoringSettings) -> Result<String, serde_yaml::Error> {
    serde_yaml::to_string(&ConfigFile {
        version: CONFIG_VERSION,
        policy: Some(PolicySpec::from(table)),
        scoring: scoring.clone(),
    })
}
