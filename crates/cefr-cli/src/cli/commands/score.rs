use super::{decide_exit, emit_jsonl, load_config_or_exit};
use crate::cli::args::ScoreArgs;
use crate::exit_codes;
use cefr_core::batch::read_jsonl;
use cefr_core::config::ProviderKind;
use cefr_core::model::{ScoredResponse, ScoringRequest};
use cefr_core::report::{console, CorrectionSummary};
use cefr_core::scoring::cache::ScoreCache;
use cefr_core::scoring::{client_from_settings, ScoringRuntimeConfig, ScoringService};

pub async fn run(args: ScoreArgs) -> anyhow::Result<i32> {
    let mut cfg = match load_config_or_exit(&args.config) {
        Ok(cfg) => cfg,
        Err(code) => return Ok(code),
    };
    if let Some(provider) = &args.provider {
        cfg.scoring.provider = match provider.parse::<ProviderKind>() {
            Ok(p) => p,
            Err(e) => {
                eprintln!("config error: {}", e);
                return Ok(exit_codes::CONFIG_ERROR);
            }
        };
    }
    if let Some(model) = &args.model {
        cfg.scoring.model = Some(model.clone());
    }
    if cfg.scoring.provider == ProviderKind::None {
        eprintln!("config error: scoring is disabled (provider: none); use `cefr batch` to validate existing scores");
        return Ok(exit_codes::CONFIG_ERROR);
    }

    let requests: Vec<ScoringRequest> = match read_jsonl(&args.input) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("input error: {:#}", e);
            return Ok(exit_codes::CONFIG_ERROR);
        }
    };

    let client = match client_from_settings(&cfg.scoring) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{:#}", e);
            return Ok(exit_codes::CONFIG_ERROR);
        }
    };
    let mut runtime = ScoringRuntimeConfig::from_settings(&cfg.scoring);
    runtime.refresh = args.refresh;
    let svc = ScoringService::new(
        runtime,
        cfg.validator(),
        client,
        ScoreCache::new(cfg.scoring.cache_capacity),
    );

    tracing::info!(
        requests = requests.len(),
        provider = cfg.scoring.provider.as_str(),
        model = cfg.scoring.model_or_default(),
        "scoring answers"
    );

    let mut scored: Vec<ScoredResponse> = Vec::with_capacity(requests.len());
    let mut failed = 0usize;
    for result in svc.score_all(&requests).await {
        match result {
            Ok(s) => scored.push(s),
            Err(e) => {
                failed += 1;
                tracing::error!(error = %e, "answer could not be scored");
            }
        }
    }

    emit_jsonl(args.output.as_deref(), &scored)?;

    let summary = CorrectionSummary::from_results(scored.iter().map(|s| &s.validation))
        .with_failures(failed);
    console::print_summary(&summary);
    if let Some(path) = &args.summary {
        summary.write_json(path)?;
    }

    if failed > 0 {
        return Ok(exit_codes::PROVIDER_ERROR);
    }
    Ok(decide_exit(args.strict, summary.corrected))
}
