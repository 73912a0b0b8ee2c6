use super::{decide_exit, emit_jsonl, load_config_or_exit};
use crate::cli::args::BatchArgs;
use crate::exit_codes;
use cefr_core::batch::{read_jsonl, validate_batch, BatchRecord};
use cefr_core::report::{console, CorrectionSummary};

pub fn run(args: BatchArgs) -> anyhow::Result<i32> {
    let cfg = match load_config_or_exit(&args.config) {
        Ok(cfg) => cfg,
        Err(code) => return Ok(code),
    };

    let records: Vec<BatchRecord> = match read_jsonl(&args.input) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("input error: {:#}", e);
            return Ok(exit_codes::CONFIG_ERROR);
        }
    };

    let outcomes = validate_batch(&cfg.validator(), &records);
    emit_jsonl(args.output.as_deref(), &outcomes)?;

    let summary = CorrectionSummary::from_results(outcomes.iter().map(|o| &o.result));
    console::print_summary(&summary);
    if let Some(path) = &args.summary {
        summary.write_json(path)?;
    }

    Ok(decide_exit(args.strict, summary.corrected))
}
