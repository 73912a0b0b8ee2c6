use super::{decide_exit, load_config_or_exit};
use crate::cli::args::{OutputFormat, ValidateArgs};
use cefr_core::explain::{correction_note, describe_band};
use cefr_core::report::console::format_result_line;
use cefr_core::ScoreInput;
use serde_json::json;

pub fn run(args: ValidateArgs) -> anyhow::Result<i32> {
    let cfg = match load_config_or_exit(&args.config) {
        Ok(cfg) => cfg,
        Err(code) => return Ok(code),
    };
    let validator = cfg.validator();
    let result = validator.validate(&ScoreInput::new(
        args.score,
        args.max_score,
        args.ai_level.as_str(),
    ));

    match args.format {
        OutputFormat::Json => {
            let out = json!({
                "score": args.score,
                "max_score": args.max_score,
                "result": result,
                "correction_note": correction_note(&result),
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputFormat::Text => {
            println!("{}", format_result_line("input", &result));
            println!(
                "band: {}",
                describe_band(validator.table(), result.percentage)
            );
        }
    }

    Ok(decide_exit(args.strict, usize::from(result.was_corrected)))
}
