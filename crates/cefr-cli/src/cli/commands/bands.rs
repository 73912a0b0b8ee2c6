use super::load_config_or_exit;
use crate::cli::args::{BandsArgs, OutputFormat};
use crate::exit_codes;
use cefr_core::band::{BandTable, PolicySpec};
use cefr_core::explain::describe_band;

pub fn run(args: BandsArgs) -> anyhow::Result<i32> {
    let cfg = match load_config_or_exit(&args.config) {
        Ok(cfg) => cfg,
        Err(code) => return Ok(code),
    };

    match args.format {
        OutputFormat::Json => {
            let spec = PolicySpec::from(&cfg.table);
            println!("{}", serde_json::to_string_pretty(&spec)?);
        }
        OutputFormat::Text => {
            let origin = match &cfg.source {
                Some(path) if !cfg.uses_reference_policy() => path.display().to_string(),
                _ => "reference".to_string(),
            };
            println!("Band policy ({}):", origin);
            for line in band_lines(&cfg.table) {
                println!("  {}", line);
            }
        }
    }
    Ok(exit_codes::OK)
}

fn band_lines(table: &BandTable) -> Vec<String> {
    let mut lines: Vec<String> = table
        .bands()
        .iter()
        .map(|b| describe_band(table, b.threshold))
        .collect();
    lines.push(describe_band(table, f64::NEG_INFINITY));
    lines
}
