use super::args::*;
use crate::exit_codes;
use cefr_core::config::{load_or_default, Config};
use std::path::Path;

pub mod bands;
pub mod batch;
pub mod init;
pub mod score;
pub mod validate;

pub async fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    match cli.cmd {
        Command::Validate(args) => validate::run(args),
        Command::Batch(args) => batch::run(args),
        Command::Score(args) => score::run(args).await,
        Command::Bands(args) => bands::run(args),
        Command::Init(args) => init::run(args),
        Command::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            Ok(exit_codes::OK)
        }
    }
}

/// Load the config or print a diagnostic and hand back the exit code.
pub(crate) fn load_config_or_exit(args: &ConfigArgs) -> Result<Config, i32> {
    load_or_default(args.config.as_deref()).map_err(|e| {
        eprintln!("config error: {}", e);
        exit_codes::CONFIG_ERROR
    })
}

/// Write JSON Lines to `path`, or to stdout when no path is given.
pub(crate) fn emit_jsonl<T: serde::Serialize>(
    path: Option<&Path>,
    items: &[T],
) -> anyhow::Result<()> {
    match path {
        Some(path) => {
            cefr_core::batch::write_jsonl(path, items)?;
            eprintln!("wrote {}", path.display());
        }
        None => {
            for item in items {
                println!("{}", serde_json::to_string(item)?);
            }
        }
    }
    Ok(())
}

pub(crate) fn decide_exit(strict: bool, corrected: usize) -> i32 {
    if strict && corrected > 0 {
        exit_codes::CORRECTIONS_FOUND
    } else {
        exit_codes::OK
    }
}
