use crate::cli::args::InitArgs;
use crate::exit_codes;
use cefr_core::band::BandTable;
use cefr_core::config::{render_config, ScoringSettings};

pub fn run(args: InitArgs) -> anyhow::Result<i32> {
    if args.path.exists() && !args.force {
        eprintln!(
            "{} already exists (use --force to overwrite)",
            args.path.display()
        );
        return Ok(exit_codes::CONFIG_ERROR);
    }
    let yaml = render_config(&BandTable::reference(), &ScoringSettings::default())?;
    std::fs::write(&args.path, yaml)
        .map_err(|e| anyhow::anyhow!("failed to write {}: {}", args.path.display(), e))?;
    eprintln!("wrote {}", args.path.display());
    Ok(exit_codes::OK)
}
