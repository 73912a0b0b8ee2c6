use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "cefr",
    version,
    about = "Validate AI-suggested CEFR levels against the score an answer actually earned"
)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Validate a single score / AI level pair
    Validate(ValidateArgs),
    /// Validate a JSON Lines file of score records
    Batch(BatchArgs),
    /// Score answers with the configured AI provider, then validate
    Score(ScoreArgs),
    /// Print the active band policy
    Bands(BandsArgs),
    /// Write a starter cefr.yaml
    Init(InitArgs),
    Version,
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(clap::Args, Debug, Clone)]
pub struct ConfigArgs {
    /// Config file (cefr.yaml). Defaults to the reference band policy.
    #[arg(long, env = "CEFR_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(clap::Args, Debug, Clone)]
pub struct ValidateArgs {
    #[arg(long, allow_negative_numbers = true)]
    pub score: f64,

    #[arg(long, allow_negative_numbers = true)]
    pub max_score: f64,

    /// Level proposed by the AI model (any label; unknown labels are corrected)
    #[arg(long)]
    pub ai_level: String,

    #[command(flatten)]
    pub config: ConfigArgs,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Exit with code 1 when the level was corrected
    #[arg(long)]
    pub strict: bool,
}

#[derive(clap::Args, Debug, Clone)]
pub struct BatchArgs {
    /// JSON Lines input: {"id", "score", "max_score", "ai_level"} per line
    #[arg(long)]
    pub input: PathBuf,

    /// JSON Lines output (default: stdout)
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Write the correction summary as JSON
    #[arg(long)]
    pub summary: Option<PathBuf>,

    #[command(flatten)]
    pub config: ConfigArgs,

    /// Exit with code 1 when any level was corrected
    #[arg(long)]
    pub strict: bool,
}

#[derive(clap::Args, Debug, Clone)]
pub struct ScoreArgs {
    /// JSON Lines input: one scoring request per line
    #[arg(long)]
    pub input: PathBuf,

    /// JSON Lines output of scored answers (default: stdout)
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Write the correction summary as JSON
    #[arg(long)]
    pub summary: Option<PathBuf>,

    #[command(flatten)]
    pub config: ConfigArgs,

    /// Override scoring.provider (openai, fake, none)
    #[arg(long)]
    pub provider: Option<String>,

    /// Override scoring.model
    #[arg(long)]
    pub model: Option<String>,

    /// Ignore cached assessments
    #[arg(long)]
    pub refresh: bool,

    /// Exit with code 1 when any level was corrected
    #[arg(long)]
    pub strict: bool,
}

#[derive(clap::Args, Debug, Clone)]
pub struct BandsArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(clap::Args, Debug, Clone)]
pub struct InitArgs {
    #[arg(long, default_value = "cefr.yaml")]
    pub path: PathBuf,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}
