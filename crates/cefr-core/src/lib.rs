//! CEFR level post-validation for AI-scored Writing and Speaking answers.
//!
//! The core entry point is [`validator::validate`]: given a raw score, the
//! maximum score and the level an AI model proposed, it returns the level
//! the score percentage actually supports. Everything else in this crate
//! (configuration, the AI scoring pipeline, batch processing, reports) is
//! built around that function.

pub mod band;
pub mod batch;
pub mod config;
pub mod errors;
pub mod explain;
pub mod level;
pub mod model;
pub mod providers;
pub mod report;
pub mod scoring;
pub mod validator;

pub use band::{BandPolicy, BandTable, Resolution};
pub use level::{CefrLevel, SuggestedLevel};
pub use validator::{validate, CefrValidator, ScoreInput, ValidationResult};
