//! Exit codes are part of the CLI contract; scripts branch on them.

pub const OK: i32 = 0;
pub const CORRECTIONS_FOUND: i32 = 1; // --strict and at least one level was corrected
pub const CONFIG_ERROR: i32 = 2; // bad config, bad input file, bad arguments
pub const PROVIDER_ERROR: i32 = 3; // at least one answer could not be scored
