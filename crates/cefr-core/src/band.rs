//! Percentage bands and the per-band CEFR policy.
//!
//! A [`BandTable`] is an ordered list of [`BandPolicy`] records, highest
//! threshold first. Lookup walks the list top-down and the first band whose
//! threshold is `<=` the percentage wins; percentages below the lowest
//! threshold resolve to the table's floor level.
//!
//! ```text
//!  pct >= 90  {C2, C1}            -> C1
//!  pct >= 80  {B2, C1}  C2 -> C1  -> B2
//!  pct >= 70  {B2, B1}  C1 -> B2  -> B2
//!  pct >= 60  {B1, B2}            -> B1
//!  pct >= 50  {B1, A2}            -> A2
//!  pct >= 30  {A2, A1}            -> A2
//!  otherwise                      -> A1
//! ```
//!
//! Only the 80 and 70 bands carry a remap. The one-notch downgrade is not a
//! general rule and must not be inferred for other bands.

use crate::level::{CefrLevel, SuggestedLevel};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PolicyError {
    #[error("policy must define at least one band")]
    Empty,

    #[error("band #{index}: threshold {threshold} is not a finite number")]
    NonFiniteThreshold { index: usize, threshold: f64 },

    #[error("band #{index}: threshold {threshold} must be lower than the previous band's {previous}")]
    NotDescending {
        index: usize,
        threshold: f64,
        previous: f64,
    },

    #[error("band #{index} (>= {threshold}): fallback {fallback} is not in the acceptable set")]
    FallbackNotAcceptable {
        index: usize,
        threshold: f64,
        fallback: CefrLevel,
    },

    #[error("band #{index} (>= {threshold}): remap target {to} is not in the acceptable set")]
    RemapTargetNotAcceptable {
        index: usize,
        threshold: f64,
        to: CefrLevel,
    },

    #[error("band #{index} (>= {threshold}): remap source {from} is already acceptable")]
    RemapShadowed {
        index: usize,
        threshold: f64,
        from: CefrLevel,
    },
}

/// Replace one specific out-of-band suggestion with a fixed level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Remap {
    pub from: CefrLevel,
    pub to: CefrLevel,
}

/// How a band arrived at its level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    /// The suggestion was in the acceptable set.
    Accepted,
    /// The suggestion matched the band's remap source.
    Remapped,
    /// The suggestion was replaced by the band's fallback.
    Fallback,
    /// The percentage fell below every band.
    Floor,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BandPolicy {
    /// Inclusive lower bound, in percent.
    pub threshold: f64,
    pub acceptable: Vec<CefrLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remap: Option<Remap>,
    pub fallback: CefrLevel,
}

impl BandPolicy {
    pub fn new(threshold: f64, acceptable: &[CefrLevel], fallback: CefrLevel) -> Self {
        Self {
            threshold,
            acceptable: acceptable.to_vec(),
            remap: None,
            fallback,
        }
    }

    pub fn with_remap(mut self, from: CefrLevel, to: CefrLevel) -> Self {
        self.remap = Some(Remap { from, to });
        self
    }

    pub fn accepts(&self, level: CefrLevel) -> bool {
        self.acceptable.contains(&level)
    }

    pub fn resolve(&self, suggested: &SuggestedLevel) -> (CefrLevel, Resolution) {
        let Some(level) = suggested.known() else {
            return (self.fallback, Resolution::Fallback);
        };
        if self.accepts(level) {
            return (level, Resolution::Accepted);
        }
        match self.remap {
            Some(remap) if remap.from == level => (remap.to, Resolution::Remapped),
            _ => (self.fallback, Resolution::Fallback),
        }
    }
}

/// Ordered band policy. Construct through [`BandTable::new`] or
/// [`BandTable::reference`]; both guarantee descending finite thresholds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BandTable {
    bands: Vec<BandPolicy>,
    floor: CefrLevel,
}

impl BandTable {
    pub fn new(bands: Vec<BandPolicy>, floor: CefrLevel) -> Result<Self, PolicyError> {
        if bands.is_empty() {
            return Err(PolicyError::Empty);
        }
        let mut previous: Option<f64> = None;
        for (index, band) in bands.iter().enumerate() {
            let threshold = band.threshold;
            if !threshold.is_finite() {
                return Err(PolicyError::NonFiniteThreshold { index, threshold });
            }
            if let Some(previous) = previous {
                if threshold >= previous {
                    return Err(PolicyError::NotDescending {
                        index,
                        threshold,
                        previous,
                    });
                }
            }
            if !band.accepts(band.fallback) {
                return Err(PolicyError::FallbackNotAcceptable {
                    index,
                    threshold,
                    fallback: band.fallback,
                });
            }
            if let Some(remap) = band.remap {
                if !band.accepts(remap.to) {
                    return Err(PolicyError::RemapTargetNotAcceptable {
                        index,
                        threshold,
                        to: remap.to,
                    });
                }
                if band.accepts(remap.from) {
                    return Err(PolicyError::RemapShadowed {
                        index,
                        threshold,
                        from: remap.from,
                    });
                }
            }
            previous = Some(threshold);
        }
        Ok(Self { bands, floor })
    }

    /// The table used by the platform's scoring pipeline.
    pub fn reference() -> Self {
        use CefrLevel::*;
        Self {
            bands: vec![
                BandPolicy::new(90.0, &[C2, C1], C1),
                BandPolicy::new(80.0, &[B2, C1], B2).with_remap(C2, C1),
                BandPolicy::new(70.0, &[B2, B1], B2).with_remap(C1, B2),
                BandPolicy::new(60.0, &[B1, B2], B1),
                BandPolicy::new(50.0, &[B1, A2], A2),
                BandPolicy::new(30.0, &[A2, A1], A2),
            ],
            floor: A1,
        }
    }

    pub fn bands(&self) -> &[BandPolicy] {
        &self.bands
    }

    pub fn floor(&self) -> CefrLevel {
        self.floor
    }

    /// First band whose threshold the percentage reaches. `None` means floor.
    pub fn band_for(&self, percentage: f64) -> Option<&BandPolicy> {
        self.bands.iter().find(|b| percentage >= b.threshold)
    }

    /// Exclusive upper bound of `band`, i.e. the threshold of the band above it.
    pub fn upper_bound(&self, band: &BandPolicy) -> Option<f64> {
        let idx = self.bands.iter().position(|b| std::ptr::eq(b, band))?;
        idx.checked_sub(1).map(|i| self.bands[i].threshold)
    }

    pub fn lowest_threshold(&self) -> f64 {
        self.bands.last().map(|b| b.threshold).unwrap_or(0.0)
    }

    pub fn resolve(&self, percentage: f64, suggested: &SuggestedLevel) -> Resolved {
        match self.band_for(percentage) {
            Some(band) => {
                let (level, resolution) = band.resolve(suggested);
                Resolved {
                    level,
                    resolution,
                    band_threshold: Some(band.threshold),
                }
            }
            None => Resolved {
                level: self.floor,
                resolution: Resolution::Floor,
                band_threshold: None,
            },
        }
    }
}

impl Default for BandTable {
    fn default() -> Self {
        Self::reference()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolved {
    pub level: CefrLevel,
    pub resolution: Resolution,
    pub band_threshold: Option<f64>,
}

/// User-facing policy shape as written in config files.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PolicySpec {
    #[serde(default = "default_floor")]
    pub floor: CefrLevel,
    pub bands: Vec<BandPolicy>,
}

fn default_floor() -> CefrLevel {
    CefrLevel::A1
}

impl PolicySpec {
    pub fn compile(self) -> Result<BandTable, PolicyError> {
        BandTable::new(self.bands, self.floor)
    }
}

impl From<&BandTable> for PolicySpec {
    fn from(table: &BandTable) -> Self {
        Self {
            floor: table.floor,
            bands: table.bands.clone(),
        }
    }
}
