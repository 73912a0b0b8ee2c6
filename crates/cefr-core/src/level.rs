use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// CEFR proficiency level, ordered from lowest (A1) to highest (C2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CefrLevel {
    A1,
    A2,
    B1,
    B2,
    C1,
    C2,
}

impl CefrLevel {
    pub const ALL: [CefrLevel; 6] = [
        CefrLevel::A1,
        CefrLevel::A2,
        CefrLevel::B1,
        CefrLevel::B2,
        CefrLevel::C1,
        CefrLevel::C2,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CefrLevel::A1 => "A1",
            CefrLevel::A2 => "A2",
            CefrLevel::B1 => "B1",
            CefrLevel::B2 => "B2",
            CefrLevel::C1 => "C1",
            CefrLevel::C2 => "C2",
        }
    }
}

impl fmt::Display for CefrLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown CEFR level '{0}' (expected one of A1, A2, B1, B2, C1, C2)")]
pub struct LevelParseError(pub String);

impl FromStr for CefrLevel {
    type Err = LevelParseError;

    /// Exact match only: `"b2"` and `" B2"` are not levels.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CefrLevel::ALL
            .into_iter()
            .find(|l| l.as_str() == s)
            .ok_or_else(|| LevelParseError(s.to_string()))
    }
}

/// A level label as produced by an upstream AI model.
///
/// Model output is untrusted: anything that is not exactly one of the six
/// CEFR labels (including `"c1"` or `" C1 "`) is kept verbatim as
/// `Unrecognized` so it can be reported, and is never accepted by a band.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SuggestedLevel {
    Known(CefrLevel),
    Unrecognized(String),
}

impl SuggestedLevel {
    pub fn known(&self) -> Option<CefrLevel> {
        match self {
            SuggestedLevel::Known(level) => Some(*level),
            SuggestedLevel::Unrecognized(_) => None,
        }
    }

    pub fn is(&self, level: CefrLevel) -> bool {
        self.known() == Some(level)
    }

    pub fn label(&self) -> &str {
        match self {
            SuggestedLevel::Known(level) => level.as_str(),
            SuggestedLevel::Unrecognized(raw) => raw,
        }
    }
}

impl From<CefrLevel> for SuggestedLevel {
    fn from(level: CefrLevel) -> Self {
        SuggestedLevel::Known(level)
    }
}

impl From<&str> for SuggestedLevel {
    fn from(raw: &str) -> Self {
        match raw.parse::<CefrLevel>() {
            Ok(level) => SuggestedLevel::Known(level),
            Err(_) => SuggestedLevel::Unrecognized(raw.to_string()),
        }
    }
}

impl From<String> for SuggestedLevel {
    fn from(raw: String) -> Self {
        match raw.parse::<CefrLevel>() {
            Ok(level) => SuggestedLevel::Known(level),
            Err(_) => SuggestedLevel::Unrecognized(raw),
        }
    }
}

impl From<SuggestedLevel> for String {
    fn from(s: SuggestedLevel) -> Self {
        match s {
            SuggestedLevel::Known(level) => level.as_str().to_string(),
            SuggestedLevel::Unrecognized(raw) => raw,
        }
    }
}

impl fmt::Display for SuggestedLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_are_ordered_by_proficiency() {
        assert!(CefrLevel::A1 < CefrLevel::A2);
        assert!(CefrLevel::B2 < CefrLevel::C1);
        let mut shuffled = vec![CefrLevel::C1, CefrLevel::A2, CefrLevel::C2, CefrLevel::A1];
        shuffled.sort();
        assert_eq!(
            shuffled,
            vec![CefrLevel::A1, CefrLevel::A2, CefrLevel::C1, CefrLevel::C2]
        );
    }

    #[test]
    fn parse_matches_exact_labels_only() {
        assert_eq!("B2".parse::<CefrLevel>().unwrap(), CefrLevel::B2);
        for raw in ["b2", " B2", "B2 ", "c1", "B3", ""] {
            let err = raw.parse::<CefrLevel>().unwrap_err();
            assert_eq!(err, LevelParseError(raw.to_string()));
        }
    }

    #[test]
    fn suggested_level_keeps_unrecognized_labels_verbatim() {
        let s = SuggestedLevel::from("Advanced");
        assert_eq!(s, SuggestedLevel::Unrecognized("Advanced".into()));
        assert_eq!(s.known(), None);
        assert_eq!(s.label(), "Advanced");

        let k = SuggestedLevel::from("B1");
        assert!(k.is(CefrLevel::B1));
        assert_eq!(k.to_string(), "B1");

        let lower = SuggestedLevel::from("b1");
        assert_eq!(lower, SuggestedLevel::Unrecognized("b1".into()));
        assert_eq!(SuggestedLevel::from(" C1 ".to_string()).known(), None);
    }

    #[test]
    fn suggested_level_serializes_as_plain_string() {
        let json = serde_json::to_string(&SuggestedLevel::from("C2")).unwrap();
        assert_eq!(json, "\"C2\"");
        let back: SuggestedLevel = serde_json::from_str("\"native\"").unwrap();
        assert_eq!(back, SuggestedLevel::Unrecognized("native".into()));
    }
}
