use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const HOT_THRESHOLD: u8 = 80;
pub const WARM_THRESHOLD: u8 = 60;

/// Coarse bucket derived from a lead's score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Hot,
    Warm,
    Cold,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Hot, Priority::Warm, Priority::Cold];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Hot => "hot",
            Priority::Warm => "warm",
            Priority::Cold => "cold",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid priority '{0}' (expected one of: hot, warm, cold)")]
pub struct ParsePriorityError(pub String);

impl FromStr for Priority {
    type Err = ParsePriorityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hot" => Ok(Priority::Hot),
            "warm" => Ok(Priority::Warm),
            "cold" => Ok(Priority::Cold),
            _ => Err(ParsePriorityError(s.to_string())),
        }
    }
}

/// Map a score to its tier. Lower bounds are inclusive.
pub fn priority(score: u8) -> Priority {
    if score >= HOT_THRESHOLD {
        Priority::Hot
    } else if score >= WARM_THRESHOLD {
        Priority::Warm
    } else {
        Priority::Cold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(priority(80), Priority::Hot);
        assert_eq!(priority(79), Priority::Warm);
        assert_eq!(priority(60), Priority::Warm);
        assert_eq!(priority(59), Priority::Cold);
    }

    #[test]
    fn test_tier_extremes() {
        assert_eq!(priority(100), Priority::Hot);
        assert_eq!(priority(0), Priority::Cold);
    }

    #[test]
    fn test_parse_priority() {
        assert_eq!("HOT".parse::<Priority>().unwrap(), Priority::Hot);
        assert_eq!("cold".parse::<Priority>().unwrap(), Priority::Cold);
        assert!("lukewarm".parse::<Priority>().is_err());
    }

    #[test]
    fn test_priority_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Priority::Warm).unwrap(), "\"warm\"");
    }
}
