//! Tier and depth bands for curriculum gating

use serde::{Deserialize, Serialize};

/// Difficulty tier within a path. Tiers unlock in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    #[default]
    Foundations,
    Core,
    Advanced,
}

impl Tier {
    /// All tiers in unlock order
    pub const ALL: [Tier; 3] = [Tier::Foundations, Tier::Core, Tier::Advanced];

    /// The tier that must be complete before this one unlocks
    pub fn predecessor(self) -> Option<Tier> {
        match self {
            Self::Foundations => None,
            Self::Core => Some(Self::Foundations),
            Self::Advanced => Some(Self::Core),
        }
    }

    /// Depth band implied by this tier when a case carries no explicit level
    pub fn implied_depth(self) -> Depth {
        match self {
            Self::Foundations => Depth::Basic,
            Self::Core => Depth::Intermediate,
            Self::Advanced => Depth::Advanced,
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Foundations => write!(f, "foundations"),
            Self::Core => write!(f, "core"),
            Self::Advanced => write!(f, "advanced"),
        }
    }
}

impl std::str::FromStr for Tier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "foundations" => Ok(Self::Foundations),
            "core" => Ok(Self::Core),
            "advanced" => Ok(Self::Advanced),
            _ => Err(format!("Unknown tier: {}", s)),
        }
    }
}

/// Depth of an individual case or skill within a module
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Depth {
    #[default]
    Basic,
    Intermediate,
    Advanced,
}

impl std::fmt::Display for Depth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Basic => write!(f, "basic"),
            Self::Intermediate => write!(f, "intermediate"),
            Self::Advanced => write!(f, "advanced"),
        }
    }
}

impl std::str::FromStr for Depth {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "basic" => Ok(Self::Basic),
            "intermediate" => Ok(Self::Intermediate),
            "advanced" => Ok(Self::Advanced),
            _ => Err(format!("Unknown case level: {}", s)),
        }
    }
}
