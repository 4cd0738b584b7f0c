//! Distance values and per-pair results

use crate::node::{NodeId, Pair};
use serde::{Deserialize, Serialize};

/// Hop count between two nodes, or "unreachable within the depth bound"
///
/// Ordering puts every finite distance before `Infinite`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "DistanceRepr", try_from = "DistanceRepr")]
pub enum Distance {
    Hops(u32),
    Infinite,
}

impl Distance {
    pub fn is_finite(&self) -> bool {
        matches!(self, Self::Hops(_))
    }

    pub fn hops(&self) -> Option<u32> {
        match self {
            Self::Hops(hops) => Some(*hops),
            Self::Infinite => None,
        }
    }
}

impl std::fmt::Display for Distance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Hops(hops) => write!(f, "{}", hops),
            Self::Infinite => write!(f, "inf"),
        }
    }
}

/// Wire form: a bare number, or the string `"inf"`
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum DistanceRepr {
    Hops(u32),
    Label(String),
}

impl From<Distance> for DistanceRepr {
    fn from(distance: Distance) -> Self {
        match distance {
            Distance::Hops(hops) => Self::Hops(hops),
            Distance::Infinite => Self::Label("inf".to_string()),
        }
    }
}

impl TryFrom<DistanceRepr> for Distance {
    type Error = String;

    fn try_from(repr: DistanceRepr) -> Result<Self, Self::Error> {
        match repr {
            DistanceRepr::Hops(hops) => Ok(Self::Hops(hops)),
            DistanceRepr::Label(label) if label.eq_ignore_ascii_case("inf") => Ok(Self::Infinite),
            DistanceRepr::Label(label) => Err(format!("invalid distance: {}", label)),
        }
    }
}

/// Distance computed for one pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistanceResult {
    pub left: NodeId,
    pub right: NodeId,
    pub distance: Distance,
}

impl DistanceResult {
    pub fn new(pair: Pair, distance: Distance) -> Self {
        Self {
            left: pair.left,
            right: pair.right,
            distance,
        }
    }

    pub fn pair(&self) -> Pair {
        Pair::new(self.left.clone(), self.right.clone())
    }
}
