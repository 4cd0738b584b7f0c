//! Flat per-pair records for tabular sinks

use costar_core::{Distance, NodeId, PairOutcome};
use serde::{Deserialize, Serialize};

/// One row of the distance table
///
/// Successful pairs carry a distance and no error; failed pairs carry the
/// error message and no distance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistanceRow {
    pub actor_from: NodeId,
    pub actor_to: NodeId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<Distance>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<&PairOutcome> for DistanceRow {
    fn from(outcome: &PairOutcome) -> Self {
        match outcome {
            PairOutcome::Found(result) => Self {
                actor_from: result.left.clone(),
                actor_to: result.right.clone(),
                distance: Some(result.distance),
                error: None,
            },
            PairOutcome::Failed(failure) => Self {
                actor_from: failure.left.clone(),
                actor_to: failure.right.clone(),
                distance: None,
                error: Some(failure.message.clone()),
            },
        }
    }
}

impl DistanceRow {
    /// Column names, in output order
    pub const HEADER: [&'static str; 4] = ["actor_from", "actor_to", "distance", "error"];

    /// Cell values, in `HEADER` order
    pub fn cells(&self) -> [String; 4] {
        [
            self.actor_from.to_string(),
            self.actor_to.to_string(),
            self.distance.map(|d| d.to_string()).unwrap_or_default(),
            self.error.clone().unwrap_or_default(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use costar_core::{DistanceResult, Pair, PairFailure};

    #[test]
    fn test_rows_distinguish_failures() {
        let found = PairOutcome::Found(DistanceResult::new(
            Pair::new("nm1", "nm2"),
            Distance::Infinite,
        ));
        let failed = PairOutcome::Failed(PairFailure::new(&Pair::new("nm1", "nm3"), 2, "timeout"));

        assert_eq!(DistanceRow::from(&found).cells(), ["nm1", "nm2", "inf", ""]);
        assert_eq!(DistanceRow::from(&failed).cells(), ["nm1", "nm3", "", "timeout"]);
    }
}
