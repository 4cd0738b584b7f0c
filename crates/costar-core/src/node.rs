//! Node identifiers and pair construction

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::HashSet;

/// Opaque identifier of an actor or a movie
///
/// The search engine is namespace-agnostic: actor ids and movie ids share
/// this type and only differ by the side of the bipartite graph they live on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub String);

impl NodeId {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Borrow<str> for NodeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// One unordered pair of roster entries, searched exactly once
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pair {
    pub left: NodeId,
    pub right: NodeId,
}

impl Pair {
    pub fn new(left: impl Into<NodeId>, right: impl Into<NodeId>) -> Self {
        Self {
            left: left.into(),
            right: right.into(),
        }
    }
}

impl std::fmt::Display for Pair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} <-> {}", self.left, self.right)
    }
}

/// Build every unordered pair of a roster, in roster order
///
/// Duplicate roster entries are collapsed first, so a roster of `n`
/// distinct ids always yields `n * (n - 1) / 2` pairs.
pub fn unordered_pairs(roster: &[NodeId]) -> Vec<Pair> {
    let mut seen = HashSet::new();
    let distinct: Vec<&NodeId> = roster.iter().filter(|id| seen.insert(*id)).collect();

    distinct
        .iter()
        .enumerate()
        .flat_map(|(i, left)| {
            distinct[i + 1..]
                .iter()
                .map(move |right| Pair::new((*left).clone(), (*right).clone()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster(ids: &[&str]) -> Vec<NodeId> {
        ids.iter().map(|id| NodeId::from(*id)).collect()
    }

    #[test]
    fn test_three_actors_yield_three_pairs() {
        let pairs = unordered_pairs(&roster(&["nm1", "nm2", "nm3"]));

        assert_eq!(
            pairs,
            vec![
                Pair::new("nm1", "nm2"),
                Pair::new("nm1", "nm3"),
                Pair::new("nm2", "nm3"),
            ]
        );
    }

    #[test]
    fn test_pair_count_formula() {
        let ids: Vec<String> = (0..10).map(|i| format!("nm{i}")).collect();
        let roster: Vec<NodeId> = ids.into_iter().map(NodeId::from).collect();
        assert_eq!(unordered_pairs(&roster).len(), 45);
    }

    #[test]
    fn test_duplicates_and_small_rosters() {
        assert!(unordered_pairs(&[]).is_empty());
        assert!(unordered_pairs(&roster(&["nm1"])).is_empty());
        assert_eq!(
            unordered_pairs(&roster(&["nm1", "nm2", "nm1"])),
            vec![Pair::new("nm1", "nm2")]
        );
    }

    #[test]
    fn test_node_id_serializes_as_plain_string() {
        let json = serde_json::to_string(&NodeId::from("nm0000138")).unwrap();
        assert_eq!(json, "\"nm0000138\"");
    }
}
