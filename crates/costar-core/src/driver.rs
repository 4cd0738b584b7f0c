//! Pairwise distance batches over a roster of actors

use crate::config::DriverConfig;
use crate::distance::{Distance, DistanceResult};
use crate::error::{PairFailure, Result, SinkError};
use crate::limits;
use crate::node::{unordered_pairs, NodeId, Pair};
use crate::oracle::HopOracles;
use crate::search::BidirectionalSearchEngine;
use crate::sink::ResultSink;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use ulid::Ulid;

/// Final state of one pair in a batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum PairOutcome {
    Found(DistanceResult),
    Failed(PairFailure),
}

impl PairOutcome {
    pub fn pair(&self) -> Pair {
        match self {
            Self::Found(result) => result.pair(),
            Self::Failed(failure) => failure.pair(),
        }
    }

    pub fn distance(&self) -> Option<Distance> {
        match self {
            Self::Found(result) => Some(result.distance),
            Self::Failed(_) => None,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// Outcomes of a batch, in roster pair order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub run_id: Ulid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub outcomes: Vec<PairOutcome>,
}

impl BatchReport {
    pub fn successes(&self) -> impl Iterator<Item = &DistanceResult> {
        self.outcomes.iter().filter_map(|outcome| match outcome {
            PairOutcome::Found(result) => Some(result),
            PairOutcome::Failed(_) => None,
        })
    }

    pub fn failures(&self) -> impl Iterator<Item = &PairFailure> {
        self.outcomes.iter().filter_map(|outcome| match outcome {
            PairOutcome::Failed(failure) => Some(failure),
            PairOutcome::Found(_) => None,
        })
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}

/// A batch report together with the sink's verdict
///
/// A sink failure never discards the computed outcomes.
#[derive(Debug)]
pub struct PersistOutcome {
    pub report: BatchReport,
    pub sink: std::result::Result<(), SinkError>,
}

/// Computes distances for every unordered pair of a roster
///
/// Pairs run as independent tasks, at most `worker_budget` at a time; a
/// pair's task is only spawned once a worker is free. A failing pair is
/// recorded in the report and never cancels its siblings.
pub struct PairwiseDistanceDriver {
    engine: BidirectionalSearchEngine,
    config: DriverConfig,
}

impl PairwiseDistanceDriver {
    pub fn new(oracles: HopOracles, config: DriverConfig) -> Self {
        Self {
            engine: BidirectionalSearchEngine::new(oracles, config.search.clone()),
            config,
        }
    }

    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    pub fn engine(&self) -> &BidirectionalSearchEngine {
        &self.engine
    }

    /// Search every pair of `roster` and collect the outcomes
    ///
    /// Only invalid configuration or rosters are returned as errors; pair
    /// failures are part of the report. Dropping the returned future aborts
    /// every search still running.
    pub async fn run(&self, roster: &[NodeId]) -> Result<BatchReport> {
        self.config.validate()?;
        limits::validate_roster(roster.len())?;
        for id in roster {
            limits::validate_node_id(id.as_str())?;
        }

        let run_id = Ulid::new();
        let started_at = Utc::now();
        let pairs = unordered_pairs(roster);

        tracing::info!(
            "Batch {}: {} pairs from {} actors, {} workers, at most {} lookups in flight",
            run_id,
            pairs.len(),
            roster.len(),
            self.config.worker_budget,
            self.config.max_in_flight()
        );

        let workers = Arc::new(Semaphore::new(self.config.worker_budget));
        let retries = self.config.pair_retries;
        let mut slots: Vec<Option<PairOutcome>> = vec![None; pairs.len()];
        let mut tasks = JoinSet::new();

        // A task is only spawned once it holds a worker permit
        for (index, pair) in pairs.iter().cloned().enumerate() {
            let permit = match workers.clone().acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => {
                    slots[index] = Some(PairOutcome::Failed(PairFailure::new(
                        &pair,
                        0,
                        "worker pool closed",
                    )));
                    continue;
                }
            };
            let engine = self.engine.clone();

            tasks.spawn(async move {
                let outcome = search_pair(&engine, pair, retries).await;
                drop(permit);
                (index, outcome)
            });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, outcome)) => {
                    if let Some(slot) = slots.get_mut(index) {
                        *slot = Some(outcome);
                    }
                }
                Err(e) => tracing::warn!("Pair search task did not complete: {}", e),
            }
        }

        let outcomes: Vec<PairOutcome> = pairs
            .iter()
            .zip(slots)
            .map(|(pair, slot)| {
                slot.unwrap_or_else(|| {
                    PairOutcome::Failed(PairFailure::new(pair, 1, "search task aborted"))
                })
            })
            .collect();

        let report = BatchReport {
            run_id,
            started_at,
            finished_at: Utc::now(),
            outcomes,
        };

        tracing::info!(
            "Batch {} finished: {} found, {} failed",
            run_id,
            report.successes().count(),
            report.failures().count()
        );

        Ok(report)
    }

    /// Run the batch and hand every outcome to `sink`
    pub async fn run_and_persist(
        &self,
        roster: &[NodeId],
        sink: &dyn ResultSink,
    ) -> Result<PersistOutcome> {
        let report = self.run(roster).await?;
        let sink = sink.write_all(&report.outcomes).await;

        if let Err(e) = &sink {
            tracing::error!("Failed to persist {} outcomes: {}", report.len(), e);
        }

        Ok(PersistOutcome { report, sink })
    }
}

async fn search_pair(engine: &BidirectionalSearchEngine, pair: Pair, retries: u32) -> PairOutcome {
    let mut attempts: u32 = 0;

    loop {
        attempts += 1;
        match engine.distance(&pair.left, &pair.right).await {
            Ok(distance) => return PairOutcome::Found(DistanceResult::new(pair, distance)),
            Err(e) if e.is_transient() && attempts <= retries => {
                tracing::debug!("Retrying {} after attempt {}: {}", pair, attempts, e);
            }
            Err(e) => {
                tracing::warn!("{}", e);
                return PairOutcome::Failed(PairFailure::from_search(attempts, &e));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SearchConfig;
    use crate::error::{OracleError, OracleResult};
    use crate::oracle::{MemoryOracle, NeighborOracle};
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Fails lookups of selected nodes, optionally only a few times
    struct FlakyOracle {
        inner: MemoryOracle,
        failing: HashSet<NodeId>,
        remaining: AtomicUsize,
        hits: AtomicUsize,
        current: AtomicUsize,
        peak: AtomicUsize,
    }

    impl FlakyOracle {
        fn new(inner: MemoryOracle, failing: &[&str], failures: usize) -> Self {
            Self {
                inner,
                failing: failing.iter().map(|id| NodeId::from(*id)).collect(),
                remaining: AtomicUsize::new(failures),
                hits: AtomicUsize::new(0),
                current: AtomicUsize::new(0),
                peak: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl NeighborOracle for FlakyOracle {
        async fn fetch_neighbors(
            &self,
            node: &NodeId,
            limit: Option<usize>,
        ) -> OracleResult<Vec<NodeId>> {
            let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::task::yield_now().await;
            self.current.fetch_sub(1, Ordering::SeqCst);

            if self.failing.contains(node) {
                self.hits.fetch_add(1, Ordering::SeqCst);
            }
            if self.failing.contains(node)
                && self
                    .remaining
                    .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                    .is_ok()
            {
                return Err(OracleError::transient(node, "connection reset"));
            }
            self.inner.fetch_neighbors(node, limit).await
        }
    }

    #[derive(Default)]
    struct VecSink {
        written: Mutex<Vec<PairOutcome>>,
    }

    #[async_trait]
    impl ResultSink for VecSink {
        async fn write_all(&self, outcomes: &[PairOutcome]) -> std::result::Result<(), SinkError> {
            self.written.lock().unwrap().extend_from_slice(outcomes);
            Ok(())
        }
    }

    struct BrokenSink;

    #[async_trait]
    impl ResultSink for BrokenSink {
        async fn write_all(&self, _outcomes: &[PairOutcome]) -> std::result::Result<(), SinkError> {
            Err(SinkError("disk full".to_string()))
        }
    }

    // nm1 and nm2 share tt12, nm1 and nm3 share tt13; nm2 and nm3 only
    // connect through the cast of tt_bad, which cannot be fetched
    fn triangle() -> MemoryOracle {
        MemoryOracle::new()
            .with_edge("nm1", "tt12")
            .with_edge("nm2", "tt12")
            .with_edge("nm1", "tt13")
            .with_edge("nm3", "tt13")
            .with_edge("nm2", "tt_bad")
            .with_edge("nm3", "tt_bad3")
    }

    fn roster(ids: &[&str]) -> Vec<NodeId> {
        ids.iter().map(|id| NodeId::from(*id)).collect()
    }

    fn driver(oracle: Arc<dyn NeighborOracle>, config: DriverConfig) -> PairwiseDistanceDriver {
        PairwiseDistanceDriver::new(HopOracles::symmetric(oracle), config)
    }

    #[tokio::test]
    async fn test_failing_pair_does_not_affect_siblings() {
        let oracle = Arc::new(FlakyOracle::new(triangle(), &["tt_bad"], usize::MAX));
        let driver = driver(oracle, DriverConfig::default());

        let report = driver.run(&roster(&["nm1", "nm2", "nm3"])).await.unwrap();

        assert_eq!(report.len(), 3);
        assert_eq!(report.outcomes[0].pair(), Pair::new("nm1", "nm2"));
        assert_eq!(report.outcomes[0].distance(), Some(Distance::Hops(2)));
        assert_eq!(report.outcomes[1].pair(), Pair::new("nm1", "nm3"));
        assert_eq!(report.outcomes[1].distance(), Some(Distance::Hops(2)));

        let failures: Vec<_> = report.failures().collect();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].pair(), Pair::new("nm2", "nm3"));
        assert!(failures[0].message.contains("tt_bad"));
        assert!(failures[0].transient);
        assert_eq!(failures[0].attempts, 1);
    }

    #[tokio::test]
    async fn test_transient_failure_succeeds_on_second_attempt() {
        let oracle = Arc::new(FlakyOracle::new(
            MemoryOracle::new().with_edge("nm1", "tt1").with_edge("nm2", "tt1"),
            &["nm2"],
            1,
        ));
        let driver = driver(oracle.clone(), DriverConfig::default().with_retries(1));

        let report = driver.run(&roster(&["nm1", "nm2"])).await.unwrap();

        assert_eq!(report.failures().count(), 0);
        assert_eq!(report.outcomes[0].distance(), Some(Distance::Hops(2)));
        // nm2 is looked up once per attempt
        assert_eq!(oracle.hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_retries_run_out() {
        let oracle = Arc::new(FlakyOracle::new(
            MemoryOracle::new().with_edge("nm1", "tt1").with_edge("nm2", "tt1"),
            &["nm2"],
            usize::MAX,
        ));
        let driver = driver(oracle.clone(), DriverConfig::default().with_retries(2));

        let report = driver.run(&roster(&["nm1", "nm2"])).await.unwrap();

        let failure = report.failures().next().unwrap();
        assert_eq!(failure.pair(), Pair::new("nm1", "nm2"));
        assert_eq!(failure.attempts, 3);
        assert!(failure.transient);
        assert_eq!(oracle.hits.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_not_found_is_not_retried() {
        let oracle: Arc<dyn NeighborOracle> =
            Arc::new(MemoryOracle::new().with_edge("nm1", "tt1"));
        let driver = driver(oracle, DriverConfig::default().with_retries(3));

        let report = driver.run(&roster(&["nm1", "nm_missing"])).await.unwrap();

        let failure = report.failures().next().unwrap();
        assert_eq!(failure.attempts, 1);
        assert!(!failure.transient);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_pools_compose_multiplicatively() {
        let graph = (0..8).fold(MemoryOracle::new(), |oracle, i| {
            oracle
                .with_edge(format!("nm{i}"), format!("tt{i}"))
                .with_edge(format!("nm{i}"), "tt_all")
        });
        let oracle = Arc::new(FlakyOracle::new(graph, &[], 0));
        let config = DriverConfig::new(SearchConfig::new().with_concurrency(1)).with_worker_budget(2);
        let driver = driver(oracle.clone(), config);

        let ids: Vec<NodeId> = (0..8).map(|i| NodeId::new(format!("nm{i}"))).collect();
        let report = driver.run(&ids).await.unwrap();

        assert_eq!(report.len(), 28);
        assert!(report.successes().all(|r| r.distance == Distance::Hops(2)));
        assert!(oracle.peak.load(Ordering::SeqCst) <= 2);
    }

    /// Records the peak number of live runtime tasks seen from inside a lookup
    struct TaskGauge {
        inner: MemoryOracle,
        peak: AtomicUsize,
    }

    #[async_trait]
    impl NeighborOracle for TaskGauge {
        async fn fetch_neighbors(
            &self,
            node: &NodeId,
            limit: Option<usize>,
        ) -> OracleResult<Vec<NodeId>> {
            let alive = tokio::runtime::Handle::current().metrics().num_alive_tasks();
            self.peak.fetch_max(alive, Ordering::SeqCst);
            tokio::task::yield_now().await;
            self.inner.fetch_neighbors(node, limit).await
        }
    }

    #[tokio::test]
    async fn test_live_tasks_stay_within_worker_budget() {
        let graph = (0..10).fold(MemoryOracle::new(), |oracle, i| {
            oracle.with_edge(format!("nm{i}"), "tt_all")
        });
        let oracle = Arc::new(TaskGauge {
            inner: graph,
            peak: AtomicUsize::new(0),
        });
        let driver = driver(oracle.clone(), DriverConfig::default().with_worker_budget(2));

        let ids: Vec<NodeId> = (0..10).map(|i| NodeId::new(format!("nm{i}"))).collect();
        let report = driver.run(&ids).await.unwrap();

        assert_eq!(report.len(), 45);
        assert_eq!(report.outcomes[0].pair(), Pair::new("nm0", "nm1"));
        assert_eq!(report.outcomes[44].pair(), Pair::new("nm8", "nm9"));
        assert!(report.successes().all(|r| r.distance == Distance::Hops(2)));
        assert!(oracle.peak.load(Ordering::SeqCst) <= 2);
    }

    #[tokio::test]
    async fn test_results_reach_the_sink() {
        let oracle: Arc<dyn NeighborOracle> = Arc::new(triangle());
        let driver = driver(oracle, DriverConfig::default());
        let sink = VecSink::default();

        let persisted = driver
            .run_and_persist(&roster(&["nm1", "nm2"]), &sink)
            .await
            .unwrap();

        assert!(persisted.sink.is_ok());
        assert_eq!(sink.written.lock().unwrap().as_slice(), persisted.report.outcomes.as_slice());
    }

    #[tokio::test]
    async fn test_sink_failure_keeps_report() {
        let oracle: Arc<dyn NeighborOracle> = Arc::new(triangle());
        let driver = driver(oracle, DriverConfig::default());

        let persisted = driver
            .run_and_persist(&roster(&["nm1", "nm2", "nm3"]), &BrokenSink)
            .await
            .unwrap();

        assert_eq!(persisted.sink, Err(SinkError("disk full".to_string())));
        assert_eq!(persisted.report.len(), 3);
    }

    #[tokio::test]
    async fn test_invalid_batches_are_rejected() {
        let oracle: Arc<dyn NeighborOracle> = Arc::new(triangle());

        let no_workers = driver(oracle.clone(), DriverConfig::default().with_worker_budget(0));
        assert!(no_workers.run(&roster(&["nm1", "nm2"])).await.is_err());

        let driver = driver(oracle, DriverConfig::default());
        assert!(driver.run(&roster(&["nm1", " "])).await.is_err());

        let empty = driver.run(&[]).await.unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_outcome_wire_form() {
        let found = PairOutcome::Found(DistanceResult::new(Pair::new("nm1", "nm2"), Distance::Hops(2)));
        let json = serde_json::to_value(&found).unwrap();
        assert_eq!(json["status"], "found");
        assert_eq!(json["distance"], 2);

        let failed = PairOutcome::Failed(PairFailure::new(&Pair::new("nm1", "nm3"), 1, "boom"));
        let json = serde_json::to_value(&failed).unwrap();
        assert_eq!(json["status"], "failed");
        assert_eq!(json["message"], "boom");
    }
}
