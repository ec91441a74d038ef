//! Query session: owns the single result record shown on screen.

use crate::errors::QueryError;
use crate::models::PositionSnapshot;
use crate::position::{PositionAggregator, validate_address};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error};

/// What the results panel currently holds.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "data", rename_all = "snake_case")]
pub enum QueryOutcome {
    Empty,
    Ready(PositionSnapshot),
    Failed(String),
}

/// Immutable view record. Every transition replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewState {
    /// Generation of the query this record belongs to; 0 before any query.
    pub generation: u64,
    pub loading: bool,
    pub outcome: QueryOutcome,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            generation: 0,
            loading: false,
            outcome: QueryOutcome::Empty,
        }
    }
}

/// Whether a finished query made it onto the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commit {
    Applied,
    /// A newer query was submitted meanwhile; the result was dropped.
    Stale,
}

pub struct Dashboard {
    aggregator: PositionAggregator,
    generation: AtomicU64,
    state_tx: watch::Sender<ViewState>,
}

impl Dashboard {
    pub fn new(aggregator: PositionAggregator) -> Self {
        let (state_tx, _) = watch::channel(ViewState::default());
        Self {
            aggregator,
            generation: AtomicU64::new(0),
            state_tx,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.state_tx.subscribe()
    }

    pub fn current(&self) -> ViewState {
        self.state_tx.borrow().clone()
    }

    /// Run one query for `input`.
    ///
    /// An invalid address is returned as an error and leaves the current
    /// record untouched. Otherwise the record is cleared to a loading state,
    /// and the outcome is committed only if no newer query started since.
    pub async fn submit(&self, input: &str) -> Result<Commit, QueryError> {
        let address = validate_address(input)?;

        // Bump and publish under the channel's write lock so the loading
        // record on screen always carries the latest generation.
        let mut generation = 0;
        self.state_tx.send_modify(|state| {
            generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            *state = ViewState {
                generation,
                loading: true,
                outcome: QueryOutcome::Empty,
            };
        });

        let outcome = match self.aggregator.load_position(address).await {
            Ok(snapshot) => QueryOutcome::Ready(snapshot),
            Err(e) => {
                error!(error = %e, address, "[QUERY] failed to fetch position data");
                QueryOutcome::Failed(e.user_message().to_string())
            }
        };

        let applied = self.state_tx.send_if_modified(|state| {
            let latest = self.generation.load(Ordering::SeqCst);
            if latest != generation || state.generation != generation {
                return false;
            }
            *state = ViewState {
                generation,
                loading: false,
                outcome,
            };
            true
        });

        if applied {
            Ok(Commit::Applied)
        } else {
            debug!(generation, "[QUERY] superseded by a newer query; result dropped");
            Ok(Commit::Stale)
        }
    }
}

/// Wait for spawned query tasks; returns how many panicked or were cancelled.
pub async fn drain_queries(queries: Vec<JoinHandle<()>>) -> usize {
    let mut failed = 0;
    for joined in futures::future::join_all(queries).await {
        if let Err(e) = joined {
            error!(error = %e, "[QUERY] query task failed");
            failed += 1;
        }
    }
    failed
}
