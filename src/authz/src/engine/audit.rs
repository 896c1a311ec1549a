//! Decision log sinks
//!
//! Every evaluation writes exactly one [`DecisionRecord`] through a
//! [`DecisionSink`]. Sinks are fire-and-forget: recording never blocks
//! the decision path, and a slow consumer degrades to dropped records
//! rather than added latency.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::decision::{DecisionReason, DecisionRecord};

/// Receives one record per evaluation
pub trait DecisionSink: Send + Sync {
    /// Record a decision. Must not block.
    fn record(&self, record: &DecisionRecord);
}

/// Default sink: structured tracing events
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DecisionSink for TracingSink {
    fn record(&self, record: &DecisionRecord) {
        match &record.reason {
            DecisionReason::RoleGrant { role } => {
                info!(
                    decision = %record.decision_id,
                    subject = %record.subject,
                    role = %role,
                    requirement = %record.requirement,
                    "Access GRANTED"
                );
            }
            reason => {
                warn!(
                    decision = %record.decision_id,
                    subject = %record.subject,
                    reason = reason.label(),
                    attempted = ?record.attempted_claims,
                    requirement = %record.requirement,
                    "Access DENIED"
                );
            }
        }
    }
}

/// Bounded in-memory sink for tests and diagnostics
#[derive(Debug)]
pub struct MemorySink {
    entries: Mutex<VecDeque<DecisionRecord>>,
    /// Maximum number of records retained (ring buffer behaviour)
    max_entries: usize,
}

impl MemorySink {
    /// Create a sink retaining at most `max_entries` records
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: Mutex::new(VecDeque::with_capacity(max_entries.min(4096))),
            max_entries,
        }
    }

    /// Snapshot of all retained records, oldest first
    pub fn records(&self) -> Vec<DecisionRecord> {
        let entries = self.entries.lock().expect("decision log lock");
        entries.iter().cloned().collect()
    }

    /// Number of retained records
    pub fn len(&self) -> usize {
        let entries = self.entries.lock().expect("decision log lock");
        entries.len()
    }

    /// Whether the sink holds no records
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop all retained records
    pub fn clear(&self) {
        let mut entries = self.entries.lock().expect("decision log lock");
        entries.clear();
    }
}

impl Default for MemorySink {
    fn default() -> Self {
        Self::new(10_000)
    }
}

impl DecisionSink for MemorySink {
    fn record(&self, record: &DecisionRecord) {
        if self.max_entries == 0 {
            return;
        }
        let mut entries = self.entries.lock().expect("decision log lock");
        if entries.len() >= self.max_entries {
            entries.pop_front();
        }
        entries.push_back(record.clone());
    }
}

/// Forwards records into a tokio channel without ever blocking
///
/// Built for the server: evaluation stays synchronous while a drain
/// task consumes the receiver. When the drain falls behind, the channel
/// fills and further records are counted as dropped instead of stalling
/// the decision path.
#[derive(Debug)]
pub struct ChannelSink {
    tx: mpsc::Sender<DecisionRecord>,
    dropped: AtomicU64,
}

impl ChannelSink {
    /// Create a sink and the receiver to drain it from
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<DecisionRecord>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (
            Self {
                tx,
                dropped: AtomicU64::new(0),
            },
            rx,
        )
    }

    /// Records lost to a full or closed channel
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl DecisionSink for ChannelSink {
    fn record(&self, record: &DecisionRecord) {
        if let Err(err) = self.tx.try_send(record.clone()) {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            debug!(decision = %record.decision_id, error = %err, "Decision record dropped");
        }
    }
}
