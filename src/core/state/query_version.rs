use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

#[derive(Debug, Clone, Copy, Default)]
struct ViewSlot {
    latest: u64,
    in_flight: usize,
}

/// Issues monotonically increasing versions per dashboard view.
///
/// A result is current only if no newer query for the same view started
/// after it; older results are discarded by the caller regardless of the
/// order in which they finish. A view is tracked only while at least one
/// of its queries is in flight, so the map never outgrows the number of
/// running queries.
#[derive(Debug, Default)]
pub struct QueryVersionTracker {
    counter: AtomicU64,
    views: RwLock<HashMap<String, ViewSlot>>,
}

/// Token handed out when a query for a view starts. Dropping it marks the
/// query as finished.
#[derive(Debug)]
pub struct QueryTicket<'a> {
    tracker: &'a QueryVersionTracker,
    pub view_key: String,
    pub version: u64,
}

impl QueryVersionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self, view_key: &str) -> QueryTicket<'_> {
        let mut views = self.views.write().unwrap_or_else(|e| e.into_inner());
        // issued under the write lock so versions reach the map in order
        let version = self.counter.fetch_add(1, Ordering::SeqCst) + 1;

        let slot = views.entry(view_key.to_string()).or_default();
        slot.latest = version;
        slot.in_flight += 1;

        QueryTicket {
            tracker: self,
            view_key: view_key.to_string(),
            version,
        }
    }

    pub fn is_current(&self, ticket: &QueryTicket<'_>) -> bool {
        self.latest_version(&ticket.view_key) == Some(ticket.version)
    }

    /// Latest version issued for a view with queries still in flight.
    pub fn latest_version(&self, view_key: &str) -> Option<u64> {
        let views = self.views.read().unwrap_or_else(|e| e.into_inner());
        views.get(view_key).map(|slot| slot.latest)
    }

    pub fn tracked_views(&self) -> usize {
        self.views.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    fn release(&self, view_key: &str) {
        let mut views = self.views.write().unwrap_or_else(|e| e.into_inner());
        if let Some(slot) = views.get_mut(view_key) {
            slot.in_flight = slot.in_flight.saturating_sub(1);
            if slot.in_flight == 0 {
                views.remove(view_key);
            }
        }
    }
}

impl Drop for QueryTicket<'_> {
    fn drop(&mut self) {
        self.tracker.release(&self.view_key);
    }
}
