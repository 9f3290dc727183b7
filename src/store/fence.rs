//! Per-resource request sequencing.
//!
//! Overlapping polls can resolve out of order. A [`Ticket`] taken before the
//! request is checked again when the response lands; if a newer request for
//! the same resource was issued in between, the response is dropped.

use std::sync::atomic::{AtomicU64, Ordering};

const RESOURCE_COUNT: usize = 9;

/// Things the store fetches independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Monitors,
    Quotes,
    Catalog,
    ManualSignal,
    Brokers,
    News,
    UpcomingAlerts,
    MentorIndicators,
    Branding,
}

impl Resource {
    fn index(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Monitors => "monitors",
            Self::Quotes => "quotes",
            Self::Catalog => "symbols",
            Self::ManualSignal => "signal",
            Self::Brokers => "brokers",
            Self::News => "news",
            Self::UpcomingAlerts => "alerts",
            Self::MentorIndicators => "indicators",
            Self::Branding => "branding",
        };
        f.write_str(name)
    }
}

/// Proof that a request was issued at a given point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    pub resource: Resource,
    seq: u64,
    epoch: u64,
}

#[derive(Debug)]
pub struct RequestFence {
    /// When false only resets invalidate tickets ("last response wins").
    ordered: bool,
    latest: [AtomicU64; RESOURCE_COUNT],
    epoch: AtomicU64,
}

impl RequestFence {
    pub fn new(ordered: bool) -> Self {
        Self {
            ordered,
            latest: Default::default(),
            epoch: AtomicU64::new(0),
        }
    }

    pub fn begin(&self, resource: Resource) -> Ticket {
        let seq = self.latest[resource.index()].fetch_add(1, Ordering::SeqCst) + 1;
        Ticket {
            resource,
            seq,
            epoch: self.epoch.load(Ordering::SeqCst),
        }
    }

    /// Whether a response for `ticket` may still be applied.
    pub fn is_current(&self, ticket: &Ticket) -> bool {
        if ticket.epoch != self.epoch.load(Ordering::SeqCst) {
            return false;
        }
        !self.ordered || ticket.seq == self.latest[ticket.resource.index()].load(Ordering::SeqCst)
    }

    /// Supersede every in-flight request for one resource.
    pub fn invalidate(&self, resource: Resource) {
        if self.ordered {
            self.latest[resource.index()].fetch_add(1, Ordering::SeqCst);
        }
    }

    /// Supersede everything in flight, regardless of ordering mode.
    pub fn invalidate_all(&self) {
        self.epoch.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_older_ticket_is_stale_when_ordered() {
        let fence = RequestFence::new(true);
        let first = fence.begin(Resource::Monitors);
        let second = fence.begin(Resource::Monitors);
        assert!(!fence.is_current(&first));
        assert!(fence.is_current(&second));
    }

    #[test]
    fn test_resources_are_independent() {
        let fence = RequestFence::new(true);
        let monitors = fence.begin(Resource::Monitors);
        let _quotes = fence.begin(Resource::Quotes);
        assert!(fence.is_current(&monitors));
    }

    #[test]
    fn test_unordered_lets_last_response_win() {
        let fence = RequestFence::new(false);
        let first = fence.begin(Resource::Quotes);
        let _second = fence.begin(Resource::Quotes);
        assert!(fence.is_current(&first));
        fence.invalidate(Resource::Quotes);
        assert!(fence.is_current(&first));
    }

    #[test]
    fn test_invalidate_all_always_applies() {
        for ordered in [true, false] {
            let fence = RequestFence::new(ordered);
            let ticket = fence.begin(Resource::News);
            fence.invalidate_all();
            assert!(!fence.is_current(&ticket));
            assert!(fence.is_current(&fence.begin(Resource::News)));
        }
    }
}
