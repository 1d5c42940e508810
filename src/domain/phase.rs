//! Process lifecycle: `Uninitialized → Registering → Dispatching`.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;

/// Lifecycle phase of the simulator process.
///
/// Phases are ordered; the process only ever moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Nothing has been sent to the contract yet.
    Uninitialized,
    /// Caller authorized; oracles are being registered.
    Registering,
    /// Registration finished; only dispatching remains. Terminal.
    Dispatching,
}

impl Phase {
    /// Returns the snake_case name of the phase.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::Registering => "registering",
            Self::Dispatching => "dispatching",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shared, monotonic holder of the current [`Phase`].
///
/// Backed by a `tokio::watch` channel so observers can await transitions.
#[derive(Debug, Clone)]
pub struct PhaseTracker {
    sender: Arc<watch::Sender<Phase>>,
}

impl PhaseTracker {
    /// Creates a tracker in [`Phase::Uninitialized`].
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = watch::channel(Phase::Uninitialized);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Returns the current phase.
    #[must_use]
    pub fn current(&self) -> Phase {
        *self.sender.borrow()
    }

    /// Moves to `next` if it is later than the current phase.
    ///
    /// Returns `true` if the phase changed. Backward or repeated transitions
    /// are ignored.
    pub fn advance(&self, next: Phase) -> bool {
        self.sender.send_if_modified(|current| {
            if next > *current {
                *current = next;
                true
            } else {
                false
            }
        })
    }

    /// Returns a receiver notified on every transition.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Phase> {
        self.sender.subscribe()
    }
}

impl Default for PhaseTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_uninitialized() {
        assert_eq!(PhaseTracker::new().current(), Phase::Uninitialized);
    }

    #[test]
    fn advances_forward_only() {
        let tracker = PhaseTracker::new();
        assert!(tracker.advance(Phase::Registering));
        assert!(tracker.advance(Phase::Dispatching));
        assert!(!tracker.advance(Phase::Registering));
        assert!(!tracker.advance(Phase::Dispatching));
        assert_eq!(tracker.current(), Phase::Dispatching);
    }

    #[test]
    fn registration_can_be_skipped() {
        let tracker = PhaseTracker::new();
        assert!(tracker.advance(Phase::Dispatching));
        assert!(!tracker.advance(Phase::Registering));
    }

    #[tokio::test]
    async fn subscribers_observe_transitions() {
        let tracker = PhaseTracker::new();
        let mut rx = tracker.subscribe();
        let clone = tracker.clone();

        clone.advance(Phase::Registering);
        assert!(rx.changed().await.is_ok());
        assert_eq!(*rx.borrow(), Phase::Registering);
    }
}
