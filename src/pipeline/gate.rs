//! Single-flight admission gate.
//!
//! Each pipeline stage owns one gate for the life of the process. A stage
//! admits at most one in-flight task; arrivals while busy are rejected, not
//! queued. The permit releases the gate on drop, so the gate returns to idle
//! on every exit path, including panic unwind of the stage task.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Clone)]
pub struct SingleFlightGate {
    name: &'static str,
    busy: Arc<AtomicBool>,
}

impl SingleFlightGate {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            busy: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Try to take the gate. `None` means another task is in flight and the
    /// caller must drop its work.
    pub fn try_admit(&self) -> Option<GatePermit> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_ok()
        {
            Some(GatePermit {
                busy: Arc::clone(&self.busy),
            })
        } else {
            None
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

/// Held for the duration of one admitted task.
pub struct GatePermit {
    busy: Arc<AtomicBool>,
}

impl Drop for GatePermit {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}
