//! Priority-ordered concurrency gate

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::oneshot;
use tokio::time::Instant;

use super::PRIORITY_LOWEST;

/// Why a job never got a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AcquireError {
    /// The expiration elapsed while the job was queued.
    Expired,
}

/// Caps concurrent jobs and admits waiters by priority, FIFO within one
/// priority level.
///
/// A released slot is handed straight to the next waiter instead of being
/// returned to the pool, so a late arrival can never overtake the queue.
#[derive(Debug, Clone)]
pub(crate) struct PriorityGate {
    inner: Arc<Mutex<GateState>>,
}

#[derive(Debug)]
struct GateState {
    available: usize,
    next_seq: u64,
    queue: BinaryHeap<Waiter>,
}

#[derive(Debug)]
struct Waiter {
    priority: u8,
    seq: u64,
    tx: oneshot::Sender<Permit>,
}

impl PartialEq for Waiter {
    fn eq(&self, other: &Self) -> bool {
        self.priority == other.priority && self.seq == other.seq
    }
}

impl Eq for Waiter {}

impl PartialOrd for Waiter {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Waiter {
    // Max-heap: lower priority number first, then earlier arrival.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// One occupied slot; dropping it admits the next waiter.
#[derive(Debug)]
pub(crate) struct Permit {
    gate: Option<Arc<Mutex<GateState>>>,
}

impl Drop for Permit {
    fn drop(&mut self) {
        if let Some(gate) = self.gate.take() {
            release(&gate);
        }
    }
}

fn release(gate: &Arc<Mutex<GateState>>) {
    let mut state = gate.lock();
    while let Some(waiter) = state.queue.pop() {
        let permit = Permit {
            gate: Some(Arc::clone(gate)),
        };
        match waiter.tx.send(permit) {
            Ok(()) => return,
            // Waiter gave up; disarm so the slot is not released twice.
            Err(mut unsent) => unsent.gate = None,
        }
    }
    state.available += 1;
}

impl PriorityGate {
    pub(crate) fn new(concurrency: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(GateState {
                available: concurrency.max(1),
                next_seq: 0,
                queue: BinaryHeap::new(),
            })),
        }
    }

    /// Wait for a slot. With a `deadline`, give up once it passes.
    pub(crate) async fn acquire(
        &self,
        priority: u8,
        deadline: Option<Instant>,
    ) -> Result<Permit, AcquireError> {
        let mut rx = {
            let mut state = self.inner.lock();
            if state.available > 0 {
                state.available -= 1;
                return Ok(Permit {
                    gate: Some(Arc::clone(&self.inner)),
                });
            }
            let (tx, rx) = oneshot::channel();
            let seq = state.next_seq;
            state.next_seq += 1;
            state.queue.push(Waiter {
                priority: priority.min(PRIORITY_LOWEST),
                seq,
                tx,
            });
            rx
        };

        // The gate owns every sender it queues, so the channel can only be
        // closed by us.
        match deadline {
            None => rx.await.map_err(|_| AcquireError::Expired),
            Some(deadline) => match tokio::time::timeout_at(deadline, &mut rx).await {
                Ok(result) => result.map_err(|_| AcquireError::Expired),
                Err(_) => {
                    rx.close();
                    // A slot granted between the timeout firing and close()
                    // is still ours.
                    rx.try_recv().map_err(|_| AcquireError::Expired)
                }
            },
        }
    }

    #[cfg(test)]
    pub(crate) fn available(&self) -> usize {
        self.inner.lock().available
    }

    #[cfg(test)]
    pub(crate) fn queued(&self) -> usize {
        self.inner.lock().queue.len()
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use std::time::Duration;

    async fn settle() {
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn test_immediate_grant_under_capacity() {
        let gate = PriorityGate::new(2);
        let a = gate.acquire(5, None).await.expect("slot");
        let _b = gate.acquire(5, None).await.expect("slot");
        assert_eq!(gate.available(), 0);
        drop(a);
        assert_eq!(gate.available(), 1);
    }

    #[tokio::test]
    async fn test_waiters_admitted_by_priority_then_fifo() {
        let gate = PriorityGate::new(1);
        let held = gate.acquire(5, None).await.expect("slot");
        let order = Arc::new(Mutex::new(Vec::new()));

        let mut handles = Vec::new();
        for (label, priority) in [("low", 9), ("normal-1", 5), ("high", 0), ("normal-2", 5)] {
            let gate = gate.clone();
            let order = Arc::clone(&order);
            handles.push(tokio::spawn(async move {
                let permit = gate.acquire(priority, None).await.expect("slot");
                order.lock().push(label);
                drop(permit);
            }));
            // Fix arrival order
            settle().await;
        }
        assert_eq!(gate.queued(), 4);

        drop(held);
        for handle in handles {
            handle.await.expect("task");
        }
        assert_eq!(*order.lock(), vec!["high", "normal-1", "normal-2", "low"]);
        assert_eq!(gate.available(), 1);
    }

    #[tokio::test]
    async fn test_expired_waiter_is_abandoned() {
        let gate = PriorityGate::new(1);
        let held = gate.acquire(5, None).await.expect("slot");

        let result = gate
            .acquire(5, Some(Instant::now() + Duration::from_millis(20)))
            .await;
        assert_eq!(result.err(), Some(AcquireError::Expired));

        // The abandoned waiter must not swallow the slot.
        drop(held);
        assert_eq!(gate.available(), 1);
        assert_eq!(gate.queued(), 0);
    }

    #[tokio::test]
    async fn test_cancelled_waiter_does_not_leak_slot() {
        let gate = PriorityGate::new(1);
        let held = gate.acquire(5, None).await.expect("slot");

        let waiting = {
            let gate = gate.clone();
            tokio::spawn(async move { gate.acquire(5, None).await.map(drop) })
        };
        settle().await;
        waiting.abort();
        let _ = waiting.await;

        drop(held);
        assert_eq!(gate.available(), 1);
    }

    #[tokio::test]
    async fn test_priority_is_clamped() {
        let gate = PriorityGate::new(1);
        let held = gate.acquire(5, None).await.expect("slot");
        let waiting = {
            let gate = gate.clone();
            tokio::spawn(async move { gate.acquire(200, None).await.map(drop) })
        };
        settle().await;
        assert_eq!(gate.inner.lock().queue.peek().map(|w| w.priority), Some(9));
        drop(held);
        waiting.await.expect("task").expect("slot");
    }
}
