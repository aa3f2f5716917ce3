//! One-shot N-party barrier.
//!
//! Callers arrive one at a time and each gets a [`WaitHandle`]. The arrival
//! that reaches the target computes the release value and resolves every
//! handle issued in this cycle before `arrive` returns. The gate is then
//! closed to further arrivals until [`RendezvousGate::reset`] re-arms it.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::sync::oneshot;
use tracing::error;

/// Errors from gate misuse.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GateError {
    /// `arrive` or `force_release` on a gate that already released this cycle.
    #[error("rendezvous gate already released; reset it before reuse")]
    Reused,

    /// `reset` on a gate that has not released yet.
    #[error("rendezvous gate reset before it released")]
    NotReleased,

    /// The handle was withdrawn, or the gate was dropped before releasing.
    #[error("rendezvous gate closed before release")]
    Closed,
}

/// Identifies one arrival within a gate cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Ticket(u64);

impl Ticket {
    /// Get the raw ticket number.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Future side of one arrival.
///
/// Resolves to the release value, or to [`GateError::Closed`] if the
/// arrival was withdrawn or the gate dropped without releasing.
#[derive(Debug)]
#[must_use = "a wait handle does nothing unless awaited"]
pub struct WaitHandle<T> {
    ticket: Ticket,
    rx: oneshot::Receiver<T>,
}

impl<T> WaitHandle<T> {
    /// A handle that is already resolved with `value`.
    pub fn ready(value: T) -> Self {
        let (tx, rx) = oneshot::channel();
        // The receiver is alive, send cannot fail.
        let _ = tx.send(value);
        Self {
            ticket: Ticket(u64::MAX),
            rx,
        }
    }

    /// The ticket this handle was issued under.
    #[must_use]
    pub fn ticket(&self) -> Ticket {
        self.ticket
    }
}

impl<T> Future for WaitHandle<T> {
    type Output = Result<T, GateError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx)
            .poll(cx)
            .map(|res| res.map_err(|_| GateError::Closed))
    }
}

/// Single-use asynchronous barrier for `target` arrivals.
///
/// The gate takes `&mut self` everywhere and holds no lock of its own: the
/// owner must serialise calls so that no two arrivals run their
/// count-check-and-maybe-release concurrently. [`Match`](crate::Match) does
/// this with one mutex per match.
#[derive(Debug)]
pub struct RendezvousGate<T> {
    /// Arrivals needed to release.
    target: usize,

    /// Pending handles for this cycle, in arrival order.
    waiters: Vec<(Ticket, oneshot::Sender<T>)>,

    /// Arrivals counted this cycle (withdrawn ones excluded).
    arrived: usize,

    /// Set once the gate releases; cleared by `reset`.
    released: bool,

    /// Next ticket number. Never reused across cycles.
    next_ticket: u64,
}

impl<T: Clone> RendezvousGate<T> {
    /// Create an armed gate that releases on the `target`th arrival.
    pub fn new(target: usize) -> Self {
        assert!(target > 0, "Gate target must be at least 1");
        Self {
            target,
            waiters: Vec::with_capacity(target),
            arrived: 0,
            released: false,
            next_ticket: 0,
        }
    }

    /// Number of arrivals needed to release.
    #[must_use]
    pub fn target(&self) -> usize {
        self.target
    }

    /// Arrivals counted so far this cycle.
    #[must_use]
    pub fn arrived(&self) -> usize {
        self.arrived
    }

    /// Arrivals still missing before release.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.target.saturating_sub(self.arrived)
    }

    /// Has the gate released this cycle?
    #[must_use]
    pub fn is_released(&self) -> bool {
        self.released
    }

    /// Register one arrival.
    ///
    /// If this arrival reaches the target, `on_release` runs exactly once,
    /// inside this call, and its value is delivered to every handle issued
    /// this cycle (including the one returned here).
    ///
    /// Fails with [`GateError::Reused`] if the gate already released and has
    /// not been reset.
    pub fn arrive<F>(&mut self, on_release: F) -> Result<WaitHandle<T>, GateError>
    where
        F: FnOnce() -> T,
    {
        if self.released {
            error!(gate_target = self.target, "arrival on a released gate");
            return Err(GateError::Reused);
        }

        let ticket = Ticket(self.next_ticket);
        self.next_ticket += 1;

        let (tx, rx) = oneshot::channel();
        self.waiters.push((ticket, tx));
        self.arrived += 1;

        if self.arrived >= self.target {
            let value = on_release();
            self.release_with(value);
        }

        Ok(WaitHandle { ticket, rx })
    }

    /// Take back an arrival that has not been released yet.
    ///
    /// The withdrawn handle resolves to [`GateError::Closed`]. Returns
    /// `false` if the ticket is unknown or the gate already released.
    pub fn withdraw(&mut self, ticket: Ticket) -> bool {
        if self.released {
            return false;
        }
        match self.waiters.iter().position(|(t, _)| *t == ticket) {
            Some(index) => {
                // Dropping the sender closes the handle.
                self.waiters.remove(index);
                self.arrived -= 1;
                true
            }
            None => false,
        }
    }

    /// Release every pending handle with `value` without waiting for the
    /// remaining arrivals.
    ///
    /// Returns the number of handles resolved.
    pub fn force_release(&mut self, value: T) -> Result<usize, GateError> {
        if self.released {
            return Err(GateError::Reused);
        }
        let count = self.waiters.len();
        self.release_with(value);
        Ok(count)
    }

    /// Re-arm a released gate for the next cycle.
    pub fn reset(&mut self) -> Result<(), GateError> {
        if !self.released {
            return Err(GateError::NotReleased);
        }
        self.waiters.clear();
        self.arrived = 0;
        self.released = false;
        Ok(())
    }

    fn release_with(&mut self, value: T) {
        for (_, tx) in self.waiters.drain(..) {
            // A dropped handle just means the caller stopped waiting.
            let _ = tx.send(value.clone());
        }
        self.released = true;
    }
}
