//! Sequencing for loads that are re-issued on a timer.
//!
//! A surface that polls the façade can have several loads in flight at once. Each load takes a
//! [`RequestTicket`] before it starts; when the response lands, [`LatestResponseGate::accept`]
//! decides whether it is still newer than what the surface already shows.

use std::{cell::Cell, future::Future, rc::Rc};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Sequence number handed out when a polled load starts.
pub struct RequestTicket(u64);

impl RequestTicket {
    /// Raw sequence number.
    pub fn sequence(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Default)]
struct GateState {
    issued: Cell<u64>,
    accepted: Cell<u64>,
}

#[derive(Debug, Clone, Default)]
/// Drops responses that arrive after a newer one was already applied.
///
/// Clones share the same counters.
pub struct LatestResponseGate {
    state: Rc<GateState>,
}

impl LatestResponseGate {
    /// Issues the ticket for a load that is about to start.
    pub fn issue(&self) -> RequestTicket {
        let next = self.state.issued.get() + 1;
        self.state.issued.set(next);
        RequestTicket(next)
    }

    /// Returns `true` and records `ticket` when no newer response was accepted yet.
    pub fn accept(&self, ticket: RequestTicket) -> bool {
        if ticket.0 <= self.state.accepted.get() {
            return false;
        }
        self.state.accepted.set(ticket.0);
        true
    }

    /// Returns `true` when `ticket` is the most recently issued one.
    pub fn is_current(&self, ticket: RequestTicket) -> bool {
        ticket.0 == self.state.issued.get()
    }

    /// Runs `load` under a fresh ticket and yields its result only when it is not stale.
    pub async fn poll<T, F>(&self, load: F) -> Option<T>
    where
        F: Future<Output = T>,
    {
        let ticket = self.issue();
        let value = load.await;
        if self.accept(ticket) {
            Some(value)
        } else {
            log::debug!("dropping stale polled response #{}", ticket.sequence());
            None
        }
    }
}
