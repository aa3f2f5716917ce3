//! Rendezvous gates.
//!
//! A [`RendezvousGate`] lets N independent async callers wait on a shared
//! point: each caller arrives and receives a [`WaitHandle`], and the Nth
//! arrival releases all of them together. No caller polls or spins.
//!
//! ## Example
//!
//! ```
//! use word_match::gate::RendezvousGate;
//!
//! # tokio_test::block_on(async {
//! let mut gate: RendezvousGate<&str> = RendezvousGate::new(2);
//!
//! let first = gate.arrive(|| "go").unwrap();
//! let second = gate.arrive(|| "go").unwrap();
//!
//! assert_eq!(first.await, Ok("go"));
//! assert_eq!(second.await, Ok("go"));
//!
//! // Released gates must be reset before the next cycle.
//! assert!(gate.arrive(|| "again").is_err());
//! gate.reset().unwrap();
//! # });
//! ```

mod rendezvous;

pub use rendezvous::{GateError, RendezvousGate, Ticket, WaitHandle};
