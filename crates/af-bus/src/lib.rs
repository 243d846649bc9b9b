//! Host variable bus abstraction.
//!
//! The host simulation exposes a flat namespace of named scalar variables;
//! the model reads a snapshot of them at the top of every tick and writes its
//! outputs back at the bottom. Contract (per the host's semantics):
//!
//! - gets return the host's last-published value, with no staleness
//!   guarantee beyond one frame
//! - sets are fire-and-forget and last-write-wins, visible to the host on
//!   its next physics step
//!
//! The production adapter wraps the host SDK; [`InMemoryBus`] provides the
//! same contract for tests and offline scenario runs.

pub mod bus;
pub mod vars;

pub use bus::{InMemoryBus, VariableBus};
pub use vars::SimVar;
