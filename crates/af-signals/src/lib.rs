//! Discrete-time signal primitives shared by all control laws.
//!
//! Every law in the guidance and engine crates is composed from these
//! blocks: low-pass/high-pass/lead-lag filters, rate limiters, breakpoint
//! table lookups, selection/voting logic and time-condition nodes.
//!
//! # Design Principles
//!
//! - **Owned state**: each primitive is a small value type owning its
//!   persistent state; `step(...)` advances it in place. Instances are never
//!   shared between laws.
//! - **Hold-current-value initialization**: filters latch their first input
//!   as steady state, so a law engages without a transient.
//! - **Variable timestep**: every step takes the tick's `dt`; there is no
//!   fixed sample period baked into a block.

pub mod error;
pub mod filter;
pub mod logic;
pub mod lookup;
pub mod rate_limiter;
pub mod select;
pub mod timer;

pub use error::{SignalError, SignalResult};
pub use filter::{LagFilter, LeadLagFilter, WashoutFilter};
pub use logic::{ConfirmNode, HysteresisNode, LatchedValue, PulseNode};
pub use lookup::{Lookup1d, Lookup2d};
pub use rate_limiter::{BoolRateLimiter, RateLimiter};
pub use select::{median_of_three, PathSelector};
pub use timer::{DwellTimer, TimeSinceCondition};
