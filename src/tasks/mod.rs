//! Background Tasks Module
//!
//! Periodic sweeps that run during server operation.
//!
//! # Tasks
//! - Cache sweep: removes expired cache entries
//! - Rate limit sweep: removes client records whose window has ended

mod sweep;

pub use sweep::{spawn_sweep_task, Sweep, SweepHandle};
