//! Discrete-event simulator for classical CPU scheduling algorithms.
//!
//! `core` holds the engine ([`SchedCore`]) and its state, `scheduler` the
//! six policies, and `sim` the input records, run-time algorithm choice
//! and the [`Report`] handed to presentation code.

pub mod core;
pub mod error;
pub mod scheduler;
pub mod sim;

pub use crate::core::{Interval, Process, SchedCore, SimCtx, Ticks, Timeline};
pub use error::SpecError;
pub use scheduler::Scheduler;
pub use sim::{Algorithm, ProcessSpec, Report, simulate};
