//! Deterministic Simulation Support
//!
//! `TigerStyle`: Simulation-first. Every adapter has a deterministic
//! implementation backed by the seeded RNG and fault injector in this
//! module, so the whole capture workflow is testable without network access
//! and every adapter failure mode is reproducible from a seed.

mod fault;
mod rng;

pub use fault::{FaultConfig, FaultInjector, FaultType};
pub use rng::DeterministicRng;
