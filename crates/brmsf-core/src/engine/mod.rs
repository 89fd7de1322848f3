//! # Engine Module
//!
//! The computational layer of a bootstrap RMSF analysis: everything between a
//! frame source with an atom selection on one side and a per-residue result
//! table on the other.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Iteration count, frame sampling mode, interval
//!   strategy and seed, with a validating builder
//! - **Tasks** ([`tasks`]) - The streaming RMSF estimator and the bootstrap resampler
//!   built on top of it
//! - **Ensemble** ([`ensemble`]) - The `atoms x iterations` matrix of replicate RMSF values
//! - **Aggregation** ([`aggregate`]) - Pivot confidence intervals or mean/std per atom,
//!   grouped into residues
//! - **Progress Monitoring** ([`progress`]) - Phase and task events for front ends
//! - **Error Handling** ([`error`]) - Engine-specific error types with frame and
//!   iteration context
//!
//! ## Randomness
//!
//! No global generator is used. Every random draw derives from the configured seed:
//! the base frame sample from ChaCha stream 0, bootstrap iteration `i` from stream
//! `i + 1`. Results are therefore identical whether iterations run sequentially or
//! in parallel.

pub mod aggregate;
pub mod config;
pub mod ensemble;
pub mod error;
pub mod progress;
pub mod tasks;
pub mod utils;
