//! # brmsf Core Library
//!
//! Bootstrap estimation of per-residue root-mean-square fluctuation (RMSF) from
//! molecular dynamics trajectories, with confidence intervals or mean/std summaries.
//!
//! ## Architectural Philosophy
//!
//! The library keeps the same three layers throughout:
//!
//! - **[`core`]: The Foundation.** Stateless data models (atoms, topologies, selections,
//!   result tables), the [`core::trajectory::FrameSource`] abstraction, PDB trajectory
//!   and CSV table I/O, and small statistics helpers.
//!
//! - **[`engine`]: The Logic Core.** The streaming Welford RMSF estimator, the seeded
//!   bootstrap resampler that fills the replicate ensemble (in parallel with the
//!   `parallel` feature), and the pivot-interval and mean/std aggregators.
//!
//! - **[`workflows`]: The Public API.** Ties `engine` and `core` together into a full
//!   analysis run with progress reporting, see [`workflows::bootstrap`].

pub mod core;
pub mod engine;
pub mod workflows;
