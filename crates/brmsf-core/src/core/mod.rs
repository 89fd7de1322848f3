//! # Core Module
//!
//! Stateless building blocks of the bootstrap RMSF analysis.
//!
//! ## Architecture
//!
//! - **Data Models** ([`models`]) - Atom attributes, topologies, atom selections and result tables
//! - **Trajectory Access** ([`trajectory`]) - The [`trajectory::FrameSource`] abstraction over
//!   per-frame coordinates and an in-memory implementation
//! - **File I/O** ([`io`]) - Multi-model PDB trajectory reading and CSV result persistence
//! - **Numerics** ([`utils`]) - Percentiles, means and standard deviations
//!
//! Nothing in this module keeps state between calls; orchestration lives in
//! [`crate::engine`] and [`crate::workflows`].

pub mod io;
pub mod models;
pub mod trajectory;
pub mod utils;
