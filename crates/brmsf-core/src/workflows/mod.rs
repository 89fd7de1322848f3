//! # Workflows Module
//!
//! High-level entry points that run a complete analysis.
//!
//! - **Bootstrap RMSF** ([`bootstrap`]) - Draws the base frame sample, computes the
//!   baseline RMSF, resamples it into a bootstrap ensemble and reduces the ensemble to a
//!   per-residue table. [`bootstrap::BootstrapRmsf`] keeps the last table for saving.

pub mod bootstrap;
