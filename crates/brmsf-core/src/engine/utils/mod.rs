//! Utility functions for the engine module.
//!
//! Currently this holds the random machinery of a run: drawing the base frame
//! sample and resampling it into bootstrap replicates.

pub mod sampling;
