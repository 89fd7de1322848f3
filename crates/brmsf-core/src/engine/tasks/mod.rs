//! Computational units of a bootstrap RMSF run.
//!
//! [`rmsf`] is the streaming estimator over one frame sequence; [`bootstrap`]
//! repeats it over resampled sequences to build the replicate ensemble.

pub mod bootstrap;
pub mod rmsf;
