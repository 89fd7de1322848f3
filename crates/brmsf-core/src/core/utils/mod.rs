//! Numerical helpers shared by the estimator and the aggregator.

pub mod statistics;
