//! Access to per-frame atomic coordinates.
//!
//! The analysis engine never parses trajectory files itself. It reads frames
//! through the [`FrameSource`] trait, which maps a frame index to the
//! coordinates of every atom in the trajectory at that frame. Reads go by
//! index, so any order (including repeated indices) can be honoured.
//!
//! [`InMemoryTrajectory`] is the provided implementation: a topology plus a
//! fully materialized list of position snapshots, safe to share between
//! worker threads.

pub mod memory;
pub mod source;

pub use memory::{InMemoryTrajectory, TrajectoryError};
pub use source::{FrameSource, FrameSourceError};
