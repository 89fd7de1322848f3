//! Provides input/output functionality at the boundary of the analysis.
//!
//! Trajectories come in through the [`traits::TrajectoryFile`] interface
//! (multi-model PDB is provided by [`pdb`]); per-residue results go out as
//! comma-separated text through [`table`].

pub mod pdb;
pub mod table;
pub mod traits;
