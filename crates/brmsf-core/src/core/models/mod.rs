//! # Core Models Module
//!
//! Data structures describing what is analysed and what comes out of an analysis.
//!
//! ## Key Components
//!
//! - [`atom`] - Static per-atom attributes and the residue key used for grouping
//! - [`topology`] - The ordered atom list shared by every trajectory frame
//! - [`selection`] - The ordered subset of atoms under analysis and the criteria that build it
//! - [`table`] - The per-residue result table produced by a bootstrap run
//!
//! ## Usage
//!
//! ```ignore
//! use brmsf::core::models::selection::{AtomSelection, SelectionCriteria};
//!
//! let criteria = SelectionCriteria::all().with_atom_names(["CA"]);
//! let selection = AtomSelection::from_criteria(trajectory.topology(), &criteria)?;
//! ```

pub mod atom;
pub mod selection;
pub mod table;
pub mod topology;
