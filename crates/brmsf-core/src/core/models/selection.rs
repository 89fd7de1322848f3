use super::atom::AtomInfo;
use super::topology::Topology;
use std::ops::RangeInclusive;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("Selection criteria matched no atoms in a topology of {topology_size} atoms")]
    NoAtomsMatched { topology_size: usize },
    #[error("Atom index {index} is out of range for a topology of {topology_size} atoms")]
    IndexOutOfRange { index: usize, topology_size: usize },
}

/// An atom chosen for analysis: its position in the frame coordinate array
/// plus its static attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedAtom {
    pub index: usize,
    pub info: AtomInfo,
}

/// Filters used to build an [`AtomSelection`] from a [`Topology`].
///
/// Every non-empty filter must match; an all-empty criteria selects every atom.
/// Atom names, residue names and segment identifiers are compared exactly.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionCriteria {
    pub atom_names: Vec<String>,
    pub resnames: Vec<String>,
    pub segids: Vec<String>,
    pub residue_range: Option<RangeInclusive<isize>>,
}

impl SelectionCriteria {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_atom_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.atom_names = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_resnames<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.resnames = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_segids<I, S>(mut self, segids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.segids = segids.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_residue_range(mut self, range: RangeInclusive<isize>) -> Self {
        self.residue_range = Some(range);
        self
    }

    pub fn matches(&self, atom: &AtomInfo) -> bool {
        (self.atom_names.is_empty() || self.atom_names.iter().any(|n| *n == atom.name))
            && (self.resnames.is_empty() || self.resnames.iter().any(|n| *n == atom.resname))
            && (self.segids.is_empty() || self.segids.iter().any(|s| *s == atom.segid))
            && self
                .residue_range
                .as_ref()
                .is_none_or(|range| range.contains(&atom.resid))
    }
}

/// Ordered, fixed-size list of atoms under analysis.
///
/// The order is the row order of every per-atom array computed during a run
/// (RMSF vectors, ensemble rows, per-atom statistics).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AtomSelection {
    atoms: Vec<SelectedAtom>,
}

impl AtomSelection {
    pub fn new(atoms: Vec<SelectedAtom>) -> Self {
        Self { atoms }
    }

    /// Selects the atoms at `indices` (in the given order) from `topology`.
    pub fn from_indices(topology: &Topology, indices: &[usize]) -> Result<Self, SelectionError> {
        let atoms = indices
            .iter()
            .map(|&index| {
                topology
                    .atom(index)
                    .map(|info| SelectedAtom {
                        index,
                        info: info.clone(),
                    })
                    .ok_or(SelectionError::IndexOutOfRange {
                        index,
                        topology_size: topology.len(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { atoms })
    }

    /// Selects, in topology order, every atom matching `criteria`.
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError::NoAtomsMatched`] when nothing matches.
    pub fn from_criteria(
        topology: &Topology,
        criteria: &SelectionCriteria,
    ) -> Result<Self, SelectionError> {
        let atoms: Vec<_> = topology
            .atoms()
            .iter()
            .enumerate()
            .filter(|(_, info)| criteria.matches(info))
            .map(|(index, info)| SelectedAtom {
                index,
                info: info.clone(),
            })
            .collect();
        if atoms.is_empty() {
            return Err(SelectionError::NoAtomsMatched {
                topology_size: topology.len(),
            });
        }
        Ok(Self { atoms })
    }

    pub fn atoms(&self) -> &[SelectedAtom] {
        &self.atoms
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.atoms.iter().map(|a| a.index)
    }

    /// Largest frame index referenced by the selection.
    pub fn max_index(&self) -> Option<usize> {
        self.indices().max()
    }
}
