use super::atom::AtomInfo;

/// Ordered atom list shared by every frame of a trajectory.
///
/// Index `i` of the topology corresponds to index `i` of every position
/// snapshot produced by a [`FrameSource`](crate::core::trajectory::FrameSource)
/// over the same trajectory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Topology {
    atoms: Vec<AtomInfo>,
}

impl Topology {
    pub fn new(atoms: Vec<AtomInfo>) -> Self {
        Self { atoms }
    }

    pub fn atoms(&self) -> &[AtomInfo] {
        &self.atoms
    }

    pub fn atom(&self, index: usize) -> Option<&AtomInfo> {
        self.atoms.get(index)
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    /// Number of distinct `(resid, resname, segid)` keys.
    pub fn residue_count(&self) -> usize {
        let mut keys: Vec<_> = self.atoms.iter().map(AtomInfo::residue_key).collect();
        keys.sort();
        keys.dedup();
        keys.len()
    }
}

impl FromIterator<AtomInfo> for Topology {
    fn from_iter<T: IntoIterator<Item = AtomInfo>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_topology() -> Topology {
        vec![
            AtomInfo::new(1, "N", 1, "ALA", "A"),
            AtomInfo::new(2, "CA", 1, "ALA", "A"),
            AtomInfo::new(3, "N", 2, "GLY", "A"),
            AtomInfo::new(4, "N", 1, "ALA", "B"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn topology_reports_atom_count_and_lookup() {
        let topology = sample_topology();
        assert_eq!(topology.len(), 4);
        assert!(!topology.is_empty());
        assert_eq!(topology.atom(2).unwrap().resname, "GLY");
        assert!(topology.atom(4).is_none());
    }

    #[test]
    fn residue_count_distinguishes_segments() {
        assert_eq!(sample_topology().residue_count(), 3);
    }

    #[test]
    fn default_topology_is_empty() {
        let topology = Topology::default();
        assert!(topology.is_empty());
        assert_eq!(topology.residue_count(), 0);
    }
}
