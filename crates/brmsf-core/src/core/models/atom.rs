/// Static attributes of a single atom in a trajectory topology.
///
/// These values never change from frame to frame; only coordinates do. They
/// are read once (typically from the first model of a trajectory file) and
/// travel with the atom through selection, estimation and residue grouping.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AtomInfo {
    /// The serial number from the source file.
    pub serial: usize,
    /// The name of the atom (e.g., "CA", "N", "O").
    pub name: String,
    /// Residue sequence number from the source file.
    pub resid: isize,
    /// Residue name (e.g., "ALA", "GLY").
    pub resname: String,
    /// Segment identifier, falling back to the chain identifier when the
    /// source has no segment column.
    pub segid: String,
}

impl AtomInfo {
    /// Creates a new `AtomInfo`.
    ///
    /// # Arguments
    ///
    /// * `serial` - The serial number of the atom.
    /// * `name` - The atom name.
    /// * `resid` - The residue sequence number.
    /// * `resname` - The residue name.
    /// * `segid` - The segment (or chain) identifier.
    pub fn new(serial: usize, name: &str, resid: isize, resname: &str, segid: &str) -> Self {
        Self {
            serial,
            name: name.to_string(),
            resid,
            resname: resname.to_string(),
            segid: segid.to_string(),
        }
    }

    /// Returns the residue key `(resid, resname, segid)` this atom belongs to.
    pub fn residue_key(&self) -> ResidueKey {
        ResidueKey {
            resid: self.resid,
            resname: self.resname.clone(),
            segid: self.segid.clone(),
        }
    }
}

/// Identity of a residue used when grouping per-atom statistics.
///
/// The ordering is the output order of result tables: segment identifier
/// first (lexical), then residue number, then residue name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResidueKey {
    pub segid: String,
    pub resid: isize,
    pub resname: String,
}
