use nalgebra::DMatrix;

/// RMSF of every selected atom, in selection order.
pub type PerAtomRmsf = Vec<f64>;

/// RMSF values of every bootstrap replicate.
///
/// Stored as an `n_atoms x n_iterations` matrix: column `i` is the per-atom
/// RMSF vector of iteration `i`, row `a` is the distribution of atom `a`.
#[derive(Debug, Clone, PartialEq)]
pub struct BootstrapEnsemble {
    matrix: DMatrix<f64>,
}

impl BootstrapEnsemble {
    pub(crate) fn zeros(n_atoms: usize, n_iterations: usize) -> Self {
        Self {
            matrix: DMatrix::zeros(n_atoms, n_iterations),
        }
    }

    /// Builds an ensemble from per-iteration RMSF vectors of equal length.
    ///
    /// Returns `None` when the vectors disagree in length.
    pub fn from_columns(columns: &[PerAtomRmsf]) -> Option<Self> {
        let n_atoms = columns.first().map_or(0, Vec::len);
        if columns.iter().any(|c| c.len() != n_atoms) {
            return None;
        }
        let data: Vec<f64> = columns.iter().flatten().copied().collect();
        Some(Self {
            matrix: DMatrix::from_vec(n_atoms, columns.len(), data),
        })
    }

    pub fn n_atoms(&self) -> usize {
        self.matrix.nrows()
    }

    pub fn n_iterations(&self) -> usize {
        self.matrix.ncols()
    }

    /// Per-atom RMSF of `iteration`.
    pub fn column(&self, iteration: usize) -> Option<&[f64]> {
        if iteration >= self.n_iterations() {
            return None;
        }
        let n = self.n_atoms();
        Some(&self.matrix.as_slice()[iteration * n..(iteration + 1) * n])
    }

    /// Replicate values of one atom across all iterations.
    pub fn atom_values(&self, atom: usize) -> Option<Vec<f64>> {
        if atom >= self.n_atoms() {
            return None;
        }
        Some(self.matrix.row(atom).iter().copied().collect())
    }

    pub fn matrix(&self) -> &DMatrix<f64> {
        &self.matrix
    }

    /// Contiguous column storage, one `n_atoms` chunk per iteration.
    pub(crate) fn storage_mut(&mut self) -> &mut [f64] {
        self.matrix.as_mut_slice()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_are_iterations_and_rows_are_atoms() {
        let ensemble =
            BootstrapEnsemble::from_columns(&[vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap();
        assert_eq!(ensemble.n_atoms(), 3);
        assert_eq!(ensemble.n_iterations(), 2);
        assert_eq!(ensemble.column(1), Some([4.0, 5.0, 6.0].as_slice()));
        assert_eq!(ensemble.atom_values(2), Some(vec![3.0, 6.0]));
        assert_eq!(ensemble.matrix()[(0, 1)], 4.0);
        assert_eq!(ensemble.column(2), None);
        assert_eq!(ensemble.atom_values(3), None);
    }

    #[test]
    fn ragged_columns_are_rejected() {
        assert!(BootstrapEnsemble::from_columns(&[vec![1.0], vec![1.0, 2.0]]).is_none());
    }

    #[test]
    fn storage_chunks_map_to_columns() {
        let mut ensemble = BootstrapEnsemble::zeros(2, 3);
        for (i, chunk) in ensemble.storage_mut().chunks_mut(2).enumerate() {
            chunk.fill(i as f64);
        }
        assert_eq!(ensemble.column(2), Some([2.0, 2.0].as_slice()));
    }
}
