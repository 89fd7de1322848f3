use crate::core::models::selection::AtomSelection;
use crate::core::trajectory::{FrameSource, FrameSourceError};
use crate::engine::ensemble::PerAtomRmsf;
use crate::engine::error::EngineError;
use nalgebra::{Point3, Vector3};
use tracing::{instrument, trace};

/// One-pass mean and squared-deviation accumulator over atom positions.
///
/// Each pushed snapshot updates, per atom and axis,
/// `sumsq += k / (k + 1) * (x - mean)^2` then `mean = (k * mean + x) / (k + 1)`,
/// where `k` is the number of snapshots seen before it.
#[derive(Debug, Clone)]
pub struct RmsfAccumulator {
    count: usize,
    mean: Vec<Vector3<f64>>,
    sum_sq: Vec<Vector3<f64>>,
}

impl RmsfAccumulator {
    pub fn new(n_atoms: usize) -> Self {
        Self {
            count: 0,
            mean: vec![Vector3::zeros(); n_atoms],
            sum_sq: vec![Vector3::zeros(); n_atoms],
        }
    }

    pub fn n_atoms(&self) -> usize {
        self.mean.len()
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Adds one snapshot of the tracked atoms, in accumulator order.
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidInput`] when `positions` does not hold exactly
    /// [`n_atoms`](Self::n_atoms) entries; the accumulator is left unchanged.
    pub fn push(&mut self, positions: &[Point3<f64>]) -> Result<(), EngineError> {
        if positions.len() != self.n_atoms() {
            return Err(EngineError::invalid_input(format!(
                "snapshot holds {} positions, the accumulator tracks {} atoms",
                positions.len(),
                self.n_atoms()
            )));
        }
        let k = self.count as f64;
        let weight = k / (k + 1.0);
        for ((mean, sum_sq), position) in self
            .mean
            .iter_mut()
            .zip(self.sum_sq.iter_mut())
            .zip(positions)
        {
            let delta = position.coords - *mean;
            *sum_sq += delta.component_mul(&delta) * weight;
            *mean = (*mean * k + position.coords) / (k + 1.0);
        }
        self.count += 1;
        Ok(())
    }

    /// Per-atom RMSF over the snapshots seen so far, `None` before the first push.
    pub fn rmsf(&self) -> Option<PerAtomRmsf> {
        if self.count == 0 {
            return None;
        }
        let n = self.count as f64;
        Some(self.sum_sq.iter().map(|s| (s.sum() / n).sqrt()).collect())
    }
}

/// Computes the RMSF of every selected atom over `frames`, visited in order.
#[instrument(skip_all, name = "rmsf_task", fields(n_frames = frames.len()))]
pub fn run(
    selection: &AtomSelection,
    source: &dyn FrameSource,
    frames: &[usize],
) -> Result<PerAtomRmsf, EngineError> {
    check_selection(selection, source)?;
    estimate(selection, source, frames, None)
}

/// Rejects selections that are empty or reference atoms beyond the source.
pub(crate) fn check_selection(
    selection: &AtomSelection,
    source: &dyn FrameSource,
) -> Result<(), EngineError> {
    if selection.is_empty() {
        return Err(EngineError::invalid_input("the atom selection is empty"));
    }
    if let Some(max) = selection.max_index() {
        if max >= source.n_atoms() {
            return Err(EngineError::invalid_input(format!(
                "atom index {} is out of range for a trajectory of {} atoms",
                max,
                source.n_atoms()
            )));
        }
    }
    Ok(())
}

/// Streaming estimate over an already validated selection.
///
/// `iteration` only enriches error context.
pub(crate) fn estimate(
    selection: &AtomSelection,
    source: &dyn FrameSource,
    frames: &[usize],
    iteration: Option<usize>,
) -> Result<PerAtomRmsf, EngineError> {
    if frames.is_empty() {
        return Err(EngineError::invalid_input(
            "the frame index sequence is empty",
        ));
    }

    let mut accumulator = RmsfAccumulator::new(selection.len());
    let mut buffer = Vec::new();
    let mut selected = Vec::with_capacity(selection.len());
    let required = selection.max_index().map_or(0, |m| m + 1);

    for &frame in frames {
        let snapshot = match source.borrow_frame(frame) {
            Some(snapshot) => snapshot,
            None => {
                source
                    .read_frame(frame, &mut buffer)
                    .map_err(|source| EngineError::FrameSource {
                        frame,
                        iteration,
                        source,
                    })?;
                buffer.as_slice()
            }
        };
        if snapshot.len() < required {
            return Err(EngineError::FrameSource {
                frame,
                iteration,
                source: FrameSourceError::Corrupt(format!(
                    "snapshot holds {} positions, selection needs {}",
                    snapshot.len(),
                    required
                )),
            });
        }
        selected.clear();
        selected.extend(selection.indices().map(|i| snapshot[i]));
        accumulator.push(&selected)?;
    }
    trace!(frames = accumulator.count(), "Frame sequence consumed.");

    accumulator
        .rmsf()
        .ok_or_else(|| EngineError::Internal("no frame reached the accumulator".to_string()))
}
