use nalgebra::Point3;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FrameSourceError {
    #[error("Frame index {frame} is out of range for a trajectory of {n_frames} frames")]
    OutOfRange { frame: usize, n_frames: usize },
    #[error("Corrupt frame data: {0}")]
    Corrupt(String),
}

/// Indexable provider of position snapshots.
///
/// Implementors map a frame index to the coordinates of all atoms of the
/// trajectory at that frame, in topology order. Reads take `&self` so that
/// independent bootstrap iterations can read concurrently.
pub trait FrameSource: Sync {
    /// Total number of frames available.
    fn n_frames(&self) -> usize;

    /// Number of atoms in every snapshot.
    fn n_atoms(&self) -> usize;

    /// Reads the snapshot of `frame` into `positions`.
    ///
    /// `positions` is cleared and refilled, so a caller can reuse one buffer
    /// across many reads.
    ///
    /// # Errors
    ///
    /// Returns [`FrameSourceError::OutOfRange`] for an index `>= n_frames()` and
    /// [`FrameSourceError::Corrupt`] for storage that cannot be decoded.
    fn read_frame(
        &self,
        frame: usize,
        positions: &mut Vec<Point3<f64>>,
    ) -> Result<(), FrameSourceError>;

    /// Borrows the snapshot of `frame` when the source already holds it in
    /// memory. Readers prefer this over [`read_frame`](Self::read_frame) and
    /// fall back to it on `None`.
    fn borrow_frame(&self, _frame: usize) -> Option<&[Point3<f64>]> {
        None
    }

    fn is_empty(&self) -> bool {
        self.n_frames() == 0
    }
}
