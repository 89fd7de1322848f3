use super::source::{FrameSource, FrameSourceError};
use crate::core::models::topology::Topology;
use nalgebra::Point3;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TrajectoryError {
    #[error("Frame {frame} has {found} atoms, but the topology defines {expected}")]
    AtomCountMismatch {
        frame: usize,
        expected: usize,
        found: usize,
    },
}

/// A trajectory whose every frame is held in memory.
#[derive(Debug, Clone, PartialEq)]
pub struct InMemoryTrajectory {
    topology: Topology,
    frames: Vec<Vec<Point3<f64>>>,
}

impl InMemoryTrajectory {
    /// Builds a trajectory, checking that every frame matches the topology size.
    pub fn new(
        topology: Topology,
        frames: Vec<Vec<Point3<f64>>>,
    ) -> Result<Self, TrajectoryError> {
        if let Some((frame, snapshot)) = frames
            .iter()
            .enumerate()
            .find(|(_, snapshot)| snapshot.len() != topology.len())
        {
            return Err(TrajectoryError::AtomCountMismatch {
                frame,
                expected: topology.len(),
                found: snapshot.len(),
            });
        }
        Ok(Self { topology, frames })
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn frame(&self, index: usize) -> Option<&[Point3<f64>]> {
        self.frames.get(index).map(Vec::as_slice)
    }

    pub fn frames(&self) -> &[Vec<Point3<f64>>] {
        &self.frames
    }
}

impl FrameSource for InMemoryTrajectory {
    fn n_frames(&self) -> usize {
        self.frames.len()
    }

    fn n_atoms(&self) -> usize {
        self.topology.len()
    }

    fn read_frame(
        &self,
        frame: usize,
        positions: &mut Vec<Point3<f64>>,
    ) -> Result<(), FrameSourceError> {
        let snapshot = self.frame(frame).ok_or(FrameSourceError::OutOfRange {
            frame,
            n_frames: self.frames.len(),
        })?;
        positions.clear();
        positions.extend_from_slice(snapshot);
        Ok(())
    }

    fn borrow_frame(&self, frame: usize) -> Option<&[Point3<f64>]> {
        self.frame(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::AtomInfo;

    fn two_atom_topology() -> Topology {
        vec![
            AtomInfo::new(1, "CA", 1, "ALA", "A"),
            AtomInfo::new(2, "CA", 2, "GLY", "A"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn read_frame_fills_and_reuses_buffer() {
        let trajectory = InMemoryTrajectory::new(
            two_atom_topology(),
            vec![
                vec![Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0)],
                vec![Point3::new(2.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0)],
            ],
        )
        .unwrap();

        let mut buffer = vec![Point3::new(9.0, 9.0, 9.0); 5];
        trajectory.read_frame(1, &mut buffer).unwrap();
        assert_eq!(buffer.len(), 2);
        assert_eq!(buffer[0], Point3::new(2.0, 0.0, 0.0));
        assert_eq!(trajectory.n_frames(), 2);
        assert_eq!(trajectory.n_atoms(), 2);
    }

    #[test]
    fn read_frame_out_of_range_is_reported() {
        let trajectory = InMemoryTrajectory::new(
            two_atom_topology(),
            vec![vec![Point3::origin(), Point3::origin()]],
        )
        .unwrap();
        let mut buffer = Vec::new();
        let err = trajectory.read_frame(3, &mut buffer).unwrap_err();
        assert!(matches!(
            err,
            FrameSourceError::OutOfRange {
                frame: 3,
                n_frames: 1
            }
        ));
    }

    #[test]
    fn borrow_frame_exposes_stored_snapshot() {
        let trajectory = InMemoryTrajectory::new(
            two_atom_topology(),
            vec![vec![Point3::new(4.0, 5.0, 6.0), Point3::origin()]],
        )
        .unwrap();
        let borrowed = trajectory.borrow_frame(0).unwrap();
        assert!(std::ptr::eq(borrowed, trajectory.frames()[0].as_slice()));
        assert!(trajectory.borrow_frame(1).is_none());
    }

    #[test]
    fn mismatched_frame_size_is_rejected() {
        let err = InMemoryTrajectory::new(
            two_atom_topology(),
            vec![
                vec![Point3::origin(), Point3::origin()],
                vec![Point3::origin()],
            ],
        )
        .unwrap_err();
        assert_eq!(
            err,
            TrajectoryError::AtomCountMismatch {
                frame: 1,
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn empty_trajectory_reports_empty() {
        let trajectory = InMemoryTrajectory::new(two_atom_topology(), Vec::new()).unwrap();
        assert!(trajectory.is_empty());
    }
}
