use crate::engine::config::FrameSampling;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use thiserror::Error;
use tracing::{instrument, warn};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SamplingError {
    #[error("The trajectory has no frames, cannot draw a frame sample")]
    EmptyTrajectory,
    #[error("Sample size must be at least 1")]
    ZeroSampleSize,
    #[error(
        "Cannot draw {size} distinct frames from a trajectory of {n_frames} frames without replacement"
    )]
    SampleLargerThanTrajectory { size: usize, n_frames: usize },
}

/// Produces the frame list of one bootstrap replicate.
///
/// `draw` must be a pure function of `(base, iteration)` so that a run is
/// reproducible regardless of how iterations are scheduled across threads.
pub trait ReplicateSampler: Sync {
    fn draw(&self, base: &[usize], iteration: usize) -> Vec<usize>;
}

/// Resamples the base sample uniformly with replacement.
///
/// Every iteration owns an independent ChaCha stream derived from the seed;
/// stream 0 is reserved for the base frame sample.
#[derive(Debug, Clone, Copy)]
pub struct RandomReplicateSampler {
    seed: u64,
}

impl RandomReplicateSampler {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl ReplicateSampler for RandomReplicateSampler {
    fn draw(&self, base: &[usize], iteration: usize) -> Vec<usize> {
        if base.is_empty() {
            return Vec::new();
        }
        let mut rng = stream_rng(self.seed, iteration as u64 + 1);
        (0..base.len())
            .map(|_| base[rng.gen_range(0..base.len())])
            .collect()
    }
}

/// Replays pre-computed frame lists, cycling when there are fewer lists than
/// iterations. The base sample is ignored.
#[derive(Debug, Clone, Default)]
pub struct FixedReplicateSampler {
    replicates: Vec<Vec<usize>>,
}

impl FixedReplicateSampler {
    pub fn new(replicates: Vec<Vec<usize>>) -> Self {
        Self { replicates }
    }
}

impl ReplicateSampler for FixedReplicateSampler {
    fn draw(&self, _base: &[usize], iteration: usize) -> Vec<usize> {
        if self.replicates.is_empty() {
            return Vec::new();
        }
        self.replicates[iteration % self.replicates.len()].clone()
    }
}

/// Seeded generator on the given ChaCha stream.
pub fn stream_rng(seed: u64, stream: u64) -> ChaCha8Rng {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    rng.set_stream(stream);
    rng
}

/// Draws the base frame sample that every bootstrap replicate resamples from.
///
/// # Errors
///
/// Fails on an empty trajectory, a zero sample size, or a without-replacement
/// request larger than the trajectory.
#[instrument(level = "debug", skip(rng))]
pub fn draw_base_frames(
    n_frames: usize,
    sampling: FrameSampling,
    rng: &mut impl Rng,
) -> Result<Vec<usize>, SamplingError> {
    if n_frames == 0 {
        return Err(SamplingError::EmptyTrajectory);
    }
    match sampling {
        FrameSampling::All => Ok((0..n_frames).collect()),
        FrameSampling::WithReplacement { size: 0 }
        | FrameSampling::WithoutReplacement { size: 0 } => Err(SamplingError::ZeroSampleSize),
        FrameSampling::WithReplacement { size } => {
            if size > n_frames {
                warn!(
                    "Sample size {} exceeds the {} available frames; frames will repeat.",
                    size, n_frames
                );
            }
            Ok((0..size).map(|_| rng.gen_range(0..n_frames)).collect())
        }
        FrameSampling::WithoutReplacement { size } => {
            if size > n_frames {
                return Err(SamplingError::SampleLargerThanTrajectory { size, n_frames });
            }
            Ok(rand::seq::index::sample(rng, n_frames, size).into_vec())
        }
    }
}
