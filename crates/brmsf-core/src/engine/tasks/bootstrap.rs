use crate::core::models::selection::AtomSelection;
use crate::core::trajectory::FrameSource;
use crate::engine::ensemble::BootstrapEnsemble;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::tasks::rmsf;
use crate::engine::utils::sampling::ReplicateSampler;
use tracing::{debug, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Runs `n_iterations` bootstrap replicates of the RMSF estimate.
///
/// Iteration `i` resamples `base_frames` through `sampler` and writes its
/// per-atom RMSF into column `i` of the ensemble. Columns are disjoint, so
/// iterations run in parallel when the `parallel` feature is enabled.
#[instrument(skip_all, name = "bootstrap_task", fields(n_iterations = n_iterations, n_base_frames = base_frames.len()))]
pub fn run(
    selection: &AtomSelection,
    source: &dyn FrameSource,
    base_frames: &[usize],
    n_iterations: usize,
    sampler: &dyn ReplicateSampler,
    reporter: &ProgressReporter,
) -> Result<BootstrapEnsemble, EngineError> {
    if n_iterations < 1 {
        return Err(EngineError::invalid_input(
            "at least one bootstrap iteration is required",
        ));
    }
    if base_frames.is_empty() {
        return Err(EngineError::invalid_input("the base frame sample is empty"));
    }
    rmsf::check_selection(selection, source)?;

    let n_atoms = selection.len();
    let mut ensemble = BootstrapEnsemble::zeros(n_atoms, n_iterations);

    reporter.report(Progress::TaskStart {
        total: n_iterations as u64,
    });

    let fill_column = |(iteration, column): (usize, &mut [f64])| -> Result<(), EngineError> {
        let frames = sampler.draw(base_frames, iteration);
        let values = rmsf::estimate(selection, source, &frames, Some(iteration))?;
        column.copy_from_slice(&values);
        reporter.report(Progress::TaskIncrement { amount: 1 });
        Ok(())
    };

    #[cfg(not(feature = "parallel"))]
    let result = ensemble
        .storage_mut()
        .chunks_mut(n_atoms)
        .enumerate()
        .try_for_each(fill_column);

    #[cfg(feature = "parallel")]
    let result = ensemble
        .storage_mut()
        .par_chunks_mut(n_atoms)
        .enumerate()
        .try_for_each(fill_column);

    reporter.report(Progress::TaskFinish);
    result?;

    debug!(n_atoms, n_iterations, "Bootstrap ensemble filled.");
    Ok(ensemble)
}
