use crate::core::io::table::CsvTableFile;
use crate::core::models::selection::AtomSelection;
use crate::core::models::table::ResultTable;
use crate::core::trajectory::FrameSource;
use crate::engine::aggregate;
use crate::engine::config::{BootstrapConfig, IntervalStrategy};
use crate::engine::ensemble::{BootstrapEnsemble, PerAtomRmsf};
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::tasks;
use crate::engine::utils::sampling::{
    RandomReplicateSampler, ReplicateSampler, draw_base_frames, stream_rng,
};
use std::path::Path;
use tracing::{info, instrument};

/// Everything one bootstrap run produced.
#[derive(Debug, Clone)]
pub struct BootstrapResult {
    pub table: ResultTable,
    pub ensemble: BootstrapEnsemble,
    /// RMSF over the base frame sample; only computed for the pivot strategy.
    pub baseline: Option<PerAtomRmsf>,
    pub base_frames: Vec<usize>,
    /// Seed actually used, drawn at random when the config has none.
    pub seed: u64,
}

/// Runs a full bootstrap RMSF analysis with random replicate resampling.
#[instrument(skip_all, name = "bootstrap_workflow")]
pub fn run(
    selection: &AtomSelection,
    source: &dyn FrameSource,
    config: &BootstrapConfig,
    reporter: &ProgressReporter,
) -> Result<BootstrapResult, EngineError> {
    let seed = resolve_seed(config);
    let sampler = RandomReplicateSampler::new(seed);
    execute(selection, source, config, seed, &sampler, reporter)
}

/// Same as [`run`], with replicate frame lists produced by `sampler`.
#[instrument(skip_all, name = "bootstrap_workflow")]
pub fn run_with_sampler(
    selection: &AtomSelection,
    source: &dyn FrameSource,
    config: &BootstrapConfig,
    sampler: &dyn ReplicateSampler,
    reporter: &ProgressReporter,
) -> Result<BootstrapResult, EngineError> {
    let seed = resolve_seed(config);
    execute(selection, source, config, seed, sampler, reporter)
}

fn resolve_seed(config: &BootstrapConfig) -> u64 {
    match config.seed {
        Some(seed) => seed,
        None => {
            let seed = rand::random::<u64>();
            info!(seed, "No seed configured; drew a random one.");
            seed
        }
    }
}

fn execute(
    selection: &AtomSelection,
    source: &dyn FrameSource,
    config: &BootstrapConfig,
    seed: u64,
    sampler: &dyn ReplicateSampler,
    reporter: &ProgressReporter,
) -> Result<BootstrapResult, EngineError> {
    config.validate()?;
    tasks::rmsf::check_selection(selection, source)?;
    info!(
        n_atoms = selection.len(),
        n_frames = source.n_frames(),
        n_iterations = config.n_iterations,
        "Starting bootstrap RMSF analysis."
    );

    // === Phase 1: Base frame sample ===
    reporter.report(Progress::PhaseStart {
        name: "Sampling frames",
    });
    if config.seed.is_none() {
        reporter.report(Progress::Message(format!(
            "No seed configured, using random seed {}",
            seed
        )));
    }
    let mut rng = stream_rng(seed, 0);
    let base_frames = draw_base_frames(source.n_frames(), config.sampling, &mut rng)?;
    info!(
        n_base_frames = base_frames.len(),
        "Base frame sample drawn ({:?}).", config.sampling
    );
    reporter.report(Progress::StatusUpdate {
        text: format!("{} of {} frames", base_frames.len(), source.n_frames()),
    });
    reporter.report(Progress::PhaseFinish);

    // === Phase 2: Baseline estimate (pivot interval only) ===
    let baseline = match config.strategy {
        IntervalStrategy::Pivot { .. } => {
            reporter.report(Progress::PhaseStart {
                name: "Baseline RMSF",
            });
            let baseline = tasks::rmsf::run(selection, source, &base_frames)?;
            reporter.report(Progress::PhaseFinish);
            Some(baseline)
        }
        IntervalStrategy::MeanStd => None,
    };

    // === Phase 3: Bootstrap replicates ===
    reporter.report(Progress::PhaseStart {
        name: "Bootstrap resampling",
    });
    let ensemble = tasks::bootstrap::run(
        selection,
        source,
        &base_frames,
        config.n_iterations,
        sampler,
        reporter,
    )?;
    reporter.report(Progress::PhaseFinish);

    // === Phase 4: Statistics and residue grouping ===
    reporter.report(Progress::PhaseStart {
        name: "Aggregating",
    });
    let table = aggregate::aggregate(
        config.strategy,
        selection,
        baseline.as_deref(),
        &ensemble,
    )?;
    reporter.report(Progress::PhaseFinish);

    info!(
        residues = table.len(),
        "Bootstrap analysis complete ({}).",
        table.kind()
    );
    Ok(BootstrapResult {
        table,
        ensemble,
        baseline,
        base_frames,
        seed,
    })
}

/// Stateful front end that keeps the last result table for saving.
#[derive(Debug, Clone)]
pub struct BootstrapRmsf {
    config: BootstrapConfig,
    result: Option<ResultTable>,
    last_seed: Option<u64>,
}

impl BootstrapRmsf {
    pub fn new(config: BootstrapConfig) -> Self {
        Self {
            config,
            result: None,
            last_seed: None,
        }
    }

    pub fn config(&self) -> &BootstrapConfig {
        &self.config
    }

    /// Runs the analysis, replacing any previous result.
    pub fn run(
        &mut self,
        selection: &AtomSelection,
        source: &dyn FrameSource,
        reporter: &ProgressReporter,
    ) -> Result<&ResultTable, EngineError> {
        let outcome = run(selection, source, &self.config, reporter)?;
        self.last_seed = Some(outcome.seed);
        let table: &ResultTable = self.result.insert(outcome.table);
        Ok(table)
    }

    pub fn result(&self) -> Option<&ResultTable> {
        self.result.as_ref()
    }

    /// Seed used by the last successful run.
    pub fn last_seed(&self) -> Option<u64> {
        self.last_seed
    }

    /// Writes the last result table as CSV.
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidInput`] when called before a successful run.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), EngineError> {
        let table = self
            .result
            .as_ref()
            .ok_or_else(|| EngineError::invalid_input("no result to save; call run first"))?;
        CsvTableFile::write_to_path(table, path)?;
        Ok(())
    }
}
