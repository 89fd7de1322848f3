use crate::cli::RunArgs;
use crate::config::build_run_config;
use crate::error::{CliError, Result};
use crate::plot;
use crate::ui::{CliProgressHandler, UiEvent};
use brmsf::{
    core::{
        io::{pdb::PdbTrajectoryFile, traits::TrajectoryFile},
        models::selection::AtomSelection,
        trajectory::{FrameSource, InMemoryTrajectory},
    },
    engine::progress::ProgressReporter,
    workflows::bootstrap::BootstrapRmsf,
};
use tokio::sync::mpsc;
use tracing::{info, warn};

pub async fn run(args: RunArgs, ui_sender: mpsc::Sender<UiEvent>) -> Result<()> {
    info!("Resolving configuration from defaults, file and CLI arguments...");
    let config = build_run_config(&args)?;

    info!("Loading trajectory from {:?}", &config.trajectory_path);
    let trajectory = PdbTrajectoryFile::read_from_path(&config.trajectory_path).map_err(|e| {
        CliError::FileParsing {
            path: config.trajectory_path.clone(),
            source: e.into(),
        }
    })?;
    info!("{}", load_summary(&trajectory));

    let selection = AtomSelection::from_criteria(trajectory.topology(), &config.selection)
        .map_err(|e| CliError::Argument(e.to_string()))?;
    println!(
        "Selected {} atom(s) from {} frame(s).",
        selection.len(),
        trajectory.n_frames()
    );

    let progress_handler = CliProgressHandler::new(ui_sender);
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!(
        "Starting bootstrap RMSF with {} iteration(s)...",
        config.core_config.n_iterations
    );
    info!("Invoking the core bootstrap workflow...");

    let mut analysis = BootstrapRmsf::new(config.core_config.clone());
    let rows = tokio::task::block_in_place(|| {
        analysis
            .run(&selection, &trajectory, &reporter)
            .map(|table| table.len())
    })?;

    if rows == 0 {
        warn!("Workflow completed but produced no residue rows.");
    }
    if let Some(seed) = analysis.last_seed() {
        info!(seed, "Bootstrap run finished.");
    }

    analysis.save(&config.output_path)?;
    println!(
        "✓ {} residue row(s) written to: {}",
        rows,
        config.output_path.display()
    );

    if let (Some(plot_path), Some(table)) = (&config.plot_path, analysis.result()) {
        info!("Rendering plot to {:?}", plot_path);
        plot::render_svg(table, &config.plot, plot_path)?;
        println!("✓ Plot written to: {}", plot_path.display());
    }

    Ok(())
}

fn load_summary(trajectory: &InMemoryTrajectory) -> String {
    format!(
        "Loaded {} frame(s) of {} atom(s) in {} residue(s).",
        trajectory.n_frames(),
        trajectory.n_atoms(),
        trajectory.topology().residue_count()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use brmsf::core::models::{atom::AtomInfo, topology::Topology};
    use nalgebra::Point3;

    #[test]
    fn load_summary_counts_residues_per_segment() {
        let topology = Topology::new(vec![
            AtomInfo::new(1, "CA", 1, "ALA", "A"),
            AtomInfo::new(2, "CB", 1, "ALA", "A"),
            AtomInfo::new(3, "CA", 1, "ALA", "B"),
        ]);
        let frame = vec![Point3::origin(); 3];
        let trajectory = InMemoryTrajectory::new(topology, vec![frame.clone(), frame]).unwrap();

        assert_eq!(
            load_summary(&trajectory),
            "Loaded 2 frame(s) of 3 atom(s) in 2 residue(s)."
        );
    }
}
