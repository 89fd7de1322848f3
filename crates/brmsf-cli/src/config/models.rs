use brmsf::core::models::selection::SelectionCriteria;
use brmsf::engine::config::BootstrapConfig;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub struct PlotConfig {
    /// Upper y bound; the largest statistic plus one when unset.
    pub ymax: Option<f64>,
    /// Residue number of the first residue; `0` leaves residue numbers as read.
    pub start_resid: isize,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone)]
pub struct RunConfig {
    pub trajectory_path: PathBuf,
    pub output_path: PathBuf,
    pub plot_path: Option<PathBuf>,
    pub selection: SelectionCriteria,
    pub core_config: BootstrapConfig,
    pub plot: PlotConfig,
}
