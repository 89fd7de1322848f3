use super::defaults::DefaultsConfig;
use super::file::{
    FileBootstrapConfig, FileConfig, FileIntervalConfig, FileIntervalStrategy, FilePlotConfig,
    FileSamplingConfig, FileSamplingMode, FileSelectionConfig,
};
use super::models::{PlotConfig, RunConfig};
use crate::cli::{PlotArgs, RunArgs};
use crate::error::{CliError, Result};
use crate::utils::parser;
use brmsf::core::models::selection::SelectionCriteria;
use brmsf::engine::config::{
    BootstrapConfigBuilder, FrameSampling, IntervalStrategy,
};
use tracing::debug;

/// Resolves the configuration of a `run` invocation.
///
/// Precedence, lowest first: built-in defaults, the TOML file, command line
/// flags, `--set` overrides.
pub fn build_run_config(args: &RunArgs) -> Result<RunConfig> {
    let defaults = DefaultsConfig::default();

    let file_config = match &args.config {
        Some(path) => FileConfig::from_file(path)?,
        None => FileConfig::default(),
    };
    let merged = cli_layer(args)
        .over(file_config)
        .apply_set_values(&args.set_values)?;
    debug!("Merged configuration layers: {:?}", merged);

    let bootstrap = merged.bootstrap.unwrap_or_default();
    let interval = merged.interval.unwrap_or_default();
    let sampling_file = merged.sampling.unwrap_or_default();

    let strategy = match interval.strategy.unwrap_or(FileIntervalStrategy::Pivot) {
        FileIntervalStrategy::Pivot => IntervalStrategy::Pivot {
            alpha: interval.alpha.unwrap_or(defaults.alpha),
        },
        FileIntervalStrategy::MeanStd => {
            if interval.alpha.is_some() {
                debug!("Ignoring alpha: it only applies to the pivot interval.");
            }
            IntervalStrategy::MeanStd
        }
    };
    let sampling = resolve_sampling(&sampling_file, strategy, &defaults)?;

    let core_config = BootstrapConfigBuilder::new()
        .n_iterations(bootstrap.iterations.unwrap_or(defaults.iterations))
        .sampling(sampling)
        .strategy(strategy)
        .seed(bootstrap.seed)
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    let selection = resolve_selection(merged.selection.unwrap_or_default(), &defaults)?;
    let plot = resolve_plot(merged.plot.unwrap_or_default(), &defaults)?;

    Ok(RunConfig {
        trajectory_path: args.trajectory.clone(),
        output_path: args.output.clone(),
        plot_path: args.plot.clone(),
        selection,
        core_config,
        plot,
    })
}

/// Resolves the configuration of a `plot` invocation from its optional file
/// and flags.
pub fn build_plot_config(args: &PlotArgs) -> Result<PlotConfig> {
    let defaults = DefaultsConfig::default();
    let file_config = match &args.config {
        Some(path) => FileConfig::from_file(path)?,
        None => FileConfig::default(),
    };
    let cli = FileConfig {
        plot: Some(FilePlotConfig {
            ymax: args.ymax,
            start_resid: args.start_resid,
            ..Default::default()
        }),
        ..Default::default()
    };
    resolve_plot(cli.over(file_config).plot.unwrap_or_default(), &defaults)
}

fn cli_layer(args: &RunArgs) -> FileConfig {
    let strategy = if args.interval.mean_std {
        Some(FileIntervalStrategy::MeanStd)
    } else if args.interval.alpha.is_some() {
        Some(FileIntervalStrategy::Pivot)
    } else {
        None
    };

    let mode = if args.sampling.all_frames {
        Some(FileSamplingMode::All)
    } else if args.sampling.without_replacement {
        Some(FileSamplingMode::WithoutReplacement)
    } else if args.sampling.sample_size.is_some() {
        Some(FileSamplingMode::WithReplacement)
    } else {
        None
    };

    let non_empty = |values: &Vec<String>| (!values.is_empty()).then(|| values.clone());

    FileConfig {
        bootstrap: Some(FileBootstrapConfig {
            iterations: args.iterations,
            seed: args.seed,
        }),
        sampling: Some(FileSamplingConfig {
            mode,
            sample_size: args.sampling.sample_size,
        }),
        interval: Some(FileIntervalConfig {
            strategy,
            alpha: args.interval.alpha,
        }),
        selection: Some(FileSelectionConfig {
            atom_names: non_empty(&args.atom_names),
            resnames: non_empty(&args.resnames),
            segids: non_empty(&args.segids),
            residues: args.residues.clone(),
        }),
        plot: None,
    }
}

fn resolve_sampling(
    file: &FileSamplingConfig,
    strategy: IntervalStrategy,
    defaults: &DefaultsConfig,
) -> Result<FrameSampling> {
    let sampling = match (file.mode, file.sample_size) {
        (Some(FileSamplingMode::All), _) => FrameSampling::All,
        (Some(FileSamplingMode::WithReplacement), size) => FrameSampling::WithReplacement {
            size: size.unwrap_or(defaults.mean_std_sample_size),
        },
        (Some(FileSamplingMode::WithoutReplacement), Some(size)) => {
            FrameSampling::WithoutReplacement { size }
        }
        (Some(FileSamplingMode::WithoutReplacement), None) => {
            return Err(CliError::Config(
                "Sampling without replacement requires 'sampling.sample-size'.".to_string(),
            ));
        }
        (None, Some(size)) => FrameSampling::WithReplacement { size },
        (None, None) => match strategy {
            IntervalStrategy::Pivot { .. } => FrameSampling::All,
            IntervalStrategy::MeanStd => FrameSampling::WithReplacement {
                size: defaults.mean_std_sample_size,
            },
        },
    };
    Ok(sampling)
}

fn resolve_selection(
    file: FileSelectionConfig,
    defaults: &DefaultsConfig,
) -> Result<SelectionCriteria> {
    let mut criteria = SelectionCriteria::all()
        .with_atom_names(file.atom_names.unwrap_or_else(|| defaults.atom_names.clone()))
        .with_resnames(file.resnames.unwrap_or_default())
        .with_segids(file.segids.unwrap_or_default());
    if let Some(residues) = file.residues {
        let range = parser::parse_residue_range(&residues)
            .map_err(|e| CliError::Argument(e.to_string()))?;
        criteria = criteria.with_residue_range(range);
    }
    Ok(criteria)
}

fn resolve_plot(file: FilePlotConfig, defaults: &DefaultsConfig) -> Result<PlotConfig> {
    if let Some(ymax) = file.ymax {
        if !(ymax > 0.0) {
            return Err(CliError::Config(format!(
                "Plot ymax must be positive, got {}",
                ymax
            )));
        }
    }
    let width = file.width.unwrap_or(defaults.plot_width);
    let height = file.height.unwrap_or(defaults.plot_height);
    if width == 0 || height == 0 {
        return Err(CliError::Config(
            "Plot width and height must be non-zero.".to_string(),
        ));
    }
    Ok(PlotConfig {
        ymax: file.ymax,
        start_resid: file.start_resid.unwrap_or(defaults.start_resid),
        width,
        height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{IntervalArgs, SamplingArgs};
    use std::fs;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn base_run_args() -> RunArgs {
        RunArgs {
            trajectory: PathBuf::from("traj.pdb"),
            output: PathBuf::from("rmsf.csv"),
            config: None,
            iterations: None,
            seed: None,
            interval: IntervalArgs::default(),
            sampling: SamplingArgs::default(),
            atom_names: Vec::new(),
            resnames: Vec::new(),
            segids: Vec::new(),
            residues: None,
            plot: None,
            set_values: Vec::new(),
        }
    }

    #[test]
    fn defaults_give_pivot_over_all_frames_on_alpha_carbons() {
        let config = build_run_config(&base_run_args()).expect("build ok");
        let core = config.core_config;
        assert_eq!(core.n_iterations, 100);
        assert_eq!(core.sampling, FrameSampling::All);
        assert_eq!(core.strategy, IntervalStrategy::Pivot { alpha: 0.05 });
        assert_eq!(core.seed, None);
        assert_eq!(config.selection.atom_names, vec!["CA".to_string()]);
        assert_eq!(config.plot.width, 1200);
        assert_eq!(config.plot.ymax, None);
    }

    #[test]
    fn mean_std_defaults_to_thousand_frames_with_replacement() {
        let mut args = base_run_args();
        args.interval.mean_std = true;
        let core = build_run_config(&args).expect("build ok").core_config;
        assert_eq!(core.strategy, IntervalStrategy::MeanStd);
        assert_eq!(core.sampling, FrameSampling::WithReplacement { size: 1000 });
    }

    #[test]
    fn cli_overrides_file_values() {
        let dir = tempdir().unwrap();
        let cfg_path = dir.path().join("brmsf.toml");
        let toml = r#"
            [bootstrap]
            iterations = 20
            seed = 3
            [interval]
            alpha = 0.1
            [sampling]
            mode = "without-replacement"
            sample-size = 50
            [selection]
            atom-names = ["CB"]
            residues = "10-20"
            "#;
        fs::write(&cfg_path, toml).unwrap();

        let mut args = base_run_args();
        args.config = Some(cfg_path);
        args.iterations = Some(400);
        args.interval.alpha = Some(0.025);
        args.atom_names = vec!["CA".to_string()];

        let config = build_run_config(&args).expect("build ok");
        let core = config.core_config;
        assert_eq!(core.n_iterations, 400);
        assert_eq!(core.seed, Some(3));
        assert_eq!(core.strategy, IntervalStrategy::Pivot { alpha: 0.025 });
        assert_eq!(core.sampling, FrameSampling::WithoutReplacement { size: 50 });
        assert_eq!(config.selection.atom_names, vec!["CA".to_string()]);
        assert_eq!(config.selection.residue_range, Some(10..=20));
    }

    #[test]
    fn set_values_override_cli_flags() {
        let mut args = base_run_args();
        args.iterations = Some(400);
        args.set_values = vec![
            "bootstrap.iterations=7".to_string(),
            "interval.strategy=mean-std".to_string(),
            "sampling.sample-size=25".to_string(),
        ];
        let core = build_run_config(&args).expect("build ok").core_config;
        assert_eq!(core.n_iterations, 7);
        assert_eq!(core.strategy, IntervalStrategy::MeanStd);
        assert_eq!(core.sampling, FrameSampling::WithReplacement { size: 25 });
    }

    #[test]
    fn all_frames_flag_beats_file_sample_size() {
        let dir = tempdir().unwrap();
        let cfg_path = dir.path().join("brmsf.toml");
        fs::write(&cfg_path, "[sampling]\nsample-size = 100\n").unwrap();
        let mut args = base_run_args();
        args.config = Some(cfg_path);
        args.sampling.all_frames = true;
        let core = build_run_config(&args).expect("build ok").core_config;
        assert_eq!(core.sampling, FrameSampling::All);
    }

    #[test]
    fn without_replacement_needs_a_size() {
        let mut args = base_run_args();
        args.set_values = vec!["sampling.mode=without-replacement".to_string()];
        assert!(matches!(build_run_config(&args), Err(CliError::Config(_))));
    }

    #[test]
    fn invalid_alpha_is_config_error() {
        let mut args = base_run_args();
        args.interval.alpha = Some(0.5);
        assert!(matches!(build_run_config(&args), Err(CliError::Config(_))));
    }

    #[test]
    fn bad_residue_range_is_argument_error() {
        let mut args = base_run_args();
        args.residues = Some("30-10".to_string());
        assert!(matches!(build_run_config(&args), Err(CliError::Argument(_))));
    }

    #[test]
    fn plot_flags_override_plot_section() {
        let dir = tempdir().unwrap();
        let cfg_path = dir.path().join("brmsf.toml");
        fs::write(&cfg_path, "[plot]\nymax = 2.0\nstart-resid = 5\nwidth = 800\n").unwrap();
        let args = PlotArgs {
            input: PathBuf::from("rmsf.csv"),
            output: PathBuf::from("rmsf.svg"),
            config: Some(cfg_path),
            ymax: Some(6.0),
            start_resid: None,
        };
        let plot = build_plot_config(&args).expect("build ok");
        assert_eq!(
            plot,
            PlotConfig {
                ymax: Some(6.0),
                start_resid: 5,
                width: 800,
                height: 400,
            }
        );
    }

    #[test]
    fn non_positive_ymax_is_rejected() {
        let args = PlotArgs {
            input: PathBuf::from("rmsf.csv"),
            output: PathBuf::from("rmsf.svg"),
            config: None,
            ymax: Some(0.0),
            start_resid: None,
        };
        assert!(matches!(build_plot_config(&args), Err(CliError::Config(_))));
    }
}
