//! Layered configuration of the command line front end.
//!
//! Built-in defaults, an optional TOML file, command line flags and `--set`
//! overrides are merged (in that order of increasing precedence) into the
//! core [`brmsf::engine::config::BootstrapConfig`] plus CLI-only settings.

mod builder;
mod defaults;
mod file;
mod models;

pub use builder::{build_plot_config, build_run_config};
pub use models::{PlotConfig, RunConfig};
