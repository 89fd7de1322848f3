use crate::error::{CliError, Result};
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum FileSamplingMode {
    All,
    WithReplacement,
    WithoutReplacement,
}

impl FromStr for FileSamplingMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            "with-replacement" => Ok(Self::WithReplacement),
            "without-replacement" => Ok(Self::WithoutReplacement),
            other => Err(format!(
                "unknown sampling mode '{}', expected 'all', 'with-replacement' or 'without-replacement'",
                other
            )),
        }
    }
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum FileIntervalStrategy {
    Pivot,
    MeanStd,
}

impl FromStr for FileIntervalStrategy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "pivot" => Ok(Self::Pivot),
            "mean-std" => Ok(Self::MeanStd),
            other => Err(format!(
                "unknown interval strategy '{}', expected 'pivot' or 'mean-std'",
                other
            )),
        }
    }
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileBootstrapConfig {
    pub iterations: Option<usize>,
    pub seed: Option<u64>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileSamplingConfig {
    pub mode: Option<FileSamplingMode>,
    pub sample_size: Option<usize>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileIntervalConfig {
    pub strategy: Option<FileIntervalStrategy>,
    pub alpha: Option<f64>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileSelectionConfig {
    pub atom_names: Option<Vec<String>>,
    pub resnames: Option<Vec<String>>,
    pub segids: Option<Vec<String>>,
    pub residues: Option<String>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FilePlotConfig {
    pub ymax: Option<f64>,
    pub start_resid: Option<isize>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

/// One configuration layer. Every field is optional so that layers can be
/// stacked with [`FileConfig::over`].
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub bootstrap: Option<FileBootstrapConfig>,
    pub sampling: Option<FileSamplingConfig>,
    pub interval: Option<FileIntervalConfig>,
    pub selection: Option<FileSelectionConfig>,
    pub plot: Option<FilePlotConfig>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    /// Stacks `self` on top of `lower`: every value set in `self` wins.
    pub fn over(self, lower: FileConfig) -> FileConfig {
        let b = self.bootstrap.unwrap_or_default();
        let lb = lower.bootstrap.unwrap_or_default();
        let s = self.sampling.unwrap_or_default();
        let ls = lower.sampling.unwrap_or_default();
        let i = self.interval.unwrap_or_default();
        let li = lower.interval.unwrap_or_default();
        let sel = self.selection.unwrap_or_default();
        let lsel = lower.selection.unwrap_or_default();
        let p = self.plot.unwrap_or_default();
        let lp = lower.plot.unwrap_or_default();

        FileConfig {
            bootstrap: Some(FileBootstrapConfig {
                iterations: b.iterations.or(lb.iterations),
                seed: b.seed.or(lb.seed),
            }),
            sampling: Some(FileSamplingConfig {
                mode: s.mode.or(ls.mode),
                sample_size: s.sample_size.or(ls.sample_size),
            }),
            interval: Some(FileIntervalConfig {
                strategy: i.strategy.or(li.strategy),
                alpha: i.alpha.or(li.alpha),
            }),
            selection: Some(FileSelectionConfig {
                atom_names: sel.atom_names.or(lsel.atom_names),
                resnames: sel.resnames.or(lsel.resnames),
                segids: sel.segids.or(lsel.segids),
                residues: sel.residues.or(lsel.residues),
            }),
            plot: Some(FilePlotConfig {
                ymax: p.ymax.or(lp.ymax),
                start_resid: p.start_resid.or(lp.start_resid),
                width: p.width.or(lp.width),
                height: p.height.or(lp.height),
            }),
        }
    }

    /// Applies `--set KEY=VALUE` overrides. Keys use the TOML spelling
    /// (`section.kebab-key`); list values are comma separated.
    pub fn apply_set_values(mut self, set_values: &[String]) -> Result<Self> {
        for kv_pair in set_values {
            let (key, value_str) = kv_pair.split_once('=').ok_or_else(|| {
                CliError::Config(format!(
                    "Invalid --set format: '{}'. Expected KEY=VALUE.",
                    kv_pair
                ))
            })?;
            let key = key.trim();
            let value_str = value_str.trim();

            match key {
                "bootstrap.iterations" => {
                    self.bootstrap
                        .get_or_insert_with(Default::default)
                        .iterations = Some(parse_value(key, value_str)?);
                }
                "bootstrap.seed" => {
                    self.bootstrap.get_or_insert_with(Default::default).seed =
                        Some(parse_value(key, value_str)?);
                }
                "sampling.mode" => {
                    self.sampling.get_or_insert_with(Default::default).mode =
                        Some(value_str.parse().map_err(CliError::Config)?);
                }
                "sampling.sample-size" => {
                    self.sampling
                        .get_or_insert_with(Default::default)
                        .sample_size = Some(parse_value(key, value_str)?);
                }
                "interval.strategy" => {
                    self.interval.get_or_insert_with(Default::default).strategy =
                        Some(value_str.parse().map_err(CliError::Config)?);
                }
                "interval.alpha" => {
                    self.interval.get_or_insert_with(Default::default).alpha =
                        Some(parse_value(key, value_str)?);
                }
                "selection.atom-names" => {
                    self.selection
                        .get_or_insert_with(Default::default)
                        .atom_names = Some(split_list(value_str));
                }
                "selection.resnames" => {
                    self.selection.get_or_insert_with(Default::default).resnames =
                        Some(split_list(value_str));
                }
                "selection.segids" => {
                    self.selection.get_or_insert_with(Default::default).segids =
                        Some(split_list(value_str));
                }
                "selection.residues" => {
                    self.selection.get_or_insert_with(Default::default).residues =
                        Some(value_str.to_string());
                }
                "plot.ymax" => {
                    self.plot.get_or_insert_with(Default::default).ymax =
                        Some(parse_value(key, value_str)?);
                }
                "plot.start-resid" => {
                    self.plot.get_or_insert_with(Default::default).start_resid =
                        Some(parse_value(key, value_str)?);
                }
                "plot.width" => {
                    self.plot.get_or_insert_with(Default::default).width =
                        Some(parse_value(key, value_str)?);
                }
                "plot.height" => {
                    self.plot.get_or_insert_with(Default::default).height =
                        Some(parse_value(key, value_str)?);
                }
                _ => {
                    return Err(CliError::Config(format!(
                        "Unsupported configuration key for --set: '{}'",
                        key
                    )));
                }
            }
        }
        Ok(self)
    }
}

fn parse_value<T: FromStr>(key: &str, value_str: &str) -> Result<T> {
    value_str.parse().map_err(|_| {
        CliError::Config(format!(
            "Invalid {} value for {}: {}",
            std::any::type_name::<T>(),
            key,
            value_str
        ))
    })
}

fn split_list(value_str: &str) -> Vec<String> {
    value_str
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
