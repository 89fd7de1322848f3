use thiserror::Error;

pub const DEFAULT_ITERATIONS: usize = 100;
pub const DEFAULT_ALPHA: f64 = 0.05;
pub const DEFAULT_MEAN_STD_SAMPLE_SIZE: usize = 1000;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

/// How the base frame sample is drawn from the trajectory before resampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameSampling {
    /// Every frame once, in trajectory order. Bootstrap variance then reflects
    /// resampling uncertainty only.
    All,
    /// `size` frames drawn uniformly with replacement. `size` may exceed the
    /// trajectory length.
    WithReplacement { size: usize },
    /// `size` distinct frames drawn uniformly. `size` must not exceed the
    /// trajectory length.
    WithoutReplacement { size: usize },
}

/// How the bootstrap ensemble is reduced to per-atom statistics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IntervalStrategy {
    /// Baseline RMSF plus a pivot confidence interval at significance `alpha`,
    /// giving a `1 - 2 * alpha` central interval.
    Pivot { alpha: f64 },
    /// Mean and population standard deviation of the replicates.
    MeanStd,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BootstrapConfig {
    pub n_iterations: usize,
    pub sampling: FrameSampling,
    pub strategy: IntervalStrategy,
    /// Seed of every random draw in a run. `None` draws a fresh seed.
    pub seed: Option<u64>,
}

impl BootstrapConfig {
    /// Pivot interval over every frame: 100 iterations, alpha 0.05.
    pub fn pivot() -> Self {
        Self {
            n_iterations: DEFAULT_ITERATIONS,
            sampling: FrameSampling::All,
            strategy: IntervalStrategy::Pivot {
                alpha: DEFAULT_ALPHA,
            },
            seed: None,
        }
    }

    /// Mean/std over a 1000-frame sample drawn with replacement, 100 iterations.
    pub fn mean_std() -> Self {
        Self {
            n_iterations: DEFAULT_ITERATIONS,
            sampling: FrameSampling::WithReplacement {
                size: DEFAULT_MEAN_STD_SAMPLE_SIZE,
            },
            strategy: IntervalStrategy::MeanStd,
            seed: None,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.n_iterations < 1 {
            return Err(ConfigError::InvalidParameter {
                name: "n_iterations",
                reason: "at least one bootstrap iteration is required".to_string(),
            });
        }
        match self.sampling {
            FrameSampling::WithReplacement { size: 0 }
            | FrameSampling::WithoutReplacement { size: 0 } => {
                return Err(ConfigError::InvalidParameter {
                    name: "sample_size",
                    reason: "the frame sample must contain at least one frame".to_string(),
                });
            }
            _ => {}
        }
        if let IntervalStrategy::Pivot { alpha } = self.strategy {
            if !(alpha > 0.0 && alpha < 0.5) {
                return Err(ConfigError::InvalidParameter {
                    name: "alpha",
                    reason: format!("{} is outside the open interval (0, 0.5)", alpha),
                });
            }
        }
        Ok(())
    }
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self::pivot()
    }
}

#[derive(Default)]
pub struct BootstrapConfigBuilder {
    n_iterations: Option<usize>,
    sampling: Option<FrameSampling>,
    strategy: Option<IntervalStrategy>,
    seed: Option<u64>,
}

impl BootstrapConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn n_iterations(mut self, n: usize) -> Self {
        self.n_iterations = Some(n);
        self
    }
    pub fn sampling(mut self, sampling: FrameSampling) -> Self {
        self.sampling = Some(sampling);
        self
    }
    pub fn strategy(mut self, strategy: IntervalStrategy) -> Self {
        self.strategy = Some(strategy);
        self
    }
    pub fn seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn build(self) -> Result<BootstrapConfig, ConfigError> {
        let config = BootstrapConfig {
            n_iterations: self
                .n_iterations
                .ok_or(ConfigError::MissingParameter("n_iterations"))?,
            sampling: self
                .sampling
                .ok_or(ConfigError::MissingParameter("sampling"))?,
            strategy: self
                .strategy
                .ok_or(ConfigError::MissingParameter("strategy"))?,
            seed: self.seed,
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_carry_expected_defaults() {
        let pivot = BootstrapConfig::pivot();
        assert_eq!(pivot.n_iterations, 100);
        assert_eq!(pivot.sampling, FrameSampling::All);
        assert_eq!(pivot.strategy, IntervalStrategy::Pivot { alpha: 0.05 });

        let mean_std = BootstrapConfig::mean_std();
        assert_eq!(
            mean_std.sampling,
            FrameSampling::WithReplacement { size: 1000 }
        );
        assert_eq!(mean_std.strategy, IntervalStrategy::MeanStd);
        assert!(pivot.validate().is_ok());
        assert!(mean_std.validate().is_ok());
    }

    #[test]
    fn builder_reports_missing_parameters() {
        let err = BootstrapConfigBuilder::new()
            .n_iterations(10)
            .sampling(FrameSampling::All)
            .build()
            .unwrap_err();
        assert_eq!(err, ConfigError::MissingParameter("strategy"));
    }

    #[test]
    fn builder_builds_valid_config() {
        let config = BootstrapConfigBuilder::new()
            .n_iterations(25)
            .sampling(FrameSampling::WithoutReplacement { size: 5 })
            .strategy(IntervalStrategy::Pivot { alpha: 0.1 })
            .seed(Some(7))
            .build()
            .unwrap();
        assert_eq!(config.n_iterations, 25);
        assert_eq!(config.seed, Some(7));
    }

    #[test]
    fn zero_iterations_is_invalid() {
        let config = BootstrapConfig {
            n_iterations: 0,
            ..BootstrapConfig::pivot()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidParameter {
                name: "n_iterations",
                ..
            })
        ));
    }

    #[test]
    fn alpha_must_lie_strictly_between_zero_and_half() {
        for alpha in [0.0, 0.5, -0.1, 0.75, f64::NAN] {
            let config = BootstrapConfig {
                strategy: IntervalStrategy::Pivot { alpha },
                ..BootstrapConfig::pivot()
            };
            assert!(
                matches!(
                    config.validate(),
                    Err(ConfigError::InvalidParameter { name: "alpha", .. })
                ),
                "alpha {} should be rejected",
                alpha
            );
        }
    }

    #[test]
    fn zero_sample_size_is_invalid() {
        let config = BootstrapConfig {
            sampling: FrameSampling::WithReplacement { size: 0 },
            ..BootstrapConfig::mean_std()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidParameter {
                name: "sample_size",
                ..
            })
        ));
    }
}
