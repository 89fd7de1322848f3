use crate::core::io::table::TableError;
use crate::core::trajectory::FrameSourceError;
use crate::engine::config::ConfigError;
use crate::engine::utils::sampling::SamplingError;
use thiserror::Error;

fn iteration_context(iteration: &Option<usize>) -> String {
    match iteration {
        Some(i) => format!(" in bootstrap iteration {}", i),
        None => String::new(),
    }
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("Failed to read frame {frame}{}: {source}", iteration_context(.iteration))]
    FrameSource {
        frame: usize,
        iteration: Option<usize>,
        #[source]
        source: FrameSourceError,
    },

    #[error("Failed to persist result table: {source}")]
    Table {
        #[from]
        source: TableError,
    },

    #[error("Internal logic error: {0}")]
    Internal(String),
}

impl EngineError {
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }
}

impl From<ConfigError> for EngineError {
    fn from(err: ConfigError) -> Self {
        Self::invalid_input(err.to_string())
    }
}

impl From<SamplingError> for EngineError {
    fn from(err: SamplingError) -> Self {
        Self::invalid_input(err.to_string())
    }
}
