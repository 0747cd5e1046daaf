use thiserror::Error;

use super::stage::{MapKey, StageId};
use crate::api::SessionError;
use crate::sheet::ReadError;

/// Why a stage could not complete. Any of these ends the run.
#[derive(Debug, Error)]
pub enum StageError {
    #[error("could not read sheet data")]
    Read(#[source] ReadError),

    #[error("could not look up {what}")]
    Resolution {
        what: String,
        #[source]
        source: SessionError,
    },

    #[error("could not insert {sobject} records")]
    Write {
        sobject: String,
        #[source]
        source: SessionError,
    },

    #[error("could not encode {sobject} records")]
    Encode {
        sobject: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("stage reads the {0} map without declaring it")]
    UndeclaredDependency(MapKey),

    #[error("the {0} map has not been produced yet")]
    MissingDependency(MapKey),
}

impl StageError {
    /// Operator-facing line for a failed stage
    pub fn summary(&self, label: &str) -> String {
        match self {
            StageError::Read(_) => format!("Could not read {} from Excel", label),
            StageError::Resolution { what, .. } => format!("Could not query {}", what),
            _ => format!("Could not create {}", label),
        }
    }
}

impl From<ReadError> for StageError {
    fn from(error: ReadError) -> Self {
        StageError::Read(error)
    }
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("stage {stage} requires the {map} map, which no earlier stage produces")]
    InvalidOrder { stage: StageId, map: MapKey },

    #[error("the {map} map is produced by both {first} and {second}")]
    DuplicateProducer {
        map: MapKey,
        first: StageId,
        second: StageId,
    },

    #[error("{stage} failed")]
    Stage {
        stage: StageId,
        #[source]
        source: StageError,
    },
}

/// Render an error with its full source chain on one line
pub fn error_chain(error: &dyn std::error::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
