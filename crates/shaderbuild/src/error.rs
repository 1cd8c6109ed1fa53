use thiserror::Error;

use crate::types::StageKind;

/// Failures observed while assembling a shader program.
///
/// None of these abort program assembly. They are logged on the diagnostics
/// channel and collected on the returned [`crate::BuiltProgram`].
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("shader resource '{name}' is unavailable")]
    ResourceUnavailable {
        name: String,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("shader resource '{name}' is empty")]
    ResourceEmpty { name: String },

    #[error("compilation error in {stage}: {log}")]
    StageCompileFailed { stage: StageKind, log: String },

    #[error("linking error in program: {log}")]
    ProgramLinkFailed { log: String },
}

impl BuildError {
    /// Diagnostics tag: the failing stage, `program`, or `resource`.
    pub fn tag(&self) -> &'static str {
        match self {
            BuildError::ResourceUnavailable { .. } | BuildError::ResourceEmpty { .. } => {
                "resource"
            }
            BuildError::StageCompileFailed { stage, .. } => stage.tag(),
            BuildError::ProgramLinkFailed { .. } => "program",
        }
    }

    /// Driver log attached to compile and link failures.
    pub fn log(&self) -> Option<&str> {
        match self {
            BuildError::StageCompileFailed { log, .. } | BuildError::ProgramLinkFailed { log } => {
                Some(log.as_str())
            }
            _ => None,
        }
    }
}
