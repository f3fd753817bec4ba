use crate::{level::Level, track::TrackKind, wizard::WizardStep};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CaseError {
    #[error("Invalid transition on {track} track at {level}: {reason}")]
    InvalidTransition {
        track: TrackKind,
        level: Level,
        reason: String,
    },

    #[error("Wizard {step} has not been reached yet")]
    StepNotReachable { step: WizardStep },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Precondition not met: {0}")]
    PreconditionNotMet(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Error category reported to callers as plain data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidTransition,
    InvalidInput,
    PreconditionNotMet,
    Internal,
}

impl CaseError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidTransition { .. } | Self::StepNotReachable { .. } => {
                ErrorKind::InvalidTransition
            }
            Self::InvalidInput(_) | Self::Serialization(_) => ErrorKind::InvalidInput,
            Self::PreconditionNotMet(_) => ErrorKind::PreconditionNotMet,
            Self::Other(_) => ErrorKind::Internal,
        }
    }

    pub(crate) fn transition(track: TrackKind, level: Level, reason: impl Into<String>) -> Self {
        Self::InvalidTransition {
            track,
            level,
            reason: reason.into(),
        }
    }
}

pub type CaseResult<T> = Result<T, CaseError>;
