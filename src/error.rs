//! Error types for the frame solver

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Broad classification of a failed analysis.
///
/// A configuration fault is a modelling error (bad references, bad geometry),
/// a singularity fault means the structure itself cannot carry the load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaultKind {
    Configuration,
    Singularity,
    Io,
}

/// Main error type for frame analysis
#[derive(Error, Debug)]
pub enum FrameError {
    #[error("Node '{0}' not found in model")]
    NodeNotFound(String),

    #[error("Member '{0}' not found in model")]
    MemberNotFound(String),

    #[error("Duplicate name '{0}' already exists")]
    DuplicateName(String),

    #[error("Member '{member}' has zero length (nodes '{start}' and '{end}' coincide)")]
    ZeroLengthMember {
        member: String,
        start: String,
        end: String,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Singular stiffness matrix - model may be unstable or have insufficient supports")]
    SingularMatrix,

    #[error("Model is unstable: {0}")]
    Unstable(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl FrameError {
    /// Classify the error
    pub fn kind(&self) -> FaultKind {
        match self {
            FrameError::NodeNotFound(_)
            | FrameError::MemberNotFound(_)
            | FrameError::DuplicateName(_)
            | FrameError::ZeroLengthMember { .. }
            | FrameError::InvalidInput(_) => FaultKind::Configuration,
            FrameError::SingularMatrix | FrameError::Unstable(_) => FaultKind::Singularity,
            FrameError::IoError(_) | FrameError::SerializationError(_) => FaultKind::Io,
        }
    }

    pub fn is_configuration(&self) -> bool {
        self.kind() == FaultKind::Configuration
    }

    pub fn is_singularity(&self) -> bool {
        self.kind() == FaultKind::Singularity
    }
}

/// Result type for frame operations
pub type FrameResult<T> = Result<T, FrameError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fault_classification() {
        assert!(FrameError::NodeNotFound("N9".into()).is_configuration());
        assert!(FrameError::ZeroLengthMember {
            member: "M1".into(),
            start: "N1".into(),
            end: "N2".into(),
        }
        .is_configuration());
        assert!(FrameError::SingularMatrix.is_singularity());
        assert!(FrameError::Unstable("pivot".into()).is_singularity());
        assert!(!FrameError::SingularMatrix.is_configuration());
    }

    #[test]
    fn test_messages_name_the_culprit() {
        let err = FrameError::MemberNotFound("Beam".into());
        assert_eq!(err.to_string(), "Member 'Beam' not found in model");
    }
}
