use geodraw_core::{RepositoryError, ShapeId};
use thiserror::Error;

/// Result of a controller operation
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Transient state changed
    Applied,
    /// A shape was created or updated in the repository
    Committed(ShapeId),
    /// The active session was discarded
    Cancelled,
    /// The event means nothing in the current state
    Ignored,
    /// Input refused; nothing changed
    Rejected(Rejection),
    /// The operation failed; nothing persisted changed
    Failed(SessionError),
}

impl Outcome {
    pub fn committed_id(&self) -> Option<&ShapeId> {
        match self {
            Outcome::Committed(id) => Some(id),
            _ => None,
        }
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, Outcome::Rejected(_))
    }
}

/// Why input was refused
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Rejection {
    #[error("a polygon needs at least 3 points, have {have}")]
    TooFewPoints { have: usize },
    #[error("nothing to undo")]
    NothingToUndo,
    #[error("nothing to redo")]
    NothingToRedo,
    #[error("no drawing in progress")]
    NoActiveDrawing,
    #[error("no vertex edit in progress")]
    NoActiveEdit,
    #[error("drawing is disabled")]
    DrawingDisabled,
    #[error("shape {0} not found")]
    ShapeNotFound(ShapeId),
    #[error("only polygons support vertex editing")]
    NotAPolygon(ShapeId),
    #[error("at most {limit} shapes can be hidden")]
    HideLimitReached { limit: usize },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    #[error("could not retrieve polygon coordinates")]
    CoordinatesUnavailable,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Severity of a user-facing notice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Error,
}

/// Transient message for the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}
