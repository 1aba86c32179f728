use thiserror::Error;

use super::machine::{ResolveEvent, ResolveStage, ResolveState};
use crate::animation::AnimationError;
use crate::content::GlobError;
use crate::theme::ThemeError;

pub type StateResult<T> = std::result::Result<T, StateError>;
pub type ResolveResult<T> = std::result::Result<T, ResolveError>;

#[derive(Debug, Error)]
pub enum StateError {
    #[error("invalid resolve transition: from {from:?} using event {event:?}")]
    InvalidStateTransition {
        from: ResolveState,
        event: ResolveEvent,
    },
}

/// The failure of one resolution stage.
#[derive(Debug, Error)]
pub enum StageError {
    #[error(transparent)]
    Glob(#[from] GlobError),
    #[error(transparent)]
    Theme(#[from] ThemeError),
    #[error(transparent)]
    Animation(#[from] AnimationError),
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("{stage} stage failed: {source}")]
    Stage {
        stage: ResolveStage,
        source: StageError,
    },
    #[error(transparent)]
    State(#[from] StateError),
}

/// Coarse classification for callers that report errors by kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidGlob,
    DuplicateToken,
    InvalidToken,
    InvalidKeyframe,
    InvalidAnimation,
    UnresolvedReference,
    State,
}

impl ResolveError {
    pub fn stage(&self) -> Option<ResolveStage> {
        match self {
            Self::Stage { stage, .. } => Some(*stage),
            Self::State(_) => None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Stage { source, .. } => match source {
                StageError::Glob(_) => ErrorKind::InvalidGlob,
                StageError::Theme(ThemeError::DuplicateToken { .. }) => ErrorKind::DuplicateToken,
                StageError::Theme(_) => ErrorKind::InvalidToken,
                StageError::Animation(AnimationError::InvalidKeyframe { .. }) => {
                    ErrorKind::InvalidKeyframe
                }
                StageError::Animation(AnimationError::InvalidAnimation { .. }) => {
                    ErrorKind::InvalidAnimation
                }
                StageError::Animation(AnimationError::UnresolvedReference { .. }) => {
                    ErrorKind::UnresolvedReference
                }
            },
            Self::State(_) => ErrorKind::State,
        }
    }
}
