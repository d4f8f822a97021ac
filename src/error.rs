use thiserror::Error;

use crate::search::eval::EvalTerms;
use crate::types::Move;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error("invalid move {mv}: {reason}")]
    InvalidMove { mv: Move, reason: &'static str },

    /// A non-terminal node produced no moves. Terminal detection runs first, so
    /// reaching this is a bug.
    #[error("empty move set at a non-terminal node")]
    EmptyMoveSet,

    #[error("undo requested with no applied move")]
    NothingToUndo,

    #[error("no legal moves in position (checkmate: {checkmate})")]
    GameOver { checkmate: bool },

    #[error("incremental evaluation {incremental:?} differs from full recomputation {full:?}")]
    EvalDrift { incremental: EvalTerms, full: EvalTerms },

    #[error("FEN error: {0}")]
    InvalidFen(String),

    #[error("cannot parse move `{0}`")]
    ParseMove(String),
}

impl SearchError {
    pub(crate) fn invalid(mv: Move, reason: &'static str) -> Self {
        SearchError::InvalidMove { mv, reason }
    }
}
