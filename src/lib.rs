//! Fixed-depth negamax alpha-beta move selection over a pluggable board
//! backend, with incrementally maintained piece-square evaluation.

pub mod board;
pub mod config;
pub mod error;
pub mod search;
pub mod types;

pub use board::{perft, CozyPosition, Position};
pub use config::EngineConfig;
pub use error::SearchError;
pub use search::{SearchParams, SearchResult, Searcher, TieBreak};
pub use types::{Color, Move, Piece, PieceKind, Square};
