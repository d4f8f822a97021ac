pub mod alphabeta;
pub mod eval;
pub mod line;
pub mod ordering;
pub mod pst;
pub mod tt;

pub use alphabeta::{SearchParams, SearchResult, SearchStats, Searcher, TieBreak, MAX_DEPTH};
pub use eval::{EvalMode, EvalTerms, Evaluator, PieceSquareEvaluator, MATE_SCORE};
pub use ordering::{GenerationOrder, HeuristicOrder, MoveOrderer, MvvLva};
pub use tt::{Bound, TranspositionTable};
