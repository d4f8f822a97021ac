use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::search::eval::{EvalMode, PieceSquareEvaluator};
use crate::search::ordering::MvvLva;
use crate::search::tt::TranspositionTable;
use crate::search::{SearchParams, Searcher};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading config: {0}")]
    Io(#[from] std::io::Error),
    #[error("parsing config: {0}")]
    Json(#[from] serde_json::Error),
}

/// Everything needed to build a [`Searcher`]. Missing JSON fields take defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub search: SearchParams,
    pub eval: EvalMode,
    /// Transposition table size in MB.
    pub hash_mb: usize,
    /// Try the transposition table's move first.
    pub use_hint: bool,
    /// Centipawns per move of pseudo-legal mobility difference; 0 disables it.
    pub mobility_weight: i32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { search: SearchParams::default(), eval: EvalMode::default(), hash_mb: 16, use_hint: true, mobility_weight: 0 }
    }
}

impl EngineConfig {
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn build_searcher(&self) -> Searcher<PieceSquareEvaluator, MvvLva> {
        Searcher::new(PieceSquareEvaluator::new(self.eval).with_mobility(self.mobility_weight), MvvLva { use_hint: self.use_hint }, self.search)
            .with_tt(TranspositionTable::with_capacity_mb(self.hash_mb))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::TieBreak;

    #[test]
    fn partial_json_fills_defaults() {
        let cfg = EngineConfig::from_json_str(r#"{ "search": { "depth": 6, "tie_break": "random" }, "eval": "tapered" }"#).unwrap();
        assert_eq!(cfg.search.depth, 6);
        assert_eq!(cfg.search.tie_break, TieBreak::Random);
        assert!(cfg.search.use_tt);
        assert_eq!(cfg.eval, EvalMode::Tapered);
        assert_eq!(cfg.hash_mb, 16);
        assert_eq!(cfg.mobility_weight, 0);
    }

    #[test]
    fn bad_json_is_an_error() {
        assert!(matches!(EngineConfig::from_json_str("{ depth: }"), Err(ConfigError::Json(_))));
    }
}
