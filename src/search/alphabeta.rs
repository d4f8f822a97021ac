use std::time::{Duration, Instant};

use log::{debug, trace, warn};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::board::Position;
use crate::error::SearchError;
use crate::search::eval::{Evaluator, PieceSquareEvaluator, DRAW_SCORE, INF, MATE_SCORE};
use crate::search::line::SearchLine;
use crate::search::ordering::{MoveOrderer, MvvLva};
use crate::search::tt::{Bound, TranspositionTable};
use crate::types::Move;

pub const MAX_DEPTH: u32 = 64;

// Stored mate scores are node-relative and may sit up to MAX_DEPTH below MATE_SCORE.
const MATE_BOUND: i32 = MATE_SCORE - MAX_DEPTH as i32;

/// How the root picks among moves with equal best scores.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TieBreak {
    /// First equal-best move in search order.
    #[default]
    First,
    /// Uniformly random among all equal-best moves.
    Random,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchParams {
    /// Depth used by [`Searcher::think`]; `search`/`select_move` take theirs explicitly.
    pub depth: u32,
    pub use_tt: bool,
    /// Beta cutoffs. Off gives a plain exhaustive negamax over the same tree.
    pub pruning: bool,
    pub tie_break: TieBreak,
    pub seed: Option<u64>,
    /// Time budget; enables iterative deepening up to `depth`.
    pub movetime_ms: Option<u64>,
    /// Recompute the evaluation at every node and fail on any mismatch.
    pub verify_incremental: bool,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            depth: 4,
            use_tt: true,
            pruning: true,
            tie_break: TieBreak::First,
            seed: None,
            movetime_ms: None,
            verify_incremental: false,
        }
    }
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchStats {
    pub nodes: u64,
    pub tt_hits: u64,
    pub tt_cutoffs: u64,
    pub beta_cutoffs: u64,
    pub elapsed: Duration,
}

#[derive(Debug, Clone)]
pub struct SearchResult {
    pub best_move: Move,
    pub score: i32,
    /// Deepest fully completed iteration.
    pub depth: u32,
    pub stats: SearchStats,
}

/// Negamax alpha-beta over any [`Position`], parameterised by evaluator and orderer.
pub struct Searcher<E = PieceSquareEvaluator, O = MvvLva> {
    evaluator: E,
    orderer: O,
    tt: TranspositionTable,
    params: SearchParams,
    stats: SearchStats,
    rng: SmallRng,
    deadline: Option<Instant>,
    stopped: bool,
}

impl Default for Searcher {
    fn default() -> Self {
        Searcher::new(PieceSquareEvaluator::default(), MvvLva::default(), SearchParams::default())
    }
}

impl<E: Evaluator, O: MoveOrderer> Searcher<E, O> {
    pub fn new(evaluator: E, orderer: O, params: SearchParams) -> Self {
        let rng = match params.seed {
            Some(s) => SmallRng::seed_from_u64(s),
            None => SmallRng::from_entropy(),
        };
        Self {
            evaluator,
            orderer,
            tt: TranspositionTable::default(),
            params,
            stats: SearchStats::default(),
            rng,
            deadline: None,
            stopped: false,
        }
    }

    pub fn with_tt(mut self, tt: TranspositionTable) -> Self {
        self.tt = tt;
        self
    }

    pub fn params(&self) -> &SearchParams { &self.params }

    pub fn set_params(&mut self, params: SearchParams) {
        if let Some(seed) = params.seed.filter(|_| params.seed != self.params.seed) {
            self.rng = SmallRng::seed_from_u64(seed);
        }
        self.params = params;
    }

    pub fn evaluator(&self) -> &E { &self.evaluator }

    pub fn tt(&self) -> &TranspositionTable { &self.tt }

    /// Statistics of the most recent search.
    pub fn stats(&self) -> SearchStats { self.stats }

    /// Drops cached results; call between unrelated games.
    pub fn new_game(&mut self) { self.tt.clear(); }

    pub fn select_move<P: Position>(&mut self, pos: &mut P, depth: u32) -> Result<Move, SearchError> {
        self.search(pos, depth).map(|r| r.best_move)
    }

    /// [`Searcher::search`] to the configured `SearchParams::depth`.
    pub fn think<P: Position>(&mut self, pos: &mut P) -> Result<SearchResult, SearchError> {
        self.search(pos, self.params.depth)
    }

    /// Searches `pos` to `depth` plies (or until the time budget runs out) and
    /// returns the chosen move. `pos` is restored before returning.
    pub fn search<P: Position>(&mut self, pos: &mut P, depth: u32) -> Result<SearchResult, SearchError> {
        let depth = match depth {
            0 => { warn!("search depth 0 requested, searching 1 ply"); 1 }
            d if d > MAX_DEPTH => { warn!("search depth {d} clamped to {MAX_DEPTH}"); MAX_DEPTH }
            d => d,
        };
        if pos.legal_moves().is_empty() {
            return Err(SearchError::GameOver { checkmate: pos.in_check() });
        }

        let start = Instant::now();
        self.stats = SearchStats::default();
        self.stopped = false;
        self.deadline = self.params.movetime_ms.map(|ms| start + Duration::from_millis(ms));

        let (best_move, score, reached) = if self.deadline.is_some() {
            let mut done = None;
            for d in 1..=depth {
                let Some((mv, sc)) = self.root(pos, d, d > 1)? else { break };
                debug!("iteration depth={d} best={mv} score={sc} nodes={}", self.stats.nodes);
                done = Some((mv, sc, d));
            }
            done.ok_or(SearchError::EmptyMoveSet)?
        } else {
            let (mv, sc) = self.root(pos, depth, false)?.ok_or(SearchError::EmptyMoveSet)?;
            (mv, sc, depth)
        };

        self.stats.elapsed = start.elapsed();
        debug!(
            "search depth={reached} best={best_move} score={score} nodes={} tt_hits={} tt_cutoffs={} beta_cutoffs={} hashfull={} elapsed={:?}",
            self.stats.nodes, self.stats.tt_hits, self.stats.tt_cutoffs, self.stats.beta_cutoffs, self.tt.hashfull(), self.stats.elapsed
        );
        Ok(SearchResult { best_move, score, depth: reached, stats: self.stats })
    }

    /// Every root move with its full-window score at `depth`, best first.
    pub fn score_root_moves<P: Position>(&mut self, pos: &mut P, depth: u32) -> Result<Vec<(Move, i32)>, SearchError> {
        let depth = depth.clamp(1, MAX_DEPTH);
        self.stopped = false;
        self.deadline = None;
        let mut moves = pos.legal_moves();
        self.orderer.order(pos, &mut moves, None);
        let initial = self.evaluator.evaluate_terms(pos);
        let mut line = SearchLine::new(pos, initial);
        let mut out = Vec::with_capacity(moves.len());
        for mv in moves {
            let delta = self.evaluator.delta_evaluate(line.position(), mv)?;
            let mut child = line.play(mv, delta)?;
            let sc = -self.negamax(&mut *child, depth - 1, -INF, INF, false)?;
            out.push((mv, sc));
        }
        out.sort_by_key(|&(_, sc)| -sc);
        Ok(out)
    }

    /// `None` when the deadline interrupted this iteration.
    fn root<P: Position>(&mut self, pos: &mut P, depth: u32, can_stop: bool) -> Result<Option<(Move, i32)>, SearchError> {
        let key = pos.key();
        let hint = if self.params.use_tt { self.tt.lookup(key).and_then(|e| e.best) } else { None };
        let mut moves = pos.legal_moves();
        if moves.is_empty() { return Err(SearchError::EmptyMoveSet); }
        self.orderer.order(pos, &mut moves, hint);

        let initial = self.evaluator.evaluate_terms(pos);
        let mut line = SearchLine::new(pos, initial);
        let mut alpha = -INF;
        let beta = INF;
        let mut best_score = -INF;
        let mut tied: Vec<Move> = Vec::new();
        for mv in moves {
            let delta = self.evaluator.delta_evaluate(line.position(), mv)?;
            // Random ties need exact scores for every equal-best move, so keep the window open by one.
            let a = if self.params.tie_break == TieBreak::Random && alpha > -INF { alpha - 1 } else { alpha };
            let score = {
                let mut child = line.play(mv, delta)?;
                -self.negamax(&mut *child, depth - 1, -beta, -a, can_stop)?
            };
            if self.stopped { return Ok(None); }
            trace!("root depth={depth} move={mv} score={score}");
            if score > best_score {
                best_score = score;
                tied.clear();
                tied.push(mv);
            } else if score == best_score {
                tied.push(mv);
            }
            if self.params.pruning && score > alpha { alpha = score; }
        }

        let best = match (self.params.tie_break, tied.len()) {
            (_, 0) => return Err(SearchError::EmptyMoveSet),
            (TieBreak::Random, n) if n > 1 => tied[self.rng.gen_range(0..n)],
            _ => tied[0],
        };
        if self.params.use_tt {
            self.tt.store(key, depth, score_to_tt(best_score, depth), Bound::Exact, Some(best));
        }
        Ok(Some((best, best_score)))
    }

    fn negamax<P: Position>(
        &mut self,
        line: &mut SearchLine<'_, P>,
        depth: u32,
        mut alpha: i32,
        beta: i32,
        can_stop: bool,
    ) -> Result<i32, SearchError> {
        self.stats.nodes += 1;
        if can_stop && self.stats.nodes & 1023 == 0 {
            if let Some(dl) = self.deadline { if Instant::now() >= dl { self.stopped = true; } }
        }
        if self.stopped { return Ok(0); }
        if self.params.verify_incremental {
            let full = self.evaluator.evaluate_terms(line.position());
            if full != line.current() {
                return Err(SearchError::EvalDrift { incremental: line.current(), full });
            }
        }

        let key = line.position().key();
        let alpha_orig = alpha;
        let mut hint = None;
        if self.params.use_tt && depth > 0 {
            if let Some(e) = self.tt.lookup(key) {
                self.stats.tt_hits += 1;
                hint = e.best;
                if e.depth >= depth {
                    let s = score_from_tt(e.score, depth);
                    let usable = match e.bound {
                        Bound::Exact => true,
                        Bound::Lower => s >= beta,
                        Bound::Upper => s <= alpha,
                    };
                    if usable {
                        self.stats.tt_cutoffs += 1;
                        return Ok(s);
                    }
                }
            }
        }

        let mut moves = line.position().legal_moves();
        if moves.is_empty() {
            return Ok(terminal_score(line.position().in_check(), depth));
        }
        if depth == 0 {
            return Ok(self.evaluator.leaf_score(line.position(), &line.current()));
        }
        self.orderer.order(line.position(), &mut moves, hint);

        let mut best = -INF;
        let mut best_move = None;
        for mv in moves {
            let delta = self.evaluator.delta_evaluate(line.position(), mv)?;
            let score = {
                let mut child = line.play(mv, delta)?;
                -self.negamax(&mut *child, depth - 1, -beta, -alpha, can_stop)?
            };
            if self.stopped { return Ok(0); }
            if score > best {
                best = score;
                best_move = Some(mv);
            }
            if score > alpha { alpha = score; }
            if self.params.pruning && alpha >= beta {
                self.stats.beta_cutoffs += 1;
                break;
            }
        }

        if self.params.use_tt {
            let bound = if best <= alpha_orig { Bound::Upper } else if best >= beta { Bound::Lower } else { Bound::Exact };
            self.tt.store(key, depth, score_to_tt(best, depth), bound, best_move);
        }
        Ok(best)
    }
}

/// No legal moves: mated (faster mates score higher for the winner) or stalemate.
#[inline]
pub fn terminal_score(in_check: bool, depth: u32) -> i32 {
    if in_check { -(MATE_SCORE + depth as i32) } else { DRAW_SCORE }
}

// Mate scores carry the remaining depth of the mated node; store them
// relative to the storing node so they stay right when reached at another depth.
// A node can see a mate beyond its own horizon through a deeper entry, so both
// directions share the MATE_BOUND threshold.
#[inline]
fn score_to_tt(score: i32, depth: u32) -> i32 {
    if score >= MATE_BOUND { score - depth as i32 } else if score <= -MATE_BOUND { score + depth as i32 } else { score }
}

#[inline]
fn score_from_tt(score: i32, depth: u32) -> i32 {
    if score >= MATE_BOUND { score + depth as i32 } else if score <= -MATE_BOUND { score - depth as i32 } else { score }
}
