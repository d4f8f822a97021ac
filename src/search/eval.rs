use std::ops::{Add, AddAssign, Neg, Sub};

use serde::{Deserialize, Serialize};

use crate::board::{castling_rook_squares, Position};
use crate::error::SearchError;
use crate::search::pst::{self, Table};
use crate::types::{Color, Move, Piece, PieceKind, Square};

pub const PAWN: i32 = 100;
pub const KNIGHT: i32 = 300;
pub const BISHOP: i32 = 300;
pub const ROOK: i32 = 500;
pub const QUEEN: i32 = 900;
pub const KING: i32 = 20_000;

/// Non-pawn, non-king material of the opening position (both sides).
pub const PHASE_TOTAL: i32 = 2 * (2 * KNIGHT + 2 * BISHOP + 2 * ROOK + QUEEN);

// Mate scoring: a mated side scores -(MATE_SCORE + remaining depth).
pub const MATE_SCORE: i32 = 1_000_000;
pub const DRAW_SCORE: i32 = 0;
pub const INF: i32 = 1_000_000_000;

#[inline]
pub fn piece_value(kind: PieceKind) -> i32 {
    match kind {
        PieceKind::Pawn => PAWN,
        PieceKind::Knight => KNIGHT,
        PieceKind::Bishop => BISHOP,
        PieceKind::Rook => ROOK,
        PieceKind::Queen => QUEEN,
        PieceKind::King => KING,
    }
}

#[inline]
fn phase_weight(kind: PieceKind) -> i32 {
    match kind {
        PieceKind::Pawn | PieceKind::King => 0,
        k => piece_value(k),
    }
}

#[inline]
pub fn is_mate_score(score: i32) -> bool { score.abs() >= MATE_SCORE }

/// White-relative evaluation accumulator. A move's delta is also an `EvalTerms`,
/// so incremental updates are plain component-wise addition.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct EvalTerms {
    pub material: i32,
    pub mg: i32,
    pub eg: i32,
    /// Non-pawn, non-king material on the board, both colours.
    pub phase: i32,
}

impl Add for EvalTerms {
    type Output = EvalTerms;
    fn add(self, o: EvalTerms) -> EvalTerms {
        EvalTerms { material: self.material + o.material, mg: self.mg + o.mg, eg: self.eg + o.eg, phase: self.phase + o.phase }
    }
}

impl AddAssign for EvalTerms {
    fn add_assign(&mut self, o: EvalTerms) { *self = *self + o; }
}

impl Neg for EvalTerms {
    type Output = EvalTerms;
    fn neg(self) -> EvalTerms {
        EvalTerms { material: -self.material, mg: -self.mg, eg: -self.eg, phase: -self.phase }
    }
}

impl Sub for EvalTerms {
    type Output = EvalTerms;
    fn sub(self, o: EvalTerms) -> EvalTerms { self + -o }
}

/// Game phase in [0, 1]; 1.0 with all minor and major pieces on the board.
pub fn phase_fraction(terms: &EvalTerms) -> f32 {
    terms.phase.clamp(0, PHASE_TOTAL) as f32 / PHASE_TOTAL as f32
}

pub trait Evaluator {
    /// Full recomputation, white-relative.
    fn evaluate_terms<P: Position>(&self, pos: &P) -> EvalTerms;

    /// Change in `evaluate_terms` caused by `mv`, computed from the squares it touches.
    fn delta_evaluate<P: Position>(&self, pos: &P, mv: Move) -> Result<EvalTerms, SearchError>;

    /// Collapses terms into a scalar for `side` (negamax convention).
    fn score(&self, terms: &EvalTerms, side: Color) -> i32;

    /// Leaf score for the side to move from the running `terms`. Position-wide
    /// terms that are not kept incrementally get added here.
    fn leaf_score<P: Position>(&self, pos: &P, terms: &EvalTerms) -> i32 {
        self.score(terms, pos.side_to_move())
    }

    /// Score for the side about to move.
    fn full_evaluate<P: Position>(&self, pos: &P) -> i32 {
        self.leaf_score(pos, &self.evaluate_terms(pos))
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvalMode {
    /// Material only.
    Material,
    /// One piece-square table per piece kind.
    #[default]
    Static,
    /// Middlegame and endgame tables blended by game phase.
    Tapered,
}

#[derive(Clone, Debug)]
pub struct PieceSquareEvaluator {
    mode: EvalMode,
    mg: [Table; 6],
    eg: [Table; 6],
    mobility_weight: i32,
}

impl Default for PieceSquareEvaluator {
    fn default() -> Self { Self::new(EvalMode::default()) }
}

impl PieceSquareEvaluator {
    pub fn new(mode: EvalMode) -> Self {
        let (mg, eg) = match mode {
            EvalMode::Material => ([pst::ZERO; 6], [pst::ZERO; 6]),
            EvalMode::Static => {
                let t = [pst::PAWN, pst::KNIGHT, pst::BISHOP, pst::ROOK, pst::QUEEN, pst::KING];
                (t, t)
            }
            EvalMode::Tapered => (
                [pst::MG_PAWN, pst::MG_KNIGHT, pst::MG_BISHOP, pst::MG_ROOK, pst::MG_QUEEN, pst::MG_KING],
                [pst::EG_PAWN, pst::EG_KNIGHT, pst::EG_BISHOP, pst::EG_ROOK, pst::EG_QUEEN, pst::EG_KING],
            ),
        };
        Self { mode, mg, eg, mobility_weight: 0 }
    }

    /// Adds `weight * (white mobility - black mobility)` at leaves. 0 disables it.
    pub fn with_mobility(mut self, weight: i32) -> Self {
        self.mobility_weight = weight;
        self
    }

    pub fn mode(&self) -> EvalMode { self.mode }

    pub fn mobility_weight(&self) -> i32 { self.mobility_weight }

    /// White-relative contribution of `piece` standing on `sq`.
    #[inline]
    fn placed(&self, piece: Piece, sq: Square) -> EvalTerms {
        let idx = if piece.color == Color::White { sq.index() } else { sq.mirror().index() };
        let k = piece.kind.index();
        let sign = piece.color.sign();
        EvalTerms {
            material: sign * piece_value(piece.kind),
            mg: sign * self.mg[k][idx],
            eg: sign * self.eg[k][idx],
            phase: phase_weight(piece.kind),
        }
    }

    pub fn game_phase<P: Position>(&self, pos: &P) -> f32 {
        phase_fraction(&self.evaluate_terms(pos))
    }
}

impl Evaluator for PieceSquareEvaluator {
    fn evaluate_terms<P: Position>(&self, pos: &P) -> EvalTerms {
        Square::all()
            .filter_map(|sq| pos.piece_at(sq).map(|p| self.placed(p, sq)))
            .fold(EvalTerms::default(), |acc, t| acc + t)
    }

    fn delta_evaluate<P: Position>(&self, pos: &P, mv: Move) -> Result<EvalTerms, SearchError> {
        if !pos.is_legal(mv) {
            return Err(SearchError::invalid(mv, "not legal in this position"));
        }
        let stm = pos.side_to_move();
        let mover = pos.piece_at(mv.from).ok_or_else(|| SearchError::invalid(mv, "no piece on source square"))?;

        let landed = match mv.promotion {
            Some(kind) if mover.kind == PieceKind::Pawn => Piece::new(stm, kind),
            Some(_) => return Err(SearchError::invalid(mv, "promotion by a non-pawn")),
            None => mover,
        };
        let mut delta = self.placed(landed, mv.to) - self.placed(mover, mv.from);

        if let Some((sq, victim)) = pos.captured(mv) {
            delta = delta - self.placed(victim, sq);
        }

        if pos.is_castling(mv) {
            let (rook_from, rook_to) = castling_rook_squares(mv.to)
                .ok_or_else(|| SearchError::invalid(mv, "castling to an unexpected square"))?;
            let rook = Piece::new(stm, PieceKind::Rook);
            delta = delta + self.placed(rook, rook_to) - self.placed(rook, rook_from);
        }
        Ok(delta)
    }

    fn score(&self, terms: &EvalTerms, side: Color) -> i32 {
        let positional = match self.mode {
            EvalMode::Tapered => {
                let phase = terms.phase.clamp(0, PHASE_TOTAL);
                (terms.mg * phase + terms.eg * (PHASE_TOTAL - phase)) / PHASE_TOTAL
            }
            EvalMode::Material | EvalMode::Static => terms.mg,
        };
        side.sign() * (terms.material + positional)
    }

    fn leaf_score<P: Position>(&self, pos: &P, terms: &EvalTerms) -> i32 {
        let side = pos.side_to_move();
        let base = self.score(terms, side);
        if self.mobility_weight == 0 { return base; }
        let diff = pos.mobility(Color::White) as i32 - pos.mobility(Color::Black) as i32;
        base + side.sign() * self.mobility_weight * diff
    }
}
