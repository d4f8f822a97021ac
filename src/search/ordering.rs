use crate::board::Position;
use crate::search::eval::piece_value;
use crate::types::{Move, PieceKind};

pub trait MoveOrderer {
    /// Reorders `moves` best-first. Never adds or removes moves. `hint` is the
    /// transposition table's best move for this node, if any.
    fn order<P: Position>(&self, pos: &P, moves: &mut Vec<Move>, hint: Option<Move>);
}

/// Captures by MVV-LVA, then quiet moves in generation order. The hint, when
/// present in the list, goes first.
#[derive(Clone, Copy, Debug)]
pub struct MvvLva {
    pub use_hint: bool,
}

impl Default for MvvLva {
    fn default() -> Self { Self { use_hint: true } }
}

impl MvvLva {
    /// `10 * victim - attacker`, material values only. `None` for quiet moves.
    pub fn capture_score<P: Position>(pos: &P, mv: Move) -> Option<i32> {
        let (_, victim) = pos.captured(mv)?;
        let attacker = pos.piece_at(mv.from)?;
        Some(10 * piece_value(victim.kind) - piece_value(attacker.kind))
    }
}

impl MoveOrderer for MvvLva {
    fn order<P: Position>(&self, pos: &P, moves: &mut Vec<Move>, hint: Option<Move>) {
        let mut captures: Vec<(i32, Move)> = Vec::with_capacity(moves.len());
        let mut quiet: Vec<Move> = Vec::with_capacity(moves.len());
        for &m in moves.iter() {
            match Self::capture_score(pos, m) {
                Some(s) => captures.push((s, m)),
                None => quiet.push(m),
            }
        }
        // stable: equal scores keep generation order
        captures.sort_by_key(|&(s, _)| -s);
        moves.clear();
        moves.extend(captures.into_iter().map(|(_, m)| m));
        moves.extend(quiet);
        if self.use_hint {
            promote(moves, hint);
        }
    }
}

/// MVV-LVA plus flat bonuses: check +50, castling +60, promotion +900 (+100
/// more for a queen). Ties keep generation order; the hint still goes first.
#[derive(Clone, Copy, Debug)]
pub struct HeuristicOrder {
    pub use_hint: bool,
}

impl Default for HeuristicOrder {
    fn default() -> Self { Self { use_hint: true } }
}

impl HeuristicOrder {
    pub const CHECK_BONUS: i32 = 50;
    pub const CASTLE_BONUS: i32 = 60;
    pub const PROMOTION_BONUS: i32 = 900;
    pub const QUEEN_PROMOTION_BONUS: i32 = 100;

    pub fn move_score<P: Position>(pos: &P, mv: Move) -> i32 {
        let mut score = MvvLva::capture_score(pos, mv).unwrap_or(0);
        if pos.gives_check(mv) { score += Self::CHECK_BONUS; }
        if pos.is_castling(mv) { score += Self::CASTLE_BONUS; }
        match mv.promotion {
            Some(PieceKind::Queen) => score += Self::PROMOTION_BONUS + Self::QUEEN_PROMOTION_BONUS,
            Some(_) => score += Self::PROMOTION_BONUS,
            None => {}
        }
        score
    }
}

impl MoveOrderer for HeuristicOrder {
    fn order<P: Position>(&self, pos: &P, moves: &mut Vec<Move>, hint: Option<Move>) {
        let mut scored: Vec<(i32, Move)> = moves.iter().map(|&m| (Self::move_score(pos, m), m)).collect();
        scored.sort_by_key(|&(s, _)| -s);
        moves.clear();
        moves.extend(scored.into_iter().map(|(_, m)| m));
        if self.use_hint {
            promote(moves, hint);
        }
    }
}

/// Leaves moves in the backend's generation order.
#[derive(Clone, Copy, Debug, Default)]
pub struct GenerationOrder;

impl MoveOrderer for GenerationOrder {
    fn order<P: Position>(&self, _pos: &P, _moves: &mut Vec<Move>, _hint: Option<Move>) {}
}

fn promote(moves: &mut Vec<Move>, hint: Option<Move>) {
    if let Some(h) = hint {
        if let Some(pos) = moves.iter().position(|&m| m == h) {
            let mv = moves.remove(pos);
            moves.insert(0, mv);
        }
    }
}
