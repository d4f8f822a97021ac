//! Position adapter: the board/rules capability the search consumes.
//!
//! The search never touches board internals. It enumerates moves, applies and
//! undoes them in strict LIFO order, and asks a handful of queries.

pub mod cozy;
#[cfg(feature = "board-pleco")]
pub mod pleco;

pub use cozy::CozyPosition;
#[cfg(feature = "board-pleco")]
pub use self::pleco::PlecoPosition;

use crate::error::SearchError;
use crate::types::{Color, Move, Piece, PieceKind, Square};

pub trait Position {
    /// Legal moves for the side to move, in the backend's generation order.
    fn legal_moves(&self) -> Vec<Move>;

    /// Plays `mv` in place. Fails with `InvalidMove` if it is not legal here.
    fn apply(&mut self, mv: Move) -> Result<(), SearchError>;

    /// Reverts the most recent successful `apply`, restoring every field.
    fn undo(&mut self) -> Result<(), SearchError>;

    fn side_to_move(&self) -> Color;

    fn in_check(&self) -> bool;

    fn piece_at(&self, sq: Square) -> Option<Piece>;

    /// Identity key for hashing. Covers placement, side to move, castling and en passant.
    fn key(&self) -> u64;

    /// Whether playing the legal move `mv` puts the opponent in check.
    fn gives_check(&self, mv: Move) -> bool;

    fn is_legal(&self, mv: Move) -> bool {
        self.legal_moves().contains(&mv)
    }

    /// Pawn moving diagonally onto an empty square.
    fn is_en_passant(&self, mv: Move) -> bool {
        match self.piece_at(mv.from) {
            Some(p) if p.kind == PieceKind::Pawn => mv.from.file() != mv.to.file() && self.piece_at(mv.to).is_none(),
            _ => false,
        }
    }

    fn is_capture(&self, mv: Move) -> bool {
        let stm = self.side_to_move();
        matches!(self.piece_at(mv.to), Some(p) if p.color != stm) || self.is_en_passant(mv)
    }

    /// King moving two files.
    fn is_castling(&self, mv: Move) -> bool {
        matches!(self.piece_at(mv.from), Some(p) if p.kind == PieceKind::King)
            && mv.from.file().abs_diff(mv.to.file()) == 2
    }

    /// Square of the pawn taken by an en passant `mv`.
    fn en_passant_victim(&self, mv: Move) -> Option<Square> {
        if self.is_en_passant(mv) { mv.to.behind(self.side_to_move()) } else { None }
    }

    /// Square and piece removed by `mv`, if it captures.
    fn captured(&self, mv: Move) -> Option<(Square, Piece)> {
        if let Some(sq) = self.en_passant_victim(mv) {
            return self.piece_at(sq).map(|p| (sq, p));
        }
        let stm = self.side_to_move();
        self.piece_at(mv.to).filter(|p| p.color != stm).map(|p| (mv.to, p))
    }

    /// Pseudo-legal piece moves for `color`, whoever is to move. Pins and
    /// checks are ignored; castling and en passant are not counted; each
    /// promotion choice counts once.
    fn mobility(&self, color: Color) -> u32 {
        Square::all()
            .filter_map(|sq| self.piece_at(sq).filter(|p| p.color == color).map(|p| (sq, p.kind)))
            .map(|(sq, kind)| piece_mobility(self, sq, color, kind))
            .sum()
    }

    fn is_checkmate(&self) -> bool {
        self.in_check() && self.legal_moves().is_empty()
    }

    fn is_stalemate(&self) -> bool {
        !self.in_check() && self.legal_moves().is_empty()
    }
}

/// Rook source and destination for a castling king move ending on `king_to`.
pub fn castling_rook_squares(king_to: Square) -> Option<(Square, Square)> {
    match king_to {
        Square::G1 => Some((Square::H1, Square::F1)),
        Square::C1 => Some((Square::A1, Square::D1)),
        Square::G8 => Some((Square::H8, Square::F8)),
        Square::C8 => Some((Square::A8, Square::D8)),
        _ => None,
    }
}

/// Counts leaf nodes `depth` plies below `pos` through `apply`/`undo`.
pub fn perft<P: Position>(pos: &mut P, depth: u32) -> Result<u64, SearchError> {
    if depth == 0 { return Ok(1); }
    let moves = pos.legal_moves();
    if depth == 1 { return Ok(moves.len() as u64); }
    let mut nodes = 0u64;
    for mv in moves {
        pos.apply(mv)?;
        let sub = perft(pos, depth - 1);
        pos.undo()?;
        nodes += sub?;
    }
    Ok(nodes)
}

const KNIGHT_STEPS: [(i8, i8); 8] = [(1, 2), (2, 1), (2, -1), (1, -2), (-1, -2), (-2, -1), (-2, 1), (-1, 2)];
const KING_STEPS: [(i8, i8); 8] = [(1, 0), (1, 1), (0, 1), (-1, 1), (-1, 0), (-1, -1), (0, -1), (1, -1)];
const ROOK_DIRS: [(i8, i8); 4] = [(1, 0), (0, 1), (-1, 0), (0, -1)];
const BISHOP_DIRS: [(i8, i8); 4] = [(1, 1), (-1, 1), (-1, -1), (1, -1)];

fn offset(sq: Square, df: i8, dr: i8) -> Option<Square> {
    let f = sq.file() as i8 + df;
    let r = sq.rank() as i8 + dr;
    if (0..8).contains(&f) && (0..8).contains(&r) { Square::from_coords(f as u8, r as u8) } else { None }
}

fn piece_mobility<P: Position + ?Sized>(pos: &P, sq: Square, color: Color, kind: PieceKind) -> u32 {
    let open = |to: Square| pos.piece_at(to).map_or(true, |p| p.color != color);
    let steps = |set: &[(i8, i8)]| set.iter().filter_map(|&(f, r)| offset(sq, f, r)).filter(|&to| open(to)).count() as u32;
    let slides = |dirs: &[(i8, i8)]| {
        let mut n = 0;
        for &(f, r) in dirs {
            let mut cur = sq;
            while let Some(to) = offset(cur, f, r) {
                match pos.piece_at(to) {
                    None => n += 1,
                    Some(p) => { if p.color != color { n += 1; } break; }
                }
                cur = to;
            }
        }
        n
    };
    match kind {
        PieceKind::Pawn => pawn_mobility(pos, sq, color),
        PieceKind::Knight => steps(&KNIGHT_STEPS),
        PieceKind::King => steps(&KING_STEPS),
        PieceKind::Bishop => slides(&BISHOP_DIRS),
        PieceKind::Rook => slides(&ROOK_DIRS),
        PieceKind::Queen => slides(&BISHOP_DIRS) + slides(&ROOK_DIRS),
    }
}

fn pawn_mobility<P: Position + ?Sized>(pos: &P, sq: Square, color: Color) -> u32 {
    let (dir, start_rank, last_rank) = match color { Color::White => (1, 1, 7), Color::Black => (-1, 6, 0) };
    let mut targets = 0u32;
    if let Some(one) = offset(sq, 0, dir).filter(|&t| pos.piece_at(t).is_none()) {
        targets += 1;
        if sq.rank() == start_rank && offset(one, 0, dir).map_or(false, |t| pos.piece_at(t).is_none()) {
            targets += 1;
        }
    }
    for df in [-1, 1] {
        if let Some(t) = offset(sq, df, dir) {
            if matches!(pos.piece_at(t), Some(p) if p.color != color) { targets += 1; }
        }
    }
    // a pawn reaching the last rank has four promotion choices per target
    if sq.rank() as i8 + dir == last_rank { targets * 4 } else { targets }
}
