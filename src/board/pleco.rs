#![cfg(feature = "board-pleco")]
use pleco::{BitMove, Board as PlecoBoard, Piece as PlecoPiece, PieceType, Player, SQ};

use crate::board::Position;
use crate::error::SearchError;
use crate::types::{Color, Move, Piece, PieceKind, Square};

/// Pleco board using its native make/unmake.
pub struct PlecoPosition {
    board: PlecoBoard,
    applied: usize,
}

impl PlecoPosition {
    pub fn from_fen(fen: &str) -> Result<Self, SearchError> {
        PlecoBoard::from_fen(fen)
            .map(|b| Self { board: b, applied: 0 })
            .map_err(|e| SearchError::InvalidFen(format!("{e:?}")))
    }

    pub fn startpos() -> Self { Self { board: PlecoBoard::start_pos(), applied: 0 } }

    fn to_core(m: BitMove) -> Move {
        let from = Square::new(m.get_src().0).unwrap_or(Square::A1);
        let mut to = Square::new(m.get_dest().0).unwrap_or(Square::A1);
        if m.is_castle() {
            let file = if to.file() > from.file() { 6 } else { 2 };
            to = Square::from_coords(file, from.rank()).unwrap_or(to);
        }
        let promotion = if m.is_promo() { kind_from(m.promo_piece()) } else { None };
        Move { from, to, promotion }
    }

    fn find(&self, mv: Move) -> Option<BitMove> {
        self.board.generate_moves().iter().copied().find(|&m| Self::to_core(m) == mv)
    }
}

impl Position for PlecoPosition {
    fn legal_moves(&self) -> Vec<Move> {
        self.board.generate_moves().iter().map(|&m| Self::to_core(m)).collect()
    }

    fn apply(&mut self, mv: Move) -> Result<(), SearchError> {
        let bm = self.find(mv).ok_or_else(|| SearchError::invalid(mv, "not legal in this position"))?;
        self.board.apply_move(bm);
        self.applied += 1;
        Ok(())
    }

    fn undo(&mut self) -> Result<(), SearchError> {
        if self.applied == 0 { return Err(SearchError::NothingToUndo); }
        self.board.undo_move();
        self.applied -= 1;
        Ok(())
    }

    fn side_to_move(&self) -> Color { color_from(self.board.turn()) }

    fn in_check(&self) -> bool { self.board.in_check() }

    fn piece_at(&self, sq: Square) -> Option<Piece> {
        let p = self.board.piece_at_sq(SQ(sq.index() as u8));
        if p == PlecoPiece::None { return None; }
        let kind = kind_from(p.type_of())?;
        Some(Piece::new(color_from(p.player_lossy()), kind))
    }

    fn key(&self) -> u64 { self.board.zobrist() }

    fn gives_check(&self, mv: Move) -> bool {
        self.find(mv).map_or(false, |bm| self.board.gives_check(bm))
    }

    fn is_legal(&self, mv: Move) -> bool { self.find(mv).is_some() }
}

fn color_from(p: Player) -> Color {
    match p { Player::White => Color::White, Player::Black => Color::Black }
}

fn kind_from(pt: PieceType) -> Option<PieceKind> {
    match pt {
        PieceType::P => Some(PieceKind::Pawn),
        PieceType::N => Some(PieceKind::Knight),
        PieceType::B => Some(PieceKind::Bishop),
        PieceType::R => Some(PieceKind::Rook),
        PieceType::Q => Some(PieceKind::Queen),
        PieceType::K => Some(PieceKind::King),
        _ => None,
    }
}
