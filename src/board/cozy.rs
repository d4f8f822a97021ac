use cozy_chess::{Board, Color as CozyColor, File, Piece as CozyPiece, Square as CozySquare};

use crate::board::Position;
use crate::error::SearchError;
use crate::types::{Color, Move, Piece, PieceKind, Square};

/// `cozy_chess::Board` with an undo stack. cozy boards are immutable-move
/// values, so each apply snapshots the previous board.
#[derive(Clone, Debug)]
pub struct CozyPosition {
    board: Board,
    history: Vec<Board>,
}

impl Default for CozyPosition {
    fn default() -> Self { Self::startpos() }
}

impl CozyPosition {
    pub fn startpos() -> Self {
        Self { board: Board::default(), history: Vec::with_capacity(128) }
    }

    pub fn from_fen(fen: &str) -> Result<Self, SearchError> {
        Board::from_fen(fen, false)
            .map(Self::from_board)
            .map_err(|e| SearchError::InvalidFen(format!("{e:?}")))
    }

    pub fn from_board(board: Board) -> Self {
        Self { board, history: Vec::with_capacity(128) }
    }

    pub fn board(&self) -> &Board { &self.board }

    pub fn fen(&self) -> String { format!("{}", self.board) }

    /// Number of applied moves that can still be undone.
    pub fn ply(&self) -> usize { self.history.len() }

    pub fn find_uci(&self, uci: &str) -> Option<Move> {
        let wanted: Move = uci.parse().ok()?;
        self.legal_moves().into_iter().find(|&m| m == wanted)
    }

    pub fn apply_uci(&mut self, uci: &str) -> Result<(), SearchError> {
        let mv = self.find_uci(uci).ok_or_else(|| SearchError::ParseMove(uci.to_string()))?;
        self.apply(mv)
    }

    /// cozy encodes castling as king-takes-own-rook; the core uses the king's two-square step.
    fn to_core(&self, m: cozy_chess::Move) -> Move {
        let from = square_from(m.from);
        let mut to = square_from(m.to);
        let castles = self.board.piece_on(m.from) == Some(CozyPiece::King)
            && self.board.color_on(m.to) == self.board.color_on(m.from);
        if castles {
            let file = if to.file() > from.file() { 6 } else { 2 };
            to = Square::from_coords(file, from.rank()).unwrap_or(to);
        }
        Move { from, to, promotion: m.promotion.map(kind_from) }
    }

    fn to_backend(&self, mv: Move) -> cozy_chess::Move {
        let from = square_to(mv.from);
        let mut to = square_to(mv.to);
        if self.board.piece_on(from) == Some(CozyPiece::King) && mv.from.file().abs_diff(mv.to.file()) == 2 {
            let rook_file = if mv.to.file() > mv.from.file() { File::H } else { File::A };
            to = CozySquare::new(rook_file, from.rank());
        }
        cozy_chess::Move { from, to, promotion: mv.promotion.map(kind_to) }
    }
}

impl Position for CozyPosition {
    fn legal_moves(&self) -> Vec<Move> {
        let mut out = Vec::with_capacity(64);
        self.board.generate_moves(|ml| {
            for m in ml { out.push(self.to_core(m)); }
            false
        });
        out
    }

    fn apply(&mut self, mv: Move) -> Result<(), SearchError> {
        let cm = self.to_backend(mv);
        if !self.board.is_legal(cm) {
            return Err(SearchError::invalid(mv, "not legal in this position"));
        }
        self.history.push(self.board.clone());
        self.board.play_unchecked(cm);
        Ok(())
    }

    fn undo(&mut self) -> Result<(), SearchError> {
        self.board = self.history.pop().ok_or(SearchError::NothingToUndo)?;
        Ok(())
    }

    fn side_to_move(&self) -> Color { color_from(self.board.side_to_move()) }

    fn in_check(&self) -> bool { !self.board.checkers().is_empty() }

    fn piece_at(&self, sq: Square) -> Option<Piece> {
        let s = square_to(sq);
        let kind = self.board.piece_on(s)?;
        let color = self.board.color_on(s)?;
        Some(Piece::new(color_from(color), kind_from(kind)))
    }

    fn key(&self) -> u64 { self.board.hash() }

    fn gives_check(&self, mv: Move) -> bool {
        let cm = self.to_backend(mv);
        if !self.board.is_legal(cm) { return false; }
        let mut next = self.board.clone();
        next.play_unchecked(cm);
        !next.checkers().is_empty()
    }

    fn is_legal(&self, mv: Move) -> bool { self.board.is_legal(self.to_backend(mv)) }

    fn is_en_passant(&self, mv: Move) -> bool {
        self.board.piece_on(square_to(mv.from)) == Some(CozyPiece::Pawn)
            && mv.from.file() != mv.to.file()
            && self.board.piece_on(square_to(mv.to)).is_none()
    }
}

fn square_from(sq: CozySquare) -> Square {
    Square::new(sq as u8).unwrap_or(Square::A1)
}

fn square_to(sq: Square) -> CozySquare {
    CozySquare::index(sq.index())
}

fn color_from(c: CozyColor) -> Color {
    match c { CozyColor::White => Color::White, CozyColor::Black => Color::Black }
}

fn kind_from(p: CozyPiece) -> PieceKind {
    match p {
        CozyPiece::Pawn => PieceKind::Pawn,
        CozyPiece::Knight => PieceKind::Knight,
        CozyPiece::Bishop => PieceKind::Bishop,
        CozyPiece::Rook => PieceKind::Rook,
        CozyPiece::Queen => PieceKind::Queen,
        CozyPiece::King => PieceKind::King,
    }
}

fn kind_to(p: PieceKind) -> CozyPiece {
    match p {
        PieceKind::Pawn => CozyPiece::Pawn,
        PieceKind::Knight => CozyPiece::Knight,
        PieceKind::Bishop => CozyPiece::Bishop,
        PieceKind::Rook => CozyPiece::Rook,
        PieceKind::Queen => CozyPiece::Queen,
        PieceKind::King => CozyPiece::King,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn castling_uses_king_step() {
        let pos = CozyPosition::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let moves: Vec<String> = pos.legal_moves().iter().map(|m| m.to_string()).collect();
        assert!(moves.contains(&"e1g1".to_string()), "{moves:?}");
        assert!(moves.contains(&"e1c1".to_string()), "{moves:?}");
        assert!(!moves.contains(&"e1h1".to_string()));
    }

    #[test]
    fn castling_round_trips_through_apply() {
        let mut pos = CozyPosition::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let mv = pos.find_uci("e1g1").unwrap();
        assert!(pos.is_castling(mv));
        pos.apply(mv).unwrap();
        assert_eq!(pos.piece_at(Square::F1), Some(Piece::new(Color::White, PieceKind::Rook)));
        assert_eq!(pos.piece_at(Square::G1), Some(Piece::new(Color::White, PieceKind::King)));
        pos.undo().unwrap();
        assert_eq!(pos.piece_at(Square::H1), Some(Piece::new(Color::White, PieceKind::Rook)));
    }

    #[test]
    fn gives_check_leaves_board_alone() {
        let pos = CozyPosition::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 0 1").unwrap();
        let before = pos.fen();
        assert!(pos.gives_check(pos.find_uci("a1a8").unwrap()));
        assert!(!pos.gives_check(pos.find_uci("a1a7").unwrap()));
        assert_eq!(pos.fen(), before);
    }

    #[test]
    fn illegal_apply_and_empty_undo_fail() {
        let mut pos = CozyPosition::startpos();
        let bogus: Move = "e2e5".parse().unwrap();
        assert!(matches!(pos.apply(bogus), Err(SearchError::InvalidMove { .. })));
        assert_eq!(pos.undo(), Err(SearchError::NothingToUndo));
    }
}
