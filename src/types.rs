use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SearchError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    White,
    Black,
}

impl Color {
    /// +1 for White, -1 for Black. Converts a white-relative score to the given side.
    #[inline]
    pub fn sign(self) -> i32 {
        if self == Color::White { 1 } else { -1 }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    #[inline]
    pub fn index(self) -> usize {
        match self {
            PieceKind::Pawn => 0,
            PieceKind::Knight => 1,
            PieceKind::Bishop => 2,
            PieceKind::Rook => 3,
            PieceKind::Queen => 4,
            PieceKind::King => 5,
        }
    }

    fn from_promotion_char(c: char) -> Option<PieceKind> {
        match c {
            'n' => Some(PieceKind::Knight),
            'b' => Some(PieceKind::Bishop),
            'r' => Some(PieceKind::Rook),
            'q' => Some(PieceKind::Queen),
            _ => None,
        }
    }

    fn promotion_char(self) -> char {
        match self {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Piece {
    pub color: Color,
    pub kind: PieceKind,
}

impl Piece {
    pub fn new(color: Color, kind: PieceKind) -> Self { Self { color, kind } }
}

/// Board square, `rank * 8 + file` with a1 = 0 and h8 = 63.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square(u8);

impl Square {
    pub const A1: Square = Square(0);
    pub const C1: Square = Square(2);
    pub const D1: Square = Square(3);
    pub const F1: Square = Square(5);
    pub const G1: Square = Square(6);
    pub const H1: Square = Square(7);
    pub const A8: Square = Square(56);
    pub const C8: Square = Square(58);
    pub const D8: Square = Square(59);
    pub const F8: Square = Square(61);
    pub const G8: Square = Square(62);
    pub const H8: Square = Square(63);

    pub fn new(index: u8) -> Option<Square> {
        (index < 64).then_some(Square(index))
    }

    pub fn from_coords(file: u8, rank: u8) -> Option<Square> {
        (file < 8 && rank < 8).then(|| Square(rank * 8 + file))
    }

    #[inline]
    pub fn index(self) -> usize { self.0 as usize }
    #[inline]
    pub fn file(self) -> u8 { self.0 & 7 }
    #[inline]
    pub fn rank(self) -> u8 { self.0 >> 3 }

    /// Same file, rank reflected (a1 <-> a8). Lets one table serve both colours.
    #[inline]
    pub fn mirror(self) -> Square { Square(self.0 ^ 56) }

    /// Square one rank towards `color`'s own back rank; `None` off the board.
    pub fn behind(self, color: Color) -> Option<Square> {
        match color {
            Color::White => self.0.checked_sub(8).map(Square),
            Color::Black => Square::new(self.0 + 8),
        }
    }

    pub fn all() -> impl Iterator<Item = Square> { (0u8..64).map(Square) }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", (b'a' + self.file()) as char, (b'1' + self.rank()) as char)
    }
}

impl FromStr for Square {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let b = s.as_bytes();
        if b.len() != 2 || !(b'a'..=b'h').contains(&b[0]) || !(b'1'..=b'8').contains(&b[1]) {
            return Err(SearchError::ParseMove(s.to_string()));
        }
        Ok(Square((b[1] - b'1') * 8 + (b[0] - b'a')))
    }
}

/// A move as the core sees it. Castling is the king's two-square step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<PieceKind>,
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(p) = self.promotion { write!(f, "{}", p.promotion_char())?; }
        Ok(())
    }
}

impl FromStr for Move {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !s.is_ascii() || !(4..=5).contains(&s.len()) {
            return Err(SearchError::ParseMove(s.to_string()));
        }
        let from: Square = s[0..2].parse()?;
        let to: Square = s[2..4].parse()?;
        let promotion = match s[4..].chars().next() {
            None => None,
            Some(c) => Some(PieceKind::from_promotion_char(c).ok_or_else(|| SearchError::ParseMove(s.to_string()))?),
        };
        Ok(Move { from, to, promotion })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uci_text_round_trips() {
        for s in ["e2e4", "e7e8q", "a7b8n", "h1h8"] {
            let m: Move = s.parse().unwrap();
            assert_eq!(m.to_string(), s);
        }
        assert!("e2e9".parse::<Move>().is_err());
        assert!("e7e8k".parse::<Move>().is_err());
    }

    #[test]
    fn mirror_and_behind() {
        let e2: Square = "e2".parse().unwrap();
        assert_eq!(e2.mirror().to_string(), "e7");
        assert_eq!(e2.behind(Color::White).unwrap().to_string(), "e1");
        assert_eq!(e2.behind(Color::Black).unwrap().to_string(), "e3");
        assert!(Square::A1.behind(Color::White).is_none());
        assert!(Square::H8.behind(Color::Black).is_none());
    }
}
