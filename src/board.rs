use std::fmt;
use std::fmt::Write;

use crate::{
    color::Color,
    role::Role,
    square::Square,
    types::{Move, Piece},
};

/// Piece positions on a 9×10 board.
///
/// `Board` is a plain value: cloning it is cheap and no operation here
/// mutates a board behind the caller's back. The rules in
/// [`position`](crate::position) work on hypothetical copies produced by
/// [`Board::play_unchecked`].
#[derive(Clone, Eq, PartialEq, Hash)]
pub struct Board {
    cells: [Option<Piece>; 90],
}

impl Board {
    /// The standard initial layout.
    pub fn new() -> Board {
        const BACK_RANK: [Role; 9] = [
            Role::Rook,
            Role::Horse,
            Role::Elephant,
            Role::Advisor,
            Role::General,
            Role::Advisor,
            Role::Elephant,
            Role::Horse,
            Role::Rook,
        ];

        let mut board = Board::empty();
        for color in Color::ALL {
            for (file, role) in BACK_RANK.into_iter().enumerate() {
                board.set_piece_at(Square::new(file as i8, color.backrank()), role.of(color));
            }
            for file in [1, 7] {
                board.set_piece_at(Square::new(file, color.fold(7, 2)), color.cannon());
            }
            for file in [0, 2, 4, 6, 8] {
                board.set_piece_at(Square::new(file, color.fold(6, 3)), color.soldier());
            }
        }
        board
    }

    pub fn empty() -> Board {
        Board { cells: [None; 90] }
    }

    #[inline]
    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.cells[sq.index()]
    }

    #[inline]
    pub fn color_at(&self, sq: Square) -> Option<Color> {
        self.piece_at(sq).map(|piece| piece.color)
    }

    #[inline]
    pub fn role_at(&self, sq: Square) -> Option<Role> {
        self.piece_at(sq).map(|piece| piece.role)
    }

    pub fn set_piece_at(&mut self, sq: Square, piece: Piece) {
        self.cells[sq.index()] = Some(piece);
    }

    pub fn remove_piece_at(&mut self, sq: Square) -> Option<Piece> {
        self.cells[sq.index()].take()
    }

    /// All occupied squares with their pieces, in index order.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::ALL
            .into_iter()
            .filter_map(|sq| self.cells[sq.index()].map(|piece| (sq, piece)))
    }

    pub fn by_color(&self, color: Color) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.pieces().filter(move |(_, piece)| piece.color == color)
    }

    /// The square of the given side's General, if it is still on the board.
    pub fn general_of(&self, color: Color) -> Option<Square> {
        self.by_color(color)
            .find(|(_, piece)| piece.role == Role::General)
            .map(|(sq, _)| sq)
    }

    /// The board after playing `m`, without checking legality: the source
    /// square is emptied and whatever stood on the target square is
    /// replaced. A move from an empty square leaves the board unchanged.
    #[must_use]
    pub fn play_unchecked(&self, m: Move) -> Board {
        let mut next = self.clone();
        if let Some(piece) = next.remove_piece_at(m.from) {
            next.set_piece_at(m.to, piece);
        }
        next
    }
}

impl Default for Board {
    fn default() -> Board {
        Board::new()
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in 0..10 {
            for file in 0..9 {
                f.write_char(
                    self.piece_at(Square::new(file, rank))
                        .map_or('.', Piece::char),
                )?;
                f.write_char(if file < 8 { ' ' } else { '\n' })?;
            }
        }
        Ok(())
    }
}
