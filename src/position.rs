// This file is part of the xiangqi library.
// Copyright (C) 2024-2026 the xiangqi library developers
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program. If not, see <http://www.gnu.org/licenses/>.

//! Move legality, check and checkmate.
//!
//! Everything here is a pure function over a [`Board`] snapshot. Testing a
//! move builds a hypothetical follow-up board and inspects it; the caller's
//! board is never touched.

use std::{error::Error, fmt};

use bitflags::bitflags;

use crate::{
    attacks,
    board::Board,
    color::{ByColor, Color},
    role::{ByRole, Role},
    square::Square,
    types::{Move, MoveList},
};

/// Tests whether the given side's General is attacked by any enemy piece.
///
/// A side whose General has already been captured owes no check.
pub fn is_check(board: &Board, color: Color) -> bool {
    let Some(general) = board.general_of(color) else {
        return false;
    };
    board
        .by_color(!color)
        .any(|(from, piece)| attacks::reaches(piece, from, general, board))
}

/// Tests whether the two Generals stand on the same file with nothing
/// between them, which no legal move may bring about.
pub fn generals_facing(board: &Board) -> bool {
    let (Some(red), Some(black)) = (
        board.general_of(Color::Red),
        board.general_of(Color::Black),
    ) else {
        return false;
    };
    red.file() == black.file() && attacks::pieces_between(red, black, board) == 0
}

/// Tests a move for full legality: the mover must not capture its own side,
/// must physically reach the target, and the resulting board must neither
/// leave the two Generals facing nor leave the mover's own General in check.
///
/// An empty source square is an automatic rejection.
pub fn is_legal(board: &Board, from: Square, to: Square) -> bool {
    let Some(piece) = board.piece_at(from) else {
        return false;
    };
    if board.color_at(to) == Some(piece.color) {
        return false;
    }
    if !attacks::reaches(piece, from, to, board) {
        return false;
    }
    let next = board.play_unchecked(Move { from, to });
    !generals_facing(&next) && !is_check(&next, piece.color)
}

/// Generates all legal moves for the given side.
pub fn legal_moves(board: &Board, color: Color) -> MoveList {
    let mut moves = MoveList::new();
    for (from, _) in board.by_color(color) {
        for to in Square::ALL {
            if is_legal(board, from, to) {
                moves.push(Move { from, to });
            }
        }
    }
    moves
}

/// Tests whether the given side is in check with no legal move left.
///
/// A side that is not in check is never checkmated, even with no legal
/// moves; stalemate is not a concept of these rules.
pub fn is_checkmate(board: &Board, color: Color) -> bool {
    if !is_check(board, color) {
        return false;
    }
    !board
        .by_color(color)
        .any(|(from, _)| Square::ALL.iter().any(|&to| is_legal(board, from, to)))
}

/// Validates and plays a move, producing the follow-up board.
pub fn play(board: &Board, m: Move) -> Result<Board, PlayError> {
    if is_legal(board, m.from, m.to) {
        Ok(board.play_unchecked(m))
    } else {
        Err(PlayError { m })
    }
}

/// Error when trying to play an illegal move.
#[derive(Clone, Debug)]
pub struct PlayError {
    pub m: Move,
}

impl fmt::Display for PlayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "illegal move: {}", self.m)
    }
}

impl Error for PlayError {}

bitflags! {
    /// Reasons for a [`Board`] being rejected by [`validate`].
    #[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
    pub struct PositionErrorKinds: u32 {
        /// There are no pieces on the board.
        const EMPTY_BOARD = 1 << 0;

        /// A side has no General.
        const MISSING_GENERAL = 1 << 1;

        /// A side exceeds the piece count of the full set for some role.
        const TOO_MANY_PIECES = 1 << 2;

        /// A General or Advisor stands outside its palace.
        const OUTSIDE_PALACE = 1 << 3;

        /// An Elephant stands beyond the river.
        const ELEPHANT_ACROSS_RIVER = 1 << 4;

        /// A Soldier stands behind its starting rank, unreachable by
        /// forward-only movement.
        const RETREATED_SOLDIER = 1 << 5;

        /// The two Generals face each other on an open file.
        const GENERALS_FACING = 1 << 6;
    }
}

/// Error when a [`Board`] cannot be a xiangqi position.
#[derive(Clone, Debug)]
pub struct PositionError {
    kinds: PositionErrorKinds,
}

impl PositionError {
    pub fn kinds(&self) -> PositionErrorKinds {
        self.kinds
    }
}

impl fmt::Display for PositionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const MESSAGES: [(PositionErrorKinds, &str); 7] = [
            (PositionErrorKinds::EMPTY_BOARD, "empty board"),
            (PositionErrorKinds::MISSING_GENERAL, "missing general"),
            (PositionErrorKinds::TOO_MANY_PIECES, "too many pieces"),
            (
                PositionErrorKinds::OUTSIDE_PALACE,
                "general or advisor outside the palace",
            ),
            (
                PositionErrorKinds::ELEPHANT_ACROSS_RIVER,
                "elephant across the river",
            ),
            (
                PositionErrorKinds::RETREATED_SOLDIER,
                "soldier behind its starting rank",
            ),
            (PositionErrorKinds::GENERALS_FACING, "generals facing"),
        ];

        f.write_str("illegal position: ")?;
        let mut first = true;
        for (kind, message) in MESSAGES {
            if self.kinds.contains(kind) {
                if !first {
                    f.write_str(", ")?;
                }
                f.write_str(message)?;
                first = false;
            }
        }
        Ok(())
    }
}

impl Error for PositionError {}

/// Checks that a board is a position that could occur in a game: both
/// Generals present, nobody over the full piece set, zone rules respected
/// and the Generals not facing.
///
/// The rule functions themselves do not require a validated board; they
/// fail closed on nonsense instead.
pub fn validate(board: &Board) -> Result<(), PositionError> {
    const LIMITS: ByRole<u8> = ByRole {
        rook: 2,
        horse: 2,
        elephant: 2,
        advisor: 2,
        general: 1,
        cannon: 2,
        soldier: 5,
    };

    let mut kinds = PositionErrorKinds::empty();

    if board.pieces().next().is_none() {
        kinds |= PositionErrorKinds::EMPTY_BOARD;
    }

    let mut counts = ByColor::<ByRole<u8>>::default();
    for (sq, piece) in board.pieces() {
        *counts.by_color_mut(piece.color).get_mut(piece.role) += 1;
        match piece.role {
            Role::General | Role::Advisor => {
                if !sq.in_palace(piece.color) {
                    kinds |= PositionErrorKinds::OUTSIDE_PALACE;
                }
            }
            Role::Elephant => {
                if sq.has_crossed_river(piece.color) {
                    kinds |= PositionErrorKinds::ELEPHANT_ACROSS_RIVER;
                }
            }
            Role::Soldier => {
                if piece.color.fold(sq.rank() > 6, sq.rank() < 3) {
                    kinds |= PositionErrorKinds::RETREATED_SOLDIER;
                }
            }
            _ => {}
        }
    }

    for color in Color::ALL {
        let counts = *counts.by_color(color);
        if *counts.get(Role::General) == 0 {
            kinds |= PositionErrorKinds::MISSING_GENERAL;
        }
        if counts.zip(LIMITS).find(|&(n, limit)| n > limit).is_some() {
            kinds |= PositionErrorKinds::TOO_MANY_PIECES;
        }
    }

    if generals_facing(board) {
        kinds |= PositionErrorKinds::GENERALS_FACING;
    }

    if kinds.is_empty() {
        Ok(())
    } else {
        Err(PositionError { kinds })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::square;

    #[test]
    fn test_initial_position() {
        let board = Board::new();
        assert!(!is_check(&board, Color::Red));
        assert!(!is_check(&board, Color::Black));
        assert!(!generals_facing(&board));
        assert!(validate(&board).is_ok());
        for color in Color::ALL {
            assert_eq!(legal_moves(&board, color).len(), 44);
            assert!(!is_checkmate(&board, color));
        }
    }

    #[test]
    fn test_cannon_opening_moves() {
        let board = Board::new();

        // Lifting the cannon up its open file and centering it are legal.
        assert!(is_legal(&board, square::B7, square::B3));
        assert!(is_legal(&board, square::B7, square::E7));

        // Capturing the opposing cannon head-on lacks a screen; capturing
        // the horse behind it has exactly one.
        assert!(!is_legal(&board, square::B7, square::B2));
        assert!(is_legal(&board, square::B7, square::B0));
    }

    #[test]
    fn test_empty_source_is_rejected() {
        let board = Board::new();
        for to in Square::ALL {
            assert!(!is_legal(&board, square::E4, to));
        }
        assert!(play(
            &board,
            Move {
                from: square::E4,
                to: square::E3,
            }
        )
        .is_err());
    }

    #[test]
    fn test_cannot_capture_own_piece() {
        let board = Board::new();
        assert!(!is_legal(&board, square::E9, square::D9));
        assert!(!is_legal(&board, square::A9, square::A6));
    }

    #[test]
    fn test_no_suicide_moves() {
        let mut board = Board::empty();
        board.set_piece_at(square::E9, Color::Red.general());
        board.set_piece_at(square::E5, Color::Red.rook());
        board.set_piece_at(square::E0, Color::Black.rook());
        board.set_piece_at(square::D0, Color::Black.general());

        // The rook may not step off the file it is shielding.
        assert!(!is_legal(&board, square::E5, square::D5));
        assert!(!is_legal(&board, square::E5, square::A5));

        // Staying on the file, or capturing the attacker, is fine.
        assert!(is_legal(&board, square::E5, square::E4));
        assert!(is_legal(&board, square::E5, square::E0));
    }

    #[test]
    fn test_facing_generals_must_be_resolved() {
        let mut board = Board::empty();
        board.set_piece_at(square::E9, Color::Red.general());
        board.set_piece_at(square::E0, Color::Black.general());
        board.set_piece_at(square::A5, Color::Red.rook());

        assert!(generals_facing(&board));

        // Interposing the rook resolves the face-off; any other rook move
        // leaves it in place and is rejected.
        assert!(is_legal(&board, square::A5, square::E5));
        assert!(!is_legal(&board, square::A5, square::B5));
        assert!(!is_legal(&board, square::A5, square::A0));

        // Moving the general along the shared file does not help either.
        assert!(!is_legal(&board, square::E9, square::E8));
        assert!(is_legal(&board, square::E9, square::D9));
    }

    #[test]
    fn test_bare_generals_at_palace_centers() {
        let mut board = Board::empty();
        board.set_piece_at(square::E8, Color::Red.general());
        board.set_piece_at(square::E1, Color::Black.general());

        // With an open file between them, each general "attacks" the other
        // through the flying-general branch.
        assert!(is_check(&board, Color::Red));
        assert!(is_check(&board, Color::Black));

        // Not checkmate: stepping aside leaves the file, and the flying
        // capture itself is available on this (unreachable) board.
        assert!(is_legal(&board, square::E8, square::D8));
        assert!(is_legal(&board, square::E8, square::E1));
        assert!(!is_legal(&board, square::E8, square::E7));
        assert!(!is_checkmate(&board, Color::Red));
        assert!(!is_checkmate(&board, Color::Black));
    }

    #[test]
    fn test_back_rank_mate() {
        let mut board = Board::empty();
        board.set_piece_at(square::D0, Color::Black.general());
        board.set_piece_at(square::D9, Color::Red.rook());
        board.set_piece_at(square::E9, Color::Red.general());

        assert!(is_check(&board, Color::Black));
        assert!(!is_check(&board, Color::Red));

        // d1 stays on the rook's file, e0 would face the red general and
        // c0 leaves the palace.
        assert!(!is_legal(&board, square::D0, square::D1));
        assert!(!is_legal(&board, square::D0, square::E0));
        assert!(!is_legal(&board, square::D0, square::C0));
        assert!(is_checkmate(&board, Color::Black));
    }

    #[test]
    fn test_smothered_general_is_mated() {
        let mut board = Board::empty();
        board.set_piece_at(square::E1, Color::Black.general());
        board.set_piece_at(square::D1, Color::Black.horse());
        board.set_piece_at(square::F1, Color::Black.horse());
        board.set_piece_at(square::E0, Color::Black.horse());
        board.set_piece_at(square::E2, Color::Black.horse());
        board.set_piece_at(square::D3, Color::Red.horse());
        board.set_piece_at(square::D9, Color::Red.general());

        // The red horse checks from d3; its leg at d2 is out of reach
        // because the boxed-in horses are blocked by their own general.
        assert!(is_check(&board, Color::Black));
        assert!(is_checkmate(&board, Color::Black));

        // Freeing f1 gives the general a flight square.
        board.remove_piece_at(square::F1);
        assert!(!is_checkmate(&board, Color::Black));
    }

    #[test]
    fn test_captured_general_owes_no_check() {
        let mut board = Board::empty();
        board.set_piece_at(square::E9, Color::Red.general());
        board.set_piece_at(square::A0, Color::Red.rook());

        assert!(!is_check(&board, Color::Black));
        assert!(!is_checkmate(&board, Color::Black));
        assert!(!generals_facing(&board));
    }

    #[test]
    fn test_no_moves_without_check_is_not_checkmate() {
        let mut board = Board::empty();
        board.set_piece_at(square::E0, Color::Black.general());
        board.set_piece_at(square::D9, Color::Red.general());
        board.set_piece_at(square::F1, Color::Red.rook());

        // Black has no legal move, but is not in check; these rules know
        // no stalemate, so the position is simply not terminal.
        assert!(legal_moves(&board, Color::Black).is_empty());
        assert!(!is_check(&board, Color::Black));
        assert!(!is_checkmate(&board, Color::Black));
    }

    #[test]
    fn test_checkmate_implies_check() {
        let mut board = Board::new();
        board.remove_piece_at(square::E3);
        for color in Color::ALL {
            if is_checkmate(&board, color) {
                assert!(is_check(&board, color));
            }
        }
    }

    #[test]
    fn test_analysis_does_not_mutate() {
        let board = Board::new();
        let snapshot = board.clone();
        let _ = is_check(&board, Color::Red);
        let _ = generals_facing(&board);
        let _ = is_checkmate(&board, Color::Black);
        let _ = legal_moves(&board, Color::Red);
        let _ = is_legal(&board, square::B7, square::E7);
        assert_eq!(board, snapshot);
    }

    #[test]
    fn test_play() {
        let board = Board::new();
        let m = Move {
            from: square::B7,
            to: square::E7,
        };
        let next = play(&board, m).unwrap();
        assert_eq!(next.piece_at(square::E7), Some(Color::Red.cannon()));
        assert_eq!(next.piece_at(square::B7), None);

        let err = play(
            &board,
            Move {
                from: square::E9,
                to: square::E5,
            },
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "illegal move: e9-e5");
    }

    #[test]
    fn test_validate() {
        assert!(validate(&Board::new()).is_ok());

        let err = validate(&Board::empty()).unwrap_err();
        assert!(err.kinds().contains(PositionErrorKinds::EMPTY_BOARD));
        assert!(err.kinds().contains(PositionErrorKinds::MISSING_GENERAL));

        let mut board = Board::new();
        board.set_piece_at(square::E5, Color::Red.rook());
        let err = validate(&board).unwrap_err();
        assert_eq!(err.kinds(), PositionErrorKinds::TOO_MANY_PIECES);

        let mut board = Board::new();
        board.set_piece_at(square::C5, Color::Red.advisor());
        let err = validate(&board).unwrap_err();
        assert!(err.kinds().contains(PositionErrorKinds::OUTSIDE_PALACE));

        let mut board = Board::new();
        board.set_piece_at(square::E4, Color::Red.elephant());
        let err = validate(&board).unwrap_err();
        assert!(err
            .kinds()
            .contains(PositionErrorKinds::ELEPHANT_ACROSS_RIVER));

        let mut board = Board::new();
        board.set_piece_at(square::E2, Color::Black.soldier());
        let err = validate(&board).unwrap_err();
        assert!(err.kinds().contains(PositionErrorKinds::RETREATED_SOLDIER));

        let mut board = Board::new();
        board.remove_piece_at(square::E3);
        board.remove_piece_at(square::E6);
        let err = validate(&board).unwrap_err();
        assert_eq!(err.kinds(), PositionErrorKinds::GENERALS_FACING);
        assert_eq!(
            err.to_string(),
            "illegal position: generals facing"
        );
    }
}
