//! Piece movement rules.
//!
//! Each predicate answers whether a piece of the given type could physically
//! make the move on the given board: geometry, obstruction and zone rules
//! only. Whether the move would expose the mover's own General is layered on
//! top in [`position`](crate::position).
//!
//! # Examples
//!
//! ```
//! use xiangqi::{attacks, square, Board};
//!
//! let board = Board::default();
//!
//! // A rook cannot jump over the soldier in front of it...
//! assert!(!attacks::rook_reaches(square::A9, square::A3, &board));
//!
//! // ...but a cannon captures across exactly one screen.
//! assert!(attacks::cannon_reaches(square::B7, square::B0, &board));
//! ```

use crate::{board::Board, color::Color, role::Role, square::Square, types::Piece};

/// Counts the pieces strictly between two squares that share a file or a
/// rank. Unaligned inputs count as unobstructed.
pub fn pieces_between(a: Square, b: Square, board: &Board) -> u32 {
    let mut count = 0;
    if a.file() == b.file() {
        let (lo, hi) = if a.rank() < b.rank() { (a.rank(), b.rank()) } else { (b.rank(), a.rank()) };
        for rank in lo + 1..hi {
            if board.piece_at(Square::new(a.file(), rank)).is_some() {
                count += 1;
            }
        }
    } else if a.rank() == b.rank() {
        let (lo, hi) = if a.file() < b.file() { (a.file(), b.file()) } else { (b.file(), a.file()) };
        for file in lo + 1..hi {
            if board.piece_at(Square::new(file, a.rank())).is_some() {
                count += 1;
            }
        }
    }
    count
}

/// Tests whether `piece` could physically move from `from` to `to`.
pub fn reaches(piece: Piece, from: Square, to: Square, board: &Board) -> bool {
    match piece.role {
        Role::Rook => rook_reaches(from, to, board),
        Role::Horse => horse_reaches(from, to, board),
        Role::Elephant => elephant_reaches(piece.color, from, to, board),
        Role::Advisor => advisor_reaches(piece.color, from, to),
        Role::General => general_reaches(piece.color, from, to, board),
        Role::Cannon => cannon_reaches(from, to, board),
        Role::Soldier => soldier_reaches(piece.color, from, to),
    }
}

/// The Rook moves any distance along its file or rank across empty squares.
pub fn rook_reaches(from: Square, to: Square, board: &Board) -> bool {
    if from == to || (from.file() != to.file() && from.rank() != to.rank()) {
        return false;
    }
    pieces_between(from, to, board) == 0
}

/// The Cannon moves like a Rook, except that a capture must vault exactly
/// one screen piece (of either side).
pub fn cannon_reaches(from: Square, to: Square, board: &Board) -> bool {
    if from == to || (from.file() != to.file() && from.rank() != to.rank()) {
        return false;
    }
    let screens = pieces_between(from, to, board);
    if board.piece_at(to).is_some() {
        screens == 1
    } else {
        screens == 0
    }
}

/// The Horse moves one step orthogonally then one step diagonally outward,
/// and is blocked when the orthogonally adjacent square (the leg) is
/// occupied.
pub fn horse_reaches(from: Square, to: Square, board: &Board) -> bool {
    let dx = to.file() - from.file();
    let dy = to.rank() - from.rank();
    if dx.abs() * dy.abs() != 2 {
        return false;
    }
    let leg = if dx.abs() == 2 {
        from.offset(dx.signum(), 0)
    } else {
        from.offset(0, dy.signum())
    };
    leg.map_or(false, |sq| board.piece_at(sq).is_none())
}

/// The Elephant moves exactly two steps diagonally, cannot jump an occupied
/// midpoint (the eye) and never crosses the river.
pub fn elephant_reaches(color: Color, from: Square, to: Square, board: &Board) -> bool {
    let dx = to.file() - from.file();
    let dy = to.rank() - from.rank();
    if dx.abs() != 2 || dy.abs() != 2 || to.has_crossed_river(color) {
        return false;
    }
    from.offset(dx / 2, dy / 2)
        .map_or(false, |eye| board.piece_at(eye).is_none())
}

/// The Advisor moves one step diagonally and never leaves the palace.
pub fn advisor_reaches(color: Color, from: Square, to: Square) -> bool {
    to.in_palace(color)
        && (to.file() - from.file()).abs() == 1
        && (to.rank() - from.rank()).abs() == 1
}

/// The General moves one step orthogonally within the palace. Capturing the
/// opposing General across an open file is also physically possible; that
/// branch is what makes the facing-generals rule fall out of the check scan,
/// and only the hypothetical boards of the legality simulation ever take it.
pub fn general_reaches(color: Color, from: Square, to: Square, board: &Board) -> bool {
    if board.role_at(to) == Some(Role::General)
        && from.file() == to.file()
        && pieces_between(from, to, board) == 0
    {
        return true;
    }
    if !to.in_palace(color) {
        return false;
    }
    let dx = (to.file() - from.file()).abs();
    let dy = (to.rank() - from.rank()).abs();
    (dx == 1 && dy == 0) || (dx == 0 && dy == 1)
}

/// The Soldier moves one step straight ahead, gains the sideways step after
/// crossing the river, and never retreats.
pub fn soldier_reaches(color: Color, from: Square, to: Square) -> bool {
    let dx = to.file() - from.file();
    let dy = to.rank() - from.rank();
    let forward = color.fold(-1, 1);
    if dx == 0 && dy == forward {
        return true;
    }
    from.has_crossed_river(color) && dy == 0 && dx.abs() == 1
}
