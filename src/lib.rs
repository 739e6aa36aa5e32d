//! A library for Xiangqi (Chinese chess) vocabulary and rules.
//!
//! The board is a plain value; every rule is a pure function over a
//! snapshot of it. Callers own the game loop: they ask whether a move is
//! legal, apply it, and ask whether the side to move has been mated.
//!
//! # Examples
//!
//! Generate legal moves in the starting position:
//!
//! ```
//! use xiangqi::{position, Board, Color};
//!
//! let board = Board::default();
//! let legals = position::legal_moves(&board, Color::Red);
//! assert_eq!(legals.len(), 44);
//! ```
//!
//! Play moves:
//!
//! ```
//! use xiangqi::{position, square, Board, Move};
//!
//! // Red opens by centering a cannon.
//! let board = Board::default();
//! let m = Move {
//!     from: square::B7,
//!     to: square::E7,
//! };
//! assert!(position::is_legal(&board, m.from, m.to));
//! let board = position::play(&board, m)?;
//! assert_eq!(board.pieces().count(), 32);
//! # Ok::<_, xiangqi::PlayError>(())
//! ```
//!
//! Detect game end conditions:
//!
//! ```
//! use xiangqi::{position, Board, Color};
//!
//! let board = Board::default();
//! assert!(!position::is_check(&board, Color::Red));
//! assert!(!position::is_checkmate(&board, Color::Black));
//! ```
//!
//! # Feature flags
//!
//! * `serde`: Implements [`serde::Serialize`](https://docs.rs/serde/1/serde/trait.Serialize.html)
//!   and [`serde::Deserialize`](https://docs.rs/serde/1/serde/trait.Deserialize.html) for
//!   types with unique natural representations.
//! * `nohash-hasher`: Implements
//!   [`nohash_hasher::IsEnabled`](https://docs.rs/nohash-hasher/0.2/nohash_hasher/trait.IsEnabled.html)
//!   for sensible types.

#![warn(missing_debug_implementations)]

mod board;
mod color;
mod role;
mod types;

pub mod attacks;
pub mod position;
pub mod square;

pub use board::Board;
pub use color::{ByColor, Color, ParseColorError};
pub use position::{PlayError, PositionError, PositionErrorKinds};
pub use role::{ByRole, Role};
pub use square::Square;
pub use types::{Move, MoveList, Piece};

#[cfg(feature = "nohash-hasher")]
impl nohash_hasher::IsEnabled for Square {}

#[cfg(feature = "nohash-hasher")]
impl nohash_hasher::IsEnabled for Role {}

#[cfg(feature = "nohash-hasher")]
impl nohash_hasher::IsEnabled for Color {}
