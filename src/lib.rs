//! A library for Atomic chess vocabulary, rules and move generation.
//!
//! In Atomic chess every capture sets off an explosion that destroys the
//! capturing piece, the captured piece, and all non-pawn pieces on the
//! adjacent squares. A game is won by removing the opposing king, directly
//! or in a blast; there is no check and no checkmate.
//!
//! # Examples
//!
//! Play moves from the starting position:
//!
//! ```
//! use atomo::{Atomic, Square};
//!
//! let mut pos = Atomic::new();
//! assert!(pos.make_move(Square::E2, Square::E4));
//! assert!(pos.make_move(Square::E7, Square::E5));
//! ```
//!
//! Captures explode. Here white wins by blowing up the f7 pawn next to the
//! black king:
//!
//! ```
//! use atomo::{Atomic, Color, GameState, Square};
//!
//! let mut pos = Atomic::new();
//! assert!(pos.make_move(Square::G1, Square::F3)); // 1. Nf3
//! assert!(pos.make_move(Square::A7, Square::A6)); // 1... a6
//! assert!(pos.make_move(Square::F3, Square::E5)); // 2. Ne5
//! assert!(pos.make_move(Square::A6, Square::A5)); // 2... a5
//! assert!(pos.make_move(Square::E5, Square::F7)); // 3. Nxf7
//!
//! assert_eq!(pos.state(), GameState::WhiteWon);
//! assert_eq!(pos.winner(), Some(Color::White));
//! ```
//!
//! Illegal moves are rejected without changing the game:
//!
//! ```
//! use atomo::{Atomic, Color, Square};
//!
//! let mut pos = Atomic::new();
//! assert!(!pos.make_move(Square::E1, Square::E2)); // blocked king
//! assert_eq!(pos.turn(), Color::White);
//! ```
//!
//! # Feature flags
//!
//! * `serde`: Implements [`serde::Serialize`](https://docs.rs/serde/1/serde/trait.Serialize.html)
//!   and [`serde::Deserialize`](https://docs.rs/serde/1/serde/trait.Deserialize.html) for
//!   types with unique natural representations.
//! * `arbitrary`: Implements
//!   [`arbitrary::Arbitrary`](https://docs.rs/arbitrary/1/arbitrary/trait.Arbitrary.html)
//!   for vocabulary types.

#![warn(missing_debug_implementations)]

mod board;
mod color;
mod m;
mod perft;
mod position;
mod role;
mod square;
mod types;

pub mod attacks;

pub use board::Board;
pub use color::{ByColor, Color, ParseColorError};
pub use m::{Move, MoveList, SquareList};
pub use perft::perft;
pub use position::{
    Atomic, GameState, ParseGameStateError, PlayError, PositionError, PositionErrorKinds,
};
pub use role::Role;
pub use square::{File, ParseSquareError, Rank, Square};
pub use types::Piece;

impl nohash_hasher::IsEnabled for File {}

impl nohash_hasher::IsEnabled for Rank {}

impl nohash_hasher::IsEnabled for Square {}

impl nohash_hasher::IsEnabled for Role {}

impl nohash_hasher::IsEnabled for Color {}
