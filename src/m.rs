use core::fmt::{self, Write as _};

use arrayvec::ArrayVec;

use crate::{role::Role, square::Square};

/// Information about a move.
///
/// Every move in this variant displaces a single piece from `from` to `to`.
/// Captures additionally record the role of the captured piece; the board
/// mutation they trigger (the explosion) is derived state, not recorded
/// here.
///
/// # Display
///
/// `Move` implements [`fmt::Display`] using long algebraic notation, e.g.
/// `e2-e4` or `Qd1xd8`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Move {
    /// The role of the moved piece.
    pub role: Role,
    /// The origin square.
    pub from: Square,
    /// The role of the captured piece, if any.
    pub capture: Option<Role>,
    /// The target square.
    pub to: Square,
}

impl Move {
    /// Checks if the move is a capture, and so resolves with an explosion.
    pub const fn is_capture(self) -> bool {
        self.capture.is_some()
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.role != Role::Pawn {
            f.write_char(self.role.upper_char())?;
        }

        write!(
            f,
            "{}{}{}",
            self.from,
            if self.capture.is_some() { 'x' } else { '-' },
            self.to
        )
    }
}

/// A container for moves that can be stored inline on the stack.
///
/// The capacity is limited, but there is enough space to hold the legal
/// moves of any playable position, including setups that max out at 16
/// pieces per side.
pub type MoveList = ArrayVec<Move, 512>;

/// A container for the destination squares of a single piece.
///
/// There is enough space for the worst case, a queen reaching 27 squares
/// from a center square on an otherwise empty board.
pub type SquareList = ArrayVec<Square, 27>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(
            Move {
                role: Role::Pawn,
                from: Square::E2,
                capture: None,
                to: Square::E4,
            }
            .to_string(),
            "e2-e4"
        );

        assert_eq!(
            Move {
                role: Role::Queen,
                from: Square::D1,
                capture: Some(Role::Knight),
                to: Square::D7,
            }
            .to_string(),
            "Qd1xd7"
        );
    }
}
