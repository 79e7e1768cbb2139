use crate::{color::Color, role::Role};

/// A piece with [`Color`] and [`Role`].
#[allow(missing_docs)]
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub struct Piece {
    pub color: Color,
    pub role: Role,
}

impl Piece {
    /// Gets the English letter for the piece: uppercase for white, lowercase
    /// for black.
    pub fn char(self) -> char {
        self.color
            .fold_wb(self.role.upper_char(), self.role.char())
    }

    /// Gets a piece from its English letter.
    ///
    /// # Examples
    ///
    /// ```
    /// use atomo::{Color, Piece, Role};
    ///
    /// assert_eq!(Piece::from_char('K'), Some(Color::White.king()));
    /// assert_eq!(Piece::from_char('q'), Some(Color::Black.queen()));
    /// assert_eq!(Piece::from_char('-'), None);
    /// ```
    pub fn from_char(ch: char) -> Option<Piece> {
        Role::from_char(ch).map(|role| role.of(Color::from_white(32 & ch as u8 == 0)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_piece_char_round_trip() {
        for role in Role::ALL {
            for color in Color::ALL {
                let piece = role.of(color);
                assert_eq!(Piece::from_char(piece.char()), Some(piece));
            }
        }
    }
}
