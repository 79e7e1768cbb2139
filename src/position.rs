use core::fmt;
use std::{error::Error, str::FromStr};

use bitflags::bitflags;

use crate::{
    attacks,
    board::{Board, PieceRecord},
    color::{ByColor, Color},
    m::{Move, MoveList, SquareList},
    role::Role,
    square::{Rank, Square},
    types::Piece,
};

/// The state of a game: unfinished, or won by one side.
///
/// The state is monotonic. Once a side has won it stays won; there are no
/// draws in this variant.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub enum GameState {
    /// The game is still going.
    Unfinished,
    /// White has won by removing the black king.
    WhiteWon,
    /// Black has won by removing the white king.
    BlackWon,
}

impl GameState {
    /// The state in which the given color has won.
    #[inline]
    pub const fn from_winner(winner: Color) -> GameState {
        match winner {
            Color::White => GameState::WhiteWon,
            Color::Black => GameState::BlackWon,
        }
    }

    /// The winning color, if any.
    #[inline]
    pub const fn winner(self) -> Option<Color> {
        match self {
            GameState::Unfinished => None,
            GameState::WhiteWon => Some(Color::White),
            GameState::BlackWon => Some(Color::Black),
        }
    }

    /// Checks if a side has won.
    #[inline]
    pub const fn is_decided(self) -> bool {
        !matches!(self, GameState::Unfinished)
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            GameState::Unfinished => "*",
            GameState::WhiteWon => "1-0",
            GameState::BlackWon => "0-1",
        })
    }
}

/// Error when parsing an invalid game state.
#[derive(Clone, Debug)]
pub struct ParseGameStateError;

impl fmt::Display for ParseGameStateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("invalid game state")
    }
}

impl Error for ParseGameStateError {}

impl FromStr for GameState {
    type Err = ParseGameStateError;

    fn from_str(s: &str) -> Result<GameState, ParseGameStateError> {
        Ok(match s {
            "*" => GameState::Unfinished,
            "1-0" => GameState::WhiteWon,
            "0-1" => GameState::BlackWon,
            _ => return Err(ParseGameStateError),
        })
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for GameState {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for GameState {
    fn deserialize<D>(deserializer: D) -> Result<GameState, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct GameStateVisitor;

        impl serde::de::Visitor<'_> for GameStateVisitor {
            type Value = GameState;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("game state: *, 1-0 or 0-1")
            }

            fn visit_str<E>(self, value: &str) -> Result<GameState, E>
            where
                E: serde::de::Error,
            {
                value.parse().map_err(serde::de::Error::custom)
            }
        }

        deserializer.deserialize_str(GameStateVisitor)
    }
}

/// Error when playing an illegal move.
///
/// A rejected move leaves the game completely unchanged; in particular the
/// turn does not pass. The variants are diagnostic detail. Callers that only
/// need the accept/reject outcome can use [`Atomic::make_move`].
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum PlayError {
    /// The source square is empty.
    Vacant {
        /// The empty source square.
        from: Square,
    },
    /// The piece on the source square belongs to the opponent.
    OpponentPiece {
        /// The source square.
        from: Square,
    },
    /// The target square is not in the destination set of the piece.
    Unreachable {
        /// The source square.
        from: Square,
        /// The unreachable target square.
        to: Square,
    },
    /// The game is already decided.
    GameOver,
    /// The target square holds a piece of the moving side.
    SelfCapture {
        /// The occupied target square.
        to: Square,
    },
    /// The explosion would destroy both kings.
    BothKingsExplode {
        /// The source square.
        from: Square,
        /// The capture square at the center of the blast.
        to: Square,
    },
}

impl fmt::Display for PlayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            PlayError::Vacant { from } => write!(f, "no piece on {from}"),
            PlayError::OpponentPiece { from } => {
                write!(f, "piece on {from} belongs to the opponent")
            }
            PlayError::Unreachable { from, to } => {
                write!(f, "piece on {from} cannot reach {to}")
            }
            PlayError::GameOver => f.write_str("the game is already decided"),
            PlayError::SelfCapture { to } => {
                write!(f, "cannot capture own piece on {to}")
            }
            PlayError::BothKingsExplode { from, to } => {
                write!(f, "{from}x{to} would blow up both kings")
            }
        }
    }
}

impl Error for PlayError {}

bitflags! {
    /// Reasons for a board to be rejected as a playable position.
    #[derive(Copy, Clone, Eq, PartialEq, Debug)]
    pub struct PositionErrorKinds: u32 {
        /// There are no pieces on the board.
        const EMPTY_BOARD = 1 << 0;

        /// A side has no king.
        const MISSING_KING = 1 << 1;

        /// A side has more than one king.
        const TOO_MANY_KINGS = 1 << 2;

        /// There are pawns on the first or eighth rank.
        const PAWNS_ON_BACKRANK = 1 << 3;

        /// A side has more than 16 pieces.
        const TOO_MUCH_MATERIAL = 1 << 4;
    }
}

/// Error when a board cannot be used as a playable position.
#[derive(Clone, Debug)]
pub struct PositionError {
    kinds: PositionErrorKinds,
}

impl PositionError {
    /// The full set of reasons the board was rejected.
    pub fn kinds(&self) -> PositionErrorKinds {
        self.kinds
    }
}

impl fmt::Display for PositionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "illegal position: {:?}", self.kinds)
    }
}

impl Error for PositionError {}

/// A game of Atomic chess.
///
/// Captures resolve with an explosion: the capturing piece, the captured
/// piece, and every non-pawn piece on a square adjacent to the capture are
/// destroyed. Removing the opposing king, directly or in a blast, wins the
/// game. There is no check and no checkmate.
///
/// Two behaviors of this rule set differ deliberately from other Atomic
/// implementations:
///
/// * the king never moves onto an occupied square, so it cannot capture;
/// * a pawn's initial double-step does not require the stepped-over square
///   to be empty.
///
/// # Examples
///
/// ```
/// use atomo::{Atomic, GameState, Square};
///
/// let mut pos = Atomic::new();
/// assert!(pos.make_move(Square::E2, Square::E4)); // 1. e4
/// assert!(pos.make_move(Square::E7, Square::E5)); // 1... e5
/// assert_eq!(pos.state(), GameState::Unfinished);
/// ```
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Atomic {
    board: Board,
    turn: Color,
    state: GameState,
}

impl Default for Atomic {
    fn default() -> Atomic {
        Atomic::new()
    }
}

impl Atomic {
    /// Creates a game in the starting position, white to move.
    pub fn new() -> Atomic {
        Atomic {
            board: Board::new(),
            turn: Color::White,
            state: GameState::Unfinished,
        }
    }

    /// Creates an unfinished game from an arbitrary board.
    ///
    /// # Errors
    ///
    /// Returns [`PositionError`] if the board is not playable: each side
    /// needs exactly one king, at most 16 pieces, and no pawns on the
    /// backranks.
    pub fn from_board(board: Board, turn: Color) -> Result<Atomic, PositionError> {
        let mut kinds = PositionErrorKinds::empty();

        if board.occupied().next().is_none() {
            kinds |= PositionErrorKinds::EMPTY_BOARD;
        }

        for color in Color::ALL {
            let kings = board
                .occupied()
                .filter(|&(_, piece)| piece == color.king())
                .count();
            if kings == 0 {
                kinds |= PositionErrorKinds::MISSING_KING;
            } else if kings > 1 {
                kinds |= PositionErrorKinds::TOO_MANY_KINGS;
            }

            if board
                .occupied()
                .filter(|&(_, piece)| piece.color == color)
                .count()
                > 16
            {
                kinds |= PositionErrorKinds::TOO_MUCH_MATERIAL;
            }
        }

        if board.occupied().any(|(sq, piece)| {
            piece.role == Role::Pawn && matches!(sq.rank(), Rank::First | Rank::Eighth)
        }) {
            kinds |= PositionErrorKinds::PAWNS_ON_BACKRANK;
        }

        if kinds.is_empty() {
            Ok(Atomic {
                board,
                turn,
                state: GameState::Unfinished,
            })
        } else {
            Err(PositionError { kinds })
        }
    }

    /// The piece positions.
    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The side to move.
    #[inline]
    pub fn turn(&self) -> Color {
        self.turn
    }

    /// The current game state.
    #[inline]
    pub fn state(&self) -> GameState {
        self.state
    }

    /// The winning color, if the game is decided.
    #[inline]
    pub fn winner(&self) -> Option<Color> {
        self.state.winner()
    }

    /// Checks if a side has won. No further moves can be played then.
    #[inline]
    pub fn is_game_over(&self) -> bool {
        self.state.is_decided()
    }

    /// The destination set of the piece on `from`, or an empty set for an
    /// empty square.
    ///
    /// Destinations follow the movement pattern of the piece and the current
    /// occupancy only. A pawn's diagonal onto a friendly piece is part of
    /// the set but still rejected by [`play`](Atomic::play); so are captures
    /// that would blow up both kings.
    pub fn destinations(&self, from: Square) -> SquareList {
        match self.board.record_at(from) {
            Some(record) => piece_destinations(&self.board, record),
            None => SquareList::new(),
        }
    }

    /// All moves the side to move can play, in square order of the moving
    /// piece. Empty once the game is decided.
    ///
    /// # Examples
    ///
    /// ```
    /// use atomo::Atomic;
    ///
    /// let pos = Atomic::new();
    /// assert_eq!(pos.legal_moves().len(), 20);
    /// ```
    pub fn legal_moves(&self) -> MoveList {
        let mut moves = MoveList::new();
        if self.state.is_decided() {
            return moves;
        }

        for (from, piece) in self.board.occupied() {
            if piece.color != self.turn {
                continue;
            }
            for to in self.destinations(from) {
                let capture = match self.board.piece_at(to) {
                    Some(target) if target.color == piece.color => continue,
                    Some(target) => Some(target.role),
                    None => None,
                };
                if capture.is_some() {
                    let exploded = self.exploded_kings(from, to);
                    if exploded.white && exploded.black {
                        continue;
                    }
                }
                moves.push(Move {
                    role: piece.role,
                    from,
                    capture,
                    to,
                });
            }
        }

        moves
    }

    /// Validates and plays a move, returning a record of what was played.
    ///
    /// # Errors
    ///
    /// Returns [`PlayError`] and leaves the game unchanged if the move is
    /// illegal.
    pub fn play(&mut self, from: Square, to: Square) -> Result<Move, PlayError> {
        let piece = self.board.piece_at(from).ok_or(PlayError::Vacant { from })?;
        if piece.color != self.turn {
            return Err(PlayError::OpponentPiece { from });
        }
        if !self.destinations(from).contains(&to) {
            return Err(PlayError::Unreachable { from, to });
        }
        if self.state.is_decided() {
            return Err(PlayError::GameOver);
        }

        let capture = match self.board.piece_at(to) {
            Some(target) if target.color == piece.color => {
                return Err(PlayError::SelfCapture { to })
            }
            Some(target) => Some(target.role),
            None => None,
        };

        if capture.is_some() {
            let exploded = self.exploded_kings(from, to);
            if exploded.white && exploded.black {
                return Err(PlayError::BothKingsExplode { from, to });
            }
            self.explode(from, to);
        } else {
            self.board.move_piece(from, to);
        }

        self.turn = !self.turn;
        Ok(Move {
            role: piece.role,
            from,
            capture,
            to,
        })
    }

    /// Validates and plays a move.
    ///
    /// Returns `false` and leaves the game unchanged if the move is illegal.
    /// [`play`](Atomic::play) reports the rejection reason instead.
    ///
    /// # Examples
    ///
    /// ```
    /// use atomo::{Atomic, Square};
    ///
    /// let mut pos = Atomic::new();
    /// assert!(pos.make_move(Square::G1, Square::F3));
    /// assert!(!pos.make_move(Square::G8, Square::G6));
    /// ```
    pub fn make_move(&mut self, from: Square, to: Square) -> bool {
        self.play(from, to).is_ok()
    }

    /// Which kings the explosion of a capture on `to` would remove,
    /// including the moving piece on `from`.
    fn exploded_kings(&self, from: Square, to: Square) -> ByColor<bool> {
        let mut exploded = ByColor {
            white: false,
            black: false,
        };
        {
            let mut mark = |piece: Piece| {
                if piece.role == Role::King {
                    *exploded.by_color_mut(piece.color) = true;
                }
            };
            if let Some(piece) = self.board.piece_at(from) {
                mark(piece);
            }
            if let Some(piece) = self.board.piece_at(to) {
                mark(piece);
            }
            for sq in attacks::blast_radius(to) {
                if let Some(piece) = self.board.piece_at(sq) {
                    mark(piece);
                }
            }
        }
        exploded
    }

    /// Resolves a capture: removes the capturing piece from its origin, the
    /// captured piece, and every non-pawn piece adjacent to the capture
    /// square. A removed king decides the game against its owner.
    fn explode(&mut self, from: Square, to: Square) {
        self.board.remove(from);

        if let Some(target) = self.board.remove(to) {
            if target.role == Role::King {
                self.state = GameState::from_winner(!target.color);
            }
        }

        for sq in attacks::blast_radius(to) {
            if let Some(piece) = self.board.piece_at(sq) {
                if piece.role.explodes() {
                    self.board.remove(sq);
                    if piece.role == Role::King {
                        self.state = GameState::from_winner(!piece.color);
                    }
                }
            }
        }
    }
}

fn piece_destinations(board: &Board, record: &PieceRecord) -> SquareList {
    let piece = record.piece;
    let from = record.square;
    let mut targets = SquareList::new();

    match piece.role {
        Role::Pawn => {
            if let Some(to) = attacks::pawn_push(piece.color, from) {
                if board.is_empty(to) {
                    targets.push(to);
                }
            }
            if !record.moved {
                // The stepped-over square is not required to be empty.
                if let Some(to) = attacks::pawn_double_push(piece.color, from) {
                    if board.is_empty(to) {
                        targets.push(to);
                    }
                }
            }
            for to in attacks::pawn_attacks(piece.color, from) {
                if !board.is_empty(to) {
                    targets.push(to);
                }
            }
        }
        Role::Knight => {
            for to in attacks::knight_jumps(from) {
                if board.piece_at(to).map_or(true, |p| p.color != piece.color) {
                    targets.push(to);
                }
            }
        }
        Role::King => {
            // The king only steps onto empty squares, so it never captures.
            for to in attacks::king_steps(from) {
                if board.is_empty(to) {
                    targets.push(to);
                }
            }
        }
        Role::Rook => {
            ray_destinations(board, piece.color, from, &attacks::ROOK_DIRECTIONS, &mut targets)
        }
        Role::Bishop => {
            ray_destinations(board, piece.color, from, &attacks::BISHOP_DIRECTIONS, &mut targets)
        }
        Role::Queen => {
            ray_destinations(board, piece.color, from, &attacks::ROOK_DIRECTIONS, &mut targets);
            ray_destinations(board, piece.color, from, &attacks::BISHOP_DIRECTIONS, &mut targets);
        }
    }

    targets
}

fn ray_destinations(
    board: &Board,
    color: Color,
    from: Square,
    directions: &[(i32, i32)],
    targets: &mut SquareList,
) {
    for &direction in directions {
        for to in attacks::ray(from, direction) {
            match board.piece_at(to) {
                None => targets.push(to),
                Some(piece) => {
                    if piece.color != color {
                        targets.push(to);
                    }
                    break;
                }
            }
        }
    }
}
