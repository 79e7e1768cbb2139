use core::fmt;
use std::collections::HashMap;

use nohash_hasher::BuildNoHashHasher;

use crate::{
    color::{ByColor, Color},
    role::Role,
    square::{File, Rank, Square},
    types::Piece,
};

/// Handle of a piece in the board's arena.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
struct PieceId(u8);

/// The state of one piece on the board.
#[derive(Copy, Clone, Eq, PartialEq)]
pub(crate) struct PieceRecord {
    pub piece: Piece,
    pub square: Square,
    /// Set after the piece's first move. Gates the pawn double-step.
    pub moved: bool,
}

const BACKRANK_ROLES: [Role; 8] = [
    Role::Rook,
    Role::Knight,
    Role::Bishop,
    Role::Queen,
    Role::King,
    Role::Bishop,
    Role::Knight,
    Role::Rook,
];

/// Piece positions on a board.
///
/// The grid of squares owns the pieces; a coordinate index is kept alongside
/// it as a derived cache for square-keyed lookup. Both structures are
/// updated together by every mutating operation. A desync between them is a
/// programming error and fails an assertion, never a recoverable condition.
///
/// # Examples
///
/// ```
/// use atomo::{Board, Color, Square};
///
/// let board = Board::new();
/// assert_eq!(board.piece_at(Square::E1), Some(Color::White.king()));
/// assert!(board.is_empty(Square::E4));
/// ```
#[derive(Clone, Debug)]
pub struct Board {
    /// Occupancy by `[rank][file]`.
    grid: [[Option<PieceId>; 8]; 8],
    /// Derived coordinate cache, in lockstep with the grid.
    index: HashMap<Square, PieceId, BuildNoHashHasher<Square>>,
    /// Arena owning the piece state. Slots free up when pieces are removed.
    pieces: Vec<Option<PieceRecord>>,
}

impl Board {
    /// Creates the standard chess starting position.
    pub fn new() -> Board {
        let mut board = Board::empty();
        for color in Color::ALL {
            let backrank = color.backrank();
            for (file, role) in File::ALL.into_iter().zip(BACKRANK_ROLES) {
                board.place(role.of(color), Square::from_coords(file, backrank));
            }
            let pawn_rank = color.fold_wb(Rank::Second, Rank::Seventh);
            for file in File::ALL {
                board.place(color.pawn(), Square::from_coords(file, pawn_rank));
            }
        }
        board
    }

    /// Creates an empty board.
    pub fn empty() -> Board {
        Board {
            grid: [[None; 8]; 8],
            index: HashMap::with_hasher(BuildNoHashHasher::default()),
            pieces: Vec::new(),
        }
    }

    fn cell(&self, sq: Square) -> Option<PieceId> {
        self.grid[usize::from(sq.rank())][usize::from(sq.file())]
    }

    fn cell_mut(&mut self, sq: Square) -> &mut Option<PieceId> {
        &mut self.grid[usize::from(sq.rank())][usize::from(sq.file())]
    }

    pub(crate) fn record_at(&self, sq: Square) -> Option<&PieceRecord> {
        let PieceId(id) = self.cell(sq)?;
        Some(
            self.pieces[usize::from(id)]
                .as_ref()
                .expect("grid cell points at a live piece"),
        )
    }

    /// Gets the piece on the given square, if any.
    #[inline]
    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.record_at(sq).map(|record| record.piece)
    }

    /// Checks if the given square is empty.
    #[inline]
    pub fn is_empty(&self, sq: Square) -> bool {
        self.cell(sq).is_none()
    }

    fn alloc(&mut self, record: PieceRecord) -> PieceId {
        if let Some(free) = self.pieces.iter().position(|slot| slot.is_none()) {
            self.pieces[free] = Some(record);
            PieceId(free as u8)
        } else {
            let id = PieceId(u8::try_from(self.pieces.len()).expect("piece arena stays small"));
            self.pieces.push(Some(record));
            id
        }
    }

    /// Puts a piece on the given square.
    ///
    /// The piece has not moved yet.
    ///
    /// # Panics
    ///
    /// Panics if the square is already occupied.
    pub fn place(&mut self, piece: Piece, sq: Square) {
        assert!(self.is_empty(sq), "two pieces on {sq}");
        let id = self.alloc(PieceRecord {
            piece,
            square: sq,
            moved: false,
        });
        *self.cell_mut(sq) = Some(id);
        self.index.insert(sq, id);
        self.debug_validate();
    }

    /// Takes the piece off the given square and returns it, if any.
    pub fn remove(&mut self, sq: Square) -> Option<Piece> {
        let id = self.cell_mut(sq).take()?;
        self.index.remove(&sq);
        let record = self.pieces[usize::from(id.0)]
            .take()
            .expect("grid cell points at a live piece");
        debug_assert_eq!(record.square, sq);
        self.debug_validate();
        Some(record.piece)
    }

    /// Moves the piece on `from` to the empty square `to` and marks it as
    /// having moved. Grid, index and piece coordinate are updated as one
    /// operation.
    pub(crate) fn move_piece(&mut self, from: Square, to: Square) {
        let id = self
            .cell_mut(from)
            .take()
            .expect("move from an occupied square");
        assert!(self.is_empty(to), "two pieces on {to}");
        self.index.remove(&from);
        *self.cell_mut(to) = Some(id);
        self.index.insert(to, id);
        let record = self.pieces[usize::from(id.0)]
            .as_mut()
            .expect("grid cell points at a live piece");
        record.square = to;
        record.moved = true;
        self.debug_validate();
    }

    /// Iterates over all pieces, in square order `a1`, `b1`, ..., `h8`.
    pub fn occupied(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::ALL
            .into_iter()
            .filter_map(|sq| self.piece_at(sq).map(|piece| (sq, piece)))
    }

    /// The square of each color's king, if present.
    pub fn kings(&self) -> ByColor<Option<Square>> {
        ByColor::new_with(|color| {
            self.occupied()
                .find(|&(_, piece)| piece == color.king())
                .map(|(sq, _)| sq)
        })
    }

    fn debug_validate(&self) {
        if cfg!(debug_assertions) {
            let occupied = self.grid.iter().flatten().filter(|cell| cell.is_some()).count();
            assert_eq!(self.index.len(), occupied, "board index out of sync with grid");
            for (&sq, &id) in &self.index {
                assert_eq!(self.cell(sq), Some(id), "board index out of sync with grid");
                let record = self.pieces[usize::from(id.0)]
                    .as_ref()
                    .expect("index entry points at a live piece");
                assert_eq!(record.square, sq, "piece coordinate out of sync with grid");
            }
        }
    }
}

impl Default for Board {
    fn default() -> Board {
        Board::new()
    }
}

impl PartialEq for Board {
    fn eq(&self, other: &Board) -> bool {
        Square::ALL.into_iter().all(|sq| {
            match (self.record_at(sq), other.record_at(sq)) {
                (None, None) => true,
                (Some(a), Some(b)) => a.piece == b.piece && a.moved == b.moved,
                _ => false,
            }
        })
    }
}

impl Eq for Board {}

impl fmt::Debug for PieceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.piece.char(), self.square)?;
        if self.moved {
            f.write_str("*")?;
        }
        Ok(())
    }
}
