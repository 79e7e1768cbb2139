use atomo::{perft, Atomic, Board, Color, Square};

#[test]
fn test_starting_position() {
    let pos = Atomic::new();
    assert_eq!(perft(&pos, 1), 20);
    assert_eq!(perft(&pos, 2), 400);

    // Diverges from the familiar 8902 of standard chess: each of the four
    // knight openings leaves the knight on the third rank, where it no
    // longer blocks the double-step of the pawn behind it.
    assert_eq!(perft(&pos, 3), 8902 + 4 * 20);
}

#[test]
fn test_rook_endgame() {
    let mut board = Board::empty();
    board.place(Color::White.king(), Square::A1);
    board.place(Color::White.rook(), Square::D4);
    board.place(Color::Black.king(), Square::H8);
    let pos = Atomic::from_board(board, Color::White).expect("playable position");

    // 14 rook moves and 3 king steps.
    assert_eq!(perft(&pos, 1), 17);
    // The black king always has its 3 steps in reply.
    assert_eq!(perft(&pos, 2), 17 * 3);
}
