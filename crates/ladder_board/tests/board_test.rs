//! Tests for the packed board across its whole 18-bit domain.

use ladder_board::rules::WIN_PATTERNS;
use ladder_board::{BoardError, BoardState, BoardStatus, Mark, Position};

const DOMAIN: u32 = 1 << 18;

fn planes(bits: u32) -> (u32, u32) {
    (bits & 0x1FF, (bits >> 9) & 0x1FF)
}

fn valid_boards() -> impl Iterator<Item = BoardState> {
    (0..DOMAIN).filter_map(|bits| BoardState::new(bits).ok())
}

#[test]
fn test_construction_accepts_exactly_disjoint_planes() {
    for bits in 0..DOMAIN {
        let (one, two) = planes(bits);
        assert_eq!(
            BoardState::new(bits).is_ok(),
            one & two == 0,
            "bits {bits:#020b}"
        );
    }
}

#[test]
fn test_player_win_matches_pattern_superset() {
    for board in valid_boards() {
        for mark in [Mark::One, Mark::Two] {
            let plane = board.marks(mark);
            let expected = WIN_PATTERNS.iter().any(|&p| plane & p == p);
            assert_eq!(board.is_player_win(mark), expected);
        }
        assert_eq!(
            board.is_win(),
            board.is_player_win(Mark::One) || board.is_player_win(Mark::Two)
        );
    }
}

#[test]
fn test_full_iff_nine_bits_set() {
    for board in valid_boards() {
        assert_eq!(board.is_full(), board.bits().count_ones() == 9);
        assert_eq!(board.is_finished(), board.is_full() || board.is_win());
    }
}

#[test]
fn test_free_fields_are_exact_and_ascending() {
    for board in valid_boards() {
        let (one, two) = planes(board.bits());
        let free = board.free_fields();
        assert_eq!(free.len() as u32, 9 - (one | two).count_ones());
        assert!(free.windows(2).all(|w| w[0] < w[1]));
        for pos in Position::ALL {
            assert_eq!(free.contains(&pos), !board.is_set(pos));
        }
    }
}

#[test]
fn test_set_mark_changes_exactly_one_bit() {
    for board in valid_boards() {
        for pos in Position::ALL {
            for mark in [Mark::One, Mark::Two] {
                match board.set_mark(pos, mark) {
                    Ok(next) => {
                        let changed = next.bits() ^ board.bits();
                        assert_eq!(changed.count_ones(), 1);
                        assert!(next.is_set_for(pos, mark));
                        assert_eq!(next.marks(mark.opponent()), board.marks(mark.opponent()));
                    }
                    Err(err) => {
                        assert!(board.is_set(pos));
                        assert_eq!(err, BoardError::OccupiedCell(pos));
                    }
                }
            }
        }
    }
}

#[test]
fn test_player_win_cases() {
    let cases = [
        (0b000_000_000_000_000_000, false, false),
        (0b111_000_000_000_000_000, false, true),
        (0b000_111_000_000_000_000, false, true),
        (0b000_000_111_000_000_000, false, true),
        (0b000_000_000_111_000_000, true, false),
        (0b000_000_000_000_111_000, true, false),
        (0b000_000_000_000_000_111, true, false),
        (0b000_000_000_001_001_001, true, false),
        (0b100_010_001_000_001_100, false, true),
        (0b100_100_001_001_010_100, true, false),
    ];
    for (bits, one_wins, two_wins) in cases {
        let board = BoardState::new(bits).expect("valid board");
        assert_eq!(board.is_player_win(Mark::One), one_wins, "bits {bits:#b}");
        assert_eq!(board.is_player_win(Mark::Two), two_wins, "bits {bits:#b}");
    }
}

#[test]
fn test_full_cases() {
    let cases = [
        (0b000_000_000_000_000_000, false),
        (0b000_111_000_111_000_111, true),
        (0b100_001_010_011_010_101, false),
        (0b100_101_010_011_010_101, true),
    ];
    for (bits, full) in cases {
        assert_eq!(BoardState::new(bits).expect("valid board").is_full(), full);
    }
}

#[test]
fn test_free_field_cases() {
    let cases: [(u32, &[usize]); 4] = [
        (0b000_000_000_000_000_000, &[0, 1, 2, 3, 4, 5, 6, 7, 8]),
        (0b000_000_001_100_000_100, &[1, 3, 4, 5, 6, 7]),
        (0b111_000_111_000_111_000, &[]),
        (0b100_100_010_001_001_100, &[0, 4, 7]),
    ];
    for (bits, expected) in cases {
        let free: Vec<usize> = BoardState::new(bits)
            .expect("valid board")
            .free_fields()
            .into_iter()
            .map(Position::to_index)
            .collect();
        assert_eq!(free, expected);
    }
}

#[test]
fn test_diagonal_game_sequence() {
    let moves = [
        (2, Mark::One),
        (4, Mark::Two),
        (1, Mark::One),
        (0, Mark::Two),
        (5, Mark::One),
        (8, Mark::Two),
    ];
    let mut board = BoardState::EMPTY;
    for (index, mark) in moves {
        assert!(!board.is_finished());
        let pos = Position::from_index(index).expect("index in range");
        board = board.set_mark(pos, mark).expect("free cell");
    }
    assert_eq!(board.status(), BoardStatus::Won(Mark::Two));
    assert!(board.is_player_win(Mark::Two));
    assert!(!board.is_player_win(Mark::One));
    assert_eq!(board.free_fields().len(), 3);
}
