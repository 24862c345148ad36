//! Single-ply move selection for the automated side.

use std::collections::HashSet;
use std::str::FromStr;

use rand::Rng;
use rand::seq::SliceRandom;

use crate::board::{Board, Color, MoveOutcome, PieceType, Square};
use crate::error::MoveError;
use crate::moves::{side_moves, Move};

/// The side the server plays for.
pub const BOT_COLOR: Color = Color::Black;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    /// Any legal move, uniformly.
    #[default]
    Easy,
    /// Best material balance after one ply, assuming every controlled square gets recaptured.
    #[serde(alias = "medium")]
    Heuristic,
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "heuristic" | "medium" => Ok(Difficulty::Heuristic),
            other => Err(format!("unknown difficulty {other}")),
        }
    }
}

pub fn piece_value(kind: PieceType) -> i32 {
    match kind {
        PieceType::Pawn => 1,
        PieceType::Knight => 3,
        PieceType::Bishop => 3,
        PieceType::Rook => 5,
        PieceType::Monarch => 100,
    }
}

/// Legal moves of `side`, each scored with the value of the piece it would capture.
fn candidates(board: &Board, side: Color) -> Vec<Move> {
    side_moves(board, side, false).into_iter()
        .map(|mut mv| {
            mv.score = board.piece_at(mv.end).map_or(0, |target| piece_value(target.kind));
            mv
        })
        .collect()
}

/// Keeps only the moves with the best score once landing on a square the opponent controls
/// costs the mover. No recapture sequence is played out.
fn best_heuristic_moves(board: &Board, side: Color, mut moves: Vec<Move>) -> Vec<Move> {
    let controlled: HashSet<Square> = side_moves(board, side.opposite(), true).into_iter()
        .map(|mv| mv.end)
        .collect();
    for mv in moves.iter_mut() {
        if controlled.contains(&mv.end) {
            mv.score -= piece_value(mv.piece);
        }
        log::trace!("Candidate {:?} {} -> {} scores {}", mv.piece, mv.start, mv.end, mv.score);
    }
    let Some(best_score) = moves.iter().map(|mv| mv.score).max() else {
        return moves;
    };
    moves.retain(|mv| mv.score == best_score);
    moves
}

/// Picks a move for `side`. `None` only when the side has no legal move at all.
pub fn select_move<R: Rng + ?Sized>(board: &Board, side: Color, difficulty: Difficulty, rng: &mut R) -> Option<Move> {
    let moves = candidates(board, side);
    let moves = match difficulty {
        Difficulty::Easy => moves,
        Difficulty::Heuristic => best_heuristic_moves(board, side, moves),
    };
    let chosen = moves.choose(rng).copied();
    log::debug!("{:?} bot ({:?}) picked {:?} out of {} moves", side, difficulty, chosen, moves.len());
    chosen
}

/// Plays the side to move with the board's difficulty, through the regular move path.
pub fn automated_reply<R: Rng + ?Sized>(board: &mut Board, rng: &mut R) -> Result<Option<(Move, MoveOutcome)>, MoveError> {
    if !board.is_game_active() {
        return Err(MoveError::GameOver);
    }
    let side = board.current_player();
    let Some(mv) = select_move(board, side, board.difficulty(), rng) else {
        log::info!("{:?} has no legal move", side);
        return Ok(None);
    };
    let outcome = board.execute_move(mv.start, mv.end)?;
    Ok(Some((mv, outcome)))
}

#[cfg(test)]
mod test {
    use std::collections::HashSet;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use crate::board::{empty_board, new_board, place, Event, PieceType, Square};
    use crate::board::Color::{Black, White};
    use crate::bot::{automated_reply, select_move, Difficulty, BOT_COLOR};
    use crate::error::MoveError;
    use crate::moves::legal_destinations;

    #[test]
    fn test_selection_is_always_legal() {
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            for difficulty in [Difficulty::Easy, Difficulty::Heuristic] {
                let mut board = new_board();
                board.set_difficulty(difficulty);
                for _ in 0..40 {
                    if !board.is_game_active() {
                        break;
                    }
                    let side = board.current_player();
                    let Some(mv) = select_move(&board, side, difficulty, &mut rng) else {
                        break;
                    };
                    let legal = legal_destinations(&board, mv.start).unwrap();
                    assert!(legal.contains(&mv.end));
                    let count = board.piece_count();
                    let (played, outcome) = automated_reply(&mut board, &mut rng).unwrap().unwrap();
                    assert!(board.piece_count() <= count);
                    if outcome.event != Event::GameOver {
                        assert_eq!(outcome.current_player, side.opposite());
                    }
                    assert_eq!(board.piece_at(played.end).map(|p| p.color), Some(side));
                }
            }
        }
    }

    #[test]
    fn test_same_seed_same_choice() {
        let board = new_board();
        let first = select_move(&board, White, Difficulty::Easy, &mut StdRng::seed_from_u64(7));
        let second = select_move(&board, White, Difficulty::Easy, &mut StdRng::seed_from_u64(7));
        assert_eq!(first, second);
    }

    #[test]
    fn test_easy_picks_vary() {
        let board = new_board();
        let mut rng = StdRng::seed_from_u64(17);
        let mut seen: HashSet<(Square, Square)> = HashSet::new();
        for _ in 0..50 {
            let mv = select_move(&board, White, Difficulty::Easy, &mut rng).unwrap();
            assert!(legal_destinations(&board, mv.start).unwrap().contains(&mv.end));
            seen.insert((mv.start, mv.end));
        }
        assert!(seen.len() > 1);
    }

    #[test]
    fn test_heuristic_picks_vary_among_ties() {
        // nothing black controls is reachable, so all nine opening moves tie at zero
        let board = new_board();
        let mut rng = StdRng::seed_from_u64(23);
        let mut seen: HashSet<(Square, Square)> = HashSet::new();
        for _ in 0..50 {
            let mv = select_move(&board, White, Difficulty::Heuristic, &mut rng).unwrap();
            assert_eq!(mv.score, 0);
            assert!(legal_destinations(&board, mv.start).unwrap().contains(&mv.end));
            seen.insert((mv.start, mv.end));
        }
        assert!(seen.len() > 1);
    }

    #[test]
    fn test_heuristic_takes_monarch() {
        let mut board = empty_board(Black);
        place(&mut board, 0, 0, Black, PieceType::Rook);
        place(&mut board, 5, 0, White, PieceType::Monarch);
        place(&mut board, 7, 4, White, PieceType::Rook);
        place(&mut board, 0, 4, Black, PieceType::Monarch);
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..10 {
            let mv = select_move(&board, Black, Difficulty::Heuristic, &mut rng).unwrap();
            assert_eq!((mv.start, mv.end), (Square::new(0, 0), Square::new(5, 0)));
            assert_eq!(mv.score, 100);
        }
    }

    #[test]
    fn test_heuristic_avoids_defended_squares() {
        let mut board = empty_board(Black);
        place(&mut board, 2, 2, Black, PieceType::Rook);
        place(&mut board, 0, 0, Black, PieceType::Monarch);
        place(&mut board, 4, 2, White, PieceType::Pawn);
        place(&mut board, 7, 4, White, PieceType::Monarch);
        // knight on e3 guards the pawn on c4
        place(&mut board, 5, 4, White, PieceType::Knight);

        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..20 {
            let mv = select_move(&board, Black, Difficulty::Heuristic, &mut rng).unwrap();
            assert_ne!(mv.end, Square::new(4, 2));
            assert_eq!(mv.score, 0);
        }

        board.squares[5][4] = None;
        for _ in 0..20 {
            let mv = select_move(&board, Black, Difficulty::Heuristic, &mut rng).unwrap();
            assert_eq!((mv.start, mv.end), (Square::new(2, 2), Square::new(4, 2)));
            assert_eq!(mv.score, 1);
        }
    }

    #[test]
    fn test_heuristic_prefers_free_capture() {
        let mut board = empty_board(Black);
        place(&mut board, 0, 0, Black, PieceType::Rook);
        place(&mut board, 0, 4, Black, PieceType::Monarch);
        place(&mut board, 6, 0, White, PieceType::Knight);
        place(&mut board, 7, 3, White, PieceType::Monarch);

        let mut rng = StdRng::seed_from_u64(11);
        let chosen: HashSet<(Square, Square)> = (0..20)
            .filter_map(|_| select_move(&board, Black, Difficulty::Heuristic, &mut rng))
            .map(|mv| (mv.start, mv.end))
            .collect();
        assert_eq!(chosen, HashSet::from([(Square::new(0, 0), Square::new(6, 0))]));
    }

    #[test]
    fn test_no_moves() {
        let mut board = empty_board(Black);
        place(&mut board, 7, 0, Black, PieceType::Pawn);
        place(&mut board, 3, 3, White, PieceType::Monarch);
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(select_move(&board, Black, Difficulty::Heuristic, &mut rng), None);
        assert_eq!(automated_reply(&mut board, &mut rng), Ok(None));
        assert!(board.move_history().is_empty());
    }

    #[test]
    fn test_reply_after_game_over() {
        let mut board = empty_board(White);
        place(&mut board, 5, 0, White, PieceType::Rook);
        place(&mut board, 0, 0, Black, PieceType::Monarch);
        board.execute_move(Square::new(5, 0), Square::new(0, 0)).unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(automated_reply(&mut board, &mut rng), Err(MoveError::GameOver));
    }

    #[test]
    fn test_parse_difficulty() {
        assert_eq!("easy".parse::<Difficulty>(), Ok(Difficulty::Easy));
        assert_eq!("Medium".parse::<Difficulty>(), Ok(Difficulty::Heuristic));
        assert_eq!("heuristic".parse::<Difficulty>(), Ok(Difficulty::Heuristic));
        assert!("hard".parse::<Difficulty>().is_err());
        assert_eq!(BOT_COLOR, Black);
    }
}
