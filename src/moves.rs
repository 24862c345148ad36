use crate::board::{Board, Piece, PieceType, Square};
use crate::board::Color;
use crate::error::MoveError;

const STRAIGHT: [(isize, isize); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const DIAGONAL: [(isize, isize); 4] = [(1, 1), (-1, 1), (-1, -1), (1, -1)];
const KNIGHT_JUMPS: [(isize, isize); 8] = [
    (2, 1), (1, 2), (-1, 2), (-2, 1),
    (-2, -1), (-1, -2), (1, -2), (2, -1),
];

/// A candidate or chosen action. `score` is only meaningful to the bot.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, serde::Serialize)]
pub struct Move {
    pub start: Square,
    pub end: Square,
    pub piece: PieceType,
    pub score: i32,
}

impl Move {
    pub fn new(start: Square, end: Square, piece: PieceType) -> Self {
        Move { start, end, piece, score: 0 }
    }
}

fn move_by_vector(board: &Board, piece: &Piece, vec: (isize, isize), include_defended: bool) -> Vec<Square> {
    let mut result: Vec<Square> = Vec::new();
    let mut next = piece.square.offset(vec.0, vec.1);
    while let Some(square) = next {
        match board.piece_at(square) {
            None => result.push(square),
            Some(other) => {
                if other.color != piece.color || include_defended {
                    result.push(square);
                }
                break
            }
        }
        next = square.offset(vec.0, vec.1);
    }
    result
}

fn slide(board: &Board, piece: &Piece, directions: &[(isize, isize)], include_defended: bool) -> Vec<Square> {
    directions.iter()
        .flat_map(|&vec| move_by_vector(board, piece, vec, include_defended))
        .collect()
}

fn knight_moves(board: &Board, piece: &Piece, include_defended: bool) -> Vec<Square> {
    KNIGHT_JUMPS.iter()
        .filter_map(|&(r, c)| piece.square.offset(r, c))
        .filter(|&square| match board.piece_at(square) {
            None => true,
            Some(other) => other.color != piece.color || include_defended,
        })
        .collect()
}

fn pawn_moves(board: &Board, piece: &Piece, include_defended: bool) -> Vec<Square> {
    let forward = piece.color.forward();
    let step = piece.square.offset(forward, 0)
        .filter(|&square| board.piece_at(square).is_none());
    let captures = [-1, 1].into_iter()
        .filter_map(|side| piece.square.offset(forward, side))
        .filter(|&square| board.piece_at(square)
            .is_some_and(|other| other.color != piece.color || include_defended));
    step.into_iter().chain(captures).collect()
}

/// Destinations of `piece` on `board`.
///
/// With `include_defended` the result also holds allied squares the piece guards: the first
/// allied square on each ray, allied pawn diagonals and allied knight targets. That mode
/// answers which squares a piece controls, not where it may legally go.
pub fn generate_moves(board: &Board, piece: &Piece, include_defended: bool) -> Vec<Square> {
    match piece.kind {
        PieceType::Pawn => pawn_moves(board, piece, include_defended),
        PieceType::Rook => slide(board, piece, &STRAIGHT, include_defended),
        PieceType::Bishop => slide(board, piece, &DIAGONAL, include_defended),
        PieceType::Monarch => [
            slide(board, piece, &STRAIGHT, include_defended),
            slide(board, piece, &DIAGONAL, include_defended),
        ].concat(),
        PieceType::Knight => knight_moves(board, piece, include_defended),
    }
}

/// Where the piece on `square` may go, for the side whose turn it is.
pub fn legal_destinations(board: &Board, square: Square) -> Result<Vec<Square>, MoveError> {
    if !board.is_game_active() {
        return Err(MoveError::GameOver);
    }
    if !square.is_on_board() {
        return Err(MoveError::InvalidCoordinate);
    }
    let piece = board.piece_at(square).ok_or(MoveError::NoPiece)?;
    if piece.color != board.current_player() {
        return Err(MoveError::WrongPlayer);
    }
    Ok(generate_moves(board, &piece, false))
}

/// Every (piece, destination) pair of one side, in board order.
pub fn side_moves(board: &Board, color: Color, include_defended: bool) -> Vec<Move> {
    board.pieces()
        .filter(|piece| piece.color == color)
        .flat_map(|piece| generate_moves(board, piece, include_defended)
            .into_iter()
            .map(move |end| Move::new(piece.square, end, piece.kind)))
        .collect()
}
