use std::fmt;

use crate::board::Color::{Black, White};
use crate::bot::Difficulty;
use crate::error::MoveError;
use crate::moves::generate_moves;

pub const WIDTH: usize = 5;
pub const HEIGHT: usize = 8;

const FILES: [char; WIDTH] = ['a', 'b', 'c', 'd', 'e'];

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, serde::Serialize)]
pub struct Square {
    pub rank: usize,
    pub file: usize,
}

impl Square {
    pub const fn new(rank: usize, file: usize) -> Self {
        Square { rank, file }
    }

    pub fn is_on_board(&self) -> bool {
        self.rank < HEIGHT && self.file < WIDTH
    }

    /// The square `d_rank` ranks and `d_file` files away, if it is still on the board.
    pub fn offset(&self, d_rank: isize, d_file: isize) -> Option<Square> {
        let rank = self.rank.checked_add_signed(d_rank)?;
        let file = self.file.checked_add_signed(d_file)?;
        let square = Square { rank, file };
        square.is_on_board().then_some(square)
    }
}

impl From<(usize, usize)> for Square {
    fn from((rank, file): (usize, usize)) -> Self {
        Square { rank, file }
    }
}

/// File letter followed by rank number, rank 0 being printed as "8".
impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match FILES.get(self.file) {
            Some(letter) if self.rank < HEIGHT => write!(f, "{}{}", letter, HEIGHT - self.rank),
            _ => write!(f, "({}, {})", self.rank, self.file),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, serde::Serialize)]
pub enum PieceType {
    #[serde(rename = "P")]
    Pawn,
    #[serde(rename = "R")]
    Rook,
    #[serde(rename = "N")]
    Knight,
    #[serde(rename = "B")]
    Bishop,
    #[serde(rename = "M")]
    Monarch,
}

impl PieceType {
    pub fn symbol(&self) -> char {
        match self {
            PieceType::Pawn => 'P',
            PieceType::Rook => 'R',
            PieceType::Knight => 'N',
            PieceType::Bishop => 'B',
            PieceType::Monarch => 'M',
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    White, Black
}

impl Color {
    pub fn opposite(&self) -> Color {
        if self == &Color::White {
            Color::Black
        } else {
            Color::White
        }
    }

    /// Rank step of a pawn of this color. White starts on the high ranks.
    pub fn forward(&self) -> isize {
        match self {
            White => -1,
            Black => 1,
        }
    }

    pub fn promotion_kind(&self) -> PieceType {
        match self {
            White => PieceType::Knight,
            Black => PieceType::Bishop,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GameState {
    WhiteTurn,
    BlackTurn,
    GameOver,
}

impl GameState {
    fn turn_of(color: Color) -> GameState {
        match color {
            White => GameState::WhiteTurn,
            Black => GameState::BlackTurn,
        }
    }
}

/// What a successful move looked like, for the caller's presentation (sounds, banners).
#[derive(Debug, Copy, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Event {
    Move,
    Capture,
    GameOver,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, serde::Serialize)]
pub struct MoveOutcome {
    pub game_state: GameState,
    pub current_player: Color,
    pub event: Event,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, serde::Serialize)]
pub struct Piece {
    pub kind: PieceType,
    pub color: Color,
    pub square: Square,
}

impl Piece {
    fn new(kind: PieceType, color: Color, square: Square) -> Self {
        Piece { kind, color, square }
    }
}

#[derive(Debug, Clone)]
pub struct Board {
    pub(crate) squares: [[Option<Piece>; WIDTH]; HEIGHT],
    current_player: Color,
    game_state: GameState,
    move_history: Vec<String>,
    difficulty: Difficulty,
}

/// Read-only projection of a board, shaped for the client.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct BoardView {
    pub squares: [[Option<Piece>; WIDTH]; HEIGHT],
    pub move_history: Vec<String>,
    pub game_state: GameState,
    pub current_player: Color,
    pub difficulty: Difficulty,
}

impl Board {
    pub fn current_player(&self) -> Color {
        self.current_player
    }

    pub fn game_state(&self) -> GameState {
        self.game_state
    }

    pub fn is_game_active(&self) -> bool {
        self.game_state != GameState::GameOver
    }

    pub fn move_history(&self) -> &[String] {
        &self.move_history
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        log::debug!("Difficulty set to {:?}", difficulty);
        self.difficulty = difficulty;
    }

    /// The side that captured the enemy Monarch, once the game is over.
    pub fn winner(&self) -> Option<Color> {
        (self.game_state == GameState::GameOver).then_some(self.current_player)
    }

    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        if square.is_on_board() {
            self.squares[square.rank][square.file]
        } else {
            None
        }
    }

    /// Pieces in rank-major order.
    pub fn pieces(&self) -> impl Iterator<Item = &Piece> + '_ {
        self.squares.iter().flat_map(|row| row.iter().flatten())
    }

    pub fn piece_count(&self) -> usize {
        self.pieces().count()
    }

    /// The only way pieces move. Every check runs before the grid is touched.
    pub fn execute_move(&mut self, start: Square, end: Square) -> Result<MoveOutcome, MoveError> {
        if self.game_state == GameState::GameOver {
            return Err(MoveError::GameOver);
        }
        if !start.is_on_board() || !end.is_on_board() {
            return Err(MoveError::InvalidCoordinate);
        }
        let piece = self.piece_at(start).ok_or(MoveError::NoPiece)?;
        if piece.color != self.current_player {
            return Err(MoveError::WrongPlayer);
        }
        if !generate_moves(self, &piece, false).contains(&end) {
            return Err(MoveError::IllegalDestination);
        }

        let target = self.piece_at(end);
        let promoted = piece.kind == PieceType::Pawn && (end.rank == 0 || end.rank == HEIGHT - 1);
        let moved = if promoted {
            Piece::new(piece.color.promotion_kind(), piece.color, end)
        } else {
            Piece { square: end, ..piece }
        };
        self.squares[end.rank][end.file] = Some(moved);
        self.squares[start.rank][start.file] = None;

        let event = match target {
            Some(captured) if captured.kind == PieceType::Monarch => {
                self.game_state = GameState::GameOver;
                Event::GameOver
            }
            Some(_) => Event::Capture,
            None => Event::Move,
        };

        let mut entry = format!("{}{}{}", piece.kind.symbol(), if target.is_some() { "x" } else { "" }, end);
        if promoted {
            entry.push('=');
            entry.push(moved.kind.symbol());
        }
        log::debug!("{:?} plays {} ({} -> {})", piece.color, entry, start, end);
        self.move_history.push(entry);

        if self.game_state != GameState::GameOver {
            self.current_player = self.current_player.opposite();
            self.game_state = GameState::turn_of(self.current_player);
        } else {
            log::info!("{:?} captured the Monarch", self.current_player);
        }
        log::trace!("Board after move:\n{}", to_string(self));

        Ok(MoveOutcome {
            game_state: self.game_state,
            current_player: self.current_player,
            event,
        })
    }

    /// Back to the starting layout with White to move. The difficulty is kept.
    pub fn reset(&mut self) {
        let difficulty = self.difficulty;
        *self = new_board();
        self.difficulty = difficulty;
    }

    pub fn view(&self) -> BoardView {
        BoardView {
            squares: self.squares,
            move_history: self.move_history.clone(),
            game_state: self.game_state,
            current_player: self.current_player,
            difficulty: self.difficulty,
        }
    }
}

pub fn to_string(board: &Board) -> String {
    let mut result: String = String::new();
    for row in 0 .. HEIGHT {
        for col in 0 .. WIDTH {
            let icon = match &board.squares[row][col] {
                None => ' ',
                Some(p) => if p.color == Color::White {
                    p.kind.symbol()
                } else {
                    p.kind.symbol().to_ascii_lowercase()
                }
            };
            result.push(icon);
        }
        result.push('\n');
    }
    result.pop();
    result
}

fn new_pieces(color: Color, rank: usize) -> [Option<Piece>; WIDTH] {
    let minor = match color {
        White => PieceType::Knight,
        Black => PieceType::Bishop,
    };
    let kinds = [PieceType::Rook, minor, PieceType::Monarch, minor, PieceType::Rook];
    let mut row = [None; WIDTH];
    for (file, kind) in kinds.into_iter().enumerate() {
        row[file] = Some(Piece::new(kind, color, Square::new(rank, file)));
    }
    row
}

fn new_pawns(color: Color, rank: usize) -> [Option<Piece>; WIDTH] {
    let mut row = [None; WIDTH];
    for (file, cell) in row.iter_mut().enumerate() {
        *cell = Some(Piece::new(PieceType::Pawn, color, Square::new(rank, file)));
    }
    row
}

fn new_empty() -> [Option<Piece>; WIDTH] {
    [None; WIDTH]
}

pub fn new_board() -> Board {
    let squares = [
        new_pieces(Black, 0),
        new_pawns(Black, 1),
        new_empty(),
        new_empty(),
        new_empty(),
        new_empty(),
        new_pawns(White, 6),
        new_pieces(White, 7),
    ];
    Board {
        squares,
        current_player: White,
        game_state: GameState::WhiteTurn,
        move_history: Vec::new(),
        difficulty: Difficulty::default(),
    }
}

#[cfg(test)]
pub(crate) fn empty_board(to_play: Color) -> Board {
    Board {
        squares: [[None; WIDTH]; HEIGHT],
        current_player: to_play,
        game_state: GameState::turn_of(to_play),
        move_history: Vec::new(),
        difficulty: Difficulty::default(),
    }
}

#[cfg(test)]
pub(crate) fn place(board: &mut Board, rank: usize, col: usize, color: Color, kind: PieceType) {
    board.squares[rank][col] = Some(Piece::new(kind, color, Square::new(rank, col)));
}
