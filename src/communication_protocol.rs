use crate::board::{BoardView, Event, Square};
use crate::bot::Difficulty;
use crate::error::MoveError;

#[derive(Debug, PartialEq, serde::Deserialize)]
#[serde(tag = "msg_type")]
pub enum JsonMsg {
    Select { square: (usize, usize) },
    Move { from: (usize, usize), to: (usize, usize) },
    Reset,
    UpdateMode { mode: Difficulty },
    Ping,
}

#[derive(Debug, PartialEq, serde::Serialize)]
#[serde(tag = "msg_type")]
pub enum ServerMsg {
    Board {
        board: BoardView,
        last_move: Option<(Square, Square)>,
        event: Option<Event>,
    },
    PossibleMoves {
        square: Square,
        moves: Vec<Square>,
    },
    Error {
        reason: MoveError,
        message: String,
    },
    ModeUpdated {
        mode: Difficulty,
    },
}

impl From<MoveError> for ServerMsg {
    fn from(err: MoveError) -> Self {
        ServerMsg::Error { reason: err, message: err.to_string() }
    }
}
