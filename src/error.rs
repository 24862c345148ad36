/// Why a move or a destination query was rejected. None of these mutate the board.
#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveError {
    #[error("coordinates are outside the board")]
    InvalidCoordinate,
    #[error("game is over")]
    GameOver,
    #[error("no piece at the selected coordinates")]
    NoPiece,
    #[error("piece belongs to the side not on move")]
    WrongPlayer,
    #[error("piece cannot move to that square")]
    IllegalDestination,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}")]
    InvalidValue { key: &'static str, value: String },
}
