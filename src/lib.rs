//! Rules engine for Monarch chess, an 8 × 5 variant won by capturing the enemy Monarch,
//! plus the single-ply bot that plays the black side.

pub mod board;
pub mod bot;
pub mod communication_protocol;
pub mod config;
pub mod error;
pub mod game_server;
pub mod moves;

pub use board::{new_board, Board, BoardView, Color, Event, GameState, MoveOutcome, Piece, PieceType, Square};
pub use bot::{automated_reply, select_move, Difficulty};
pub use error::MoveError;
pub use moves::{legal_destinations, Move};
