use std::collections::HashMap;
use std::net::TcpStream;
use std::sync::mpsc::Receiver;

use rand::Rng;
use tungstenite::protocol::Role;
use tungstenite::{Message, WebSocket};

use crate::board::{new_board, Board, Event, Square};
use crate::bot::{automated_reply, BOT_COLOR};
use crate::communication_protocol::{JsonMsg, ServerMsg};
use crate::config::Config;
use crate::moves::legal_destinations;

#[derive(Debug)]
pub enum ChannelMsg {
    NewConnection(u32, WebSocket<TcpStream>),
    Msg(u32, JsonMsg),
    Disconnect(u32),
    ValueMonitor,
}

fn board_update(board: &Board, last_move: Option<(Square, Square)>, event: Option<Event>) -> ServerMsg {
    ServerMsg::Board { board: board.view(), last_move, event }
}

/// Applies one client message to its session's board and returns what the client should see.
/// A successful human move is followed by the automated reply while the bot's side is to move.
pub fn respond<R: Rng + ?Sized>(board: &mut Board, msg: JsonMsg, rng: &mut R) -> Vec<ServerMsg> {
    match msg {
        JsonMsg::Select { square } => {
            let square = Square::from(square);
            match legal_destinations(board, square) {
                Ok(moves) => vec![ServerMsg::PossibleMoves { square, moves }],
                Err(e) => vec![e.into()],
            }
        }
        JsonMsg::Move { from, to } => {
            let (from, to) = (Square::from(from), Square::from(to));
            let outcome = match board.execute_move(from, to) {
                Ok(outcome) => outcome,
                Err(e) => {
                    log::debug!("Rejected move {} -> {}: {}", from, to, e);
                    return vec![e.into()];
                }
            };
            let mut responses = vec![board_update(board, Some((from, to)), Some(outcome.event))];
            if board.is_game_active() && board.current_player() == BOT_COLOR {
                match automated_reply(board, rng) {
                    Ok(Some((reply, reply_outcome))) => {
                        responses.push(board_update(board, Some((reply.start, reply.end)), Some(reply_outcome.event)));
                    }
                    Ok(None) => log::info!("Bot has no move to reply with"),
                    Err(e) => log::warn!("Bot reply failed: {}", e),
                }
            }
            responses
        }
        JsonMsg::Reset => {
            board.reset();
            vec![board_update(board, None, None)]
        }
        JsonMsg::UpdateMode { mode } => {
            board.set_difficulty(mode);
            vec![ServerMsg::ModeUpdated { mode }]
        }
        JsonMsg::Ping => {
            log::debug!("Ping");
            Vec::new()
        }
    }
}

pub fn handle_game(receiver: Receiver<ChannelMsg>, config: Config) {
    let mut boards: HashMap<u32, Board> = HashMap::new();
    let mut clients: HashMap<u32, WebSocket<TcpStream>> = HashMap::new();
    let mut rng = config.rng();

    loop {
        log::debug!("Waiting for message...");
        let msg = match receiver.recv() {
            Ok(msg) => msg,
            Err(_) => {
                log::info!("All senders are gone, stopping game loop");
                return;
            }
        };
        match msg {
            ChannelMsg::NewConnection(websocket_id, mut websocket) => {
                let mut board = new_board();
                board.set_difficulty(config.difficulty);
                send(&mut websocket, &board_update(&board, None, None));
                boards.insert(websocket_id, board);
                clients.insert(websocket_id, websocket);
                log::info!("New session {}", websocket_id);
            }

            ChannelMsg::Msg(websocket_id, decoded) => {
                let (Some(board), Some(websocket)) = (boards.get_mut(&websocket_id), clients.get_mut(&websocket_id)) else {
                    log::warn!("Message for unknown session {}", websocket_id);
                    continue;
                };
                for response in respond(board, decoded, &mut rng) {
                    send(websocket, &response);
                }
            }

            ChannelMsg::Disconnect(client_id) => {
                log::info!("Removing session {}", client_id);
                clients.remove(&client_id);
                boards.remove(&client_id);
            }

            ChannelMsg::ValueMonitor => {
                log::info!("Sessions: {}", boards.len());
                for (board_id, board) in &boards {
                    log::info!("({} - {:?}, {} moves)", board_id, board.game_state(), board.move_history().len());
                }
            }
        }
    }
}

fn send(socket: &mut WebSocket<TcpStream>, msg: &ServerMsg) {
    match serde_json::to_string(msg) {
        Ok(text) => try_send(socket, text),
        Err(e) => log::error!("Cannot serialize message, error: {}", e),
    }
}

fn try_send(ws: &mut WebSocket<TcpStream>, msg: String) {
    match ws.send(Message::Text(msg)) {
        Ok(_) => log::debug!("Msg sent"),
        Err(e) => log::warn!("Cannot send message, error: {}", e)
    }
}

/// Second handle on the same socket, so the reader thread and the game thread each own one.
pub fn clone_ws(websocket: &WebSocket<TcpStream>) -> std::io::Result<WebSocket<TcpStream>> {
    let tcp_stream: TcpStream = websocket.get_ref().try_clone()?;
    Ok(WebSocket::from_raw_socket(tcp_stream, Role::Server, Some(websocket.get_config().clone())))
}
