use std::error::Error;
use std::net::TcpListener;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread::{current, sleep, spawn};
use std::time::Duration;

use rand::random;
use tungstenite::{accept, Message};

use monarch_chess::communication_protocol::JsonMsg;
use monarch_chess::config::Config;
use monarch_chess::game_server::{self, clone_ws, ChannelMsg};

fn thread_game_monitor(sender: Sender<ChannelMsg>, interval: Duration) {
    loop {
        if sender.send(ChannelMsg::ValueMonitor).is_err() {
            return;
        }
        sleep(interval);
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let logger_env = env_logger::Env::default().filter_or("LOG_LEVEL", "INFO");
    env_logger::Builder::from_env(logger_env).format_timestamp_millis().init();

    let config = Config::from_env()?;
    log::info!("Starting with {:?}", config);

    let (sender_origin, receiver): (Sender<ChannelMsg>, Receiver<ChannelMsg>) = channel();

    let monitor_sender = sender_origin.clone();
    let interval = config.monitor_interval;
    spawn(move || thread_game_monitor(monitor_sender, interval));
    let server = TcpListener::bind(&config.bind_address)?;
    spawn(move || game_server::handle_game(receiver, config));

    for stream in server.incoming() {
        let sender = sender_origin.clone();
        let tcp_stream = match stream {
            Ok(s) => s,
            Err(e) => {
                log::error!("Cannot use tcp stream: {}", e);
                continue
            }
        };
        let mut websocket = match accept(tcp_stream) {
            Ok(w) => w,
            Err(e) => {
                log::error!("Cannot create websocket: {}", e);
                continue
            }
        };
        let ws_clone = match clone_ws(&websocket) {
            Ok(w) => w,
            Err(e) => {
                log::error!("Cannot clone websocket: {}", e);
                continue
            }
        };
        let client_id: u32 = random();

        if sender.send(ChannelMsg::NewConnection(client_id, ws_clone)).is_err() {
            log::error!("Game loop is gone, shutting down");
            break;
        }

        spawn(move || {
            let thread_id = current().id();
            log::debug!("New client {}", client_id);
            loop {
                let msg = match websocket.read() {
                    Ok(m) => m,
                    Err(e) => {
                        log::info!("Cannot read websocket, error: {}", e);
                        let _ = sender.send(ChannelMsg::Disconnect(client_id));
                        return;
                    }
                };

                log::debug!("{:?} - Received: {:?}", thread_id, msg);
                match msg {
                    Message::Text(m) => {
                        let decoded: JsonMsg = match serde_json::from_str(&m) {
                            Ok(d) => d,
                            Err(e) => {
                                log::warn!("Dropping malformed message {:?}: {}", m, e);
                                continue
                            }
                        };
                        if sender.send(ChannelMsg::Msg(client_id, decoded)).is_err() {
                            return;
                        }
                    }
                    Message::Close(_) => {
                        log::debug!("Closing websocket");
                        let _ = sender.send(ChannelMsg::Disconnect(client_id));
                        break;
                    }
                    _ => {}
                };
            }
        });
    }
    Ok(())
}
