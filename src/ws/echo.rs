use log::{debug, info, warn};
use std::fmt;
use std::io;
use std::net::TcpStream;

use tungstenite::{Error as WsError, Message, WebSocket};

use crate::message;

#[derive(Debug, PartialEq, Copy, Clone)]
pub enum CloseReason {
    ClientClosed,
    IdleTimeout,
    ReadFailed,
    DecodeFailed,
    EncodeFailed,
    WriteFailed,
}

impl fmt::Display for CloseReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            CloseReason::ClientClosed => "client closed",
            CloseReason::IdleTimeout => "idle timeout",
            CloseReason::ReadFailed => "read failed",
            CloseReason::DecodeFailed => "decode failed",
            CloseReason::EncodeFailed => "encode failed",
            CloseReason::WriteFailed => "write failed",
        };
        f.write_str(text)
    }
}

// One connection, one loop: read a frame, decode it, set the reply key,
// write the frame back. The first failure ends the connection and nothing
// else; the process keeps serving other connections.
pub fn run_echo_loop(websocket: &mut WebSocket<TcpStream>) -> CloseReason {
    let mut echoed: u64 = 0;

    let reason = loop {
        let frame = match websocket.read() {
            Ok(frame) => frame,
            Err(WsError::ConnectionClosed | WsError::AlreadyClosed) => {
                break CloseReason::ClientClosed
            }
            Err(WsError::Io(e)) if is_timeout(&e) => {
                warn!("Read deadline exceeded, closing idle connection");
                break CloseReason::IdleTimeout;
            }
            Err(e) => {
                warn!("Error reading frame: {}", e);
                break CloseReason::ReadFailed;
            }
        };

        let decoded = match frame {
            Message::Text(text) => message::decode(text.as_str()),
            Message::Binary(bytes) => message::decode_bytes(&bytes),
            Message::Close(_) => break CloseReason::ClientClosed,
            // Pings are answered by the protocol layer during read.
            Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => continue,
        };

        let mut msg = match decoded {
            Ok(msg) => msg,
            Err(e) => {
                warn!("Error decoding json: {}", e);
                break CloseReason::DecodeFailed;
            }
        };

        info!("Received: {:?}", msg);
        message::apply_reply(&mut msg);

        let encoded = match message::encode(&msg) {
            Ok(encoded) => encoded,
            Err(e) => {
                warn!("Error encoding json: {}", e);
                break CloseReason::EncodeFailed;
            }
        };

        match websocket.send(Message::text(encoded)) {
            Ok(()) => echoed += 1,
            Err(e) => {
                warn!("Error writing json: {}", e);
                break CloseReason::WriteFailed;
            }
        }
    };

    // Best-effort close frame; ownership releases the socket either way.
    let _ = websocket.close(None);
    let _ = websocket.flush();

    debug!("Echo loop ended after {} message(s): {}", echoed, reason);
    reason
}

fn is_timeout(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut
    )
}
