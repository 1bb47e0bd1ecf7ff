use log::info;
use std::io;
use std::net::{TcpListener, TcpStream};
use std::thread;

use crate::args::Args;
use crate::logging::LoggingExt;
use crate::ws::echo::run_echo_loop;
use crate::ws::handshake::{accept_websocket, OriginPolicy};

pub fn start_server(args: Args) -> io::Result<()> {
    let listener = TcpListener::bind(&args.listen_addr)?;
    println!("Listening on: {}", args.listen_addr);
    println!("WebSocket endpoint: {}", args.ws_path);

    serve(listener, args)
}

pub fn serve(listener: TcpListener, args: Args) -> io::Result<()> {
    let policy = OriginPolicy::from_allowlist(args.allow_origins.clone());

    for stream in listener.incoming() {
        // A failed accept ends nothing but that attempt.
        let Some(stream) = check_accept(stream) else {
            continue;
        };
        let args = args.clone();
        let policy = policy.clone();

        thread::spawn(move || {
            if let Err(e) = handle_connection(stream, &args, &policy) {
                log::error!("Error handling connection: {}", e);
            }
        });
    }

    Ok(())
}

fn check_accept(stream: io::Result<TcpStream>) -> Option<TcpStream> {
    match stream {
        Ok(stream) => Some(stream),
        Err(e) => {
            log::error!("Error accepting connection: {}", e);
            None
        }
    }
}

fn handle_connection(stream: TcpStream, args: &Args, policy: &OriginPolicy) -> io::Result<()> {
    let peer = stream.peer_addr()?;
    info!("New connection from {}", peer);

    // The deadline also bounds the handshake read.
    stream.set_read_timeout(args.read_deadline())?;

    let mut websocket = peer.log_operation("websocket_upgrade", || {
        accept_websocket(stream, &args.ws_path, policy)
    })?;

    let reason = run_echo_loop(&mut websocket);
    info!("Connection from {} closed: {}", peer, reason);

    Ok(())
}
