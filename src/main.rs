use clap::Parser;
use std::io;

mod args;
mod logging;
mod message;
mod server;
mod ws;

use args::Args;
use server::start_server;

fn main() -> io::Result<()> {
    let args = Args::parse();
    logging::setup_logging();
    start_server(args)
}
