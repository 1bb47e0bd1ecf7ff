pub mod echo;
pub mod handshake;
