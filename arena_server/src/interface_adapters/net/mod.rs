// Network adapter for the public game socket.

pub mod client;

pub use client::ws_handler;
