pub mod client;
pub mod session;
pub mod transport;
pub mod url;

pub use client::{ChatClient, ClientOptions};
