pub mod color;
pub mod commands;
pub mod events;
pub mod types;

pub use color::color_from;
pub use commands::NetworkCommand;
pub use events::NetworkEvent;
pub use types::ChatMessage;
