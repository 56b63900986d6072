use std::time::Duration;

use super::types::ChatMessage;

/// Sự kiện từ tầng mạng gửi lên UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkEvent {
    /// A connection attempt to `url` has started.
    Connecting { url: String },
    Connected,
    Disconnected { reason: String },
    ReconnectScheduled { delay: Duration },
    MessageReceived(ChatMessage),
    Disposed,
}
