use super::types::ChatMessage;

/// Lệnh UI gửi xuống tầng mạng.
#[derive(Debug, Clone)]
pub enum NetworkCommand {
    /// Send one message over the open socket. Dropped if the socket is not open.
    SendMessage(ChatMessage),
    /// Cancel any pending reconnect, close the socket and stop the client.
    Dispose,
}
