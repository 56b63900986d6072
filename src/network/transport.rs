use std::time::Duration;

use tokio::net::TcpStream;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use crate::error::ClientError;

pub type ChatSocket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Open the chat socket, giving up after `timeout`.
pub async fn open(url: &str, timeout: Duration) -> Result<ChatSocket, ClientError> {
    match tokio::time::timeout(timeout, connect_async(url)).await {
        Ok(Ok((socket, response))) => {
            log::debug!("Handshake with {url} answered {}", response.status());
            Ok(socket)
        }
        Ok(Err(source)) => Err(ClientError::Connect {
            url: url.to_string(),
            source: Box::new(source),
        }),
        Err(_) => Err(ClientError::ConnectTimeout {
            url: url.to_string(),
            timeout,
        }),
    }
}
