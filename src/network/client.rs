use std::collections::VecDeque;
use std::future::{self, Future};
use std::pin::Pin;
use std::time::Duration;

use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio::time::Sleep;
use tokio_tungstenite::tungstenite::{self, Message};

use crate::common::{NetworkCommand, NetworkEvent};
use crate::error::ClientError;

use super::session::{ConnectionState, Session, SessionAction, SessionInput};
use super::transport::{self, ChatSocket};

/// Connection settings for one [`ChatClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientOptions {
    /// Full socket URL, e.g. `ws://127.0.0.1:8080/websocket`.
    pub url: String,
    pub reconnect_delay: Duration,
    pub connect_timeout: Duration,
}

type PendingOpen = Pin<Box<dyn Future<Output = Result<ChatSocket, ClientError>> + Send>>;

/// Drives a [`Session`] against a real socket and reconnect timer.
pub struct ChatClient {
    options: ClientOptions,
    event_sender: mpsc::Sender<NetworkEvent>,
    command_receiver: mpsc::Receiver<NetworkCommand>,
    socket: Option<ChatSocket>,
    /// Handshake in flight. Dropping it abandons the attempt.
    connecting: Option<PendingOpen>,
    reconnect: Option<Pin<Box<Sleep>>>,
}

impl ChatClient {
    pub fn new(
        event_sender: mpsc::Sender<NetworkEvent>,
        command_receiver: mpsc::Receiver<NetworkCommand>,
        options: ClientOptions,
    ) -> Self {
        Self {
            options,
            event_sender,
            command_receiver,
            socket: None,
            connecting: None,
            reconnect: None,
        }
    }

    /// Run until disposed, either by [`NetworkCommand::Dispose`] or by every
    /// command sender being dropped.
    pub async fn run(mut self) {
        let mut session = Session::new(self.options.url.clone(), self.options.reconnect_delay);
        let mut pending = VecDeque::from([SessionInput::Start]);

        loop {
            while let Some(input) = pending.pop_front() {
                for action in session.handle(input) {
                    if let Some(next) = self.perform(action).await {
                        pending.push_back(next);
                    }
                }
            }

            if session.state() == ConnectionState::Disposed {
                break;
            }

            let input = tokio::select! {
                command = self.command_receiver.recv() => match command {
                    Some(NetworkCommand::SendMessage(message)) => Some(SessionInput::Submit(message)),
                    Some(NetworkCommand::Dispose) | None => Some(SessionInput::Dispose),
                },
                opened = wait_open(&mut self.connecting) => {
                    self.connecting = None;
                    match opened {
                        Ok(socket) => {
                            self.socket = Some(socket);
                            Some(SessionInput::Opened)
                        }
                        Err(err) => Some(SessionInput::OpenFailed(err.to_string())),
                    }
                }
                frame = next_frame(&mut self.socket) => self.handle_frame(frame),
                _ = wait_reconnect(&mut self.reconnect) => {
                    self.reconnect = None;
                    Some(SessionInput::ReconnectElapsed)
                }
            };

            pending.extend(input);
        }

        log::info!(
            "Chat client stopped after {} connection attempts",
            session.attempts()
        );
    }

    async fn perform(&mut self, action: SessionAction) -> Option<SessionInput> {
        match action {
            SessionAction::Open(url) => {
                self.socket = None;
                let timeout = self.options.connect_timeout;
                self.connecting = Some(Box::pin(
                    async move { transport::open(&url, timeout).await },
                ));
                None
            }
            SessionAction::Send(frame) => {
                let Some(socket) = self.socket.as_mut() else {
                    log::warn!("No socket to send on; dropping frame");
                    return None;
                };
                match socket.send(Message::text(frame)).await {
                    Ok(()) => None,
                    Err(err) => {
                        self.socket = None;
                        Some(SessionInput::Closed(err.to_string()))
                    }
                }
            }
            SessionAction::Emit(event) => {
                if let Err(err) = self.event_sender.send(event).await {
                    log::debug!("UI no longer listening: {err}");
                }
                None
            }
            SessionAction::ScheduleReconnect(delay) => {
                self.reconnect = Some(Box::pin(tokio::time::sleep(delay)));
                None
            }
            SessionAction::CancelReconnect => {
                self.reconnect = None;
                None
            }
            SessionAction::Close => {
                if self.connecting.take().is_some() {
                    log::debug!("Abandoning connection attempt in progress");
                }
                if let Some(mut socket) = self.socket.take() {
                    if let Err(err) = socket.close(None).await {
                        log::debug!("Error closing socket: {err}");
                    }
                }
                None
            }
        }
    }

    fn handle_frame(
        &mut self,
        frame: Option<Result<Message, tungstenite::Error>>,
    ) -> Option<SessionInput> {
        match frame {
            Some(Ok(Message::Text(text))) => Some(SessionInput::Frame(text.as_str().to_owned())),
            Some(Ok(Message::Binary(data))) => {
                log::debug!("Ignoring {} byte binary frame", data.len());
                None
            }
            Some(Ok(Message::Close(close))) => {
                self.socket = None;
                let reason = match close {
                    Some(close) => format!(
                        "closed by server ({} {})",
                        u16::from(close.code),
                        close.reason.as_str()
                    ),
                    None => "closed by server".to_string(),
                };
                Some(SessionInput::Closed(reason))
            }
            // Ping/pong are answered by tungstenite.
            Some(Ok(_)) => None,
            Some(Err(err)) => {
                self.socket = None;
                Some(SessionInput::Closed(err.to_string()))
            }
            None => {
                self.socket = None;
                Some(SessionInput::Closed("connection ended".to_string()))
            }
        }
    }
}

async fn next_frame(
    socket: &mut Option<ChatSocket>,
) -> Option<Result<Message, tungstenite::Error>> {
    match socket {
        Some(socket) => socket.next().await,
        None => future::pending().await,
    }
}

async fn wait_open(pending: &mut Option<PendingOpen>) -> Result<ChatSocket, ClientError> {
    match pending {
        Some(pending) => pending.as_mut().await,
        None => future::pending().await,
    }
}

async fn wait_reconnect(timer: &mut Option<Pin<Box<Sleep>>>) {
    match timer {
        Some(timer) => timer.as_mut().await,
        None => future::pending().await,
    }
}
