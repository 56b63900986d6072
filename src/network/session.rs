//! Connection state machine for one chat client.
//!
//! [`Session`] owns no socket and no timer. It takes [`SessionInput`]s and answers
//! with [`SessionAction`]s which the async driver in `client.rs` carries out, so
//! reconnect and frame handling can be exercised without a network or a window.

use std::time::Duration;

use crate::common::{ChatMessage, NetworkEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    Disposed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionInput {
    /// First connection attempt.
    Start,
    /// The socket handshake completed.
    Opened,
    /// The socket could not be opened.
    OpenFailed(String),
    /// The open socket was closed, by either side or by a network error.
    Closed(String),
    /// The reconnect delay has passed.
    ReconnectElapsed,
    /// An inbound text frame.
    Frame(String),
    /// The user submitted the form.
    Submit(ChatMessage),
    Dispose,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionAction {
    /// Open a new socket to this URL, replacing any previous one.
    Open(String),
    /// Write one text frame.
    Send(String),
    /// Report to the UI.
    Emit(NetworkEvent),
    ScheduleReconnect(Duration),
    CancelReconnect,
    /// Close the current socket, or abandon the attempt to open one.
    Close,
}

pub struct Session {
    url: String,
    reconnect_delay: Duration,
    state: ConnectionState,
    reconnect_pending: bool,
    attempts: u64,
}

impl Session {
    pub fn new(url: impl Into<String>, reconnect_delay: Duration) -> Self {
        Self {
            url: url.into(),
            reconnect_delay,
            state: ConnectionState::Disconnected,
            reconnect_pending: false,
            attempts: 0,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Connection attempts made so far, the first one included.
    pub fn attempts(&self) -> u64 {
        self.attempts
    }

    pub fn handle(&mut self, input: SessionInput) -> Vec<SessionAction> {
        use ConnectionState::*;

        match (self.state, input) {
            (Disposed, input) => {
                log::debug!("Ignoring {input:?} after dispose");
                Vec::new()
            }
            (_, SessionInput::Dispose) => self.dispose(),
            (Disconnected, SessionInput::Start) if !self.reconnect_pending => self.open(),
            (Disconnected, SessionInput::ReconnectElapsed) if self.reconnect_pending => {
                self.reconnect_pending = false;
                self.open()
            }
            (Connecting, SessionInput::Opened) => {
                self.state = Connected;
                log::info!("Connected to {}", self.url);
                vec![SessionAction::Emit(NetworkEvent::Connected)]
            }
            (Connecting, SessionInput::OpenFailed(reason))
            | (Connecting, SessionInput::Closed(reason))
            | (Connected, SessionInput::Closed(reason)) => self.lost(reason),
            (Connected, SessionInput::Frame(frame)) => self.receive(&frame),
            (Connected, SessionInput::Submit(message)) => self.send(&message),
            (state, SessionInput::Submit(message)) => {
                log::warn!(
                    "Not sending message from {} while {state:?}",
                    message.username
                );
                Vec::new()
            }
            (state, input) => {
                log::debug!("Ignoring {input:?} while {state:?}");
                Vec::new()
            }
        }
    }

    fn open(&mut self) -> Vec<SessionAction> {
        self.state = ConnectionState::Connecting;
        self.attempts += 1;
        log::info!("Connecting to {} (attempt {})", self.url, self.attempts);
        vec![
            SessionAction::Emit(NetworkEvent::Connecting {
                url: self.url.clone(),
            }),
            SessionAction::Open(self.url.clone()),
        ]
    }

    // Retries are unconditional and fixed-interval.
    fn lost(&mut self, reason: String) -> Vec<SessionAction> {
        self.state = ConnectionState::Disconnected;
        self.reconnect_pending = true;
        log::warn!(
            "Connection closed ({reason}), reconnecting in {:?}",
            self.reconnect_delay
        );
        vec![
            SessionAction::Emit(NetworkEvent::Disconnected { reason }),
            SessionAction::ScheduleReconnect(self.reconnect_delay),
            SessionAction::Emit(NetworkEvent::ReconnectScheduled {
                delay: self.reconnect_delay,
            }),
        ]
    }

    fn receive(&mut self, frame: &str) -> Vec<SessionAction> {
        match ChatMessage::from_frame(frame) {
            Ok(message) => vec![SessionAction::Emit(NetworkEvent::MessageReceived(message))],
            Err(err) => {
                log::warn!("Dropping malformed frame ({err}): {frame:?}");
                Vec::new()
            }
        }
    }

    fn send(&mut self, message: &ChatMessage) -> Vec<SessionAction> {
        match message.to_frame() {
            Ok(frame) => vec![SessionAction::Send(frame)],
            Err(err) => {
                log::warn!("Failed to serialize message: {err}");
                Vec::new()
            }
        }
    }

    fn dispose(&mut self) -> Vec<SessionAction> {
        let mut actions = Vec::new();
        if self.reconnect_pending {
            self.reconnect_pending = false;
            actions.push(SessionAction::CancelReconnect);
        }
        if matches!(
            self.state,
            ConnectionState::Connecting | ConnectionState::Connected
        ) {
            actions.push(SessionAction::Close);
        }
        self.state = ConnectionState::Disposed;
        log::info!("Chat client for {} disposed", self.url);
        actions.push(SessionAction::Emit(NetworkEvent::Disposed));
        actions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "ws://127.0.0.1:8080/websocket";

    fn connected() -> Session {
        let mut session = Session::new(URL, Duration::from_secs(1));
        session.handle(SessionInput::Start);
        session.handle(SessionInput::Opened);
        session
    }

    #[test]
    fn start_opens_socket() {
        let mut session = Session::new(URL, Duration::from_secs(1));
        let actions = session.handle(SessionInput::Start);

        assert_eq!(
            actions,
            vec![
                SessionAction::Emit(NetworkEvent::Connecting {
                    url: URL.to_string()
                }),
                SessionAction::Open(URL.to_string()),
            ]
        );
        assert_eq!(session.state(), ConnectionState::Connecting);
        assert_eq!(session.attempts(), 1);
    }

    #[test]
    fn opened_becomes_connected() {
        let session = connected();
        assert_eq!(session.state(), ConnectionState::Connected);
    }

    #[test]
    fn submit_sends_exactly_one_frame() {
        let mut session = connected();
        let actions = session.handle(SessionInput::Submit(ChatMessage::new("bob", "hello")));

        assert_eq!(
            actions,
            vec![SessionAction::Send(
                r#"{"username":"bob","text":"hello"}"#.to_string()
            )]
        );
    }

    #[test]
    fn frame_becomes_message_event() {
        let mut session = connected();
        let actions = session.handle(SessionInput::Frame(
            r#"{"username":"carol","text":"hi"}"#.to_string(),
        ));

        assert_eq!(
            actions,
            vec![SessionAction::Emit(NetworkEvent::MessageReceived(
                ChatMessage::new("carol", "hi")
            ))]
        );
    }

    #[test]
    fn malformed_frame_is_dropped() {
        let mut session = connected();
        assert!(session.handle(SessionInput::Frame("{oops".to_string())).is_empty());
        assert!(session.handle(SessionInput::Frame("[1,2]".to_string())).is_empty());

        // Still handling frames afterwards.
        assert_eq!(
            session
                .handle(SessionInput::Frame(
                    r#"{"username":"carol","text":"hi"}"#.to_string()
                ))
                .len(),
            1
        );
        assert_eq!(session.state(), ConnectionState::Connected);
    }

    #[test]
    fn malformed_frame_logs_one_warning() {
        let mut session = connected();

        testing_logger::setup();
        session.handle(SessionInput::Frame("{oops".to_string()));
        testing_logger::validate(|logs| {
            let warnings: Vec<_> = logs
                .iter()
                .filter(|entry| entry.level == log::Level::Warn)
                .collect();
            assert_eq!(warnings.len(), 1);
            assert!(warnings[0].body.contains("malformed frame"));
        });

        testing_logger::setup();
        session.handle(SessionInput::Frame(
            r#"{"username":"carol","text":"hi"}"#.to_string(),
        ));
        testing_logger::validate(|logs| {
            assert!(logs.iter().all(|entry| entry.level != log::Level::Warn));
        });
    }

    #[test]
    fn close_schedules_fixed_reconnect() {
        let mut session = connected();
        let actions = session.handle(SessionInput::Closed("server went away".to_string()));

        assert_eq!(
            actions,
            vec![
                SessionAction::Emit(NetworkEvent::Disconnected {
                    reason: "server went away".to_string()
                }),
                SessionAction::ScheduleReconnect(Duration::from_secs(1)),
                SessionAction::Emit(NetworkEvent::ReconnectScheduled {
                    delay: Duration::from_secs(1)
                }),
            ]
        );
        assert_eq!(session.state(), ConnectionState::Disconnected);
    }

    #[test]
    fn no_submit_while_disconnected() {
        let mut session = connected();
        session.handle(SessionInput::Closed("gone".to_string()));

        let actions = session.handle(SessionInput::Submit(ChatMessage::new("bob", "hello")));
        assert!(actions.is_empty());
    }

    #[test]
    fn no_submit_while_connecting() {
        let mut session = Session::new(URL, Duration::from_secs(1));
        session.handle(SessionInput::Start);

        let actions = session.handle(SessionInput::Submit(ChatMessage::new("bob", "hello")));
        assert!(actions.is_empty());
    }

    #[test]
    fn reconnect_after_delay_opens_again() {
        let mut session = connected();
        session.handle(SessionInput::Closed("gone".to_string()));

        let actions = session.handle(SessionInput::ReconnectElapsed);
        assert!(actions.contains(&SessionAction::Open(URL.to_string())));
        assert_eq!(session.state(), ConnectionState::Connecting);
        assert_eq!(session.attempts(), 2);

        session.handle(SessionInput::Opened);
        let actions = session.handle(SessionInput::Submit(ChatMessage::new("bob", "again")));
        assert_eq!(actions.len(), 1);
    }

    #[test]
    fn failed_open_retries_forever() {
        let mut session = Session::new(URL, Duration::from_millis(10));
        session.handle(SessionInput::Start);

        for _ in 0..50 {
            let actions = session.handle(SessionInput::OpenFailed("refused".to_string()));
            assert!(actions.contains(&SessionAction::ScheduleReconnect(Duration::from_millis(10))));
            let actions = session.handle(SessionInput::ReconnectElapsed);
            assert!(actions.contains(&SessionAction::Open(URL.to_string())));
        }
        assert_eq!(session.attempts(), 51);
    }

    #[test]
    fn stray_timer_does_not_open() {
        let mut session = Session::new(URL, Duration::from_secs(1));
        assert!(session.handle(SessionInput::ReconnectElapsed).is_empty());
        assert_eq!(session.state(), ConnectionState::Disconnected);
    }

    #[test]
    fn start_twice_is_ignored() {
        let mut session = Session::new(URL, Duration::from_secs(1));
        session.handle(SessionInput::Start);
        assert!(session.handle(SessionInput::Start).is_empty());
        assert_eq!(session.attempts(), 1);
    }

    #[test]
    fn dispose_while_waiting_cancels_timer() {
        let mut session = connected();
        session.handle(SessionInput::Closed("gone".to_string()));

        let actions = session.handle(SessionInput::Dispose);
        assert_eq!(
            actions,
            vec![
                SessionAction::CancelReconnect,
                SessionAction::Emit(NetworkEvent::Disposed),
            ]
        );
        assert_eq!(session.state(), ConnectionState::Disposed);
        assert!(session.handle(SessionInput::ReconnectElapsed).is_empty());
    }

    #[test]
    fn dispose_while_connecting_abandons_open() {
        let mut session = Session::new(URL, Duration::from_secs(1));
        session.handle(SessionInput::Start);

        assert_eq!(
            session.handle(SessionInput::Dispose),
            vec![
                SessionAction::Close,
                SessionAction::Emit(NetworkEvent::Disposed),
            ]
        );
        assert!(session.handle(SessionInput::Opened).is_empty());
        assert_eq!(session.state(), ConnectionState::Disposed);
    }

    #[test]
    fn dispose_while_connected_closes_socket() {
        let mut session = connected();
        let actions = session.handle(SessionInput::Dispose);
        assert_eq!(
            actions,
            vec![
                SessionAction::Close,
                SessionAction::Emit(NetworkEvent::Disposed),
            ]
        );
        assert!(session.handle(SessionInput::Frame("{}".to_string())).is_empty());
        assert!(session.handle(SessionInput::Dispose).is_empty());
    }
}
