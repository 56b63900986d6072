use std::collections::VecDeque;

use chrono::{DateTime, Local, Utc};

use crate::common::{ChatMessage, NetworkEvent};
use crate::network::session::ConnectionState;

use super::render::{RenderRow, RenderStrategy};

const MAX_DEBUG_EVENTS: usize = 100;

/// Sender-local wall clock time stamped on outgoing messages.
pub fn local_time() -> String {
    Local::now().format("%H:%M:%S").to_string()
}

/// Entry in the connection log panel.
#[derive(Debug, Clone)]
pub struct DebugEvent {
    pub timestamp: DateTime<Utc>,
    pub event_type: String,
    pub message: String,
}

/// Trạng thái cục bộ của UI: các dòng đã render, ô nhập và trạng thái kết nối.
pub struct AppState {
    pub rows: VecDeque<RenderRow>,
    pub username_input: String,
    pub text_input: String,
    pub connection: ConnectionState,
    pub debug_events: Vec<DebugEvent>,
    /// Row to bring into view on the next frame.
    pub scroll_to: Option<usize>,
    strategy: RenderStrategy,
    clear_on_reconnect: bool,
}

impl AppState {
    pub fn new(strategy: RenderStrategy, clear_on_reconnect: bool) -> Self {
        Self {
            rows: VecDeque::new(),
            username_input: String::new(),
            text_input: String::new(),
            connection: ConnectionState::Disconnected,
            debug_events: Vec::new(),
            scroll_to: None,
            strategy,
            clear_on_reconnect,
        }
    }

    pub fn strategy(&self) -> RenderStrategy {
        self.strategy
    }

    pub fn apply(&mut self, event: NetworkEvent) {
        match event {
            NetworkEvent::Connecting { url } => {
                self.connection = ConnectionState::Connecting;
                if self.clear_on_reconnect {
                    self.rows.clear();
                    self.scroll_to = None;
                }
                self.add_debug_event("CONNECTING", format!("Connecting to {url}"));
            }
            NetworkEvent::Connected => {
                self.connection = ConnectionState::Connected;
                self.add_debug_event("CONNECTED", "Connection open".to_string());
            }
            NetworkEvent::Disconnected { reason } => {
                self.connection = ConnectionState::Disconnected;
                self.add_debug_event("DISCONNECTED", reason);
            }
            NetworkEvent::ReconnectScheduled { delay } => {
                self.add_debug_event(
                    "RECONNECT_SCHEDULED",
                    format!("Reconnecting in {:.1}s", delay.as_secs_f64()),
                );
            }
            NetworkEvent::MessageReceived(message) => self.push_message(message),
            NetworkEvent::Disposed => {
                self.connection = ConnectionState::Disposed;
                self.add_debug_event("DISPOSED", "Client stopped".to_string());
            }
        }
    }

    pub fn push_message(&mut self, message: ChatMessage) {
        let row = self.strategy.render(message);
        let index = self.strategy.insert(&mut self.rows, row);
        self.scroll_to = Some(index);
    }

    /// Whether the send form is live. It is detached while the socket is down.
    pub fn can_submit(&self) -> bool {
        self.connection == ConnectionState::Connected
    }

    /// Build the outgoing message from the form and clear the text field.
    ///
    /// The username field is kept as is, and neither field is validated.
    pub fn submit(&mut self, time: Option<String>) -> Option<ChatMessage> {
        if !self.can_submit() {
            log::debug!("Submit ignored while {:?}", self.connection);
            return None;
        }

        let message = ChatMessage::new(
            self.username_input.clone(),
            std::mem::take(&mut self.text_input),
        );
        Some(match time {
            Some(time) => message.with_time(time),
            None => message,
        })
    }

    pub fn add_debug_event(&mut self, event_type: &str, message: String) {
        self.debug_events.push(DebugEvent {
            timestamp: Utc::now(),
            event_type: event_type.to_string(),
            message,
        });

        // Giữ tối đa 100 events
        if self.debug_events.len() > MAX_DEBUG_EVENTS {
            self.debug_events.remove(0);
        }
    }
}
