use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::common::{ChatMessage, color_from};

/// How incoming messages are laid out in the chat area.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderStrategy {
    /// Time, colored username and text in columns. Newest row on top.
    #[default]
    Table,
    /// Plain `username: text` lines. Newest line at the bottom.
    Paragraph,
}

/// Display form of one received message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderRow {
    /// `#rrggbb`, only set by [`RenderStrategy::Table`].
    pub color: Option<String>,
    pub username: String,
    pub text: String,
    pub time: Option<String>,
}

impl RenderRow {
    /// Single-line form used by the paragraph layout and headless output.
    pub fn line(&self) -> String {
        match &self.time {
            Some(time) => format!("[{time}] {}: {}", self.username, self.text),
            None => format!("{}: {}", self.username, self.text),
        }
    }
}

impl RenderStrategy {
    pub fn render(self, message: ChatMessage) -> RenderRow {
        match self {
            RenderStrategy::Table => RenderRow {
                color: Some(color_from(&message.username)),
                username: message.username,
                text: message.text,
                time: message.time,
            },
            RenderStrategy::Paragraph => RenderRow {
                color: None,
                username: message.username,
                text: message.text,
                time: None,
            },
        }
    }

    /// Insert `row` at this layout's newest end. Returns the row's index.
    pub fn insert(self, rows: &mut VecDeque<RenderRow>, row: RenderRow) -> usize {
        match self {
            RenderStrategy::Table => {
                rows.push_front(row);
                0
            }
            RenderStrategy::Paragraph => {
                rows.push_back(row);
                rows.len() - 1
            }
        }
    }
}

impl fmt::Display for RenderStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderStrategy::Table => f.write_str("table"),
            RenderStrategy::Paragraph => f.write_str("paragraph"),
        }
    }
}

impl FromStr for RenderStrategy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "table" => Ok(RenderStrategy::Table),
            "paragraph" => Ok(RenderStrategy::Paragraph),
            other => Err(format!(
                "unknown render strategy `{other}` (expected table or paragraph)"
            )),
        }
    }
}
