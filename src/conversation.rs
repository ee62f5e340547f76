use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

/// A single transcript entry. Immutable once appended; ids follow insertion
/// order.
#[derive(Debug, Clone, Serialize)]
pub struct ChatTurn {
    pub id: u64,
    pub sender: Sender,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// Shortcut buttons offered early in the conversation.
pub const QUICK_REPLIES: &[&str] = &[
    "Yes, I'd like to report an IT issue",
    "What can you help me with?",
];

// Shortcuts disappear once the transcript reaches this many turns.
const QUICK_REPLY_TURN_LIMIT: usize = 5;

const OPENING_LINES: &[&str] = &[
    "Hello! I'm your IT support assistant. How can I help you today?",
    "Would you like to report a new IT issue?",
];

/// Append-only conversation transcript plus the two UI flags derived from it:
/// whether the bot is composing a reply and whether the incident form has
/// replaced the free-text input.
#[derive(Debug, Clone)]
pub struct Conversation {
    turns: Vec<ChatTurn>,
    next_id: u64,
    composing: bool,
    show_form: bool,
}

impl Conversation {
    pub fn new() -> Self {
        let mut conversation = Self {
            turns: Vec::new(),
            next_id: 1,
            composing: false,
            show_form: false,
        };
        for line in OPENING_LINES {
            conversation.push(Sender::Bot, (*line).to_string());
        }
        conversation
    }

    fn push(&mut self, sender: Sender, content: String) {
        self.turns.push(ChatTurn {
            id: self.next_id,
            sender,
            content,
            timestamp: Utc::now(),
        });
        self.next_id += 1;
    }

    /// Appends a user turn. Empty or whitespace-only input is silently
    /// dropped, as is any input while the bot is composing or the form is
    /// open (the input box is disabled then, but the state enforces it too).
    /// Returns whether the turn was accepted.
    pub fn post_user(&mut self, text: &str) -> bool {
        if text.trim().is_empty() || self.composing || self.show_form {
            return false;
        }
        self.push(Sender::User, text.to_string());
        true
    }

    /// Appends a bot turn immediately.
    pub fn post_bot(&mut self, text: &str) {
        self.push(Sender::Bot, text.to_string());
    }

    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    pub fn is_composing(&self) -> bool {
        self.composing
    }

    pub fn set_composing(&mut self, composing: bool) {
        self.composing = composing;
    }

    pub fn form_visible(&self) -> bool {
        self.show_form
    }

    pub fn set_form_visible(&mut self, visible: bool) {
        self.show_form = visible;
    }

    /// Quick-reply shortcuts, offered only while the transcript is short and
    /// the form is not open.
    pub fn quick_replies(&self) -> &'static [&'static str] {
        if self.turns.len() < QUICK_REPLY_TURN_LIMIT && !self.show_form {
            QUICK_REPLIES
        } else {
            &[]
        }
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}
