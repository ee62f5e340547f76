use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::classifier::{self, Category};
use crate::conversation::Conversation;
use crate::form::{FormSession, IncidentRecord, SubmitAdvance};
use crate::validation::Field;

const SUCCESS_LINE: &str =
    "Your incident has been successfully submitted! The IT team will contact you soon.";
const CANCEL_LINE: &str = "No problem. Is there anything else I can help you with?";

/// Delay knobs for the scripted assistant, all in milliseconds.
#[derive(Debug, Clone, Copy)]
pub struct ChatTiming {
    pub thinking_min_ms: u64,
    pub thinking_max_ms: u64,
    pub transition_ms: u64,
}

impl Default for ChatTiming {
    fn default() -> Self {
        Self {
            thinking_min_ms: 1000,
            thinking_max_ms: 2000,
            transition_ms: 500,
        }
    }
}

impl ChatTiming {
    /// Pause between a bot reply (or form close) and the chained follow-up.
    pub fn transition_delay(&self) -> Duration {
        Duration::from_millis(self.transition_ms)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Error,
}

/// User-visible toast emitted by the session; the host UI renders and
/// discards these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub severity: Severity,
    pub title: String,
    pub description: String,
}

/// A bot reply that has been chosen but not yet delivered. The caller waits
/// out `delay` (the "thinking" pause) before calling `deliver_reply`.
#[derive(Debug, Clone)]
pub struct PlannedReply {
    pub category: Category,
    pub line: &'static str,
    pub delay: Duration,
}

/// What a form submit request produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Validation failed; the form stays in editing with inline errors.
    Invalid,
    /// Advanced to the review phase.
    Reviewing,
    /// Advanced to submitting; the caller runs the gateway call on this
    /// record and feeds the result to `complete_submit`.
    Dispatch(IncidentRecord),
    /// No form open, or submit is not legal in the current phase.
    Ignored,
}

/// Resolution of an in-flight submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitResolution {
    Succeeded,
    Failed,
    Ignored,
}

/// All state for one intake session: the transcript, the active form (if
/// any), the reply RNG and the pending notifications. There is exactly one
/// of these per process; every handler goes through it.
pub struct SupportSession {
    conversation: Conversation,
    form: Option<FormSession>,
    rng: StdRng,
    timing: ChatTiming,
    notifications: Vec<Notification>,
}

impl SupportSession {
    pub fn new(timing: ChatTiming) -> Self {
        Self::with_rng(timing, StdRng::from_entropy())
    }

    /// Seeded construction for deterministic tests.
    pub fn with_rng(timing: ChatTiming, rng: StdRng) -> Self {
        Self {
            conversation: Conversation::new(),
            form: None,
            rng,
            timing,
            notifications: Vec::new(),
        }
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn form(&self) -> Option<&FormSession> {
        self.form.as_ref()
    }

    pub fn timing(&self) -> ChatTiming {
        self.timing
    }

    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    fn notify(&mut self, severity: Severity, title: &str, description: &str) {
        self.notifications.push(Notification {
            severity,
            title: title.to_string(),
            description: description.to_string(),
        });
    }

    /// Accepts a user message and plans the bot's reply: classify, pick a
    /// canned line, pick a thinking delay. Returns `None` when the message
    /// is dropped (empty, or the assistant is busy). The caller delivers the
    /// reply after the delay.
    pub fn handle_user_message(&mut self, text: &str) -> Option<PlannedReply> {
        self.respond(text, None)
    }

    /// Entry point for the quick-reply shortcut buttons. An affirmative
    /// shortcut routes straight to the confirmation bucket so the form
    /// opens, instead of tripping over the issue keywords in its label.
    pub fn handle_quick_reply(&mut self, text: &str) -> Option<PlannedReply> {
        let category = text
            .to_lowercase()
            .contains("yes")
            .then_some(Category::Confirmation);
        self.respond(text, category)
    }

    fn respond(&mut self, text: &str, category: Option<Category>) -> Option<PlannedReply> {
        if !self.conversation.post_user(text) {
            return None;
        }
        let category = category.unwrap_or_else(|| classifier::classify(text));
        let line = classifier::select_response(category, &mut self.rng);
        let lo = self.timing.thinking_min_ms.min(self.timing.thinking_max_ms);
        let hi = self.timing.thinking_min_ms.max(self.timing.thinking_max_ms);
        let delay = Duration::from_millis(self.rng.gen_range(lo..=hi));
        self.conversation.set_composing(true);
        log::debug!("classified user message as {category:?}");
        Some(PlannedReply {
            category,
            line,
            delay,
        })
    }

    /// Appends the planned bot turn and clears the composing flag. Returns
    /// whether the form should open next (after the transition delay).
    pub fn deliver_reply(&mut self, reply: &PlannedReply) -> bool {
        self.conversation.post_bot(reply.line);
        self.conversation.set_composing(false);
        reply.category.opens_form()
    }

    /// Replaces the chat input with a fresh incident form. A form already
    /// in progress is left alone.
    pub fn open_form(&mut self) {
        if self.form.is_none() {
            self.form = Some(FormSession::new());
            self.conversation.set_form_visible(true);
        }
    }

    pub fn edit_field(&mut self, field: Field, value: String) -> bool {
        match self.form.as_mut() {
            Some(form) => form.set_field(field, value),
            None => false,
        }
    }

    /// Drives the two-phase submit flow. A validation failure also raises
    /// the "check your submission" warning toast.
    pub fn submit(&mut self) -> SubmitOutcome {
        let Some(form) = self.form.as_mut() else {
            return SubmitOutcome::Ignored;
        };
        match form.request_submit() {
            SubmitAdvance::Rejected => {
                self.notify(
                    Severity::Error,
                    "Please check your submission",
                    "Some information is missing or incorrect. Please review the form.",
                );
                SubmitOutcome::Invalid
            }
            SubmitAdvance::Review => SubmitOutcome::Reviewing,
            SubmitAdvance::Dispatch => SubmitOutcome::Dispatch(form.record().clone()),
            SubmitAdvance::Ignored => SubmitOutcome::Ignored,
        }
    }

    pub fn back(&mut self) -> bool {
        self.form.as_mut().is_some_and(|form| form.back())
    }

    /// Cancels the form from the editing phase and returns to the chat.
    /// Returns whether a cancellation happened; the caller schedules
    /// `acknowledge_cancellation` after the transition delay.
    pub fn cancel_form(&mut self) -> bool {
        let cancelled = self
            .form
            .as_mut()
            .is_some_and(|form| form.cancel());
        if cancelled {
            self.form = None;
            self.conversation.set_form_visible(false);
        }
        cancelled
    }

    /// Feeds the gateway result back into the state machine. Success closes
    /// the form and discards the record; failure keeps the record on the
    /// review screen and raises the error toast.
    pub fn complete_submit(&mut self, success: bool) -> SubmitResolution {
        let Some(form) = self.form.as_mut() else {
            return SubmitResolution::Ignored;
        };
        if !form.complete_submit(success) {
            return SubmitResolution::Ignored;
        }
        if success {
            self.form = None;
            self.conversation.set_form_visible(false);
            SubmitResolution::Succeeded
        } else {
            self.notify(
                Severity::Error,
                "Submission Failed",
                "There was an error submitting your incident. Please try again.",
            );
            SubmitResolution::Failed
        }
    }

    /// Final bot acknowledgment and success toast, chained shortly after a
    /// successful submission closes the form.
    pub fn acknowledge_submission(&mut self) {
        self.conversation.post_bot(SUCCESS_LINE);
        self.notify(
            Severity::Info,
            "Incident Submitted",
            "Your IT support request has been recorded.",
        );
    }

    /// Bot follow-up chained shortly after a cancellation.
    pub fn acknowledge_cancellation(&mut self) {
        self.conversation.post_bot(CANCEL_LINE);
    }
}
