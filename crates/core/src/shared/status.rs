use std::time::Duration;

use super::constants::{ERROR_STATUS_MS, INFO_STATUS_MS};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Warning,
    Error,
}

/// A transient, auto-dismissing message for the user.
///
/// None of these are fatal: the user can always retake the photo.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusMessage {
    pub kind: StatusKind,
    pub text: String,
    pub duration: Duration,
}

impl StatusMessage {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Info,
            text: text.into(),
            duration: Duration::from_millis(INFO_STATUS_MS),
        }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Warning,
            text: text.into(),
            duration: Duration::from_millis(INFO_STATUS_MS),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Error,
            text: text.into(),
            duration: Duration::from_millis(ERROR_STATUS_MS),
        }
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }
}

/// Receives status messages from sessions and pipelines.
///
/// Decouples the engine from how messages are shown (log lines, a toast,
/// nothing at all in tests).
pub trait StatusSink: Send {
    fn post(&mut self, message: StatusMessage);
}

impl<T: StatusSink + ?Sized> StatusSink for Box<T> {
    fn post(&mut self, message: StatusMessage) {
        (**self).post(message);
    }
}

/// Forwards messages to the `log` facade at a level matching their kind.
pub struct LogStatusSink;

impl StatusSink for LogStatusSink {
    fn post(&mut self, message: StatusMessage) {
        match message.kind {
            StatusKind::Info => log::info!("{}", message.text),
            StatusKind::Warning => log::warn!("{}", message.text),
            StatusKind::Error => log::error!("{}", message.text),
        }
    }
}

/// Keeps every message in memory, newest last.
#[derive(Default)]
pub struct RecordingStatusSink {
    messages: Vec<StatusMessage>,
}

impl RecordingStatusSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[StatusMessage] {
        &self.messages
    }

    pub fn last(&self) -> Option<&StatusMessage> {
        self.messages.last()
    }
}

impl StatusSink for RecordingStatusSink {
    fn post(&mut self, message: StatusMessage) {
        self.messages.push(message);
    }
}
