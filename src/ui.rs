//! What a page controller needs from whoever hosts it: a way to tell the
//! viewer something, to ask a yes/no question, and to navigate away.

use std::sync::Mutex;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level { Success, Info, Error }

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self { Self::Success => "success", Self::Info => "info", Self::Error => "error" }
    }
    pub fn parse(raw: &str) -> Option<Self> {
        match raw { "success" => Some(Self::Success), "info" => Some(Self::Info), "error" => Some(Self::Error), _ => None }
    }
    pub fn css_class(&self) -> &'static str {
        match self { Self::Success => "alert-success", Self::Info => "alert-info", Self::Error => "alert-danger" }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification { pub level: Level, pub message: String }

impl Notification {
    pub fn success(message: impl Into<String>) -> Self { Self { level: Level::Success, message: message.into() } }
    pub fn info(message: impl Into<String>) -> Self { Self { level: Level::Info, message: message.into() } }
    pub fn error(message: impl Into<String>) -> Self { Self { level: Level::Error, message: message.into() } }
}

/// Notifications carried across a redirect, one `level:message` per line.
pub fn flash_text(notes: &[Notification]) -> String {
    notes.iter().map(|n| format!("{}:{}", n.level.as_str(), n.message.replace('\n', " "))).collect::<Vec<_>>().join("\n")
}

/// Lines with an unknown level are dropped.
pub fn parse_flash(text: &str) -> Vec<Notification> {
    text.lines()
        .filter_map(|line| line.split_once(':'))
        .filter_map(|(level, message)| Level::parse(level).map(|level| Notification { level, message: message.to_string() }))
        .collect()
}

pub trait Ui: Send + Sync {
    fn notify(&self, notification: Notification);
    fn confirm(&self, question: &str) -> bool;
    fn redirect(&self, path: &str);
}

/// Keeps everything it is told. Used by the gateway to render notifications
/// into the next page, and by tests.
#[derive(Debug)]
pub struct RecordingUi {
    confirm_answer: bool,
    notifications: Mutex<Vec<Notification>>,
    questions: Mutex<Vec<String>>,
    redirects: Mutex<Vec<String>>,
}

impl RecordingUi {
    /// `confirm_answer` is what every confirmation question gets back.
    pub fn new(confirm_answer: bool) -> Self {
        Self { confirm_answer, notifications: Mutex::default(), questions: Mutex::default(), redirects: Mutex::default() }
    }
    pub fn notifications(&self) -> Vec<Notification> { self.notifications.lock().unwrap_or_else(|e| e.into_inner()).clone() }
    pub fn questions(&self) -> Vec<String> { self.questions.lock().unwrap_or_else(|e| e.into_inner()).clone() }
    pub fn redirects(&self) -> Vec<String> { self.redirects.lock().unwrap_or_else(|e| e.into_inner()).clone() }
    pub fn last_message(&self) -> Option<String> { self.notifications().last().map(|n| n.message.clone()) }
}

impl Default for RecordingUi { fn default() -> Self { Self::new(true) } }

impl Ui for RecordingUi {
    fn notify(&self, notification: Notification) {
        self.notifications.lock().unwrap_or_else(|e| e.into_inner()).push(notification);
    }
    fn confirm(&self, question: &str) -> bool {
        self.questions.lock().unwrap_or_else(|e| e.into_inner()).push(question.to_string());
        self.confirm_answer
    }
    fn redirect(&self, path: &str) {
        self.redirects.lock().unwrap_or_else(|e| e.into_inner()).push(path.to_string());
    }
}
