use colored::Colorize;
use std::fmt;
use std::sync::{OnceLock, RwLock};

/// Message categories used by the CLI output helpers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Success,
    Error,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct OutputPreferences {
    /// Skip ANSI styling entirely.
    pub plain: bool,
}

static PREFERENCES: OnceLock<RwLock<OutputPreferences>> = OnceLock::new();

pub fn set_preferences(prefs: OutputPreferences) {
    let lock = PREFERENCES.get_or_init(|| RwLock::new(OutputPreferences::default()));
    if let Ok(mut guard) = lock.write() {
        *guard = prefs;
    }
}

fn preferences() -> OutputPreferences {
    PREFERENCES
        .get_or_init(|| RwLock::new(OutputPreferences::default()))
        .read()
        .map(|guard| *guard)
        .unwrap_or_default()
}

fn label(kind: MessageKind) -> &'static str {
    match kind {
        MessageKind::Info => "INFO",
        MessageKind::Success => "SUCCESS",
        MessageKind::Error => "ERROR",
    }
}

/// Renders `message` with its label, styled unless plain output was requested.
pub fn format_message(
    kind: MessageKind,
    message: impl fmt::Display,
    prefs: &OutputPreferences,
) -> String {
    let formatted = format!("{}: {}", label(kind), message);
    if prefs.plain {
        return formatted;
    }
    match kind {
        MessageKind::Success => formatted.bright_green().to_string(),
        MessageKind::Error => formatted.bright_red().to_string(),
        MessageKind::Info => formatted,
    }
}

pub fn print(kind: MessageKind, message: impl fmt::Display) {
    let formatted = format_message(kind, message, &preferences());
    match kind {
        MessageKind::Error => eprintln!("{}", formatted),
        _ => println!("{}", formatted),
    }
}

pub fn info(message: impl fmt::Display) {
    print(MessageKind::Info, message);
}

pub fn success(message: impl fmt::Display) {
    print(MessageKind::Success, message);
}

pub fn error(message: impl fmt::Display) {
    print(MessageKind::Error, message);
}
