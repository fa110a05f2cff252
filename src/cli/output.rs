use colored::Colorize;
use std::fmt;
use std::sync::{OnceLock, RwLock};

use will_core::{AllocationNotice, NoticeLevel};

/// Message categories used by the CLI output helpers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Success,
    Warning,
    Error,
    Prompt,
    Section,
    Separator,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct OutputPreferences {
    /// No colour and no icons, for screen readers and piped output.
    pub plain: bool,
    pub high_contrast: bool,
    pub icons: bool,
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

fn icon(kind: MessageKind) -> &'static str {
    match kind {
        MessageKind::Info => "[i]",
        MessageKind::Success => "[ok]",
        MessageKind::Warning => "[!]",
        MessageKind::Error => "[x]",
        MessageKind::Prompt => ">",
        MessageKind::Section | MessageKind::Separator => "",
    }
}

fn apply_style(kind: MessageKind, message: impl fmt::Display, prefs: &OutputPreferences) -> String {
    let text = message.to_string();

    let formatted = match kind {
        MessageKind::Section => format!("=== {} ===", text.trim()),
        MessageKind::Separator => String::from("----------------------------------------"),
        _ if prefs.icons && !prefs.plain => format!("{} {}", icon(kind), text),
        _ => text,
    };

    if prefs.plain {
        return formatted;
    }

    if prefs.high_contrast {
        return match kind {
            MessageKind::Success
            | MessageKind::Warning
            | MessageKind::Error
            | MessageKind::Section => formatted.bold().to_string(),
            _ => formatted,
        };
    }

    match kind {
        MessageKind::Success => formatted.bright_green().to_string(),
        MessageKind::Warning => formatted.bright_yellow().to_string(),
        MessageKind::Error => formatted.bright_red().to_string(),
        MessageKind::Prompt => formatted.bright_cyan().to_string(),
        MessageKind::Section => formatted.bold().to_string(),
        MessageKind::Separator | MessageKind::Info => formatted,
    }
}

pub fn print(kind: MessageKind, message: impl fmt::Display) {
    let formatted = apply_style(kind, message, &preferences());
    match kind {
        MessageKind::Section | MessageKind::Separator => println!("\n{}", formatted),
        _ => println!("{}", formatted),
    }
}

pub fn info(message: impl fmt::Display) {
    print(MessageKind::Info, message);
}

pub fn success(message: impl fmt::Display) {
    print(MessageKind::Success, message);
}

pub fn warning(message: impl fmt::Display) {
    print(MessageKind::Warning, message);
}

pub fn error(message: impl fmt::Display) {
    print(MessageKind::Error, message);
}

pub fn prompt_label(message: impl fmt::Display) -> String {
    apply_style(MessageKind::Prompt, message, &preferences())
}

pub fn section(title: impl fmt::Display) {
    print(MessageKind::Section, title);
}

pub fn separator() {
    print(MessageKind::Separator, "");
}

/// Allocation corrections are informational unless they need user action.
pub fn notice(notice: &AllocationNotice) {
    match notice.level() {
        NoticeLevel::Info => info(notice),
        NoticeLevel::Warning => warning(notice),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_output_has_no_icons_or_escapes() {
        let prefs = OutputPreferences {
            plain: true,
            high_contrast: false,
            icons: true,
        };
        assert_eq!(apply_style(MessageKind::Warning, "Careful", &prefs), "Careful");
        assert_eq!(apply_style(MessageKind::Section, " Estate ", &prefs), "=== Estate ===");
    }

    #[test]
    fn icons_prefix_messages() {
        colored::control::set_override(false);
        let prefs = OutputPreferences {
            plain: false,
            high_contrast: false,
            icons: true,
        };
        assert_eq!(apply_style(MessageKind::Error, "Failed", &prefs), "[x] Failed");
    }
}
