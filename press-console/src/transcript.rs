//! Chat transcript and progress lines.
//!
//! Every handler renders into the transcript instead of printing directly, so
//! the same handlers drive the terminal and the tests.

use indicatif::{ProgressBar, ProgressStyle};
use press_client::ProgressData;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
    System,
    Info,
    Success,
    Error,
}

impl Role {
    fn prefix(&self) -> &'static str {
        match self {
            Self::User => "👤 You:",
            Self::Assistant => "🤖 Assistant:",
            Self::System => "🤖 System:",
            Self::Info => "ℹ️ ",
            Self::Success => "✅",
            Self::Error => "❌",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub role: Role,
    pub text: String,
}

/// Where rendered lines go
///
/// The terminal transcript prints and keeps nothing; a recording transcript
/// keeps every entry and prints nothing.
#[derive(Debug, Clone)]
pub struct Transcript {
    recorded: Option<Arc<Mutex<Vec<Entry>>>>,
}

impl Transcript {
    pub fn terminal() -> Self {
        Self { recorded: None }
    }

    #[cfg(test)]
    pub fn recording() -> Self {
        Self {
            recorded: Some(Arc::new(Mutex::new(Vec::new()))),
        }
    }

    fn echo(&self) -> bool {
        self.recorded.is_none()
    }

    pub fn push(&self, role: Role, text: impl Into<String>) {
        let text = text.into();
        match &self.recorded {
            Some(entries) => lock(entries).push(Entry { role, text }),
            None if role == Role::Error => eprintln!("{} {}", role.prefix(), text),
            None => println!("{} {}", role.prefix(), text),
        }
    }

    pub fn user(&self, text: impl Into<String>) {
        self.push(Role::User, text);
    }

    pub fn system(&self, text: impl Into<String>) {
        self.push(Role::System, text);
    }

    pub fn info(&self, text: impl Into<String>) {
        self.push(Role::Info, text);
    }

    pub fn success(&self, text: impl Into<String>) {
        self.push(Role::Success, text);
    }

    pub fn error(&self, text: impl Into<String>) {
        self.push(Role::Error, text);
    }

    #[cfg(test)]
    pub fn entries(&self) -> Vec<Entry> {
        self.recorded
            .as_ref()
            .map(|entries| lock(entries).clone())
            .unwrap_or_default()
    }

    /// Whether any recorded entry of `role` contains `needle`
    #[cfg(test)]
    pub fn has(&self, role: Role, needle: &str) -> bool {
        self.entries()
            .iter()
            .any(|e| e.role == role && e.text.contains(needle))
    }

    /// Start a progress line for a tracked session
    pub fn progress(&self, message: &str) -> ProgressLine {
        let bar = if self.echo() {
            let bar = ProgressBar::new(100);
            bar.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}% {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("#>-"),
            );
            bar
        } else {
            ProgressBar::hidden()
        };
        bar.set_message(message.to_string());
        self.system(message);

        ProgressLine {
            bar,
            transcript: self.clone(),
        }
    }

    /// Spinner shown while waiting for a reply
    pub fn typing(&self, message: &str) -> ProgressBar {
        if !self.echo() {
            return ProgressBar::hidden();
        }
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(std::time::Duration::from_millis(120));
        spinner
    }
}

fn lock(entries: &Mutex<Vec<Entry>>) -> MutexGuard<'_, Vec<Entry>> {
    entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Live progress display for one session
#[derive(Clone)]
pub struct ProgressLine {
    bar: ProgressBar,
    transcript: Transcript,
}

impl ProgressLine {
    pub fn update(&self, data: &ProgressData) {
        let mut message = data.message.clone();
        if let Some((imported, total)) = data.item_counts() {
            message.push_str(&format!(" ({}/{})", imported, total));
        }
        if let Some(percentage) = data.percentage {
            self.bar.set_position(percentage.clamp(0.0, 100.0) as u64);
        }
        self.bar.set_message(message);
    }

    pub fn complete(&self, message: &str) {
        self.bar.finish_and_clear();
        self.transcript.success(message);
    }

    pub fn fail(&self, message: &str) {
        self.bar.abandon();
        self.transcript.error(message);
    }
}
