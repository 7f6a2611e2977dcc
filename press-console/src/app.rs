//! Console state shared by every handler

use press_client::models::ChatAction;
use press_client::{Config, ImageCache, PressClient, ProgressTracker};
use std::io::{BufRead, Write};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::transcript::Transcript;
use crate::viewer::PostViewer;

type ConfirmFn = dyn Fn(&str) -> bool + Send + Sync;

/// Client, tracker, image cache, viewer and transcript for one console run
///
/// Cloning is cheap and shares all state.
#[derive(Clone)]
pub struct App {
    pub config: Arc<Config>,
    pub client: PressClient,
    pub tracker: ProgressTracker,
    pub images: ImageCache<PressClient>,
    pub transcript: Transcript,
    viewer: Arc<Mutex<PostViewer>>,
    actions: Arc<Mutex<Vec<ChatAction>>>,
    confirm: Arc<ConfirmFn>,
}

impl App {
    pub fn new(config: Config, transcript: Transcript) -> Self {
        let client = PressClient::from_config(&config);
        let tracker = ProgressTracker::new(client.http().clone());
        let images = ImageCache::new(Arc::new(client.clone()), config.prefetch_pause());

        Self {
            config: Arc::new(config),
            client,
            tracker,
            images,
            transcript,
            viewer: Arc::new(Mutex::new(PostViewer::new())),
            actions: Arc::new(Mutex::new(Vec::new())),
            confirm: Arc::new(prompt_yes_no),
        }
    }

    /// Replace the confirmation prompt
    pub fn with_confirm(mut self, confirm: impl Fn(&str) -> bool + Send + Sync + 'static) -> Self {
        self.confirm = Arc::new(confirm);
        self
    }

    /// Answer every confirmation with yes
    pub fn assume_yes(self) -> Self {
        self.with_confirm(|_| true)
    }

    pub fn confirm(&self, question: &str) -> bool {
        (self.confirm)(question)
    }

    pub fn viewer(&self) -> MutexGuard<'_, PostViewer> {
        self.viewer.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Remember the actions of the latest chat reply
    pub fn set_actions(&self, actions: Vec<ChatAction>) {
        *self.lock_actions() = actions;
    }

    /// Action by its 1-based number in the latest reply
    pub fn action(&self, number: usize) -> Option<ChatAction> {
        number
            .checked_sub(1)
            .and_then(|index| self.lock_actions().get(index).cloned())
    }

    fn lock_actions(&self) -> MutexGuard<'_, Vec<ChatAction>> {
        self.actions.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Ask on the terminal; anything but y/yes is a no
fn prompt_yes_no(question: &str) -> bool {
    print!("{} [y/N] ", question);
    if std::io::stdout().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    match std::io::stdin().lock().read_line(&mut answer) {
        Ok(_) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
        Err(_) => false,
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// App pointed at `base_url` with a recording transcript and no batch pause
    pub fn app(base_url: &str) -> App {
        let config = Config {
            base_url: base_url.to_string(),
            prefetch_pause_ms: 0,
            ..Config::default()
        };
        App::new(config, Transcript::recording()).assume_yes()
    }
}

#[cfg(test)]
mod tests {
    use super::testing::app;
    use super::*;

    #[test]
    fn test_actions_are_numbered_from_one() {
        let app = app("http://127.0.0.1:9");
        app.set_actions(vec![
            ChatAction::Text("help".to_string()),
            ChatAction::Text("cache stats".to_string()),
        ]);

        assert_eq!(app.action(0), None);
        assert_eq!(app.action(2), Some(ChatAction::Text("cache stats".to_string())));
        assert_eq!(app.action(3), None);
    }

    #[test]
    fn test_confirm_is_replaceable() {
        let app = app("http://127.0.0.1:9").with_confirm(|q| q.contains("publish"));
        assert!(app.confirm("publish this?"));
        assert!(!app.confirm("delete this?"));
    }

    #[test]
    fn test_clones_share_viewer() {
        let app = app("http://127.0.0.1:9");
        let other = app.clone();
        other.viewer().load(vec![Default::default()]);
        assert!(!app.viewer().is_empty());
    }
}
