use std::time::{Duration, Instant};

use crate::Config;
use crate::tag_input::{RejectReason, TagEvent, TagInput};
use crate::tui::widgets::tags::{ClickAction, HitArea};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Edit,
    Help,
}

/// How the session ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExitOutcome {
    /// Finished normally: the final tags
    Done(Vec<String>),
    Cancelled,
}

#[derive(Debug, Clone, Default)]
pub struct StatusState {
    pub message: Option<String>,
    pub message_time: Option<Instant>,
}

pub struct App {
    pub config: Config,
    pub tag_input: TagInput,
    pub mode: Mode,
    pub status: StatusState,
    /// Clickable regions from the last render
    pub hit_areas: Vec<HitArea>,
    pub outcome: Option<ExitOutcome>,
}

impl App {
    pub fn new(config: Config, initial_tags: Vec<String>) -> Self {
        let tag_input = TagInput::with_tags(config.tag_input.clone(), initial_tags);
        Self {
            config,
            tag_input,
            mode: Mode::Edit,
            status: StatusState::default(),
            hit_areas: Vec::new(),
            outcome: None,
        }
    }

    pub fn set_status_message(&mut self, message: impl Into<String>) {
        self.status.message = Some(message.into());
        self.status.message_time = Some(Instant::now());
    }

    pub fn clear_status_message(&mut self) {
        self.status.message = None;
        self.status.message_time = None;
    }

    /// Clear the status message once it has been shown long enough
    pub fn check_status_message_timeout(&mut self) {
        let timeout = Duration::from_secs(self.config.status_timeout_secs);
        if self.status.message_time.is_some_and(|t| t.elapsed() >= timeout) {
            self.clear_status_message();
        }
    }

    /// Turn widget events into status feedback
    pub fn apply_events(&mut self, events: Vec<TagEvent>) {
        for event in events {
            match event {
                TagEvent::Added(tag) => self.set_status_message(format!("Added '{}'", tag)),
                TagEvent::Removed { tag, .. } => self.set_status_message(format!("Removed '{}'", tag)),
                TagEvent::RemovalArmed { tag, .. } => {
                    self.set_status_message(format!("Press Backspace again to remove '{}'", tag))
                }
                TagEvent::RemovalDisarmed => self.clear_status_message(),
                TagEvent::Rejected { tag, reason } => {
                    let message = match reason {
                        RejectReason::Duplicate => format!("'{}' is already a tag", tag),
                        RejectReason::LimitReached => format!(
                            "Tag limit reached ({})",
                            self.tag_input.options().max_tags.unwrap_or_default()
                        ),
                    };
                    self.set_status_message(message);
                }
                TagEvent::InputChanged(_) => {}
            }
        }
    }

    pub fn toggle_read_only(&mut self) {
        let read_only = !self.tag_input.is_read_only();
        let events = self.tag_input.set_read_only(read_only);
        self.apply_events(events);
        tracing::info!(read_only, "read-only toggled");
        if read_only {
            self.set_status_message("Read-only: tags can't be added or removed");
        } else {
            self.set_status_message("Editing enabled");
        }
    }

    /// Tab: blur commits the typed text, focus resumes typing
    pub fn toggle_focus(&mut self) {
        if self.tag_input.is_focused() {
            let events = self.tag_input.blur();
            self.apply_events(events);
        } else if self.tag_input.is_read_only() {
            self.set_status_message("Read-only: input is disabled");
        } else {
            self.tag_input.focus();
        }
    }

    /// Feed text through the widget as if typed
    pub fn paste_text(&mut self, text: &str) {
        if self.tag_input.is_read_only() {
            self.set_status_message("Read-only: input is disabled");
            return;
        }
        self.tag_input.focus();
        let events = self.tag_input.type_str(text);
        self.apply_events(events);
    }

    pub fn paste_from_clipboard(&mut self) {
        let text = arboard::Clipboard::new().and_then(|mut clipboard| clipboard.get_text());
        match text {
            Ok(text) => self.paste_text(&text),
            Err(e) => {
                tracing::warn!(error = %e, "clipboard read failed");
                self.set_status_message(format!("Clipboard unavailable: {}", e));
            }
        }
    }

    pub fn handle_click(&mut self, column: u16, row: u16) {
        match crate::tui::widgets::tags::hit_test(&self.hit_areas, column, row) {
            Some(ClickAction::RemoveTag(index)) => match self.tag_input.remove_tag_at(index) {
                Ok(tag) => self.set_status_message(format!("Removed '{}'", tag)),
                Err(e) => self.set_status_message(e.to_string()),
            },
            Some(ClickAction::FocusInput) => self.tag_input.focus(),
            None => {
                // Clicking outside the field blurs it
                if self.tag_input.is_focused() {
                    let events = self.tag_input.blur();
                    self.apply_events(events);
                }
            }
        }
    }

    /// Commit pending text and record the final tags
    pub fn finish(&mut self) {
        let events = self.tag_input.blur();
        self.apply_events(events);
        self.outcome = Some(ExitOutcome::Done(self.tag_input.tags().to_vec()));
    }

    pub fn cancel(&mut self) {
        self.outcome = Some(ExitOutcome::Cancelled);
    }

    pub fn key_hints(&self) -> Vec<String> {
        use crate::utils::format_key_binding_for_display as display;
        let keys = &self.config.key_bindings;
        match self.mode {
            Mode::Help => vec![format!("Esc or {}: Close help", display(&keys.help))],
            Mode::Edit => {
                let mut hints = Vec::new();
                if !self.tag_input.is_read_only() {
                    hints.push("Enter: Add".to_string());
                    hints.push("Backspace: Remove".to_string());
                    hints.push(format!("{}: Focus", display(&keys.toggle_focus)));
                }
                hints.push(format!("{}: Read-only", display(&keys.toggle_read_only)));
                hints.push(format!("{}: Done", display(&keys.quit)));
                hints.push(format!("{}: Cancel", display(&keys.cancel)));
                hints.push(format!("{}: Help", display(&keys.help)));
                hints
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app_with(tags: &[&str]) -> App {
        App::new(Config::default(), tags.iter().map(|t| t.to_string()).collect())
    }

    #[test]
    fn finish_commits_buffer() {
        let mut app = app_with(&["one"]);
        app.paste_text("two thr");
        app.finish();
        assert_eq!(
            app.outcome,
            Some(ExitOutcome::Done(vec!["one".to_string(), "two".to_string(), "thr".to_string()]))
        );
    }

    #[test]
    fn armed_removal_sets_status() {
        let mut app = app_with(&["removeme"]);
        let events = app.tag_input.backspace();
        app.apply_events(events);
        assert_eq!(
            app.status.message.as_deref(),
            Some("Press Backspace again to remove 'removeme'")
        );
    }

    #[test]
    fn paste_is_refused_when_read_only() {
        let mut app = app_with(&[]);
        app.toggle_read_only();
        app.paste_text("a b ");
        assert!(app.tag_input.tags().is_empty());

        app.toggle_read_only();
        app.paste_text("a b ");
        assert_eq!(app.tag_input.tags(), ["a", "b"]);
    }

    #[test]
    fn clicks_route_through_hit_areas() {
        use ratatui::layout::Rect;

        let mut app = app_with(&["x", "y"]);
        app.hit_areas = vec![
            HitArea { rect: Rect::new(4, 1, 1, 1), action: ClickAction::RemoveTag(0) },
            HitArea { rect: Rect::new(0, 0, 40, 3), action: ClickAction::FocusInput },
        ];
        app.handle_click(4, 1);
        assert_eq!(app.tag_input.tags(), ["y"]);

        app.handle_click(50, 10);
        assert!(!app.tag_input.is_focused());
        app.handle_click(10, 1);
        assert!(app.tag_input.is_focused());
    }

    #[test]
    fn key_hints_hide_editing_keys_when_read_only() {
        let mut app = app_with(&[]);
        assert!(app.key_hints().iter().any(|h| h == "Enter: Add"));
        app.toggle_read_only();
        assert!(!app.key_hints().iter().any(|h| h == "Enter: Add"));
    }
}
