//! The tag input widget state machine.
//!
//! Text typed into the field stays in an input buffer until a delimiter, a
//! blur, or a submit turns it into a tag. Backspace on an empty buffer removes
//! the last tag, in two steps when `remove_confirmation` is on: the first
//! press arms the tag, the second removes it.

pub mod buffer;
pub mod tokenizer;

use crossterm::event::{KeyCode, KeyEvent};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::utils::has_primary_modifier;

pub use buffer::InputBuffer;
pub use tokenizer::{effective_delimiters, normalize_tag, parse_tags, split_tags};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TagInputOptions {
    #[serde(default = "default_delimiters")]
    pub delimiters: Vec<char>,
    #[serde(default)]
    pub allow_spaces_in_tags: bool,
    #[serde(default = "default_true")]
    pub allow_duplicates: bool,
    #[serde(default)]
    pub max_tags: Option<usize>,
    #[serde(default = "default_true")]
    pub remove_confirmation: bool,
    #[serde(default = "default_true")]
    pub show_remove_buttons: bool,
    #[serde(default)]
    pub read_only: bool,
    #[serde(default = "default_placeholder")]
    pub placeholder: String,
}

impl Default for TagInputOptions {
    fn default() -> Self {
        Self {
            delimiters: default_delimiters(),
            allow_spaces_in_tags: false,
            allow_duplicates: true,
            max_tags: None,
            remove_confirmation: true,
            show_remove_buttons: true,
            read_only: false,
            placeholder: default_placeholder(),
        }
    }
}

fn default_delimiters() -> Vec<char> {
    vec![' ', ',']
}

fn default_true() -> bool {
    true
}

fn default_placeholder() -> String {
    "Add a tag...".to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    Duplicate,
    LimitReached,
}

/// What changed as a result of an input. Hosts react to these instead of
/// polling the widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagEvent {
    Added(String),
    Removed { index: usize, tag: String },
    RemovalArmed { index: usize, tag: String },
    RemovalDisarmed,
    Rejected { tag: String, reason: RejectReason },
    /// Current buffer text after it changed
    InputChanged(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TagInputError {
    #[error("Tags cannot be changed in read-only mode")]
    ReadOnly,
    #[error("No tag at index {index} (have {len})")]
    IndexOutOfRange { index: usize, len: usize },
}

#[derive(Debug, Clone)]
pub struct TagInput {
    tags: Vec<String>,
    buffer: InputBuffer,
    options: TagInputOptions,
    delimiters: Vec<char>,
    pending_removal: Option<usize>,
    focused: bool,
}

impl TagInput {
    pub fn new(options: TagInputOptions) -> Self {
        Self::with_tags(options, Vec::new())
    }

    pub fn with_tags(options: TagInputOptions, tags: Vec<String>) -> Self {
        let delimiters = effective_delimiters(&options.delimiters, options.allow_spaces_in_tags);
        let focused = !options.read_only;
        Self {
            tags: tags.iter().filter_map(|t| normalize_tag(t)).collect(),
            buffer: InputBuffer::new(),
            options,
            delimiters,
            pending_removal: None,
            focused,
        }
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn input_value(&self) -> &str {
        self.buffer.as_str()
    }

    pub fn buffer(&self) -> &InputBuffer {
        &self.buffer
    }

    pub fn buffer_mut(&mut self) -> &mut InputBuffer {
        &mut self.buffer
    }

    pub fn options(&self) -> &TagInputOptions {
        &self.options
    }

    pub fn delimiters(&self) -> &[char] {
        &self.delimiters
    }

    pub fn pending_removal(&self) -> Option<usize> {
        self.pending_removal
    }

    pub fn is_read_only(&self) -> bool {
        self.options.read_only
    }

    pub fn is_input_disabled(&self) -> bool {
        self.options.read_only
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Whether chips should carry a remove marker
    pub fn shows_remove_buttons(&self) -> bool {
        !self.options.read_only && self.options.show_remove_buttons
    }

    fn accepts_input(&self) -> bool {
        !self.options.read_only && self.focused
    }

    pub fn set_read_only(&mut self, read_only: bool) -> Vec<TagEvent> {
        if self.options.read_only == read_only {
            return Vec::new();
        }
        tracing::debug!(read_only, "tag input read-only changed");
        self.options.read_only = read_only;
        let mut events = Vec::new();
        if read_only {
            self.disarm(&mut events);
            self.focused = false;
        } else {
            self.focused = true;
        }
        events
    }

    pub fn focus(&mut self) {
        if !self.options.read_only {
            self.focused = true;
        }
    }

    /// Commit whatever is in the buffer and drop focus
    pub fn blur(&mut self) -> Vec<TagEvent> {
        let mut events = Vec::new();
        if !self.focused {
            return events;
        }
        self.disarm(&mut events);
        if !self.options.read_only {
            self.commit_buffer(&mut events);
        }
        self.focused = false;
        events
    }

    /// Commit the buffer (Enter)
    pub fn submit(&mut self) -> Vec<TagEvent> {
        let mut events = Vec::new();
        if !self.accepts_input() {
            return events;
        }
        self.disarm(&mut events);
        self.commit_buffer(&mut events);
        events
    }

    pub fn type_char(&mut self, ch: char) -> Vec<TagEvent> {
        let mut events = Vec::new();
        if !self.accepts_input() {
            return events;
        }
        self.disarm(&mut events);
        // Line breaks always end a tag; tabs count as spaces
        let ch = if ch == '\t' { ' ' } else { ch };
        if ch == '\n' || ch == '\r' || self.delimiters.contains(&ch) {
            if !self.commit_buffer(&mut events) {
                self.discard_buffer(&mut events);
            }
        } else if !ch.is_control() {
            self.buffer.insert_char(ch);
            events.push(TagEvent::InputChanged(self.buffer.as_str().to_string()));
        }
        events
    }

    /// Type `text` one character at a time, as a paste would
    pub fn type_str(&mut self, text: &str) -> Vec<TagEvent> {
        text.chars().flat_map(|ch| self.type_char(ch)).collect()
    }

    pub fn backspace(&mut self) -> Vec<TagEvent> {
        let mut events = Vec::new();
        if !self.accepts_input() {
            return events;
        }

        if !self.buffer.is_empty() {
            self.disarm(&mut events);
            if self.buffer.delete_char() {
                events.push(TagEvent::InputChanged(self.buffer.as_str().to_string()));
            }
            return events;
        }

        let Some(last) = self.tags.len().checked_sub(1) else {
            return events;
        };

        if self.options.remove_confirmation && self.pending_removal != Some(last) {
            self.pending_removal = Some(last);
            tracing::debug!(index = last, tag = %self.tags[last], "tag armed for removal");
            events.push(TagEvent::RemovalArmed {
                index: last,
                tag: self.tags[last].clone(),
            });
        } else {
            self.pending_removal = None;
            let tag = self.tags.remove(last);
            tracing::info!(index = last, tag = %tag, "tag removed");
            events.push(TagEvent::Removed { index: last, tag });
        }
        events
    }

    /// Append a tag as if it had been typed and committed
    pub fn add_tag(&mut self, tag: &str) -> Vec<TagEvent> {
        let mut events = Vec::new();
        if self.options.read_only {
            return events;
        }
        if let Some(tag) = normalize_tag(tag) {
            self.push_tag(tag, &mut events);
        }
        events
    }

    pub fn remove_tag_at(&mut self, index: usize) -> Result<String, TagInputError> {
        if self.options.read_only {
            return Err(TagInputError::ReadOnly);
        }
        if index >= self.tags.len() {
            return Err(TagInputError::IndexOutOfRange {
                index,
                len: self.tags.len(),
            });
        }
        self.pending_removal = None;
        let tag = self.tags.remove(index);
        tracing::info!(index, tag = %tag, "tag removed");
        Ok(tag)
    }

    /// Dispatch a terminal key press. Keys the widget does not use produce no events.
    pub fn handle_key_event(&mut self, key_event: KeyEvent) -> Vec<TagEvent> {
        if !self.accepts_input() {
            return Vec::new();
        }
        let ctrl = has_primary_modifier(key_event.modifiers);

        match key_event.code {
            KeyCode::Backspace => self.backspace(),
            KeyCode::Enter => self.submit(),
            KeyCode::Char('w') if ctrl => self.edit_buffer(InputBuffer::delete_word_before),
            KeyCode::Char('u') if ctrl => self.edit_buffer(|b| {
                let had_text = !b.is_empty();
                b.take();
                had_text
            }),
            KeyCode::Char(_) if ctrl => Vec::new(),
            KeyCode::Char(ch) => self.type_char(ch),
            KeyCode::Delete => self.edit_buffer(InputBuffer::delete_forward),
            KeyCode::Left if ctrl => self.move_cursor(InputBuffer::move_word_left),
            KeyCode::Right if ctrl => self.move_cursor(InputBuffer::move_word_right),
            KeyCode::Left => self.move_cursor(InputBuffer::move_left),
            KeyCode::Right => self.move_cursor(InputBuffer::move_right),
            KeyCode::Home => self.move_cursor(InputBuffer::move_home),
            KeyCode::End => self.move_cursor(InputBuffer::move_end),
            _ => Vec::new(),
        }
    }

    fn edit_buffer(&mut self, edit: impl FnOnce(&mut InputBuffer) -> bool) -> Vec<TagEvent> {
        let mut events = Vec::new();
        self.disarm(&mut events);
        if edit(&mut self.buffer) {
            events.push(TagEvent::InputChanged(self.buffer.as_str().to_string()));
        }
        events
    }

    fn move_cursor(&mut self, motion: impl FnOnce(&mut InputBuffer)) -> Vec<TagEvent> {
        let mut events = Vec::new();
        self.disarm(&mut events);
        motion(&mut self.buffer);
        events
    }

    fn disarm(&mut self, events: &mut Vec<TagEvent>) {
        if self.pending_removal.take().is_some() {
            events.push(TagEvent::RemovalDisarmed);
        }
    }

    /// Returns false when the tag was rejected and the buffer still holds it
    fn commit_buffer(&mut self, events: &mut Vec<TagEvent>) -> bool {
        let Some(tag) = normalize_tag(self.buffer.as_str()) else {
            // Whitespace-only input is discarded
            self.discard_buffer(events);
            return true;
        };

        if !self.push_tag(tag, events) {
            return false;
        }
        self.discard_buffer(events);
        true
    }

    fn discard_buffer(&mut self, events: &mut Vec<TagEvent>) {
        if !self.buffer.is_empty() {
            self.buffer.take();
            events.push(TagEvent::InputChanged(String::new()));
        }
    }

    fn push_tag(&mut self, tag: String, events: &mut Vec<TagEvent>) -> bool {
        if !self.options.allow_duplicates && self.tags.contains(&tag) {
            tracing::debug!(tag = %tag, "duplicate tag rejected");
            events.push(TagEvent::Rejected {
                tag,
                reason: RejectReason::Duplicate,
            });
            return false;
        }
        if self.options.max_tags.is_some_and(|max| self.tags.len() >= max) {
            tracing::debug!(tag = %tag, "tag limit reached");
            events.push(TagEvent::Rejected {
                tag,
                reason: RejectReason::LimitReached,
            });
            return false;
        }

        tracing::info!(tag = %tag, "tag added");
        self.tags.push(tag.clone());
        events.push(TagEvent::Added(tag));
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags_of(input: &TagInput) -> Vec<&str> {
        input.tags().iter().map(String::as_str).collect()
    }

    #[test]
    fn delimiter_on_empty_buffer_is_a_no_op() {
        let mut input = TagInput::new(TagInputOptions::default());
        assert!(input.type_char(' ').is_empty());
        assert!(input.type_char(',').is_empty());
        assert!(input.tags().is_empty());
    }

    #[test]
    fn comma_is_a_delimiter_even_when_spaces_are_allowed() {
        let options = TagInputOptions {
            allow_spaces_in_tags: true,
            ..Default::default()
        };
        let mut input = TagInput::new(options);
        input.type_str("ice cream,pie ");
        assert_eq!(tags_of(&input), vec!["ice cream"]);
        assert_eq!(input.input_value(), "pie ");
    }

    #[test]
    fn whitespace_only_buffer_is_discarded_on_submit() {
        let options = TagInputOptions {
            allow_spaces_in_tags: true,
            ..Default::default()
        };
        let mut input = TagInput::new(options);
        input.type_str("   ");
        let events = input.submit();
        assert_eq!(events, vec![TagEvent::InputChanged(String::new())]);
        assert!(input.tags().is_empty());
        assert_eq!(input.input_value(), "");
    }

    #[test]
    fn duplicates_are_rejected_when_disallowed_and_text_is_kept() {
        let options = TagInputOptions {
            allow_duplicates: false,
            ..Default::default()
        };
        let mut input = TagInput::with_tags(options, vec!["rust".to_string()]);
        input.type_str("rust");
        let events = input.submit();
        assert_eq!(
            events,
            vec![TagEvent::Rejected {
                tag: "rust".to_string(),
                reason: RejectReason::Duplicate,
            }]
        );
        assert_eq!(input.input_value(), "rust");
        assert_eq!(input.tags().len(), 1);
    }

    #[test]
    fn max_tags_limits_additions() {
        let options = TagInputOptions {
            max_tags: Some(2),
            ..Default::default()
        };
        let mut input = TagInput::new(options);
        input.type_str("a b c ");
        assert_eq!(tags_of(&input), vec!["a", "b"]);
        assert_eq!(input.input_value(), "");

        // Enter keeps rejected text for editing
        input.type_str("d");
        input.submit();
        assert_eq!(input.input_value(), "d");
    }

    #[test]
    fn rejected_delimiter_commit_does_not_leak_into_next_tag() {
        let options = TagInputOptions {
            allow_duplicates: false,
            ..Default::default()
        };
        let mut input = TagInput::new(options);
        input.type_str("rust rust go ");
        assert_eq!(tags_of(&input), vec!["rust", "go"]);
        assert_eq!(input.input_value(), "");

        let options = TagInputOptions {
            max_tags: Some(1),
            ..Default::default()
        };
        let mut input = TagInput::new(options);
        let events = input.type_str("a b c");
        assert_eq!(tags_of(&input), vec!["a"]);
        assert_eq!(input.input_value(), "c");
        assert!(events.contains(&TagEvent::Rejected {
            tag: "b".to_string(),
            reason: RejectReason::LimitReached,
        }));
    }

    #[test]
    fn line_breaks_and_tabs_separate_tags() {
        let mut input = TagInput::new(TagInputOptions::default());
        input.type_str("red\ngreen\tblue\r\nbl\u{7}ack");
        input.blur();
        assert_eq!(tags_of(&input), vec!["red", "green", "blue", "black"]);

        let options = TagInputOptions {
            allow_spaces_in_tags: true,
            ..Default::default()
        };
        let mut input = TagInput::new(options);
        input.type_str("ice\tcream\nhot fudge");
        input.blur();
        assert_eq!(tags_of(&input), vec!["ice cream", "hot fudge"]);
    }

    #[test]
    fn set_read_only_keeps_options_in_sync() {
        let mut input = TagInput::new(TagInputOptions::default());
        input.set_read_only(true);
        assert!(input.options().read_only);
        input.set_read_only(false);
        assert!(!input.options().read_only);
    }

    #[test]
    fn backspace_without_confirmation_removes_immediately() {
        let options = TagInputOptions {
            remove_confirmation: false,
            ..Default::default()
        };
        let mut input = TagInput::with_tags(options, vec!["x".to_string(), "y".to_string()]);
        let events = input.backspace();
        assert_eq!(
            events,
            vec![TagEvent::Removed {
                index: 1,
                tag: "y".to_string(),
            }]
        );
        assert_eq!(tags_of(&input), vec!["x"]);
    }

    #[test]
    fn other_keys_disarm_pending_removal() {
        let mut input = TagInput::with_tags(TagInputOptions::default(), vec!["keep".to_string()]);
        input.backspace();
        assert_eq!(input.pending_removal(), Some(0));

        let events = input.type_char('a');
        assert_eq!(events[0], TagEvent::RemovalDisarmed);
        assert_eq!(input.pending_removal(), None);

        // Deleting the typed char leaves the tag unarmed
        input.backspace();
        assert_eq!(input.pending_removal(), None);
        assert_eq!(tags_of(&input), vec!["keep"]);
    }

    #[test]
    fn backspace_with_no_tags_is_a_no_op() {
        let mut input = TagInput::new(TagInputOptions::default());
        assert!(input.backspace().is_empty());
    }

    #[test]
    fn remove_tag_at_validates() {
        let mut input = TagInput::with_tags(
            TagInputOptions::default(),
            vec!["a".to_string(), "b".to_string()],
        );
        assert_eq!(
            input.remove_tag_at(5),
            Err(TagInputError::IndexOutOfRange { index: 5, len: 2 })
        );
        assert_eq!(input.remove_tag_at(0), Ok("a".to_string()));

        input.set_read_only(true);
        assert_eq!(input.remove_tag_at(0), Err(TagInputError::ReadOnly));
    }

    #[test]
    fn entering_read_only_disarms_and_unfocuses() {
        let mut input = TagInput::with_tags(TagInputOptions::default(), vec!["a".to_string()]);
        input.backspace();
        let events = input.set_read_only(true);
        assert_eq!(events, vec![TagEvent::RemovalDisarmed]);
        assert!(!input.is_focused());
        assert!(input.is_input_disabled());
        assert!(!input.shows_remove_buttons());
    }

    #[test]
    fn initial_tags_are_normalized() {
        let input = TagInput::with_tags(
            TagInputOptions::default(),
            vec![" padded ".to_string(), "  ".to_string()],
        );
        assert_eq!(tags_of(&input), vec!["padded"]);
    }

    #[test]
    fn key_events_drive_the_buffer() {
        use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

        let mut input = TagInput::new(TagInputOptions::default());
        for ch in "tga".chars() {
            input.handle_key_event(KeyEvent::new(KeyCode::Char(ch), KeyModifiers::NONE));
        }
        input.handle_key_event(KeyEvent::new(KeyCode::Left, KeyModifiers::NONE));
        input.handle_key_event(KeyEvent::new(KeyCode::Left, KeyModifiers::NONE));
        input.handle_key_event(KeyEvent::new(KeyCode::Delete, KeyModifiers::NONE));
        input.handle_key_event(KeyEvent::new(KeyCode::End, KeyModifiers::NONE));
        input.handle_key_event(KeyEvent::new(KeyCode::Char('g'), KeyModifiers::NONE));
        assert_eq!(input.input_value(), "tag");

        input.handle_key_event(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));
        assert_eq!(tags_of(&input), vec!["tag"]);

        input.type_str("two words");
        input.handle_key_event(KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL));
        assert_eq!(input.input_value(), "");
    }

    #[test]
    fn primary_modifier_chords_are_not_typed() {
        use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

        let mut input = TagInput::new(TagInputOptions::default());
        input.handle_key_event(KeyEvent::new(KeyCode::Char('x'), KeyModifiers::CONTROL));
        assert_eq!(input.input_value(), "");

        #[cfg(target_os = "macos")]
        {
            input.type_str("one two");
            input.handle_key_event(KeyEvent::new(KeyCode::Char('w'), KeyModifiers::ALT));
            assert_eq!(input.input_value(), "");
        }
    }

    #[test]
    fn unfocused_input_ignores_typing() {
        let mut input = TagInput::new(TagInputOptions::default());
        input.blur();
        assert!(input.type_str("abc").is_empty());
        input.focus();
        input.type_str("abc");
        assert_eq!(input.input_value(), "abc");
    }
}
