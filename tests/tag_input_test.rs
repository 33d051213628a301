//! Behaviour of the tag input widget as a user drives it: typing,
//! delimiters, blur, the two-step backspace removal, and read-only mode.

use tagfield::tag_input::{TagEvent, TagInput, TagInputOptions};

fn tags_of(input: &TagInput) -> Vec<&str> {
    input.tags().iter().map(String::as_str).collect()
}

fn read_only_with(tags: &[&str]) -> TagInput {
    let options = TagInputOptions {
        read_only: true,
        ..Default::default()
    };
    TagInput::with_tags(options, tags.iter().map(|t| t.to_string()).collect())
}

// ============================================================================
// Tag creation
// ============================================================================

#[test]
fn test_new_tags_are_created_when_delimiter_characters_are_typed() {
    let mut input = TagInput::new(TagInputOptions::default());

    input.type_str("first second ");

    assert_eq!(input.input_value(), "");
    assert_eq!(input.tags().len(), 2);
    assert_eq!(tags_of(&input), vec!["first", "second"]);
}

#[test]
fn test_new_tags_are_created_when_the_field_is_blurred() {
    let mut input = TagInput::new(TagInputOptions::default());

    input.type_str("blurry");
    input.blur();

    assert_eq!(input.input_value(), "");
    assert_eq!(tags_of(&input), vec!["blurry"]);
    assert!(!input.is_focused());
}

#[test]
fn test_tags_can_contain_spaces_when_allowed() {
    let options = TagInputOptions {
        allow_spaces_in_tags: true,
        ..Default::default()
    };
    let mut input = TagInput::new(options);

    input.type_str("multiple words rock");
    input.blur();

    assert_eq!(input.input_value(), "");
    assert_eq!(tags_of(&input), vec!["multiple words rock"]);
}

#[test]
fn test_submit_commits_the_buffer() {
    let mut input = TagInput::new(TagInputOptions::default());
    input.type_str("entered");
    let events = input.submit();

    assert_eq!(
        events,
        vec![
            TagEvent::Added("entered".to_string()),
            TagEvent::InputChanged(String::new()),
        ]
    );
    assert!(input.is_focused());
}

// ============================================================================
// Two-step backspace removal
// ============================================================================

#[test]
fn test_tags_can_be_removed_using_the_backspace_key() {
    let mut input = TagInput::new(TagInputOptions::default());

    input.type_str("removeme ");
    assert_eq!(input.input_value(), "");
    assert_eq!(input.tags().len(), 1);

    // First press marks the tag
    let events = input.backspace();
    assert_eq!(input.tags().len(), 1);
    assert_eq!(input.pending_removal(), Some(0));
    assert_eq!(
        events,
        vec![TagEvent::RemovalArmed {
            index: 0,
            tag: "removeme".to_string(),
        }]
    );

    // Second press removes it
    let events = input.backspace();
    assert!(input.tags().is_empty());
    assert_eq!(input.pending_removal(), None);
    assert_eq!(
        events,
        vec![TagEvent::Removed {
            index: 0,
            tag: "removeme".to_string(),
        }]
    );
}

#[test]
fn test_backspace_only_ever_arms_the_last_tag() {
    let mut input = TagInput::new(TagInputOptions::default());
    input.type_str("a b c ");

    input.backspace();
    assert_eq!(input.pending_removal(), Some(2));
    input.backspace();
    assert_eq!(tags_of(&input), vec!["a", "b"]);

    input.backspace();
    assert_eq!(input.pending_removal(), Some(1));
}

#[test]
fn test_blur_disarms_pending_removal() {
    let mut input = TagInput::new(TagInputOptions::default());
    input.type_str("keep ");
    input.backspace();

    let events = input.blur();
    assert_eq!(events, vec![TagEvent::RemovalDisarmed]);
    assert_eq!(tags_of(&input), vec!["keep"]);
}

// ============================================================================
// Input value reporting
// ============================================================================

#[test]
fn test_input_value_is_reported_while_typing() {
    let mut input = TagInput::new(TagInputOptions::default());
    let mut last_value = None;
    let mut record = |events: Vec<TagEvent>| {
        for event in events {
            if let TagEvent::InputChanged(value) = event {
                last_value = Some(value);
            }
        }
    };

    record(input.type_char('t'));
    assert_eq!(input.input_value(), "t");
    record(input.type_char('e'));
    record(input.type_char('s'));
    assert_eq!(input.input_value(), "tes");

    record(input.blur());
    drop(record);

    assert_eq!(tags_of(&input), vec!["tes"]);
    assert_eq!(last_value.as_deref(), Some(""));
}

// ============================================================================
// Read-only mode
// ============================================================================

#[test]
fn test_tags_cant_be_added_or_removed_in_read_only_mode() {
    let mut input = read_only_with(&["hamburger", "cheeseburger"]);

    assert_eq!(input.tags().len(), 2);
    assert!(!input.shows_remove_buttons());
    assert!(input.is_input_disabled());

    assert!(input.type_str("fries ").is_empty());
    assert!(input.backspace().is_empty());
    assert!(input.submit().is_empty());
    assert!(input.add_tag("fries").is_empty());
    assert!(input.remove_tag_at(0).is_err());
    assert_eq!(tags_of(&input), vec!["hamburger", "cheeseburger"]);
}

#[test]
fn test_tags_can_be_added_after_read_only_changes_to_false() {
    let mut input = read_only_with(&[]);

    input.set_read_only(false);
    input.type_str("some tag ");

    assert_eq!(input.input_value(), "");
    assert_eq!(tags_of(&input), vec!["some", "tag"]);
}

#[test]
fn test_tags_cant_be_changed_after_read_only_changes_from_false_to_true() {
    let mut input = TagInput::with_tags(
        TagInputOptions::default(),
        vec!["hamburger".to_string(), "cheeseburger".to_string()],
    );
    assert!(input.shows_remove_buttons());

    input.set_read_only(true);

    assert_eq!(input.tags().len(), 2);
    assert!(!input.shows_remove_buttons());
    assert!(input.is_input_disabled());
    assert!(input.backspace().is_empty());
    assert_eq!(input.tags().len(), 2);
}
