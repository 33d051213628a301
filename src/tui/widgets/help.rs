use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::config::Config;
use crate::tui::widgets::color::parse_color;
use crate::utils::format_key_binding_for_display;

pub fn render_help(f: &mut Frame, area: Rect, config: &Config) {
    let fg_color = parse_color(&config.theme.fg);
    let bg_color = parse_color(&config.theme.bg);

    let popup_area = popup_area(area, 60, 70);

    // Clear the background first so the field doesn't show through
    f.render_widget(Clear, popup_area);

    let paragraph = Paragraph::new(build_help_text(config))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Help - Key Bindings")
                .title_alignment(Alignment::Center)
                .style(Style::default().fg(fg_color).bg(bg_color)),
        )
        .style(Style::default().fg(fg_color).bg(bg_color))
        .wrap(ratatui::widgets::Wrap { trim: true });

    f.render_widget(paragraph, popup_area);
}

/// Centered rect taking the given percentage of `area`
fn popup_area(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let vertical = Layout::vertical([Constraint::Percentage(percent_y)]).flex(Flex::Center);
    let horizontal = Layout::horizontal([Constraint::Percentage(percent_x)]).flex(Flex::Center);
    let [area] = vertical.areas(area);
    let [area] = horizontal.areas(area);
    area
}

pub fn build_help_text(config: &Config) -> String {
    let keys = &config.key_bindings;
    let options = &config.tag_input;
    let mut text = String::new();

    let delimiters: Vec<String> = crate::tag_input::effective_delimiters(
        &options.delimiters,
        options.allow_spaces_in_tags,
    )
    .iter()
    .map(|c| if *c == ' ' { "Space".to_string() } else { format!("'{}'", c) })
    .collect();

    text.push_str("Tags:\n");
    if delimiters.is_empty() {
        text.push_str("  Enter: Add tag\n");
    } else {
        text.push_str(&format!("  {} / Enter: Add tag\n", delimiters.join(" / ")));
    }
    if options.remove_confirmation {
        text.push_str("  Backspace (empty input): Mark last tag, press again to remove\n");
    } else {
        text.push_str("  Backspace (empty input): Remove last tag\n");
    }
    text.push_str("  Click ×: Remove tag\n");
    text.push('\n');

    text.push_str("Input:\n");
    text.push_str("  Left / Right / Home / End: Move cursor\n");
    text.push_str("  Ctrl+Left / Ctrl+Right: Word navigation\n");
    text.push_str("  Ctrl+W: Delete word, Ctrl+U: Clear input\n");
    text.push_str(&format!("  {}: Paste (splits into tags)\n", format_key_binding_for_display(&keys.paste)));
    text.push_str(&format!("  {}: Focus / blur (blur adds the typed tag)\n", format_key_binding_for_display(&keys.toggle_focus)));
    text.push('\n');

    text.push_str("General:\n");
    text.push_str(&format!("  {}: Toggle read-only\n", format_key_binding_for_display(&keys.toggle_read_only)));
    text.push_str(&format!("  {}: Finish and print tags\n", format_key_binding_for_display(&keys.quit)));
    text.push_str(&format!("  {}: Cancel without output\n", format_key_binding_for_display(&keys.cancel)));
    text.push_str(&format!("  {} / Esc: Show/hide help\n", format_key_binding_for_display(&keys.help)));

    text
}
