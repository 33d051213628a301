use ratatui::Frame;
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders};

use crate::tui::app::Mode;
use crate::tui::widgets::{
    color::parse_color,
    help::render_help,
    status_bar::render_status_bar,
    tags::{layout_field, render_tag_field},
};
use crate::tui::{App, Layout};

/// Rows the field needs for the current tags at the given terminal width
pub fn field_content_rows(app: &App, terminal_width: u16) -> u16 {
    // Outer border and field border: two columns each
    let inner_width = terminal_width.saturating_sub(4).max(1);
    layout_field(app.tag_input.tags(), inner_width, app.tag_input.shows_remove_buttons()).height()
}

pub fn render(f: &mut Frame, app: &mut App, layout: &Layout) {
    let theme = app.config.theme.clone();
    let fg_color = parse_color(&theme.fg);
    let bg_color = parse_color(&theme.bg);

    let outer_block = Block::default()
        .borders(Borders::ALL)
        .title("tagfield")
        .title_alignment(ratatui::layout::Alignment::Center)
        .style(Style::default().fg(fg_color).bg(bg_color));
    f.render_widget(outer_block, f.area());

    app.hit_areas = render_tag_field(f, layout.field_area, &mut app.tag_input, &theme);

    if app.mode == Mode::Help {
        render_help(f, f.area(), &app.config);
        // The popup covers the field
        app.hit_areas.clear();
    }

    let key_hints = app.key_hints();
    render_status_bar(f, layout.status_area, app.status.message.as_ref(), &key_hints, &theme);
}
