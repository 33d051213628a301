use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::config::Theme;
use crate::tag_input::TagInput;
use crate::tui::widgets::color::{get_contrast_text_color, parse_color};

pub const REMOVE_MARKER: &str = "×";
const CHIP_GAP: u16 = 1;
/// Narrowest input line worth keeping next to the chips
const MIN_INPUT_WIDTH: u16 = 12;

/// Where a chip landed inside the field, relative to the inner area
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChipPlacement {
    pub index: usize,
    pub label: String,
    pub row: u16,
    pub col: u16,
    pub width: u16,
    /// Column of the remove marker, when one is drawn
    pub remove_col: Option<u16>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldLayout {
    pub chips: Vec<ChipPlacement>,
    pub input_row: u16,
    pub input_col: u16,
    pub input_width: u16,
}

impl FieldLayout {
    pub fn height(&self) -> u16 {
        self.input_row + 1
    }
}

/// What a click on the field should do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickAction {
    RemoveTag(usize),
    FocusInput,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HitArea {
    pub rect: Rect,
    pub action: ClickAction,
}

/// First hit area containing the point. Remove markers are registered before
/// the field itself so they take precedence.
pub fn hit_test(areas: &[HitArea], column: u16, row: u16) -> Option<ClickAction> {
    areas
        .iter()
        .find(|area| area.rect.contains(Position::new(column, row)))
        .map(|area| area.action)
}

fn chip_label(tag: &str, with_remove: bool, max_width: u16) -> String {
    let suffix = if with_remove { format!("{} ", REMOVE_MARKER) } else { String::new() };
    let full = format!(" {} {}", tag, suffix);
    if full.width() <= max_width as usize {
        return full;
    }

    // Too wide for a line: shorten the tag text and keep the marker
    let budget = (max_width as usize).saturating_sub(suffix.width() + 3);
    let mut shortened = String::new();
    for ch in tag.chars() {
        if shortened.width() + ch.width().unwrap_or(1) > budget.saturating_sub(1) {
            break;
        }
        shortened.push(ch);
    }
    format!(" {}… {}", shortened, suffix)
}

/// Flow chips left to right, wrapping at `width`, then place the input line
pub fn layout_field(tags: &[String], width: u16, show_remove: bool) -> FieldLayout {
    let mut chips = Vec::with_capacity(tags.len());
    let mut row = 0u16;
    let mut col = 0u16;

    for (index, tag) in tags.iter().enumerate() {
        let label = chip_label(tag, show_remove, width.max(1));
        let chip_width = label.width() as u16;
        if col > 0 && col + chip_width > width {
            row += 1;
            col = 0;
        }
        let remove_col = show_remove.then(|| col + chip_width.saturating_sub(2));
        chips.push(ChipPlacement {
            index,
            label,
            row,
            col,
            width: chip_width,
            remove_col,
        });
        col += chip_width + CHIP_GAP;
    }

    let (input_row, input_col) = if col == 0 || col + MIN_INPUT_WIDTH <= width {
        (row, col)
    } else {
        (row + 1, 0)
    };

    FieldLayout {
        chips,
        input_row,
        input_col,
        input_width: width.saturating_sub(input_col),
    }
}

/// Draw the bordered tag field. Returns the clickable regions it produced.
pub fn render_tag_field(f: &mut Frame, area: Rect, input: &mut TagInput, theme: &Theme) -> Vec<HitArea> {
    let fg_color = parse_color(&theme.fg);
    let bg_color = parse_color(&theme.bg);
    let chip_bg = parse_color(&theme.chip_bg);
    let pending_bg = parse_color(&theme.pending_bg);
    let highlight_bg = parse_color(&theme.highlight_bg);

    let title = if input.is_read_only() {
        format!("Tags ({}) - read-only", input.tags().len())
    } else {
        format!("Tags ({})", input.tags().len())
    };
    let border_style = if input.is_focused() {
        Style::default().fg(highlight_bg)
    } else {
        Style::default().fg(fg_color)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(border_style)
        .style(Style::default().fg(fg_color).bg(bg_color));
    let inner = block.inner(area);
    f.render_widget(block, area);

    if inner.width == 0 || inner.height == 0 {
        return Vec::new();
    }

    let layout = layout_field(input.tags(), inner.width, input.shows_remove_buttons());
    let pending = input.pending_removal();
    // Keep the input line visible when chips overflow the field
    let scroll = layout.height().saturating_sub(inner.height);

    let mut lines: Vec<Vec<Span>> = vec![Vec::new(); layout.height() as usize];
    let mut cursors = vec![0u16; layout.height() as usize];
    let mut hit_areas = Vec::new();

    for chip in &layout.chips {
        let row = chip.row as usize;
        if cursors[row] < chip.col {
            lines[row].push(Span::raw(" ".repeat((chip.col - cursors[row]) as usize)));
        }
        let bg = if pending == Some(chip.index) { pending_bg } else { chip_bg };
        let mut style = Style::default().fg(get_contrast_text_color(bg)).bg(bg);
        if pending == Some(chip.index) {
            style = style.add_modifier(Modifier::BOLD | Modifier::CROSSED_OUT);
        }
        lines[row].push(Span::styled(chip.label.clone(), style));
        cursors[row] = chip.col + chip.width;

        // Markers scrolled out of view can't be clicked
        if let Some(remove_col) = chip.remove_col {
            if chip.row >= scroll && chip.row - scroll < inner.height {
                hit_areas.push(HitArea {
                    rect: Rect::new(inner.x + remove_col, inner.y + chip.row - scroll, 1, 1),
                    action: ClickAction::RemoveTag(chip.index),
                });
            }
        }
    }

    // Input line
    let input_row = layout.input_row as usize;
    if cursors[input_row] < layout.input_col {
        lines[input_row].push(Span::raw(" ".repeat((layout.input_col - cursors[input_row]) as usize)));
    }
    let view_width = layout.input_width.saturating_sub(1) as usize;
    let disabled = input.is_input_disabled();
    if disabled {
        lines[input_row].push(Span::styled(
            "(read-only)",
            Style::default().fg(fg_color).add_modifier(Modifier::DIM | Modifier::ITALIC),
        ));
    } else if input.input_value().is_empty() && !input.is_focused() {
        lines[input_row].push(Span::styled(
            input.options().placeholder.clone(),
            Style::default().fg(fg_color).add_modifier(Modifier::DIM),
        ));
    } else {
        input.buffer_mut().update_horizontal_scroll(view_width);
        lines[input_row].push(Span::styled(
            input.buffer().visible_text(view_width),
            Style::default().fg(fg_color),
        ));
    }

    let text: Vec<Line> = lines.into_iter().map(Line::from).collect();
    f.render_widget(Paragraph::new(text).scroll((scroll, 0)), inner);

    if !disabled && input.is_focused() {
        if let Some(col) = input.buffer().visible_cursor(view_width) {
            let y = inner.y + layout.input_row.saturating_sub(scroll);
            let x = inner.x + layout.input_col + col as u16;
            if y < inner.y + inner.height && x < inner.x + inner.width {
                f.set_cursor_position(Position::new(x, y));
            }
        }
    }

    hit_areas.push(HitArea {
        rect: inner,
        action: ClickAction::FocusInput,
    });
    hit_areas
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn chips_flow_and_wrap() {
        // " alpha × " is 9 wide, " beta × " is 8
        let layout = layout_field(&tags(&["alpha", "beta", "gamma"]), 20, true);
        assert_eq!(layout.chips[0].col, 0);
        assert_eq!(layout.chips[0].width, 9);
        assert_eq!(layout.chips[1].col, 10);
        assert_eq!(layout.chips[1].row, 0);
        assert_eq!(layout.chips[2].row, 1);
        assert_eq!(layout.chips[2].col, 0);
        // 9 columns used on row 1, not enough room for the input
        assert_eq!(layout.input_row, 2);
        assert_eq!(layout.input_col, 0);
    }

    #[test]
    fn remove_marker_column_points_at_marker() {
        let layout = layout_field(&tags(&["tag"]), 40, true);
        let chip = &layout.chips[0];
        assert_eq!(chip.label, " tag × ");
        let marker_offset = chip.remove_col.expect("marker") - chip.col;
        let before: String = chip.label.chars().take(marker_offset as usize).collect();
        assert_eq!(before, " tag ");
        assert_eq!(layout.input_col, chip.width + 1);
        assert_eq!(layout.input_row, 0);
    }

    #[test]
    fn no_markers_without_remove_buttons() {
        let layout = layout_field(&tags(&["hamburger", "cheeseburger"]), 60, false);
        assert!(layout.chips.iter().all(|c| c.remove_col.is_none()));
        assert!(layout.chips.iter().all(|c| !c.label.contains(REMOVE_MARKER)));
    }

    #[test]
    fn overlong_tag_is_shortened_to_fit() {
        let layout = layout_field(&tags(&["an-extremely-long-tag-name"]), 12, true);
        let chip = &layout.chips[0];
        assert!(chip.width <= 12);
        assert!(chip.label.contains('…'));
        assert!(chip.label.contains(REMOVE_MARKER));
    }

    #[test]
    fn hit_test_prefers_first_match() {
        let areas = vec![
            HitArea { rect: Rect::new(5, 1, 1, 1), action: ClickAction::RemoveTag(0) },
            HitArea { rect: Rect::new(0, 0, 20, 3), action: ClickAction::FocusInput },
        ];
        assert_eq!(hit_test(&areas, 5, 1), Some(ClickAction::RemoveTag(0)));
        assert_eq!(hit_test(&areas, 6, 1), Some(ClickAction::FocusInput));
        assert_eq!(hit_test(&areas, 30, 1), None);
    }
}
