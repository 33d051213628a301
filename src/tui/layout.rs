use ratatui::layout::{Constraint, Direction, Layout as RatLayout, Rect};

pub struct Layout {
    pub inner_area: Rect, // Area inside the outer border
    pub field_area: Rect,
    pub status_area: Rect,
}

impl Layout {
    /// Minimum terminal dimensions required.
    /// Height: 2 outer borders + 3 field (borders + one line) + 1 status
    pub const MIN_WIDTH: u16 = 30;
    pub const MIN_HEIGHT: u16 = 4;

    /// Field height grows with its content up to this many rows (borders included)
    pub const MAX_FIELD_HEIGHT: u16 = 12;

    pub fn calculate(size: Rect, field_content_rows: u16) -> Self {
        // Ensure minimum terminal size (accounting for outer border)
        let width = size.width.max(Self::MIN_WIDTH + 2);
        let height = size.height.max(Self::MIN_HEIGHT + 2);
        let size = Rect::new(size.x, size.y, width, height);

        let inner_area = Rect::new(
            size.x + 1,
            size.y + 1,
            size.width.saturating_sub(2),
            size.height.saturating_sub(2),
        );

        let field_height = (field_content_rows.max(1) + 2)
            .min(Self::MAX_FIELD_HEIGHT)
            .min(inner_area.height.saturating_sub(1));

        // Field on top, free space, status (1 line) at the bottom
        let vertical = RatLayout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(field_height),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(inner_area);

        Self {
            inner_area,
            field_area: vertical[0],
            status_area: vertical[2],
        }
    }
}
