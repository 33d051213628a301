use crossterm::event::{
    self, DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
    size as terminal_size,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use std::io;
use std::time::Duration;

use crate::tui::app::{ExitOutcome, Mode};
use crate::tui::error::TuiError;
use crate::tui::render::field_content_rows;
use crate::tui::{App, Layout};
use crate::utils::{ParsedKeyBinding, has_primary_modifier, parse_key_binding};

/// Restores the terminal on drop, including during a panic.
/// A terminal left in raw mode is unusable for the user.
struct TerminalGuard {
    raw_mode_enabled: bool,
    alternate_screen_enabled: bool,
}

impl TerminalGuard {
    fn new() -> Result<Self, TuiError> {
        enable_raw_mode()?;
        let mut guard = Self {
            raw_mode_enabled: true,
            alternate_screen_enabled: false,
        };
        execute!(io::stdout(), EnterAlternateScreen, EnableMouseCapture, EnableBracketedPaste)?;
        guard.alternate_screen_enabled = true;
        Ok(guard)
    }

    /// Restore explicitly on normal exit; drop is then a no-op
    fn restore(&mut self) -> Result<(), TuiError> {
        if self.raw_mode_enabled {
            disable_raw_mode()?;
            self.raw_mode_enabled = false;
        }
        if self.alternate_screen_enabled {
            execute!(io::stdout(), DisableBracketedPaste, DisableMouseCapture, LeaveAlternateScreen)?;
            self.alternate_screen_enabled = false;
        }
        Ok(())
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        // Already cleaning up; errors have nowhere to go
        if self.raw_mode_enabled {
            let _ = disable_raw_mode();
        }
        if self.alternate_screen_enabled {
            let _ = execute!(io::stdout(), DisableBracketedPaste, DisableMouseCapture, LeaveAlternateScreen);
        }
    }
}

pub fn run_event_loop(mut app: App) -> Result<ExitOutcome, TuiError> {
    // Check size before entering the alternate screen so the error is readable
    let (width, height) = terminal_size()?;
    let min_width = Layout::MIN_WIDTH + 2;
    let min_height = Layout::MIN_HEIGHT + 2;
    if width < min_width || height < min_height {
        return Err(TuiError::RenderError(format!(
            "Terminal size too small. Current: {}x{}, Minimum required: {}x{}. Please resize your terminal window.",
            width, height, min_width, min_height
        )));
    }

    let mut guard = TerminalGuard::new()?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;
    tracing::info!(tags = app.tag_input.tags().len(), "editor started");

    let outcome = loop {
        app.check_status_message_timeout();

        let size = terminal.size()?;
        let terminal_rect = Rect::new(0, 0, size.width, size.height);
        terminal.draw(|f| {
            let layout = Layout::calculate(terminal_rect, field_content_rows(&app, terminal_rect.width));
            crate::tui::render::render(f, &mut app, &layout);
        })?;

        if event::poll(Duration::from_millis(16))? {
            match event::read()? {
                // Only Press: Windows also reports Release
                Event::Key(key_event) if key_event.kind == KeyEventKind::Press => {
                    handle_key_event(&mut app, key_event)?;
                }
                Event::Mouse(mouse_event) => handle_mouse_event(&mut app, mouse_event),
                Event::Paste(text) => app.paste_text(&text),
                // Resize is picked up by terminal.size() on the next draw
                _ => {}
            }
        }

        if let Some(outcome) = app.outcome.take() {
            break outcome;
        }
    };

    guard.restore()?;
    tracing::info!(?outcome, "editor finished");
    Ok(outcome)
}

fn binding(key_str: &str) -> Result<ParsedKeyBinding, TuiError> {
    parse_key_binding(key_str).map_err(TuiError::KeyBindingError)
}

/// Route a key press to host bindings first, then to the tag input.
/// Ending the session is reported through `app.outcome`.
pub fn handle_key_event(app: &mut App, key_event: KeyEvent) -> Result<(), TuiError> {
    let keys = app.config.key_bindings.clone();
    let help = binding(&keys.help)?;

    if app.mode == Mode::Help {
        if key_event.code == KeyCode::Esc || help.matches(key_event) {
            app.mode = Mode::Edit;
        }
        return Ok(());
    }

    if binding(&keys.cancel)?.matches(key_event) {
        app.cancel();
        return Ok(());
    }
    if binding(&keys.quit)?.matches(key_event) {
        app.finish();
        return Ok(());
    }
    if help.matches(key_event) {
        app.mode = Mode::Help;
        return Ok(());
    }
    if binding(&keys.toggle_read_only)?.matches(key_event) {
        app.toggle_read_only();
        return Ok(());
    }
    if binding(&keys.paste)?.matches(key_event) {
        app.paste_from_clipboard();
        return Ok(());
    }
    if binding(&keys.toggle_focus)?.matches(key_event) {
        app.toggle_focus();
        return Ok(());
    }

    if key_event.code == KeyCode::Esc {
        if app.tag_input.is_focused() {
            let events = app.tag_input.blur();
            app.apply_events(events);
        }
        return Ok(());
    }

    // Typing into a blurred field focuses it first
    let typing =
        matches!(key_event.code, KeyCode::Char(_)) && !has_primary_modifier(key_event.modifiers);
    if typing && !app.tag_input.is_focused() {
        if app.tag_input.is_read_only() {
            app.set_status_message("Read-only: input is disabled");
            return Ok(());
        }
        app.tag_input.focus();
    }

    let events = app.tag_input.handle_key_event(key_event);
    app.apply_events(events);
    Ok(())
}

pub fn handle_mouse_event(app: &mut App, mouse_event: MouseEvent) {
    if app.mode == Mode::Help {
        return;
    }
    if let MouseEventKind::Down(MouseButton::Left) = mouse_event.kind {
        app.handle_click(mouse_event.column, mouse_event.row);
    }
}
