use chrono::Local;
use crossterm::event::{self, Event, KeyCode, KeyModifiers, MouseEvent, MouseEventKind};
use std::time::{Duration, Instant};

use super::{App, MAX_NAME_LEN};

pub fn poll_event(timeout: Duration) -> anyhow::Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

pub fn handle_key(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
    if let (KeyCode::Char('c'), KeyModifiers::CONTROL) = (code, modifiers) {
        app.running = false;
        return;
    }

    // ── Name prompt captures typing while focused ─────────────────────
    if app.prompt.visible && app.prompt.focused {
        handle_prompt_key(app, code);
        return;
    }

    match code {
        KeyCode::Char('q') => {
            app.running = false;
        }
        KeyCode::Char('n') if app.prompt.visible => {
            app.prompt.focused = true;
        }
        KeyCode::Char('r') => {
            app.render(Local::now().date_naive());
        }
        _ => {}
    }
}

fn handle_prompt_key(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Enter => app.submit_name(),
        KeyCode::Esc => app.prompt.focused = false,
        KeyCode::Backspace => {
            app.prompt.input.pop();
        }
        KeyCode::Char(c) if !c.is_control() => {
            if app.prompt.input.chars().count() < MAX_NAME_LEN {
                app.prompt.input.push(c);
            }
        }
        _ => {}
    }
}

pub fn handle_mouse(app: &mut App, mouse: MouseEvent, at: Instant) {
    match mouse.kind {
        MouseEventKind::Moved | MouseEventKind::Drag(_) => {
            app.pointer_moved(mouse.column, mouse.row, at);
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::tests::MemoryStore;
    use crate::tui::grid::{GridLayout, LABEL_WIDTH};
    use std::sync::Arc;

    fn app() -> App {
        App::new(Arc::new(MemoryStore::default()), Local::now(), Instant::now())
    }

    #[test]
    fn typing_goes_to_the_focused_prompt() {
        let mut app = app();
        app.prompt.show();

        for c in "qa".chars() {
            handle_key(&mut app, KeyCode::Char(c), KeyModifiers::NONE);
        }
        handle_key(&mut app, KeyCode::Backspace, KeyModifiers::NONE);

        assert!(app.running);
        assert_eq!(app.prompt.input, "q");
    }

    #[test]
    fn escape_releases_focus_and_q_quits() {
        let mut app = app();
        app.prompt.show();

        handle_key(&mut app, KeyCode::Esc, KeyModifiers::NONE);
        assert!(!app.prompt.focused);
        handle_key(&mut app, KeyCode::Char('n'), KeyModifiers::NONE);
        assert!(app.prompt.focused);

        handle_key(&mut app, KeyCode::Esc, KeyModifiers::NONE);
        handle_key(&mut app, KeyCode::Char('q'), KeyModifiers::NONE);
        assert!(!app.running);
    }

    #[test]
    fn prompt_input_stops_at_the_length_limit() {
        let mut app = app();
        app.prompt.show();

        for _ in 0..MAX_NAME_LEN + 10 {
            handle_key(&mut app, KeyCode::Char('é'), KeyModifiers::NONE);
        }
        assert_eq!(app.prompt.input.chars().count(), MAX_NAME_LEN);

        handle_key(&mut app, KeyCode::Backspace, KeyModifiers::NONE);
        handle_key(&mut app, KeyCode::Char('x'), KeyModifiers::NONE);
        assert!(app.prompt.input.ends_with('x'));
        assert_eq!(app.prompt.input.chars().count(), MAX_NAME_LEN);
    }

    #[test]
    fn ctrl_c_always_quits() {
        let mut app = app();
        app.prompt.show();
        handle_key(&mut app, KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(!app.running);
    }

    #[test]
    fn blank_enter_keeps_prompt_open() {
        let mut app = app();
        app.prompt.show();
        handle_key(&mut app, KeyCode::Enter, KeyModifiers::NONE);
        assert!(app.prompt.visible);
        assert!(app.save_rx.is_none());
    }

    #[test]
    fn mouse_moves_feed_the_tooltip() {
        let mut app = app();
        app.layout = GridLayout::compute(
            &app.year_view,
            ratatui::layout::Rect::new(0, 0, GridLayout::full_width(), 12),
        );
        let at = Instant::now();
        let moved = MouseEvent {
            kind: MouseEventKind::Moved,
            column: LABEL_WIDTH,
            row: 0,
            modifiers: KeyModifiers::NONE,
        };
        handle_mouse(&mut app, moved, at);
        assert!(app.tooltip.target().is_some());
    }
}
