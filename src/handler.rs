use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};

use crate::app::App;

/// Handle a key event.
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.quit(),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => app.quit(),

        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Up | KeyCode::Char('k') => app.select_previous(),
        KeyCode::PageDown => app.page_down(),
        KeyCode::PageUp => app.page_up(),
        KeyCode::Home => app.select_first(),
        KeyCode::End => app.select_last(),

        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('+') => app.expand_or_step_in(),
        KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('-') => app.collapse_or_step_out(),
        KeyCode::Enter => app.toggle_selected(),

        KeyCode::Char('s') => app.cycle_sort_column(),
        KeyCode::Char('r') => app.flip_sort_direction(),
        KeyCode::Char('f') => app.switch_filter_mode(),
        KeyCode::Char('x') => app.toggle_show_inactive(),
        KeyCode::Char('p') => app.toggle_percentage(),
        KeyCode::Char(c @ '1'..='9') => {
            let index = c as usize - '1' as usize;
            app.toggle_filter_option(index);
        }
        _ => {}
    }
}

/// Handle a mouse event: the wheel moves the selection.
pub fn handle_mouse_event(app: &mut App, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::ScrollDown => app.select_next(),
        MouseEventKind::ScrollUp => app.select_previous(),
        _ => {}
    }
}
