use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

/// Input action that can be performed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    /// Scroll by whole rows (positive = towards older items)
    ScrollRows(i32),
    ScrollPageDown,
    ScrollPageUp,
    JumpToTop,
    JumpToBottom,
    /// Finger down at a terminal row
    DragStart(u16),
    DragTo(u16),
    DragEnd,
    ManualRefresh,
    ToggleHeaderRefresh,
    ToggleFooterRefresh,
    None,
}

/// Handle a key event and return the corresponding action
pub fn handle_key_event(key: KeyEvent) -> Action {
    match (key.code, key.modifiers) {
        // Quit
        (KeyCode::Char('q'), KeyModifiers::NONE) => Action::Quit,
        (KeyCode::Esc, _) => Action::Quit,
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => Action::Quit,

        // Scrolling
        (KeyCode::Char('j'), KeyModifiers::NONE) => Action::ScrollRows(1),
        (KeyCode::Char('k'), KeyModifiers::NONE) => Action::ScrollRows(-1),
        (KeyCode::Down, KeyModifiers::NONE) => Action::ScrollRows(1),
        (KeyCode::Up, KeyModifiers::NONE) => Action::ScrollRows(-1),
        (KeyCode::Char('f'), KeyModifiers::CONTROL) => Action::ScrollPageDown,
        (KeyCode::Char('b'), KeyModifiers::CONTROL) => Action::ScrollPageUp,
        (KeyCode::PageDown, _) => Action::ScrollPageDown,
        (KeyCode::PageUp, _) => Action::ScrollPageUp,
        (KeyCode::Char('g'), KeyModifiers::NONE) => Action::JumpToTop,
        (KeyCode::Char('G'), _) => Action::JumpToBottom,

        // Refresh controls
        (KeyCode::Char('r'), KeyModifiers::NONE) => Action::ManualRefresh,
        (KeyCode::Char('H'), _) => Action::ToggleHeaderRefresh,
        (KeyCode::Char('F'), _) => Action::ToggleFooterRefresh,

        _ => Action::None,
    }
}

/// Map mouse input onto the drag lifecycle and wheel scrolling
pub fn handle_mouse_event(mouse: MouseEvent) -> Action {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => Action::DragStart(mouse.row),
        MouseEventKind::Drag(MouseButton::Left) => Action::DragTo(mouse.row),
        MouseEventKind::Up(MouseButton::Left) => Action::DragEnd,
        MouseEventKind::ScrollDown => Action::ScrollRows(3),
        MouseEventKind::ScrollUp => Action::ScrollRows(-3),
        _ => Action::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mouse(kind: MouseEventKind, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column: 4,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn test_keys() {
        let key = |code, modifiers| handle_key_event(KeyEvent::new(code, modifiers));
        assert_eq!(key(KeyCode::Char('q'), KeyModifiers::NONE), Action::Quit);
        assert_eq!(key(KeyCode::Char('j'), KeyModifiers::NONE), Action::ScrollRows(1));
        assert_eq!(key(KeyCode::Char('r'), KeyModifiers::NONE), Action::ManualRefresh);
        assert_eq!(key(KeyCode::Char('F'), KeyModifiers::SHIFT), Action::ToggleFooterRefresh);
        assert_eq!(key(KeyCode::Char('x'), KeyModifiers::NONE), Action::None);
    }

    #[test]
    fn test_mouse_drag_lifecycle() {
        assert_eq!(
            handle_mouse_event(mouse(MouseEventKind::Down(MouseButton::Left), 3)),
            Action::DragStart(3)
        );
        assert_eq!(
            handle_mouse_event(mouse(MouseEventKind::Drag(MouseButton::Left), 9)),
            Action::DragTo(9)
        );
        assert_eq!(
            handle_mouse_event(mouse(MouseEventKind::Up(MouseButton::Left), 9)),
            Action::DragEnd
        );
        assert_eq!(
            handle_mouse_event(mouse(MouseEventKind::ScrollUp, 0)),
            Action::ScrollRows(-3)
        );
    }
}
