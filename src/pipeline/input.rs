//! Input: crossterm events to app actions.
//!
//! | Key              | Action            |
//! |------------------|-------------------|
//! | `q`, `Esc`, `^C` | quit              |
//! | `h`              | show home page    |
//! | `l`              | show list page    |
//!
//! Resize events carry the new size. Key releases and repeats are ignored.

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::pages::PageKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    ShowPage(PageKind),
    Resize(u16, u16),
}

/// Map a crossterm event to an action, if it means anything.
pub fn action_for(event: &Event) -> Option<Action> {
    match event {
        Event::Key(key) => key_action(key),
        Event::Resize(width, height) => Some(Action::Resize(*width, *height)),
        _ => None,
    }
}

fn key_action(key: &KeyEvent) -> Option<Action> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(Action::Quit),
            _ => None,
        };
    }
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
        KeyCode::Char('h') => Some(Action::ShowPage(PageKind::Home)),
        KeyCode::Char('l') => Some(Action::ShowPage(PageKind::List)),
        _ => None,
    }
}

/// Wait up to `timeout` for an event and map it.
///
/// `Ok(None)` means the timeout passed or the event was irrelevant.
pub fn poll_action(timeout: Duration) -> std::io::Result<Option<Action>> {
    if !event::poll(timeout)? {
        return Ok(None);
    }
    let event = event::read()?;
    let action = action_for(&event);
    if action.is_some() {
        tracing::trace!(?action, "input");
    }
    Ok(action)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode, modifiers: KeyModifiers) -> Event {
        Event::Key(KeyEvent::new(code, modifiers))
    }

    #[test]
    fn test_quit_keys() {
        for event in [
            press(KeyCode::Char('q'), KeyModifiers::NONE),
            press(KeyCode::Esc, KeyModifiers::NONE),
            press(KeyCode::Char('c'), KeyModifiers::CONTROL),
        ] {
            assert_eq!(action_for(&event), Some(Action::Quit));
        }
    }

    #[test]
    fn test_plain_c_does_nothing() {
        assert_eq!(action_for(&press(KeyCode::Char('c'), KeyModifiers::NONE)), None);
    }

    #[test]
    fn test_page_keys() {
        assert_eq!(
            action_for(&press(KeyCode::Char('h'), KeyModifiers::NONE)),
            Some(Action::ShowPage(PageKind::Home))
        );
        assert_eq!(
            action_for(&press(KeyCode::Char('l'), KeyModifiers::NONE)),
            Some(Action::ShowPage(PageKind::List))
        );
        assert_eq!(action_for(&press(KeyCode::Char('l'), KeyModifiers::CONTROL)), None);
    }

    #[test]
    fn test_release_ignored() {
        let mut key = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        key.kind = KeyEventKind::Release;
        assert_eq!(action_for(&Event::Key(key)), None);
    }

    #[test]
    fn test_resize() {
        assert_eq!(action_for(&Event::Resize(100, 30)), Some(Action::Resize(100, 30)));
        assert_eq!(action_for(&Event::FocusGained), None);
    }
}
