//! Key bindings: arrows plus vim-style letters.

use crate::game::Command;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Action from a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Game(Command),
    Pause,
    Restart,
    Quit,
    None,
}

/// Map key event to action. Ctrl+C always quits.
pub fn key_to_action(key: KeyEvent) -> Action {
    let KeyEvent { code, modifiers, .. } = key;
    if modifiers == KeyModifiers::CONTROL && code == KeyCode::Char('c') {
        return Action::Quit;
    }
    let no_mod = modifiers.is_empty() || modifiers == KeyModifiers::SHIFT;
    if !no_mod {
        return Action::None;
    }
    match code {
        KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
        KeyCode::Char('p') => Action::Pause,
        KeyCode::Char('r') | KeyCode::Char('R') => Action::Restart,
        KeyCode::Left | KeyCode::Char('h') => Action::Game(Command::MoveLeft),
        KeyCode::Right | KeyCode::Char('l') => Action::Game(Command::MoveRight),
        KeyCode::Down | KeyCode::Char('j') => Action::Game(Command::SoftDrop),
        KeyCode::Up | KeyCode::Char('k') => Action::Game(Command::Rotate),
        KeyCode::Char(' ') => Action::Game(Command::HardDrop),
        KeyCode::Char('c') | KeyCode::Char('C') => Action::Game(Command::Hold),
        _ => Action::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_arrow_keys_map_to_commands() {
        assert_eq!(key_to_action(press(KeyCode::Left)), Action::Game(Command::MoveLeft));
        assert_eq!(key_to_action(press(KeyCode::Right)), Action::Game(Command::MoveRight));
        assert_eq!(key_to_action(press(KeyCode::Down)), Action::Game(Command::SoftDrop));
        assert_eq!(key_to_action(press(KeyCode::Up)), Action::Game(Command::Rotate));
    }

    #[test]
    fn test_space_and_c() {
        assert_eq!(key_to_action(press(KeyCode::Char(' '))), Action::Game(Command::HardDrop));
        assert_eq!(key_to_action(press(KeyCode::Char('c'))), Action::Game(Command::Hold));
        let shifted = KeyEvent::new(KeyCode::Char('C'), KeyModifiers::SHIFT);
        assert_eq!(key_to_action(shifted), Action::Game(Command::Hold));
    }

    #[test]
    fn test_quit_keys() {
        assert_eq!(key_to_action(press(KeyCode::Esc)), Action::Quit);
        assert_eq!(key_to_action(press(KeyCode::Char('q'))), Action::Quit);
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(key_to_action(ctrl_c), Action::Quit);
    }

    #[test]
    fn test_other_modifiers_are_ignored() {
        let alt_left = KeyEvent::new(KeyCode::Left, KeyModifiers::ALT);
        assert_eq!(key_to_action(alt_left), Action::None);
        assert_eq!(key_to_action(press(KeyCode::Char('x'))), Action::None);
    }
}
