//! TEA Message Types for the TUI
//!
//! This module defines the Msg enum representing all possible user actions.
//! Following The Elm Architecture (TEA), messages are:
//! - Data describing what happened (not how to handle it)
//! - The only way to trigger state changes
//! - Processed by a single update function

use crossterm::event::{KeyCode, KeyModifiers};

use crate::model::ViewKind;

/// What the keyboard is currently driving
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    /// A card is picked up
    Dragging,
    /// Task editor modal is open
    Editor,
    /// Column rename prompt is open
    Prompt,
    Help,
}

/// All possible messages/actions in the TUI
#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    // === Navigation ===
    FocusLeft,
    FocusRight,
    FocusUp,
    FocusDown,

    // === View Switching ===
    /// Flip between status and context view (Tab)
    NextView,
    SwitchToView(ViewKind),
    /// Side by side vs stacked columns
    ToggleLayout,

    // === Board actions ===
    AddTask,
    AddContext,
    OpenEditor,
    DeleteTask,
    CycleStatus,
    RenameColumn,
    Refresh,

    // === Drag ===
    /// Pick up the focused card
    PickUp,
    DragLeft,
    DragRight,
    DragUp,
    DragDown,
    Drop,
    CancelDrag,

    // === Editor / prompt ===
    Input(char),
    Backspace,
    NextField,
    PrevField,
    ChoicePrev,
    ChoiceNext,
    Confirm,
    EditorDelete,
    CloseModal,

    // === Modals ===
    ToggleHelp,

    // === Lifecycle ===
    Quit,

    // === Internal ===
    /// No operation (for unhandled keys)
    Noop,
}

/// Convert a key event to a message
///
/// This is a pure function - no side effects, just pattern matching.
pub fn key_to_msg(code: KeyCode, modifiers: KeyModifiers, mode: InputMode) -> Msg {
    let ctrl = modifiers.contains(KeyModifiers::CONTROL);

    match mode {
        InputMode::Help => match code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => Msg::CloseModal,
            _ => Msg::Noop,
        },

        InputMode::Editor => match code {
            KeyCode::Esc => Msg::CloseModal,
            KeyCode::Enter => Msg::Confirm,
            KeyCode::Char('d') if ctrl => Msg::EditorDelete,
            KeyCode::Tab | KeyCode::Down => Msg::NextField,
            KeyCode::BackTab | KeyCode::Up => Msg::PrevField,
            KeyCode::Left => Msg::ChoicePrev,
            KeyCode::Right => Msg::ChoiceNext,
            KeyCode::Backspace => Msg::Backspace,
            KeyCode::Char(c) if !ctrl => Msg::Input(c),
            _ => Msg::Noop,
        },

        InputMode::Prompt => match code {
            KeyCode::Esc => Msg::CloseModal,
            KeyCode::Enter => Msg::Confirm,
            KeyCode::Backspace => Msg::Backspace,
            KeyCode::Char(c) if !ctrl => Msg::Input(c),
            _ => Msg::Noop,
        },

        InputMode::Dragging => match code {
            KeyCode::Char('h') | KeyCode::Left => Msg::DragLeft,
            KeyCode::Char('l') | KeyCode::Right => Msg::DragRight,
            KeyCode::Char('k') | KeyCode::Up => Msg::DragUp,
            KeyCode::Char('j') | KeyCode::Down => Msg::DragDown,
            KeyCode::Char(' ') | KeyCode::Enter => Msg::Drop,
            KeyCode::Esc => Msg::CancelDrag,
            KeyCode::Char('c') if ctrl => Msg::Quit,
            _ => Msg::Noop,
        },

        InputMode::Normal => match code {
            // Quit
            KeyCode::Char('q') => Msg::Quit,
            KeyCode::Char('c') if ctrl => Msg::Quit,

            // Navigation
            KeyCode::Char('h') | KeyCode::Left => Msg::FocusLeft,
            KeyCode::Char('l') | KeyCode::Right => Msg::FocusRight,
            KeyCode::Char('k') | KeyCode::Up => Msg::FocusUp,
            KeyCode::Char('j') | KeyCode::Down => Msg::FocusDown,

            // View switching
            KeyCode::Tab | KeyCode::BackTab => Msg::NextView,
            KeyCode::Char('1') => Msg::SwitchToView(ViewKind::Status),
            KeyCode::Char('2') => Msg::SwitchToView(ViewKind::Context),
            KeyCode::Char('v') => Msg::ToggleLayout,

            // Board actions
            KeyCode::Char('a') => Msg::AddTask,
            KeyCode::Char('A') => Msg::AddContext,
            KeyCode::Enter | KeyCode::Char('e') => Msg::OpenEditor,
            KeyCode::Char('d') => Msg::DeleteTask,
            KeyCode::Char('s') => Msg::CycleStatus,
            KeyCode::Char('r') => Msg::RenameColumn,
            KeyCode::Char('R') => Msg::Refresh,
            KeyCode::Char(' ') => Msg::PickUp,

            // Modals
            KeyCode::Char('?') => Msg::ToggleHelp,

            _ => Msg::Noop,
        },
    }
}

/// Check if a message should cause the app to quit
pub fn is_quit(msg: &Msg) -> bool {
    matches!(msg, Msg::Quit)
}

/// Check if a message is part of a drag gesture
pub fn is_drag(msg: &Msg) -> bool {
    matches!(
        msg,
        Msg::PickUp
            | Msg::DragLeft
            | Msg::DragRight
            | Msg::DragUp
            | Msg::DragDown
            | Msg::Drop
            | Msg::CancelDrag
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normal(code: KeyCode) -> Msg {
        key_to_msg(code, KeyModifiers::NONE, InputMode::Normal)
    }

    #[test]
    fn test_key_to_msg_navigation() {
        assert_eq!(normal(KeyCode::Char('h')), Msg::FocusLeft);
        assert_eq!(normal(KeyCode::Char('l')), Msg::FocusRight);
        assert_eq!(normal(KeyCode::Char('j')), Msg::FocusDown);
        assert_eq!(normal(KeyCode::Up), Msg::FocusUp);
    }

    #[test]
    fn test_key_to_msg_quit() {
        assert_eq!(normal(KeyCode::Char('q')), Msg::Quit);
        assert_eq!(
            key_to_msg(KeyCode::Char('c'), KeyModifiers::CONTROL, InputMode::Normal),
            Msg::Quit
        );
    }

    #[test]
    fn test_key_to_msg_view_switching() {
        assert_eq!(normal(KeyCode::Tab), Msg::NextView);
        assert_eq!(normal(KeyCode::Char('1')), Msg::SwitchToView(ViewKind::Status));
        assert_eq!(normal(KeyCode::Char('2')), Msg::SwitchToView(ViewKind::Context));
        assert_eq!(normal(KeyCode::Char('v')), Msg::ToggleLayout);
    }

    #[test]
    fn test_key_to_msg_board_actions() {
        assert_eq!(normal(KeyCode::Char('a')), Msg::AddTask);
        assert_eq!(normal(KeyCode::Char('A')), Msg::AddContext);
        assert_eq!(normal(KeyCode::Enter), Msg::OpenEditor);
        assert_eq!(normal(KeyCode::Char('e')), Msg::OpenEditor);
        assert_eq!(normal(KeyCode::Char('d')), Msg::DeleteTask);
        assert_eq!(normal(KeyCode::Char('s')), Msg::CycleStatus);
        assert_eq!(normal(KeyCode::Char('r')), Msg::RenameColumn);
        assert_eq!(normal(KeyCode::Char('R')), Msg::Refresh);
        assert_eq!(normal(KeyCode::Char(' ')), Msg::PickUp);
    }

    #[test]
    fn test_key_to_msg_drag_mode() {
        let drag = |code| key_to_msg(code, KeyModifiers::NONE, InputMode::Dragging);
        assert_eq!(drag(KeyCode::Char('l')), Msg::DragRight);
        assert_eq!(drag(KeyCode::Char('k')), Msg::DragUp);
        assert_eq!(drag(KeyCode::Char(' ')), Msg::Drop);
        assert_eq!(drag(KeyCode::Enter), Msg::Drop);
        assert_eq!(drag(KeyCode::Esc), Msg::CancelDrag);
        // Board actions are unavailable mid-drag
        assert_eq!(drag(KeyCode::Char('d')), Msg::Noop);
    }

    #[test]
    fn test_key_to_msg_editor_mode() {
        let edit = |code, mods| key_to_msg(code, mods, InputMode::Editor);
        assert_eq!(edit(KeyCode::Char('q'), KeyModifiers::NONE), Msg::Input('q'));
        assert_eq!(edit(KeyCode::Char('d'), KeyModifiers::CONTROL), Msg::EditorDelete);
        assert_eq!(edit(KeyCode::Tab, KeyModifiers::NONE), Msg::NextField);
        assert_eq!(edit(KeyCode::BackTab, KeyModifiers::SHIFT), Msg::PrevField);
        assert_eq!(edit(KeyCode::Right, KeyModifiers::NONE), Msg::ChoiceNext);
        assert_eq!(edit(KeyCode::Enter, KeyModifiers::NONE), Msg::Confirm);
        assert_eq!(edit(KeyCode::Esc, KeyModifiers::NONE), Msg::CloseModal);
    }

    #[test]
    fn test_key_to_msg_prompt_and_help() {
        assert_eq!(
            key_to_msg(KeyCode::Char('x'), KeyModifiers::NONE, InputMode::Prompt),
            Msg::Input('x')
        );
        assert_eq!(
            key_to_msg(KeyCode::Backspace, KeyModifiers::NONE, InputMode::Prompt),
            Msg::Backspace
        );
        assert_eq!(
            key_to_msg(KeyCode::Char('?'), KeyModifiers::NONE, InputMode::Help),
            Msg::CloseModal
        );
        assert_eq!(
            key_to_msg(KeyCode::Char('j'), KeyModifiers::NONE, InputMode::Help),
            Msg::Noop
        );
    }

    #[test]
    fn test_is_quit_and_is_drag() {
        assert!(is_quit(&Msg::Quit));
        assert!(!is_quit(&Msg::FocusDown));
        assert!(is_drag(&Msg::Drop));
        assert!(!is_drag(&Msg::AddTask));
    }

    #[test]
    fn test_key_to_msg_unhandled() {
        assert_eq!(normal(KeyCode::Char('z')), Msg::Noop);
        assert_eq!(normal(KeyCode::F(5)), Msg::Noop);
    }
}
