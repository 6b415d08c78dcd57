// ABOUTME: Event handling system mapping keyboard input to tab console actions

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{state::AsyncAction, AppState};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    Quit,
    ToggleHelp,
    NextRoute,
    PreviousRoute,
    OpenRoute,
    ReplaceTab,
    NextTab,
    PreviousTab,
    CloseTab,
    CloseOtherTabs,
    CloseLeftTabs,
    CloseRightTabs,
    CloseAllTabs,
    TogglePin,
    StartRename,
    ResetLabel,
    CycleLocale,
    ToggleGuard,
    // Rename input events
    RenameInputChar(char),
    RenameBackspace,
    RenameConfirm,
    RenameCancel,
}

pub struct EventHandler;

impl EventHandler {
    pub fn handle_key_event(key_event: KeyEvent, state: &mut AppState) -> Option<AppEvent> {
        if state.rename_input.is_some() {
            return Self::handle_rename_keys(key_event);
        }

        if state.help_visible {
            return match key_event.code {
                KeyCode::Char('?') | KeyCode::Esc => Some(AppEvent::ToggleHelp),
                _ => None,
            };
        }

        match key_event.code {
            KeyCode::Char('c') if key_event.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(AppEvent::Quit)
            }
            KeyCode::Char('q') | KeyCode::Esc => Some(AppEvent::Quit),
            KeyCode::Char('?') => Some(AppEvent::ToggleHelp),
            KeyCode::Char('j') | KeyCode::Down => Some(AppEvent::NextRoute),
            KeyCode::Char('k') | KeyCode::Up => Some(AppEvent::PreviousRoute),
            KeyCode::Enter => Some(AppEvent::OpenRoute),
            KeyCode::Char('r') => Some(AppEvent::ReplaceTab),
            KeyCode::Char('l') | KeyCode::Right | KeyCode::Tab => Some(AppEvent::NextTab),
            KeyCode::Char('h') | KeyCode::Left | KeyCode::BackTab => Some(AppEvent::PreviousTab),
            KeyCode::Char('x') => Some(AppEvent::CloseTab),
            KeyCode::Char('o') => Some(AppEvent::CloseOtherTabs),
            KeyCode::Char('[') => Some(AppEvent::CloseLeftTabs),
            KeyCode::Char(']') => Some(AppEvent::CloseRightTabs),
            KeyCode::Char('X') => Some(AppEvent::CloseAllTabs),
            KeyCode::Char('p') => Some(AppEvent::TogglePin),
            KeyCode::Char('n') => Some(AppEvent::StartRename),
            KeyCode::Char('u') => Some(AppEvent::ResetLabel),
            KeyCode::Char('t') => Some(AppEvent::CycleLocale),
            KeyCode::Char('g') => Some(AppEvent::ToggleGuard),
            _ => None,
        }
    }

    fn handle_rename_keys(key_event: KeyEvent) -> Option<AppEvent> {
        match key_event.code {
            KeyCode::Esc => Some(AppEvent::RenameCancel),
            KeyCode::Enter => Some(AppEvent::RenameConfirm),
            KeyCode::Backspace => Some(AppEvent::RenameBackspace),
            KeyCode::Char(ch) => Some(AppEvent::RenameInputChar(ch)),
            _ => None,
        }
    }

    pub fn process_event(event: AppEvent, state: &mut AppState) {
        match event {
            AppEvent::Quit => state.quit(),
            AppEvent::ToggleHelp => state.toggle_help(),
            AppEvent::NextRoute => state.next_route(),
            AppEvent::PreviousRoute => state.previous_route(),
            // Anything that navigates is deferred to the async tick
            AppEvent::OpenRoute => state.pending_async_action = Some(AsyncAction::OpenSelectedRoute),
            AppEvent::ReplaceTab => {
                state.pending_async_action = Some(AsyncAction::ReplaceWithSelectedRoute);
            }
            AppEvent::NextTab => state.pending_async_action = Some(AsyncAction::NextTab),
            AppEvent::PreviousTab => state.pending_async_action = Some(AsyncAction::PreviousTab),
            AppEvent::CloseTab => state.pending_async_action = Some(AsyncAction::CloseActiveTab),
            AppEvent::CloseOtherTabs => state.pending_async_action = Some(AsyncAction::CloseOtherTabs),
            AppEvent::CloseLeftTabs => state.pending_async_action = Some(AsyncAction::CloseLeftTabs),
            AppEvent::CloseRightTabs => state.pending_async_action = Some(AsyncAction::CloseRightTabs),
            AppEvent::CloseAllTabs => state.pending_async_action = Some(AsyncAction::CloseAllTabs),
            AppEvent::TogglePin => state.toggle_pin_active_tab(),
            AppEvent::StartRename => state.start_rename(),
            AppEvent::ResetLabel => state.reset_label(),
            AppEvent::CycleLocale => state.cycle_locale(),
            AppEvent::ToggleGuard => state.toggle_guard_selected(),
            AppEvent::RenameInputChar(ch) => {
                if let Some(input) = state.rename_input.as_mut() {
                    input.push(ch);
                }
            }
            AppEvent::RenameBackspace => {
                if let Some(input) = state.rename_input.as_mut() {
                    input.pop();
                }
            }
            AppEvent::RenameConfirm => state.confirm_rename(),
            AppEvent::RenameCancel => state.rename_input = None,
        }
    }
}
