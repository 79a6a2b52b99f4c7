use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, Screen};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Action {
    None,
    Quit,
    /// Triage the selected source around the typed observer and radius
    RunTriage,
    /// Re-run the last triage against a fresh snapshot
    Refresh,
}

pub(crate) fn handle_key_event(key: KeyEvent, app: &mut App) -> Action {
    use KeyCode::{Backspace, Char, Down, Enter, Esc, Left, Up};

    // Global quit shortcuts
    if key.code == Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Action::Quit;
    }
    // 'q' is literal text while typing coordinates
    if key.code == Char('q') && key.modifiers.is_empty() && app.screen != Screen::ObserverInput {
        return Action::Quit;
    }

    let mut action = Action::None;

    match app.screen {
        Screen::SourceSelect => match key.code {
            Up | Char('k') => {
                if app.source_list_index > 0 {
                    app.source_list_index -= 1;
                }
            }
            Down | Char('j') => {
                if app.source_list_index + 1 < app.sources.len() {
                    app.source_list_index += 1;
                }
            }
            Enter | Char(' ') => {
                app.select_current_source();
            }
            _ => {}
        },

        Screen::ObserverInput => match key.code {
            Char(character) => {
                if !key.modifiers.contains(KeyModifiers::CONTROL)
                    && !key.modifiers.contains(KeyModifiers::ALT)
                {
                    app.observer_input.push(character);
                }
            }
            Backspace => {
                app.observer_input.pop();
            }
            Enter => {
                action = Action::RunTriage;
            }
            Esc => {
                app.screen = Screen::SourceSelect;
                app.selected_source = None;
            }
            _ => {}
        },

        Screen::TriageView => match key.code {
            Up | Char('k') => {
                if app.row_index > 0 {
                    app.row_index -= 1;
                }
            }
            Down | Char('j') => {
                if app.row_index + 1 < app.ranked_len() {
                    app.row_index += 1;
                }
            }
            Char('r') => {
                action = Action::Refresh;
            }
            Left | Esc | Char('b') => {
                app.screen = Screen::ObserverInput;
            }
            _ => {}
        },
    }
    action
}
