use crate::application::{App, AppMode, FormField};
use crate::domain::{SubmissionWorkflow, TableStore};
use crate::infrastructure::{DEFAULT_DRAFT_FILE, DraftRepository};
use arboard::Clipboard;
use crossterm::event::{KeyCode, KeyModifiers};

pub struct InputHandler;

impl InputHandler {
    pub fn handle_key_event<S: TableStore>(
        app: &mut App,
        key: KeyCode,
        modifiers: KeyModifiers,
        store: &S,
    ) {
        match app.mode {
            AppMode::Form => Self::handle_form_mode(app, key, modifiers, store),
            AppMode::Editing => Self::handle_editing_mode(app, key, modifiers),
            AppMode::Help => Self::handle_help_mode(app, key),
            AppMode::Loading
            | AppMode::LoginRedirect
            | AppMode::Fatal
            | AppMode::Submitting
            | AppMode::Submitted => {}
        }
    }

    fn handle_form_mode<S: TableStore>(
        app: &mut App,
        key: KeyCode,
        modifiers: KeyModifiers,
        store: &S,
    ) {
        if modifiers.contains(KeyModifiers::CONTROL) {
            match key {
                KeyCode::Char('s') => {
                    let result = DraftRepository::save_draft(&app.draft, DEFAULT_DRAFT_FILE);
                    app.set_draft_save_result(result);
                    return;
                }
                KeyCode::Char('o') => {
                    let result = DraftRepository::load_draft(DEFAULT_DRAFT_FILE);
                    app.set_draft_load_result(result);
                    return;
                }
                _ => {}
            }
        }

        // Any other key press clears the transient status line.
        app.status_message = None;

        match key {
            KeyCode::Up | KeyCode::BackTab => app.focus_previous(),
            KeyCode::Down | KeyCode::Tab => app.focus_next(),
            KeyCode::Left if app.focused == FormField::CargoType => {
                app.cycle_category_previous();
            }
            KeyCode::Right if app.focused == FormField::CargoType => {
                app.cycle_category_next();
            }
            KeyCode::Enter => {
                if app.focused == FormField::CargoType {
                    app.cycle_category_next();
                } else {
                    app.start_editing();
                }
            }
            KeyCode::Char('s') => Self::submit(app, store),
            KeyCode::F(1) | KeyCode::Char('?') => app.open_help(),
            KeyCode::Esc => {
                app.error_banner = None;
            }
            _ => {}
        }
    }

    fn submit<S: TableStore>(app: &mut App, store: &S) {
        let Some(identity) = app.identity.clone() else {
            return;
        };

        if let Some(payload) = app.begin_submission() {
            let outcome = SubmissionWorkflow::new(store).submit(&identity, &payload);
            app.set_submission_result(outcome);
        }
    }

    fn handle_editing_mode(app: &mut App, key: KeyCode, modifiers: KeyModifiers) {
        if modifiers.contains(KeyModifiers::CONTROL) {
            if let KeyCode::Char('v') = key {
                Self::paste_from_clipboard(app);
            }
            return;
        }

        match key {
            KeyCode::Enter => {
                app.finish_editing();
            }
            KeyCode::Esc => {
                app.cancel_editing();
            }
            KeyCode::Backspace => {
                if app.cursor_position > 0 {
                    app.input.remove(app.cursor_position - 1);
                    app.cursor_position -= 1;
                }
            }
            KeyCode::Delete => {
                if app.cursor_position < app.input.len() {
                    app.input.remove(app.cursor_position);
                }
            }
            KeyCode::Left => {
                if app.cursor_position > 0 {
                    app.cursor_position -= 1;
                }
            }
            KeyCode::Right => {
                if app.cursor_position < app.input.len() {
                    app.cursor_position += 1;
                }
            }
            KeyCode::Home => {
                app.cursor_position = 0;
            }
            KeyCode::End => {
                app.cursor_position = app.input.len();
            }
            KeyCode::Char(c) => {
                app.input.insert(app.cursor_position, c);
                app.cursor_position += 1;
            }
            _ => {}
        }
    }

    fn paste_from_clipboard(app: &mut App) {
        let Ok(mut clipboard) = Clipboard::new() else {
            return;
        };
        let Ok(text) = clipboard.get_text() else {
            return;
        };

        let text: String = text.chars().filter(|c| !c.is_control()).collect();
        app.input.insert_str(app.cursor_position, &text);
        app.cursor_position += text.len();
    }

    fn handle_help_mode(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Esc | KeyCode::F(1) | KeyCode::Char('?') | KeyCode::Char('q') => {
                app.close_help();
            }
            KeyCode::Up | KeyCode::Char('k') => {
                if app.help_scroll > 0 {
                    app.help_scroll -= 1;
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                app.help_scroll += 1;
            }
            KeyCode::PageUp => {
                app.help_scroll = app.help_scroll.saturating_sub(5);
            }
            KeyCode::PageDown => {
                app.help_scroll += 5;
            }
            KeyCode::Home => {
                app.help_scroll = 0;
            }
            _ => {}
        }
    }
}
