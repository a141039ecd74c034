//! Application state management for the freight request form.
//!
//! This module contains the main application state and mode management
//! for the terminal user interface.

use crate::domain::{Draft, Identity, IdentityPhase, SubmissionOutcome, SubmissionPayload};
use std::time::{Duration, Instant};

/// How long the success screen is shown before the host container is asked
/// to close the view.
pub const CLOSE_DELAY: Duration = Duration::from_secs(2);

/// Represents the current mode of the application.
///
/// The application can be in different modes that determine how user input
/// is interpreted and what UI elements are displayed.
#[derive(Debug)]
pub enum AppMode {
    /// Identity is being resolved - a loading indicator is shown
    Loading,
    /// Login redirect is required - blocking screen, no form access
    LoginRedirect,
    /// Startup failed - blocking error screen, no form access
    Fatal,
    /// Normal form navigation - arrow keys move focus, shortcuts available
    Form,
    /// Field editing mode - user is typing into the focused field
    Editing,
    /// A submission is in flight - input is disabled
    Submitting,
    /// The request was recorded - success screen with auto-close timer
    Submitted,
    /// Help screen is displayed
    Help,
}

/// One entry of the fixed form layout, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Pickup,
    Dropoff,
    CargoType,
    Weight,
    Photo,
}

impl FormField {
    pub const ALL: [FormField; 5] = [
        FormField::Pickup,
        FormField::Dropoff,
        FormField::CargoType,
        FormField::Weight,
        FormField::Photo,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FormField::Pickup => "Pickup Location",
            FormField::Dropoff => "Dropoff Location",
            FormField::CargoType => "Cargo Type",
            FormField::Weight => "Est. Weight",
            FormField::Photo => "Cargo Photo",
        }
    }

    pub fn next(&self) -> FormField {
        let index = Self::ALL.iter().position(|f| f == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }

    pub fn previous(&self) -> FormField {
        let index = Self::ALL.iter().position(|f| f == self).unwrap_or(0);
        Self::ALL[(index + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Main application state containing the draft request and UI state.
///
/// This structure holds all the data needed to render the terminal UI
/// and manage one form-filling session.
///
/// # Examples
///
/// ```
/// use frf::application::{App, AppMode};
///
/// let app = App::default();
/// assert!(matches!(app.mode, AppMode::Loading));
/// assert!(app.identity.is_none());
/// ```
#[derive(Debug)]
pub struct App {
    /// Current application mode
    pub mode: AppMode,
    /// Resolved identity, present once startup completed
    pub identity: Option<Identity>,
    /// Login URL shown on the redirect screen
    pub login_url: Option<String>,
    /// Startup error shown on the fatal screen
    pub fatal_error: Option<String>,
    /// The in-progress freight request
    pub draft: Draft,
    /// Currently focused form field
    pub focused: FormField,
    /// Current input buffer (for editing mode)
    pub input: String,
    /// Cursor position within the input buffer
    pub cursor_position: usize,
    /// Outcome of the current submission attempt
    pub outcome: SubmissionOutcome,
    /// Recoverable submission error shown above the form
    pub error_banner: Option<String>,
    /// Temporary status message to display
    pub status_message: Option<String>,
    /// When the success screen appeared
    pub submitted_at: Option<Instant>,
    /// Whether the client runs inside the host container
    pub in_client: bool,
    /// Set once the auto-close window passed outside the host container
    pub close_notice: bool,
    /// Scroll position in help text
    pub help_scroll: usize,
}

impl Default for App {
    fn default() -> Self {
        Self {
            mode: AppMode::Loading,
            identity: None,
            login_url: None,
            fatal_error: None,
            draft: Draft::default(),
            focused: FormField::ALL[0],
            input: String::new(),
            cursor_position: 0,
            outcome: SubmissionOutcome::Idle,
            error_banner: None,
            status_message: None,
            submitted_at: None,
            in_client: false,
            close_notice: false,
            help_scroll: 0,
        }
    }
}

impl App {
    pub fn new(in_client: bool) -> Self {
        Self {
            in_client,
            ..Self::default()
        }
    }

    /// Applies the result of startup identity resolution.
    ///
    /// A resolved identity opens the form; a pending redirect or a failure
    /// blocks it. Resolution happens once - there is no re-entry path.
    pub fn set_identity_phase(&mut self, phase: IdentityPhase) {
        match phase {
            IdentityPhase::Resolved(identity) => {
                self.status_message = Some(format!("Welcome, {}!", identity.display_name));
                self.identity = Some(identity);
                self.mode = AppMode::Form;
            }
            IdentityPhase::RedirectPending { login_url } => {
                self.login_url = Some(login_url);
                self.mode = AppMode::LoginRedirect;
            }
            IdentityPhase::Failed(message) => {
                self.fatal_error = Some(message);
                self.mode = AppMode::Fatal;
            }
            IdentityPhase::Unresolved => {
                self.mode = AppMode::Loading;
            }
        }
    }

    pub fn focus_next(&mut self) {
        self.focused = self.focused.next();
    }

    pub fn focus_previous(&mut self) {
        self.focused = self.focused.previous();
    }

    /// Switches to editing mode for the currently focused field.
    ///
    /// Loads the field's current value into the input buffer and positions
    /// the cursor at the end. The cargo type is a closed single-select and
    /// has no editing mode; it is cycled in place instead.
    pub fn start_editing(&mut self) {
        self.input = match self.focused {
            FormField::Pickup => self.draft.pickup.clone(),
            FormField::Dropoff => self.draft.dropoff.clone(),
            FormField::Weight => self.draft.weight.clone(),
            FormField::Photo => self.draft.photo_name.clone(),
            FormField::CargoType => return,
        };
        self.cursor_position = self.input.len();
        self.mode = AppMode::Editing;
    }

    /// Completes editing and writes the input buffer into the draft.
    ///
    /// The photo field keeps only the file name of the entered path.
    /// Returns to form mode after completion.
    pub fn finish_editing(&mut self) {
        match self.focused {
            FormField::Pickup => self.draft.pickup = self.input.trim().to_string(),
            FormField::Dropoff => self.draft.dropoff = self.input.trim().to_string(),
            FormField::Weight => self.draft.weight = self.input.trim().to_string(),
            FormField::Photo => self.draft.set_photo_path(&self.input),
            FormField::CargoType => {}
        }

        self.mode = AppMode::Form;
        self.input.clear();
        self.cursor_position = 0;
    }

    /// Cancels editing and returns to form mode without saving changes.
    pub fn cancel_editing(&mut self) {
        self.mode = AppMode::Form;
        self.input.clear();
        self.cursor_position = 0;
    }

    pub fn cycle_category_next(&mut self) {
        self.draft.cargo_category = self.draft.cargo_category.next();
    }

    pub fn cycle_category_previous(&mut self) {
        self.draft.cargo_category = self.draft.cargo_category.previous();
    }

    /// Starts a submission attempt if one is allowed right now.
    ///
    /// Returns the immutable payload snapshot to submit, or `None` when the
    /// required fields are incomplete, identity is missing, or an attempt
    /// is already pending (single-flight). On `Some`, the outcome is
    /// `Pending` and input is disabled until a result arrives.
    pub fn begin_submission(&mut self) -> Option<SubmissionPayload> {
        if matches!(self.outcome, SubmissionOutcome::Pending) {
            return None;
        }

        let Some(identity) = &self.identity else {
            self.status_message = Some("Identity is not resolved yet.".to_string());
            return None;
        };

        let Some(payload) = self.draft.to_submission_payload(identity) else {
            self.status_message =
                Some("Pickup, dropoff and weight are required.".to_string());
            return None;
        };

        self.outcome = SubmissionOutcome::Pending;
        self.error_banner = None;
        self.status_message = None;
        self.mode = AppMode::Submitting;
        Some(payload)
    }

    /// Applies the terminal outcome of a submission attempt.
    ///
    /// Only a pending attempt can be resolved, and it resolves exactly
    /// once: success moves to the confirmation screen, failure returns the
    /// form for editing with an inline error banner.
    pub fn set_submission_result(&mut self, outcome: SubmissionOutcome) {
        if !matches!(self.outcome, SubmissionOutcome::Pending) {
            return;
        }

        match outcome {
            SubmissionOutcome::Succeeded => {
                self.outcome = SubmissionOutcome::Succeeded;
                self.submitted_at = Some(Instant::now());
                self.mode = AppMode::Submitted;
            }
            SubmissionOutcome::Failed(message) => {
                self.error_banner = Some(message.clone());
                self.outcome = SubmissionOutcome::Failed(message);
                self.mode = AppMode::Form;
            }
            SubmissionOutcome::Idle | SubmissionOutcome::Pending => {}
        }
    }

    /// Whether the close-view signal should fire now.
    pub fn should_auto_close(&self) -> bool {
        self.should_auto_close_at(Instant::now())
    }

    pub fn should_auto_close_at(&self, now: Instant) -> bool {
        matches!(self.mode, AppMode::Submitted)
            && !self.close_notice
            && self
                .submitted_at
                .is_some_and(|at| now.duration_since(at) >= CLOSE_DELAY)
    }

    /// Records that no host container is present to close the view.
    /// The success screen stays up with an adjusted notice.
    pub fn mark_close_unavailable(&mut self) {
        self.close_notice = true;
    }

    pub fn open_help(&mut self) {
        self.mode = AppMode::Help;
        self.help_scroll = 0;
    }

    pub fn close_help(&mut self) {
        self.mode = AppMode::Form;
    }

    /// Whether 'q' currently quits the application.
    /// Editing uses 'q' as text, the help screen uses it to close itself,
    /// and an in-flight submission cannot be cancelled.
    pub fn allows_quit(&self) -> bool {
        !matches!(
            self.mode,
            AppMode::Editing | AppMode::Submitting | AppMode::Help
        )
    }

    /// Processes the result of saving the draft to a file.
    pub fn set_draft_save_result(&mut self, result: Result<String, String>) {
        match result {
            Ok(filename) => {
                self.status_message = Some(format!("Draft saved to {}", filename));
            }
            Err(error) => {
                self.status_message = Some(format!("Draft save failed: {}", error));
            }
        }
    }

    /// Processes the result of loading a draft from a file.
    ///
    /// Replaces the current draft and resets focus if successful.
    pub fn set_draft_load_result(&mut self, result: Result<(Draft, String), String>) {
        match result {
            Ok((draft, filename)) => {
                self.draft = draft;
                self.focused = FormField::ALL[0];
                self.status_message = Some(format!("Draft loaded from {}", filename));
            }
            Err(error) => {
                self.status_message = Some(format!("Draft load failed: {}", error));
            }
        }
    }
}
