//! Security code entry with a brand driven length cap.

use std::fmt;

use common_utils::validation::Validity;

use super::text_input::{Edit, TextInput};

const DEFAULT_MAX_LENGTH: usize = 3;

/// Security code field.
///
/// Accepts digits only, capped at the length the detected card brand
/// expects. The content is valid exactly when it fills the cap, and the cap
/// can be moved while content is present: existing content is truncated only
/// when it no longer fits. Blurring the field reports whether it should be
/// shown in an error state.
pub struct CvcField {
    input: TextInput,
    ready_listener: Option<Box<dyn FnMut(bool)>>,
    completion_listener: Option<Box<dyn FnMut()>>,
    error_state_listener: Option<Box<dyn FnMut(bool)>>,
}

impl CvcField {
    /// Creates an empty field expecting three digits.
    pub fn new() -> Self {
        Self {
            input: TextInput::new(Some(DEFAULT_MAX_LENGTH)),
            ready_listener: None,
            completion_listener: None,
            error_state_listener: None,
        }
    }

    /// Applies one edit. Insertions with non digits are dropped wholesale
    /// while the deletion part still applies.
    pub fn edit(&mut self, edit: &Edit) {
        let mut edit = edit.clone();
        if !edit.inserted.chars().all(|c| c.is_ascii_digit()) {
            edit.inserted.clear();
        }
        let typed = !edit.inserted.is_empty();
        let length_before = self.input.value().chars().count();

        let candidate = self.input.preview(&edit);
        let caret = edit.start.saturating_add(edit.inserted.chars().count());
        self.input.commit(candidate, caret);
        self.report();

        // Advance only when the typed digit landed; typing into a full
        // field changes nothing.
        let grew = self.input.value().chars().count() > length_before;
        if typed && grew && self.has_valid_input() {
            if let Some(listener) = self.completion_listener.as_mut() {
                listener();
            }
        }
    }

    /// Moves the length cap, truncating only content that no longer fits.
    pub fn set_max_length(&mut self, max_length: usize) {
        self.input.set_max_length(Some(max_length));
        self.report();
    }

    /// Reports the error state to the host when focus moves. A focused field
    /// is never shown as erroneous.
    pub fn focus_changed(&mut self, has_focus: bool) {
        let error = !has_focus && !self.has_valid_input();
        if let Some(listener) = self.error_state_listener.as_mut() {
            listener(error);
        }
    }

    /// Content as displayed.
    pub fn value(&self) -> &str {
        self.input.value()
    }

    /// Cursor position.
    pub fn cursor(&self) -> usize {
        self.input.cursor()
    }

    /// Current length cap.
    pub fn max_length(&self) -> usize {
        self.input.max_length().unwrap_or(DEFAULT_MAX_LENGTH)
    }

    /// Whether the content fills the cap.
    pub fn has_valid_input(&self) -> bool {
        self.input.value().chars().count() == self.max_length()
    }

    /// Validity of the current content. Short content is partial; overlong
    /// content cannot exist because of the cap.
    pub fn validity(&self) -> Validity {
        if self.has_valid_input() {
            Validity::Valid
        } else {
            Validity::Partial
        }
    }

    /// Installs the listener invoked with the field readiness on every edit
    /// and cap move.
    pub fn set_ready_listener(&mut self, listener: impl FnMut(bool) + 'static) {
        self.ready_listener = Some(Box::new(listener));
    }

    /// Installs the listener invoked when typing fills the cap, so the host
    /// can advance focus.
    pub fn set_completion_listener(&mut self, listener: impl FnMut() + 'static) {
        self.completion_listener = Some(Box::new(listener));
    }

    /// Installs the listener invoked with the error state on focus changes.
    pub fn set_error_state_listener(&mut self, listener: impl FnMut(bool) + 'static) {
        self.error_state_listener = Some(Box::new(listener));
    }

    fn report(&mut self) {
        let ready = self.has_valid_input();
        if let Some(listener) = self.ready_listener.as_mut() {
            listener(ready);
        }
    }
}

impl Default for CvcField {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CvcField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CvcField")
            .field("input", &self.input)
            .finish()
    }
}
