//! IBAN entry with uppercasing and prefix aware validation.

use std::fmt;

use common_utils::validation::Validity;

use super::text_input::{Edit, TextInput};
use crate::sepa::Iban;

const MAX_LENGTH: usize = 36;
/// Content at most this long is considered still partial without running
/// the registry check.
const MIN_CHECKED_LENGTH: usize = 2;

/// IBAN field.
///
/// Typed characters are uppercased as they arrive. Insertions carrying
/// anything besides letters, digits and spaces are dropped wholesale while
/// the deletion part of the edit still applies. Content is matched against
/// the country registry: a prefix of a valid account number stays partial,
/// anything else is invalid.
pub struct IbanField {
    input: TextInput,
    validity: Validity,
    ready_listener: Option<Box<dyn FnMut(bool)>>,
}

impl IbanField {
    /// Creates an empty field.
    pub fn new() -> Self {
        Self {
            input: TextInput::new(Some(MAX_LENGTH)),
            validity: Validity::Partial,
            ready_listener: None,
        }
    }

    /// Applies one edit.
    pub fn edit(&mut self, edit: &Edit) {
        let mut edit = edit.clone();
        if !edit
            .inserted
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == ' ')
        {
            edit.inserted.clear();
        }
        edit.inserted = edit.inserted.to_ascii_uppercase();

        let candidate = self.input.preview(&edit);
        let caret = edit.start.saturating_add(edit.inserted.chars().count());
        self.input.commit(candidate, caret);
        self.refresh();
    }

    /// Content as displayed.
    pub fn value(&self) -> &str {
        self.input.value()
    }

    /// Cursor position.
    pub fn cursor(&self) -> usize {
        self.input.cursor()
    }

    /// Validity of the current content.
    pub fn validity(&self) -> Validity {
        self.validity
    }

    /// Installs the listener invoked with the field readiness on every edit.
    pub fn set_ready_listener(&mut self, listener: impl FnMut(bool) + 'static) {
        self.ready_listener = Some(Box::new(listener));
    }

    fn refresh(&mut self) {
        let value = self.input.value();
        let stripped_length = value.chars().filter(|c| c.is_ascii_alphanumeric()).count();

        self.validity = if stripped_length <= MIN_CHECKED_LENGTH {
            Validity::Partial
        } else if Iban::parse(value).is_some() {
            Validity::Valid
        } else if Iban::is_partial(value) {
            Validity::Partial
        } else {
            Validity::Invalid
        };

        let ready = self.validity.is_valid();
        if let Some(listener) = self.ready_listener.as_mut() {
            listener(ready);
        }
    }
}

impl Default for IbanField {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for IbanField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IbanField")
            .field("input", &self.input)
            .field("validity", &self.validity)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::{cell::Cell, rc::Rc};

    use super::*;

    fn type_into(field: &mut IbanField, text: &str) {
        for c in text.chars() {
            let at = field.cursor();
            field.edit(&Edit::insertion(at, c.to_string()));
        }
    }

    #[test]
    fn typed_characters_are_uppercased() {
        let mut field = IbanField::new();
        type_into(&mut field, "nl91 abna 0417 1643 00");

        assert_eq!(field.value(), "NL91 ABNA 0417 1643 00");
        assert_eq!(field.validity(), Validity::Valid);
    }

    #[test]
    fn short_content_stays_partial_without_a_registry_check() {
        let mut field = IbanField::new();
        type_into(&mut field, "XX");

        // Two characters match no country code, but checking starts at three.
        assert_eq!(field.validity(), Validity::Partial);

        type_into(&mut field, "1");
        assert_eq!(field.validity(), Validity::Invalid);
    }

    #[test]
    fn prefixes_of_valid_account_numbers_stay_partial() {
        let mut field = IbanField::new();
        type_into(&mut field, "NL91 ABNA");

        assert_eq!(field.validity(), Validity::Partial);
    }

    #[test]
    fn punctuation_is_dropped_wholesale() {
        let mut field = IbanField::new();
        type_into(&mut field, "NL91");

        field.edit(&Edit::insertion(4, "-"));
        assert_eq!(field.value(), "NL91");

        field.edit(&Edit::replacement(3, 1, "@"));
        assert_eq!(field.value(), "NL9");
    }

    #[test]
    fn content_is_capped() {
        let mut field = IbanField::new();
        let overlong = "A".repeat(40);
        field.edit(&Edit::insertion(0, overlong));

        assert_eq!(field.value().len(), 36);
    }

    #[test]
    fn readiness_follows_validity() {
        let ready = Rc::new(Cell::new(false));
        let sink = Rc::clone(&ready);

        let mut field = IbanField::new();
        field.set_ready_listener(move |is_ready| sink.set(is_ready));

        type_into(&mut field, "NL91 ABNA 0417 1643 0");
        assert!(!ready.get());

        type_into(&mut field, "0");
        assert!(ready.get());
    }
}
