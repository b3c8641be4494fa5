//! Card number entry with digit grouping and brand detection.

use std::fmt;

use cards::{validate::NUMBER_MAXIMUM_LENGTH, validate_card_number, CardBrand, NumberValidation};
use common_utils::validation::Validity;

use super::text_input::{Edit, TextInput};

const GROUP_SIZE: usize = 4;
/// 19 digits plus the separators between their groups of four.
const MAX_LENGTH: usize = NUMBER_MAXIMUM_LENGTH + (NUMBER_MAXIMUM_LENGTH - 1) / GROUP_SIZE;
const DEFAULT_SECURITY_CODE_LENGTH: usize = 3;

/// Card number field.
///
/// Every edit is rewritten into digits grouped in blocks of four. Insertions
/// carrying anything besides digits and spaces are dropped wholesale while
/// the deletion part of the edit still applies, and the cursor lands after
/// the same digit it followed in the raw edit. The detected brand drives the
/// security code length pushed to the linked CVC field.
pub struct CardNumberField {
    input: TextInput,
    allowed_brands: Vec<CardBrand>,
    validation: NumberValidation,
    ready_listener: Option<Box<dyn FnMut(bool)>>,
    security_code_length_listener: Option<Box<dyn FnMut(usize)>>,
}

impl CardNumberField {
    /// Creates an empty field restricted to `allowed_brands`.
    pub fn new(allowed_brands: Vec<CardBrand>) -> Self {
        let validation = validate_card_number("", &allowed_brands);
        Self {
            input: TextInput::new(Some(MAX_LENGTH)),
            allowed_brands,
            validation,
            ready_listener: None,
            security_code_length_listener: None,
        }
    }

    /// Applies one edit and reformats the content.
    pub fn edit(&mut self, edit: &Edit) {
        let mut edit = edit.clone();
        if !edit
            .inserted
            .chars()
            .all(|c| c.is_ascii_digit() || c == ' ')
        {
            edit.inserted.clear();
        }

        let candidate = self.input.preview(&edit);
        let digits: String = candidate
            .chars()
            .filter(char::is_ascii_digit)
            .take(NUMBER_MAXIMUM_LENGTH)
            .collect();

        let caret = edit.start.saturating_add(edit.inserted.chars().count());
        let digits_before = candidate
            .chars()
            .take(caret)
            .filter(char::is_ascii_digit)
            .count()
            .min(digits.chars().count());
        let cursor = if digits_before == 0 {
            0
        } else {
            digits_before + (digits_before - 1) / GROUP_SIZE
        };

        self.input.commit(grouped(&digits), cursor);
        self.refresh();
    }

    /// Grouped content as displayed.
    pub fn value(&self) -> &str {
        self.input.value()
    }

    /// Cursor position within the grouped content.
    pub fn cursor(&self) -> usize {
        self.input.cursor()
    }

    /// Validity of the current content.
    pub fn validity(&self) -> Validity {
        self.validation.validity
    }

    /// Brand detected from the leading digits, when recognized.
    pub fn brand(&self) -> Option<CardBrand> {
        self.validation.brand
    }

    /// Content with the separators stripped.
    pub fn normalized(&self) -> &str {
        &self.validation.normalized
    }

    /// Installs the listener invoked with the field readiness on every edit.
    pub fn set_ready_listener(&mut self, listener: impl FnMut(bool) + 'static) {
        self.ready_listener = Some(Box::new(listener));
    }

    /// Installs the listener invoked with the security code length the
    /// detected brand expects, on every edit.
    pub fn set_security_code_length_listener(&mut self, listener: impl FnMut(usize) + 'static) {
        self.security_code_length_listener = Some(Box::new(listener));
    }

    fn refresh(&mut self) {
        self.validation = validate_card_number(self.input.value(), &self.allowed_brands);
        let security_code_length = self
            .validation
            .brand
            .map_or(DEFAULT_SECURITY_CODE_LENGTH, CardBrand::security_code_length);
        if let Some(listener) = self.security_code_length_listener.as_mut() {
            listener(security_code_length);
        }
        let ready = self.validation.validity.is_valid();
        if let Some(listener) = self.ready_listener.as_mut() {
            listener(ready);
        }
    }
}

fn grouped(digits: &str) -> String {
    let mut formatted = String::with_capacity(MAX_LENGTH);
    for (index, c) in digits.chars().enumerate() {
        if index > 0 && index % GROUP_SIZE == 0 {
            formatted.push(' ');
        }
        formatted.push(c);
    }
    formatted
}

impl fmt::Debug for CardNumberField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CardNumberField")
            .field("input", &self.input)
            .field("validation", &self.validation)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::{cell::Cell, rc::Rc};

    use super::*;

    fn type_into(field: &mut CardNumberField, text: &str) {
        for c in text.chars() {
            let at = field.cursor();
            field.edit(&Edit::insertion(at, c.to_string()));
        }
    }

    fn default_brands() -> Vec<CardBrand> {
        vec![CardBrand::Visa, CardBrand::Mc, CardBrand::Amex]
    }

    #[test]
    fn groups_typed_digits_in_blocks_of_four() {
        let mut field = CardNumberField::new(default_brands());
        type_into(&mut field, "4111111111111111");

        assert_eq!(field.value(), "4111 1111 1111 1111");
        assert_eq!(field.cursor(), 19);
        assert_eq!(field.validity(), Validity::Valid);
        assert_eq!(field.brand(), Some(CardBrand::Visa));
        assert_eq!(field.normalized(), "4111111111111111");
    }

    #[test]
    fn pasting_a_full_number_formats_in_one_edit() {
        let mut field = CardNumberField::new(default_brands());
        field.edit(&Edit::insertion(0, "5500 0000 0000 0004"));

        assert_eq!(field.value(), "5500 0000 0000 0004");
        assert_eq!(field.brand(), Some(CardBrand::Mc));
        assert_eq!(field.validity(), Validity::Valid);
    }

    #[test]
    fn insertions_with_letters_are_dropped_wholesale() {
        let mut field = CardNumberField::new(default_brands());
        type_into(&mut field, "4111");

        field.edit(&Edit::insertion(4, "a1"));
        assert_eq!(field.value(), "4111");

        // The removal side of a mixed edit still applies.
        field.edit(&Edit::replacement(3, 1, "x"));
        assert_eq!(field.value(), "411");
    }

    #[test]
    fn cursor_stays_with_the_digit_it_followed() {
        let mut field = CardNumberField::new(default_brands());
        type_into(&mut field, "41111111");
        assert_eq!(field.value(), "4111 1111");

        // Deleting the third digit keeps the cursor in front of the gap.
        field.edit(&Edit::deletion(2, 1));
        assert_eq!(field.value(), "4111 111");
        assert_eq!(field.cursor(), 2);
    }

    #[test]
    fn deleting_a_separator_reflows_the_grouping() {
        let mut field = CardNumberField::new(default_brands());
        type_into(&mut field, "41111111");

        field.edit(&Edit::deletion(4, 1));
        assert_eq!(field.value(), "4111 1111");
        assert_eq!(field.cursor(), 4);
    }

    #[test]
    fn content_is_capped_at_nineteen_digits() {
        let mut field = CardNumberField::new(default_brands());
        field.edit(&Edit::insertion(0, "412345678912345678901234"));

        assert_eq!(field.value(), "4123 4567 8912 3456 789");
        assert_eq!(field.normalized().len(), 19);
    }

    #[test]
    fn detected_brand_drives_the_security_code_length() {
        let pushed = Rc::new(Cell::new(0));
        let sink = Rc::clone(&pushed);

        let mut field = CardNumberField::new(default_brands());
        field.set_security_code_length_listener(move |length| sink.set(length));

        type_into(&mut field, "3782");
        assert_eq!(field.brand(), Some(CardBrand::Amex));
        assert_eq!(pushed.get(), 4);

        field.edit(&Edit::replacement(0, 4, "4111"));
        assert_eq!(pushed.get(), 3);
    }

    #[test]
    fn readiness_is_reported_on_every_edit() {
        let ready = Rc::new(Cell::new(false));
        let sink = Rc::clone(&ready);

        let mut field = CardNumberField::new(default_brands());
        field.set_ready_listener(move |is_ready| sink.set(is_ready));

        type_into(&mut field, "411111111111111");
        assert!(!ready.get());

        type_into(&mut field, "1");
        assert!(ready.get());

        field.edit(&Edit::deletion(18, 1));
        assert!(!ready.get());
    }
}
