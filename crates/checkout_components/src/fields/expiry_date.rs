//! Expiry date entry in `MM/yy` shape.

use std::fmt;

use cards::{validate_expiry_date, ExpiryDateValidation};
use common_utils::validation::Validity;
use masking::PeekInterface;

use super::text_input::{Edit, TextInput};

const MAX_LENGTH: usize = 5;
const SEPARATOR: char = '/';

/// Expiry date field.
///
/// Single typed characters are folded into canonical `MM/yy` as they arrive:
/// a leading 2 through 9 is zero padded, the separator appears on its own
/// after a complete month and a character that cannot extend a real date is
/// rejected outright. Deletions apply verbatim so the separator can actually
/// be removed. Multi character insertions are rejected wholesale and the
/// field reports not ready, forcing the shopper to type the date out.
pub struct ExpiryDateField {
    input: TextInput,
    validation: ExpiryDateValidation,
    ready_listener: Option<Box<dyn FnMut(bool)>>,
    completion_listener: Option<Box<dyn FnMut()>>,
}

impl ExpiryDateField {
    /// Creates an empty field.
    pub fn new() -> Self {
        Self {
            input: TextInput::new(Some(MAX_LENGTH)),
            validation: validate_expiry_date(""),
            ready_listener: None,
            completion_listener: None,
        }
    }

    /// Applies one edit.
    pub fn edit(&mut self, edit: &Edit) {
        if edit.inserted.chars().count() > 1 {
            if let Some(listener) = self.ready_listener.as_mut() {
                listener(false);
            }
            return;
        }

        if edit.inserted.is_empty() {
            let candidate = self.input.preview(edit);
            self.input.commit(candidate, edit.start);
            self.refresh(false);
            return;
        }

        let candidate = self.input.preview(edit);
        match canonical(&candidate) {
            Some(value) => {
                let caret = edit.start.saturating_add(1);
                let cursor = if caret >= candidate.chars().count() {
                    value.chars().count()
                } else {
                    caret + value.chars().count().saturating_sub(candidate.chars().count())
                };
                self.input.commit(value, cursor);
                self.refresh(true);
            }
            // The typed character cannot extend a real date.
            None => self.refresh(false),
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

    /// Validity of the current content, including the acceptance window.
    pub fn validity(&self) -> Validity {
        self.validation.validity
    }

    /// Expiry month, once the date is complete.
    pub fn month(&self) -> Option<u8> {
        self.validation
            .expiry
            .as_ref()
            .map(|expiry| *expiry.get_month().peek().peek())
    }

    /// Four digit expiry year, once the date is complete.
    pub fn full_year(&self) -> Option<u16> {
        self.validation
            .expiry
            .as_ref()
            .map(|expiry| *expiry.get_year().peek().peek())
    }

    /// Installs the listener invoked with the field readiness on every edit.
    pub fn set_ready_listener(&mut self, listener: impl FnMut(bool) + 'static) {
        self.ready_listener = Some(Box::new(listener));
    }

    /// Installs the listener invoked when typing completes a valid date, so
    /// the host can advance focus to the next field.
    pub fn set_completion_listener(&mut self, listener: impl FnMut() + 'static) {
        self.completion_listener = Some(Box::new(listener));
    }

    fn refresh(&mut self, typed: bool) {
        self.validation = validate_expiry_date(self.input.value());
        let ready = self.validation.validity.is_valid();
        if let Some(listener) = self.ready_listener.as_mut() {
            listener(ready);
        }
        if typed && ready && self.input.value().chars().count() == MAX_LENGTH {
            if let Some(listener) = self.completion_listener.as_mut() {
                listener();
            }
        }
    }
}

/// Folds `candidate` into canonical `MM/yy` shape, or rejects it.
fn canonical(candidate: &str) -> Option<String> {
    if candidate
        .chars()
        .any(|c| !c.is_ascii_digit() && c != SEPARATOR)
    {
        return None;
    }
    if candidate.matches(SEPARATOR).count() > 1 {
        return None;
    }

    match candidate.split_once(SEPARATOR) {
        None => canonical_without_separator(candidate),
        Some((month, year)) => {
            if year.chars().count() > 2 {
                return None;
            }
            let month = canonical_month(month)?;
            Some(format!("{month}{SEPARATOR}{year}"))
        }
    }
}

fn canonical_without_separator(digits: &str) -> Option<String> {
    let mut chars = digits.chars();
    match digits.chars().count() {
        0 => Some(String::new()),
        1 => match chars.next() {
            // A month can only start with 0 or 1; anything higher is the
            // month typed as a single digit.
            Some(first @ '2'..='9') => Some(format!("0{first}{SEPARATOR}")),
            _ => Some(digits.to_string()),
        },
        2 => {
            let month = canonical_month(digits)?;
            Some(format!("{month}{SEPARATOR}"))
        }
        // The separator was deleted earlier and the shopper kept typing.
        3 | 4 => {
            let month: String = chars.by_ref().take(2).collect();
            let month = canonical_month(&month)?;
            let year: String = chars.collect();
            Some(format!("{month}{SEPARATOR}{year}"))
        }
        _ => None,
    }
}

fn canonical_month(month: &str) -> Option<String> {
    match month.chars().count() {
        1 => match month.chars().next() {
            Some(digit @ '1'..='9') => Some(format!("0{digit}")),
            _ => None,
        },
        2 => {
            let number: u8 = month.parse().ok()?;
            (1..=12).contains(&number).then(|| month.to_string())
        }
        _ => None,
    }
}

impl Default for ExpiryDateField {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ExpiryDateField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExpiryDateField")
            .field("input", &self.input)
            .field("validity", &self.validation.validity)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::{cell::Cell, rc::Rc};

    use super::*;

    fn type_into(field: &mut ExpiryDateField, text: &str) {
        for c in text.chars() {
            let at = field.cursor();
            field.edit(&Edit::insertion(at, c.to_string()));
        }
    }

    #[test]
    fn separator_appears_after_a_complete_month() {
        let mut field = ExpiryDateField::new();
        type_into(&mut field, "12");

        assert_eq!(field.value(), "12/");
        assert_eq!(field.cursor(), 3);
    }

    #[test]
    fn high_single_digit_is_zero_padded() {
        let mut field = ExpiryDateField::new();
        type_into(&mut field, "2");

        assert_eq!(field.value(), "02/");
        assert_eq!(field.cursor(), 3);
    }

    #[test]
    fn typed_separator_pads_a_single_digit_month() {
        let mut field = ExpiryDateField::new();
        type_into(&mut field, "1/");

        assert_eq!(field.value(), "01/");
    }

    #[test]
    fn impossible_month_digit_is_rejected() {
        let mut field = ExpiryDateField::new();
        type_into(&mut field, "15");
        assert_eq!(field.value(), "1");

        type_into(&mut field, "3");
        assert_eq!(field.value(), "1");

        type_into(&mut field, "2");
        assert_eq!(field.value(), "12/");
    }

    #[test]
    fn zero_month_is_rejected_at_the_second_digit() {
        let mut field = ExpiryDateField::new();
        type_into(&mut field, "00");

        assert_eq!(field.value(), "0");
    }

    #[test]
    fn full_date_reports_ready_and_advances_focus_once() {
        let completions = Rc::new(Cell::new(0));
        let ready = Rc::new(Cell::new(false));
        let completion_sink = Rc::clone(&completions);
        let ready_sink = Rc::clone(&ready);

        let mut field = ExpiryDateField::new();
        field.set_completion_listener(move || completion_sink.set(completion_sink.get() + 1));
        field.set_ready_listener(move |is_ready| ready_sink.set(is_ready));

        type_into(&mut field, "1299");
        assert_eq!(field.value(), "12/99");
        assert!(ready.get());
        assert_eq!(completions.get(), 1);
        assert_eq!(field.month(), Some(12));
        assert_eq!(field.full_year(), Some(2099));
    }

    #[test]
    fn pasted_batches_are_rejected_and_report_not_ready() {
        let ready = Rc::new(Cell::new(true));
        let sink = Rc::clone(&ready);

        let mut field = ExpiryDateField::new();
        field.set_ready_listener(move |is_ready| sink.set(is_ready));

        field.edit(&Edit::insertion(0, "12/99"));
        assert_eq!(field.value(), "");
        assert!(!ready.get());
    }

    #[test]
    fn deletions_apply_verbatim() {
        let mut field = ExpiryDateField::new();
        type_into(&mut field, "1299");

        field.edit(&Edit::deletion(4, 1));
        assert_eq!(field.value(), "12/9");
        assert_eq!(field.validity(), Validity::Partial);
        assert_eq!(field.month(), None);
    }

    #[test]
    fn separator_can_be_deleted_and_comes_back_on_the_next_digit() {
        let mut field = ExpiryDateField::new();
        type_into(&mut field, "12");
        assert_eq!(field.value(), "12/");

        field.edit(&Edit::deletion(2, 1));
        assert_eq!(field.value(), "12");

        type_into(&mut field, "9");
        assert_eq!(field.value(), "12/9");
    }

    #[test]
    fn elapsed_date_is_invalid_but_complete() {
        let mut field = ExpiryDateField::new();
        type_into(&mut field, "1216");

        assert_eq!(field.value(), "12/16");
        assert_eq!(field.validity(), Validity::Invalid);
        assert_eq!(field.month(), Some(12));
        assert_eq!(field.full_year(), Some(2016));
    }
}
