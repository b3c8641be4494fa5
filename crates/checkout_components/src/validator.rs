//! Readiness aggregation across input fields.

use std::fmt;

/// Identifies one field registered with an [`InputValidator`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FieldHandle(usize);

/// Collects per-field readiness and exposes the conjunction.
///
/// Fields register once, then report ready or not ready as their content
/// changes. Reports are keyed by handle and the last report per field wins,
/// so a field may report the same value repeatedly without side effects. The
/// aggregate is recomputed from the full field set on every report and the
/// listener fires only when the aggregate actually flips.
pub struct InputValidator {
    fields: Vec<bool>,
    ready: bool,
    listener: Option<Box<dyn FnMut(bool)>>,
}

impl InputValidator {
    /// Creates a validator with no registered fields.
    pub fn new() -> Self {
        Self {
            fields: Vec::new(),
            ready: true,
            listener: None,
        }
    }

    /// Registers a field, initially not ready, and returns its handle.
    pub fn register(&mut self) -> FieldHandle {
        let handle = FieldHandle(self.fields.len());
        self.fields.push(false);
        self.recompute();
        handle
    }

    /// Records the latest readiness of the field behind `handle`.
    pub fn report(&mut self, handle: FieldHandle, ready: bool) {
        if let Some(field) = self.fields.get_mut(handle.0) {
            *field = ready;
        }
        self.recompute();
    }

    /// Whether every registered field is currently ready.
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Installs the listener invoked on every aggregate transition. No
    /// notification is emitted for the current value.
    pub fn set_listener(&mut self, listener: impl FnMut(bool) + 'static) {
        self.listener = Some(Box::new(listener));
    }

    fn recompute(&mut self) {
        let ready = self.fields.iter().all(|field| *field);
        if ready != self.ready {
            self.ready = ready;
            if let Some(listener) = self.listener.as_mut() {
                listener(ready);
            }
        }
    }
}

impl Default for InputValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for InputValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputValidator")
            .field("fields", &self.fields)
            .field("ready", &self.ready)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::{cell::RefCell, rc::Rc};

    use super::*;

    #[test]
    fn becomes_ready_once_every_field_reports_ready() {
        let mut validator = InputValidator::new();
        let number = validator.register();
        let expiry = validator.register();
        assert!(!validator.is_ready());

        validator.report(number, true);
        assert!(!validator.is_ready());

        validator.report(expiry, true);
        assert!(validator.is_ready());

        validator.report(number, false);
        assert!(!validator.is_ready());
    }

    #[test]
    fn last_report_per_field_wins() {
        let mut validator = InputValidator::new();
        let field = validator.register();

        validator.report(field, true);
        validator.report(field, false);
        validator.report(field, true);
        assert!(validator.is_ready());
    }

    #[test]
    fn registering_a_field_drops_readiness_until_it_reports() {
        let mut validator = InputValidator::new();
        let first = validator.register();
        validator.report(first, true);
        assert!(validator.is_ready());

        let second = validator.register();
        assert!(!validator.is_ready());

        validator.report(second, true);
        assert!(validator.is_ready());
    }

    #[test]
    fn listener_fires_only_on_transitions() {
        let transitions = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&transitions);

        let mut validator = InputValidator::new();
        let number = validator.register();
        let expiry = validator.register();
        validator.set_listener(move |ready| log.borrow_mut().push(ready));

        validator.report(number, true);
        validator.report(number, true);
        validator.report(expiry, true);
        validator.report(expiry, true);
        validator.report(number, false);
        assert_eq!(*transitions.borrow(), vec![true, false]);
    }
}
