//! Custom validations for some shared types.

#![deny(clippy::invalid_regex)]

use std::sync::LazyLock;

use error_stack::report;
use regex::Regex;

use crate::{
    consts,
    errors::{CustomResult, ValidationError},
};

/// How complete a single field value is while the shopper is typing.
///
/// `Partial` marks input that is incomplete but could still grow into valid
/// input; `Invalid` marks input no further typing can repair. Only `Valid`
/// fields may be submitted.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Validity {
    /// Content passes every check and may be submitted.
    Valid,
    /// Content is incomplete but not (yet) wrong.
    #[default]
    Partial,
    /// Content cannot become valid by appending characters.
    Invalid,
}

impl Validity {
    /// Whether this state permits submission.
    pub const fn is_valid(self) -> bool {
        matches!(self, Self::Valid)
    }
}

/// A field value together with the verdict reached on it.
///
/// Validation outcomes are data, not errors: the entered value is always kept
/// so the caller can re-render it unchanged.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ValidatedField<T> {
    /// The (possibly cleaned up) field value.
    pub value: T,
    /// Verdict on `value`.
    pub validity: Validity,
}

impl<T> ValidatedField<T> {
    /// Wrap `value` with an explicit verdict.
    pub const fn new(value: T, validity: Validity) -> Self {
        Self { value, validity }
    }

    /// Wrap a value that passed validation.
    pub const fn valid(value: T) -> Self {
        Self::new(value, Validity::Valid)
    }

    /// Wrap a value that is incomplete but not wrong.
    pub const fn partial(value: T) -> Self {
        Self::new(value, Validity::Partial)
    }

    /// Wrap a value that failed validation.
    pub const fn invalid(value: T) -> Self {
        Self::new(value, Validity::Invalid)
    }

    /// Verdict from a boolean check, for fields that are never terminally
    /// wrong: anything failing the check counts as still in progress.
    pub fn from_check(value: T, passes: bool) -> Self {
        if passes {
            Self::valid(value)
        } else {
            Self::partial(value)
        }
    }

    /// Whether this field permits submission.
    pub const fn is_valid(&self) -> bool {
        self.validity.is_valid()
    }
}

/// Performs a simple validation against a provided email address.
pub fn validate_email(email: &str) -> CustomResult<(), ValidationError> {
    #[deny(clippy::invalid_regex)]
    static EMAIL_REGEX: LazyLock<Option<Regex>> = LazyLock::new(|| {
        match Regex::new(
            r"^(?i)[a-z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?(?:\.[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?)+$",
        ) {
            Ok(regex) => Some(regex),
            Err(error) => {
                tracing::error!(?error);
                None
            }
        }
    });
    let email_regex = match EMAIL_REGEX.as_ref() {
        Some(regex) => Ok(regex),
        None => Err(report!(ValidationError::InvalidValue {
            message: "Invalid regex expression".into()
        })),
    }?;

    if email.is_empty() || email.chars().count() > consts::EMAIL_MAX_LENGTH {
        return Err(report!(ValidationError::InvalidValue {
            message: "Email address is either empty or exceeds maximum allowed length".into()
        }));
    }

    if !email_regex.is_match(email) {
        return Err(report!(ValidationError::InvalidValue {
            message: "Invalid email address format".into()
        }));
    }

    Ok(())
}

/// Grades a telephone number while it is being typed.
///
/// The check is deliberately permissive (an optional leading `+` followed by
/// four to twenty digits): hosted fields accept numbers from any region, so
/// anything stricter belongs server side. A digit run shorter than the
/// minimum is still in progress; an empty value is acceptable only when the
/// field is optional.
pub fn phone_validity(phone_number: &str, required: bool) -> Validity {
    #[deny(clippy::invalid_regex)]
    static PHONE_REGEX: LazyLock<Option<Regex>> = LazyLock::new(|| {
        match Regex::new(&format!(
            r"^\+?[0-9]{{{},{}}}$",
            consts::PHONE_NUMBER_MIN_DIGITS,
            consts::PHONE_NUMBER_MAX_DIGITS
        )) {
            Ok(regex) => Some(regex),
            Err(error) => {
                tracing::error!(?error);
                None
            }
        }
    });

    let trimmed = phone_number.trim();
    if trimmed.is_empty() {
        return if required {
            Validity::Partial
        } else {
            Validity::Valid
        };
    }
    let Some(phone_regex) = PHONE_REGEX.as_ref() else {
        return Validity::Invalid;
    };
    if phone_regex.is_match(trimmed) {
        return Validity::Valid;
    }

    let digits = trimmed.strip_prefix('+').unwrap_or(trimmed);
    if digits.len() < consts::PHONE_NUMBER_MIN_DIGITS && digits.chars().all(|c| c.is_ascii_digit())
    {
        Validity::Partial
    } else {
        Validity::Invalid
    }
}
