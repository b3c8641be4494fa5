//! Personal Identifiable Information protection.

use std::{convert::AsRef, fmt, ops, str::FromStr};

use error_stack::{report, ResultExt};
use masking::{ExposeInterface, Secret, Strategy, WithType};

use crate::{
    errors::{self, ValidationError},
    validation::{phone_validity, validate_email},
};

/// Strategy for masking a PhoneNumber
#[derive(Debug)]
pub enum PhoneNumberStrategy {}

impl<T> Strategy<T> for PhoneNumberStrategy
where
    T: AsRef<str> + fmt::Debug,
{
    fn fmt(val: &T, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let val_str: &str = val.as_ref();

        // masks everything but the last 4 digits
        match val_str
            .len()
            .checked_sub(4)
            .and_then(|masked_len| val_str.get(masked_len..).map(|tail| (masked_len, tail)))
        {
            Some((masked_len, tail)) => write!(f, "{}{}", "*".repeat(masked_len), tail),
            None => WithType::fmt(val, f),
        }
    }
}

/// Phone number
#[derive(Debug, Clone, serde::Deserialize, serde::Serialize, PartialEq, Eq)]
#[serde(try_from = "String")]
pub struct PhoneNumber(Secret<String, PhoneNumberStrategy>);

impl FromStr for PhoneNumber {
    type Err = error_stack::Report<ValidationError>;

    fn from_str(phone_number: &str) -> Result<Self, Self::Err> {
        if !phone_validity(phone_number, true).is_valid() {
            return Err(report!(ValidationError::InvalidValue {
                message: format!("Invalid phone number: {phone_number}"),
            }));
        }
        let secret = Secret::<String, PhoneNumberStrategy>::new(phone_number.trim().to_string());
        Ok(Self(secret))
    }
}

impl TryFrom<String> for PhoneNumber {
    type Error = error_stack::Report<errors::ParsingError>;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_str(&value).change_context(errors::ParsingError::PhoneNumberParsingError)
    }
}

impl ops::Deref for PhoneNumber {
    type Target = Secret<String, PhoneNumberStrategy>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl ops::DerefMut for PhoneNumber {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl ExposeInterface<Secret<String, PhoneNumberStrategy>> for PhoneNumber {
    fn expose(self) -> Secret<String, PhoneNumberStrategy> {
        self.0
    }
}

/// Strategy for masking Email
#[derive(Debug)]
pub enum EmailStrategy {}

impl<T> Strategy<T> for EmailStrategy
where
    T: AsRef<str> + fmt::Debug,
{
    fn fmt(val: &T, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let val_str: &str = val.as_ref();
        match val_str.split_once('@') {
            Some((a, b)) => write!(f, "{}@{}", "*".repeat(a.len()), b),
            None => WithType::fmt(val, f),
        }
    }
}

/// Email address
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(try_from = "String")]
pub struct Email(Secret<String, EmailStrategy>);

impl ExposeInterface<Secret<String, EmailStrategy>> for Email {
    fn expose(self) -> Secret<String, EmailStrategy> {
        self.0
    }
}

impl TryFrom<String> for Email {
    type Error = error_stack::Report<errors::ParsingError>;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_str(&value).change_context(errors::ParsingError::EmailParsingError)
    }
}

impl ops::Deref for Email {
    type Target = Secret<String, EmailStrategy>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl ops::DerefMut for Email {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl FromStr for Email {
    type Err = error_stack::Report<ValidationError>;

    fn from_str(email: &str) -> Result<Self, Self::Err> {
        match validate_email(email) {
            Ok(()) => {
                let secret = Secret::<String, EmailStrategy>::new(email.to_string());
                Ok(Self(secret))
            }
            Err(_) => Err(report!(ValidationError::InvalidValue {
                message: "Invalid email address format".into()
            })),
        }
    }
}
