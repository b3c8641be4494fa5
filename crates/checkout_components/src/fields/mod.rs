//! Interactive input fields.
//!
//! Every field owns a [`TextInput`] buffer and rewrites each incoming
//! [`Edit`] into canonical shape before committing it: the card number field
//! regroups digits in blocks of four, the expiry field auto-inserts the
//! slash and zero-pads the month, the CVC field drops anything that is not a
//! digit and the IBAN field uppercases as the shopper types. Fields report
//! readiness and focus hints through owned callbacks; hosts wire those to an
//! [`InputValidator`](crate::validator::InputValidator) and to their widgets.

pub mod card_number;
pub mod cvc;
pub mod expiry_date;
pub mod iban;
mod text_input;

pub use card_number::CardNumberField;
pub use cvc::CvcField;
pub use expiry_date::ExpiryDateField;
pub use iban::IbanField;
pub use text_input::{Edit, TextInput};
