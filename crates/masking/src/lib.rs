#![forbid(unsafe_code)]
#![warn(missing_docs)]

//!
//! Wrapper types and traits for keeping sensitive checkout data (card numbers,
//! security codes, shopper details) out of logs and debug output, and for wiping
//! secrets from memory when dropped. Secret-keeping library inspired by secrecy.
//!

pub use zeroize::{self, DefaultIsZeroes, Zeroize as ZeroizableSecret};

mod strategy;

pub use strategy::{Strategy, WithType, WithoutType};

mod abs;
pub use abs::{ExposeInterface, ExposeOptionInterface, PeekInterface};

mod secret;
mod strong_secret;
pub use secret::Secret;
pub use strong_secret::{StrongEq, StrongSecret};

#[cfg(feature = "serde")]
mod serde;
#[cfg(feature = "serde")]
pub use crate::serde::SerializableSecret;

/// This module should be included with asterisk.
///
/// `use checkout_masking::prelude::*;`
///
pub mod prelude {
    pub use super::{ExposeInterface, ExposeOptionInterface, PeekInterface};
}
