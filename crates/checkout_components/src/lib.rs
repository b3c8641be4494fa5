//! Payment method components for the checkout SDK.
//!
//! A component turns shopper keystrokes into a submittable payment request in
//! three layers:
//!
//! - [`fields`] hosts the interactive input fields. Each field owns its text
//!   buffer, rewrites every edit into canonical shape (card number grouping,
//!   expiry auto-slash, IBAN uppercasing) and reports its readiness.
//! - [`validator`] aggregates per-field readiness into a single flag, which
//!   drives the submit control.
//! - [`component`] defines the [`PaymentComponent`] contract: raw input data
//!   in, validated output data out, and a [`PaymentComponentState`] carrying
//!   the wire payment method once every field is valid.
//!
//! [`card`], [`sepa`] and [`afterpay`] implement the contract for the
//! individual payment methods, and [`logo`] resolves payment method logo URLs
//! with a bounded in-memory cache.

pub mod afterpay;
pub mod card;
pub mod component;
pub mod errors;
pub mod fields;
pub mod logo;
pub mod sepa;
pub mod validator;

pub use component::{PaymentComponent, PaymentComponentState};
pub use errors::ComponentError;
pub use validator::InputValidator;
