//! Commonly used constants

/// Maximum number of characters an email address may contain.
pub const EMAIL_MAX_LENGTH: usize = 319;

/// Fewest digits a telephone number may contain.
pub const PHONE_NUMBER_MIN_DIGITS: usize = 4;

/// Most digits a telephone number may contain.
pub const PHONE_NUMBER_MAX_DIGITS: usize = 20;
