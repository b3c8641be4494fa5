use std::{cmp::Ordering, fmt, ops::Deref, str::FromStr};

use common_utils::{date_time, validation::Validity};
use masking::{Strategy, StrongSecret, WithType};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use time::Date;

use crate::{brand, brand::CardBrand, CardExpiration};

/// Shortest number any supported network issues.
pub const NUMBER_MINIMUM_LENGTH: usize = 8;
/// Longest number any supported network issues.
pub const NUMBER_MAXIMUM_LENGTH: usize = 19;

#[derive(Debug, Deserialize, Serialize, Error)]
#[error("not a valid credit card number")]
pub struct CCValError;

impl From<core::convert::Infallible> for CCValError {
    fn from(_: core::convert::Infallible) -> Self {
        Self
    }
}

/// Card number
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct CardNumber(StrongSecret<String, CardNumberStrategy>);

impl FromStr for CardNumber {
    type Err = CCValError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let number: String = s.split_whitespace().collect();
        if number.chars().all(|character| character.is_ascii_digit())
            && (NUMBER_MINIMUM_LENGTH..=NUMBER_MAXIMUM_LENGTH).contains(&number.len())
            && luhn(&number)
        {
            Ok(Self(StrongSecret::from_str(&number)?))
        } else {
            Err(CCValError)
        }
    }
}

impl TryFrom<String> for CardNumber {
    type Error = CCValError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_str(&value)
    }
}

impl Deref for CardNumber {
    type Target = StrongSecret<String, CardNumberStrategy>;

    fn deref(&self) -> &StrongSecret<String, CardNumberStrategy> {
        &self.0
    }
}

impl<'de> Deserialize<'de> for CardNumber {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let s = String::deserialize(d)?;
        Self::from_str(&s).map_err(serde::de::Error::custom)
    }
}

pub enum CardNumberStrategy {}

impl<T> Strategy<T> for CardNumberStrategy
where
    T: AsRef<str>,
{
    fn fmt(val: &T, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let val_str: &str = val.as_ref();

        if val_str.len() < 15 || val_str.len() > 19 {
            return WithType::fmt(val, f);
        }

        if let Some(value) = val_str.get(..6) {
            write!(f, "{}{}", value, "*".repeat(val_str.len() - 6))
        } else {
            tracing::error!("invalid card number length");
            WithType::fmt(val, f)
        }
    }
}

/// Mod-10 checksum over the digits of `number`, doubling every second digit
/// from the right. Whitespace is ignored; any other non-digit character fails
/// the check, as does an empty value.
pub fn luhn(number: &str) -> bool {
    let mut s1: u32 = 0;
    let mut s2: u32 = 0;
    let mut digits: usize = 0;
    for (position, character) in number
        .chars()
        .filter(|character| !character.is_whitespace())
        .rev()
        .enumerate()
    {
        let Some(digit) = character.to_digit(10) else {
            return false;
        };
        if position % 2 == 0 {
            s1 += digit;
        } else {
            let doubled = digit * 2;
            s2 += if doubled > 9 { doubled - 9 } else { doubled };
        }
        digits += 1;
    }
    digits > 0 && (s1 + s2) % 10 == 0
}

/// Outcome of grading a number mid-entry: how far along the value is, the
/// brand resolved from its leading digits and the digits with separators
/// stripped.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NumberValidation {
    pub validity: Validity,
    pub brand: Option<CardBrand>,
    pub normalized: String,
}

/// Grades a card number as typed, restricted to the `allowed` brands.
///
/// Characters other than digits and whitespace make the value `Invalid`
/// outright. Otherwise the digit count decides: over 19 can never become a
/// card number, under 8 is still being typed, and in between the value is
/// `Valid` once the checksum passes at a length the resolved brand issues.
/// A complete number that still fails, or one no supported brand claims by
/// the time it can no longer grow, is `Invalid`.
pub fn validate_card_number(number: &str, allowed: &[CardBrand]) -> NumberValidation {
    let mut normalized = String::with_capacity(number.len());
    for character in number.chars() {
        if character.is_ascii_digit() {
            normalized.push(character);
        } else if !character.is_whitespace() {
            let brand = brand::detect(&normalized, allowed);
            return NumberValidation {
                validity: Validity::Invalid,
                brand,
                normalized,
            };
        }
    }

    let brand = brand::detect(&normalized, allowed);
    let length = normalized.len();
    let validity = if length > NUMBER_MAXIMUM_LENGTH {
        Validity::Invalid
    } else if length < NUMBER_MINIMUM_LENGTH {
        Validity::Partial
    } else {
        match brand {
            Some(brand) => {
                if luhn(&normalized) && brand.number_lengths().contains(&length) {
                    Validity::Valid
                } else if brand
                    .number_lengths()
                    .last()
                    .is_some_and(|longest| length >= *longest)
                {
                    Validity::Invalid
                } else {
                    Validity::Partial
                }
            }
            None => {
                if length >= NUMBER_MAXIMUM_LENGTH {
                    Validity::Invalid
                } else {
                    Validity::Partial
                }
            }
        }
    };

    NumberValidation {
        validity,
        brand,
        normalized,
    }
}

/// Outcome of grading an expiry date entry. `expiry` is populated whenever
/// the value parses as a complete `MM/YY` date, accepted or not.
#[derive(Clone, Debug)]
pub struct ExpiryDateValidation {
    pub validity: Validity,
    pub expiry: Option<CardExpiration>,
}

/// Grades an expiry date as typed against the current date.
pub fn validate_expiry_date(date: &str) -> ExpiryDateValidation {
    validate_expiry_date_on(date, date_time::now().date())
}

/// Grades an expiry date as typed, `MM/YY` with the slash at index 2.
///
/// A proper prefix of a plausible date is `Partial`; anything the format can
/// never reach (month 13, a second slash, a sixth character) is `Invalid`.
/// Complete dates are accepted up to three months in the past and without an
/// upper bound, measured against `today`.
pub fn validate_expiry_date_on(date: &str, today: Date) -> ExpiryDateValidation {
    let value = date.trim();
    let mut month: u32 = 0;
    let mut year: u32 = 0;
    for (position, character) in value.chars().enumerate() {
        let digit = character.to_digit(10).unwrap_or_default();
        match (position, character) {
            (0, '0' | '1') => month = digit,
            (1, '0'..='9') => {
                month = month * 10 + digit;
                if !(1..=12).contains(&month) {
                    return ExpiryDateValidation {
                        validity: Validity::Invalid,
                        expiry: None,
                    };
                }
            }
            (2, '/') => {}
            (3 | 4, '0'..='9') => year = year * 10 + digit,
            _ => {
                return ExpiryDateValidation {
                    validity: Validity::Invalid,
                    expiry: None,
                }
            }
        }
    }

    if value.len() < 5 {
        return ExpiryDateValidation {
            validity: Validity::Partial,
            expiry: None,
        };
    }

    let expiry = match (u8::try_from(month), u16::try_from(2000 + year)) {
        (Ok(month), Ok(year)) => CardExpiration::try_from((month, year)).ok(),
        _ => None,
    };
    match expiry {
        Some(expiry) => {
            let validity = if expiry.is_accepted_on(today) {
                Validity::Valid
            } else {
                Validity::Invalid
            };
            ExpiryDateValidation {
                validity,
                expiry: Some(expiry),
            }
        }
        None => ExpiryDateValidation {
            validity: Validity::Invalid,
            expiry: None,
        },
    }
}

/// Grades a security code against the brand's expected length, three digits
/// unless the brand says otherwise. Empty stays `Partial` so an untouched
/// field does not flag red.
pub fn validate_security_code(code: &str, brand: Option<CardBrand>) -> Validity {
    let value = code.trim();
    if value.is_empty() {
        return Validity::Partial;
    }
    if !value.chars().all(|character| character.is_ascii_digit()) {
        return Validity::Invalid;
    }
    let required = brand.map_or(3, CardBrand::security_code_length);
    match value.len().cmp(&required) {
        Ordering::Less => Validity::Partial,
        Ordering::Equal => Validity::Valid,
        Ordering::Greater => Validity::Invalid,
    }
}

/// Grades a cardholder name: any non-blank value passes, and a blank one only
/// fails when the merchant requires the name.
pub fn validate_holder_name(name: &str, required: bool) -> Validity {
    if name.trim().is_empty() && required {
        Validity::Invalid
    } else {
        Validity::Valid
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use masking::{PeekInterface, Secret};
    use proptest::prelude::*;
    use test_case::test_case;
    use time::macros::date;

    use super::*;

    #[test]
    fn valid_card_number() {
        let s = "371449635398431";
        assert_eq!(
            CardNumber::from_str(s).unwrap(),
            CardNumber(StrongSecret::from_str(s).unwrap())
        );
    }

    #[test]
    fn invalid_card_number() {
        let s = "371446431";
        assert_eq!(
            CardNumber::from_str(s).unwrap_err().to_string(),
            "not a valid credit card number".to_string()
        );
    }

    #[test]
    fn card_number_no_whitespace() {
        let s = "3714    4963  5398 431";
        assert_eq!(
            CardNumber::from_str(s).unwrap().to_string(),
            "371449*********"
        );
    }

    #[test]
    fn card_number_rejects_letters() {
        assert!(CardNumber::from_str("37144963539843a").is_err());
    }

    #[test]
    fn card_number_rejects_short_values() {
        // Luhn-valid but below the shortest issued length.
        assert!(CardNumber::from_str("4111118").is_err());
    }

    #[test]
    fn test_valid_card_number_masking() {
        let secret: Secret<String, CardNumberStrategy> =
            Secret::new("1234567890987654".to_string());
        assert_eq!("123456**********", format!("{secret:?}"));
    }

    #[test]
    fn test_invalid_card_number_masking() {
        let secret: Secret<String, CardNumberStrategy> = Secret::new("1234567890".to_string());
        assert_eq!("*** alloc::string::String ***", format!("{secret:?}"));
    }

    #[test]
    fn test_valid_card_number_strong_secret_masking() {
        let card_number = CardNumber::from_str("3714 4963 5398 431").unwrap();
        let secret = &(*card_number);
        assert_eq!("371449*********", format!("{secret:?}"));
    }

    #[test]
    fn test_valid_card_number_deserialization() {
        let card_number = serde_json::from_str::<CardNumber>(r#""3714 4963 5398 431""#).unwrap();
        let secret = card_number.to_string();
        assert_eq!(r#""371449*********""#, format!("{secret:?}"));
    }

    #[test]
    fn test_invalid_card_number_deserialization() {
        let card_number = serde_json::from_str::<CardNumber>(r#""1234 5678""#);
        let error_msg = card_number.unwrap_err().to_string();
        assert_eq!(error_msg, "not a valid credit card number".to_string());
    }

    #[test_case("4111111111111111" => true; "sixteen digit visa")]
    #[test_case("4111 1111 1111 1111" => true; "spaces are ignored")]
    #[test_case("371449635398431" => true; "fifteen digit amex")]
    #[test_case("4111111111111112" => false; "wrong check digit")]
    #[test_case("" => false; "empty value")]
    #[test_case("   " => false; "only spaces")]
    #[test_case("4111a11111111111" => false; "letters fail")]
    fn luhn_grid(number: &str) -> bool {
        luhn(number)
    }

    proptest! {
        /// Doubling-with-casting-out-nines maps each digit to a distinct
        /// residue, so changing any single digit must break the checksum.
        #[test]
        fn luhn_rejects_any_single_digit_flip(
            body in proptest::collection::vec(0u32..10, 7..19),
            position in any::<proptest::sample::Index>(),
            offset in 1u32..10,
        ) {
            let body: String = body.iter().map(ToString::to_string).collect();
            let check = (0..10)
                .find(|check| luhn(&format!("{body}{check}")))
                .unwrap();
            let number = format!("{body}{check}");

            let flip = position.index(number.len());
            let flipped: String = number
                .chars()
                .enumerate()
                .map(|(index, character)| {
                    if index == flip {
                        let digit = character.to_digit(10).unwrap();
                        char::from_digit((digit + offset) % 10, 10).unwrap()
                    } else {
                        character
                    }
                })
                .collect();

            prop_assert!(luhn(&number));
            prop_assert!(!luhn(&flipped));
        }
    }

    const BRANDS: &[CardBrand] = &[
        CardBrand::Amex,
        CardBrand::Mc,
        CardBrand::Visa,
    ];

    #[test_case("4111111111111111" => Validity::Valid; "complete visa")]
    #[test_case("4111 1111 1111 1111" => Validity::Valid; "complete visa with spaces")]
    #[test_case("4111111111111111110" => Validity::Valid; "nineteen digit visa")]
    #[test_case("41111111111111111100" => Validity::Invalid; "twenty digits cannot be a card")]
    #[test_case("4111 1111" => Validity::Partial; "checksum fails but more digits may come")]
    #[test_case("4111" => Validity::Partial; "below minimum length")]
    #[test_case("" => Validity::Partial; "empty value")]
    #[test_case("411x1111" => Validity::Invalid; "letters are never part of a number")]
    #[test_case("4111111111111111111" => Validity::Invalid; "complete visa failing the checksum")]
    #[test_case("371449635398431" => Validity::Valid; "complete amex")]
    #[test_case("37144963539843" => Validity::Partial; "amex one digit short")]
    #[test_case("3714496353984310" => Validity::Partial; "amex overrun loses its brand")]
    #[test_case("9999999999999999999" => Validity::Invalid; "unsupported prefix at full length")]
    #[test_case("99999999" => Validity::Partial; "unsupported prefix while short")]
    #[test_case("5500005555555559" => Validity::Valid; "complete mastercard")]
    #[test_case("5500005555555550" => Validity::Invalid; "complete mastercard failing the checksum")]
    fn card_number_grading(number: &str) -> Validity {
        validate_card_number(number, BRANDS).validity
    }

    #[test]
    fn card_number_grading_reports_brand_and_digits() {
        let validation = validate_card_number("4111 1111 1111 1111", BRANDS);
        assert_eq!(validation.brand, Some(CardBrand::Visa));
        assert_eq!(validation.normalized, "4111111111111111");
    }

    #[test]
    fn card_number_grading_without_support_stays_partial() {
        // Only completion can rule the number out when no brand claims it.
        let validation = validate_card_number("5500005555555559", &[CardBrand::Visa]);
        assert_eq!(validation.validity, Validity::Partial);
        assert_eq!(validation.brand, None);
    }

    #[test_case("03/24" => Validity::Valid; "current month")]
    #[test_case("12/23" => Validity::Valid; "exactly three months past")]
    #[test_case("11/23" => Validity::Invalid; "four months past")]
    #[test_case("08/30" => Validity::Valid; "years ahead")]
    #[test_case("12/99" => Validity::Valid; "no upper bound")]
    #[test_case("" => Validity::Partial; "empty value")]
    #[test_case("0" => Validity::Partial; "first month digit")]
    #[test_case("03" => Validity::Partial; "month only")]
    #[test_case("03/" => Validity::Partial; "month and slash")]
    #[test_case("03/3" => Validity::Partial; "one year digit")]
    #[test_case("2" => Validity::Invalid; "unpadded month")]
    #[test_case("13" => Validity::Invalid; "month thirteen")]
    #[test_case("00/25" => Validity::Invalid; "month zero")]
    #[test_case("03-24" => Validity::Invalid; "wrong separator")]
    #[test_case("03/245" => Validity::Invalid; "sixth character")]
    #[test_case("aa/bb" => Validity::Invalid; "not digits")]
    fn expiry_date_grading(raw: &str) -> Validity {
        validate_expiry_date_on(raw, date!(2024 - 03 - 15)).validity
    }

    #[test]
    fn expiry_date_grading_parses_the_date() {
        let validation = validate_expiry_date_on("09/30", date!(2024 - 03 - 15));
        let expiry = validation.expiry.unwrap();
        assert_eq!(*expiry.get_month().peek().peek(), 9);
        assert_eq!(*expiry.get_year().peek().peek(), 2030);
    }

    #[test]
    fn expiry_date_grading_keeps_rejected_dates() {
        let validation = validate_expiry_date_on("01/20", date!(2024 - 03 - 15));
        assert_eq!(validation.validity, Validity::Invalid);
        assert!(validation.expiry.is_some());
    }

    #[test_case("737", Some(CardBrand::Visa) => Validity::Valid; "three digits")]
    #[test_case("7373", Some(CardBrand::Amex) => Validity::Valid; "four digits for amex")]
    #[test_case("737", Some(CardBrand::Amex) => Validity::Partial; "amex needs one more")]
    #[test_case("7373", Some(CardBrand::Visa) => Validity::Invalid; "too long")]
    #[test_case("73", None => Validity::Partial; "short without a brand")]
    #[test_case("737", None => Validity::Valid; "three digits without a brand")]
    #[test_case("", Some(CardBrand::Visa) => Validity::Partial; "empty value")]
    #[test_case("73a", None => Validity::Invalid; "letters fail")]
    fn security_code_grading(code: &str, brand: Option<CardBrand>) -> Validity {
        validate_security_code(code, brand)
    }

    #[test_case("J. Doe", true => Validity::Valid; "present and required")]
    #[test_case("", false => Validity::Valid; "absent and optional")]
    #[test_case("", true => Validity::Invalid; "absent but required")]
    #[test_case("   ", true => Validity::Invalid; "blank but required")]
    fn holder_name_grading(name: &str, required: bool) -> Validity {
        validate_holder_name(name, required)
    }
}
