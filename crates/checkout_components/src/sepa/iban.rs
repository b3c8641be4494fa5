//! International Bank Account Number parsing and validation.
//!
//! Account numbers are validated against a per-country registry, based on
//! the ECB SEPA country list and the Wikipedia Single Euro Payments Area
//! article. Each entry carries the segment layout of the national format,
//! its exact length and whether the country participates in SEPA. Walking
//! the segments instead of a compiled regex lets a prefix be distinguished
//! from a mismatch, which drives the partial-input handling in the entry
//! field.

use std::fmt;

use Segment::{AlphaNum, Digits, Letters, Literal};

const BLOCK_SIZE: usize = 4;
const COUNTRY_CODE_LENGTH: usize = 2;
const CHECK_DIGITS_END: usize = 4;
/// Zero padding repairs at most this many missing digits.
const MAX_MISSING_ZEROS: usize = 3;
const MASK_EDGE: usize = 4;

/// One run of characters within a national IBAN layout.
#[derive(Clone, Copy, Debug)]
enum Segment {
    /// Exact characters, such as the country code.
    Literal(&'static str),
    /// A run of `0-9`.
    Digits(usize),
    /// A run of `A-Z`.
    Letters(usize),
    /// A run of `0-9A-Z`.
    AlphaNum(usize),
}

#[derive(Clone, Copy, Debug)]
struct Details {
    /// Alternative layouts; a value matches the country when any fits.
    layouts: &'static [&'static [Segment]],
    length: usize,
    sepa: bool,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Walk {
    /// Every segment matched and the input is exactly consumed.
    Complete,
    /// The input ran out mid-layout while matching, so more input could
    /// still complete it.
    Exhausted,
    /// A character contradicts the layout.
    Mismatch,
    /// Input continues past the end of the layout.
    Overrun,
}

impl Details {
    const fn new(layouts: &'static [&'static [Segment]], length: usize, sepa: bool) -> Self {
        Self {
            layouts,
            length,
            sepa,
        }
    }

    fn is_full_match(&self, value: &str) -> bool {
        value.chars().count() == self.length
            && self
                .layouts
                .iter()
                .any(|layout| walk(layout, value) == Walk::Complete)
    }

    fn is_potential_match_with_more_input(&self, value: &str) -> bool {
        self.length > value.chars().count()
            && self
                .layouts
                .iter()
                .any(|layout| walk(layout, value) == Walk::Exhausted)
    }
}

fn walk(layout: &[Segment], value: &str) -> Walk {
    let mut chars = value.chars();
    for segment in layout {
        match segment {
            Literal(text) => {
                for expected in text.chars() {
                    match chars.next() {
                        None => return Walk::Exhausted,
                        Some(c) if c == expected => {}
                        Some(_) => return Walk::Mismatch,
                    }
                }
            }
            Digits(count) => {
                for _ in 0..*count {
                    match chars.next() {
                        None => return Walk::Exhausted,
                        Some(c) if c.is_ascii_digit() => {}
                        Some(_) => return Walk::Mismatch,
                    }
                }
            }
            Letters(count) => {
                for _ in 0..*count {
                    match chars.next() {
                        None => return Walk::Exhausted,
                        Some(c) if c.is_ascii_uppercase() => {}
                        Some(_) => return Walk::Mismatch,
                    }
                }
            }
            AlphaNum(count) => {
                for _ in 0..*count {
                    match chars.next() {
                        None => return Walk::Exhausted,
                        Some(c) if c.is_ascii_digit() || c.is_ascii_uppercase() => {}
                        Some(_) => return Walk::Mismatch,
                    }
                }
            }
        }
    }
    if chars.next().is_some() {
        Walk::Overrun
    } else {
        Walk::Complete
    }
}

/// Registry keyed by country code, in sorted order for binary search.
const COUNTRY_DETAILS: &[(&str, Details)] = &[
    ("AD", Details::new(&[&[Literal("AD"), Digits(10), AlphaNum(12)]], 24, false)),
    ("AE", Details::new(&[&[Literal("AE"), Digits(21)]], 23, false)),
    ("AL", Details::new(&[&[Literal("AL"), Digits(10), AlphaNum(16)]], 28, false)),
    ("AT", Details::new(&[&[Literal("AT"), Digits(18)]], 20, true)),
    ("BA", Details::new(&[&[Literal("BA"), Digits(18)]], 20, false)),
    ("BE", Details::new(&[&[Literal("BE"), Digits(14)]], 16, true)),
    (
        "BG",
        Details::new(&[&[Literal("BG"), Digits(2), Letters(4), Digits(6), AlphaNum(8)]], 22, true),
    ),
    ("BH", Details::new(&[&[Literal("BH"), Digits(2), Letters(4), AlphaNum(14)]], 22, false)),
    ("CH", Details::new(&[&[Literal("CH"), Digits(7), AlphaNum(12)]], 21, true)),
    ("CY", Details::new(&[&[Literal("CY"), Digits(10), AlphaNum(16)]], 21, true)),
    ("CZ", Details::new(&[&[Literal("CZ"), Digits(22)]], 24, true)),
    ("DE", Details::new(&[&[Literal("DE"), Digits(20)]], 22, true)),
    (
        "DK",
        Details::new(
            &[
                &[Literal("DK"), Digits(16)],
                &[Literal("FO"), Digits(16)],
                &[Literal("GL"), Digits(16)],
            ],
            18,
            true,
        ),
    ),
    ("DO", Details::new(&[&[Literal("DO"), Digits(2), AlphaNum(4), Digits(20)]], 28, false)),
    ("EE", Details::new(&[&[Literal("EE"), Digits(18)]], 20, true)),
    ("ES", Details::new(&[&[Literal("ES"), Digits(22)]], 24, true)),
    ("FI", Details::new(&[&[Literal("FI"), Digits(16)]], 18, true)),
    ("FR", Details::new(&[&[Literal("FR"), Digits(12), AlphaNum(11), Digits(2)]], 27, true)),
    ("GB", Details::new(&[&[Literal("GB"), Digits(2), Letters(4), Digits(14)]], 22, true)),
    ("GE", Details::new(&[&[Literal("GE"), Digits(2), Letters(2), Digits(16)]], 22, false)),
    ("GI", Details::new(&[&[Literal("GI"), Digits(2), Letters(4), AlphaNum(15)]], 23, false)),
    ("GR", Details::new(&[&[Literal("GR"), Digits(9), AlphaNum(16)]], 27, true)),
    ("HR", Details::new(&[&[Literal("HR"), Digits(19)]], 21, true)),
    ("HU", Details::new(&[&[Literal("HU"), Digits(26)]], 28, true)),
    ("IE", Details::new(&[&[Literal("IE"), Digits(2), Letters(4), Digits(14)]], 22, true)),
    ("IL", Details::new(&[&[Literal("IL"), Digits(21)]], 23, false)),
    ("IS", Details::new(&[&[Literal("IS"), Digits(24)]], 26, true)),
    (
        "IT",
        Details::new(&[&[Literal("IT"), Digits(2), Letters(1), Digits(10), AlphaNum(12)]], 27, true),
    ),
    ("KW", Details::new(&[&[Literal("KW"), Digits(2), Letters(4), Literal("22!")]], 30, false)),
    ("KZ", Details::new(&[&[Letters(2), Digits(5), AlphaNum(13)]], 20, false)),
    ("LB", Details::new(&[&[Literal("LB"), Digits(6), AlphaNum(20)]], 28, false)),
    ("LI", Details::new(&[&[Literal("LI"), Digits(7), AlphaNum(12)]], 21, true)),
    ("LT", Details::new(&[&[Literal("LT"), Digits(18)]], 20, true)),
    ("LU", Details::new(&[&[Literal("LU"), Digits(5), AlphaNum(13)]], 20, true)),
    ("LV", Details::new(&[&[Literal("LV"), Digits(2), Letters(4), AlphaNum(13)]], 21, true)),
    ("MC", Details::new(&[&[Literal("MC"), Digits(12), AlphaNum(11), Digits(2)]], 27, true)),
    ("ME", Details::new(&[&[Literal("ME"), Digits(20)]], 22, false)),
    ("MK", Details::new(&[&[Literal("MK"), Digits(5), AlphaNum(10), Digits(2)]], 19, false)),
    ("MR", Details::new(&[&[Literal("MR13"), Digits(23)]], 27, false)),
    (
        "MT",
        Details::new(&[&[Literal("MT"), Digits(2), Letters(4), Digits(5), AlphaNum(18)]], 31, true),
    ),
    (
        "MU",
        Details::new(&[&[Literal("MU"), Digits(2), Letters(4), Digits(19), Letters(3)]], 30, false),
    ),
    ("NL", Details::new(&[&[Literal("NL"), Digits(2), Letters(4), Digits(10)]], 18, true)),
    ("NO", Details::new(&[&[Literal("NO"), Digits(13)]], 15, true)),
    ("PL", Details::new(&[&[Literal("PL"), Digits(10), AlphaNum(16)]], 28, true)),
    ("PT", Details::new(&[&[Literal("PT"), Digits(23)]], 25, true)),
    ("RO", Details::new(&[&[Literal("RO"), Digits(2), Letters(4), AlphaNum(16)]], 24, true)),
    ("RS", Details::new(&[&[Literal("RS"), Digits(20)]], 22, false)),
    ("SA", Details::new(&[&[Literal("SA"), Digits(4), AlphaNum(18)]], 24, false)),
    ("SE", Details::new(&[&[Literal("SE"), Digits(22)]], 24, true)),
    ("SI", Details::new(&[&[Literal("SI"), Digits(17)]], 19, true)),
    ("SK", Details::new(&[&[Literal("SK"), Digits(22)]], 24, true)),
    (
        "SM",
        Details::new(&[&[Literal("SM"), Digits(2), Letters(1), Digits(10), AlphaNum(12)]], 27, true),
    ),
    ("TN", Details::new(&[&[Literal("TN59"), Digits(20)]], 24, false)),
    ("TR", Details::new(&[&[Literal("TR"), Digits(7), AlphaNum(17)]], 26, false)),
];

fn country_details(normalized: &str) -> Option<&'static Details> {
    let code = normalized.get(..COUNTRY_CODE_LENGTH)?;
    COUNTRY_DETAILS
        .binary_search_by(|(country, _)| (*country).cmp(code))
        .ok()
        .and_then(|index| COUNTRY_DETAILS.get(index))
        .map(|(_, details)| details)
}

fn normalize(value: &str) -> String {
    value
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

fn is_checksum_valid(normalized: &str) -> bool {
    let (Some(head), Some(bban)) = (
        normalized.get(..CHECK_DIGITS_END),
        normalized.get(CHECK_DIGITS_END..),
    ) else {
        return false;
    };

    // Mod 97 over the rearranged value, folding digit by digit instead of
    // building the full numeric string.
    let mut remainder: u32 = 0;
    for c in bban.chars().chain(head.chars()) {
        match c.to_digit(36) {
            Some(digit) if digit < 10 => remainder = (remainder * 10 + digit) % 97,
            Some(letter) => remainder = (remainder * 100 + letter) % 97,
            None => return false,
        }
    }
    remainder == 1
}

fn zero_padded(normalized: &str, missing: usize) -> String {
    let chars: Vec<char> = normalized.chars().collect();

    // Find the trailing digit run, never reaching into the country code and
    // check digits.
    let mut run_start: Option<usize> = None;
    let mut index = chars.len();
    while index > CHECK_DIGITS_END + 1 {
        index -= 1;
        match chars.get(index) {
            Some(c) if c.is_ascii_digit() => run_start = Some(index),
            _ => break,
        }
    }

    match run_start {
        Some(at) => {
            let mut padded = String::with_capacity(chars.len() + missing);
            padded.extend(chars.iter().take(at));
            padded.extend(std::iter::repeat('0').take(missing));
            padded.extend(chars.iter().skip(at));
            padded
        }
        None => normalized.to_string(),
    }
}

/// A validated International Bank Account Number.
#[derive(Clone, Eq, PartialEq)]
pub struct Iban {
    value: String,
}

impl Iban {
    /// Parses a valid IBAN out of `value`, ignoring case, spacing and
    /// separator characters.
    pub fn parse(value: &str) -> Option<Self> {
        let normalized = normalize(value);
        let details = country_details(&normalized)?;
        (details.is_full_match(&normalized) && is_checksum_valid(&normalized))
            .then_some(Self { value: normalized })
    }

    /// Parses an IBAN whose account number was typed without leading zeros
    /// by re-inserting them in front of the trailing digit run, e.g.
    /// `NL13 TEST 1234 5678 9` becomes `NL13 TEST 0123 4567 89`.
    pub fn parse_by_adding_missing_zeros(value: &str) -> Option<Self> {
        let normalized = normalize(value);
        let details = country_details(&normalized)?;
        let missing = details.length.saturating_sub(normalized.chars().count());
        let candidate = if (1..=MAX_MISSING_ZEROS).contains(&missing) {
            zero_padded(&normalized, missing)
        } else {
            normalized
        };
        (details.is_full_match(&candidate) && is_checksum_valid(&candidate))
            .then_some(Self { value: candidate })
    }

    /// Whether `value` is a proper prefix of some valid IBAN.
    pub fn is_partial(value: &str) -> bool {
        let normalized = normalize(value);
        if normalized.chars().count() < COUNTRY_CODE_LENGTH {
            COUNTRY_DETAILS
                .iter()
                .any(|(code, _)| code.starts_with(normalized.as_str()))
        } else {
            country_details(&normalized)
                .is_some_and(|details| details.is_potential_match_with_more_input(&normalized))
        }
    }

    /// Whether `value` starts with the country code of a SEPA country.
    pub fn starts_with_sepa_country_code(value: &str) -> bool {
        let normalized = normalize(value);
        if normalized.chars().count() < COUNTRY_CODE_LENGTH {
            COUNTRY_DETAILS
                .iter()
                .any(|(code, details)| code.starts_with(normalized.as_str()) && details.sepa)
        } else {
            country_details(&normalized).is_some_and(|details| details.sepa)
        }
    }

    /// Formats `value` in blocks of four.
    pub fn format(value: &str) -> String {
        let normalized = normalize(value);
        let mut formatted = String::with_capacity(normalized.len() + normalized.len() / BLOCK_SIZE);
        for (index, c) in normalized.chars().enumerate() {
            if index > 0 && index % BLOCK_SIZE == 0 {
                formatted.push(' ');
            }
            formatted.push(c);
        }
        formatted
    }

    /// Masks `value` down to its first and last four characters for display.
    pub fn mask(value: &str) -> String {
        let normalized = normalize(value);
        let chars: Vec<char> = normalized.chars().collect();
        if chars.len() < 2 * MASK_EDGE + 1 {
            return normalized;
        }
        let head: String = chars.iter().take(MASK_EDGE).collect();
        let tail: String = chars.iter().skip(chars.len() - MASK_EDGE).collect();
        format!("{head} \u{2026} {tail}")
    }

    /// Longest registered IBAN after formatting with spaces.
    pub fn formatted_max_length() -> usize {
        let longest = COUNTRY_DETAILS
            .iter()
            .map(|(_, details)| details.length)
            .max()
            .unwrap_or(0);
        longest + longest / BLOCK_SIZE - 1
    }

    /// Normalized value.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Two letter country code.
    pub fn country_code(&self) -> &str {
        self.value.get(..COUNTRY_CODE_LENGTH).unwrap_or_default()
    }

    /// Two check digits following the country code.
    pub fn check_digits(&self) -> &str {
        self.value
            .get(COUNTRY_CODE_LENGTH..CHECK_DIGITS_END)
            .unwrap_or_default()
    }

    /// Basic Bank Account Number, the part after the check digits.
    pub fn bban(&self) -> &str {
        self.value.get(CHECK_DIGITS_END..).unwrap_or_default()
    }

    /// Whether this IBAN belongs to a SEPA country.
    pub fn is_sepa(&self) -> bool {
        country_details(&self.value).is_some_and(|details| details.sepa)
    }
}

impl fmt::Debug for Iban {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Iban").field(&Self::mask(&self.value)).finish()
    }
}
