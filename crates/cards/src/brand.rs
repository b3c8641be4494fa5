//! Card brand detection from the leading digits of a card number.
//!
//! Brands are matched against anchored prefix patterns in a fixed priority
//! order, restricted to the brands the payment method actually supports, so a
//! co-branded number resolves to the most specific supported brand (a
//! Bijenkorf card stops being plain `mc` once its seventh digit arrives).

use std::sync::LazyLock;

use regex::Regex;

/// Card brands by their payment-network code.
#[derive(
    Clone,
    Copy,
    Debug,
    Eq,
    Hash,
    PartialEq,
    serde::Deserialize,
    serde::Serialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum CardBrand {
    Amex,
    Bijcard,
    Cup,
    Dankort,
    Diners,
    Discover,
    Elo,
    Hipercard,
    Jcb,
    Maestro,
    Mc,
    Uatp,
    Visa,
}

impl CardBrand {
    /// Number lengths the brand issues, ascending.
    pub const fn number_lengths(self) -> &'static [usize] {
        match self {
            Self::Amex | Self::Uatp => &[15],
            Self::Diners => &[14, 16],
            Self::Maestro => &[12, 13, 14, 15, 16, 17, 18, 19],
            Self::Cup | Self::Jcb => &[16, 17, 18, 19],
            Self::Visa => &[13, 16, 19],
            _ => &[16],
        }
    }

    /// Security code digits the brand prints on its cards.
    pub const fn security_code_length(self) -> usize {
        match self {
            Self::Amex => 4,
            _ => 3,
        }
    }
}

// Priority order: more specific prefixes (bijcard, cup, dankort, hipercard)
// come before the broad mc/maestro ranges that also cover them.
const BRAND_PATTERNS: &[(CardBrand, &str)] = &[
    (CardBrand::Amex, r"^3[47][0-9]{0,13}$"),
    (CardBrand::Bijcard, r"^5100081[0-9]{0,9}$"),
    (CardBrand::Cup, r"^(62|81)[0-9]{0,17}$"),
    (CardBrand::Dankort, r"^5019[0-9]{0,12}$"),
    (CardBrand::Diners, r"^36[0-9]{0,12}$"),
    (CardBrand::Discover, r"^(6011[0-9]{0,12}|64[45][0-9]{0,13})$"),
    (
        CardBrand::Elo,
        r"^((506699|506770|506771|506772|506773|506774|506775|506776|506777|506778|401178|438935|451416|457631|457632|504175|627780|636368|636297)[0-9]{0,10}|5067[0-6][0-9]{0,11})$",
    ),
    (CardBrand::Hipercard, r"^606282[0-9]{0,10}$"),
    (CardBrand::Jcb, r"^35[2-8][0-9]{0,16}$"),
    (CardBrand::Maestro, r"^6[0-9]{0,18}$"),
    (CardBrand::Mc, r"^(5[1-5][0-9]{0,14}|2[2-7][0-9]{0,14})$"),
    (CardBrand::Uatp, r"^1[0-9]{0,14}$"),
    (CardBrand::Visa, r"^4[0-9]{0,18}$"),
];

#[deny(clippy::invalid_regex)]
static BRAND_MATCHERS: LazyLock<Vec<(CardBrand, Regex)>> = LazyLock::new(|| {
    BRAND_PATTERNS
        .iter()
        .filter_map(|(brand, pattern)| match Regex::new(pattern) {
            Ok(regex) => Some((*brand, regex)),
            Err(error) => {
                tracing::error!(?error, brand = %brand, "invalid card brand pattern");
                None
            }
        })
        .collect()
});

/// Resolves the brand of a (possibly incomplete) digit string, considering
/// only `allowed` brands. `None` until the digits entered so far match a
/// supported pattern.
pub fn detect(digits: &str, allowed: &[CardBrand]) -> Option<CardBrand> {
    if digits.is_empty() {
        return None;
    }
    BRAND_MATCHERS
        .iter()
        .find(|(brand, regex)| allowed.contains(brand) && regex.is_match(digits))
        .map(|(brand, _)| *brand)
}
