use common_utils::{date_time, errors};
use error_stack::report;
use masking::{PeekInterface, StrongSecret};
use time::Date;

pub mod brand;
pub mod validate;

pub use brand::CardBrand;
pub use validate::{
    luhn, validate_card_number, validate_expiry_date, validate_expiry_date_on,
    validate_holder_name, validate_security_code, CardNumber, ExpiryDateValidation,
    NumberValidation,
};

// Issuers keep accepting cards for a short period after the printed date.
const EXPIRY_GRACE_MONTHS: i32 = 3;

/// Card security code (CVC/CVV), three or four digits. Kept as a string so
/// leading zeros survive.
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(try_from = "String")]
pub struct CardSecurityCode(StrongSecret<String>);

impl CardSecurityCode {
    pub fn new(secret: StrongSecret<String>) -> errors::CustomResult<Self, errors::ValidationError> {
        let csc = secret.peek();

        if (3..=4).contains(&csc.len()) && csc.chars().all(|c| c.is_ascii_digit()) {
            Ok(Self(secret))
        } else {
            Err(report!(errors::ValidationError::InvalidValue {
                message: "invalid card security code".to_string()
            }))
        }
    }
}

impl TryFrom<String> for CardSecurityCode {
    type Error = error_stack::Report<errors::ValidationError>;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(StrongSecret::new(value))
    }
}

#[derive(Clone, Debug)]
pub struct CardExpirationMonth(StrongSecret<u8>);

impl CardExpirationMonth {
    pub fn new(secret: StrongSecret<u8>) -> errors::CustomResult<Self, errors::ValidationError> {
        let month = secret.peek();

        if (1..=12).contains(month) {
            Ok(Self(secret))
        } else {
            Err(report!(errors::ValidationError::InvalidValue {
                message: "invalid card expiration month".to_string()
            }))
        }
    }

    /// Month as the zero-padded two digits the wire format expects.
    pub fn two_digits(&self) -> String {
        format!("{:02}", self.0.peek())
    }
}

#[derive(Clone, Debug)]
pub struct CardExpirationYear(StrongSecret<u16>);

impl CardExpirationYear {
    pub fn new(secret: StrongSecret<u16>) -> errors::CustomResult<Self, errors::ValidationError> {
        let year = secret.peek();

        if *year >= 1997 {
            Ok(Self(secret))
        } else {
            Err(report!(errors::ValidationError::InvalidValue {
                message: "invalid card expiration year".to_string()
            }))
        }
    }

    pub fn four_digits(&self) -> String {
        self.0.peek().to_string()
    }

    pub fn two_digits(&self) -> String {
        format!("{:02}", self.0.peek() % 100)
    }
}

#[derive(Clone, Debug)]
pub struct CardExpiration {
    pub month: CardExpirationMonth,
    pub year: CardExpirationYear,
}

impl CardExpiration {
    pub fn new(
        secret_month: StrongSecret<u8>,
        secret_year: StrongSecret<u16>,
    ) -> errors::CustomResult<Self, errors::ValidationError> {
        let month = CardExpirationMonth::new(secret_month)?;
        let year = CardExpirationYear::new(secret_year)?;
        Ok(Self { month, year })
    }

    /// Whether an issuer would still accept this expiration date on `today`.
    ///
    /// Dates up to three months in the past pass; future dates are not
    /// bounded.
    pub fn is_accepted_on(&self, today: Date) -> bool {
        let expiry_index =
            i32::from(*self.year.0.peek()) * 12 + i32::from(*self.month.0.peek());
        let today_index = today.year() * 12 + i32::from(u8::from(today.month()));

        expiry_index >= today_index - EXPIRY_GRACE_MONTHS
    }

    /// [`Self::is_accepted_on`] against the current UTC date.
    pub fn is_accepted_now(&self) -> bool {
        self.is_accepted_on(date_time::now().date())
    }

    pub fn get_month(&self) -> &CardExpirationMonth {
        &self.month
    }

    pub fn get_year(&self) -> &CardExpirationYear {
        &self.year
    }
}

impl TryFrom<(u8, u16)> for CardExpiration {
    type Error = error_stack::Report<errors::ValidationError>;

    fn try_from((month, year): (u8, u16)) -> Result<Self, Self::Error> {
        Self::new(StrongSecret::new(month), StrongSecret::new(year))
    }
}

impl PeekInterface<StrongSecret<String>> for CardSecurityCode {
    fn peek(&self) -> &StrongSecret<String> {
        &self.0
    }

    fn peek_mut(&mut self) -> &mut StrongSecret<String> {
        &mut self.0
    }
}

impl PeekInterface<StrongSecret<u8>> for CardExpirationMonth {
    fn peek(&self) -> &StrongSecret<u8> {
        &self.0
    }

    fn peek_mut(&mut self) -> &mut StrongSecret<u8> {
        &mut self.0
    }
}

impl PeekInterface<StrongSecret<u16>> for CardExpirationYear {
    fn peek(&self) -> &StrongSecret<u16> {
        &self.0
    }

    fn peek_mut(&mut self) -> &mut StrongSecret<u16> {
        &mut self.0
    }
}
