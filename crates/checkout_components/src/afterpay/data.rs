//! Input and output data of the AfterPay form.

use common_utils::validation::ValidatedField;
use time::Date;

/// Shopper gender as collected by the form.
///
/// Parses from both the single letter codes carried in payment method
/// details and the spelled out values, and displays as the spelled out value
/// the payment API expects.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, strum::Display, strum::EnumString)]
pub enum Gender {
    #[strum(serialize = "M", to_string = "MALE")]
    Male,
    #[strum(serialize = "F", to_string = "FEMALE")]
    Female,
    #[default]
    #[strum(serialize = "U", to_string = "UNKNOWN")]
    Unknown,
}

/// Raw personal details.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PersonalDetailsInputData {
    pub first_name: String,
    pub last_name: String,
    pub gender: Gender,
    pub date_of_birth: Option<Date>,
    pub telephone_number: String,
    pub shopper_email: String,
}

/// Raw address details.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct AddressInputData {
    pub street: String,
    pub house_number_or_name: String,
    pub city: String,
    pub postal_code: String,
    pub state_or_province: String,
    pub country_code: String,
}

/// Raw AfterPay form values.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct AfterPayInputData {
    pub personal_details: PersonalDetailsInputData,
    pub billing_address: AddressInputData,
    /// Delivery address; consulted only when it differs from billing.
    pub delivery_address: AddressInputData,
    /// Whether the shopper ships somewhere other than the billing address.
    pub separate_delivery_address: bool,
    /// Whether the shopper accepted the payment conditions.
    pub agreement_checked: bool,
}

/// Validated personal details.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PersonalDetailsOutputData {
    pub first_name: ValidatedField<String>,
    pub last_name: ValidatedField<String>,
    pub gender: ValidatedField<Gender>,
    pub date_of_birth: ValidatedField<Option<Date>>,
    pub telephone_number: ValidatedField<String>,
    pub shopper_email: ValidatedField<String>,
}

impl PersonalDetailsOutputData {
    /// Whether every personal detail passed validation.
    pub fn is_valid(&self) -> bool {
        self.first_name.is_valid()
            && self.last_name.is_valid()
            && self.gender.is_valid()
            && self.date_of_birth.is_valid()
            && self.telephone_number.is_valid()
            && self.shopper_email.is_valid()
    }
}

/// Validated address details.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AddressOutputData {
    pub street: ValidatedField<String>,
    pub house_number_or_name: ValidatedField<String>,
    pub city: ValidatedField<String>,
    pub postal_code: ValidatedField<String>,
    pub state_or_province: ValidatedField<String>,
    pub country_code: ValidatedField<String>,
}

impl AddressOutputData {
    /// Whether every address detail passed validation.
    pub fn is_valid(&self) -> bool {
        self.street.is_valid()
            && self.house_number_or_name.is_valid()
            && self.city.is_valid()
            && self.postal_code.is_valid()
            && self.state_or_province.is_valid()
            && self.country_code.is_valid()
    }
}

/// Validated AfterPay form values.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AfterPayOutputData {
    pub personal_details: PersonalDetailsOutputData,
    pub billing_address: AddressOutputData,
    /// Mirrors the billing address unless a separate one was requested.
    pub delivery_address: AddressOutputData,
    pub separate_delivery_address: bool,
    pub agreement_checked: bool,
}

impl AfterPayOutputData {
    /// Whether the form can be submitted: all details valid and the payment
    /// conditions accepted.
    pub fn is_valid(&self) -> bool {
        self.personal_details.is_valid()
            && self.billing_address.is_valid()
            && self.delivery_address.is_valid()
            && self.agreement_checked
    }
}
