//! AfterPay invoice component.
//!
//! Collects personal details, a billing address, an optional separate
//! delivery address and the consent checkbox. The checkout session may
//! pre-fill most of these through the payment method details tree; values
//! that cannot be parsed are skipped with a log line rather than failing
//! construction.

pub mod data;

use std::str::FromStr;

use checkout_models::{
    payment_method_types,
    payment_methods::{InputDetail, PaymentMethod},
    payments::{Address, AfterPayPaymentMethod, PaymentComponentData, ShopperName},
};
use common_utils::{
    custom_serde::server_date,
    errors::CustomResult,
    ext_traits::StringExt,
    pii::{Email, PhoneNumber},
    validation::{phone_validity, validate_email, ValidatedField},
};

use crate::{
    component::{ensure_payment_method_type, PaymentComponent, PaymentComponentState},
    errors::ComponentError,
};

pub use data::{
    AddressInputData, AddressOutputData, AfterPayInputData, AfterPayOutputData, Gender,
    PersonalDetailsInputData, PersonalDetailsOutputData,
};

const PERSONAL_DETAILS_KEY: &str = "personalDetails";
const BILLING_ADDRESS_KEY: &str = "billingAddress";
const DELIVERY_ADDRESS_KEY: &str = "deliveryAddress";
const SEPARATE_DELIVERY_ADDRESS_KEY: &str = "separateDeliveryAddress";

const FIRST_NAME_KEY: &str = "firstName";
const LAST_NAME_KEY: &str = "lastName";
const GENDER_KEY: &str = "gender";
const DATE_OF_BIRTH_KEY: &str = "dateOfBirth";
const SHOPPER_EMAIL_KEY: &str = "shopperEmail";
const TELEPHONE_NUMBER_KEY: &str = "telephoneNumber";

const STREET_KEY: &str = "street";
const HOUSE_NUMBER_KEY: &str = "houseNumberOrName";
const CITY_KEY: &str = "city";
const POSTAL_CODE_KEY: &str = "postalCode";
const STATE_KEY: &str = "stateOrProvince";
const COUNTRY_KEY: &str = "country";

/// Configuration of the AfterPay form.
#[derive(Clone, Debug)]
pub struct AfterPayConfiguration {
    /// ISO 3166-1 alpha-2 code of the shopper country, seeded into both
    /// addresses.
    pub country_code: String,
}

/// Component collecting AfterPay invoice details.
#[derive(Debug)]
pub struct AfterPayComponent {
    configuration: AfterPayConfiguration,
    init_input: AfterPayInputData,
    input: Option<AfterPayInputData>,
    output: Option<AfterPayOutputData>,
}

impl AfterPayComponent {
    /// Creates a component for `payment_method`, which must be of the
    /// AfterPay type. Pre-filled details are folded into the initial input
    /// data.
    pub fn new(
        payment_method: &PaymentMethod,
        configuration: AfterPayConfiguration,
    ) -> CustomResult<Self, ComponentError> {
        ensure_payment_method_type(payment_method, payment_method_types::AFTER_PAY)?;
        let init_input = seed_input_data(&configuration, payment_method);
        Ok(Self {
            configuration,
            init_input,
            input: None,
            output: None,
        })
    }

    /// Input data pre-filled from the payment method details, for seeding
    /// the form before the shopper touches it.
    pub fn init_input_data(&self) -> &AfterPayInputData {
        &self.init_input
    }

    /// The configuration the component was created with.
    pub fn configuration(&self) -> &AfterPayConfiguration {
        &self.configuration
    }
}

impl PaymentComponent for AfterPayComponent {
    type InputData = AfterPayInputData;
    type OutputData = AfterPayOutputData;
    type PaymentMethod = AfterPayPaymentMethod;

    fn payment_method_type(&self) -> &'static str {
        payment_method_types::AFTER_PAY
    }

    fn on_input_data_changed(&self, input: &Self::InputData) -> Self::OutputData {
        let personal_details = validate_personal_details(&input.personal_details);
        let billing_address = validate_address(&input.billing_address);
        let delivery_address = if input.separate_delivery_address {
            validate_address(&input.delivery_address)
        } else {
            billing_address.clone()
        };

        AfterPayOutputData {
            personal_details,
            billing_address,
            delivery_address,
            separate_delivery_address: input.separate_delivery_address,
            agreement_checked: input.agreement_checked,
        }
    }

    fn input_data_changed(&mut self, input: Self::InputData) {
        self.output = Some(self.on_input_data_changed(&input));
        self.input = Some(input);
    }

    fn output_data(&self) -> Option<&Self::OutputData> {
        self.output.as_ref()
    }

    fn create_component_state(
        &self,
    ) -> CustomResult<PaymentComponentState<Self::PaymentMethod>, ComponentError> {
        let Some(output) = self.output.as_ref().filter(|output| output.is_valid()) else {
            return Ok(PaymentComponentState {
                data: PaymentComponentData::default(),
                is_valid: false,
            });
        };
        let personal = &output.personal_details;

        let payment_method = AfterPayPaymentMethod {
            payment_type: AfterPayPaymentMethod::PAYMENT_METHOD_TYPE.to_string(),
            consent_checkbox: output.agreement_checked,
        };
        let shopper_name = ShopperName {
            first_name: personal.first_name.value.clone(),
            last_name: personal.last_name.value.clone(),
            gender: Some(personal.gender.value.to_string()),
        };

        Ok(PaymentComponentState {
            data: PaymentComponentData {
                payment_method: Some(payment_method),
                shopper_name: Some(shopper_name),
                date_of_birth: personal.date_of_birth.value,
                telephone_number: PhoneNumber::from_str(&personal.telephone_number.value).ok(),
                shopper_email: Email::from_str(&personal.shopper_email.value).ok(),
                billing_address: Some(address_request(&output.billing_address)),
                delivery_address: Some(address_request(&output.delivery_address)),
                ..Default::default()
            },
            is_valid: true,
        })
    }
}

fn seed_input_data(
    configuration: &AfterPayConfiguration,
    payment_method: &PaymentMethod,
) -> AfterPayInputData {
    let seeded_address = || AddressInputData {
        country_code: configuration.country_code.clone(),
        ..Default::default()
    };
    let mut input = AfterPayInputData {
        billing_address: seeded_address(),
        delivery_address: seeded_address(),
        ..Default::default()
    };

    let Some(details) = payment_method.details.as_ref() else {
        return input;
    };
    for detail in details {
        let Some(key) = detail.key.as_deref() else {
            continue;
        };
        let nested = detail.details.as_deref().unwrap_or_default();
        match key {
            PERSONAL_DETAILS_KEY => seed_personal_details(&mut input.personal_details, nested),
            BILLING_ADDRESS_KEY => seed_address_details(&mut input.billing_address, nested),
            DELIVERY_ADDRESS_KEY => seed_address_details(&mut input.delivery_address, nested),
            SEPARATE_DELIVERY_ADDRESS_KEY => {
                input.separate_delivery_address = detail
                    .value
                    .as_deref()
                    .is_some_and(|value| value.eq_ignore_ascii_case("true"));
            }
            _ => tracing::warn!(key, "unrecognized pre-fill key"),
        }
    }
    input
}

fn seed_personal_details(input: &mut PersonalDetailsInputData, details: &[InputDetail]) {
    for detail in details {
        let (Some(key), Some(value)) = (detail.key.as_deref(), detail.value.as_deref()) else {
            continue;
        };
        match key {
            FIRST_NAME_KEY => input.first_name = value.to_string(),
            LAST_NAME_KEY => input.last_name = value.to_string(),
            GENDER_KEY => match value.to_string().parse_enum("Gender") {
                Ok(gender) => input.gender = gender,
                Err(error) => tracing::warn!(key, ?error, "could not parse pre-filled gender"),
            },
            DATE_OF_BIRTH_KEY => match server_date::parse(value) {
                Ok(date) => input.date_of_birth = Some(date),
                Err(error) => tracing::warn!(key, %error, "could not parse pre-filled date"),
            },
            SHOPPER_EMAIL_KEY => input.shopper_email = value.to_string(),
            TELEPHONE_NUMBER_KEY => input.telephone_number = value.to_string(),
            _ => tracing::warn!(key, "unrecognized pre-fill key"),
        }
    }
}

fn seed_address_details(input: &mut AddressInputData, details: &[InputDetail]) {
    for detail in details {
        let (Some(key), Some(value)) = (detail.key.as_deref(), detail.value.as_deref()) else {
            continue;
        };
        match key {
            STREET_KEY => input.street = value.to_string(),
            HOUSE_NUMBER_KEY => input.house_number_or_name = value.to_string(),
            CITY_KEY => input.city = value.to_string(),
            POSTAL_CODE_KEY => input.postal_code = value.to_string(),
            STATE_KEY => input.state_or_province = value.to_string(),
            // The configured country already seeds the address and wins
            // over the pre-filled value.
            COUNTRY_KEY => {}
            _ => tracing::warn!(key, "unrecognized pre-fill key"),
        }
    }
}

fn validate_personal_details(input: &PersonalDetailsInputData) -> PersonalDetailsOutputData {
    PersonalDetailsOutputData {
        first_name: non_blank(&input.first_name),
        last_name: non_blank(&input.last_name),
        gender: ValidatedField::valid(input.gender),
        date_of_birth: ValidatedField::valid(input.date_of_birth),
        telephone_number: ValidatedField::from_check(
            input.telephone_number.clone(),
            phone_validity(&input.telephone_number, true).is_valid(),
        ),
        shopper_email: ValidatedField::from_check(
            input.shopper_email.clone(),
            validate_email(&input.shopper_email).is_ok(),
        ),
    }
}

fn validate_address(input: &AddressInputData) -> AddressOutputData {
    AddressOutputData {
        street: non_blank(&input.street),
        house_number_or_name: non_blank(&input.house_number_or_name),
        city: non_blank(&input.city),
        postal_code: non_blank(&input.postal_code),
        state_or_province: ValidatedField::valid(input.state_or_province.clone()),
        country_code: ValidatedField::valid(input.country_code.clone()),
    }
}

fn non_blank(value: &str) -> ValidatedField<String> {
    ValidatedField::from_check(value.to_string(), !value.trim().is_empty())
}

fn address_request(output: &AddressOutputData) -> Address {
    Address {
        street: output.street.value.clone(),
        house_number_or_name: output.house_number_or_name.value.clone(),
        city: output.city.value.clone(),
        postal_code: output.postal_code.value.clone(),
        state_or_province: (!output.state_or_province.value.is_empty())
            .then(|| output.state_or_province.value.clone()),
        country: output.country_code.value.clone(),
    }
}
