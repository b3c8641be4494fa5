//! Card component.

use std::str::FromStr;

use cards::{
    validate_card_number, validate_expiry_date, validate_holder_name, validate_security_code,
    CardBrand, CardExpiration, CardNumber,
};
use checkout_models::{
    payment_method_types,
    payment_methods::PaymentMethod,
    payments::{CardPaymentMethod, PaymentComponentData},
};
use common_utils::{errors::CustomResult, validation::ValidatedField};
use error_stack::{report, ResultExt};
use masking::Secret;

use crate::{
    component::{ensure_payment_method_type, PaymentComponent, PaymentComponentState},
    errors::ComponentError,
};

/// Configuration of the card form.
#[derive(Clone, Debug)]
pub struct CardConfiguration {
    /// Brands accepted by the merchant, in detection priority order.
    pub supported_brands: Vec<CardBrand>,
    /// Whether the holder name is collected and required.
    pub holder_name_required: bool,
}

impl Default for CardConfiguration {
    fn default() -> Self {
        Self {
            supported_brands: vec![CardBrand::Visa, CardBrand::Mc, CardBrand::Amex],
            holder_name_required: false,
        }
    }
}

/// Raw card form values.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CardInputData {
    /// Card number, possibly with grouping separators.
    pub card_number: String,
    /// Expiry date in `MM/yy` shape.
    pub expiry_date: String,
    /// Security code.
    pub security_code: String,
    /// Holder name.
    pub holder_name: String,
    /// Whether the shopper asked to store the card.
    pub store_payment_method: bool,
}

/// Validated card form values.
#[derive(Clone, Debug)]
pub struct CardOutputData {
    /// Card number with separators stripped.
    pub card_number: ValidatedField<String>,
    /// Expiry date as entered.
    pub expiry_date: ValidatedField<String>,
    /// Security code, measured against the detected brand.
    pub security_code: ValidatedField<String>,
    /// Holder name; always valid when the form does not require it.
    pub holder_name: ValidatedField<String>,
    /// Brand detected from the leading digits.
    pub brand: Option<CardBrand>,
    /// Parsed expiry, present once the date is complete.
    pub expiry: Option<CardExpiration>,
    /// Whether the shopper asked to store the card.
    pub store_payment_method: bool,
}

impl CardOutputData {
    /// Whether every field passed validation.
    pub fn is_valid(&self) -> bool {
        self.card_number.is_valid()
            && self.expiry_date.is_valid()
            && self.security_code.is_valid()
            && self.holder_name.is_valid()
    }
}

/// Component collecting card details.
#[derive(Debug)]
pub struct CardComponent {
    configuration: CardConfiguration,
    input: Option<CardInputData>,
    output: Option<CardOutputData>,
}

impl CardComponent {
    /// Creates a component for `payment_method`, which must be of the card
    /// scheme type.
    pub fn new(
        payment_method: &PaymentMethod,
        configuration: CardConfiguration,
    ) -> CustomResult<Self, ComponentError> {
        ensure_payment_method_type(payment_method, payment_method_types::SCHEME)?;
        Ok(Self {
            configuration,
            input: None,
            output: None,
        })
    }

    /// The configuration the component was created with.
    pub fn configuration(&self) -> &CardConfiguration {
        &self.configuration
    }
}

impl PaymentComponent for CardComponent {
    type InputData = CardInputData;
    type OutputData = CardOutputData;
    type PaymentMethod = CardPaymentMethod;

    fn payment_method_type(&self) -> &'static str {
        payment_method_types::SCHEME
    }

    fn on_input_data_changed(&self, input: &Self::InputData) -> Self::OutputData {
        let number = validate_card_number(&input.card_number, &self.configuration.supported_brands);
        let expiry = validate_expiry_date(&input.expiry_date);
        let security_code_validity = validate_security_code(&input.security_code, number.brand);
        let holder_name_validity =
            validate_holder_name(&input.holder_name, self.configuration.holder_name_required);

        CardOutputData {
            card_number: ValidatedField::new(number.normalized, number.validity),
            expiry_date: ValidatedField::new(input.expiry_date.clone(), expiry.validity),
            security_code: ValidatedField::new(
                input.security_code.trim().to_string(),
                security_code_validity,
            ),
            holder_name: ValidatedField::new(
                input.holder_name.trim().to_string(),
                holder_name_validity,
            ),
            brand: number.brand,
            expiry: expiry.expiry,
            store_payment_method: input.store_payment_method,
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

        let expiry = output.expiry.as_ref().ok_or_else(|| {
            report!(ComponentError::PaymentMethodConversion)
                .attach_printable("valid output without a parsed expiry date")
        })?;
        let number = CardNumber::from_str(&output.card_number.value)
            .change_context(ComponentError::PaymentMethodConversion)?;
        let cvc = cards::CardSecurityCode::try_from(output.security_code.value.clone())
            .change_context(ComponentError::PaymentMethodConversion)?;

        let payment_method = CardPaymentMethod {
            payment_type: CardPaymentMethod::PAYMENT_METHOD_TYPE.to_string(),
            number,
            expiry_month: Secret::new(expiry.get_month().two_digits()),
            expiry_year: Secret::new(expiry.get_year().four_digits()),
            cvc,
            holder_name: (!output.holder_name.value.is_empty())
                .then(|| Secret::new(output.holder_name.value.clone())),
        };

        Ok(PaymentComponentState {
            data: PaymentComponentData {
                payment_method: Some(payment_method),
                store_payment_method: Some(output.store_payment_method),
                ..Default::default()
            },
            is_valid: true,
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use common_utils::validation::Validity;
    use serde_json::json;

    use super::*;

    fn scheme_payment_method() -> PaymentMethod {
        PaymentMethod {
            payment_method_type: Some(payment_method_types::SCHEME.to_string()),
            ..Default::default()
        }
    }

    fn valid_input() -> CardInputData {
        CardInputData {
            card_number: "4111 1111 1111 1111".to_string(),
            expiry_date: "12/40".to_string(),
            security_code: "737".to_string(),
            holder_name: "J. Smith".to_string(),
            store_payment_method: true,
        }
    }

    #[test]
    fn valid_input_produces_a_submittable_state() {
        let mut component =
            CardComponent::new(&scheme_payment_method(), CardConfiguration::default()).unwrap();
        component.input_data_changed(valid_input());

        let output = component.output_data().unwrap();
        assert_eq!(output.brand, Some(CardBrand::Visa));
        assert!(output.is_valid());

        let state = component.create_component_state().unwrap();
        assert!(state.is_valid);
        assert_eq!(
            serde_json::to_value(&state.data).unwrap(),
            json!({
                "paymentMethod": {
                    "type": "scheme",
                    "number": "4111111111111111",
                    "expiryMonth": "12",
                    "expiryYear": "2040",
                    "cvc": "737",
                    "holderName": "J. Smith",
                },
                "storePaymentMethod": true,
            })
        );
    }

    #[test]
    fn number_failing_the_checksum_blocks_submission() {
        let mut component =
            CardComponent::new(&scheme_payment_method(), CardConfiguration::default()).unwrap();
        component.input_data_changed(CardInputData {
            // Wrong check digit; three more digits could still fix it, so
            // the number grades partial rather than invalid.
            card_number: "4111 1111 1111 1112".to_string(),
            ..valid_input()
        });

        let output = component.output_data().unwrap();
        assert_eq!(output.card_number.validity, Validity::Partial);

        let state = component.create_component_state().unwrap();
        assert!(!state.is_valid);
        assert!(state.data.payment_method.is_none());
        assert!(state.data.store_payment_method.is_none());
    }

    #[test]
    fn security_code_length_follows_the_detected_brand() {
        let mut component =
            CardComponent::new(&scheme_payment_method(), CardConfiguration::default()).unwrap();
        component.input_data_changed(CardInputData {
            card_number: "378282246310005".to_string(),
            security_code: "737".to_string(),
            ..valid_input()
        });

        let output = component.output_data().unwrap();
        assert_eq!(output.brand, Some(CardBrand::Amex));
        assert_eq!(output.security_code.validity, Validity::Partial);

        component.input_data_changed(CardInputData {
            card_number: "378282246310005".to_string(),
            security_code: "7373".to_string(),
            ..valid_input()
        });
        assert!(component.output_data().unwrap().is_valid());
    }

    #[test]
    fn holder_name_is_required_only_by_configuration() {
        let configuration = CardConfiguration {
            holder_name_required: true,
            ..Default::default()
        };
        let mut component =
            CardComponent::new(&scheme_payment_method(), configuration).unwrap();
        component.input_data_changed(CardInputData {
            holder_name: " ".to_string(),
            ..valid_input()
        });

        let output = component.output_data().unwrap();
        assert_eq!(output.holder_name.validity, Validity::Invalid);
        assert!(!component.create_component_state().unwrap().is_valid);
    }

    #[test]
    fn optional_blank_holder_name_is_omitted_from_the_request() {
        let mut component =
            CardComponent::new(&scheme_payment_method(), CardConfiguration::default()).unwrap();
        component.input_data_changed(CardInputData {
            holder_name: String::new(),
            ..valid_input()
        });

        let state = component.create_component_state().unwrap();
        assert!(state.is_valid);
        assert!(state.data.payment_method.unwrap().holder_name.is_none());
    }

    #[test]
    fn unsupported_brand_blocks_submission() {
        let configuration = CardConfiguration {
            supported_brands: vec![CardBrand::Mc],
            ..Default::default()
        };
        let mut component =
            CardComponent::new(&scheme_payment_method(), configuration).unwrap();
        component.input_data_changed(valid_input());

        let output = component.output_data().unwrap();
        assert_eq!(output.brand, None);
        assert!(!component.create_component_state().unwrap().is_valid);
    }

    #[test]
    fn equal_inputs_yield_equal_validation_results() {
        let component =
            CardComponent::new(&scheme_payment_method(), CardConfiguration::default()).unwrap();
        let input = valid_input();

        let first = component.on_input_data_changed(&input);
        let second = component.on_input_data_changed(&input);
        assert_eq!(first.card_number, second.card_number);
        assert_eq!(first.expiry_date, second.expiry_date);
        assert_eq!(first.security_code, second.security_code);
        assert_eq!(first.holder_name, second.holder_name);
        assert_eq!(first.brand, second.brand);
    }

    #[test]
    fn state_before_any_input_is_not_submittable() {
        let component =
            CardComponent::new(&scheme_payment_method(), CardConfiguration::default()).unwrap();

        assert!(component.output_data().is_none());
        let state = component.create_component_state().unwrap();
        assert!(!state.is_valid);
        assert!(state.data.payment_method.is_none());
    }

    #[test]
    fn rejects_other_payment_method_types() {
        let payment_method = PaymentMethod {
            payment_method_type: Some(payment_method_types::SEPA_DIRECT_DEBIT.to_string()),
            ..Default::default()
        };

        assert!(CardComponent::new(&payment_method, CardConfiguration::default()).is_err());
    }
}
