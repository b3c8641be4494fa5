//! SEPA direct debit component.

pub mod iban;

use checkout_models::{
    payment_method_types,
    payment_methods::PaymentMethod,
    payments::{PaymentComponentData, SepaPaymentMethod},
};
use common_utils::{
    errors::CustomResult,
    validation::{ValidatedField, Validity},
};
use masking::Secret;

use crate::{
    component::{ensure_payment_method_type, PaymentComponent, PaymentComponentState},
    errors::ComponentError,
};

pub use iban::Iban;

/// Raw SEPA form values.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SepaInputData {
    /// Account holder name.
    pub name: String,
    /// Account number, possibly still being typed.
    pub iban: String,
}

/// Validated SEPA form values.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SepaOutputData {
    /// Account holder name, valid when not blank.
    pub owner_name: ValidatedField<String>,
    /// Account number as entered.
    pub iban_number: ValidatedField<String>,
    /// Parsed account number, present once it validates.
    pub iban: Option<Iban>,
}

impl SepaOutputData {
    fn new(input: &SepaInputData) -> Self {
        let iban = Iban::parse(&input.iban);
        let iban_validity = match iban {
            Some(_) => Validity::Valid,
            None if Iban::is_partial(&input.iban) => Validity::Partial,
            None => Validity::Invalid,
        };
        Self {
            owner_name: ValidatedField::from_check(
                input.name.clone(),
                !input.name.trim().is_empty(),
            ),
            iban_number: ValidatedField::new(input.iban.clone(), iban_validity),
            iban,
        }
    }

    /// Whether both fields passed validation.
    pub fn is_valid(&self) -> bool {
        self.owner_name.is_valid() && self.iban_number.is_valid()
    }
}

/// Component collecting a SEPA direct debit mandate.
#[derive(Debug)]
pub struct SepaComponent {
    input: Option<SepaInputData>,
    output: Option<SepaOutputData>,
}

impl SepaComponent {
    /// Creates a component for `payment_method`, which must be of the SEPA
    /// direct debit type.
    pub fn new(payment_method: &PaymentMethod) -> CustomResult<Self, ComponentError> {
        ensure_payment_method_type(payment_method, payment_method_types::SEPA_DIRECT_DEBIT)?;
        Ok(Self {
            input: None,
            output: None,
        })
    }
}

impl PaymentComponent for SepaComponent {
    type InputData = SepaInputData;
    type OutputData = SepaOutputData;
    type PaymentMethod = SepaPaymentMethod;

    fn payment_method_type(&self) -> &'static str {
        payment_method_types::SEPA_DIRECT_DEBIT
    }

    fn on_input_data_changed(&self, input: &Self::InputData) -> Self::OutputData {
        SepaOutputData::new(input)
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
        let Some((output, iban)) = self
            .output
            .as_ref()
            .filter(|output| output.is_valid())
            .and_then(|output| Some((output, output.iban.as_ref()?)))
        else {
            return Ok(PaymentComponentState {
                data: PaymentComponentData::default(),
                is_valid: false,
            });
        };

        let payment_method = SepaPaymentMethod {
            payment_type: SepaPaymentMethod::PAYMENT_METHOD_TYPE.to_string(),
            owner_name: output.owner_name.value.clone(),
            iban: Secret::new(iban.value().to_string()),
        };

        Ok(PaymentComponentState {
            data: PaymentComponentData {
                payment_method: Some(payment_method),
                ..Default::default()
            },
            is_valid: true,
        })
    }
}
