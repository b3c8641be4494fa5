//! The contract every payment method component implements.

use checkout_models::{payment_methods::PaymentMethod, payments::PaymentComponentData};
use common_utils::errors::CustomResult;
use error_stack::report;

use crate::errors::ComponentError;

/// Submittable snapshot of a component: the assembled request data and
/// whether every required field passed validation. A state with `is_valid`
/// false carries no payment method and must not be submitted.
#[derive(Clone, Debug)]
pub struct PaymentComponentState<PM> {
    /// Request data, with the payment method present only when valid.
    pub data: PaymentComponentData<PM>,
    /// Whether the component is ready for submission.
    pub is_valid: bool,
}

/// A payment method component.
///
/// Components hold the latest shopper input and the validated output
/// derived from it. Validation never fails: problems surface as validity
/// markers on the output data so the shopper can keep typing.
pub trait PaymentComponent {
    /// Raw values as the shopper entered them.
    type InputData;
    /// Validated counterpart of the input.
    type OutputData;
    /// Wire payment method submitted inside the payment request.
    type PaymentMethod: serde::Serialize;

    /// Identifier of the payment method this component produces, as carried
    /// in the `type` field of the wire payment method.
    fn payment_method_type(&self) -> &'static str;

    /// Maps input to a validated output snapshot. Pure: equal inputs yield
    /// outputs with equal validation results, regardless of earlier calls.
    fn on_input_data_changed(&self, input: &Self::InputData) -> Self::OutputData;

    /// Stores `input` as the latest shopper input and refreshes the output.
    fn input_data_changed(&mut self, input: Self::InputData);

    /// Latest output snapshot, absent until the first input arrives.
    fn output_data(&self) -> Option<&Self::OutputData>;

    /// Assembles the submittable state from the latest output.
    fn create_component_state(
        &self,
    ) -> CustomResult<PaymentComponentState<Self::PaymentMethod>, ComponentError>;
}

/// Checks that `payment_method` carries the type a component supports.
pub(crate) fn ensure_payment_method_type(
    payment_method: &PaymentMethod,
    supported: &'static str,
) -> CustomResult<(), ComponentError> {
    if payment_method.payment_method_type.as_deref() == Some(supported) {
        Ok(())
    } else {
        Err(report!(ComponentError::UnsupportedPaymentMethod {
            payment_method_type: payment_method.payment_method_type.clone(),
        }))
    }
}
