//! Errors raised while constructing components and assembling their state.
//!
//! Shopper input problems are never errors. They travel as
//! [`Validity`](common_utils::validation::Validity) markers on the output
//! data, so a component can always be asked for its state.

/// Failures outside the normal validate-and-retry input loop.
#[derive(Debug, thiserror::Error)]
pub enum ComponentError {
    /// The payment method handed to a component does not match the payment
    /// method the component implements.
    #[error("payment method type {payment_method_type:?} is not supported by this component")]
    UnsupportedPaymentMethod {
        /// The `type` carried by the rejected payment method, if any.
        payment_method_type: Option<String>,
    },

    /// A field that already passed validation failed to convert into its
    /// strict wire representation.
    #[error("validated output could not be converted into a wire payment method")]
    PaymentMethodConversion,
}
