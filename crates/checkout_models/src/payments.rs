//! Request payloads for the payments API. A component fills a
//! [`PaymentComponentData`] envelope with its payment-method-specific details
//! struct; everything optional stays off the wire when absent.

use cards::{CardNumber, CardSecurityCode};
use common_utils::{
    custom_serde,
    pii::{Email, PhoneNumber},
};
use masking::Secret;
use serde::{Deserialize, Serialize};
use time::Date;

use crate::payment_method_types;

/// Monetary amount in the minor units of `currency`.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct Amount {
    pub currency: String,
    pub value: i64,
}

/// Postal address of the shopper.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub street: String,
    pub house_number_or_name: String,
    pub city: String,
    pub postal_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_or_province: Option<String>,
    pub country: String,
}

/// Name of the shopper as the payment method requires it.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopperName {
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
}

/// Card details for a `scheme` payment.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardPaymentMethod {
    #[serde(rename = "type")]
    pub payment_type: String,
    pub number: CardNumber,
    pub expiry_month: Secret<String>,
    pub expiry_year: Secret<String>,
    pub cvc: CardSecurityCode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub holder_name: Option<Secret<String>>,
}

impl CardPaymentMethod {
    pub const PAYMENT_METHOD_TYPE: &'static str = payment_method_types::SCHEME;
}

/// Account details for a `sepadirectdebit` payment.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SepaPaymentMethod {
    #[serde(rename = "type")]
    pub payment_type: String,
    pub owner_name: String,
    pub iban: Secret<String>,
}

impl SepaPaymentMethod {
    pub const PAYMENT_METHOD_TYPE: &'static str = payment_method_types::SEPA_DIRECT_DEBIT;
}

/// Consent confirmation for an `afterpay_default` payment. The shopper data
/// itself travels in the surrounding [`PaymentComponentData`].
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AfterPayPaymentMethod {
    #[serde(rename = "type")]
    pub payment_type: String,
    pub consent_checkbox: bool,
}

impl AfterPayPaymentMethod {
    pub const PAYMENT_METHOD_TYPE: &'static str = payment_method_types::AFTER_PAY;
}

/// Envelope a component submits: the payment method details plus the shopper
/// fields shared by all payment methods.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentComponentData<PM> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<PM>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_payment_method: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shopper_name: Option<ShopperName>,
    #[serde(
        default,
        with = "custom_serde::server_date::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub date_of_birth: Option<Date>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telephone_number: Option<PhoneNumber>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shopper_email: Option<Email>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_address: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_address: Option<Address>,
}

impl<PM> Default for PaymentComponentData<PM> {
    fn default() -> Self {
        Self {
            payment_method: None,
            store_payment_method: None,
            shopper_name: None,
            date_of_birth: None,
            telephone_number: None,
            shopper_email: None,
            billing_address: None,
            delivery_address: None,
        }
    }
}
