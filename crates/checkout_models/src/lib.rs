//! Serde models for the payment wire protocol: request payloads assembled by
//! payment components, the polymorphic action objects a payment response can
//! carry, and the payment method configuration tree used to pre-fill
//! components.

pub mod actions;
pub mod payment_methods;
pub mod payments;

/// Payment method type codes as they appear on the wire.
pub mod payment_method_types {
    /// Card payments across the supported networks.
    pub const SCHEME: &str = "scheme";
    /// SEPA direct debit.
    pub const SEPA_DIRECT_DEBIT: &str = "sepadirectdebit";
    /// AfterPay open invoice.
    pub const AFTER_PAY: &str = "afterpay_default";
    /// WeChat Pay through the vendor SDK.
    pub const WECHAT_PAY_SDK: &str = "wechatpaySDK";
}
