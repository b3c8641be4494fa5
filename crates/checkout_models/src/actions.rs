//! Actions a payment response can carry when the payment cannot complete in
//! one shot. The server names the follow-up step in the `type` field; the
//! union is closed, so a discriminator this version does not know is a parse
//! error rather than a silently ignored object.

use serde::{Deserialize, Serialize};

use crate::{payment_method_types, payments::Amount};

/// Follow-up step requested by the server, dispatched on the wire `type`.
#[allow(deprecated)]
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Action {
    #[serde(rename = "redirect")]
    Redirect(RedirectAction),
    #[serde(rename = "threeds2fingerprint")]
    Threeds2Fingerprint(Threeds2FingerprintAction),
    #[serde(rename = "threeds2challenge")]
    Threeds2Challenge(Threeds2ChallengeAction),
    #[serde(rename = "threeds2")]
    Threeds2(Threeds2Action),
    #[serde(rename = "qrCode")]
    QrCode(QrCodeAction),
    #[serde(rename = "voucher")]
    Voucher(VoucherAction),
    #[serde(rename = "await")]
    Await(AwaitAction),
    #[serde(rename = "sdk")]
    Sdk(SdkAction),
    /// Older servers answer with this dedicated type instead of the generic
    /// `sdk` envelope.
    #[serde(rename = "wechatpaySDK")]
    #[deprecated(note = "servers now send `sdk` with a `paymentMethodType` discriminator")]
    WeChatPaySdk(WeChatPaySdkAction),
}

#[allow(deprecated)]
impl Action {
    /// Wire discriminator of this action.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Redirect(_) => RedirectAction::ACTION_TYPE,
            Self::Threeds2Fingerprint(_) => Threeds2FingerprintAction::ACTION_TYPE,
            Self::Threeds2Challenge(_) => Threeds2ChallengeAction::ACTION_TYPE,
            Self::Threeds2(_) => Threeds2Action::ACTION_TYPE,
            Self::QrCode(_) => QrCodeAction::ACTION_TYPE,
            Self::Voucher(_) => VoucherAction::ACTION_TYPE,
            Self::Await(_) => AwaitAction::ACTION_TYPE,
            Self::Sdk(_) => SdkAction::ACTION_TYPE,
            Self::WeChatPaySdk(_) => WeChatPaySdkAction::ACTION_TYPE,
        }
    }

    /// Opaque state to echo back when submitting the action result.
    pub fn payment_data(&self) -> Option<&str> {
        match self {
            Self::Redirect(action) => action.payment_data.as_deref(),
            Self::Threeds2Fingerprint(action) => action.payment_data.as_deref(),
            Self::Threeds2Challenge(action) => action.payment_data.as_deref(),
            Self::Threeds2(action) => action.payment_data.as_deref(),
            Self::QrCode(action) => action.payment_data.as_deref(),
            Self::Voucher(action) => action.payment_data.as_deref(),
            Self::Await(action) => action.payment_data.as_deref(),
            Self::Sdk(action) => action.payment_data.as_deref(),
            Self::WeChatPaySdk(action) => action.payment_data.as_deref(),
        }
    }

    /// Payment method the action belongs to, when the server includes it.
    pub fn payment_method_type(&self) -> Option<&str> {
        match self {
            Self::Redirect(action) => action.payment_method_type.as_deref(),
            Self::Threeds2Fingerprint(action) => action.payment_method_type.as_deref(),
            Self::Threeds2Challenge(action) => action.payment_method_type.as_deref(),
            Self::Threeds2(action) => action.payment_method_type.as_deref(),
            Self::QrCode(action) => action.payment_method_type.as_deref(),
            Self::Voucher(action) => action.payment_method_type.as_deref(),
            Self::Await(action) => action.payment_method_type.as_deref(),
            Self::Sdk(action) => Some(action.sdk_data.payment_method_type()),
            Self::WeChatPaySdk(action) => action.payment_method_type.as_deref(),
        }
    }
}

/// Hand the shopper off to an external page.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RedirectAction {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl RedirectAction {
    pub const ACTION_TYPE: &'static str = "redirect";
}

/// Run the 3-D Secure 2 device fingerprinting step.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Threeds2FingerprintAction {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl Threeds2FingerprintAction {
    pub const ACTION_TYPE: &'static str = "threeds2fingerprint";
}

/// Present the 3-D Secure 2 challenge to the shopper.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Threeds2ChallengeAction {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl Threeds2ChallengeAction {
    pub const ACTION_TYPE: &'static str = "threeds2challenge";
}

/// Combined 3-D Secure 2 action; `subtype` says which step the token is for.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Threeds2Action {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtype: Option<Threeds2Subtype>,
}

impl Threeds2Action {
    pub const ACTION_TYPE: &'static str = "threeds2";
}

/// Step selector inside a combined `threeds2` action.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Threeds2Subtype {
    Fingerprint,
    Challenge,
}

/// Show a QR code for the shopper to scan with their banking app.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QrCodeAction {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qr_code_data: Option<String>,
}

impl QrCodeAction {
    pub const ACTION_TYPE: &'static str = "qrCode";
}

/// Show a voucher the shopper pays offline.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoucherAction {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub surcharge: Option<Amount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_amount: Option<Amount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_amount: Option<Amount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alternative_reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merchant_name: Option<String>,
}

impl VoucherAction {
    pub const ACTION_TYPE: &'static str = "voucher";
}

/// Poll for the payment outcome while the shopper confirms elsewhere.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AwaitAction {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method_type: Option<String>,
}

impl AwaitAction {
    pub const ACTION_TYPE: &'static str = "await";
}

/// Launch a vendor SDK; the inner payload dispatches on `paymentMethodType`.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SdkAction {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_data: Option<String>,
    #[serde(flatten)]
    pub sdk_data: SdkData,
}

impl SdkAction {
    pub const ACTION_TYPE: &'static str = "sdk";
}

/// Payload of an [`SdkAction`], one variant per vendor SDK.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(tag = "paymentMethodType", content = "sdkData")]
pub enum SdkData {
    #[serde(rename = "wechatpaySDK")]
    WeChatPay(WeChatPaySdkData),
}

impl SdkData {
    /// Payment method type this SDK payload belongs to.
    pub fn payment_method_type(&self) -> &'static str {
        match self {
            Self::WeChatPay(_) => payment_method_types::WECHAT_PAY_SDK,
        }
    }
}

/// Parameters handed to the WeChat Pay SDK, wire keys as WeChat defines them.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeChatPaySdkData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub noncestr: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partnerid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prepayid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sign: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

/// Dedicated WeChat Pay action kept for older servers.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeChatPaySdkAction {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sdk_data: Option<WeChatPaySdkData>,
}

impl WeChatPaySdkAction {
    pub const ACTION_TYPE: &'static str = "wechatpaySDK";
}
