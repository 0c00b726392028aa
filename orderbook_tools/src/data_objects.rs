use std::{collections::HashMap, fmt::Display};

use serde::{Deserialize, Serialize};
use serde_json::Value;

//--------------------------------------     Orders       ------------------------------------------------------------

/// The signed order payload, as the maker built it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LimitOrderData {
    pub maker_asset: String,
    pub taker_asset: String,
    pub maker: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receiver: Option<String>,
    pub making_amount: String,
    pub taking_amount: String,
    pub salt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maker_traits: Option<String>,
}

/// An order as listed by `GET /{chain}/address/{address}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LimitOrder {
    /// Not every listing includes the signature.
    #[serde(default)]
    pub signature: Option<String>,
    pub order_hash: String,
    pub create_date_time: String,
    pub remaining_maker_amount: String,
    pub maker_balance: String,
    pub maker_allowance: String,
    pub data: LimitOrderData,
    pub maker_rate: String,
    pub taker_rate: String,
    #[serde(default)]
    pub is_maker_contract: bool,
    #[serde(default)]
    pub order_invalid_reason: Option<String>,
}

/// A single order as returned by `GET /{chain}/order/{hash}`. The shape differs from the listing endpoint, and several
/// fields are omitted for some orders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetails {
    pub order_hash: String,
    #[serde(default)]
    pub signature: Option<String>,
    #[serde(default)]
    pub create_date_time: Option<String>,
    #[serde(default)]
    pub last_changed_date_time: Option<String>,
    #[serde(default)]
    pub maker_asset: Option<String>,
    #[serde(default)]
    pub taker_asset: Option<String>,
    #[serde(default)]
    pub order_status: Option<i32>,
    #[serde(default)]
    pub maker_amount: Option<String>,
    #[serde(default)]
    pub taker_amount: Option<String>,
    #[serde(default)]
    pub remaining_maker_amount: Option<String>,
    #[serde(default)]
    pub maker_balance: Option<String>,
    #[serde(default)]
    pub maker_allowance: Option<String>,
    pub data: LimitOrderData,
    #[serde(default)]
    pub maker_rate: Option<String>,
    #[serde(default)]
    pub taker_rate: Option<String>,
    #[serde(default)]
    pub is_maker_contract: bool,
    #[serde(default)]
    pub order_invalid_reason: Option<String>,
}

/// Body of `POST /{chain}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSubmission {
    pub order_hash: String,
    pub signature: String,
    pub data: LimitOrderData,
}

/// Whatever the orderbook sent back after accepting a new order. The content is not interpreted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RemoteOrderHandle(pub Value);

//--------------------------------------     Order status       ------------------------------------------------------

/// Status filter understood by the orderbook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum OrderStatus {
    Valid = 1,
    TemporarilyInvalid = 2,
    Invalid = 3,
}

impl OrderStatus {
    /// The status filter used when listing an owner's orders: every status.
    pub const ALL: [OrderStatus; 3] = [OrderStatus::Valid, OrderStatus::TemporarilyInvalid, OrderStatus::Invalid];

    pub fn code(&self) -> i32 {
        *self as i32
    }

    /// Formats a list of statuses the way the `statuses` query parameter expects them, e.g. "1,2,3"
    pub fn join(statuses: &[OrderStatus]) -> String {
        statuses.iter().map(|s| s.code().to_string()).collect::<Vec<String>>().join(",")
    }
}

impl TryFrom<i32> for OrderStatus {
    type Error = String;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Valid),
            2 => Ok(Self::TemporarilyInvalid),
            3 => Ok(Self::Invalid),
            v => Err(format!("{v} is not a valid order status. Use 1 (valid), 2 (temporarily invalid) or 3 (invalid)")),
        }
    }
}

impl From<OrderStatus> for i32 {
    fn from(value: OrderStatus) -> Self {
        value.code()
    }
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Valid => write!(f, "Valid"),
            Self::TemporarilyInvalid => write!(f, "TemporarilyInvalid"),
            Self::Invalid => write!(f, "Invalid"),
        }
    }
}

//--------------------------------------     Fees       --------------------------------------------------------------

/// Parameters for `GET /{chain}/fee-info`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeeExtension {
    pub maker_asset: String,
    pub taker_asset: String,
    pub maker_amount: u128,
    pub taker_amount: u128,
}

impl FeeExtension {
    pub fn new(maker_asset: &str, taker_asset: &str, maker_amount: u128, taker_amount: u128) -> Self {
        Self { maker_asset: maker_asset.to_string(), taker_asset: taker_asset.to_string(), maker_amount, taker_amount }
    }

    pub fn to_query_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("makerAsset", self.maker_asset.clone()),
            ("takerAsset", self.taker_asset.clone()),
            ("makerAmount", self.maker_amount.to_string()),
            ("takerAmount", self.taker_amount.to_string()),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeInfo {
    #[serde(default)]
    pub whitelist: HashMap<String, String>,
    pub fee_bps: u32,
    pub whitelist_discount_percent: u32,
    pub protocol_fee_receiver: String,
    pub extension_address: String,
}

//--------------------------------------     Stats       -------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderCount {
    pub count: u64,
}

/// Filters for the order count query. Empty filters are left off the request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderCountFilter {
    pub statuses: Vec<OrderStatus>,
    pub taker_asset: Option<String>,
    pub maker_asset: Option<String>,
}

impl OrderCountFilter {
    pub fn new(statuses: &[OrderStatus]) -> Self {
        Self { statuses: statuses.to_vec(), ..Default::default() }
    }

    pub fn with_taker_asset(mut self, taker_asset: &str) -> Self {
        self.taker_asset = Some(taker_asset.to_string());
        self
    }

    pub fn with_maker_asset(mut self, maker_asset: &str) -> Self {
        self.maker_asset = Some(maker_asset.to_string());
        self
    }

    pub fn to_query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::with_capacity(3);
        if !self.statuses.is_empty() {
            params.push(("statuses", OrderStatus::join(&self.statuses)));
        }
        if let Some(taker) = self.taker_asset.as_ref().filter(|s| !s.is_empty()) {
            params.push(("takerAsset", taker.clone()));
        }
        if let Some(maker) = self.maker_asset.as_ref().filter(|s| !s.is_empty()) {
            params.push(("makerAsset", maker.clone()));
        }
        params
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub maker_asset: String,
    pub taker_asset: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageMeta {
    pub total_items: u64,
    pub current_page: u32,
    pub items_per_page: u32,
    pub total_pages: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniquePairsPage {
    #[serde(default)]
    pub meta: PageMeta,
    pub items: Vec<TokenPair>,
}
