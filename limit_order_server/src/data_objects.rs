use lop_common::ValidationError;
use orderbook_tools::{FeeExtension, OrderCountFilter, OrderStatus};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ChainQuery {
    pub chain: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OrdersQuery {
    pub chain: u64,
    pub address: String,
}

/// Query parameters for the fee info route. Amounts are decimal strings in the asset's smallest unit.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeQuery {
    pub maker_asset: String,
    pub taker_asset: String,
    pub maker_amount: String,
    pub taker_amount: String,
}

fn parse_amount(value: &str, field: &str) -> Result<u128, ValidationError> {
    value.trim().parse::<u128>().map_err(|_| ValidationError::NotPositive(field.to_string()))
}

impl TryFrom<FeeQuery> for FeeExtension {
    type Error = ValidationError;

    fn try_from(q: FeeQuery) -> Result<Self, Self::Error> {
        let maker_amount = parse_amount(&q.maker_amount, "makerAmount")?;
        let taker_amount = parse_amount(&q.taker_amount, "takerAmount")?;
        Ok(FeeExtension { maker_asset: q.maker_asset, taker_asset: q.taker_asset, maker_amount, taker_amount })
    }
}

/// `statuses` is a comma-separated list of status codes, e.g. "1,2".
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CountQuery {
    #[serde(default)]
    pub statuses: String,
    pub taker_asset: Option<String>,
    pub maker_asset: Option<String>,
}

impl TryFrom<CountQuery> for OrderCountFilter {
    type Error = ValidationError;

    fn try_from(q: CountQuery) -> Result<Self, Self::Error> {
        let statuses = q
            .statuses
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                s.parse::<i32>()
                    .map_err(|_| ValidationError::InvalidValue(format!("{s} is not a valid order status")))
                    .and_then(|code| OrderStatus::try_from(code).map_err(ValidationError::InvalidValue))
            })
            .collect::<Result<Vec<OrderStatus>, ValidationError>>()?;
        Ok(OrderCountFilter { statuses, taker_asset: q.taker_asset, maker_asset: q.maker_asset })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PairsQuery {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    lop_common::MAX_PAGE_LIMIT
}
