use std::fmt::Display;

use chrono::{DateTime, Utc};
use orderbook_tools::OrderSubmission;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

//--------------------------------------   OwnerAddress    ------------------------------------------------------------

/// The maker address that owns a set of orders.
///
/// EVM addresses are case-insensitive (the mixed case is only a checksum), so the address is lower-cased on
/// construction. Every store lookup goes through this type, so `0xAbC…` and `0xabc…` name the same owner.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct OwnerAddress(String);

impl OwnerAddress {
    pub fn new(address: &str) -> Self {
        Self(address.trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<String> for OwnerAddress {
    fn from(value: String) -> Self {
        Self::new(&value)
    }
}

impl From<&str> for OwnerAddress {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<OwnerAddress> for String {
    fn from(value: OwnerAddress) -> Self {
        value.0
    }
}

impl Display for OwnerAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

//--------------------------------------     OrderKey      ------------------------------------------------------------

/// The partition that reconciliation works on: all orders of one owner on one chain.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OrderKey {
    pub chain_id: u64,
    pub owner: OwnerAddress,
}

impl OrderKey {
    pub fn new(chain_id: u64, owner: &str) -> Self {
        Self { chain_id, owner: OwnerAddress::new(owner) }
    }
}

impl Display for OrderKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.owner, self.chain_id)
    }
}

//--------------------------------------   Order records   ------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrderRecord {
    pub chain_id: u64,
    pub owner: OwnerAddress,
    pub order_hash: String,
    /// The submitted order, verbatim, as JSON text.
    pub payload: String,
}

impl NewOrderRecord {
    pub fn new(chain_id: u64, owner: &str, order_hash: &str, payload: String) -> Self {
        Self { chain_id, owner: OwnerAddress::new(owner), order_hash: order_hash.trim().to_lowercase(), payload }
    }

    /// Builds the record for an order that the orderbook has just accepted. The maker is the owner.
    pub fn from_submission(chain_id: u64, submission: &OrderSubmission) -> Result<Self, serde_json::Error> {
        let payload = serde_json::to_string(submission)?;
        Ok(Self::new(chain_id, &submission.data.maker, &submission.order_hash, payload))
    }

    pub fn key(&self) -> OrderKey {
        OrderKey { chain_id: self.chain_id, owner: self.owner.clone() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct OrderRecord {
    pub id: i64,
    pub chain_id: i64,
    pub owner_address: String,
    pub order_hash: String,
    pub payload: String,
    pub created_at: DateTime<Utc>,
}

impl OrderRecord {
    /// Decodes the stored payload back into the submission that produced it.
    pub fn submission(&self) -> Result<OrderSubmission, serde_json::Error> {
        serde_json::from_str(&self.payload)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn owner_addresses_are_case_insensitive() {
        let a = OwnerAddress::new("0x00000000219AB540356cBB839Cbe05303d7705Fa");
        let b = OwnerAddress::from("0x00000000219ab540356cbb839cbe05303d7705fa ");
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "0x00000000219ab540356cbb839cbe05303d7705fa");
        assert_eq!(OrderKey::new(1, "0xABC").to_string(), "0xabc@1");
    }

    #[test]
    fn order_hashes_are_stored_lower_case() {
        let record = NewOrderRecord::new(1, "0xABC", "0xABCDEF", "{}".to_string());
        assert_eq!(record.order_hash, "0xabcdef");
        assert_eq!(record.key().to_string(), "0xabc@1");
    }

    #[test]
    fn owner_address_deserializes_lower_case() {
        let owner: OwnerAddress = serde_json::from_str(r#""0xABCDEF""#).unwrap();
        assert_eq!(owner.as_str(), "0xabcdef");
        assert_eq!(serde_json::to_string(&owner).unwrap(), r#""0xabcdef""#);
    }
}
