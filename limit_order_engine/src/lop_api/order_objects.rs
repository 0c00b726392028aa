use orderbook_tools::{LimitOrder, RemoteOrderHandle};
use serde::{Deserialize, Serialize};

use crate::db_types::OwnerAddress;

/// Which remote orders a listing returns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingPolicy {
    /// Only orders that were submitted through this gateway and are still live on the orderbook.
    #[default]
    ConfirmedOnly,
    /// Every live order on the orderbook, whether or not it was submitted through this gateway.
    IncludeUnconfirmed,
}

/// What happened to the local records that the orderbook no longer lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CleanupOutcome {
    NothingToDelete,
    Deleted { hashes: Vec<String> },
    /// The delete was attempted and rolled back. The records will be retried on the next listing.
    Failed { hashes: Vec<String>, reason: String },
}

impl CleanupOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    /// The stale hashes, whether or not they were removed.
    pub fn hashes(&self) -> &[String] {
        match self {
            Self::NothingToDelete => &[],
            Self::Deleted { hashes } | Self::Failed { hashes, .. } => hashes,
        }
    }
}

/// The result of listing an owner's orders and bringing the local store in line with the orderbook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciledOrders {
    pub chain_id: u64,
    pub owner: OwnerAddress,
    /// The orders selected by the listing policy, in the order the orderbook returned them.
    pub orders: Vec<LimitOrder>,
    /// Live on the orderbook and stored locally.
    pub confirmed_hashes: Vec<String>,
    /// Live on the orderbook but unknown locally.
    pub unconfirmed_hashes: Vec<String>,
    pub cleanup: CleanupOutcome,
}

/// An order that the orderbook accepted and that is now stored locally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmittedOrder {
    pub chain_id: u64,
    pub order_hash: String,
    pub record_id: i64,
    /// False if the order was already stored from an earlier submission.
    pub newly_stored: bool,
    pub remote: RemoteOrderHandle,
}
