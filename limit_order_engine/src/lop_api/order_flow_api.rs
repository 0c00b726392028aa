use std::fmt::Debug;

use log::*;
use lop_common::{
    validate_chain_id,
    validate_evm_address,
    validate_hash,
    validate_limit,
    validate_page,
    validate_positive_amount,
    ValidationError,
    ORDER_HASH_LENGTH,
};
use orderbook_tools::{
    FeeExtension,
    FeeInfo,
    OrderCount,
    OrderCountFilter,
    OrderDetails,
    OrderSubmission,
    UniquePairsPage,
};

use crate::{
    db::traits::{InsertOrderResult, OrderStore, OrderStoreError},
    db_types::{NewOrderRecord, OrderKey},
    helpers::KeyedLock,
    lop_api::{
        errors::OrderFlowError,
        order_objects::{CleanupOutcome, ListingPolicy, ReconciledOrders, SubmittedOrder},
        reconciliation::ReconciliationPlan,
    },
    traits::RemoteOrderSource,
};

/// `LimitOrderApi` is the primary API for listing, submitting and querying limit orders.
///
/// The orderbook is the source of truth. The local store only remembers which orders were submitted through this
/// gateway. Listing an owner's orders evicts local records that the orderbook no longer knows about.
///
/// Listings and submissions for the same `(chain, owner)` pair run one at a time, so a listing can never evict an order
/// that is halfway through being submitted.
pub struct LimitOrderApi<S, R> {
    store: S,
    remote: R,
    policy: ListingPolicy,
    locks: KeyedLock<OrderKey>,
}

impl<S, R> Debug for LimitOrderApi<S, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "LimitOrderApi ({:?})", self.policy)
    }
}

impl<S, R> LimitOrderApi<S, R> {
    pub fn new(store: S, remote: R) -> Self {
        Self { store, remote, policy: ListingPolicy::default(), locks: KeyedLock::new() }
    }

    pub fn with_listing_policy(mut self, policy: ListingPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn listing_policy(&self) -> ListingPolicy {
        self.policy
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn remote(&self) -> &R {
        &self.remote
    }
}

impl<S, R> LimitOrderApi<S, R>
where
    S: OrderStore,
    R: RemoteOrderSource,
{
    /// Fetches the owner's orders from the orderbook and reconciles them against the local store.
    ///
    /// * Local records the orderbook no longer lists are deleted. This is best-effort: if the delete fails, the
    ///   failure is reported in [`ReconciledOrders::cleanup`] and the listing still succeeds.
    /// * The returned orders are chosen by the [`ListingPolicy`]. By default, only orders that are stored locally are
    ///   returned.
    ///
    /// If the orderbook can't be reached, the store is not touched at all.
    pub async fn fetch_and_reconcile_orders(&self, chain_id: u64, owner: &str) -> Result<ReconciledOrders, OrderFlowError> {
        validate_chain_id(chain_id)?;
        validate_evm_address(Some(owner), "address", true)?;
        let key = OrderKey::new(chain_id, owner);
        let _guard = self.locks.lock(&key).await;
        let remote_orders = self.remote.fetch_orders_by_owner(chain_id, owner).await?;
        let stored = self.store.fetch_order_hashes(&key).await?;
        let plan = ReconciliationPlan::for_orders(&remote_orders, &stored);
        debug!(
            "🔄️ {key}: {} remote orders, {} stored. {} confirmed, {} unconfirmed, {} stale",
            remote_orders.len(),
            stored.len(),
            plan.confirmed().len(),
            plan.unconfirmed().len(),
            plan.stale().len()
        );
        let cleanup = self.evict_stale_orders(&key, &plan).await;
        let orders = plan.select(remote_orders, self.policy);
        Ok(ReconciledOrders {
            chain_id,
            owner: key.owner,
            orders,
            confirmed_hashes: plan.confirmed().to_vec(),
            unconfirmed_hashes: plan.unconfirmed().to_vec(),
            cleanup,
        })
    }

    async fn evict_stale_orders(&self, key: &OrderKey, plan: &ReconciliationPlan) -> CleanupOutcome {
        if plan.stale().is_empty() {
            return CleanupOutcome::NothingToDelete;
        }
        let hashes = plan.stale().to_vec();
        match self.store.delete_orders_by_hash(key, &plan.stale_set()).await {
            Ok(deleted) => {
                info!("🔄️ Evicted {deleted} orders for {key} that the orderbook no longer lists");
                CleanupOutcome::Deleted { hashes }
            },
            Err(e) => {
                warn!("🔄️ Could not evict {} stale orders for {key}. They will be retried next time. {e}", hashes.len());
                CleanupOutcome::Failed { hashes, reason: e.to_string() }
            },
        }
    }

    /// Submits a signed order to the orderbook and, once it is accepted, records it locally under the maker's address.
    ///
    /// Nothing is stored if the orderbook rejects the order. If the orderbook accepts it but the local write fails,
    /// [`OrderFlowError::SubmittedButNotStored`] is returned. The order is live at that point and should not be
    /// submitted again.
    pub async fn submit_order(&self, chain_id: u64, submission: OrderSubmission) -> Result<SubmittedOrder, OrderFlowError> {
        validate_submission(chain_id, &submission)?;
        let record = NewOrderRecord::from_submission(chain_id, &submission).map_err(OrderStoreError::from)?;
        let key = record.key();
        let order_hash = submission.order_hash.clone();
        let _guard = self.locks.lock(&key).await;
        let remote = self.remote.submit_order(chain_id, &submission).await?;
        let stored = self.store.insert_order(record).await.map_err(|e| {
            error!("🔄️ Order {order_hash} was accepted by the orderbook but could not be saved for {key}. {e}");
            OrderFlowError::SubmittedButNotStored { order_hash: order_hash.clone(), reason: e.to_string() }
        })?;
        let (record_id, newly_stored) = match stored {
            InsertOrderResult::Inserted(id) => (id, true),
            InsertOrderResult::AlreadyExists(id) => {
                debug!("🔄️ Order {order_hash} was already stored for {key}");
                (id, false)
            },
        };
        info!("🔄️ Order {order_hash} submitted for {key}");
        Ok(SubmittedOrder { chain_id, order_hash, record_id, newly_stored, remote })
    }

    pub async fn fetch_order_by_hash(&self, chain_id: u64, order_hash: &str) -> Result<OrderDetails, OrderFlowError> {
        validate_chain_id(chain_id)?;
        validate_hash(Some(order_hash), "Order hash", ORDER_HASH_LENGTH, true)?;
        let order = self.remote.fetch_order_by_hash(chain_id, order_hash).await?;
        Ok(order)
    }

    pub async fn fetch_fee_info(&self, chain_id: u64, extension: &FeeExtension) -> Result<FeeInfo, OrderFlowError> {
        validate_chain_id(chain_id)?;
        validate_evm_address(Some(extension.maker_asset.as_str()), "makerAsset", true)?;
        validate_evm_address(Some(extension.taker_asset.as_str()), "takerAsset", true)?;
        validate_positive_amount(extension.maker_amount, "makerAmount")?;
        validate_positive_amount(extension.taker_amount, "takerAmount")?;
        let info = self.remote.fetch_fee_info(chain_id, extension).await?;
        Ok(info)
    }

    /// Counts orders matching the filter. At least one status is required.
    pub async fn fetch_order_count(&self, chain_id: u64, filter: &OrderCountFilter) -> Result<OrderCount, OrderFlowError> {
        validate_chain_id(chain_id)?;
        if filter.statuses.is_empty() {
            return Err(ValidationError::Missing("Statuses".to_string()).into());
        }
        validate_evm_address(filter.taker_asset.as_deref(), "taker_asset", false)?;
        validate_evm_address(filter.maker_asset.as_deref(), "maker_asset", false)?;
        let count = self.remote.fetch_order_count(chain_id, filter).await?;
        Ok(count)
    }

    pub async fn fetch_unique_active_pairs(
        &self,
        chain_id: u64,
        page: u32,
        limit: u32,
    ) -> Result<UniquePairsPage, OrderFlowError> {
        validate_chain_id(chain_id)?;
        validate_page(page)?;
        validate_limit(limit)?;
        let pairs = self.remote.fetch_unique_active_pairs(chain_id, page, limit).await?;
        Ok(pairs)
    }
}

/// Shape checks for a new order. Runs before any I/O.
pub fn validate_submission(chain_id: u64, submission: &OrderSubmission) -> Result<(), ValidationError> {
    validate_chain_id(chain_id)?;
    validate_hash(Some(submission.order_hash.as_str()), "orderHash", ORDER_HASH_LENGTH, true)?;
    if submission.signature.trim().is_empty() {
        return Err(ValidationError::Missing("signature".to_string()));
    }
    let data = &submission.data;
    validate_evm_address(Some(data.maker.as_str()), "maker", true)?;
    validate_evm_address(Some(data.maker_asset.as_str()), "makerAsset", true)?;
    validate_evm_address(Some(data.taker_asset.as_str()), "takerAsset", true)?;
    validate_evm_address(data.receiver.as_deref(), "receiver", false)?;
    Ok(())
}
