use orderbook_tools::{
    FeeExtension,
    FeeInfo,
    LimitOrder,
    OrderCount,
    OrderCountFilter,
    OrderDetails,
    OrderSubmission,
    OrderbookApi,
    OrderbookApiError,
    RemoteOrderHandle,
    UniquePairsPage,
};

/// The orderbook, as seen by the engine. Every method is a single round trip to the remote and is never retried.
///
/// Callers validate their inputs before calling any of these methods.
#[allow(async_fn_in_trait)]
pub trait RemoteOrderSource {
    /// The live orders for `owner` on `chain_id`, in the order the orderbook returned them.
    async fn fetch_orders_by_owner(&self, chain_id: u64, owner: &str) -> Result<Vec<LimitOrder>, OrderbookApiError>;
    async fn fetch_order_by_hash(&self, chain_id: u64, order_hash: &str) -> Result<OrderDetails, OrderbookApiError>;
    async fn fetch_fee_info(&self, chain_id: u64, extension: &FeeExtension) -> Result<FeeInfo, OrderbookApiError>;
    async fn fetch_order_count(&self, chain_id: u64, filter: &OrderCountFilter)
        -> Result<OrderCount, OrderbookApiError>;
    async fn fetch_unique_active_pairs(
        &self,
        chain_id: u64,
        page: u32,
        limit: u32,
    ) -> Result<UniquePairsPage, OrderbookApiError>;
    /// Not idempotent. Submitting the same order twice is the orderbook's problem to resolve.
    async fn submit_order(
        &self,
        chain_id: u64,
        submission: &OrderSubmission,
    ) -> Result<RemoteOrderHandle, OrderbookApiError>;
}

impl RemoteOrderSource for OrderbookApi {
    async fn fetch_orders_by_owner(&self, chain_id: u64, owner: &str) -> Result<Vec<LimitOrder>, OrderbookApiError> {
        OrderbookApi::fetch_orders_by_owner(self, chain_id, owner).await
    }

    async fn fetch_order_by_hash(&self, chain_id: u64, order_hash: &str) -> Result<OrderDetails, OrderbookApiError> {
        OrderbookApi::fetch_order_by_hash(self, chain_id, order_hash).await
    }

    async fn fetch_fee_info(&self, chain_id: u64, extension: &FeeExtension) -> Result<FeeInfo, OrderbookApiError> {
        OrderbookApi::fetch_fee_info(self, chain_id, extension).await
    }

    async fn fetch_order_count(
        &self,
        chain_id: u64,
        filter: &OrderCountFilter,
    ) -> Result<OrderCount, OrderbookApiError> {
        OrderbookApi::fetch_order_count(self, chain_id, filter).await
    }

    async fn fetch_unique_active_pairs(
        &self,
        chain_id: u64,
        page: u32,
        limit: u32,
    ) -> Result<UniquePairsPage, OrderbookApiError> {
        OrderbookApi::fetch_unique_active_pairs(self, chain_id, page, limit).await
    }

    async fn submit_order(
        &self,
        chain_id: u64,
        submission: &OrderSubmission,
    ) -> Result<RemoteOrderHandle, OrderbookApiError> {
        OrderbookApi::submit_order(self, chain_id, submission).await
    }
}
