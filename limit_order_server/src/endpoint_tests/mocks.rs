use limit_order_engine::RemoteOrderSource;
use mockall::mock;
use orderbook_tools::{
    FeeExtension,
    FeeInfo,
    LimitOrder,
    OrderCount,
    OrderCountFilter,
    OrderDetails,
    OrderSubmission,
    OrderbookApiError,
    RemoteOrderHandle,
    UniquePairsPage,
};

mock! {
    pub OrderSource {}
    impl RemoteOrderSource for OrderSource {
        async fn fetch_orders_by_owner(&self, chain_id: u64, owner: &str) -> Result<Vec<LimitOrder>, OrderbookApiError>;
        async fn fetch_order_by_hash(&self, chain_id: u64, order_hash: &str) -> Result<OrderDetails, OrderbookApiError>;
        async fn fetch_fee_info(&self, chain_id: u64, extension: &FeeExtension) -> Result<FeeInfo, OrderbookApiError>;
        async fn fetch_order_count(&self, chain_id: u64, filter: &OrderCountFilter) -> Result<OrderCount, OrderbookApiError>;
        async fn fetch_unique_active_pairs(&self, chain_id: u64, page: u32, limit: u32) -> Result<UniquePairsPage, OrderbookApiError>;
        async fn submit_order(&self, chain_id: u64, submission: &OrderSubmission) -> Result<RemoteOrderHandle, OrderbookApiError>;
    }
}
