use std::{
    collections::{HashMap, HashSet},
    sync::{Arc, Mutex, MutexGuard},
    time::Duration,
};

use chrono::Utc;
use orderbook_tools::{
    FeeExtension,
    FeeInfo,
    LimitOrder,
    LimitOrderData,
    OrderCount,
    OrderCountFilter,
    OrderDetails,
    OrderStatus,
    OrderSubmission,
    OrderbookApiError,
    PageMeta,
    RemoteOrderHandle,
    TokenPair,
    UniquePairsPage,
};
use serde_json::json;

use crate::{
    db::traits::{InsertOrderResult, OrderStore, OrderStoreError},
    db_types::{NewOrderRecord, OrderKey, OrderRecord},
    traits::RemoteOrderSource,
};

pub const WETH: &str = "0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2";
pub const USDC: &str = "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48";

/// A well-formed, random 66-character order hash.
pub fn random_hash() -> String {
    let a = rand::random::<u128>();
    let b = rand::random::<u128>();
    format!("0x{a:032x}{b:032x}")
}

fn order_data(maker: &str) -> LimitOrderData {
    LimitOrderData {
        maker_asset: WETH.to_string(),
        taker_asset: USDC.to_string(),
        maker: maker.to_string(),
        receiver: None,
        making_amount: "1000000000000000000".to_string(),
        taking_amount: "2500000000".to_string(),
        salt: rand::random::<u64>().to_string(),
        extension: None,
        maker_traits: None,
    }
}

/// A signed order, ready to be submitted.
pub fn order_submission(order_hash: &str, maker: &str) -> OrderSubmission {
    OrderSubmission { order_hash: order_hash.to_string(), signature: format!("0x{:064x}", 7), data: order_data(maker) }
}

/// An order as the orderbook would list it.
pub fn limit_order(order_hash: &str, maker: &str) -> LimitOrder {
    listed(order_submission(order_hash, maker))
}

fn listed(submission: OrderSubmission) -> LimitOrder {
    LimitOrder {
        signature: Some(submission.signature),
        order_hash: submission.order_hash,
        create_date_time: Utc::now().to_rfc3339(),
        remaining_maker_amount: submission.data.making_amount.clone(),
        maker_balance: "5000000000000000000".to_string(),
        maker_allowance: "5000000000000000000".to_string(),
        data: submission.data,
        maker_rate: "0.0000000025".to_string(),
        taker_rate: "400000000".to_string(),
        is_maker_contract: false,
        order_invalid_reason: None,
    }
}

fn locked<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|e| e.into_inner())
}

//--------------------------------------   InMemoryOrderStore   -------------------------------------------------------

#[derive(Default)]
struct StoreState {
    records: Vec<OrderRecord>,
    next_id: i64,
    read_failure: Option<String>,
    delete_failure: Option<String>,
    insert_failure: Option<String>,
    read_calls: usize,
    delete_calls: usize,
    insert_calls: usize,
}

/// An [`OrderStore`] that lives in memory. Clones share the same records.
///
/// Failures can be injected per operation. A failed delete leaves the records untouched, like a rolled back
/// transaction.
#[derive(Clone, Default)]
pub struct InMemoryOrderStore {
    state: Arc<Mutex<StoreState>>,
}

impl InMemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store with the given hashes for `key`, as if they had been submitted earlier.
    pub fn with_hashes(self, key: &OrderKey, hashes: &[&str]) -> Self {
        {
            let mut state = locked(&self.state);
            for hash in hashes {
                let record = NewOrderRecord::new(key.chain_id, key.owner.as_str(), hash, "{}".to_string());
                state.insert(record);
            }
        }
        self
    }

    pub fn fail_reads_with(&self, reason: &str) {
        locked(&self.state).read_failure = Some(reason.to_string());
    }

    pub fn fail_deletes_with(&self, reason: &str) {
        locked(&self.state).delete_failure = Some(reason.to_string());
    }

    pub fn fail_inserts_with(&self, reason: &str) {
        locked(&self.state).insert_failure = Some(reason.to_string());
    }

    pub fn clear_failures(&self) {
        let mut state = locked(&self.state);
        state.read_failure = None;
        state.delete_failure = None;
        state.insert_failure = None;
    }

    pub fn hashes(&self, key: &OrderKey) -> HashSet<String> {
        locked(&self.state).hashes(key)
    }

    pub fn len(&self) -> usize {
        locked(&self.state).records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The number of times the store was read from, including failed attempts.
    pub fn read_calls(&self) -> usize {
        locked(&self.state).read_calls
    }

    /// The number of delete statements "executed", including failed attempts. Empty deletes don't count.
    pub fn delete_calls(&self) -> usize {
        locked(&self.state).delete_calls
    }

    pub fn insert_calls(&self) -> usize {
        locked(&self.state).insert_calls
    }
}

impl StoreState {
    fn hashes(&self, key: &OrderKey) -> HashSet<String> {
        self.records.iter().filter(|r| matches(r, key)).map(|r| r.order_hash.clone()).collect()
    }

    fn insert(&mut self, order: NewOrderRecord) -> InsertOrderResult {
        let key = order.key();
        if let Some(existing) = self.records.iter().find(|r| matches(r, &key) && r.order_hash == order.order_hash) {
            return InsertOrderResult::AlreadyExists(existing.id);
        }
        self.next_id += 1;
        let id = self.next_id;
        self.records.push(OrderRecord {
            id,
            chain_id: i64::try_from(order.chain_id).unwrap_or(i64::MAX),
            owner_address: order.owner.as_str().to_string(),
            order_hash: order.order_hash,
            payload: order.payload,
            created_at: Utc::now(),
        });
        InsertOrderResult::Inserted(id)
    }
}

fn matches(record: &OrderRecord, key: &OrderKey) -> bool {
    u64::try_from(record.chain_id).ok() == Some(key.chain_id) && record.owner_address == key.owner.as_str()
}

impl OrderStore for InMemoryOrderStore {
    fn url(&self) -> &str {
        "memory://"
    }

    async fn fetch_order_hashes(&self, key: &OrderKey) -> Result<HashSet<String>, OrderStoreError> {
        let mut state = locked(&self.state);
        state.read_calls += 1;
        if let Some(reason) = &state.read_failure {
            return Err(OrderStoreError::DatabaseError(reason.clone()));
        }
        Ok(state.hashes(key))
    }

    async fn delete_orders_by_hash(&self, key: &OrderKey, hashes: &HashSet<String>) -> Result<u64, OrderStoreError> {
        if hashes.is_empty() {
            return Ok(0);
        }
        let mut state = locked(&self.state);
        state.delete_calls += 1;
        if let Some(reason) = &state.delete_failure {
            return Err(OrderStoreError::DatabaseError(reason.clone()));
        }
        let before = state.records.len();
        state.records.retain(|r| !(matches(r, key) && hashes.contains(&r.order_hash)));
        Ok((before - state.records.len()) as u64)
    }

    async fn insert_order(&self, order: NewOrderRecord) -> Result<InsertOrderResult, OrderStoreError> {
        let mut state = locked(&self.state);
        state.insert_calls += 1;
        if let Some(reason) = &state.insert_failure {
            return Err(OrderStoreError::DatabaseError(reason.clone()));
        }
        Ok(state.insert(order))
    }

    async fn fetch_orders(&self, key: &OrderKey) -> Result<Vec<OrderRecord>, OrderStoreError> {
        let mut state = locked(&self.state);
        state.read_calls += 1;
        if let Some(reason) = &state.read_failure {
            return Err(OrderStoreError::DatabaseError(reason.clone()));
        }
        Ok(state.records.iter().filter(|r| matches(r, key)).cloned().collect())
    }
}

//--------------------------------------   FakeOrderSource   ----------------------------------------------------------

#[derive(Debug, Clone)]
enum FakeFailure {
    Unavailable(String),
    Status(u16, String),
}

impl From<FakeFailure> for OrderbookApiError {
    fn from(f: FakeFailure) -> Self {
        match f {
            FakeFailure::Unavailable(s) => OrderbookApiError::Unavailable(s),
            FakeFailure::Status(status, message) => OrderbookApiError::QueryError { status, message },
        }
    }
}

#[derive(Default)]
struct SourceState {
    /// Listings per chain, keyed by lower-cased maker.
    listings: HashMap<(u64, String), Vec<LimitOrder>>,
    failure: Option<FakeFailure>,
    submitted: Vec<(u64, OrderSubmission)>,
    calls: usize,
    latency: Option<Duration>,
}

/// An in-memory orderbook. Accepted submissions show up in later listings, as they would on the real orderbook.
#[derive(Clone, Default)]
pub struct FakeOrderSource {
    state: Arc<Mutex<SourceState>>,
}

impl FakeOrderSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds live orders for `owner` on `chain_id`, after any that are already listed.
    pub fn with_orders(self, chain_id: u64, owner: &str, orders: Vec<LimitOrder>) -> Self {
        locked(&self.state).listings.entry((chain_id, owner.to_lowercase())).or_default().extend(orders);
        self
    }

    /// Replaces the listing for `owner` on `chain_id`.
    pub fn set_orders(&self, chain_id: u64, owner: &str, orders: Vec<LimitOrder>) {
        locked(&self.state).listings.insert((chain_id, owner.to_lowercase()), orders);
    }

    /// Every call fails as if the orderbook could not be reached.
    pub fn fail_unavailable(&self, reason: &str) {
        locked(&self.state).failure = Some(FakeFailure::Unavailable(reason.to_string()));
    }

    /// Every call fails with the given HTTP status.
    pub fn fail_with_status(&self, status: u16, message: &str) {
        locked(&self.state).failure = Some(FakeFailure::Status(status, message.to_string()));
    }

    /// Listings and submissions take this long to come back. The listing is taken before the delay.
    pub fn with_latency(self, latency: Duration) -> Self {
        locked(&self.state).latency = Some(latency);
        self
    }

    pub fn recover(&self) {
        locked(&self.state).failure = None;
    }

    pub fn submitted(&self) -> Vec<(u64, OrderSubmission)> {
        locked(&self.state).submitted.clone()
    }

    /// Number of remote calls made, including failed ones.
    pub fn calls(&self) -> usize {
        locked(&self.state).calls
    }

    async fn simulate_latency(&self) {
        let latency = locked(&self.state).latency;
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
    }

    fn begin_call(&self) -> Result<MutexGuard<'_, SourceState>, OrderbookApiError> {
        let mut state = locked(&self.state);
        state.calls += 1;
        match state.failure.clone() {
            Some(f) => Err(f.into()),
            None => Ok(state),
        }
    }
}

impl RemoteOrderSource for FakeOrderSource {
    async fn fetch_orders_by_owner(&self, chain_id: u64, owner: &str) -> Result<Vec<LimitOrder>, OrderbookApiError> {
        let orders = {
            let state = self.begin_call()?;
            state.listings.get(&(chain_id, owner.to_lowercase())).cloned().unwrap_or_default()
        };
        self.simulate_latency().await;
        Ok(orders)
    }

    async fn fetch_order_by_hash(&self, chain_id: u64, order_hash: &str) -> Result<OrderDetails, OrderbookApiError> {
        let state = self.begin_call()?;
        state
            .listings
            .iter()
            .filter(|((chain, _), _)| *chain == chain_id)
            .flat_map(|(_, orders)| orders.iter())
            .find(|o| o.order_hash == order_hash)
            .map(|o| OrderDetails {
                order_hash: o.order_hash.clone(),
                signature: o.signature.clone(),
                create_date_time: Some(o.create_date_time.clone()),
                last_changed_date_time: None,
                maker_asset: Some(o.data.maker_asset.clone()),
                taker_asset: Some(o.data.taker_asset.clone()),
                order_status: Some(OrderStatus::Valid.code()),
                maker_amount: Some(o.data.making_amount.clone()),
                taker_amount: Some(o.data.taking_amount.clone()),
                remaining_maker_amount: Some(o.remaining_maker_amount.clone()),
                maker_balance: Some(o.maker_balance.clone()),
                maker_allowance: Some(o.maker_allowance.clone()),
                data: o.data.clone(),
                maker_rate: Some(o.maker_rate.clone()),
                taker_rate: Some(o.taker_rate.clone()),
                is_maker_contract: o.is_maker_contract,
                order_invalid_reason: o.order_invalid_reason.clone(),
            })
            .ok_or_else(|| OrderbookApiError::QueryError { status: 404, message: "Order not found".to_string() })
    }

    async fn fetch_fee_info(&self, _chain_id: u64, _extension: &FeeExtension) -> Result<FeeInfo, OrderbookApiError> {
        let _state = self.begin_call()?;
        let whitelist = HashMap::from([(WETH.to_string(), "0x0000000000000000000000000000000000000001".to_string())]);
        Ok(FeeInfo {
            whitelist,
            fee_bps: 25,
            whitelist_discount_percent: 50,
            protocol_fee_receiver: "0x90cbe4bdd538d6e9b379bff5fe72c3d67a521de5".to_string(),
            extension_address: "0xc0dfdb9e7a392c3dbbe7c6fbe8fbc1789c9fe05e".to_string(),
        })
    }

    async fn fetch_order_count(
        &self,
        chain_id: u64,
        filter: &OrderCountFilter,
    ) -> Result<OrderCount, OrderbookApiError> {
        let state = self.begin_call()?;
        let taker = filter.taker_asset.as_ref().map(|s| s.to_lowercase());
        let maker = filter.maker_asset.as_ref().map(|s| s.to_lowercase());
        let count = state
            .listings
            .iter()
            .filter(|((chain, _), _)| *chain == chain_id)
            .flat_map(|(_, orders)| orders.iter())
            .filter(|o| taker.as_ref().map_or(true, |t| o.data.taker_asset.to_lowercase() == *t))
            .filter(|o| maker.as_ref().map_or(true, |m| o.data.maker_asset.to_lowercase() == *m))
            .count();
        // Every listed order is valid, so other statuses count nothing.
        let count = if filter.statuses.contains(&OrderStatus::Valid) { count as u64 } else { 0 };
        Ok(OrderCount { count })
    }

    async fn fetch_unique_active_pairs(
        &self,
        chain_id: u64,
        page: u32,
        limit: u32,
    ) -> Result<UniquePairsPage, OrderbookApiError> {
        let state = self.begin_call()?;
        let mut pairs = state
            .listings
            .iter()
            .filter(|((chain, _), _)| *chain == chain_id)
            .flat_map(|(_, orders)| orders.iter())
            .map(|o| (o.data.maker_asset.clone(), o.data.taker_asset.clone()))
            .collect::<Vec<(String, String)>>();
        pairs.sort();
        pairs.dedup();
        let total_items = pairs.len() as u64;
        let items = pairs
            .into_iter()
            .skip(((page.max(1) - 1) * limit) as usize)
            .take(limit as usize)
            .map(|(maker_asset, taker_asset)| TokenPair { maker_asset, taker_asset })
            .collect();
        let total_pages = u32::try_from(total_items.div_ceil(u64::from(limit.max(1)))).unwrap_or(u32::MAX);
        let meta = PageMeta { total_items, current_page: page, items_per_page: limit, total_pages };
        Ok(UniquePairsPage { meta, items })
    }

    async fn submit_order(
        &self,
        chain_id: u64,
        submission: &OrderSubmission,
    ) -> Result<RemoteOrderHandle, OrderbookApiError> {
        {
            let mut state = self.begin_call()?;
            state.submitted.push((chain_id, submission.clone()));
            let owner = submission.data.maker.to_lowercase();
            state.listings.entry((chain_id, owner)).or_default().push(listed(submission.clone()));
        }
        self.simulate_latency().await;
        Ok(RemoteOrderHandle(json!({ "success": true })))
    }
}
