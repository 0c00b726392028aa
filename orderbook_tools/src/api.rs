use std::sync::Arc;

use log::*;
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION},
    Client,
    Method,
};
use serde::{de::DeserializeOwned, Serialize};

use crate::{
    config::OrderbookConfig,
    data_objects::{
        FeeExtension,
        FeeInfo,
        LimitOrder,
        OrderCount,
        OrderCountFilter,
        OrderDetails,
        OrderStatus,
        OrderSubmission,
        RemoteOrderHandle,
        UniquePairsPage,
    },
    error::error_message_from_body,
    OrderbookApiError,
};

/// The listing window used by [`OrderbookApi::fetch_orders_by_owner`]. Owners with more than this many orders will only
/// see the first page.
pub const OWNER_ORDERS_PAGE: u32 = 1;
pub const OWNER_ORDERS_LIMIT: u32 = 100;

#[derive(Clone)]
pub struct OrderbookApi {
    config: OrderbookConfig,
    client: Arc<Client>,
}

impl OrderbookApi {
    pub fn new(config: OrderbookConfig) -> Result<Self, OrderbookApiError> {
        let mut headers = HeaderMap::with_capacity(2);
        let mut val = HeaderValue::from_str(config.api_key.reveal().as_str())
            .map_err(|e| OrderbookApiError::Initialization(e.to_string()))?;
        val.set_sensitive(true);
        headers.insert(AUTHORIZATION, val);
        headers.insert("Accepts", HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| OrderbookApiError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    pub fn config(&self) -> &OrderbookConfig {
        &self.config
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url)
    }

    /// Sends a single request and decodes the JSON response.
    ///
    /// * Connection failures and timeouts become [`OrderbookApiError::Unavailable`].
    /// * Any non-2xx status becomes [`OrderbookApiError::QueryError`] carrying the status and the error message.
    /// * An empty success body is decoded as JSON `null`.
    pub async fn rest_query<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        path: &str,
        params: &[(&str, String)],
        body: Option<B>,
    ) -> Result<T, OrderbookApiError> {
        let url = self.url(path);
        trace!("Sending REST query: {method} {url}");
        let mut req = self.client.request(method, url);
        if !params.is_empty() {
            req = req.query(params);
        }
        if let Some(body) = body {
            req = req.json(&body);
        }
        let response = req.send().await.map_err(|e| {
            if e.is_builder() {
                OrderbookApiError::InvalidRequest(e.to_string())
            } else {
                OrderbookApiError::Unavailable(e.to_string())
            }
        })?;
        let status = response.status();
        let text = response.text().await.map_err(|e| OrderbookApiError::Unavailable(e.to_string()))?;
        if status.is_success() {
            trace!("REST query successful. {status}");
            let text = if text.trim().is_empty() { "null" } else { text.as_str() };
            serde_json::from_str::<T>(text).map_err(|e| OrderbookApiError::JsonError(e.to_string()))
        } else {
            let message = error_message_from_body(&text);
            debug!("REST query failed. {status}. {message}");
            Err(OrderbookApiError::QueryError { status: status.as_u16(), message })
        }
    }

    /// Fetches the first page of orders for `address`, covering all statuses (valid, temporarily invalid, invalid).
    pub async fn fetch_orders_by_owner(&self, chain: u64, address: &str) -> Result<Vec<LimitOrder>, OrderbookApiError> {
        let path = format!("/{chain}/address/{address}");
        let params = [
            ("page", OWNER_ORDERS_PAGE.to_string()),
            ("limit", OWNER_ORDERS_LIMIT.to_string()),
            ("statuses", OrderStatus::join(&OrderStatus::ALL)),
        ];
        debug!("Fetching orders for {address} on chain {chain}");
        let orders = self.rest_query::<Vec<LimitOrder>, ()>(Method::GET, &path, &params, None).await?;
        debug!("Fetched {} orders for {address} on chain {chain}", orders.len());
        Ok(orders)
    }

    pub async fn fetch_order_by_hash(&self, chain: u64, order_hash: &str) -> Result<OrderDetails, OrderbookApiError> {
        let path = format!("/{chain}/order/{order_hash}");
        debug!("Fetching order {order_hash} on chain {chain}");
        self.rest_query::<OrderDetails, ()>(Method::GET, &path, &[], None).await
    }

    pub async fn fetch_fee_info(&self, chain: u64, extension: &FeeExtension) -> Result<FeeInfo, OrderbookApiError> {
        let path = format!("/{chain}/fee-info");
        let params = extension.to_query_params();
        debug!("Fetching fee info on chain {chain} for {extension:?}");
        self.rest_query::<FeeInfo, ()>(Method::GET, &path, &params, None).await
    }

    pub async fn fetch_order_count(
        &self,
        chain: u64,
        filter: &OrderCountFilter,
    ) -> Result<OrderCount, OrderbookApiError> {
        let path = format!("/{chain}/count");
        let params = filter.to_query_params();
        debug!("Fetching order count on chain {chain} with {params:?}");
        self.rest_query::<OrderCount, ()>(Method::GET, &path, &params, None).await
    }

    pub async fn fetch_unique_active_pairs(
        &self,
        chain: u64,
        page: u32,
        limit: u32,
    ) -> Result<UniquePairsPage, OrderbookApiError> {
        let path = format!("/{chain}/unique-active-pairs");
        let params = [("page", page.to_string()), ("limit", limit.to_string())];
        debug!("Fetching unique active pairs on chain {chain}. Page {page}, limit {limit}");
        self.rest_query::<UniquePairsPage, ()>(Method::GET, &path, &params, None).await
    }

    /// Posts a signed order to the orderbook. This is not idempotent; the orderbook decides what to do with
    /// duplicates.
    pub async fn submit_order(
        &self,
        chain: u64,
        submission: &OrderSubmission,
    ) -> Result<RemoteOrderHandle, OrderbookApiError> {
        let path = format!("/{chain}");
        debug!("Submitting order {} on chain {chain}", submission.order_hash);
        let handle =
            self.rest_query::<RemoteOrderHandle, &OrderSubmission>(Method::POST, &path, &[], Some(submission)).await?;
        info!("Order {} accepted by the orderbook on chain {chain}", submission.order_hash);
        Ok(handle)
    }
}
