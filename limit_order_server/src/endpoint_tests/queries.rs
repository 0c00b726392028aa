use std::collections::HashMap;

use actix_web::{http::StatusCode, test::TestRequest};
use limit_order_engine::{
    test_utils::{limit_order, random_hash, FakeOrderSource, InMemoryOrderStore, USDC, WETH},
    LimitOrderApi,
};
use orderbook_tools::{FeeInfo, OrderCount, OrderStatus, OrderbookApiError, PageMeta, UniquePairsPage};

use super::{
    helpers::{json, send_request},
    mocks::MockOrderSource,
};

const CHAIN: u64 = 56;
const OWNER: &str = "0x6b175474e89094c44da98b954eedeac495271d0f";

#[actix_web::test]
async fn fetch_order_by_hash() {
    let _ = env_logger::try_init().ok();
    let hash = random_hash();
    let remote = FakeOrderSource::new().with_orders(CHAIN, OWNER, vec![limit_order(&hash, OWNER)]);
    let api = LimitOrderApi::new(InMemoryOrderStore::new(), remote);
    let (status, body) = send_request(api, TestRequest::get().uri(&format!("/orders/{hash}?chain={CHAIN}"))).await;
    assert_eq!(status, StatusCode::OK);
    let body = json(&body);
    assert_eq!(body["orderHash"], hash.as_str());
    assert_eq!(body["orderStatus"], 1);
}

#[actix_web::test]
async fn unknown_order_passes_the_orderbook_status_through() {
    let _ = env_logger::try_init().ok();
    let api = LimitOrderApi::new(InMemoryOrderStore::new(), FakeOrderSource::new());
    let uri = format!("/orders/{}?chain={CHAIN}", random_hash());
    let (status, body) = send_request(api, TestRequest::get().uri(&uri)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json(&body)["error"], "The orderbook rejected the request. Order not found");
}

#[actix_web::test]
async fn orderbook_server_errors_are_bad_gateways() {
    let _ = env_logger::try_init().ok();
    let mut remote = MockOrderSource::new();
    remote
        .expect_fetch_order_by_hash()
        .returning(|_, _| Err(OrderbookApiError::QueryError { status: 500, message: "Internal error".into() }));
    let api = LimitOrderApi::new(InMemoryOrderStore::new(), remote);
    let uri = format!("/orders/{}?chain={CHAIN}", random_hash());
    let (status, _) = send_request(api, TestRequest::get().uri(&uri)).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
}

#[actix_web::test]
async fn fee_info_forwards_the_parameters() {
    let _ = env_logger::try_init().ok();
    let mut remote = MockOrderSource::new();
    remote
        .expect_fetch_fee_info()
        .withf(|chain, ext| {
            *chain == CHAIN &&
                ext.maker_asset == WETH &&
                ext.taker_asset == USDC &&
                ext.maker_amount == 1_000_000_000_000_000_000 &&
                ext.taker_amount == 2_500_000_000
        })
        .times(1)
        .returning(|_, _| {
            Ok(FeeInfo {
                whitelist: HashMap::new(),
                fee_bps: 30,
                whitelist_discount_percent: 0,
                protocol_fee_receiver: OWNER.to_string(),
                extension_address: OWNER.to_string(),
            })
        });
    let api = LimitOrderApi::new(InMemoryOrderStore::new(), remote);
    let uri = format!(
        "/orders/fee/{CHAIN}?makerAsset={WETH}&takerAsset={USDC}&makerAmount=1000000000000000000&takerAmount=2500000000"
    );
    let (status, body) = send_request(api, TestRequest::get().uri(&uri)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json(&body)["feeBps"], 30);
}

#[actix_web::test]
async fn fee_info_rejects_zero_amounts() {
    let _ = env_logger::try_init().ok();
    let mut remote = MockOrderSource::new();
    remote.expect_fetch_fee_info().never();
    let api = LimitOrderApi::new(InMemoryOrderStore::new(), remote);
    let uri = format!("/orders/fee/{CHAIN}?makerAsset={WETH}&takerAsset={USDC}&makerAmount=0&takerAmount=1");
    let (status, body) = send_request(api, TestRequest::get().uri(&uri)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json(&body)["error"], "Invalid request. makerAmount must be a positive integer");
}

#[actix_web::test]
async fn non_numeric_chain_is_a_bad_request() {
    let _ = env_logger::try_init().ok();
    let api = LimitOrderApi::new(InMemoryOrderStore::new(), MockOrderSource::new());
    let (status, body) = send_request(api, TestRequest::get().uri("/orders/count/mainnet?statuses=1")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json(&body)["error"].is_string());
}

#[actix_web::test]
async fn order_count_requires_statuses() {
    let _ = env_logger::try_init().ok();
    let mut remote = MockOrderSource::new();
    remote.expect_fetch_order_count().never();
    let api = LimitOrderApi::new(InMemoryOrderStore::new(), remote);
    let (status, body) = send_request(api, TestRequest::get().uri(&format!("/orders/count/{CHAIN}"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json(&body)["error"], "Invalid request. Statuses parameter is required");
}

#[actix_web::test]
async fn order_count_with_filters() {
    let _ = env_logger::try_init().ok();
    let mut remote = MockOrderSource::new();
    remote
        .expect_fetch_order_count()
        .withf(|chain, filter| {
            *chain == CHAIN &&
                filter.statuses == [OrderStatus::Valid, OrderStatus::TemporarilyInvalid] &&
                filter.taker_asset.as_deref() == Some(USDC) &&
                filter.maker_asset.is_none()
        })
        .times(1)
        .returning(|_, _| Ok(OrderCount { count: 42 }));
    let api = LimitOrderApi::new(InMemoryOrderStore::new(), remote);
    let uri = format!("/orders/count/{CHAIN}?statuses=1,2&taker_asset={USDC}");
    let (status, body) = send_request(api, TestRequest::get().uri(&uri)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json(&body)["count"], 42);
}

#[actix_web::test]
async fn unique_pairs_use_default_paging() {
    let _ = env_logger::try_init().ok();
    let mut remote = MockOrderSource::new();
    remote
        .expect_fetch_unique_active_pairs()
        .withf(|chain, page, limit| *chain == CHAIN && *page == 1 && *limit == 100)
        .times(1)
        .returning(|_, page, limit| {
            Ok(UniquePairsPage {
                meta: PageMeta { total_items: 0, current_page: page, items_per_page: limit, total_pages: 0 },
                items: vec![],
            })
        });
    let api = LimitOrderApi::new(InMemoryOrderStore::new(), remote);
    let uri = format!("/orders/unique-active-pairs/{CHAIN}");
    let (status, body) = send_request(api, TestRequest::get().uri(&uri)).await;
    assert_eq!(status, StatusCode::OK);
    let body = json(&body);
    assert_eq!(body["meta"]["currentPage"], 1);
    assert_eq!(body["meta"]["itemsPerPage"], 100);
}

#[actix_web::test]
async fn unique_pairs_limit_is_capped() {
    let _ = env_logger::try_init().ok();
    let mut remote = MockOrderSource::new();
    remote.expect_fetch_unique_active_pairs().never();
    let api = LimitOrderApi::new(InMemoryOrderStore::new(), remote);
    let uri = format!("/orders/unique-active-pairs/{CHAIN}?page=2&limit=101");
    let (status, body) = send_request(api, TestRequest::get().uri(&uri)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json(&body)["error"].as_str().unwrap().contains("between 1 and 100"));
}
