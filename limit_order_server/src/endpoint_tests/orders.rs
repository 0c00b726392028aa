use actix_web::{http::StatusCode, test::TestRequest};
use limit_order_engine::{
    db_types::OrderKey,
    order_objects::ListingPolicy,
    test_utils::{limit_order, order_submission, random_hash, FakeOrderSource, InMemoryOrderStore},
    LimitOrderApi,
};
use orderbook_tools::OrderbookApiError;

use super::{
    helpers::{json, send_request},
    mocks::MockOrderSource,
};

const CHAIN: u64 = 1;
const OWNER: &str = "0x6b175474e89094c44da98b954eedeac495271d0f";

fn orders_uri(chain: u64, address: &str) -> String {
    format!("/orders?chain={chain}&address={address}")
}

#[actix_web::test]
async fn listing_reconciles_the_store() {
    let _ = env_logger::try_init().ok();
    let (h1, h2, h3) = (random_hash(), random_hash(), random_hash());
    let key = OrderKey::new(CHAIN, OWNER);
    let store = InMemoryOrderStore::new().with_hashes(&key, &[h1.as_str(), h3.as_str()]);
    let remote = FakeOrderSource::new().with_orders(CHAIN, OWNER, vec![limit_order(&h1, OWNER), limit_order(&h2, OWNER)]);
    let api = LimitOrderApi::new(store.clone(), remote);

    let (status, body) = send_request(api, TestRequest::get().uri(&orders_uri(CHAIN, OWNER))).await;
    assert_eq!(status, StatusCode::OK);
    let body = json(&body);
    let orders = body["orders"].as_array().unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0]["orderHash"], h1.as_str());
    assert_eq!(body["confirmed_hashes"], serde_json::json!([h1]));
    assert_eq!(body["unconfirmed_hashes"], serde_json::json!([h2]));
    assert_eq!(body["cleanup"]["status"], "deleted");
    assert_eq!(body["cleanup"]["hashes"], serde_json::json!([h3]));
    assert_eq!(store.hashes(&key), [h1].into_iter().collect::<std::collections::HashSet<String>>());
}

#[actix_web::test]
async fn listing_can_include_unconfirmed_orders() {
    let _ = env_logger::try_init().ok();
    let (h1, h2) = (random_hash(), random_hash());
    let remote = FakeOrderSource::new().with_orders(CHAIN, OWNER, vec![limit_order(&h1, OWNER), limit_order(&h2, OWNER)]);
    let api = LimitOrderApi::new(InMemoryOrderStore::new(), remote)
        .with_listing_policy(ListingPolicy::IncludeUnconfirmed);

    let (status, body) = send_request(api, TestRequest::get().uri(&orders_uri(CHAIN, OWNER))).await;
    assert_eq!(status, StatusCode::OK);
    let body = json(&body);
    assert_eq!(body["orders"].as_array().unwrap().len(), 2);
    assert_eq!(body["cleanup"]["status"], "nothing_to_delete");
}

#[actix_web::test]
async fn listing_rejects_bad_addresses_before_calling_the_orderbook() {
    let _ = env_logger::try_init().ok();
    let mut remote = MockOrderSource::new();
    remote.expect_fetch_orders_by_owner().never();
    let api = LimitOrderApi::new(InMemoryOrderStore::new(), remote);

    let (status, body) = send_request(api, TestRequest::get().uri(&orders_uri(CHAIN, "0x1234"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json(&body)["error"], "Invalid request. address must be a valid EVM address (42 characters starting with 0x)");
}

#[actix_web::test]
async fn listing_without_a_chain_is_a_bad_request() {
    let _ = env_logger::try_init().ok();
    let api = LimitOrderApi::new(InMemoryOrderStore::new(), MockOrderSource::new());
    let (status, body) = send_request(api, TestRequest::get().uri(&format!("/orders?address={OWNER}"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json(&body)["error"].as_str().unwrap().starts_with("Could not read request query"));
}

#[actix_web::test]
async fn listing_with_chain_zero_is_a_bad_request() {
    let _ = env_logger::try_init().ok();
    let api = LimitOrderApi::new(InMemoryOrderStore::new(), MockOrderSource::new());
    let (status, body) = send_request(api, TestRequest::get().uri(&orders_uri(0, OWNER))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json(&body)["error"], "Invalid request. Chain ID must be a positive integer");
}

#[actix_web::test]
async fn unreachable_orderbook_leaves_the_store_alone() {
    let _ = env_logger::try_init().ok();
    let h1 = random_hash();
    let key = OrderKey::new(CHAIN, OWNER);
    let store = InMemoryOrderStore::new().with_hashes(&key, &[h1.as_str()]);
    let mut remote = MockOrderSource::new();
    remote
        .expect_fetch_orders_by_owner()
        .times(1)
        .returning(|_, _| Err(OrderbookApiError::Unavailable("connection refused".into())));
    let api = LimitOrderApi::new(store.clone(), remote);

    let (status, body) = send_request(api, TestRequest::get().uri(&orders_uri(CHAIN, OWNER))).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json(&body)["error"], "The orderbook is unavailable. connection refused");
    assert_eq!(store.hashes(&key).len(), 1);
    assert_eq!(store.delete_calls(), 0);
}

#[actix_web::test]
async fn submitting_stores_the_order_once() {
    let _ = env_logger::try_init().ok();
    let hash = random_hash();
    let submission = order_submission(&hash, OWNER);
    let store = InMemoryOrderStore::new();
    let remote = FakeOrderSource::new();
    let api = LimitOrderApi::new(store.clone(), remote.clone());
    let req = TestRequest::post().uri(&format!("/orders?chain={CHAIN}")).set_json(&submission);
    let (status, body) = send_request(api, req).await;
    assert_eq!(status, StatusCode::CREATED);
    let body = json(&body);
    assert_eq!(body["order_hash"], hash.as_str());
    assert_eq!(body["newly_stored"], true);

    // A second submission reaches the orderbook again but finds the record already there.
    let api = LimitOrderApi::new(store.clone(), remote.clone());
    let req = TestRequest::post().uri(&format!("/orders?chain={CHAIN}")).set_json(&submission);
    let (status, body) = send_request(api, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json(&body)["newly_stored"], false);
    assert_eq!(store.len(), 1);
    assert_eq!(remote.submitted().len(), 2);
}

#[actix_web::test]
async fn rejected_submission_is_not_stored() {
    let _ = env_logger::try_init().ok();
    let store = InMemoryOrderStore::new();
    let mut remote = MockOrderSource::new();
    remote.expect_submit_order().times(1).returning(|_, _| {
        Err(OrderbookApiError::QueryError { status: 400, message: "Invalid signature".into() })
    });
    let api = LimitOrderApi::new(store.clone(), remote);
    let req = TestRequest::post()
        .uri(&format!("/orders?chain={CHAIN}"))
        .set_json(order_submission(&random_hash(), OWNER));

    let (status, body) = send_request(api, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json(&body)["error"], "The orderbook rejected the request. Invalid signature");
    assert!(store.is_empty());
    assert_eq!(store.insert_calls(), 0);
}

#[actix_web::test]
async fn malformed_submission_never_reaches_the_orderbook() {
    let _ = env_logger::try_init().ok();
    let mut remote = MockOrderSource::new();
    remote.expect_submit_order().never();
    let api = LimitOrderApi::new(InMemoryOrderStore::new(), remote);
    let req = TestRequest::post()
        .uri(&format!("/orders?chain={CHAIN}"))
        .set_json(order_submission("0xnot-a-hash", OWNER));
    let (status, body) = send_request(api, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json(&body)["error"], "Invalid request. orderHash must be a valid 66-character hash starting with 0x");

    let api = LimitOrderApi::new(InMemoryOrderStore::new(), MockOrderSource::new());
    let req = TestRequest::post()
        .uri(&format!("/orders?chain={CHAIN}"))
        .set_json(serde_json::json!({ "orderHash": random_hash() }));
    let (status, body) = send_request(api, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json(&body)["error"].as_str().unwrap().starts_with("Could not read request body"));
}

#[actix_web::test]
async fn stored_failure_after_remote_accept_is_flagged() {
    let _ = env_logger::try_init().ok();
    let hash = random_hash();
    let store = InMemoryOrderStore::new();
    store.fail_inserts_with("database is locked");
    let remote = FakeOrderSource::new();
    let api = LimitOrderApi::new(store.clone(), remote.clone());
    let req = TestRequest::post().uri(&format!("/orders?chain={CHAIN}")).set_json(order_submission(&hash, OWNER));

    let (status, body) = send_request(api, req).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let body = json(&body);
    assert_eq!(body["remote_submitted"], true);
    assert_eq!(body["order_hash"], hash.as_str());
    assert_eq!(remote.submitted().len(), 1);
    assert!(store.is_empty());
}
