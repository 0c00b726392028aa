//! # Limit order server
//! This crate hosts the HTTP gateway for the limit order engine. It is responsible for:
//! Accepting signed limit orders, forwarding them to the orderbook and recording them locally.
//! Listing an owner's orders, reconciling the local records against the orderbook on the way.
//! Passing read-only queries (order details, fees, counts, active pairs) through to the orderbook.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! The server exposes the following routes:
//! * `GET /health`: A health check route that returns a 200 OK response.
//! * `GET /orders?chain=&address=`: The owner's live orders, after reconciliation.
//! * `POST /orders?chain=`: Submit a signed order.
//! * `GET /orders/{order_hash}?chain=`: A single order.
//! * `GET /orders/fee/{chain}`: Fee parameters for a maker/taker pair and amounts.
//! * `GET /orders/count/{chain}`: The number of orders with the given statuses.
//! * `GET /orders/unique-active-pairs/{chain}`: A page of token pairs with active orders.
//!
//! Errors are returned as JSON objects with an `error` field.

pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
