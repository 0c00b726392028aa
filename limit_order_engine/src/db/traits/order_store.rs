use std::collections::HashSet;

use thiserror::Error;

use crate::{
    db::traits::InsertOrderResult,
    db_types::{NewOrderRecord, OrderKey, OrderRecord},
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderStoreError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Could not serialize order payload: {0}")]
    Serialization(String),
}

impl From<sqlx::Error> for OrderStoreError {
    fn from(e: sqlx::Error) -> Self {
        OrderStoreError::DatabaseError(e.to_string())
    }
}

impl From<serde_json::Error> for OrderStoreError {
    fn from(e: serde_json::Error) -> Self {
        OrderStoreError::Serialization(e.to_string())
    }
}

/// Behaviour a backend must provide to hold the local record of submitted orders.
#[allow(async_fn_in_trait)]
pub trait OrderStore: Clone {
    /// The URL of the database
    fn url(&self) -> &str;

    /// The hashes of every order stored under `key`. The owner address in `key` is already normalised.
    async fn fetch_order_hashes(&self, key: &OrderKey) -> Result<HashSet<String>, OrderStoreError>;

    /// Deletes the orders under `key` whose hash is in `hashes`, in a single transaction. Either all the matching
    /// records are removed, or none are.
    ///
    /// An empty `hashes` set is a no-op and must not touch the database. Returns the number of records removed.
    async fn delete_orders_by_hash(&self, key: &OrderKey, hashes: &HashSet<String>) -> Result<u64, OrderStoreError>;

    /// Stores a newly submitted order. Inserting a record that already exists is not an error; the id of the existing
    /// record is returned as [`InsertOrderResult::AlreadyExists`].
    async fn insert_order(&self, order: NewOrderRecord) -> Result<InsertOrderResult, OrderStoreError>;

    /// All the records stored under `key`, oldest first.
    async fn fetch_orders(&self, key: &OrderKey) -> Result<Vec<OrderRecord>, OrderStoreError>;

    /// Closes the database connection.
    async fn close(&mut self) -> Result<(), OrderStoreError> {
        Ok(())
    }
}
