use std::{collections::HashSet, fmt::Debug};

use log::*;
use sqlx::SqlitePool;

use super::{db_url, new_pool, orders, SqliteDatabaseError};
use crate::{
    db::traits::{InsertOrderResult, OrderStore, OrderStoreError},
    db_types::{NewOrderRecord, OrderKey, OrderRecord},
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl OrderStore for SqliteDatabase {
    fn url(&self) -> &str {
        self.url.as_str()
    }

    async fn fetch_order_hashes(&self, key: &OrderKey) -> Result<HashSet<String>, OrderStoreError> {
        let mut conn = self.pool.acquire().await?;
        let hashes = orders::fetch_order_hashes(key, &mut conn).await?;
        Ok(hashes)
    }

    async fn delete_orders_by_hash(&self, key: &OrderKey, hashes: &HashSet<String>) -> Result<u64, OrderStoreError> {
        if hashes.is_empty() {
            return Ok(0);
        }
        let mut tx = self.pool.begin().await?;
        let deleted = orders::delete_orders_by_hash(key, hashes, &mut tx).await?;
        tx.commit().await?;
        debug!("🗃️ {deleted} stale orders removed for {key}");
        Ok(deleted)
    }

    async fn insert_order(&self, order: NewOrderRecord) -> Result<InsertOrderResult, OrderStoreError> {
        let mut tx = self.pool.begin().await?;
        let hash = order.order_hash.clone();
        let key = order.key();
        let result = orders::idempotent_insert(order, &mut tx).await?;
        tx.commit().await?;
        match result {
            InsertOrderResult::Inserted(id) => debug!("🗃️ Order {hash} for {key} has been saved with id {id}"),
            InsertOrderResult::AlreadyExists(id) => debug!("🗃️ Order {hash} for {key} already exists with id {id}"),
        }
        Ok(result)
    }

    async fn fetch_orders(&self, key: &OrderKey) -> Result<Vec<OrderRecord>, OrderStoreError> {
        let mut conn = self.pool.acquire().await?;
        let orders = orders::fetch_orders(key, &mut conn).await?;
        Ok(orders)
    }

    async fn close(&mut self) -> Result<(), OrderStoreError> {
        self.pool.close().await;
        Ok(())
    }
}

impl SqliteDatabase {
    /// Creates a new database API object using the URL in `LOS_DATABASE_URL`.
    pub async fn new(max_connections: u32) -> Result<Self, SqliteDatabaseError> {
        let url = db_url();
        SqliteDatabase::new_with_url(url.as_str(), max_connections).await
    }

    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, SqliteDatabaseError> {
        trace!("🗃️ Creating new database connection pool with url {url}");
        let pool = new_pool(url, max_connections).await?;
        let url = url.to_string();
        Ok(Self { url, pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Brings the schema up to date. Safe to call on every start-up.
    pub async fn run_migrations(&self) -> Result<(), SqliteDatabaseError> {
        sqlx::migrate!("./src/db/sqlite/migrations").run(&self.pool).await?;
        info!("🗃️ Database migrations complete");
        Ok(())
    }
}
