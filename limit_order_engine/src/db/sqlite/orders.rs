use std::collections::HashSet;

use log::{debug, trace};
use sqlx::{QueryBuilder, Sqlite, SqliteConnection};

use crate::{
    db::{sqlite::SqliteDatabaseError, traits::InsertOrderResult},
    db_types::{NewOrderRecord, OrderKey, OrderRecord},
};

/// SQLite integers are signed. Chain ids are small in practice, but don't silently wrap the ones that aren't.
pub fn chain_id_param(chain_id: u64) -> Result<i64, SqliteDatabaseError> {
    i64::try_from(chain_id).map_err(|_| SqliteDatabaseError::ChainIdOutOfRange(chain_id))
}

/// Inserts the order unless a record with the same chain, owner and hash already exists. Relies on the unique index
/// over those columns, so concurrent inserts of the same order cannot both succeed.
pub async fn idempotent_insert(
    order: NewOrderRecord,
    conn: &mut SqliteConnection,
) -> Result<InsertOrderResult, SqliteDatabaseError> {
    let chain_id = chain_id_param(order.chain_id)?;
    let inserted = sqlx::query_scalar::<_, i64>(
        r#"
            INSERT INTO limit_orders (chain_id, owner_address, order_hash, payload)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (chain_id, owner_address, order_hash) DO NOTHING
            RETURNING id;
        "#,
    )
    .bind(chain_id)
    .bind(order.owner.as_str())
    .bind(order.order_hash.as_str())
    .bind(order.payload.as_str())
    .fetch_optional(&mut *conn)
    .await?;
    if let Some(id) = inserted {
        trace!("🗃️ Order {} inserted with id {id}", order.order_hash);
        return Ok(InsertOrderResult::Inserted(id));
    }
    match order_exists(&order.key(), &order.order_hash, conn).await? {
        Some(id) => Ok(InsertOrderResult::AlreadyExists(id)),
        None => Err(SqliteDatabaseError::QueryError(format!(
            "Order {} was neither inserted nor found for {}",
            order.order_hash,
            order.key()
        ))),
    }
}

/// Checks whether the order already exists in the database. If it does exist, the `id` of the record is returned.
pub async fn order_exists(
    key: &OrderKey,
    order_hash: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<i64>, SqliteDatabaseError> {
    let chain_id = chain_id_param(key.chain_id)?;
    let id = sqlx::query_scalar::<_, i64>(
        "SELECT id FROM limit_orders WHERE chain_id = $1 AND owner_address = $2 AND order_hash = $3",
    )
    .bind(chain_id)
    .bind(key.owner.as_str())
    .bind(order_hash)
    .fetch_optional(conn)
    .await?;
    Ok(id)
}

pub async fn fetch_order_hashes(
    key: &OrderKey,
    conn: &mut SqliteConnection,
) -> Result<HashSet<String>, SqliteDatabaseError> {
    let chain_id = chain_id_param(key.chain_id)?;
    let hashes =
        sqlx::query_scalar::<_, String>("SELECT order_hash FROM limit_orders WHERE chain_id = $1 AND owner_address = $2")
            .bind(chain_id)
            .bind(key.owner.as_str())
            .fetch_all(conn)
            .await?;
    trace!("🗃️ {} stored orders for {key}", hashes.len());
    Ok(hashes.into_iter().collect())
}

/// Deletes the given orders for `key` with a single statement. Does not open its own transaction; pass `&mut *tx` to
/// make it atomic with other work.
pub async fn delete_orders_by_hash(
    key: &OrderKey,
    hashes: &HashSet<String>,
    conn: &mut SqliteConnection,
) -> Result<u64, SqliteDatabaseError> {
    if hashes.is_empty() {
        return Ok(0);
    }
    let chain_id = chain_id_param(key.chain_id)?;
    let mut builder = QueryBuilder::<Sqlite>::new("DELETE FROM limit_orders WHERE chain_id = ");
    builder.push_bind(chain_id);
    builder.push(" AND owner_address = ");
    builder.push_bind(key.owner.as_str());
    builder.push(" AND order_hash IN (");
    let mut separated = builder.separated(", ");
    for hash in hashes {
        separated.push_bind(hash.as_str());
    }
    separated.push_unseparated(")");
    trace!("🗃️ Executing query: {}", builder.sql());
    let result = builder.build().execute(conn).await?;
    debug!("🗃️ Deleted {} of {} orders for {key}", result.rows_affected(), hashes.len());
    Ok(result.rows_affected())
}

/// Fetches the full records stored for `key`, oldest first.
pub async fn fetch_orders(key: &OrderKey, conn: &mut SqliteConnection) -> Result<Vec<OrderRecord>, SqliteDatabaseError> {
    let chain_id = chain_id_param(key.chain_id)?;
    let orders = sqlx::query_as::<_, OrderRecord>(
        r#"
            SELECT id, chain_id, owner_address, order_hash, payload, created_at
            FROM limit_orders
            WHERE chain_id = $1 AND owner_address = $2
            ORDER BY created_at ASC, id ASC;
        "#,
    )
    .bind(chain_id)
    .bind(key.owner.as_str())
    .fetch_all(conn)
    .await?;
    Ok(orders)
}
