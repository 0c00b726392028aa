use std::time::Duration;

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use limit_order_engine::{LimitOrderApi, OrderStore, RemoteOrderSource, SqliteDatabase, DEFAULT_MAX_CONNECTIONS};
use log::*;
use orderbook_tools::OrderbookApi;

use crate::{
    config::ServerConfig,
    errors::ServerError,
    routes::{
        health,
        FeeInfoRoute,
        ListOrdersRoute,
        OrderByHashRoute,
        OrderCountRoute,
        SubmitOrderRoute,
        UniqueActivePairsRoute,
    },
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, DEFAULT_MAX_CONNECTIONS)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    if config.auto_migrate {
        db.run_migrations().await.map_err(|e| ServerError::InitializeError(e.to_string()))?;
    } else {
        info!("🚀️ Skipping database migrations");
    }
    let orderbook =
        OrderbookApi::new(config.orderbook.clone()).map_err(|e| ServerError::InitializeError(e.to_string()))?;
    info!("🚀️ Using the orderbook at {}", config.orderbook.base_url);
    let srv = create_server_instance(config, db, orderbook)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance(
    config: ServerConfig,
    db: SqliteDatabase,
    orderbook: OrderbookApi,
) -> Result<Server, ServerError> {
    // One API instance for all workers, so that every worker sees the same per-owner locks.
    let api = web::Data::new(LimitOrderApi::new(db, orderbook).with_listing_policy(config.listing_policy));
    let srv = HttpServer::new(move || {
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("los::access_log"))
            .app_data(api.clone())
            .configure(configure_extractors)
            .configure(configure_routes::<SqliteDatabase, OrderbookApi>)
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}

/// Registers every route. The fixed `/orders/...` paths must come before `/orders/{order_hash}`.
pub fn configure_routes<S, R>(cfg: &mut web::ServiceConfig)
where
    S: OrderStore + 'static,
    R: RemoteOrderSource + 'static,
{
    cfg.service(health)
        .service(FeeInfoRoute::<S, R>::new())
        .service(OrderCountRoute::<S, R>::new())
        .service(UniqueActivePairsRoute::<S, R>::new())
        .service(ListOrdersRoute::<S, R>::new())
        .service(SubmitOrderRoute::<S, R>::new())
        .service(OrderByHashRoute::<S, R>::new());
}

/// Malformed paths, queries and bodies are reported as JSON `400 Bad Request`s, like every other error.
pub fn configure_extractors(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::QueryConfig::default().error_handler(|e, _| ServerError::InvalidQuery(e.to_string()).into()),
    )
    .app_data(web::PathConfig::default().error_handler(|e, _| ServerError::InvalidRequest(e.to_string()).into()))
    .app_data(
        web::JsonConfig::default().error_handler(|e, _| ServerError::InvalidRequestBody(e.to_string()).into()),
    );
}
