//! Request handler definitions
//!
//! Define each route and it handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module neat and tidy 🙏
//!
//! A note about performance:
//! Since each worker thread processes its requests sequentially, handlers which block the current thread will cause the
//! current worker to stop processing new requests. Every handler here awaits the orderbook and the database, so keep
//! it that way: no blocking calls in handlers.
use actix_web::{get, http::StatusCode, web, HttpResponse, Responder};
use limit_order_engine::{LimitOrderApi, OrderStore, RemoteOrderSource};
use log::*;
use orderbook_tools::{FeeExtension, OrderCountFilter, OrderSubmission};

use crate::{
    data_objects::{ChainQuery, CountQuery, FeeQuery, OrdersQuery, PairsQuery},
    errors::ServerError,
};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

type Api<S, R> = web::Data<LimitOrderApi<S, R>>;

#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------   Listing  ----------------------------------------------------
route!(list_orders => Get "/orders" impl OrderStore, RemoteOrderSource);
/// Lists an owner's live orders and evicts local records the orderbook has dropped.
///
/// Query parameters: `chain` and `address`. The response carries the selected orders along with the confirmed and
/// unconfirmed hashes and the outcome of the clean-up.
pub async fn list_orders<S: OrderStore, R: RemoteOrderSource>(
    query: web::Query<OrdersQuery>,
    api: Api<S, R>,
) -> Result<HttpResponse, ServerError> {
    let OrdersQuery { chain, address } = query.into_inner();
    debug!("💻️ GET orders for {address} on chain {chain}");
    let result = api.fetch_and_reconcile_orders(chain, &address).await?;
    Ok(HttpResponse::Ok().json(result))
}

//----------------------------------------------  Submission  --------------------------------------------------
route!(submit_order => Post "/orders" impl OrderStore, RemoteOrderSource);
/// Submits a signed order to the orderbook and records it locally.
///
/// Returns `201 Created` the first time an order is stored and `200 OK` if it was already on record.
pub async fn submit_order<S: OrderStore, R: RemoteOrderSource>(
    query: web::Query<ChainQuery>,
    body: web::Json<OrderSubmission>,
    api: Api<S, R>,
) -> Result<HttpResponse, ServerError> {
    let chain = query.chain;
    let submission = body.into_inner();
    debug!("💻️ POST order {} on chain {chain}", submission.order_hash);
    let result = api.submit_order(chain, submission).await?;
    let status = if result.newly_stored { StatusCode::CREATED } else { StatusCode::OK };
    Ok(HttpResponse::build(status).json(result))
}

//----------------------------------------------   Queries  ----------------------------------------------------
route!(order_by_hash => Get "/orders/{order_hash}" impl OrderStore, RemoteOrderSource);
pub async fn order_by_hash<S: OrderStore, R: RemoteOrderSource>(
    path: web::Path<String>,
    query: web::Query<ChainQuery>,
    api: Api<S, R>,
) -> Result<HttpResponse, ServerError> {
    let order_hash = path.into_inner();
    debug!("💻️ GET order {order_hash} on chain {}", query.chain);
    let order = api.fetch_order_by_hash(query.chain, &order_hash).await?;
    Ok(HttpResponse::Ok().json(order))
}

route!(fee_info => Get "/orders/fee/{chain}" impl OrderStore, RemoteOrderSource);
pub async fn fee_info<S: OrderStore, R: RemoteOrderSource>(
    path: web::Path<u64>,
    query: web::Query<FeeQuery>,
    api: Api<S, R>,
) -> Result<HttpResponse, ServerError> {
    let chain = path.into_inner();
    debug!("💻️ GET fee info on chain {chain}");
    let extension = FeeExtension::try_from(query.into_inner()).map_err(|e| ServerError::InvalidRequest(e.to_string()))?;
    let info = api.fetch_fee_info(chain, &extension).await?;
    Ok(HttpResponse::Ok().json(info))
}

route!(order_count => Get "/orders/count/{chain}" impl OrderStore, RemoteOrderSource);
pub async fn order_count<S: OrderStore, R: RemoteOrderSource>(
    path: web::Path<u64>,
    query: web::Query<CountQuery>,
    api: Api<S, R>,
) -> Result<HttpResponse, ServerError> {
    let chain = path.into_inner();
    debug!("💻️ GET order count on chain {chain}");
    let filter =
        OrderCountFilter::try_from(query.into_inner()).map_err(|e| ServerError::InvalidRequest(e.to_string()))?;
    let count = api.fetch_order_count(chain, &filter).await?;
    Ok(HttpResponse::Ok().json(count))
}

route!(unique_active_pairs => Get "/orders/unique-active-pairs/{chain}" impl OrderStore, RemoteOrderSource);
pub async fn unique_active_pairs<S: OrderStore, R: RemoteOrderSource>(
    path: web::Path<u64>,
    query: web::Query<PairsQuery>,
    api: Api<S, R>,
) -> Result<HttpResponse, ServerError> {
    let chain = path.into_inner();
    let PairsQuery { page, limit } = query.into_inner();
    debug!("💻️ GET unique active pairs on chain {chain} (page {page}, limit {limit})");
    let pairs = api.fetch_unique_active_pairs(chain, page, limit).await?;
    Ok(HttpResponse::Ok().json(pairs))
}
