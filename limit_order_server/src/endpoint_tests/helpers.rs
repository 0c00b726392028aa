use actix_web::{body::MessageBody, http::StatusCode, test, test::TestRequest, web, App};
use limit_order_engine::{test_utils::InMemoryOrderStore, LimitOrderApi, RemoteOrderSource};
use log::debug;

use crate::server::{configure_extractors, configure_routes};

/// Sends `req` to an app that serves every route from `api`, and returns the status and body.
pub async fn send_request<R>(api: LimitOrderApi<InMemoryOrderStore, R>, req: TestRequest) -> (StatusCode, String)
where R: RemoteOrderSource + 'static {
    let app = App::new()
        .app_data(web::Data::new(api))
        .configure(configure_extractors)
        .configure(configure_routes::<InMemoryOrderStore, R>);
    let service = test::init_service(app).await;
    debug!("Making request");
    let res = test::call_service(&service, req.to_request()).await;
    let status = res.status();
    let body = String::from_utf8_lossy(&res.into_body().try_into_bytes().unwrap()).into_owned();
    (status, body)
}

pub fn json(body: &str) -> serde_json::Value {
    serde_json::from_str(body).unwrap_or_else(|e| panic!("Response is not JSON ({e}): {body}"))
}
