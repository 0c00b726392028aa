use std::env;

use limit_order_engine::order_objects::ListingPolicy;
use log::*;
use orderbook_tools::OrderbookConfig;

const DEFAULT_LOS_HOST: &str = "127.0.0.1";
const DEFAULT_LOS_PORT: u16 = 8000;
const DEFAULT_DATABASE_URL: &str = "sqlite://data/limit_orders.db";

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// If true, pending database migrations are applied when the server starts.
    pub auto_migrate: bool,
    /// Which orders a listing returns. See [`ListingPolicy`].
    pub listing_policy: ListingPolicy,
    /// Connection details for the remote orderbook.
    pub orderbook: OrderbookConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_LOS_HOST.to_string(),
            port: DEFAULT_LOS_PORT,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            auto_migrate: true,
            listing_policy: ListingPolicy::default(),
            orderbook: OrderbookConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("LOS_HOST").ok().unwrap_or_else(|| DEFAULT_LOS_HOST.into());
        // Hosting platforms hand out the port in PORT, so it wins over LOS_PORT.
        let port = env::var("PORT")
            .map(|s| ("PORT", s))
            .or_else(|_| env::var("LOS_PORT").map(|s| ("LOS_PORT", s)))
            .map(|(name, s)| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!("🪛️ {s} is not a valid port for {name}. {e} Using the default, {DEFAULT_LOS_PORT}, instead.");
                    DEFAULT_LOS_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_LOS_PORT);
        let database_url = env::var("LOS_DATABASE_URL").ok().unwrap_or_else(|| {
            info!("🪛️ LOS_DATABASE_URL is not set. Using {DEFAULT_DATABASE_URL}");
            DEFAULT_DATABASE_URL.to_string()
        });
        let auto_migrate = env::var("LOS_AUTO_MIGRATE").map(|s| &s != "0" && &s != "false").unwrap_or(true);
        let include_unconfirmed =
            env::var("LOS_INCLUDE_UNCONFIRMED").map(|s| &s == "1" || &s == "true").unwrap_or(false);
        let listing_policy =
            if include_unconfirmed { ListingPolicy::IncludeUnconfirmed } else { ListingPolicy::ConfirmedOnly };
        if include_unconfirmed {
            info!("🪛️ Listings will include orders that were not submitted through this server");
        }
        let orderbook = OrderbookConfig::new_from_env_or_default();
        Self { host, port, database_url, auto_migrate, listing_policy, orderbook }
    }
}
