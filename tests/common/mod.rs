//! Shared fixtures for the mock market server

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use steam_pricehistory::steam::{Requester, SessionContext, Throttle};
use wiremock::MockServer;

pub const CREDENTIAL: &str = "76561198000000000%7C%7Ctoken";

pub fn session(server: &MockServer) -> SessionContext {
    SessionContext::new(Some(CREDENTIAL.to_string()))
        .unwrap()
        .with_base_url(server.uri())
        .unwrap()
}

/// A requester against `server` that does not throttle.
pub fn requester(server: &MockServer) -> Requester {
    throttled_requester(server, Duration::ZERO)
}

pub fn throttled_requester(server: &MockServer, interval: Duration) -> Requester {
    Requester::new(Arc::new(session(server)), Arc::new(Throttle::new(interval)))
}

pub fn item_names(prefix: &str, range: std::ops::Range<usize>) -> Vec<String> {
    range.map(|i| format!("{prefix} {i:03}")).collect()
}

/// A successful search page in the shape the market returns with `norender=1`.
pub fn search_page(start: usize, names: &[String], total_count: usize) -> serde_json::Value {
    let results: Vec<_> = names
        .iter()
        .map(|name| {
            json!({
                "name": name,
                "hash_name": name,
                "sell_listings": 42,
                "sell_price": 31,
                "sell_price_text": "0,31 pуб.",
                "app_icon": "https://cdn.example/app.jpg",
                "app_name": "Counter-Strike 2",
                "asset_description": { "appid": 730, "market_hash_name": name }
            })
        })
        .collect();

    json!({
        "success": true,
        "start": start,
        "pagesize": names.len(),
        "total_count": total_count,
        "searchdata": {
            "query": "",
            "search_descriptions": false,
            "total_count": total_count,
            "pagesize": names.len(),
            "prefix": "searchResults",
            "class_prefix": "market"
        },
        "results": results
    })
}

pub fn history_body(prices: serde_json::Value) -> serde_json::Value {
    json!({
        "success": true,
        "price_prefix": "",
        "price_suffix": " pуб.",
        "prices": prices
    })
}
