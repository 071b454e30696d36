//! warframe.market price lookups.
//!
//! Resolves a canonical item name to the lowest platinum price among active
//! sell orders. Every failure mode — network error, malformed response, no
//! eligible orders — collapses to "price unknown" so one slot's lookup can
//! never stall the rest of the scan.

use anyhow::Result;
use serde::Deserialize;
use std::time::Duration;

use crate::catalog::ZERO_VALUE_ITEM;

const API_BASE: &str = "https://api.warframe.market/v1";

/// One sell/buy order as returned by the orders endpoint. Only the fields
/// the price filter needs are kept; everything else in the response is
/// ignored at deserialization.
#[derive(Clone, Debug, Deserialize)]
pub struct Order {
    pub platform: String,
    pub order_type: String,
    pub platinum: u32,
    pub user: Seller,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Seller {
    pub status: String,
}

#[derive(Debug, Deserialize)]
struct OrdersResponse {
    payload: OrdersPayload,
}

#[derive(Debug, Deserialize)]
struct OrdersPayload {
    orders: Vec<Order>,
}

/// Market order source. The production implementation queries
/// warframe.market; tests substitute canned or counting fakes.
pub trait MarketApi {
    fn sell_orders(&self, slug: &str) -> Result<Vec<Order>>;
}

/// Live warframe.market client.
pub struct WarframeMarket {
    client: reqwest::blocking::Client,
}

impl WarframeMarket {
    pub fn new() -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self { client })
    }
}

impl MarketApi for WarframeMarket {
    fn sell_orders(&self, slug: &str) -> Result<Vec<Order>> {
        let url = format!("{}/items/{}/orders", API_BASE, slug);
        let response: OrdersResponse = self
            .client
            .get(&url)
            .header("User-Agent", "relic-rewards")
            .send()?
            .error_for_status()?
            .json()?;
        Ok(response.payload.orders)
    }
}

/// Converts a canonical name into the market's URL slug:
/// `NOVA PRIME BLUEPRINT` -> `nova_prime_blueprint`.
pub fn slug(name: &str) -> String {
    name.to_lowercase().replace(' ', "_")
}

/// Returns the lowest current sell price for a resolved item, or `None`
/// when it cannot be determined.
///
/// The zero-value conversion item is always worth 0 and is answered without
/// touching the API. Otherwise the minimum platinum is taken over orders on
/// the requested platform, of sell type, whose seller is not offline.
pub fn price_for<M: MarketApi + ?Sized>(api: &M, name: &str, platform: &str) -> Option<u32> {
    if name == ZERO_VALUE_ITEM {
        return Some(0);
    }

    let orders = match api.sell_orders(&slug(name)) {
        Ok(orders) => orders,
        Err(e) => {
            crate::log(&format!("Price lookup failed for {}: {}", name, e));
            return None;
        }
    };

    orders
        .iter()
        .filter(|o| {
            o.platform == platform && o.order_type == "sell" && o.user.status != "offline"
        })
        .map(|o| o.platinum)
        .min()
}
