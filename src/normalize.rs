//! Normalization of raw endpoint payloads into flat row collections
//!
//! Two payload shapes come back from the API: flat lists, which deserialize
//! directly into row vectors, and per-symbol groups carrying a nested
//! `history` array. Grouped payloads flatten to one row per (symbol, point)
//! with the parent symbol tagged onto every row. Market listings
//! additionally get the exchange reference metadata left-joined on exchange
//! code.

use std::collections::HashMap;

use serde::Deserialize;

use crate::types::{
    Exchange, FutureMarket, LiquidationPoint, LongShortRatioPoint, OhlcPoint, OhlcvBar, SpotMarket,
};

/// Per-symbol group wrapping a nested history array.
#[derive(Debug, Deserialize)]
pub(crate) struct GroupedHistory<P> {
    pub symbol: String,
    pub history: Vec<P>,
}

/// Rows flattened out of a grouped payload carry their parent symbol.
pub(crate) trait SymbolRow {
    fn tag_symbol(&mut self, symbol: &str);
}

impl SymbolRow for OhlcPoint {
    fn tag_symbol(&mut self, symbol: &str) {
        self.symbol = symbol.to_string();
    }
}

impl SymbolRow for LiquidationPoint {
    fn tag_symbol(&mut self, symbol: &str) {
        self.symbol = symbol.to_string();
    }
}

impl SymbolRow for LongShortRatioPoint {
    fn tag_symbol(&mut self, symbol: &str) {
        self.symbol = symbol.to_string();
    }
}

impl SymbolRow for OhlcvBar {
    fn tag_symbol(&mut self, symbol: &str) {
        self.symbol = symbol.to_string();
    }
}

/// Flatten per-symbol groups into one row per (symbol, history point).
/// Groups with an empty history contribute no rows.
pub(crate) fn flatten_history<P: SymbolRow>(groups: Vec<GroupedHistory<P>>) -> Vec<P> {
    let mut rows = Vec::new();
    for group in groups {
        let GroupedHistory { symbol, history } = group;
        for mut point in history {
            point.tag_symbol(&symbol);
            rows.push(point);
        }
    }
    rows
}

/// Market listings that can take the exchange-metadata join.
pub(crate) trait MarketRow {
    fn exchange_code(&self) -> &str;
    fn attach_exchange(&mut self, meta: Option<Exchange>);
}

impl MarketRow for SpotMarket {
    fn exchange_code(&self) -> &str {
        &self.exchange_code
    }

    fn attach_exchange(&mut self, meta: Option<Exchange>) {
        self.exchange = meta;
    }
}

impl MarketRow for FutureMarket {
    fn exchange_code(&self) -> &str {
        &self.exchange_code
    }

    fn attach_exchange(&mut self, meta: Option<Exchange>) {
        self.exchange = meta;
    }
}

/// Left-join exchange metadata onto market rows by exchange code. Rows with
/// an unknown code keep `None`; the row count is never changed.
pub(crate) fn join_exchanges<R: MarketRow>(rows: &mut [R], exchanges: &[Exchange]) {
    let by_code: HashMap<&str, &Exchange> = exchanges
        .iter()
        .map(|exchange| (exchange.code.as_str(), exchange))
        .collect();

    for row in rows {
        let meta = by_code.get(row.exchange_code()).map(|&e| e.clone());
        row.attach_exchange(meta);
    }
}
