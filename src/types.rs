//! Typed rows for each Coinalyze endpoint
//!
//! Wire payloads use abbreviated field codes; the serde rename attributes
//! here map them to descriptive names during deserialization. Epoch fields
//! convert straight into UTC instants: `t` carries seconds, `update` and
//! `expire_at` carry milliseconds. Metric fields are best-effort: a key the
//! server leaves out deserializes to `None` rather than failing the row.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Exchange reference metadata, one row per exchange code.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Exchange {
    pub code: String,
    pub name: String,
}

/// Spot market listing entry.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SpotMarket {
    pub symbol: String,
    #[serde(rename(deserialize = "exchange"))]
    pub exchange_code: String,
    pub symbol_on_exchange: String,
    pub base_asset: String,
    pub quote_asset: String,
    #[serde(default)]
    pub has_buy_sell_data: Option<bool>,
    /// Reference metadata attached by the exchange join; `None` when the
    /// code has no entry in `/exchanges`.
    #[serde(skip_deserializing)]
    pub exchange: Option<Exchange>,
}

/// Futures market listing entry.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FutureMarket {
    pub symbol: String,
    #[serde(rename(deserialize = "exchange"))]
    pub exchange_code: String,
    pub symbol_on_exchange: String,
    pub base_asset: String,
    pub quote_asset: String,
    pub is_perpetual: bool,
    #[serde(default)]
    pub margined: Option<String>,
    /// Settlement instant for dated contracts; perpetuals have none.
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub expire_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub oi_lq_vol_denominated_in: Option<String>,
    #[serde(default)]
    pub has_long_short_ratio_data: Option<bool>,
    #[serde(default)]
    pub has_ohlcv_data: Option<bool>,
    #[serde(skip_deserializing)]
    pub exchange: Option<Exchange>,
}

/// Current open interest for one symbol.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OpenInterest {
    pub symbol: String,
    #[serde(default)]
    pub value: Option<f64>,
    /// Server-side refresh instant.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub update: DateTime<Utc>,
}

/// Current or predicted funding rate for one symbol.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FundingRate {
    pub symbol: String,
    #[serde(default)]
    pub value: Option<f64>,
    /// Server-side refresh instant.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub update: DateTime<Utc>,
}

/// OHLC aggregate of a metric (open interest or funding rate) over one
/// interval bucket.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OhlcPoint {
    #[serde(skip_deserializing)]
    pub symbol: String,
    #[serde(rename(deserialize = "t"), with = "chrono::serde::ts_seconds")]
    pub timestamp: DateTime<Utc>,
    #[serde(default, rename(deserialize = "o"))]
    pub open: Option<f64>,
    #[serde(default, rename(deserialize = "h"))]
    pub high: Option<f64>,
    #[serde(default, rename(deserialize = "l"))]
    pub low: Option<f64>,
    #[serde(default, rename(deserialize = "c"))]
    pub close: Option<f64>,
}

/// Liquidated volume over one interval bucket.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LiquidationPoint {
    #[serde(skip_deserializing)]
    pub symbol: String,
    #[serde(rename(deserialize = "t"), with = "chrono::serde::ts_seconds")]
    pub timestamp: DateTime<Utc>,
    #[serde(default, rename(deserialize = "l"))]
    pub longs: Option<f64>,
    #[serde(default, rename(deserialize = "s"))]
    pub shorts: Option<f64>,
}

/// Long/short position ratio over one interval bucket.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LongShortRatioPoint {
    #[serde(skip_deserializing)]
    pub symbol: String,
    #[serde(rename(deserialize = "t"), with = "chrono::serde::ts_seconds")]
    pub timestamp: DateTime<Utc>,
    #[serde(default, rename(deserialize = "r"))]
    pub ratio: Option<f64>,
    #[serde(default, rename(deserialize = "l"))]
    pub longs: Option<f64>,
    #[serde(default, rename(deserialize = "s"))]
    pub shorts: Option<f64>,
}

/// Price candlestick with volume and trade counts.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OhlcvBar {
    #[serde(skip_deserializing)]
    pub symbol: String,
    #[serde(rename(deserialize = "t"), with = "chrono::serde::ts_seconds")]
    pub timestamp: DateTime<Utc>,
    #[serde(default, rename(deserialize = "o"))]
    pub open: Option<f64>,
    #[serde(default, rename(deserialize = "h"))]
    pub high: Option<f64>,
    #[serde(default, rename(deserialize = "l"))]
    pub low: Option<f64>,
    #[serde(default, rename(deserialize = "c"))]
    pub close: Option<f64>,
    #[serde(default, rename(deserialize = "v"))]
    pub volume: Option<f64>,
    #[serde(default, rename(deserialize = "bv"))]
    pub buy_volume: Option<f64>,
    #[serde(default, rename(deserialize = "tx"))]
    pub total_trades: Option<u64>,
    #[serde(default, rename(deserialize = "btx"))]
    pub buy_trades: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_seconds_epoch_becomes_utc_instant() {
        let point: OhlcPoint =
            serde_json::from_str(r#"{"t":1700000000,"o":1.0,"h":2.0,"l":0.5,"c":1.5}"#).unwrap();
        assert_eq!(
            point.timestamp,
            Utc.with_ymd_and_hms(2023, 11, 14, 22, 13, 20).unwrap()
        );
        assert_eq!(point.symbol, "");
    }

    #[test]
    fn test_millisecond_epoch_becomes_utc_instant() {
        let oi: OpenInterest = serde_json::from_str(
            r#"{"symbol":"BTCUSDT_PERP.A","value":1234.5,"update":1700000000000}"#,
        )
        .unwrap();
        assert_eq!(
            oi.update,
            Utc.with_ymd_and_hms(2023, 11, 14, 22, 13, 20).unwrap()
        );
        assert_eq!(oi.value, Some(1234.5));
    }

    #[test]
    fn test_missing_metric_fields_become_none() {
        let point: OhlcPoint = serde_json::from_str(r#"{"t":1700000000,"o":1.0}"#).unwrap();
        assert_eq!(point.open, Some(1.0));
        assert!(point.high.is_none());
        assert!(point.low.is_none());
        assert!(point.close.is_none());

        let bar: OhlcvBar = serde_json::from_str(
            r#"{"t":1700000000,"o":35000.0,"h":35100.0,"l":34900.0,"c":35050.0}"#,
        )
        .unwrap();
        assert_eq!(bar.close, Some(35050.0));
        assert!(bar.volume.is_none());
        assert!(bar.buy_volume.is_none());
        assert!(bar.total_trades.is_none());
        assert!(bar.buy_trades.is_none());

        let oi: OpenInterest =
            serde_json::from_str(r#"{"symbol":"BTCUSDT_PERP.A","update":1700000000000}"#).unwrap();
        assert!(oi.value.is_none());

        let ratio: LongShortRatioPoint = serde_json::from_str(r#"{"t":1700000000}"#).unwrap();
        assert!(ratio.ratio.is_none());
        assert!(ratio.longs.is_none());
        assert!(ratio.shorts.is_none());
    }

    #[test]
    fn test_future_market_expiry_is_optional() {
        let perpetual: FutureMarket = serde_json::from_str(
            r#"{
                "symbol": "BTCUSDT_PERP.A",
                "exchange": "A",
                "symbol_on_exchange": "BTCUSDT",
                "base_asset": "BTC",
                "quote_asset": "USDT",
                "is_perpetual": true
            }"#,
        )
        .unwrap();
        assert_eq!(perpetual.exchange_code, "A");
        assert!(perpetual.expire_at.is_none());
        assert!(perpetual.exchange.is_none());

        let dated: FutureMarket = serde_json::from_str(
            r#"{
                "symbol": "BTCUSD.Dec24.6",
                "exchange": "6",
                "symbol_on_exchange": "BTCUSD_241227",
                "base_asset": "BTC",
                "quote_asset": "USD",
                "is_perpetual": false,
                "expire_at": 1735286400000
            }"#,
        )
        .unwrap();
        assert_eq!(
            dated.expire_at,
            Some(Utc.with_ymd_and_hms(2024, 12, 27, 8, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_spot_market_tolerates_missing_optional_fields() {
        let market: SpotMarket = serde_json::from_str(
            r#"{
                "symbol": "BTCUSDT.A",
                "exchange": "A",
                "symbol_on_exchange": "BTCUSDT",
                "base_asset": "BTC",
                "quote_asset": "USDT"
            }"#,
        )
        .unwrap();
        assert!(market.has_buy_sell_data.is_none());
    }
}
