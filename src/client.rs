//! Coinalyze API client
//!
//! Every endpoint method is a thin composition: build query parameters from
//! typed arguments, issue one blocking GET through the transport, normalize
//! the payload. Calls block until the HTTP round-trip completes; callers
//! needing concurrency should use one client per thread.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::cache::TtlCache;
use crate::errors::ClientError;
use crate::normalize::{flatten_history, join_exchanges, GroupedHistory};
use crate::transport::{Param, Transport};
use crate::types::{
    Exchange, FundingRate, FutureMarket, LiquidationPoint, LongShortRatioPoint, OhlcPoint,
    OhlcvBar, OpenInterest, SpotMarket,
};

/// Production API root.
pub const DEFAULT_BASE_URL: &str = "https://api.coinalyze.net/v1";

/// Interval token used when the caller has no granularity preference.
pub const DEFAULT_INTERVAL: &str = "1min";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
const EXCHANGE_CACHE_TTL: Duration = Duration::from_secs(3600);

/// Connection settings for [`CoinalyzeClient`].
#[derive(Clone)]
pub struct ClientConfig {
    pub api_key: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

// The API key is a secret; keep it out of debug output.
impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Blocking client for the Coinalyze market-data API.
pub struct CoinalyzeClient {
    transport: Transport,
    exchange_cache: TtlCache<Vec<Exchange>>,
}

impl CoinalyzeClient {
    /// Client against the production API with default settings.
    pub fn new(api_key: impl Into<String>) -> Result<Self, ClientError> {
        Self::with_config(ClientConfig::new(api_key))
    }

    pub fn with_config(config: ClientConfig) -> Result<Self, ClientError> {
        Ok(Self {
            transport: Transport::new(&config)?,
            exchange_cache: TtlCache::new(EXCHANGE_CACHE_TTL),
        })
    }

    /// Exchange reference metadata. Fetched at most once per cache window;
    /// callers inside the window share the stored listing.
    pub fn exchanges(&self) -> Result<Vec<Exchange>, ClientError> {
        self.exchange_cache.get_or_refresh(|| {
            debug!("refreshing exchange metadata");
            self.transport.get("/exchanges", &[])
        })
    }

    /// Spot market listing with exchange metadata joined in.
    pub fn spot_markets(&self) -> Result<Vec<SpotMarket>, ClientError> {
        let mut markets: Vec<SpotMarket> = self.transport.get("/spot-markets", &[])?;
        join_exchanges(&mut markets, &self.exchanges()?);
        Ok(markets)
    }

    /// Futures market listing with exchange metadata joined in.
    pub fn future_markets(&self) -> Result<Vec<FutureMarket>, ClientError> {
        let mut markets: Vec<FutureMarket> = self.transport.get("/future-markets", &[])?;
        join_exchanges(&mut markets, &self.exchanges()?);
        Ok(markets)
    }

    /// Current open interest for the given symbols.
    pub fn open_interest(&self, symbols: &[&str]) -> Result<Vec<OpenInterest>, ClientError> {
        self.transport
            .get("/open-interest", &[("symbols", Some(symbols_param(symbols)))])
    }

    /// Current funding rate for the given symbols.
    pub fn funding_rate(&self, symbols: &[&str]) -> Result<Vec<FundingRate>, ClientError> {
        self.transport
            .get("/funding-rate", &[("symbols", Some(symbols_param(symbols)))])
    }

    /// Predicted next funding rate for the given symbols.
    pub fn predicted_funding_rate(
        &self,
        symbols: &[&str],
    ) -> Result<Vec<FundingRate>, ClientError> {
        self.transport.get(
            "/predicted-funding-rate",
            &[("symbols", Some(symbols_param(symbols)))],
        )
    }

    /// Open interest history, OHLC-aggregated per interval bucket.
    pub fn open_interest_history(
        &self,
        symbols: &[&str],
        interval: &str,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
        convert_to_usd: bool,
    ) -> Result<Vec<OhlcPoint>, ClientError> {
        let groups: Vec<GroupedHistory<OhlcPoint>> = self.transport.get(
            "/open-interest-history",
            &[
                ("symbols", Some(symbols_param(symbols))),
                ("interval", Some(Param::Str(interval.to_string()))),
                ("from", from.map(Param::Time)),
                ("to", to.map(Param::Time)),
                ("convert_to_usd", Some(Param::Bool(convert_to_usd))),
            ],
        )?;
        Ok(flatten_history(groups))
    }

    /// Funding rate history, OHLC-aggregated per interval bucket.
    pub fn funding_rate_history(
        &self,
        symbols: &[&str],
        interval: &str,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<Vec<OhlcPoint>, ClientError> {
        let groups: Vec<GroupedHistory<OhlcPoint>> = self.transport.get(
            "/funding-rate-history",
            &[
                ("symbols", Some(symbols_param(symbols))),
                ("interval", Some(Param::Str(interval.to_string()))),
                ("from", from.map(Param::Time)),
                ("to", to.map(Param::Time)),
            ],
        )?;
        Ok(flatten_history(groups))
    }

    /// Predicted funding rate history, OHLC-aggregated per interval bucket.
    pub fn predicted_funding_rate_history(
        &self,
        symbols: &[&str],
        interval: &str,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<Vec<OhlcPoint>, ClientError> {
        let groups: Vec<GroupedHistory<OhlcPoint>> = self.transport.get(
            "/predicted-funding-rate-history",
            &[
                ("symbols", Some(symbols_param(symbols))),
                ("interval", Some(Param::Str(interval.to_string()))),
                ("from", from.map(Param::Time)),
                ("to", to.map(Param::Time)),
            ],
        )?;
        Ok(flatten_history(groups))
    }

    /// Liquidated long/short volume per interval bucket.
    pub fn liquidation_history(
        &self,
        symbols: &[&str],
        interval: &str,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
        convert_to_usd: bool,
    ) -> Result<Vec<LiquidationPoint>, ClientError> {
        let groups: Vec<GroupedHistory<LiquidationPoint>> = self.transport.get(
            "/liquidation-history",
            &[
                ("symbols", Some(symbols_param(symbols))),
                ("interval", Some(Param::Str(interval.to_string()))),
                ("from", from.map(Param::Time)),
                ("to", to.map(Param::Time)),
                ("convert_to_usd", Some(Param::Bool(convert_to_usd))),
            ],
        )?;
        Ok(flatten_history(groups))
    }

    /// Long/short position ratio per interval bucket.
    pub fn long_short_ratio_history(
        &self,
        symbols: &[&str],
        interval: &str,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<Vec<LongShortRatioPoint>, ClientError> {
        let groups: Vec<GroupedHistory<LongShortRatioPoint>> = self.transport.get(
            "/long-short-ratio-history",
            &[
                ("symbols", Some(symbols_param(symbols))),
                ("interval", Some(Param::Str(interval.to_string()))),
                ("from", from.map(Param::Time)),
                ("to", to.map(Param::Time)),
            ],
        )?;
        Ok(flatten_history(groups))
    }

    /// Price candlesticks per interval bucket.
    pub fn ohlcv_history(
        &self,
        symbols: &[&str],
        interval: &str,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<Vec<OhlcvBar>, ClientError> {
        let groups: Vec<GroupedHistory<OhlcvBar>> = self.transport.get(
            "/ohlcv-history",
            &[
                ("symbols", Some(symbols_param(symbols))),
                ("interval", Some(Param::Str(interval.to_string()))),
                ("from", from.map(Param::Time)),
                ("to", to.map(Param::Time)),
            ],
        )?;
        Ok(flatten_history(groups))
    }

    /// Release the underlying connection pool. Dropping the client has the
    /// same effect; this makes the hand-off explicit.
    pub fn close(self) {}
}

fn symbols_param(symbols: &[&str]) -> Param {
    Param::Symbols(symbols.iter().map(|s| s.to_string()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_debug_redacts_api_key() {
        let config = ClientConfig::new("super-secret-key");
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("super-secret-key"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_config_defaults() {
        let config = ClientConfig::new("k");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_client_rejects_unprintable_api_key() {
        let result = CoinalyzeClient::new("bad\nkey");
        assert!(matches!(result, Err(ClientError::InvalidApiKey)));
    }
}
