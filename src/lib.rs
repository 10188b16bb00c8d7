//! Typed client for the Coinalyze market-data HTTP API
//!
//! Fetches derivatives and spot statistics (open interest, funding rates,
//! liquidations, long/short ratio, OHLCV) and normalizes the abbreviated
//! JSON payloads into typed rows with UTC timestamps. All calls are
//! synchronous and block until the round-trip completes.
//!
//! ```no_run
//! use coinalyze_client::CoinalyzeClient;
//!
//! let client = CoinalyzeClient::new("api-key")?;
//! for row in client.open_interest(&["BTCUSDT_PERP.A"])? {
//!     println!("{} {:?} @ {}", row.symbol, row.value, row.update);
//! }
//! client.close();
//! # Ok::<(), coinalyze_client::ClientError>(())
//! ```

pub mod client;
pub mod errors;
pub mod types;

mod cache;
mod normalize;
mod transport;

// Re-export main types for easy access
pub use client::{ClientConfig, CoinalyzeClient, DEFAULT_BASE_URL, DEFAULT_INTERVAL};
pub use errors::ClientError;
pub use types::{
    Exchange, FundingRate, FutureMarket, LiquidationPoint, LongShortRatioPoint, OhlcPoint,
    OhlcvBar, OpenInterest, SpotMarket,
};
