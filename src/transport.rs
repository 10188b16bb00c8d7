//! Blocking HTTP transport and query-parameter encoding

use chrono::{DateTime, Utc};
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::client::ClientConfig;
use crate::errors::ClientError;

/// Query parameter value accepted by the transport layer.
#[derive(Clone, Debug)]
pub enum Param {
    Str(String),
    Int(i64),
    Bool(bool),
    /// Encoded as epoch seconds.
    Time(DateTime<Utc>),
    /// Encoded as a comma-separated list, caller order preserved.
    Symbols(Vec<String>),
}

/// Drop absent entries and render the rest into query-string pairs.
pub(crate) fn encode_params(params: &[(&str, Option<Param>)]) -> Vec<(String, String)> {
    let mut encoded = Vec::with_capacity(params.len());
    for (name, value) in params {
        if let Some(value) = value {
            let rendered = match value {
                Param::Str(s) => s.clone(),
                Param::Int(i) => i.to_string(),
                Param::Bool(b) => b.to_string(),
                Param::Time(t) => t.timestamp().to_string(),
                Param::Symbols(symbols) => symbols.join(","),
            };
            encoded.push((name.to_string(), rendered));
        }
    }
    encoded
}

/// Connection handle shared by every endpoint method. Holds the pooled
/// blocking client with the timeout and `api_key` header fixed at
/// construction.
pub(crate) struct Transport {
    http: Client,
    base_url: String,
}

impl Transport {
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let mut api_key =
            HeaderValue::from_str(&config.api_key).map_err(|_| ClientError::InvalidApiKey)?;
        api_key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert("api_key", api_key);

        let http = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Issue one GET and decode the JSON body. A non-2xx status or an
    /// undecodable body is an error; retrying is the caller's concern.
    pub fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, Option<Param>)],
    ) -> Result<T, ClientError> {
        let url = format!("{}{}", self.base_url, endpoint);
        let query = encode_params(params);

        debug!(endpoint, query_params = query.len(), "dispatching request");

        let response = self.http.get(&url).query(&query).send()?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ClientError::Status { status, body });
        }

        let body = response.bytes()?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_absent_params_are_dropped() {
        let from = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let encoded = encode_params(&[
            (
                "symbols",
                Some(Param::Symbols(vec!["X".to_string(), "Y".to_string()])),
            ),
            ("to", None),
            ("from", Some(Param::Time(from))),
        ]);

        assert_eq!(
            encoded,
            vec![
                ("symbols".to_string(), "X,Y".to_string()),
                ("from".to_string(), "1700000000".to_string()),
            ]
        );
        assert!(encoded.iter().all(|(name, _)| name != "to"));
    }

    #[test]
    fn test_scalar_params_render_canonically() {
        let encoded = encode_params(&[
            ("interval", Some(Param::Str("1min".to_string()))),
            ("convert_to_usd", Some(Param::Bool(false))),
            ("limit", Some(Param::Int(500))),
        ]);

        assert_eq!(
            encoded,
            vec![
                ("interval".to_string(), "1min".to_string()),
                ("convert_to_usd".to_string(), "false".to_string()),
                ("limit".to_string(), "500".to_string()),
            ]
        );
    }

    #[test]
    fn test_symbol_order_is_preserved() {
        let symbols = vec![
            "BTCUSDT_PERP.A".to_string(),
            "BTCUSDC_PERP.0".to_string(),
            "BTCUSD_PERP.0".to_string(),
        ];
        let encoded = encode_params(&[("symbols", Some(Param::Symbols(symbols)))]);
        assert_eq!(
            encoded[0].1,
            "BTCUSDT_PERP.A,BTCUSDC_PERP.0,BTCUSD_PERP.0"
        );
    }
}
