//! URL-safe share tokens.
//!
//! A token is the JSON form of a [`Configuration`], base64 encoded with the
//! URL-safe alphabet. Encoding omits padding; decoding accepts it either way.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, NO_PAD};
use base64::engine::DecodePaddingMode;
use base64::Engine as _;
use thiserror::Error;

use crate::catalog::Catalog;
use crate::config::{Configuration, RawConfiguration};

/// Query parameter carrying the token in share links.
pub const QUERY_KEY: &str = "config";

const TOKEN: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    NO_PAD.with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Errors decoding a share token.
#[derive(Error, Debug)]
pub enum ShareError {
    /// Not base64.
    #[error("share token is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    /// Decoded bytes are not UTF-8.
    #[error("share token is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// Decoded text is not a configuration.
    #[error("share token does not hold a configuration: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for share operations.
pub type Result<T> = std::result::Result<T, ShareError>;

/// Encode `config` as a share token.
pub fn encode(config: &Configuration) -> Result<String> {
    let json = config.to_json()?;
    Ok(TOKEN.encode(json))
}

/// Decode a share token, normalizing styles against `catalog`.
pub fn decode(token: &str, catalog: &Catalog) -> Result<Configuration> {
    let bytes = TOKEN.decode(token.trim())?;
    let json = String::from_utf8(bytes)?;
    let raw: RawConfiguration = serde_json::from_str(&json)?;
    Ok(Configuration::from_raw(&raw, catalog))
}

/// Decode a share token, falling back to the default configuration.
pub fn decode_or_default(token: &str, catalog: &Catalog) -> Configuration {
    decode(token, catalog).unwrap_or_else(|err| {
        tracing::warn!(%err, "ignoring malformed share token, using defaults");
        Configuration::default()
    })
}

/// Share link for `config` under `base`.
pub fn share_url(base: &str, config: &Configuration) -> Result<String> {
    let separator = if base.contains('?') { '&' } else { '?' };
    Ok(format!("{base}{separator}{QUERY_KEY}={}", encode(config)?))
}

/// Token carried by a share link, if any.
pub fn token_from_url(url: &str) -> Option<&str> {
    let (_, query) = url.split_once('?')?;
    let query = query.split('#').next().unwrap_or(query);
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == QUERY_KEY)
        .map(|(_, value)| value)
        .filter(|value| !value.is_empty())
}
