//! Request signing.
//!
//! Bitget authenticates every private call with an HMAC-SHA256 signature,
//! base64 encoded:
//! - Prehash: timestamp + METHOD + path [+ "?" + query] + body
//! - Headers: ACCESS-KEY, ACCESS-SIGN, ACCESS-TIMESTAMP, ACCESS-PASSPHRASE

use base64::{engine::general_purpose, Engine as _};
use bgbridge_core::ExchangeError;
use hmac::{Hmac, Mac};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::Method;
use sha2::Sha256;
use std::fmt;

type HmacSha256 = Hmac<Sha256>;

pub const ACCESS_KEY: &str = "access-key";
pub const ACCESS_SIGN: &str = "access-sign";
pub const ACCESS_PASSPHRASE: &str = "access-passphrase";
pub const ACCESS_TIMESTAMP: &str = "access-timestamp";
pub const LOCALE: &str = "locale";

pub const DEFAULT_LOCALE: &str = "en-US";

/// API credentials for one exchange account.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub api_key: String,
    pub api_secret: String,
    pub passphrase: String,
}

impl Credentials {
    pub fn new(
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
        passphrase: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
            passphrase: passphrase.into(),
        }
    }

    /// Names of the fields left empty.
    pub fn missing(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.api_key.is_empty() {
            missing.push("API_KEY");
        }
        if self.api_secret.is_empty() {
            missing.push("API_SECRET");
        }
        if self.passphrase.is_empty() {
            missing.push("PASSPHRASE");
        }
        missing
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .field("passphrase", &"<redacted>")
            .finish()
    }
}

/// Base64-encoded HMAC-SHA256 of `prehash`, keyed by the UTF-8 bytes of `secret`.
pub fn sign(secret: &str, prehash: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(prehash.as_bytes());
    general_purpose::STANDARD.encode(mac.finalize().into_bytes())
}

/// Build the string that gets signed. The query segment is only present when
/// there is a query.
pub fn prehash(timestamp: &str, method: &str, path: &str, query: &str, body: &str) -> String {
    let mut s = String::with_capacity(
        timestamp.len() + method.len() + path.len() + query.len() + body.len() + 1,
    );
    s.push_str(timestamp);
    s.push_str(method);
    s.push_str(path);
    if !query.is_empty() {
        s.push('?');
        s.push_str(query);
    }
    s.push_str(body);
    s
}

/// Current wall-clock time in milliseconds, as sent in `ACCESS-TIMESTAMP`.
pub fn timestamp_ms() -> String {
    chrono::Utc::now().timestamp_millis().to_string()
}

/// A request that has been signed and is ready to send.
#[derive(Debug, Clone)]
pub struct SignedRequest {
    pub method: Method,
    pub path: String,
    pub query: String,
    pub body: String,
    pub timestamp: String,
    pub signature: String,
    pub headers: HeaderMap,
}

impl SignedRequest {
    /// Full URL under `base_url`, with the query appended for GETs.
    pub fn url(&self, base_url: &str) -> String {
        let base = base_url.trim_end_matches('/');
        if self.query.is_empty() {
            format!("{}{}", base, self.path)
        } else {
            format!("{}{}?{}", base, self.path, self.query)
        }
    }
}

/// Signs requests on behalf of one account.
#[derive(Debug, Clone)]
pub struct RequestSigner {
    credentials: Credentials,
    locale: String,
}

impl RequestSigner {
    pub fn new(credentials: Credentials) -> Self {
        Self::with_locale(credentials, DEFAULT_LOCALE)
    }

    pub fn with_locale(credentials: Credentials, locale: impl Into<String>) -> Self {
        Self {
            credentials,
            locale: locale.into(),
        }
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Authentication headers for a call made now.
    pub fn build_headers(
        &self,
        method: &str,
        path: &str,
        query: &str,
        body: &str,
    ) -> Result<HeaderMap, ExchangeError> {
        self.build_headers_at(&timestamp_ms(), method, path, query, body)
    }

    /// Authentication headers for a call stamped with `timestamp`.
    pub fn build_headers_at(
        &self,
        timestamp: &str,
        method: &str,
        path: &str,
        query: &str,
        body: &str,
    ) -> Result<HeaderMap, ExchangeError> {
        let signature = self.signature(timestamp, method, path, query, body);
        self.headers(timestamp, &signature)
    }

    /// Sign a request, capturing the timestamp once for both the prehash and
    /// the header.
    pub fn sign_request(
        &self,
        method: Method,
        path: &str,
        query: &str,
        body: String,
    ) -> Result<SignedRequest, ExchangeError> {
        self.sign_request_at(timestamp_ms(), method, path, query, body)
    }

    pub fn sign_request_at(
        &self,
        timestamp: String,
        method: Method,
        path: &str,
        query: &str,
        body: String,
    ) -> Result<SignedRequest, ExchangeError> {
        let signature = self.signature(&timestamp, method.as_str(), path, query, &body);
        let headers = self.headers(&timestamp, &signature)?;
        Ok(SignedRequest {
            method,
            path: path.to_string(),
            query: query.to_string(),
            body,
            timestamp,
            signature,
            headers,
        })
    }

    fn signature(&self, timestamp: &str, method: &str, path: &str, query: &str, body: &str) -> String {
        sign(
            &self.credentials.api_secret,
            &prehash(timestamp, method, path, query, body),
        )
    }

    fn headers(&self, timestamp: &str, signature: &str) -> Result<HeaderMap, ExchangeError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCESS_KEY, header_value("API key", &self.credentials.api_key)?);
        headers.insert(ACCESS_SIGN, header_value("signature", signature)?);
        headers.insert(
            ACCESS_PASSPHRASE,
            header_value("passphrase", &self.credentials.passphrase)?,
        );
        headers.insert(ACCESS_TIMESTAMP, header_value("timestamp", timestamp)?);
        headers.insert(LOCALE, header_value("locale", &self.locale)?);
        Ok(headers)
    }
}

fn header_value(what: &str, value: &str) -> Result<HeaderValue, ExchangeError> {
    HeaderValue::from_str(value)
        .map_err(|e| ExchangeError::InvalidHeader(format!("{}: {}", what, e)))
}
