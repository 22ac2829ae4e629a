//! Bitget futures adapter.
//!
//! Signs REST calls with the account's API key, secret and passphrase and
//! forwards them to the USDT-margined futures endpoints.

pub mod auth;
pub mod client;
pub mod types;

pub use auth::{sign, Credentials, RequestSigner, SignedRequest};
pub use client::{BitgetClient, BitgetConfig, DEFAULT_BASE_URL};
