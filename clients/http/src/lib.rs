//! reqwest-backed implementations of the splitter collaborators.
//!
//! [`ApiClient`] talks to the APT Fund backend and serves as both the
//! campaign directory and the transfer ledger. [`WalletBridge`] forwards
//! transfers to a local wallet bridge that holds the keys.

pub mod api;
pub mod error;
pub mod wallet;

#[cfg(test)]
mod testing;

pub use api::{ApiClient, DEFAULT_API_URL};
pub use error::ApiError;
pub use wallet::WalletBridge;
