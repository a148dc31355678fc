pub mod client;

use async_trait::async_trait;
use serde_json::Value;

pub use client::GoogleIdentityClient;

/// The identity platform's record for one end user. Only the platform-assigned
/// identifier is modeled; everything else stays on the remote side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub uid: String,
}

/// Custom claims attached to an account, embedded in its issued tokens.
pub type ClaimSet = serde_json::Map<String, Value>;

#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("no account found for email: {0}")]
    AccountNotFound(String),
    #[error("claim write rejected by identity platform: {0}")]
    ClaimWriteRejected(String),
    #[error("identity platform transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected response from identity platform: {0}")]
    UnexpectedResponse(String),
}

/// Seam to the identity platform. The production implementation is
/// [`GoogleIdentityClient`]; tests substitute an in-memory fake.
#[async_trait]
pub trait IdentityPlatform {
    async fn lookup_account_by_email(&self, email: &str) -> Result<Account, IdentityError>;

    /// Replaces the account's entire custom-claim set. Claims not present in
    /// `claims` are dropped by the platform.
    async fn overwrite_claims(&self, uid: &str, claims: &ClaimSet) -> Result<(), IdentityError>;
}
