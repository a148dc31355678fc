use serde_json::json;

use crate::credentials::CredentialError;
use crate::identity::{Account, ClaimSet, IdentityError, IdentityPlatform};

#[derive(Debug, thiserror::Error)]
pub enum AssignmentError {
    #[error("credential error: {0}")]
    Credential(#[from] CredentialError),
    #[error("no account found for email: {0}")]
    AccountNotFound(String),
    #[error("account lookup failed: {0}")]
    Lookup(IdentityError),
    #[error("claim write failed: {0}")]
    ClaimWrite(IdentityError),
}

impl AssignmentError {
    /// Process exit code for the operator: success is 0, each failure kind
    /// gets its own non-zero code so wrapper scripts can tell them apart.
    pub fn exit_code(&self) -> i32 {
        match self {
            AssignmentError::Credential(_) => 2,
            AssignmentError::AccountNotFound(_) => 3,
            AssignmentError::Lookup(_) => 4,
            AssignmentError::ClaimWrite(_) => 5,
        }
    }
}

/// The claim set the grant installs: exactly `{"role": "admin"}`.
pub fn admin_claims() -> ClaimSet {
    let mut claims = ClaimSet::new();
    claims.insert("role".to_string(), json!("admin"));
    claims
}

/// One-shot privilege grant: resolve the target email to an account, then
/// replace that account's custom claims with the admin role.
pub struct RoleAssigner<P> {
    platform: P,
    target_email: String,
}

impl<P: IdentityPlatform> RoleAssigner<P> {
    pub fn new(platform: P, target_email: impl Into<String>) -> Self {
        Self {
            platform,
            target_email: target_email.into(),
        }
    }

    pub fn target_email(&self) -> &str {
        &self.target_email
    }

    /// Looks up the account and overwrites its claim set with
    /// `{"role": "admin"}`. The write replaces any claims previously set on
    /// the account; it is not a merge. Running this twice converges on the
    /// same claim set, so a failed run can simply be re-invoked.
    ///
    /// A lookup failure ends the run without attempting the write.
    pub async fn assign_admin_role(&self) -> Result<Account, AssignmentError> {
        let account = self
            .platform
            .lookup_account_by_email(&self.target_email)
            .await
            .map_err(|e| match e {
                IdentityError::AccountNotFound(email) => AssignmentError::AccountNotFound(email),
                other => AssignmentError::Lookup(other),
            })?;

        self.platform
            .overwrite_claims(&account.uid, &admin_claims())
            .await
            .map_err(AssignmentError::ClaimWrite)?;

        tracing::info!(
            email = %self.target_email,
            uid = %account.uid,
            "admin role assigned"
        );

        Ok(account)
    }
}
