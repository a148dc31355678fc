use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Email of the account the grant targets unless overridden.
pub const DEFAULT_ADMIN_EMAIL: &str = "admin@smartsociety.com";

/// Credential file looked for next to the binary when no path is configured,
/// matching the deployment convention for the admin key artifact.
pub const DEFAULT_CREDENTIALS_FILE: &str = "firebase-admin-key.json";

const DEFAULT_API_BASE: &str = "https://identitytoolkit.googleapis.com";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub identity: IdentityConfig,
    pub target: TargetConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityConfig {
    pub api_base: String,
    pub credentials_path: PathBuf,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetConfig {
    pub admin_email: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::defaults().with_env_overrides()
    }

    fn defaults() -> Self {
        Self {
            identity: IdentityConfig {
                api_base: DEFAULT_API_BASE.to_string(),
                credentials_path: PathBuf::from(DEFAULT_CREDENTIALS_FILE),
                timeout_secs: 30,
            },
            target: TargetConfig {
                admin_email: DEFAULT_ADMIN_EMAIL.to_string(),
            },
        }
    }

    fn with_env_overrides(mut self) -> Self {
        // Identity platform overrides
        if let Ok(v) = env::var("IDENTITY_API_BASE") {
            self.identity.api_base = v.trim_end_matches('/').to_string();
        }
        if let Ok(v) = env::var("SERVICE_ACCOUNT_PATH") {
            self.identity.credentials_path = PathBuf::from(v);
        } else if let Ok(v) = env::var("GOOGLE_APPLICATION_CREDENTIALS") {
            self.identity.credentials_path = PathBuf::from(v);
        }
        if let Ok(v) = env::var("IDENTITY_TIMEOUT_SECS") {
            self.identity.timeout_secs = v.parse().unwrap_or(self.identity.timeout_secs);
        }

        // Target overrides
        if let Ok(v) = env::var("ADMIN_EMAIL") {
            self.target.admin_email = v;
        }

        self
    }
}
