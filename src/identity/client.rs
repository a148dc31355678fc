use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;

use crate::config::IdentityConfig;
use crate::credentials::{CredentialError, ServiceCredential};
use crate::identity::{Account, ClaimSet, IdentityError, IdentityPlatform};

const OAUTH_SCOPE: &str = "https://www.googleapis.com/auth/identitytoolkit";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// Authenticated client for the Google Identity Toolkit admin API.
///
/// Construction is the trust-establishment step: the service-account key
/// signs a short-lived assertion which is exchanged for a bearer token. If
/// that fails, no account operation is ever attempted.
pub struct GoogleIdentityClient {
    http: reqwest::Client,
    access_token: String,
    project_id: String,
    api_base: String,
}

#[derive(Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LookupResponse {
    users: Option<Vec<UserEntry>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserEntry {
    local_id: String,
}

impl GoogleIdentityClient {
    pub async fn connect(
        credential: &ServiceCredential,
        config: &IdentityConfig,
    ) -> Result<Self, CredentialError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        let assertion = sign_assertion(credential)?;

        tracing::debug!(
            token_uri = %credential.token_uri,
            client_email = %credential.client_email,
            "exchanging service-account assertion for access token"
        );

        let response = http
            .post(&credential.token_uri)
            .form(&[
                ("grant_type", JWT_BEARER_GRANT),
                ("assertion", assertion.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(CredentialError::Unauthorized(format!(
                "{} {}",
                status,
                body.trim()
            )));
        }

        let token: TokenResponse = response.json().await.map_err(CredentialError::Exchange)?;

        tracing::info!(project_id = %credential.project_id, "identity platform trust established");

        Ok(Self {
            http,
            access_token: token.access_token,
            project_id: credential.project_id.clone(),
            api_base: config.api_base.clone(),
        })
    }

    fn endpoint(&self, method: &str) -> String {
        // Google-style custom-method URLs: .../accounts:lookup, .../accounts:update
        format!(
            "{}/v1/projects/{}/accounts:{}",
            self.api_base, self.project_id, method
        )
    }
}

fn sign_assertion(credential: &ServiceCredential) -> Result<String, CredentialError> {
    let key = EncodingKey::from_rsa_pem(credential.private_key.as_bytes())
        .map_err(|e| CredentialError::InvalidKey(e.to_string()))?;

    let now = Utc::now().timestamp();
    let claims = AssertionClaims {
        iss: &credential.client_email,
        scope: OAUTH_SCOPE,
        aud: &credential.token_uri,
        iat: now,
        exp: now + ASSERTION_LIFETIME_SECS,
    };

    let mut header = Header::new(Algorithm::RS256);
    header.kid = Some(credential.private_key_id.clone());

    encode(&header, &claims, &key).map_err(|e| CredentialError::InvalidKey(e.to_string()))
}

#[async_trait::async_trait]
impl IdentityPlatform for GoogleIdentityClient {
    async fn lookup_account_by_email(&self, email: &str) -> Result<Account, IdentityError> {
        tracing::debug!(email = %email, "looking up account by email");

        let response = self
            .http
            .post(self.endpoint("lookup"))
            .bearer_auth(&self.access_token)
            .json(&json!({ "email": [email] }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(IdentityError::UnexpectedResponse(format!(
                "lookup failed: {} {}",
                status,
                body.trim()
            )));
        }

        let body: LookupResponse = response
            .json()
            .await
            .map_err(|e| IdentityError::UnexpectedResponse(format!("bad lookup response: {e}")))?;

        match body.users.into_iter().flatten().next() {
            Some(user) => Ok(Account { uid: user.local_id }),
            None => Err(IdentityError::AccountNotFound(email.to_string())),
        }
    }

    async fn overwrite_claims(&self, uid: &str, claims: &ClaimSet) -> Result<(), IdentityError> {
        // The platform takes the whole claim set as one serialized attribute;
        // whatever was set before is replaced.
        let attributes = Value::Object(claims.clone()).to_string();

        tracing::debug!(uid = %uid, "overwriting custom claims");

        let response = self
            .http
            .post(self.endpoint("update"))
            .bearer_auth(&self.access_token)
            .json(&json!({ "localId": uid, "customAttributes": attributes }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(IdentityError::ClaimWriteRejected(format!(
                "{} {}",
                status,
                body.trim()
            )));
        }

        Ok(())
    }
}
