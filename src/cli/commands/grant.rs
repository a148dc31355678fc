use serde_json::json;
use std::path::PathBuf;

use crate::assigner::{AssignmentError, RoleAssigner};
use crate::cli::{utils, OutputFormat};
use crate::config::AppConfig;
use crate::credentials::ServiceCredential;
use crate::identity::GoogleIdentityClient;

pub async fn handle(
    email: Option<String>,
    credentials: Option<PathBuf>,
    output_format: OutputFormat,
) -> Result<(), AssignmentError> {
    let mut config = AppConfig::from_env();
    if let Some(email) = email {
        config.target.admin_email = email;
    }
    if let Some(path) = credentials {
        config.identity.credentials_path = path;
    }

    let credential = ServiceCredential::load(&config.identity.credentials_path)?;
    let client = GoogleIdentityClient::connect(&credential, &config.identity).await?;

    let assigner = RoleAssigner::new(client, config.target.admin_email);
    let account = assigner.assign_admin_role().await?;

    utils::output_success(
        &output_format,
        &format!("Admin role assigned to user: {}", assigner.target_email()),
        Some(json!({ "email": assigner.target_email(), "uid": account.uid })),
    );

    Ok(())
}
