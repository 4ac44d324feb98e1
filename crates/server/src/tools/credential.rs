//! credential_* tool implementations.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use beacon_client::MovieInfoService;
use beacon_core::{Error, Provider};

use super::json_result;

/// Parameters for the credential_append tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CredentialAppendParams {
    /// Pool to extend: "omdb", "douban" or "douban-search".
    pub provider: Provider,
    /// Tokens to add. Duplicates and blanks are skipped.
    pub tokens: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CredentialAppendOutput {
    pub provider: Provider,
    /// Tokens actually added.
    pub added: usize,
    /// Pool size afterwards.
    pub pool_size: usize,
}

/// Parameters for the credential_verify tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CredentialVerifyParams {
    pub provider: Provider,
    /// Token to probe. It is not added to the pool.
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CredentialVerifyOutput {
    pub provider: Provider,
    pub valid: bool,
    /// Provider message when the token was refused.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

pub async fn append_impl(service: &MovieInfoService, params: CredentialAppendParams) -> Result<CallToolResult, McpError> {
    if params.tokens.is_empty() {
        return Err(Error::InvalidInput("tokens cannot be empty".into()).into());
    }

    let added = service.append_credentials(params.provider, params.tokens);
    let pool_size = service.pool().len(params.provider);
    json_result(&CredentialAppendOutput { provider: params.provider, added, pool_size })
}

/// A refused token is a successful verification with `valid: false`; transport
/// failures are errors.
pub async fn verify_impl(service: &MovieInfoService, params: CredentialVerifyParams) -> Result<CallToolResult, McpError> {
    let output = match service.verify_credential(params.provider, &params.token).await {
        Ok(()) => CredentialVerifyOutput { provider: params.provider, valid: true, reason: None },
        Err(Error::ProviderRejection { message, .. }) => {
            CredentialVerifyOutput { provider: params.provider, valid: false, reason: Some(message) }
        }
        Err(e) => return Err(e.into()),
    };
    json_result(&output)
}
