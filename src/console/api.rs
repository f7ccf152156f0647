use async_trait::async_trait;
use serde::de::DeserializeOwned;

use super::ConsoleError;
use crate::errors::ApiErrorResponse;
use crate::matrix::PermissionMatrix;
use crate::models::{Permission, PermissionSetUpdate, Role};
use crate::sync::SyncReport;

/// The server calls the admin console makes.
#[async_trait]
pub trait RoleApi: Send + Sync {
    async fn list_permissions(&self) -> Result<Vec<Permission>, ConsoleError>;
    async fn list_roles(&self) -> Result<Vec<Role>, ConsoleError>;
    /// Replace the role's whole permission set; returns the role as stored.
    async fn update_role_permissions(&self, role_id: i64, permission_ids: &[i64]) -> Result<Role, ConsoleError>;
    async fn sync_permissions(&self) -> Result<SyncReport, ConsoleError>;
}

/// `RoleApi` over the `/api/v1` REST endpoints.
pub struct HttpRoleApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpRoleApi {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        HttpRoleApi {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/v1{}", self.base_url, path)
    }

    pub async fn permission_matrix(&self) -> Result<PermissionMatrix, ConsoleError> {
        let response = self.client.get(self.url("/permission-matrix")).send().await?;
        decode(response).await
    }
}

#[async_trait]
impl RoleApi for HttpRoleApi {
    async fn list_permissions(&self) -> Result<Vec<Permission>, ConsoleError> {
        let response = self.client.get(self.url("/permissions")).send().await?;
        decode(response).await
    }

    async fn list_roles(&self) -> Result<Vec<Role>, ConsoleError> {
        let response = self.client.get(self.url("/roles")).send().await?;
        decode(response).await
    }

    async fn update_role_permissions(&self, role_id: i64, permission_ids: &[i64]) -> Result<Role, ConsoleError> {
        let body = PermissionSetUpdate {
            permission_ids: permission_ids.to_vec(),
        };
        let response = self
            .client
            .put(self.url(&format!("/roles/{role_id}/permissions")))
            .json(&body)
            .send()
            .await?;
        decode(response).await
    }

    async fn sync_permissions(&self) -> Result<SyncReport, ConsoleError> {
        let response = self
            .client
            .post(self.url("/permissions/sync"))
            .json(&serde_json::json!({}))
            .send()
            .await?;
        decode(response).await
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ConsoleError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json::<T>().await?);
    }
    let message = match response.json::<ApiErrorResponse>().await {
        Ok(body) => match body.details {
            Some(details) => format!("{}: {details}", body.error),
            None => body.error,
        },
        Err(_) => status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string(),
    };
    Err(ConsoleError::Server {
        status: status.as_u16(),
        message,
    })
}
