//! Typed wrappers for the catalog service endpoints
//!
//! One method per endpoint, all built on [`HttpClient::request`]. Non-2xx
//! responses become [`SyncError::RemoteStatus`] with the drained body;
//! undecodable bodies become [`SyncError::Decode`].

use std::collections::BTreeMap;

use reqwest::{Method, Response, StatusCode};
use serde::Deserialize;
use serde_json::json;

use crate::client::HttpClient;
use crate::error::{Result, SyncError};

/// A remote category, as listed by `GET /api/workspaces`
#[derive(Debug, Clone, Deserialize)]
pub struct Workspace {
    pub name: String,
}

/// One tool in the remote inventory
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RemoteTool {
    pub id: String,
    pub name: String,
    pub category: String,
    pub has_logo: bool,
}

impl RemoteTool {
    /// Bare short name: ids may be reported as `category/name` composites
    pub fn short_id(&self) -> &str {
        self.id.rsplit('/').next().unwrap_or(&self.id)
    }
}

/// Response of the content upsert endpoint
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ContentStatus {
    pub status: String,
    pub changed: Option<bool>,
}

impl ContentStatus {
    /// Older servers omit `changed`; absence means the content did change
    pub fn changed(&self) -> bool {
        self.changed.unwrap_or(true)
    }
}

/// Tool detail, of which only the script body is consumed
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ToolDetail {
    pub script_code: String,
}

/// Metadata sidecar content as stored remotely
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MetadataContent {
    pub content: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct BuildStarted {
    job_id: Option<String>,
}

/// Remote inventory keyed by category name
pub type ToolInventory = BTreeMap<String, Vec<RemoteTool>>;

async fn error_for_status(response: Response) -> Result<Response> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    Err(SyncError::RemoteStatus { status, body })
}

impl HttpClient {
    /// `GET /api/workspaces`
    pub async fn list_workspaces(&self) -> Result<Vec<Workspace>> {
        let response = self.request(Method::GET, "/api/workspaces", None).await?;
        let response = error_for_status(response).await?;
        response
            .json()
            .await
            .map_err(|e| SyncError::Decode(e.to_string()))
    }

    /// `POST /api/workspaces`; returns the raw status so the caller can
    /// apply the 400-means-already-exists convention
    pub async fn create_workspace(&self, name: &str) -> Result<StatusCode> {
        let body = json!({
            "name": name,
            "description": "Auto-created by CLI",
        });
        let response = self
            .request(Method::POST, "/api/workspaces", Some(&body))
            .await?;
        let status = response.status();
        // Drain the body so the connection can be reused
        let _ = response.text().await;
        Ok(status)
    }

    /// `POST /api/tools/content` with create-or-update semantics keyed by path
    pub async fn upsert_content(&self, path: &str, content: &str) -> Result<ContentStatus> {
        let body = json!({
            "path": path,
            "content": content,
        });
        let response = self
            .request(Method::POST, "/api/tools/content", Some(&body))
            .await?;
        let response = error_for_status(response).await?;
        // An unstructured body from an older server counts as changed
        Ok(response.json().await.unwrap_or_default())
    }

    /// `GET /api/tools`: the full remote inventory grouped by category
    pub async fn list_tools(&self) -> Result<ToolInventory> {
        let response = self.request(Method::GET, "/api/tools", None).await?;
        let response = error_for_status(response).await?;
        response
            .json()
            .await
            .map_err(|e| SyncError::Decode(e.to_string()))
    }

    /// `GET /api/tools/{category}/{id}`
    pub async fn tool_detail(&self, category: &str, id: &str) -> Result<ToolDetail> {
        let path = format!("/api/tools/{category}/{id}");
        let response = self.request(Method::GET, &path, None).await?;
        let response = error_for_status(response).await?;
        response
            .json()
            .await
            .map_err(|e| SyncError::Decode(e.to_string()))
    }

    /// `GET /api/tools/content?tool_id={category}/{id}&file_type=yaml`
    pub async fn metadata_content(&self, category: &str, id: &str) -> Result<MetadataContent> {
        let path = format!("/api/tools/content?tool_id={category}/{id}&file_type=yaml");
        let response = self.request(Method::GET, &path, None).await?;
        let response = error_for_status(response).await?;
        response
            .json()
            .await
            .map_err(|e| SyncError::Decode(e.to_string()))
    }

    /// `DELETE /api/tools/{category}/{id}`
    pub async fn delete_tool(&self, category: &str, id: &str) -> Result<()> {
        let path = format!("/api/tools/{category}/{id}");
        let response = self.request(Method::DELETE, &path, None).await?;
        let response = error_for_status(response).await?;
        let _ = response.text().await;
        Ok(())
    }

    /// `POST /api/tools/{category}/{name}/build`; returns the job id when
    /// the server reports one
    pub async fn trigger_build(&self, category: &str, name: &str) -> Result<Option<String>> {
        let path = format!("/api/tools/{category}/{name}/build");
        let response = self.request(Method::POST, &path, None).await?;
        let response = error_for_status(response).await?;
        let started: BuildStarted = response.json().await.unwrap_or_default();
        Ok(started.job_id)
    }

    /// `GET /api/tools/{category}/{id}/logo`: raw SVG
    pub async fn fetch_logo(&self, category: &str, id: &str) -> Result<String> {
        let path = format!("/api/tools/{category}/{id}/logo");
        let response = self.request(Method::GET, &path, None).await?;
        let response = error_for_status(response).await?;
        response
            .text()
            .await
            .map_err(|e| SyncError::Decode(e.to_string()))
    }

    /// `POST /api/tools/{category}/{id}/logo` with `{svg_code}`
    pub async fn upload_logo(&self, category: &str, id: &str, svg_code: &str) -> Result<()> {
        let path = format!("/api/tools/{category}/{id}/logo");
        let body = json!({ "svg_code": svg_code });
        let response = self.request(Method::POST, &path, Some(&body)).await?;
        let response = error_for_status(response).await?;
        let _ = response.text().await;
        Ok(())
    }
}
