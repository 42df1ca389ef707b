use axum::body::Bytes;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde_json::Value;

use crate::config::NotionConfig;
use crate::database::models::ValidationError;

use super::ServiceError;

const ALLOWED_PREFIXES: [&str; 3] = ["databases", "pages", "databases/query"];

/// Upstream reply relayed back to the caller unchanged
#[derive(Debug)]
pub struct ProxiedResponse {
    pub status: u16,
    pub content_type: String,
    pub body: Bytes,
}

/// Allow-listed POST forwarder to the Notion API
pub struct NotionProxy {
    client: reqwest::Client,
    config: NotionConfig,
}

impl NotionProxy {
    pub fn new(client: reqwest::Client, config: &NotionConfig) -> Self {
        Self {
            client,
            config: config.clone(),
        }
    }

    /// Forward `body` to `<base>/<path>`. `path` must already have passed
    /// [`validate_path`]. No retries.
    pub async fn forward(
        &self,
        path: &str,
        authorization: Option<&str>,
        notion_version: Option<&str>,
        body: &Value,
    ) -> Result<ProxiedResponse, ServiceError> {
        let url = format!("{}/{}", self.config.base_url.trim_end_matches('/'), path);
        tracing::debug!("Proxying POST {}", url);

        let response = self
            .client
            .post(&url)
            .header(AUTHORIZATION, authorization.unwrap_or_default())
            .header("Notion-Version", notion_version.unwrap_or(self.config.default_version.as_str()))
            .header(CONTENT_TYPE, "application/json")
            .body(body.to_string())
            .send()
            .await?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("application/json")
            .to_string();
        let body = response.bytes().await?;

        Ok(ProxiedResponse {
            status,
            content_type,
            body,
        })
    }
}

/// Normalize and check a caller-supplied API path. Runs before any outbound call.
pub fn validate_path(raw: Option<&str>) -> Result<String, ValidationError> {
    let path = raw.unwrap_or_default().trim().trim_start_matches('/');
    if path.is_empty() {
        return Err(ValidationError::new("Missing Notion API path"));
    }

    let prefixed = ALLOWED_PREFIXES.iter().any(|prefix| path.starts_with(prefix));
    let escapes = path.split('/').any(|segment| segment == ".." || segment == ".");
    if !prefixed || escapes || path.contains(|c: char| matches!(c, '?' | '#' | '\\')) {
        return Err(ValidationError::new("Path not allowed"));
    }

    Ok(path.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_allowed_prefixes() {
        assert_eq!(validate_path(Some("/databases/abc/query")).unwrap(), "databases/abc/query");
        assert_eq!(validate_path(Some("pages")).unwrap(), "pages");
    }

    #[test]
    fn rejects_missing_path() {
        assert_eq!(validate_path(None).unwrap_err().to_string(), "Missing Notion API path");
        assert_eq!(validate_path(Some("/")).unwrap_err().to_string(), "Missing Notion API path");
    }

    #[test]
    fn rejects_other_endpoints_and_traversal() {
        for path in ["users", "search", "pages/../users", "databases?x=1", "pages#frag"] {
            assert_eq!(
                validate_path(Some(path)).unwrap_err().to_string(),
                "Path not allowed",
                "{}",
                path
            );
        }
    }
}
