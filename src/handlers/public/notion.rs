// handlers/public/notion.rs - POST /api/notion-proxy

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::Value;

use crate::app::AppState;
use crate::error::ApiError;
use crate::services::notion_proxy::validate_path;
use crate::services::NotionProxy;

#[derive(Debug, Deserialize)]
pub struct ProxyQuery {
    pub path: Option<String>,
}

/// POST /api/notion-proxy?path=<p> - Forward a JSON body to an allow-listed Notion endpoint
///
/// The caller's `Authorization` and `Notion-Version` headers are passed through.
/// Upstream status, content type and body are relayed as-is.
pub async fn proxy(
    State(state): State<AppState>,
    Query(query): Query<ProxyQuery>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    let path = validate_path(query.path.as_deref())?;

    let payload: Value = if body.iter().all(u8::is_ascii_whitespace) {
        Value::Object(Default::default())
    } else {
        serde_json::from_slice(&body).map_err(|e| ApiError::invalid_json(e.to_string()))?
    };

    let authorization = headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok());
    let notion_version = headers.get("notion-version").and_then(|v| v.to_str().ok());

    let proxy = NotionProxy::new(state.http.clone(), &state.config.notion);
    let relayed = proxy
        .forward(&path, authorization, notion_version, &payload)
        .await?;

    let status = StatusCode::from_u16(relayed.status).unwrap_or(StatusCode::BAD_GATEWAY);
    Ok((status, [(header::CONTENT_TYPE, relayed.content_type)], relayed.body).into_response())
}
