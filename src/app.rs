use axum::{
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    middleware::{from_fn, from_fn_with_state},
    response::{IntoResponse, Json},
    routing::{delete, get, post, put},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::AppConfig;
use crate::database::Store;
use crate::handlers::{elevated, protected, public};
use crate::middleware::{require_admin, require_user};

/// Shared handles passed to every handler and middleware
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub config: Arc<AppConfig>,
    pub http: reqwest::Client,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, config: AppConfig) -> Self {
        Self {
            store,
            config: Arc::new(config),
            http: reqwest::Client::new(),
        }
    }
}

/// Full router: public routes, bearer-protected routes and admin-only routes
pub fn app(state: AppState) -> Router {
    let mut router = Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .merge(public_routes())
        .merge(protected_routes(state.clone()))
        .merge(elevated_routes(state.clone()))
        .layer(DefaultBodyLimit::max(state.config.api.max_request_size_bytes));

    if state.config.security.enable_cors {
        router = router.layer(CorsLayer::permissive());
    }
    if state.config.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }

    router.with_state(state)
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/api/auth/register", post(public::auth::register))
        .route("/api/auth/login", post(public::auth::login))
        // Carries the caller's Notion credential in Authorization, not ours
        .route("/api/notion-proxy", post(public::notion::proxy))
}

fn protected_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/api/auth/me", get(protected::auth::me))
        .route("/api/data", get(protected::data::get))
        .route("/api/progress", get(protected::progress::get).put(protected::progress::put))
        .route("/api/subjects", get(protected::subjects::list))
        .route("/api/tasks", get(protected::tasks::list).post(protected::tasks::create))
        .route(
            "/api/tasks/:id",
            put(protected::tasks::update).delete(protected::tasks::delete),
        )
        .route("/api/tests", get(protected::tests::list))
        .route("/api/routines", get(protected::routines::list))
        .route("/api/analytics", get(protected::analytics::get))
        .route_layer(from_fn_with_state(state, require_user))
}

fn elevated_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/api/data", put(elevated::catalog::sync))
        .route("/api/subjects", post(elevated::catalog::subject_create))
        .route(
            "/api/subjects/:id",
            put(elevated::catalog::subject_update).delete(elevated::catalog::subject_delete),
        )
        .route("/api/tests", post(elevated::catalog::test_create))
        .route("/api/tests/:id", put(elevated::catalog::test_update))
        .route("/api/routines/:type", put(elevated::catalog::routine_put))
        .route("/api/admin/users", get(elevated::admin::users_list))
        .route("/api/admin/users/:id/admin", put(elevated::admin::user_toggle_admin))
        .route("/api/admin/tasks/:id", delete(elevated::admin::task_delete))
        .route("/api/admin/tests/:id", delete(elevated::admin::test_delete))
        .route("/api/admin/settings", get(elevated::admin::settings_list))
        .route(
            "/api/admin/settings/:key",
            get(elevated::admin::setting_get).put(elevated::admin::setting_put),
        )
        .route_layer(from_fn(require_admin))
        .route_layer(from_fn_with_state(state, require_user))
}

async fn root() -> Json<Value> {
    Json(json!({
        "name": "Study Tracker API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "auth": "/api/auth/register, /api/auth/login (public), /api/auth/me",
            "data": "/api/data (GET any user, PUT admin)",
            "progress": "/api/progress",
            "subjects": "/api/subjects[/:id]",
            "tasks": "/api/tasks[/:id]",
            "tests": "/api/tests[/:id]",
            "routines": "/api/routines[/:type]",
            "analytics": "/api/analytics",
            "admin": "/api/admin/* (admin)",
            "notion": "/api/notion-proxy?path=...",
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "status": "ok", "timestamp": now, "database": "ok" })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "degraded", "timestamp": now, "database": "unavailable" })),
            )
        }
    }
}
