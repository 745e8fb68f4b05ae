use crate::config::Config;
use crate::database::SqlStorage;
use crate::merchant_users::routes::AppState;
use crate::merchant_users::storage::MerchantUserStorage;
use crate::tabs::TabsView;
use axum::{
    Json, Router,
    extract::{Extension, Query, Request, State},
    http::{HeaderName, HeaderValue, StatusCode},
    response::IntoResponse,
    routing::{any, get},
};
use merchant_admin_utils::version_info::{RuntimeEnv, format_version_for_runtime_env};
use opentelemetry::{global, propagation::Extractor};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;
use tracing_opentelemetry::OpenTelemetrySpanExt;

pub mod config;
pub mod database;
pub mod html;
pub mod merchant_users;
pub mod tabs;
pub mod telemetry;

struct HeaderExtractor<'a>(&'a axum::http::HeaderMap);

impl<'a> Extractor for HeaderExtractor<'a> {
    fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(|v| v.to_str().ok())
    }

    fn keys(&self) -> Vec<&str> {
        self.0.keys().map(|k| k.as_str()).collect()
    }
}

/// Creates the application router with the default merchant page tabs.
pub async fn routes<S, M>(sql_storage: S, merchant_user_storage: M, config: Config) -> Router
where
    S: SqlStorage,
    M: MerchantUserStorage,
{
    routes_with_state(AppState::new(sql_storage, merchant_user_storage), config)
}

/// Creates the application router from a prepared state, e.g. with extra tabs registered.
pub fn routes_with_state<S, M>(state: AppState<S, M>, config: Config) -> Router
where
    S: SqlStorage,
    M: MerchantUserStorage,
{
    Router::new()
        .route("/is-health", get(health_check::<S, M>))
        .route("/merchant-gui/edit-merchant", get(merchant_page::<S, M>))
        .nest(
            "/merchant-user-gui",
            merchant_users::merchant_user_routes::<S, M>(),
        )
        .fallback(any(catch_all))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
                // Continue the caller's trace when it sent W3C trace headers
                let parent_context = global::get_text_map_propagator(|propagator| {
                    propagator.extract(&HeaderExtractor(request.headers()))
                });

                let span = tracing::info_span!(
                    "http_request",
                    http_request.method = ?request.method(),
                    http_request.uri = ?request.uri(),
                    http_request.version = ?request.version(),
                    http_request.user_agent = ?request.headers().get(axum::http::header::USER_AGENT),
                );

                span.set_parent(parent_context);

                span
            }),
        )
        .layer(Extension(config))
        .with_state(state)
}

async fn health_check<S, M>(
    State(state): State<AppState<S, M>>,
    Extension(config): Extension<Config>,
) -> impl IntoResponse
where
    S: SqlStorage,
    M: MerchantUserStorage,
{
    let mut response = if state.sql_storage.is_connected().await {
        (StatusCode::OK, "OK").into_response()
    } else {
        (StatusCode::BAD_GATEWAY, "502").into_response()
    };

    let env_value = config.environment().to_string();
    response.headers_mut().insert(
        HeaderName::from_static("x-service-env"),
        HeaderValue::from_str(&env_value).expect("environment header is valid ASCII"),
    );

    let runtime_env: RuntimeEnv = config.environment().into();
    let version_value = format_version_for_runtime_env(runtime_env);
    response.headers_mut().insert(
        HeaderName::from_static("x-service-version"),
        HeaderValue::from_str(&version_value).expect("version header is valid ASCII"),
    );

    response
}

async fn catch_all() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "nothing to see here")
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct MerchantPageQuery {
    id_merchant: i32,
}

#[derive(Debug, Serialize)]
struct MerchantPageResponse {
    merchant_id: i32,
    #[serde(flatten)]
    tabs: TabsView,
}

/// Merchant admin page: the tabs contributed by every registered expander.
#[tracing::instrument(skip_all, fields(merchant_id = query.id_merchant))]
async fn merchant_page<S, M>(
    State(state): State<AppState<S, M>>,
    Query(query): Query<MerchantPageQuery>,
) -> impl IntoResponse
where
    S: SqlStorage,
    M: MerchantUserStorage,
{
    let tabs = state.tabs.compose();
    tracing::debug!(tabs = tabs.len(), "Composed merchant page tabs");

    (
        StatusCode::OK,
        Json(MerchantPageResponse {
            merchant_id: query.id_merchant,
            tabs,
        }),
    )
}
