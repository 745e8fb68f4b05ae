//! HTTP routes for the merchant user table.
//!
//! The admin table first loads its configuration and then pages through
//! rows:
//!
//! - `GET /merchant-user-gui/index/configuration?merchant-id=5`
//! - `GET /merchant-user-gui/index/table?merchant-id=5&start=0&length=10&sort=username&direction=asc&search=jane`
//!
//! Edit and status change pages linked from the rows are served elsewhere.

use axum::{
    Extension, Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde::{Deserialize, Serialize};

use super::storage::{MerchantUserStorage, MerchantUserStorageError};
use super::table::{MerchantUserTable, MerchantUserTableError, TableRequest};
use crate::config::Config;
use crate::database::SqlStorage;
use crate::tabs::TabRegistry;

/// Error response for API endpoints.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl From<MerchantUserTableError> for (StatusCode, Json<ErrorResponse>) {
    fn from(err: MerchantUserTableError) -> Self {
        let error_type = match &err {
            MerchantUserTableError::UnknownStatus(_) => "unknown_status_code",
            MerchantUserTableError::Storage(MerchantUserStorageError::StorageError(_)) => {
                "storage_error"
            }
            MerchantUserTableError::Render(_) => "render_error",
        };

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: error_type.to_owned(),
                message: err.to_string(),
            }),
        )
    }
}

/// Application state shared by all routes.
#[derive(Clone)]
pub struct AppState<S, M> {
    pub sql_storage: S,
    pub merchant_user_storage: M,
    pub tabs: TabRegistry,
}

impl<S, M> AppState<S, M> {
    /// Creates a new `AppState` with the default merchant page tabs.
    pub fn new(sql_storage: S, merchant_user_storage: M) -> Self {
        Self::with_tabs(sql_storage, merchant_user_storage, TabRegistry::with_default_tabs())
    }

    pub fn with_tabs(sql_storage: S, merchant_user_storage: M, tabs: TabRegistry) -> Self {
        Self {
            sql_storage,
            merchant_user_storage,
            tabs,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct MerchantIdQuery {
    pub merchant_id: i32,
}

/// Creates the router for the merchant user table, nested under
/// `/merchant-user-gui`.
pub fn merchant_user_routes<S, M>() -> Router<AppState<S, M>>
where
    S: SqlStorage,
    M: MerchantUserStorage,
{
    Router::new()
        .route("/index/configuration", get(table_configuration::<S, M>))
        .route("/index/table", get(table_data::<S, M>))
}

#[tracing::instrument(skip_all, fields(merchant_id = query.merchant_id))]
async fn table_configuration<S, M>(
    Extension(config): Extension<Config>,
    Query(query): Query<MerchantIdQuery>,
) -> impl IntoResponse
where
    S: SqlStorage,
    M: MerchantUserStorage,
{
    let table = MerchantUserTable::new(query.merchant_id, &config);
    (StatusCode::OK, Json(table.configure()))
}

#[tracing::instrument(skip_all, fields(merchant_id = request.merchant_id, draw = request.draw))]
async fn table_data<S, M>(
    State(state): State<AppState<S, M>>,
    Extension(config): Extension<Config>,
    Query(request): Query<TableRequest>,
) -> impl IntoResponse
where
    S: SqlStorage,
    M: MerchantUserStorage,
{
    let table = MerchantUserTable::new(request.merchant_id, &config);

    match table
        .fetch_data(&state.merchant_user_storage, &request)
        .await
    {
        Ok(data) => (StatusCode::OK, Json(data)).into_response(),
        Err(e) => {
            tracing::error!("Failed to fetch merchant user table: {}", e);
            <(StatusCode, Json<ErrorResponse>)>::from(e).into_response()
        }
    }
}
