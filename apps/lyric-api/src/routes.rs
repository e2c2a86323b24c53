use std::time::Instant;

use axum::{
	Json, Router,
	extract::{
		Query, Request, State,
		rejection::{JsonRejection, QueryRejection},
	},
	http::StatusCode,
	middleware::{self, Next},
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use lyric_service::{
	Error as ServiceError, HistoryItem, HistoryRequest, Pagination, SearchRequest, SearchResponse,
	StoreOp, history::INVALID_PAGINATION,
};

use crate::state::AppState;

pub const SERVICE_NAME: &str = "Lyric Search Backend";
pub const UNAVAILABLE_MESSAGE: &str = "ML service is unavailable. Please ensure it is running.";
pub const MATCHER_CALL_FAILED: &str = "Error calling ML service";

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/", get(index))
		.route("/health", get(health))
		.route("/api/search", post(search))
		.route("/api/history", get(history))
		.layer(middleware::from_fn(log_request))
		.with_state(state)
}

async fn index() -> Json<Value> {
	Json(serde_json::json!({
		"message": format!("{SERVICE_NAME} API"),
		"version": env!("CARGO_PKG_VERSION"),
		"endpoints": {
			"search": "POST /api/search",
			"history": "GET /api/history",
		},
	}))
}

async fn health() -> Json<Value> {
	let now = OffsetDateTime::now_utc();
	let timestamp = now.format(&Rfc3339).unwrap_or_else(|_| now.unix_timestamp().to_string());

	Json(serde_json::json!({
		"status": "ok",
		"service": SERVICE_NAME,
		"timestamp": timestamp,
	}))
}

async fn search(
	State(state): State<AppState>,
	payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Envelope<SearchResponse>>, ApiError> {
	// Malformed bodies and non-string lyrics fall through to the same validation failure.
	let lyrics = match payload {
		Ok(Json(body)) => body.get("lyrics").and_then(Value::as_str).map(str::to_string),
		Err(rejection) => {
			tracing::debug!(%rejection, "Search body rejected.");

			None
		},
	};
	let service = state.service.clone();
	// Runs detached: a client disconnect must not cancel the match or its persistence.
	let task = tokio::spawn(async move { service.search(SearchRequest { lyrics }).await });
	let response = task.await.map_err(|err| {
		tracing::error!(error = %err, "Search task did not complete.");

		ApiError::internal()
	})??;

	Ok(Json(Envelope { success: true, data: response }))
}

#[derive(Debug, Default, Deserialize)]
pub struct HistoryParams {
	page: Option<String>,
	limit: Option<String>,
}

async fn history(
	State(state): State<AppState>,
	params: Result<Query<HistoryParams>, QueryRejection>,
) -> Result<Json<HistoryBody>, ApiError> {
	let Ok(Query(params)) = params else {
		return Err(ApiError::bad_request(INVALID_PAGINATION));
	};
	let request = HistoryRequest {
		page: parse_param(params.page.as_deref())?,
		limit: parse_param(params.limit.as_deref())?,
	};
	let response = state.service.list_history(request).await?;

	Ok(Json(HistoryBody { success: true, data: response.items, pagination: response.pagination }))
}

fn parse_param(raw: Option<&str>) -> Result<Option<i64>, ApiError> {
	match raw.map(str::trim) {
		None | Some("") => Ok(None),
		Some(value) =>
			value.parse().map(Some).map_err(|_| ApiError::bad_request(INVALID_PAGINATION)),
	}
}

async fn log_request(req: Request, next: Next) -> Response {
	let method = req.method().clone();
	let path = req.uri().path().to_string();
	let started = Instant::now();
	let response = next.run(req).await;

	tracing::info!(
		%method,
		%path,
		status = response.status().as_u16(),
		elapsed_ms = started.elapsed().as_millis() as u64,
		"Request handled."
	);

	response
}

#[derive(Debug, Serialize)]
pub struct Envelope<T> {
	success: bool,
	data: T,
}

#[derive(Debug, Serialize)]
pub struct HistoryBody {
	success: bool,
	data: Vec<HistoryItem>,
	pagination: Pagination,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	message: Option<String>,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error: String,
	message: Option<String>,
}
impl ApiError {
	fn new(status: StatusCode, error: impl Into<String>, message: Option<String>) -> Self {
		Self { status, error: error.into(), message }
	}

	fn bad_request(error: impl Into<String>) -> Self {
		Self::new(StatusCode::BAD_REQUEST, error, None)
	}

	fn internal() -> Self {
		Self::server_error("An unexpected error occurred.")
	}

	fn server_error(message: &str) -> Self {
		Self::new(
			StatusCode::INTERNAL_SERVER_ERROR,
			"Internal server error",
			Some(message.to_string()),
		)
	}
}

impl From<ServiceError> for ApiError {
	fn from(err: ServiceError) -> Self {
		match err {
			ServiceError::Validation { message } => Self::bad_request(message),
			ServiceError::ServiceUnavailable { .. } =>
				Self::new(StatusCode::SERVICE_UNAVAILABLE, UNAVAILABLE_MESSAGE, None),
			ServiceError::Upstream { status, message } => {
				let status = StatusCode::from_u16(status)
					.ok()
					.filter(|status| status.is_client_error() || status.is_server_error())
					.unwrap_or(StatusCode::BAD_GATEWAY);

				Self::new(status, message, None)
			},
			ServiceError::MatcherCall { .. } =>
				Self::new(StatusCode::INTERNAL_SERVER_ERROR, MATCHER_CALL_FAILED, None),
			ServiceError::Persistence { op: StoreOp::RecordSearch, .. } => Self::server_error(
				"The song was matched but the search could not be saved. Please retry.",
			),
			ServiceError::Persistence { op: StoreOp::ReadHistory, .. } =>
				Self::server_error("Search history could not be loaded."),
			ServiceError::Internal { .. } => Self::internal(),
		}
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body = ErrorBody { error: self.error, message: self.message };

		(self.status, Json(body)).into_response()
	}
}
