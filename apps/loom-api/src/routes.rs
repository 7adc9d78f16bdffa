use axum::{
	Json, Router,
	extract::{Path, State, rejection::JsonRejection},
	http::{HeaderMap, StatusCode},
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::Serialize;

use crate::state::AppState;
use loom_service::{
	AppendMessageRequest, CodeTaskPlan, CodeTaskRequest, CreateThreadRequest, Error,
	FinderRequest, FinderResponse, IntentClassification, IntentRequest, RenameThreadRequest,
	ReplyRequest, ReplyResponse, SummaryResponse, ThreadListResponse,
};
use loom_storage::Thread;

pub const HEADER_USER_ID: &str = "x-user-id";

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/v1/finder", post(find))
		.route("/v1/threads", get(list_threads).post(create_thread))
		.route(
			"/v1/threads/{thread_id}",
			get(get_thread).patch(rename_thread).delete(delete_thread),
		)
		.route("/v1/threads/{thread_id}/messages", post(append_message))
		.route("/v1/threads/{thread_id}/summarize", post(summarize_thread))
		.route("/v1/threads/{thread_id}/reply", post(reply))
		.route("/v1/intent", post(classify_intent))
		.route("/v1/code_tasks", post(generate_code_task))
		.with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn find(
	State(state): State<AppState>,
	headers: HeaderMap,
	payload: Result<Json<FinderRequest>, JsonRejection>,
) -> Result<Json<FinderResponse>, ApiError> {
	let user_id = read_user_id(&headers)?;
	let response = state.service.find(user_id, body(payload)?).await?;

	Ok(Json(response))
}

async fn list_threads(
	State(state): State<AppState>,
	headers: HeaderMap,
) -> Result<Json<ThreadListResponse>, ApiError> {
	let user_id = read_user_id(&headers)?;
	let response = state.service.list_threads(user_id).await?;

	Ok(Json(response))
}

async fn create_thread(
	State(state): State<AppState>,
	headers: HeaderMap,
	payload: Result<Json<CreateThreadRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Thread>), ApiError> {
	let user_id = read_user_id(&headers)?;
	let thread = state.service.create_thread(user_id, body(payload)?).await?;

	Ok((StatusCode::CREATED, Json(thread)))
}

async fn get_thread(
	State(state): State<AppState>,
	headers: HeaderMap,
	Path(thread_id): Path<String>,
) -> Result<Json<Thread>, ApiError> {
	let user_id = read_user_id(&headers)?;
	let thread = state.service.get_thread(user_id, &thread_id).await?;

	Ok(Json(thread))
}

async fn rename_thread(
	State(state): State<AppState>,
	headers: HeaderMap,
	Path(thread_id): Path<String>,
	payload: Result<Json<RenameThreadRequest>, JsonRejection>,
) -> Result<Json<Thread>, ApiError> {
	let user_id = read_user_id(&headers)?;
	let thread = state.service.rename_thread(user_id, &thread_id, body(payload)?).await?;

	Ok(Json(thread))
}

async fn delete_thread(
	State(state): State<AppState>,
	headers: HeaderMap,
	Path(thread_id): Path<String>,
) -> Result<StatusCode, ApiError> {
	let user_id = read_user_id(&headers)?;

	state.service.delete_thread(user_id, &thread_id).await?;

	Ok(StatusCode::NO_CONTENT)
}

async fn append_message(
	State(state): State<AppState>,
	headers: HeaderMap,
	Path(thread_id): Path<String>,
	payload: Result<Json<AppendMessageRequest>, JsonRejection>,
) -> Result<Json<Thread>, ApiError> {
	let user_id = read_user_id(&headers)?;
	let thread = state.service.append_message(user_id, &thread_id, body(payload)?).await?;

	Ok(Json(thread))
}

async fn summarize_thread(
	State(state): State<AppState>,
	headers: HeaderMap,
	Path(thread_id): Path<String>,
) -> Result<Json<SummaryResponse>, ApiError> {
	let user_id = read_user_id(&headers)?;
	let response = state.service.summarize_thread(user_id, &thread_id).await?;

	Ok(Json(response))
}

async fn reply(
	State(state): State<AppState>,
	headers: HeaderMap,
	Path(thread_id): Path<String>,
	payload: Result<Json<ReplyRequest>, JsonRejection>,
) -> Result<Json<ReplyResponse>, ApiError> {
	let user_id = read_user_id(&headers)?;
	let response = state.service.reply(user_id, &thread_id, body(payload)?).await?;

	Ok(Json(response))
}

async fn classify_intent(
	State(state): State<AppState>,
	payload: Result<Json<IntentRequest>, JsonRejection>,
) -> Result<Json<IntentClassification>, ApiError> {
	let response = state.service.classify_intent(body(payload)?).await?;

	Ok(Json(response))
}

async fn generate_code_task(
	State(state): State<AppState>,
	payload: Result<Json<CodeTaskRequest>, JsonRejection>,
) -> Result<Json<CodeTaskPlan>, ApiError> {
	let response = state.service.generate_code_task(body(payload)?).await?;

	Ok(Json(response))
}

fn read_user_id(headers: &HeaderMap) -> Result<&str, ApiError> {
	headers
		.get(HEADER_USER_ID)
		.and_then(|raw| raw.to_str().ok())
		.map(str::trim)
		.filter(|value| !value.is_empty())
		.ok_or_else(|| {
			json_error(
				StatusCode::UNAUTHORIZED,
				"unauthorized",
				format!("Missing {HEADER_USER_ID} header."),
				Some(vec![HEADER_USER_ID.to_string()]),
			)
		})
}

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
	payload.map(|Json(value)| value).map_err(|rejection| {
		json_error(StatusCode::BAD_REQUEST, "invalid_request", rejection.body_text(), None)
	})
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}
impl ApiError {
	fn new(
		status: StatusCode,
		error_code: impl Into<String>,
		message: impl Into<String>,
		fields: Option<Vec<String>>,
	) -> Self {
		Self { status, error_code: error_code.into(), message: message.into(), fields }
	}
}

impl From<Error> for ApiError {
	fn from(err: Error) -> Self {
		match err {
			Error::InvalidRequest { message } =>
				json_error(StatusCode::BAD_REQUEST, "invalid_request", message, None),
			Error::NotFound { message } =>
				json_error(StatusCode::NOT_FOUND, "not_found", message, None),
			Error::Backend { status, .. } => {
				let status = StatusCode::from_u16(status)
					.ok()
					.filter(|code| code.is_client_error() || code.is_server_error())
					.unwrap_or(StatusCode::BAD_GATEWAY);

				json_error(status, "backend_error", err.to_string(), None)
			},
			Error::Provider { .. } =>
				json_error(StatusCode::INTERNAL_SERVER_ERROR, "provider_error", err.to_string(), None),
			Error::Parse { .. } =>
				json_error(StatusCode::INTERNAL_SERVER_ERROR, "parse_error", err.to_string(), None),
		}
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body =
			ErrorBody { error_code: self.error_code, message: self.message, fields: self.fields };

		(self.status, Json(body)).into_response()
	}
}

pub fn json_error(
	status: StatusCode,
	code: &str,
	message: impl Into<String>,
	fields: Option<Vec<String>>,
) -> ApiError {
	ApiError::new(status, code, message, fields)
}
