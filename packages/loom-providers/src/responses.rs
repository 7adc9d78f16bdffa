// std
use std::time::Duration;

// crates.io
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;

// self
use crate::{Error, Result};
use loom_config::{ProviderConfig, ReasoningEffort, Verbosity};

/// Wire parameters for one call to the Responses endpoint. Built fresh per call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseParams {
	pub model: String,
	pub input: Value,
	/// Whether the backend keeps the response so a later call can chain onto it.
	pub store: bool,
	pub reasoning: ReasoningParams,
	pub text: TextParams,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub previous_response_id: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub instructions: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReasoningParams {
	pub effort: ReasoningEffort,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextParams {
	pub verbosity: Verbosity,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub format: Option<TextFormat>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TextFormat {
	JsonSchema { name: String, schema: Value, strict: bool },
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
	pub id: String,
	pub body: Value,
}

/// Result of a backend call, discriminated so callers match on shape instead of error type.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
	Success(T),
	/// The backend answered with a non-success status.
	BackendRejected { status: u16, message: String, code: Option<String> },
	/// The backend answered with success but the body is unusable.
	Malformed { message: String },
	/// Anything else, e.g. transport failures and timeouts.
	Unknown { message: String },
}

/// Shared HTTP client for the Responses endpoint.
///
/// Construct once at startup; a missing API key fails here rather than on the first request.
#[derive(Debug, Clone)]
pub struct ResponsesClient {
	http: Client,
	url: String,
}
impl ResponsesClient {
	pub fn new(cfg: &ProviderConfig) -> Result<Self> {
		if cfg.api_key.trim().is_empty() {
			return Err(Error::InvalidConfig {
				message: format!("Provider {} api_key must be non-empty.", cfg.provider_id),
			});
		}

		let http = Client::builder()
			.timeout(Duration::from_millis(cfg.timeout_ms))
			.default_headers(crate::auth_headers(&cfg.api_key, &cfg.default_headers)?)
			.build()?;
		let url = format!("{}{}", cfg.api_base, cfg.path);

		Ok(Self { http, url })
	}

	pub fn url(&self) -> &str {
		&self.url
	}

	pub async fn create(&self, params: &ResponseParams) -> Outcome<RawResponse> {
		let res = match self.http.post(&self.url).json(params).send().await {
			Ok(res) => res,
			Err(err) => return Outcome::Unknown { message: err.to_string() },
		};
		let status = res.status().as_u16();
		let body = match res.text().await {
			Ok(body) => body,
			Err(err) => return Outcome::Unknown { message: err.to_string() },
		};

		parse_response(status, &body)
	}
}

pub fn parse_response(status: u16, body: &str) -> Outcome<RawResponse> {
	if !(200..300).contains(&status) {
		return rejected(status, body);
	}

	let json: Value = match serde_json::from_str(body) {
		Ok(json) => json,
		Err(err) => {
			return Outcome::Malformed { message: format!("Response body is not JSON: {err}.") };
		},
	};
	let Some(id) = json.get("id").and_then(Value::as_str) else {
		return Outcome::Malformed { message: "Response is missing an id.".to_string() };
	};

	Outcome::Success(RawResponse { id: id.to_string(), body: json })
}

/// Returns the assistant text of a response body.
///
/// Prefers the `output_text` convenience field, then the first assistant `output_text` segment
/// among the output items, then an empty string.
pub fn extract_output_text(body: &Value) -> String {
	if let Some(text) = body.get("output_text").and_then(Value::as_str)
		&& !text.is_empty()
	{
		return text.to_string();
	}

	let items = body.get("output").and_then(Value::as_array).map(Vec::as_slice).unwrap_or_default();

	for item in items {
		if item.get("type").and_then(Value::as_str) != Some("message")
			|| item.get("role").and_then(Value::as_str) != Some("assistant")
		{
			continue;
		}

		let segments =
			item.get("content").and_then(Value::as_array).map(Vec::as_slice).unwrap_or_default();

		for segment in segments {
			if segment.get("type").and_then(Value::as_str) == Some("output_text")
				&& let Some(text) = segment.get("text").and_then(Value::as_str)
			{
				return text.to_string();
			}
		}
	}

	String::new()
}

fn rejected<T>(status: u16, body: &str) -> Outcome<T> {
	let error = serde_json::from_str::<Value>(body).ok().and_then(|json| json.get("error").cloned());
	let message = error
		.as_ref()
		.and_then(|error| error.get("message"))
		.and_then(Value::as_str)
		.map(str::to_string)
		.filter(|message| !message.is_empty())
		.unwrap_or_else(|| {
			let trimmed = body.trim();

			if trimmed.is_empty() {
				format!("Backend returned status {status}.")
			} else {
				trimmed.to_string()
			}
		});
	let code = error
		.as_ref()
		.and_then(|error| error.get("code").or_else(|| error.get("type")))
		.and_then(Value::as_str)
		.map(str::to_string);

	tracing::warn!(status, code = code.as_deref(), "Responses backend rejected the request.");

	Outcome::BackendRejected { status, message, code }
}
