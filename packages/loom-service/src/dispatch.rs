use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{Error, ResponsesProvider, Result};
use loom_config::{ModelRegistry, RequestKind, ResolvedModel};
use loom_providers::{
	Outcome, RawResponse, ReasoningParams, ResponseParams, TextFormat, TextParams,
	responses::extract_output_text,
};

/// A structured output shape, validated after deserialization.
pub trait Contract
where
	Self: DeserializeOwned,
{
	/// Checks constraints that deserialization alone does not enforce, such as numeric bounds.
	fn validate(&self) -> std::result::Result<(), String>;
}

impl Contract for loom_domain::rerank::RerankResults {
	fn validate(&self) -> std::result::Result<(), String> {
		loom_domain::rerank::RerankResults::validate(self)
	}
}

#[derive(Debug, Clone)]
pub struct TextRequest {
	pub kind: RequestKind,
	pub input: Value,
	pub previous_response_id: Option<String>,
	pub instructions: Option<String>,
}
impl TextRequest {
	pub fn new(kind: RequestKind, input: impl Into<Value>) -> Self {
		Self { kind, input: input.into(), previous_response_id: None, instructions: None }
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextResponse {
	pub id: String,
	pub text: String,
	pub model: String,
}

#[derive(Debug, Clone)]
pub struct ParsedRequest {
	pub kind: RequestKind,
	pub input: Value,
	pub schema: Value,
	pub schema_name: &'static str,
	pub instructions: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ParsedResponse<T> {
	pub id: String,
	/// `None` when the backend answered but its output did not satisfy the schema.
	pub parsed: Option<T>,
	pub kind: RequestKind,
	pub schema_name: &'static str,
}
impl<T> ParsedResponse<T> {
	/// Turns a non-conforming answer into [`Error::Parse`]. No retry is attempted.
	pub fn require(self) -> Result<T> {
		self.parsed.ok_or_else(|| Error::Parse {
			message: format!(
				"{} response {} did not match the {} schema.",
				self.kind, self.id, self.schema_name
			),
		})
	}
}

/// Single entry point for every model call.
#[derive(Clone)]
pub struct Dispatcher {
	registry: Arc<ModelRegistry>,
	provider: Arc<dyn ResponsesProvider>,
}
impl Dispatcher {
	pub fn new(registry: Arc<ModelRegistry>, provider: Arc<dyn ResponsesProvider>) -> Self {
		Self { registry, provider }
	}

	pub fn registry(&self) -> &ModelRegistry {
		&self.registry
	}

	pub async fn create_text_response(&self, req: TextRequest) -> Result<TextResponse> {
		let resolved = self.registry.resolve(req.kind);
		let params = build_params(
			&resolved,
			req.input,
			resolved.kind.is_chained(),
			req.previous_response_id,
			req.instructions,
			None,
		);
		let raw = self.send(&resolved, &params).await?;
		let text = extract_output_text(&raw.body);

		Ok(TextResponse { id: raw.id, text, model: resolved.model })
	}

	pub async fn create_parsed_response<T>(&self, req: ParsedRequest) -> Result<ParsedResponse<T>>
	where
		T: Contract,
	{
		let resolved = self.registry.resolve(req.kind);
		let format = TextFormat::JsonSchema {
			name: req.schema_name.to_string(),
			schema: req.schema,
			strict: true,
		};
		// Structured calls are one-shots and are never stored for chaining.
		let params = build_params(&resolved, req.input, false, None, req.instructions, Some(format));
		let raw = self.send(&resolved, &params).await?;
		let parsed = parse_contract::<T>(&raw.body, req.kind, req.schema_name);

		Ok(ParsedResponse { id: raw.id, parsed, kind: req.kind, schema_name: req.schema_name })
	}

	async fn send(&self, resolved: &ResolvedModel, params: &ResponseParams) -> Result<RawResponse> {
		tracing::debug!(
			kind = %resolved.kind,
			model = %resolved.model,
			effort = %resolved.effort,
			store = params.store,
			chained = params.previous_response_id.is_some(),
			"Dispatching model request."
		);

		match self.provider.respond(params).await {
			Outcome::Success(raw) => Ok(raw),
			Outcome::BackendRejected { status, message, code } => Err(Error::Backend {
				status,
				code,
				message,
				kind: resolved.kind,
				model: resolved.model.clone(),
				effort: resolved.effort,
			}),
			Outcome::Malformed { message } | Outcome::Unknown { message } => {
				tracing::warn!(kind = %resolved.kind, model = %resolved.model, %message, "Model request failed.");

				Err(Error::Provider { message })
			},
		}
	}
}

pub fn build_params(
	resolved: &ResolvedModel,
	input: Value,
	store: bool,
	previous_response_id: Option<String>,
	instructions: Option<String>,
	format: Option<TextFormat>,
) -> ResponseParams {
	ResponseParams {
		model: resolved.model.clone(),
		input,
		store,
		reasoning: ReasoningParams { effort: resolved.effort },
		text: TextParams { verbosity: resolved.verbosity, format },
		previous_response_id,
		instructions,
	}
}

fn parse_contract<T>(body: &Value, kind: RequestKind, schema_name: &str) -> Option<T>
where
	T: Contract,
{
	let text = extract_output_text(body);

	if text.trim().is_empty() {
		tracing::warn!(%kind, schema_name, "Structured response carried no output text.");

		return None;
	}

	let parsed: T = match serde_json::from_str(&text) {
		Ok(parsed) => parsed,
		Err(err) => {
			tracing::warn!(%kind, schema_name, error = %err, "Structured response does not match its schema.");

			return None;
		},
	};

	if let Err(message) = parsed.validate() {
		tracing::warn!(%kind, schema_name, %message, "Structured response violates its schema.");

		return None;
	}

	Some(parsed)
}
