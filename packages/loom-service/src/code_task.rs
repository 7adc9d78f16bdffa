use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Contract, Error, LoomService, ParsedRequest, Result};
use loom_config::RequestKind;

pub const CODE_TASK_SCHEMA_NAME: &str = "code_task_plan";

const CODE_TASK_INSTRUCTIONS: &str = "Turn the request into a concrete coding task. \
Give it a short imperative title, a one-sentence summary and an ordered list of small, \
verifiable implementation steps.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CodeTaskPlan {
	pub title: String,
	pub summary: String,
	pub steps: Vec<String>,
}
impl Contract for CodeTaskPlan {
	fn validate(&self) -> std::result::Result<(), String> {
		if self.title.trim().is_empty() {
			return Err("title must be non-empty.".to_string());
		}
		if self.steps.is_empty() {
			return Err("steps must contain at least one step.".to_string());
		}
		if let Some(index) = self.steps.iter().position(|step| step.trim().is_empty()) {
			return Err(format!("steps[{index}] must be non-empty."));
		}

		Ok(())
	}
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeTaskRequest {
	pub prompt: String,
}

impl LoomService {
	pub async fn generate_code_task(&self, req: CodeTaskRequest) -> Result<CodeTaskPlan> {
		let prompt = req.prompt.trim();

		if prompt.is_empty() {
			return Err(Error::invalid("prompt must be a non-empty string."));
		}

		self.dispatcher
			.create_parsed_response::<CodeTaskPlan>(ParsedRequest {
				kind: RequestKind::CodeTask,
				input: Value::String(prompt.to_string()),
				schema: code_task_schema(),
				schema_name: CODE_TASK_SCHEMA_NAME,
				instructions: Some(CODE_TASK_INSTRUCTIONS.to_string()),
			})
			.await?
			.require()
	}
}

pub fn code_task_schema() -> Value {
	serde_json::json!({
		"type": "object",
		"additionalProperties": false,
		"required": ["title", "summary", "steps"],
		"properties": {
			"title": { "type": "string" },
			"summary": { "type": "string" },
			"steps": { "type": "array", "items": { "type": "string" } }
		}
	})
}
