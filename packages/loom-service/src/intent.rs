use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Contract, Error, LoomService, ParsedRequest, Result};
use loom_config::RequestKind;

pub const INTENT_SCHEMA_NAME: &str = "intent_classification";

const INTENT_INSTRUCTIONS: &str = "Classify what the user wants from their message. \
Use search when they are looking for an earlier conversation, code_task when they ask for a \
change to a codebase, and chat for everything else. Give a confidence from 0 to 1 and one short \
sentence as the reason.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
	Chat,
	Search,
	CodeTask,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IntentClassification {
	pub intent: Intent,
	pub confidence: f32,
	pub reason: String,
}
impl Contract for IntentClassification {
	fn validate(&self) -> std::result::Result<(), String> {
		if !self.confidence.is_finite() || !(0.0..=1.0).contains(&self.confidence) {
			return Err("confidence must be within 0 and 1.".to_string());
		}

		Ok(())
	}
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntentRequest {
	pub message: String,
}

impl LoomService {
	pub async fn classify_intent(&self, req: IntentRequest) -> Result<IntentClassification> {
		let message = req.message.trim();

		if message.is_empty() {
			return Err(Error::invalid("message must be a non-empty string."));
		}

		self.dispatcher
			.create_parsed_response::<IntentClassification>(ParsedRequest {
				kind: RequestKind::Intent,
				input: Value::String(message.to_string()),
				schema: intent_schema(),
				schema_name: INTENT_SCHEMA_NAME,
				instructions: Some(INTENT_INSTRUCTIONS.to_string()),
			})
			.await?
			.require()
	}
}

pub fn intent_schema() -> Value {
	serde_json::json!({
		"type": "object",
		"additionalProperties": false,
		"required": ["intent", "confidence", "reason"],
		"properties": {
			"intent": { "type": "string", "enum": ["chat", "search", "code_task"] },
			"confidence": { "type": "number", "minimum": 0, "maximum": 1 },
			"reason": { "type": "string" }
		}
	})
}
