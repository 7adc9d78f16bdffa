use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const RERANK_SCHEMA_NAME: &str = "finder_rerank";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RerankResult {
	pub chat_id: String,
	pub confidence: f32,
	pub why: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RerankResults {
	pub results: Vec<RerankResult>,
}
impl RerankResults {
	/// Checks the constraints the JSON schema declares but serde cannot express.
	pub fn validate(&self) -> Result<(), String> {
		for (index, result) in self.results.iter().enumerate() {
			if result.chat_id.trim().is_empty() {
				return Err(format!("results[{index}].chatId must be non-empty."));
			}
			if !result.confidence.is_finite() || !(0.0..=1.0).contains(&result.confidence) {
				return Err(format!("results[{index}].confidence must be within 0 and 1."));
			}
		}

		Ok(())
	}
}

pub fn rerank_schema() -> Value {
	serde_json::json!({
		"type": "object",
		"additionalProperties": false,
		"required": ["results"],
		"properties": {
			"results": {
				"type": "array",
				"items": {
					"type": "object",
					"additionalProperties": false,
					"required": ["chatId", "confidence", "why"],
					"properties": {
						"chatId": { "type": "string" },
						"confidence": { "type": "number", "minimum": 0, "maximum": 1 },
						"why": { "type": "string" }
					}
				}
			}
		}
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn rejects_out_of_range_confidence() {
		let parsed: RerankResults = serde_json::from_value(serde_json::json!({
			"results": [{ "chatId": "a", "confidence": 1.5, "why": "x" }]
		}))
		.expect("parse failed");

		assert!(parsed.validate().is_err());
	}

	#[test]
	fn rejects_unknown_fields() {
		let parsed = serde_json::from_value::<RerankResults>(serde_json::json!({
			"results": [{ "chatId": "a", "confidence": 0.5, "why": "x", "extra": true }]
		}));

		assert!(parsed.is_err());
	}
}
