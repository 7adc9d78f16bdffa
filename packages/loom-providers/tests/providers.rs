use reqwest::header::AUTHORIZATION;
use serde_json::{Map, Value};

use loom_config::{ProviderConfig, ReasoningEffort, Verbosity};
use loom_providers::{
	Error, ReasoningParams, ResponseParams, ResponsesClient, TextFormat, TextParams,
};

fn provider(api_key: &str) -> ProviderConfig {
	ProviderConfig {
		provider_id: "test".to_string(),
		api_base: "http://127.0.0.1:1".to_string(),
		api_key: api_key.to_string(),
		path: "/v1/responses".to_string(),
		timeout_ms: 1_000,
		default_headers: Map::new(),
	}
}

#[test]
fn builds_bearer_auth_header() {
	let headers =
		loom_providers::auth_headers("secret", &Map::new()).expect("Failed to build headers.");
	let value = headers.get(AUTHORIZATION).expect("Missing authorization header.");

	assert_eq!(value, "Bearer secret");
}

#[test]
fn rejects_non_string_default_headers() {
	let mut extra = Map::new();

	extra.insert("x-count".to_string(), Value::from(3));

	assert!(matches!(
		loom_providers::auth_headers("secret", &extra),
		Err(Error::InvalidConfig { .. })
	));
}

#[test]
fn client_requires_api_key_at_construction() {
	assert!(matches!(ResponsesClient::new(&provider("  ")), Err(Error::InvalidConfig { .. })));

	let client = ResponsesClient::new(&provider("key")).expect("Client must build.");

	assert_eq!(client.url(), "http://127.0.0.1:1/v1/responses");
}

#[test]
fn params_omit_absent_chain_fields() {
	let params = ResponseParams {
		model: "gpt-5-mini".to_string(),
		input: Value::from("hello"),
		store: false,
		reasoning: ReasoningParams { effort: ReasoningEffort::Low },
		text: TextParams { verbosity: Verbosity::Low, format: None },
		previous_response_id: None,
		instructions: None,
	};
	let json = serde_json::to_value(&params).expect("serialize failed");

	assert_eq!(
		json,
		serde_json::json!({
			"model": "gpt-5-mini",
			"input": "hello",
			"store": false,
			"reasoning": { "effort": "low" },
			"text": { "verbosity": "low" }
		})
	);
}

#[test]
fn params_render_json_schema_format() {
	let params = ResponseParams {
		model: "gpt-5".to_string(),
		input: Value::from("hi"),
		store: true,
		reasoning: ReasoningParams { effort: ReasoningEffort::High },
		text: TextParams {
			verbosity: Verbosity::Medium,
			format: Some(TextFormat::JsonSchema {
				name: "shape".to_string(),
				schema: serde_json::json!({ "type": "object" }),
				strict: true,
			}),
		},
		previous_response_id: Some("resp_1".to_string()),
		instructions: Some("be brief".to_string()),
	};
	let json = serde_json::to_value(&params).expect("serialize failed");

	assert_eq!(json["previous_response_id"], "resp_1");
	assert_eq!(json["instructions"], "be brief");
	assert_eq!(json["reasoning"]["effort"], "high");
	assert_eq!(
		json["text"]["format"],
		serde_json::json!({
			"type": "json_schema",
			"name": "shape",
			"schema": { "type": "object" },
			"strict": true
		})
	);
}
