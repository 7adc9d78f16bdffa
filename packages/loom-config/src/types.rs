use serde::Deserialize;
use serde_json::{Map, Value};

pub const DEFAULT_MAX_CANDIDATES: u32 = 30;
pub const DEFAULT_TOP_K: u32 = 5;
/// Upper bound for any candidate or result count, whatever its source.
pub const MAX_CANDIDATES_CAP: u32 = 60;
pub const DEFAULT_SUMMARY_PLACEHOLDER: &str = "No summary available.";

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub providers: Providers,
	#[serde(default)]
	pub finder: Finder,
	#[serde(default)]
	pub summary: Summary,
	pub security: Security,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
}

#[derive(Debug, Deserialize)]
pub struct Providers {
	pub responses: ProviderConfig,
}

#[derive(Debug, Deserialize)]
pub struct ProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	#[serde(default)]
	pub api_key: String,
	pub path: String,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Finder {
	/// Candidate count sent to the reranker when a request does not ask for one.
	pub max_candidates: u32,
	/// Result count requested from the reranker. Operator-controlled only.
	pub top_k: u32,
}
impl Finder {
	/// Candidate budget for one request. The request value wins over the configured default and
	/// both are clamped to [`MAX_CANDIDATES_CAP`].
	pub fn candidate_limit(&self, requested: Option<u32>) -> usize {
		requested.unwrap_or(self.max_candidates).clamp(1, MAX_CANDIDATES_CAP) as usize
	}

	pub fn result_limit(&self) -> usize {
		self.top_k.clamp(1, MAX_CANDIDATES_CAP) as usize
	}
}
impl Default for Finder {
	fn default() -> Self {
		Self { max_candidates: DEFAULT_MAX_CANDIDATES, top_k: DEFAULT_TOP_K }
	}
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Summary {
	/// Stored when the backend succeeds but returns no text.
	pub placeholder: String,
}
impl Default for Summary {
	fn default() -> Self {
		Self { placeholder: DEFAULT_SUMMARY_PLACEHOLDER.to_string() }
	}
}

#[derive(Debug, Deserialize)]
pub struct Security {
	pub bind_localhost_only: bool,
}
