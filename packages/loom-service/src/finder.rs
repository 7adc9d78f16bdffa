use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Error, LoomService, ParsedRequest, Result};
use loom_config::{MAX_CANDIDATES_CAP, RequestKind};
use loom_domain::{
	assemble::{FinderOption, assemble, index_candidates},
	lexical, prompt,
	rerank::{RERANK_SCHEMA_NAME, RerankResults, rerank_schema},
};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinderRequest {
	pub query: String,
	#[serde(default)]
	pub max_candidates: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinderResponse {
	pub query: String,
	pub options: Vec<FinderOption>,
}
impl FinderResponse {
	fn empty(query: String) -> Self {
		Self { query, options: Vec::new() }
	}
}

impl LoomService {
	/// Finds the user's threads that best match a free-text query.
	///
	/// A local lexical pass picks the candidates, then the finder model reranks them. No model
	/// call is made when the user has no threads.
	pub async fn find(&self, user_id: &str, req: FinderRequest) -> Result<FinderResponse> {
		let query = req.query.trim().to_string();

		if query.is_empty() {
			return Err(Error::invalid("query must be a non-empty string."));
		}

		let requested = validate_max_candidates(req.max_candidates)?;
		let threads = self.store.list_threads(user_id).await?;

		if threads.is_empty() {
			return Ok(FinderResponse::empty(req.query));
		}

		let limit = self.cfg.finder.candidate_limit(requested);
		let candidates = lexical::select(threads, &query, limit);

		if candidates.is_empty() {
			return Ok(FinderResponse::empty(req.query));
		}

		let top_k = self.cfg.finder.result_limit();
		let rerank_prompt = prompt::build_rerank_prompt(&query, &candidates, top_k);
		let response = self
			.dispatcher
			.create_parsed_response::<RerankResults>(ParsedRequest {
				kind: RequestKind::Finder,
				input: Value::String(rerank_prompt),
				schema: rerank_schema(),
				schema_name: RERANK_SCHEMA_NAME,
				instructions: None,
			})
			.await?;
		let results = response.require()?.results;
		let returned = results.len();
		let by_id = index_candidates(&candidates);
		let mut options = assemble(results, &by_id);

		if options.len() < returned {
			tracing::debug!(
				returned,
				kept = options.len(),
				"Dropped rerank results that reference unknown or repeated threads."
			);
		}

		options.truncate(top_k);

		Ok(FinderResponse { query: req.query, options })
	}
}

fn validate_max_candidates(value: Option<i64>) -> Result<Option<u32>> {
	let Some(value) = value else { return Ok(None) };

	if !(1..=i64::from(MAX_CANDIDATES_CAP)).contains(&value) {
		return Err(Error::invalid(format!(
			"maxCandidates must be an integer between 1 and {MAX_CANDIDATES_CAP}."
		)));
	}

	Ok(Some(value as u32))
}
