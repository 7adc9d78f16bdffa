use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::{
	ThreadMeta,
	lexical::{Candidate, cmp_f32_desc},
	rerank::RerankResult,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinderOption {
	pub chat_id: String,
	pub title: String,
	pub summary: Option<String>,
	pub updated_at: i64,
	pub confidence: f32,
	pub why: String,
}

pub fn index_candidates(candidates: &[Candidate]) -> HashMap<&str, &ThreadMeta> {
	candidates.iter().map(|candidate| (candidate.thread.id.as_str(), &candidate.thread)).collect()
}

/// Joins rerank output onto the candidates that were actually sent.
///
/// Results naming an id outside `candidate_by_id` are dropped, as are repeats of an id already
/// taken. The output is ordered by confidence, highest first.
pub fn assemble(
	results: Vec<RerankResult>,
	candidate_by_id: &HashMap<&str, &ThreadMeta>,
) -> Vec<FinderOption> {
	let mut seen = HashSet::new();
	let mut options = Vec::with_capacity(results.len());

	for result in results {
		let Some(thread) = candidate_by_id.get(result.chat_id.as_str()) else { continue };

		if !seen.insert(thread.id.as_str()) {
			continue;
		}

		options.push(FinderOption {
			chat_id: thread.id.clone(),
			title: thread.title.clone(),
			summary: thread.summary.clone(),
			updated_at: thread.updated_at,
			confidence: result.confidence,
			why: result.why,
		});
	}

	options.sort_by(|a, b| cmp_f32_desc(a.confidence, b.confidence));

	options
}
