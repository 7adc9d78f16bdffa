use std::{cmp::Ordering, collections::HashSet};

use crate::{ThreadMeta, tokenize::tokenize};

pub const TITLE_WEIGHT: f32 = 3.0;
pub const SUMMARY_WEIGHT: f32 = 1.0;
pub const RECENCY_BOOST: f32 = 0.5;
/// Seven days in milliseconds. Threads updated strictly more recently get [`RECENCY_BOOST`].
pub const RECENCY_WINDOW_MS: i64 = 7 * 24 * 3_600 * 1_000;

#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
	pub thread: ThreadMeta,
	pub score: f32,
}

pub fn query_terms(query: &str) -> HashSet<String> {
	tokenize(query).into_iter().collect()
}

pub fn score(query: &str, thread: &ThreadMeta, now_ms: i64) -> f32 {
	score_terms(&query_terms(query), thread, now_ms)
}

/// Scores a thread against an already tokenized query.
///
/// Title and summary tokens are counted with repetition, so a title that repeats a query word
/// scores higher than one that mentions it once.
pub fn score_terms(terms: &HashSet<String>, thread: &ThreadMeta, now_ms: i64) -> f32 {
	if terms.is_empty() {
		return 0.0;
	}

	let title_matches = count_matches(terms, &thread.title);
	let summary_matches = count_matches(terms, thread.summary.as_deref().unwrap_or(""));
	let match_score =
		TITLE_WEIGHT * title_matches as f32 + SUMMARY_WEIGHT * summary_matches as f32;

	match_score + recency_boost(thread.updated_at, now_ms)
}

pub fn recency_boost(updated_at: i64, now_ms: i64) -> f32 {
	if now_ms.saturating_sub(updated_at) < RECENCY_WINDOW_MS { RECENCY_BOOST } else { 0.0 }
}

pub fn select(threads: Vec<ThreadMeta>, query: &str, max_candidates: usize) -> Vec<Candidate> {
	select_at(threads, query, max_candidates, crate::now_ms())
}

/// Ranks threads by lexical score and keeps the first `max_candidates`.
///
/// `now_ms` is read once by the caller so every thread in the batch sees the same recency
/// cutoff. Equal scores keep their input order.
pub fn select_at(
	threads: Vec<ThreadMeta>,
	query: &str,
	max_candidates: usize,
	now_ms: i64,
) -> Vec<Candidate> {
	let terms = query_terms(query);
	let mut candidates: Vec<Candidate> = threads
		.into_iter()
		.map(|thread| {
			let score = score_terms(&terms, &thread, now_ms);

			Candidate { thread, score }
		})
		.collect();

	candidates.sort_by(|a, b| cmp_f32_desc(a.score, b.score));
	candidates.truncate(max_candidates);

	candidates
}

pub fn cmp_f32_desc(a: f32, b: f32) -> Ordering {
	match (a.is_nan(), b.is_nan()) {
		(true, true) => Ordering::Equal,
		(true, false) => Ordering::Greater,
		(false, true) => Ordering::Less,
		(false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
	}
}

fn count_matches(terms: &HashSet<String>, text: &str) -> usize {
	tokenize(text).iter().filter(|token| terms.contains(token.as_str())).count()
}
