use time::{OffsetDateTime, macros::format_description};

use crate::lexical::Candidate;

pub const MISSING_SUMMARY: &str = "(no summary)";
pub const UNKNOWN_DATE: &str = "unknown";

/// Renders the rerank prompt for one finder request.
///
/// Output depends only on the arguments. The query is embedded verbatim apart from trimming.
/// Candidate titles and summaries are flattened so every candidate occupies exactly one numbered
/// line.
pub fn build_rerank_prompt(query: &str, candidates: &[Candidate], top_k: usize) -> String {
	let mut listing = String::new();

	for (index, candidate) in candidates.iter().enumerate() {
		let thread = &candidate.thread;
		let summary = thread
			.summary
			.as_deref()
			.map(single_line)
			.filter(|summary| !summary.is_empty())
			.unwrap_or_else(|| MISSING_SUMMARY.to_string());

		listing.push_str(&format!(
			"{number}. id: {id} | title: {title} | summary: {summary} | updated: {date}\n",
			number = index + 1,
			id = thread.id,
			title = single_line(&thread.title),
			date = iso_date(thread.updated_at),
		));
	}

	format!(
		"You help a user find one of their earlier conversations.\n\
\n\
User query:\n\
{query}\n\
\n\
Candidate conversations:\n\
{listing}\n\
Instructions:\n\
- Select only conversations that genuinely match the query. You may return fewer than {top_k} results, or none at all.\n\
- Return at most {top_k} results, ordered from most to least relevant.\n\
- For each match return chatId (the id exactly as listed), confidence (a number from 0 to 1), and why (one short sentence).\n",
		query = query.trim(),
	)
}

/// Formats epoch milliseconds as a UTC calendar date.
pub fn iso_date(ms: i64) -> String {
	let Ok(datetime) = OffsetDateTime::from_unix_timestamp_nanos(ms as i128 * 1_000_000) else {
		return UNKNOWN_DATE.to_string();
	};

	datetime
		.format(format_description!("[year]-[month]-[day]"))
		.unwrap_or_else(|_| UNKNOWN_DATE.to_string())
}

fn single_line(text: &str) -> String {
	text.split_whitespace().collect::<Vec<_>>().join(" ")
}
