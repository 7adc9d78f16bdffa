pub mod assemble;
pub mod lexical;
pub mod prompt;
pub mod rerank;
pub mod tokenize;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Read-only view of a stored conversation used by retrieval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadMeta {
	pub id: String,
	pub title: String,
	pub summary: Option<String>,
	/// Milliseconds since the Unix epoch.
	pub updated_at: i64,
}

pub fn now_ms() -> i64 {
	(OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64
}
