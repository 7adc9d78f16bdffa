use serde::{Deserialize, Serialize};

use loom_domain::ThreadMeta;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
	User,
	Assistant,
}
impl Role {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::User => "user",
			Self::Assistant => "assistant",
		}
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
	pub role: Role,
	pub content: String,
	pub created_at: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Thread {
	#[serde(flatten)]
	pub meta: ThreadMeta,
	pub created_at: i64,
	/// Backend response id of the last chained reply, used to continue the conversation.
	pub last_response_id: Option<String>,
	pub messages: Vec<Message>,
}

/// Partial update. `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct ThreadPatch {
	pub title: Option<String>,
	pub summary: Option<String>,
}

/// One completed chat exchange and the backend response id that continues the chain.
#[derive(Debug, Clone)]
pub struct ChatTurn {
	pub user: Message,
	pub assistant: Message,
	pub response_id: String,
}
