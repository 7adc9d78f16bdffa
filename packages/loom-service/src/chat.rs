use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Error, LoomService, Result, TextRequest, thread_not_found};
use loom_config::RequestKind;
use loom_domain::now_ms;
use loom_storage::{ChatTurn, Message, Role, Thread};

const CHAT_INSTRUCTIONS: &str = "You are a helpful assistant continuing an ongoing conversation.";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatMode {
	#[default]
	Fast,
	Deep,
}
impl ChatMode {
	pub fn kind(self) -> RequestKind {
		match self {
			Self::Fast => RequestKind::ChatFast,
			Self::Deep => RequestKind::ChatDeep,
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplyRequest {
	pub message: String,
	#[serde(default)]
	pub mode: ChatMode,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyResponse {
	pub thread_id: String,
	pub response_id: String,
	pub model: String,
	pub reply: String,
}

impl LoomService {
	/// Sends a user message on a thread and records the assistant reply.
	///
	/// Turns chain through the backend: each call continues from the thread's last response id.
	/// Nothing is written to the thread unless the model call succeeds.
	pub async fn reply(
		&self,
		user_id: &str,
		thread_id: &str,
		req: ReplyRequest,
	) -> Result<ReplyResponse> {
		let content = req.message.trim();

		if content.is_empty() {
			return Err(Error::invalid("message must be a non-empty string."));
		}

		let thread = self
			.store
			.get_thread(user_id, thread_id)
			.await?
			.ok_or_else(|| thread_not_found(thread_id))?;
		let request = TextRequest {
			kind: req.mode.kind(),
			input: chat_input(&thread, content),
			previous_response_id: thread.last_response_id.clone(),
			instructions: Some(CHAT_INSTRUCTIONS.to_string()),
		};
		let response = self.dispatcher.create_text_response(request).await?;
		let now = now_ms();

		let turn = ChatTurn {
			user: Message { role: Role::User, content: content.to_string(), created_at: now },
			assistant: Message {
				role: Role::Assistant,
				content: response.text.clone(),
				created_at: now,
			},
			response_id: response.id.clone(),
		};

		self.store.record_turn(user_id, thread_id, turn).await?;

		Ok(ReplyResponse {
			thread_id: thread_id.to_string(),
			response_id: response.id,
			model: response.model,
			reply: response.text,
		})
	}
}

/// Builds the model input for one turn.
///
/// A chained turn only carries the new message because the backend already holds the history.
/// The first chained turn on a thread with earlier messages replays them so no context is lost.
fn chat_input(thread: &Thread, content: &str) -> Value {
	if thread.last_response_id.is_some() || thread.messages.is_empty() {
		return Value::String(content.to_string());
	}

	let mut items: Vec<Value> = thread
		.messages
		.iter()
		.map(|message| {
			serde_json::json!({ "role": message.role.as_str(), "content": message.content })
		})
		.collect();

	items.push(serde_json::json!({ "role": "user", "content": content }));

	Value::Array(items)
}
