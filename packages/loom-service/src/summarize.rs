use serde::{Deserialize, Serialize};

use crate::{Error, LoomService, Result, TextRequest, thread_not_found};
use loom_config::RequestKind;
use loom_storage::{Thread, ThreadPatch};

const SUMMARY_INSTRUCTIONS: &str = "Summarize the conversation below in one or two plain sentences. \
Focus on the topic and any conclusions so the user can recognize the conversation later. \
Do not add a preamble.";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResponse {
	pub thread_id: String,
	pub summary: String,
	/// True when the backend returned no text and the configured placeholder was stored.
	pub placeholder: bool,
}

impl LoomService {
	pub async fn summarize_thread(&self, user_id: &str, thread_id: &str) -> Result<SummaryResponse> {
		let thread = self
			.store
			.get_thread(user_id, thread_id)
			.await?
			.ok_or_else(|| thread_not_found(thread_id))?;

		if thread.messages.is_empty() {
			return Err(Error::invalid(format!("Thread {thread_id} has no messages to summarize.")));
		}

		let mut req = TextRequest::new(RequestKind::Summarize, render_transcript(&thread));

		req.instructions = Some(SUMMARY_INSTRUCTIONS.to_string());

		let response = self.dispatcher.create_text_response(req).await?;
		let text = response.text.trim();
		let placeholder = text.is_empty();
		let summary = if placeholder {
			tracing::info!(thread_id, response_id = %response.id, "Summary came back empty; storing placeholder.");

			self.cfg.summary.placeholder.clone()
		} else {
			text.to_string()
		};

		self.store
			.update_thread(
				user_id,
				thread_id,
				ThreadPatch { summary: Some(summary.clone()), ..Default::default() },
			)
			.await?;

		Ok(SummaryResponse { thread_id: thread_id.to_string(), summary, placeholder })
	}
}

fn render_transcript(thread: &Thread) -> String {
	let mut out = format!("Title: {}\n\n", thread.meta.title);

	for message in &thread.messages {
		out.push_str(&format!("{}: {}\n", message.role.as_str(), message.content.trim()));
	}

	out
}
