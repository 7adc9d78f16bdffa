use serde::{Deserialize, Serialize};

use crate::{Error, LoomService, Result, thread_not_found};
use loom_domain::{ThreadMeta, now_ms};
use loom_storage::{Message, Role, Thread, ThreadPatch};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateThreadRequest {
	pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenameThreadRequest {
	pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppendMessageRequest {
	pub role: Role,
	pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreadListResponse {
	pub threads: Vec<ThreadMeta>,
}

impl LoomService {
	pub async fn list_threads(&self, user_id: &str) -> Result<ThreadListResponse> {
		Ok(ThreadListResponse { threads: self.store.list_threads(user_id).await? })
	}

	pub async fn get_thread(&self, user_id: &str, thread_id: &str) -> Result<Thread> {
		self.store.get_thread(user_id, thread_id).await?.ok_or_else(|| thread_not_found(thread_id))
	}

	pub async fn create_thread(&self, user_id: &str, req: CreateThreadRequest) -> Result<Thread> {
		Ok(self.store.create_thread(user_id, &req.title).await?)
	}

	pub async fn rename_thread(
		&self,
		user_id: &str,
		thread_id: &str,
		req: RenameThreadRequest,
	) -> Result<Thread> {
		let patch = ThreadPatch { title: Some(req.title), ..Default::default() };

		Ok(self.store.update_thread(user_id, thread_id, patch).await?)
	}

	pub async fn append_message(
		&self,
		user_id: &str,
		thread_id: &str,
		req: AppendMessageRequest,
	) -> Result<Thread> {
		if req.content.trim().is_empty() {
			return Err(Error::invalid("content must be a non-empty string."));
		}

		let message = Message { role: req.role, content: req.content, created_at: now_ms() };

		Ok(self.store.append_message(user_id, thread_id, message).await?)
	}

	pub async fn delete_thread(&self, user_id: &str, thread_id: &str) -> Result<()> {
		Ok(self.store.delete_thread(user_id, thread_id).await?)
	}
}
