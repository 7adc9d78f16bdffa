use std::collections::HashMap;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{BoxFuture, ChatTurn, Error, Message, Result, Thread, ThreadPatch, ThreadStore};
use loom_domain::{ThreadMeta, now_ms};

type UserThreads = HashMap<String, Thread>;

/// In-process [`ThreadStore`]. Contents live as long as the value does.
#[derive(Debug, Default)]
pub struct MemoryThreadStore {
	users: RwLock<HashMap<String, UserThreads>>,
}
impl MemoryThreadStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// Stores a fully formed thread as-is, replacing any thread with the same id.
	pub async fn insert(&self, user_id: &str, thread: Thread) {
		let mut users = self.users.write().await;

		users.entry(user_id.to_string()).or_default().insert(thread.meta.id.clone(), thread);
	}

	async fn modify<F>(&self, user_id: &str, thread_id: &str, apply: F) -> Result<Thread>
	where
		F: FnOnce(&mut Thread),
	{
		let mut users = self.users.write().await;
		let thread = users
			.get_mut(user_id)
			.and_then(|threads| threads.get_mut(thread_id))
			.ok_or_else(|| not_found(thread_id))?;

		apply(thread);

		thread.meta.updated_at = now_ms().max(thread.meta.updated_at);

		Ok(thread.clone())
	}
}

impl ThreadStore for MemoryThreadStore {
	fn list_threads<'a>(&'a self, user_id: &'a str) -> BoxFuture<'a, Result<Vec<ThreadMeta>>> {
		Box::pin(async move {
			let users = self.users.read().await;
			let mut threads: Vec<ThreadMeta> = users
				.get(user_id)
				.map(|threads| threads.values().map(|thread| thread.meta.clone()).collect())
				.unwrap_or_default();

			// Newest first; id breaks ties so listing order never depends on map iteration.
			threads.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then_with(|| a.id.cmp(&b.id)));

			Ok(threads)
		})
	}

	fn get_thread<'a>(
		&'a self,
		user_id: &'a str,
		thread_id: &'a str,
	) -> BoxFuture<'a, Result<Option<Thread>>> {
		Box::pin(async move {
			let users = self.users.read().await;

			Ok(users.get(user_id).and_then(|threads| threads.get(thread_id)).cloned())
		})
	}

	fn create_thread<'a>(
		&'a self,
		user_id: &'a str,
		title: &'a str,
	) -> BoxFuture<'a, Result<Thread>> {
		Box::pin(async move {
			let title = title.trim();

			if title.is_empty() {
				return Err(Error::InvalidArgument("Thread title must be non-empty.".to_string()));
			}

			let now = now_ms();
			let thread = Thread {
				meta: ThreadMeta {
					id: Uuid::new_v4().to_string(),
					title: title.to_string(),
					summary: None,
					updated_at: now,
				},
				created_at: now,
				last_response_id: None,
				messages: Vec::new(),
			};

			self.insert(user_id, thread.clone()).await;

			Ok(thread)
		})
	}

	fn update_thread<'a>(
		&'a self,
		user_id: &'a str,
		thread_id: &'a str,
		patch: ThreadPatch,
	) -> BoxFuture<'a, Result<Thread>> {
		Box::pin(async move {
			if patch.title.as_deref().is_some_and(|title| title.trim().is_empty()) {
				return Err(Error::InvalidArgument("Thread title must be non-empty.".to_string()));
			}

			self.modify(user_id, thread_id, |thread| {
				if let Some(title) = patch.title {
					thread.meta.title = title.trim().to_string();
				}
				if let Some(summary) = patch.summary {
					thread.meta.summary = Some(summary);
				}
			})
			.await
		})
	}

	fn append_message<'a>(
		&'a self,
		user_id: &'a str,
		thread_id: &'a str,
		message: Message,
	) -> BoxFuture<'a, Result<Thread>> {
		Box::pin(async move {
			self.modify(user_id, thread_id, |thread| thread.messages.push(message)).await
		})
	}

	fn record_turn<'a>(
		&'a self,
		user_id: &'a str,
		thread_id: &'a str,
		turn: ChatTurn,
	) -> BoxFuture<'a, Result<Thread>> {
		Box::pin(async move {
			self.modify(user_id, thread_id, |thread| {
				thread.messages.push(turn.user);
				thread.messages.push(turn.assistant);
				thread.last_response_id = Some(turn.response_id);
			})
			.await
		})
	}

	fn delete_thread<'a>(
		&'a self,
		user_id: &'a str,
		thread_id: &'a str,
	) -> BoxFuture<'a, Result<()>> {
		Box::pin(async move {
			let mut users = self.users.write().await;

			users
				.get_mut(user_id)
				.and_then(|threads| threads.remove(thread_id))
				.map(|_| ())
				.ok_or_else(|| not_found(thread_id))
		})
	}
}

fn not_found(thread_id: &str) -> Error {
	Error::NotFound(format!("Thread {thread_id} does not exist."))
}
