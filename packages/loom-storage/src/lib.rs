pub mod memory;
pub mod models;

mod error;

pub use error::Error;
pub use memory::MemoryThreadStore;
pub use models::{ChatTurn, Message, Role, Thread, ThreadPatch};

use std::{future::Future, pin::Pin};

use loom_domain::ThreadMeta;

pub type Result<T, E = Error> = std::result::Result<T, E>;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Per-user conversation storage.
///
/// `user_id` is opaque; resolving it from a session is the caller's job. Operations on a thread
/// the user does not own behave exactly like operations on a missing thread.
pub trait ThreadStore
where
	Self: Send + Sync,
{
	/// Thread metadata ordered by `updated_at`, newest first.
	fn list_threads<'a>(&'a self, user_id: &'a str) -> BoxFuture<'a, Result<Vec<ThreadMeta>>>;

	fn get_thread<'a>(
		&'a self,
		user_id: &'a str,
		thread_id: &'a str,
	) -> BoxFuture<'a, Result<Option<Thread>>>;

	fn create_thread<'a>(&'a self, user_id: &'a str, title: &'a str)
	-> BoxFuture<'a, Result<Thread>>;

	fn update_thread<'a>(
		&'a self,
		user_id: &'a str,
		thread_id: &'a str,
		patch: ThreadPatch,
	) -> BoxFuture<'a, Result<Thread>>;

	fn append_message<'a>(
		&'a self,
		user_id: &'a str,
		thread_id: &'a str,
		message: Message,
	) -> BoxFuture<'a, Result<Thread>>;

	/// Appends both messages of a turn and records its response id as one update.
	fn record_turn<'a>(
		&'a self,
		user_id: &'a str,
		thread_id: &'a str,
		turn: ChatTurn,
	) -> BoxFuture<'a, Result<Thread>>;

	fn delete_thread<'a>(&'a self, user_id: &'a str, thread_id: &'a str)
	-> BoxFuture<'a, Result<()>>;
}
