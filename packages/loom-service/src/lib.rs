pub mod chat;
pub mod code_task;
pub mod dispatch;
pub mod finder;
pub mod intent;
pub mod summarize;
pub mod threads;

mod error;

pub use chat::{ChatMode, ReplyRequest, ReplyResponse};
pub use code_task::{CodeTaskPlan, CodeTaskRequest};
pub use dispatch::{
	Contract, Dispatcher, ParsedRequest, ParsedResponse, TextRequest, TextResponse,
};
pub use error::{Error, Result};
pub use finder::{FinderRequest, FinderResponse};
pub use intent::{Intent, IntentClassification, IntentRequest};
pub use loom_storage::BoxFuture;
pub use summarize::SummaryResponse;
pub use threads::{
	AppendMessageRequest, CreateThreadRequest, RenameThreadRequest, ThreadListResponse,
};

use std::sync::Arc;

use loom_config::{Config, ModelRegistry};
use loom_providers::{Outcome, RawResponse, ResponseParams, ResponsesClient};
use loom_storage::ThreadStore;

/// Model backend seam. The service only ever talks to the backend through this trait.
pub trait ResponsesProvider
where
	Self: Send + Sync,
{
	fn respond<'a>(&'a self, params: &'a ResponseParams) -> BoxFuture<'a, Outcome<RawResponse>>;
}

impl ResponsesProvider for ResponsesClient {
	fn respond<'a>(&'a self, params: &'a ResponseParams) -> BoxFuture<'a, Outcome<RawResponse>> {
		Box::pin(self.create(params))
	}
}

pub struct LoomService {
	pub cfg: Config,
	pub store: Arc<dyn ThreadStore>,
	pub dispatcher: Dispatcher,
}
impl LoomService {
	pub fn new(
		cfg: Config,
		registry: Arc<ModelRegistry>,
		store: Arc<dyn ThreadStore>,
		provider: Arc<dyn ResponsesProvider>,
	) -> Self {
		Self { cfg, store, dispatcher: Dispatcher::new(registry, provider) }
	}
}

pub(crate) fn thread_not_found(thread_id: &str) -> Error {
	Error::NotFound { message: format!("Thread {thread_id} does not exist.") }
}
