use loom_config::{ReasoningEffort, RequestKind};

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Not found: {message}")]
	NotFound { message: String },
	#[error(
		"Backend rejected {kind} request (model {model}, reasoning {effort}) with status {status}: {message}"
	)]
	Backend {
		status: u16,
		code: Option<String>,
		message: String,
		kind: RequestKind,
		model: String,
		effort: ReasoningEffort,
	},
	#[error("Provider error: {message}")]
	Provider { message: String },
	#[error("Parse error: {message}")]
	Parse { message: String },
}
impl Error {
	pub(crate) fn invalid(message: impl Into<String>) -> Self {
		Self::InvalidRequest { message: message.into() }
	}
}

impl From<loom_storage::Error> for Error {
	fn from(err: loom_storage::Error) -> Self {
		match err {
			loom_storage::Error::InvalidArgument(message) => Self::InvalidRequest { message },
			loom_storage::Error::NotFound(message) => Self::NotFound { message },
		}
	}
}
