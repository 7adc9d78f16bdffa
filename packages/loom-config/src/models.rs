use std::{
	collections::HashMap,
	fmt,
	sync::atomic::{AtomicBool, Ordering},
};

use serde::{Deserialize, Serialize};

use crate::EnvSnapshot;

/// Unified model override for both chained chat kinds.
pub const OPENAI_MODEL_CHAT: &str = "OPENAI_MODEL_CHAT";
pub const OPENAI_MODEL_FAST: &str = "OPENAI_MODEL_FAST";
pub const OPENAI_MODEL_DEEP: &str = "OPENAI_MODEL_DEEP";
pub const OPENAI_MODEL_SUMMARIZE: &str = "OPENAI_MODEL_SUMMARIZE";
pub const OPENAI_MODEL_FINDER: &str = "OPENAI_MODEL_FINDER";
pub const OPENAI_MODEL_INTENT: &str = "OPENAI_MODEL_INTENT";
pub const OPENAI_MODEL_CODE_TASK: &str = "OPENAI_MODEL_CODE_TASK";

pub const DEFAULT_CHAT_MODEL: &str = "gpt-5";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
	Summarize,
	Finder,
	Intent,
	CodeTask,
	ChatFast,
	ChatDeep,
}
impl RequestKind {
	pub const ALL: [Self; 6] =
		[Self::Summarize, Self::Finder, Self::Intent, Self::CodeTask, Self::ChatFast, Self::ChatDeep];

	pub fn as_str(self) -> &'static str {
		match self {
			Self::Summarize => "summarize",
			Self::Finder => "finder",
			Self::Intent => "intent",
			Self::CodeTask => "code_task",
			Self::ChatFast => "chat_fast",
			Self::ChatDeep => "chat_deep",
		}
	}

	/// Chained kinds take part in response chaining and are stored by the backend.
	pub fn is_chained(self) -> bool {
		matches!(self, Self::ChatFast | Self::ChatDeep)
	}

	pub fn defaults(self) -> KindDefaults {
		use ReasoningEffort::*;

		match self {
			Self::Summarize => KindDefaults::new("gpt-5-mini", Low, Verbosity::Low),
			Self::Finder => KindDefaults::new("gpt-5-mini", Low, Verbosity::Low),
			Self::Intent => KindDefaults::new("gpt-5-nano", Low, Verbosity::Low),
			Self::CodeTask => KindDefaults::new("gpt-5", Medium, Verbosity::Medium),
			Self::ChatFast => KindDefaults::new(DEFAULT_CHAT_MODEL, Low, Verbosity::Medium),
			Self::ChatDeep => KindDefaults::new(DEFAULT_CHAT_MODEL, High, Verbosity::Medium),
		}
	}

	fn model_env(self) -> &'static str {
		match self {
			Self::Summarize => OPENAI_MODEL_SUMMARIZE,
			Self::Finder => OPENAI_MODEL_FINDER,
			Self::Intent => OPENAI_MODEL_INTENT,
			Self::CodeTask => OPENAI_MODEL_CODE_TASK,
			Self::ChatFast => OPENAI_MODEL_FAST,
			Self::ChatDeep => OPENAI_MODEL_DEEP,
		}
	}
}
impl fmt::Display for RequestKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Reasoning levels accepted by the backend. There is deliberately no "none" level: the
/// reasoning model family rejects requests below `low`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReasoningEffort {
	Low,
	Medium,
	High,
}
impl ReasoningEffort {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Low => "low",
			Self::Medium => "medium",
			Self::High => "high",
		}
	}
}
impl fmt::Display for ReasoningEffort {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verbosity {
	Low,
	Medium,
	High,
}

#[derive(Debug, Clone, Copy)]
pub struct KindDefaults {
	pub model: &'static str,
	pub effort: ReasoningEffort,
	pub verbosity: Verbosity,
}
impl KindDefaults {
	const fn new(model: &'static str, effort: ReasoningEffort, verbosity: Verbosity) -> Self {
		Self { model, effort, verbosity }
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedModel {
	pub kind: RequestKind,
	pub model: String,
	pub effort: ReasoningEffort,
	pub verbosity: Verbosity,
}

/// Request configuration table.
///
/// Built once from an [`EnvSnapshot`] and shared by every dispatch. The only state that changes
/// after construction is the mismatch latch, which flips at most once.
#[derive(Debug)]
pub struct ModelRegistry {
	overrides: HashMap<RequestKind, String>,
	chat_unified: Option<String>,
	mismatch_warned: AtomicBool,
}
impl ModelRegistry {
	pub fn from_env(env: &EnvSnapshot) -> Self {
		let overrides = RequestKind::ALL
			.into_iter()
			.filter_map(|kind| env.get(kind.model_env()).map(|model| (kind, model.to_string())))
			.collect();

		Self {
			overrides,
			chat_unified: env.get(OPENAI_MODEL_CHAT).map(str::to_string),
			mismatch_warned: AtomicBool::new(false),
		}
	}

	pub fn resolve(&self, kind: RequestKind) -> ResolvedModel {
		let defaults = kind.defaults();
		let model = if kind.is_chained() {
			self.chained_model()
		} else {
			self.overrides.get(&kind).cloned().unwrap_or_else(|| defaults.model.to_string())
		};

		ResolvedModel { kind, model, effort: defaults.effort, verbosity: defaults.verbosity }
	}

	pub fn mismatch_warned(&self) -> bool {
		self.mismatch_warned.load(Ordering::Relaxed)
	}

	fn chained_model(&self) -> String {
		if let Some(model) = &self.chat_unified {
			return model.clone();
		}

		let fast = self.overrides.get(&RequestKind::ChatFast);
		let deep = self.overrides.get(&RequestKind::ChatDeep);

		match (fast, deep) {
			(Some(fast), Some(deep)) => {
				if fast != deep {
					self.note_mismatch(fast, deep);
				}

				deep.clone()
			},
			(None, Some(deep)) => deep.clone(),
			(Some(fast), None) => fast.clone(),
			(None, None) => DEFAULT_CHAT_MODEL.to_string(),
		}
	}

	/// Returns true only for the call that actually emitted the warning.
	fn note_mismatch(&self, fast: &str, deep: &str) -> bool {
		if self.mismatch_warned.swap(true, Ordering::Relaxed) {
			return false;
		}

		tracing::warn!(
			fast_model = fast,
			deep_model = deep,
			"{OPENAI_MODEL_FAST} and {OPENAI_MODEL_DEEP} disagree; chained chat uses the deep model. Set {OPENAI_MODEL_CHAT} to silence this."
		);

		true
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn mismatch_latch_fires_once() {
		let registry = ModelRegistry::from_env(&EnvSnapshot::default());

		assert!(registry.note_mismatch("m1", "m2"));
		assert!(!registry.note_mismatch("m1", "m2"));
		assert!(!registry.note_mismatch("m3", "m4"));
		assert!(registry.mismatch_warned());
	}

	#[test]
	fn chained_defaults_share_a_model() {
		assert_eq!(RequestKind::ChatFast.defaults().model, RequestKind::ChatDeep.defaults().model);
	}
}
