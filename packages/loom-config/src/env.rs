use std::{collections::BTreeMap, env};

pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const FINDER_MAX_CANDIDATES: &str = "FINDER_MAX_CANDIDATES";
pub const FINDER_TOP_K: &str = "FINDER_TOP_K";

/// Environment values captured once at startup.
///
/// Everything downstream reads from the snapshot, never from the live process environment, so
/// a running service sees one consistent set of overrides.
#[derive(Debug, Clone, Default)]
pub struct EnvSnapshot {
	vars: BTreeMap<String, String>,
}
impl EnvSnapshot {
	pub fn from_process() -> Self {
		Self::from_pairs(env::vars())
	}

	pub fn from_pairs<I, K, V>(pairs: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<String>,
	{
		Self { vars: pairs.into_iter().map(|(key, value)| (key.into(), value.into())).collect() }
	}

	/// Returns the trimmed value, treating blank values as unset.
	pub fn get(&self, key: &str) -> Option<&str> {
		self.vars.get(key).map(|value| value.trim()).filter(|value| !value.is_empty())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn blank_values_read_as_unset() {
		let env = EnvSnapshot::from_pairs([("A", "  "), ("B", " value ")]);

		assert_eq!(env.get("A"), None);
		assert_eq!(env.get("B"), Some("value"));
		assert_eq!(env.get("C"), None);
	}
}
