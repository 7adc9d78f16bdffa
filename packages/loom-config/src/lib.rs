mod env;
mod error;
mod models;
mod types;

pub use env::{EnvSnapshot, FINDER_MAX_CANDIDATES, FINDER_TOP_K, OPENAI_API_KEY};
pub use error::{Error, Result};
pub use models::{
	DEFAULT_CHAT_MODEL, KindDefaults, ModelRegistry, OPENAI_MODEL_CHAT, OPENAI_MODEL_CODE_TASK,
	OPENAI_MODEL_DEEP, OPENAI_MODEL_FAST, OPENAI_MODEL_FINDER, OPENAI_MODEL_INTENT,
	OPENAI_MODEL_SUMMARIZE, ReasoningEffort, RequestKind, ResolvedModel, Verbosity,
};
pub use types::{
	Config, DEFAULT_MAX_CANDIDATES, DEFAULT_SUMMARY_PLACEHOLDER, DEFAULT_TOP_K, Finder,
	MAX_CANDIDATES_CAP, ProviderConfig, Providers, Security, Service, Summary,
};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	load_with_env(path, &EnvSnapshot::from_process())
}

pub fn load_with_env(path: &Path, env: &EnvSnapshot) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	apply_env(&mut cfg, env)?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn apply_env(cfg: &mut Config, env: &EnvSnapshot) -> Result<()> {
	if cfg.providers.responses.api_key.trim().is_empty()
		&& let Some(key) = env.get(OPENAI_API_KEY)
	{
		cfg.providers.responses.api_key = key.to_string();
	}
	// Environment limits are clamped into range; only file values are range-checked.
	if let Some(raw) = env.get(FINDER_MAX_CANDIDATES) {
		cfg.finder.max_candidates = parse_count(FINDER_MAX_CANDIDATES, raw)?;
	}
	if let Some(raw) = env.get(FINDER_TOP_K) {
		cfg.finder.top_k = parse_count(FINDER_TOP_K, raw)?;
	}

	Ok(())
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}

	let provider = &cfg.providers.responses;

	for (label, value) in [
		("providers.responses.provider_id", &provider.provider_id),
		("providers.responses.api_base", &provider.api_base),
		("providers.responses.path", &provider.path),
	] {
		if value.trim().is_empty() {
			return Err(Error::Validation { message: format!("{label} must be non-empty.") });
		}
	}

	if provider.api_key.trim().is_empty() {
		return Err(Error::Validation {
			message: format!(
				"providers.responses.api_key must be non-empty; set it in the config file or via {OPENAI_API_KEY}."
			),
		});
	}
	if provider.timeout_ms == 0 {
		return Err(Error::Validation {
			message: "providers.responses.timeout_ms must be greater than zero.".to_string(),
		});
	}
	if provider.default_headers.values().any(|value| !value.is_string()) {
		return Err(Error::Validation {
			message: "providers.responses.default_headers values must be strings.".to_string(),
		});
	}

	for (label, value) in
		[("finder.max_candidates", cfg.finder.max_candidates), ("finder.top_k", cfg.finder.top_k)]
	{
		if !(1..=MAX_CANDIDATES_CAP).contains(&value) {
			return Err(Error::Validation {
				message: format!("{label} must be in the range 1-{MAX_CANDIDATES_CAP}."),
			});
		}
	}

	if cfg.summary.placeholder.trim().is_empty() {
		return Err(Error::Validation {
			message: "summary.placeholder must be non-empty.".to_string(),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	let provider = &mut cfg.providers.responses;

	provider.api_key = provider.api_key.trim().to_string();

	while provider.api_base.ends_with('/') {
		provider.api_base.pop();
	}
}

fn parse_count(key: &str, raw: &str) -> Result<u32> {
	let count = raw.parse::<u32>().map_err(|_| Error::Validation {
		message: format!("{key} must be a non-negative integer, got {raw:?}."),
	})?;

	Ok(count.clamp(1, MAX_CANDIDATES_CAP))
}
