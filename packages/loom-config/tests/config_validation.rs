use std::{
	env, fs,
	path::PathBuf,
	sync::atomic::{AtomicU64, Ordering},
	time::{SystemTime, UNIX_EPOCH},
};

use toml::Value;

use loom_config::{
	Config, EnvSnapshot, Error, MAX_CANDIDATES_CAP, ModelRegistry, ReasoningEffort, RequestKind,
};

const SAMPLE_CONFIG_TEMPLATE_TOML: &str = include_str!("fixtures/sample_config.template.toml");

fn sample_toml_with(section: &str, key: &str, value: Value) -> String {
	let mut root: Value =
		toml::from_str(SAMPLE_CONFIG_TEMPLATE_TOML).expect("Failed to parse template config.");
	let mut table = root.as_table_mut().expect("Template config must be a table.");

	for part in section.split('.') {
		table = table
			.get_mut(part)
			.and_then(Value::as_table_mut)
			.unwrap_or_else(|| panic!("Template config must include [{section}]."));
	}

	table.insert(key.to_string(), value);

	toml::to_string(&root).expect("Failed to render template config.")
}

fn write_temp_config(payload: String) -> PathBuf {
	static COUNTER: AtomicU64 = AtomicU64::new(0);

	let nanos = SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.expect("System time must be valid.")
		.as_nanos();
	let ordinal = COUNTER.fetch_add(1, Ordering::SeqCst);
	let pid = std::process::id();
	let mut path = env::temp_dir();

	path.push(format!("loom_config_test_{nanos}_{pid}_{ordinal}.toml"));

	fs::write(&path, payload).expect("Failed to write test config.");

	path
}

fn load_payload(payload: String, env: &EnvSnapshot) -> loom_config::Result<Config> {
	let path = write_temp_config(payload);
	let result = loom_config::load_with_env(&path, env);

	fs::remove_file(&path).expect("Failed to remove test config.");

	result
}

fn expect_validation(result: loom_config::Result<Config>, needle: &str) {
	match result {
		Err(Error::Validation { message }) => {
			assert!(message.contains(needle), "Unexpected error message: {message}");
		},
		Err(err) => panic!("Expected validation error, got {err}."),
		Ok(_) => panic!("Expected validation error containing {needle:?}."),
	}
}

#[test]
fn sample_config_loads_and_trims_api_base() {
	let cfg = load_payload(SAMPLE_CONFIG_TEMPLATE_TOML.to_string(), &EnvSnapshot::default())
		.expect("Sample config must load.");

	assert_eq!(cfg.providers.responses.api_base, "https://api.openai.com");
	assert_eq!(cfg.finder.max_candidates, 30);
	assert_eq!(cfg.finder.top_k, 5);
}

#[test]
fn env_overrides_finder_limits() {
	let env = EnvSnapshot::from_pairs([("FINDER_MAX_CANDIDATES", "12"), ("FINDER_TOP_K", "3")]);
	let cfg = load_payload(SAMPLE_CONFIG_TEMPLATE_TOML.to_string(), &env)
		.expect("Config with env overrides must load.");

	assert_eq!(cfg.finder.max_candidates, 12);
	assert_eq!(cfg.finder.top_k, 3);
}

#[test]
fn non_numeric_env_limit_is_rejected() {
	let env = EnvSnapshot::from_pairs([("FINDER_TOP_K", "many")]);

	expect_validation(
		load_payload(SAMPLE_CONFIG_TEMPLATE_TOML.to_string(), &env),
		"FINDER_TOP_K must be a non-negative integer",
	);
}

#[test]
fn env_limits_above_cap_are_clamped() {
	let env = EnvSnapshot::from_pairs([("FINDER_MAX_CANDIDATES", "100"), ("FINDER_TOP_K", "100")]);
	let cfg = load_payload(SAMPLE_CONFIG_TEMPLATE_TOML.to_string(), &env)
		.expect("Oversized env limits must be clamped, not rejected.");

	assert_eq!(cfg.finder.candidate_limit(None), MAX_CANDIDATES_CAP as usize);
	assert_eq!(cfg.finder.result_limit(), MAX_CANDIDATES_CAP as usize);
}

#[test]
fn zero_env_limit_is_clamped_to_one() {
	let env = EnvSnapshot::from_pairs([("FINDER_MAX_CANDIDATES", "0")]);
	let cfg = load_payload(SAMPLE_CONFIG_TEMPLATE_TOML.to_string(), &env)
		.expect("Zero env limit must be clamped, not rejected.");

	assert_eq!(cfg.finder.candidate_limit(None), 1);
}

#[test]
fn max_candidates_above_cap_is_rejected() {
	let payload = sample_toml_with("finder", "max_candidates", Value::Integer(61));

	expect_validation(
		load_payload(payload, &EnvSnapshot::default()),
		"finder.max_candidates must be in the range 1-60.",
	);
}

#[test]
fn api_key_falls_back_to_environment() {
	let payload = sample_toml_with("providers.responses", "api_key", Value::String(String::new()));

	expect_validation(
		load_payload(payload.clone(), &EnvSnapshot::default()),
		"providers.responses.api_key must be non-empty",
	);

	let env = EnvSnapshot::from_pairs([("OPENAI_API_KEY", "sk-from-env")]);
	let cfg = load_payload(payload, &env).expect("Env api key must satisfy validation.");

	assert_eq!(cfg.providers.responses.api_key, "sk-from-env");
}

#[test]
fn non_string_default_header_is_rejected() {
	let payload =
		sample_toml_with("providers.responses.default_headers", "x-retries", Value::Integer(3));

	expect_validation(
		load_payload(payload, &EnvSnapshot::default()),
		"default_headers values must be strings.",
	);
}

#[test]
fn candidate_limit_is_clamped_to_cap() {
	let cfg = load_payload(SAMPLE_CONFIG_TEMPLATE_TOML.to_string(), &EnvSnapshot::default())
		.expect("Sample config must load.");

	assert_eq!(cfg.finder.candidate_limit(None), 30);
	assert_eq!(cfg.finder.candidate_limit(Some(7)), 7);
	assert_eq!(cfg.finder.candidate_limit(Some(500)), MAX_CANDIDATES_CAP as usize);
}

#[test]
fn kinds_use_defaults_without_overrides() {
	let registry = ModelRegistry::from_env(&EnvSnapshot::default());
	let finder = registry.resolve(RequestKind::Finder);
	let deep = registry.resolve(RequestKind::ChatDeep);

	assert_eq!(finder.model, "gpt-5-mini");
	assert_eq!(finder.effort, ReasoningEffort::Low);
	assert_eq!(deep.model, "gpt-5");
	assert_eq!(deep.effort, ReasoningEffort::High);
	assert!(!registry.mismatch_warned());
}

#[test]
fn per_kind_override_applies_to_that_kind_only() {
	let env = EnvSnapshot::from_pairs([("OPENAI_MODEL_SUMMARIZE", "summary-model")]);
	let registry = ModelRegistry::from_env(&env);

	assert_eq!(registry.resolve(RequestKind::Summarize).model, "summary-model");
	assert_eq!(registry.resolve(RequestKind::Finder).model, "gpt-5-mini");
}

#[test]
fn conflicting_chat_overrides_prefer_deep_and_warn_once() {
	let env = EnvSnapshot::from_pairs([("OPENAI_MODEL_FAST", "m1"), ("OPENAI_MODEL_DEEP", "m2")]);
	let registry = ModelRegistry::from_env(&env);

	for _ in 0..5 {
		assert_eq!(registry.resolve(RequestKind::ChatFast).model, "m2");
		assert_eq!(registry.resolve(RequestKind::ChatDeep).model, "m2");
	}

	assert!(registry.mismatch_warned());
	// Efforts still differ per kind even though the model is shared.
	assert_eq!(registry.resolve(RequestKind::ChatFast).effort, ReasoningEffort::Low);
	assert_eq!(registry.resolve(RequestKind::ChatDeep).effort, ReasoningEffort::High);
}

#[test]
fn unified_chat_override_wins_without_warning() {
	let env = EnvSnapshot::from_pairs([
		("OPENAI_MODEL_CHAT", "unified"),
		("OPENAI_MODEL_FAST", "m1"),
		("OPENAI_MODEL_DEEP", "m2"),
	]);
	let registry = ModelRegistry::from_env(&env);

	assert_eq!(registry.resolve(RequestKind::ChatFast).model, "unified");
	assert_eq!(registry.resolve(RequestKind::ChatDeep).model, "unified");
	assert!(!registry.mismatch_warned());
}

#[test]
fn single_chat_override_applies_to_both_chained_kinds() {
	let registry = ModelRegistry::from_env(&EnvSnapshot::from_pairs([("OPENAI_MODEL_FAST", "m1")]));

	assert_eq!(registry.resolve(RequestKind::ChatFast).model, "m1");
	assert_eq!(registry.resolve(RequestKind::ChatDeep).model, "m1");
	assert!(!registry.mismatch_warned());
}
