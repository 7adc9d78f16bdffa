use std::sync::Arc;

use loom_config::{EnvSnapshot, ModelRegistry};
use loom_providers::ResponsesClient;
use loom_service::LoomService;
use loom_storage::MemoryThreadStore;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<LoomService>,
}
impl AppState {
	/// Wires the production backend from the same environment snapshot the config was loaded with.
	pub fn new(config: loom_config::Config, env: &EnvSnapshot) -> color_eyre::Result<Self> {
		let registry = ModelRegistry::from_env(env);
		let client = ResponsesClient::new(&config.providers.responses)?;
		let store = MemoryThreadStore::new();

		tracing::info!(url = client.url(), "Responses backend configured.");

		let service =
			LoomService::new(config, Arc::new(registry), Arc::new(store), Arc::new(client));

		Ok(Self::from_service(service))
	}

	pub fn from_service(service: LoomService) -> Self {
		Self { service: Arc::new(service) }
	}
}
