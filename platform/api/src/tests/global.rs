use std::sync::Arc;

use binary_helper::global::GlobalConfigProvider;
use binary_helper::impl_global_traits;
use folio_utils::context::{Context, Handler};

use crate::config::{
	ApiConfig, AppConfig, Environment, MemoryNotifierConfig, MemoryStoreConfig, NotifierBackendConfig, NotifierConfig,
	StoreConfig,
};
use crate::global::ContactState;
use crate::notifier::memory::MemoryNotifier;
use crate::notifier::{build_notifier, AnyNotifier};
use crate::outbox::Dispatcher;
use crate::store::memory::MemoryStore;
use crate::store::AnyStore;

pub struct GlobalState {
	ctx: Context,
	pub config: AppConfig,
	store: AnyStore,
	dispatcher: Dispatcher,
}

impl_global_traits!(GlobalState);

impl GlobalConfigProvider<ApiConfig> for GlobalState {
	fn provide_config(&self) -> &ApiConfig {
		&self.config.extra.api
	}
}

impl GlobalConfigProvider<NotifierConfig> for GlobalState {
	fn provide_config(&self) -> &NotifierConfig {
		&self.config.extra.notifier
	}
}

impl GlobalConfigProvider<Environment> for GlobalState {
	fn provide_config(&self) -> &Environment {
		&self.config.extra.environment
	}
}

impl ContactState for GlobalState {
	fn store(&self) -> &AnyStore {
		&self.store
	}

	fn dispatcher(&self) -> &Dispatcher {
		&self.dispatcher
	}
}

impl GlobalState {
	pub fn memory_store(&self) -> &MemoryStore {
		match &self.store {
			AnyStore::Memory(store) => store,
			AnyStore::Postgres(_) => panic!("mock global state uses the memory store"),
		}
	}

	pub fn memory_notifier(&self) -> &MemoryNotifier {
		match self.dispatcher.notifier() {
			AnyNotifier::Memory(notifier) => notifier,
			other => panic!("unexpected notifier: {other:?}"),
		}
	}
}

/// A config with in-memory backends, listening on `port`.
pub fn memory_config(port: u16) -> AppConfig {
	let mut config = AppConfig::default();

	config.logging.level = "folio_api=debug".to_string();
	config.extra.api.bind_address = ([127, 0, 0, 1], port).into();
	config.extra.store = StoreConfig::Memory(MemoryStoreConfig::default());
	config.extra.notifier.mailbox = "me@example.com".to_string();
	config.extra.notifier.backend = NotifierBackendConfig::Memory(MemoryNotifierConfig::default());

	config
}

pub fn mock_global_state(config: AppConfig) -> (Arc<GlobalState>, Handler) {
	let (ctx, handler) = Context::new();

	binary_helper::logging::init(&config.logging.level, config.logging.mode).expect("failed to initialize logging");

	let store = match &config.extra.store {
		StoreConfig::Memory(memory) => AnyStore::Memory(MemoryStore::new(memory)),
		StoreConfig::Postgres => panic!("mock global state uses the memory store"),
	};

	let notifier = build_notifier(&config.extra.notifier.backend).expect("failed to build notifier");
	let dispatcher = Dispatcher::new(&config.extra.notifier, notifier);

	let global = Arc::new(GlobalState {
		ctx,
		config,
		store,
		dispatcher,
	});

	(global, handler)
}
