use anyhow::Context as _;
use binary_helper::global::GlobalConfigProvider;
use binary_helper::{bootstrap, impl_global_traits};
use folio_api::config::{ApiConfig, AppConfig, Environment, NotifierConfig};
use folio_api::global::ContactState;
use folio_api::notifier::{build_notifier, Notifier};
use folio_api::outbox::Dispatcher;
use folio_api::store::{build_store, AnyStore, MessageStore};
use folio_utils::context::Context;

struct GlobalState {
	ctx: Context,
	config: AppConfig,
	store: AnyStore,
	dispatcher: Dispatcher,
}

impl_global_traits!(GlobalState);

impl GlobalConfigProvider<ApiConfig> for GlobalState {
	#[inline(always)]
	fn provide_config(&self) -> &ApiConfig {
		&self.config.extra.api
	}
}

impl GlobalConfigProvider<NotifierConfig> for GlobalState {
	#[inline(always)]
	fn provide_config(&self) -> &NotifierConfig {
		&self.config.extra.notifier
	}
}

impl GlobalConfigProvider<Environment> for GlobalState {
	#[inline(always)]
	fn provide_config(&self) -> &Environment {
		&self.config.extra.environment
	}
}

impl ContactState for GlobalState {
	#[inline(always)]
	fn store(&self) -> &AnyStore {
		&self.store
	}

	#[inline(always)]
	fn dispatcher(&self) -> &Dispatcher {
		&self.dispatcher
	}
}

impl binary_helper::Global<AppConfig> for GlobalState {
	async fn new(ctx: Context, config: AppConfig) -> anyhow::Result<Self> {
		let store = build_store(&config.extra.store, &config.database)
			.await
			.context("failed to set up message store")?;

		let notifier = build_notifier(&config.extra.notifier.backend).context("failed to set up notifier")?;

		if config.extra.notifier.mailbox.is_empty() {
			tracing::warn!("no notifier mailbox configured, notifications will have no sender");
		}

		tracing::info!(
			store = store.name(),
			notifier = notifier.name(),
			dispatch = ?config.extra.notifier.dispatch,
			environment = ?config.extra.environment,
			"backends ready"
		);

		let dispatcher = Dispatcher::new(&config.extra.notifier, notifier);

		Ok(Self {
			ctx,
			config,
			store,
			dispatcher,
		})
	}
}

#[tokio::main]
pub async fn main() {
	if let Err(err) = bootstrap::<AppConfig, GlobalState, _>(|global| async move {
		folio_api::run(global).await?;

		Ok(())
	})
	.await
	{
		tracing::error!("{:#}", err);
		std::process::exit(1);
	}
}
