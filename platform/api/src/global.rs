use crate::config::{ApiConfig, Environment, NotifierConfig};
use crate::outbox::Dispatcher;
use crate::store::AnyStore;

pub trait ContactState {
	fn store(&self) -> &AnyStore;
	fn dispatcher(&self) -> &Dispatcher;
}

pub trait ApiGlobal:
	binary_helper::global::GlobalCtx
	+ binary_helper::global::GlobalConfigProvider<ApiConfig>
	+ binary_helper::global::GlobalConfigProvider<NotifierConfig>
	+ binary_helper::global::GlobalConfigProvider<Environment>
	+ binary_helper::global::GlobalConfig
	+ ContactState
	+ Send
	+ Sync
	+ 'static
{
}

impl<T> ApiGlobal for T where
	T: binary_helper::global::GlobalCtx
		+ binary_helper::global::GlobalConfigProvider<ApiConfig>
		+ binary_helper::global::GlobalConfigProvider<NotifierConfig>
		+ binary_helper::global::GlobalConfigProvider<Environment>
		+ binary_helper::global::GlobalConfig
		+ ContactState
		+ Send
		+ Sync
		+ 'static
{
}
