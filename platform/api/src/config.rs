use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context as _;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
	#[default]
	Development,
	Production,
}

impl Environment {
	pub fn is_development(&self) -> bool {
		matches!(self, Self::Development)
	}
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct ApiConfig {
	/// Bind address for the API
	pub bind_address: SocketAddr,

	/// Directory served for every path the API does not handle
	pub static_dir: Option<PathBuf>,

	/// Origins allowed to call the API in production
	pub allowed_origins: Vec<String>,
}

impl Default for ApiConfig {
	fn default() -> Self {
		Self {
			bind_address: SocketAddr::from(([0, 0, 0, 0, 0, 0, 0, 0], 10000)),
			static_dir: None,
			allowed_origins: Vec::new(),
		}
	}
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum StoreConfig {
	/// Messages are written to the `messages` table of the configured database
	Postgres,
	/// Messages are kept in process memory
	Memory(MemoryStoreConfig),
}

impl Default for StoreConfig {
	fn default() -> Self {
		Self::Postgres
	}
}

#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct MemoryStoreConfig {
	/// Fail every insert
	pub fail: bool,

	/// How long each insert takes
	#[serde(with = "humantime_serde")]
	pub delay: Duration,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DispatchMode {
	/// The request waits for the notification to be sent
	Inline,
	/// The request only enqueues the notification
	#[default]
	Queued,
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct NotifierConfig {
	/// How notifications are handed to the backend
	pub dispatch: DispatchMode,

	/// Bound of the outbox queue in queued mode
	pub outbox_capacity: usize,

	/// The address notifications are sent from and to
	pub mailbox: String,

	/// The backend that delivers notifications
	pub backend: NotifierBackendConfig,
}

impl Default for NotifierConfig {
	fn default() -> Self {
		Self {
			dispatch: DispatchMode::default(),
			outbox_capacity: 128,
			mailbox: String::new(),
			backend: NotifierBackendConfig::default(),
		}
	}
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum NotifierBackendConfig {
	/// SMTP relay
	Smtp(SmtpConfig),
	/// Write notifications to the log
	Log,
	/// Keep notifications in memory
	Memory(MemoryNotifierConfig),
}

impl Default for NotifierBackendConfig {
	fn default() -> Self {
		Self::Log
	}
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct SmtpConfig {
	/// The relay host, the connection is upgraded with STARTTLS
	pub host: String,

	/// Overrides the submission port
	pub port: Option<u16>,

	pub username: String,

	pub password: String,

	#[serde(with = "humantime_serde")]
	pub timeout: Duration,
}

impl Default for SmtpConfig {
	fn default() -> Self {
		Self {
			host: "smtp.gmail.com".to_string(),
			port: None,
			username: String::new(),
			password: String::new(),
			timeout: Duration::from_secs(10),
		}
	}
}

#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct MemoryNotifierConfig {
	/// Fail every send
	pub fail: bool,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct ExtConfig {
	/// Controls error details and CORS
	pub environment: Environment,

	/// The API configuration
	pub api: ApiConfig,

	/// Where contact messages are persisted
	pub store: StoreConfig,

	/// How the site owner is notified
	pub notifier: NotifierConfig,
}

impl binary_helper::config::ConfigExtention for ExtConfig {
	const APP_NAME: &'static str = "folio-api";

	fn pre_hook(config: &mut AppConfig) -> anyhow::Result<()> {
		apply_legacy_env(config, std::env::vars())
	}
}

pub type AppConfig = binary_helper::config::AppConfig<ExtConfig>;

/// Applies the unprefixed variables older deployments set. These win over the
/// layered config, except that `EMAIL_USER` only fills an empty mailbox.
pub fn apply_legacy_env(config: &mut AppConfig, vars: impl IntoIterator<Item = (String, String)>) -> anyhow::Result<()> {
	let mut email_user = None;
	let mut email_pass = None;

	for (key, value) in vars {
		match key.as_str() {
			"PORT" => {
				let port = value.parse().with_context(|| format!("invalid PORT: {value}"))?;
				config.extra.api.bind_address.set_port(port);
			}
			"DATABASE_URL" => config.database.uri = value,
			"EMAIL_USER" => email_user = Some(value),
			"EMAIL_PASS" => email_pass = Some(value),
			"NODE_ENV" => match value.as_str() {
				"production" => config.extra.environment = Environment::Production,
				"development" => config.extra.environment = Environment::Development,
				_ => tracing::warn!(value = %value, "ignoring unknown NODE_ENV"),
			},
			_ => {}
		}
	}

	if let Some(user) = &email_user {
		if config.extra.notifier.mailbox.is_empty() {
			config.extra.notifier.mailbox = user.clone();
		}
	}

	if let (Some(username), Some(password)) = (email_user, email_pass) {
		let notifier = &mut config.extra.notifier;
		if !matches!(notifier.backend, NotifierBackendConfig::Smtp(_)) {
			notifier.backend = NotifierBackendConfig::Smtp(SmtpConfig::default());
		}

		if let NotifierBackendConfig::Smtp(smtp) = &mut notifier.backend {
			smtp.username = username;
			smtp.password = password;
		}
	}

	Ok(())
}
