use std::time::Duration;

use anyhow::Context as _;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_yaml::{Mapping, Value};

use super::Config;
use crate::logging;

const CONFIG_ARG_ID: &str = "config";
const DEFAULT_CONFIG_FILE: &str = "config.yaml";

#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct LoggingConfig {
	/// The log level to use, this is a tracing env filter
	pub level: String,

	/// What logging mode we should use
	pub mode: logging::Mode,
}

impl Default for LoggingConfig {
	fn default() -> Self {
		Self {
			level: "info".to_string(),
			mode: logging::Mode::Default,
		}
	}
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct DatabaseConfig {
	/// The database URL to use
	pub uri: String,

	/// Upper bound on pooled connections
	pub max_connections: usize,

	/// How long a request may wait for a pooled connection
	#[serde(with = "humantime_serde")]
	pub acquire_timeout: Duration,

	/// The TLS configuration
	pub tls: Option<DatabaseTlsConfig>,
}

impl Default for DatabaseConfig {
	fn default() -> Self {
		Self {
			uri: "postgres://localhost:5432/folio".to_string(),
			max_connections: 5,
			acquire_timeout: Duration::from_secs(30),
			tls: None,
		}
	}
}

#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct DatabaseTlsConfig {
	/// The path to the CA certificate used to verify the server, without one
	/// the connection is encrypted but the server is not verified
	pub ca_cert: Option<String>,

	/// The path to the client certificate, for mutual TLS
	pub cert: Option<String>,

	/// The path to the client private key, for mutual TLS
	pub key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(default, bound(deserialize = "T: ConfigExtention"))]
pub struct AppConfig<T> {
	/// The name of the application
	pub name: String,

	/// The config files that were loaded
	#[serde(skip)]
	pub config_files: Vec<String>,

	/// The logging configuration
	pub logging: LoggingConfig,

	/// The database configuration
	pub database: DatabaseConfig,

	#[serde(flatten)]
	pub extra: T,
}

pub trait ConfigExtention: Serialize + DeserializeOwned + Default {
	const APP_NAME: &'static str;

	/// Environment variables starting with `{ENV_PREFIX}_` override settings,
	/// `__` separates nested keys.
	const ENV_PREFIX: &'static str = "FOLIO";

	fn config_default() -> AppConfig<Self> {
		AppConfig {
			name: Self::APP_NAME.to_owned(),
			config_files: Vec::new(),
			logging: Default::default(),
			database: Default::default(),
			extra: Self::default(),
		}
	}

	fn pre_hook(_config: &mut AppConfig<Self>) -> anyhow::Result<()> {
		Ok(())
	}
}

impl<T: ConfigExtention> Default for AppConfig<T> {
	fn default() -> Self {
		T::config_default()
	}
}

impl<T: ConfigExtention> Config for AppConfig<T> {
	fn logging(&self) -> &LoggingConfig {
		&self.logging
	}

	fn parse() -> anyhow::Result<Self> {
		let files = if cfg!(test) { Vec::new() } else { cli_config_files() };

		parse(&Self::default(), files, T::ENV_PREFIX, std::env::vars())
	}

	fn name(&self) -> &str {
		&self.name
	}

	fn pre_hook(&mut self) -> anyhow::Result<()> {
		T::pre_hook(self)
	}
}

fn cli_config_files() -> Vec<(String, bool)> {
	let args = clap::Command::new(env!("CARGO_PKG_NAME"))
		.arg(
			clap::Arg::new(CONFIG_ARG_ID)
				.long(CONFIG_ARG_ID)
				.short('c')
				.help("The configuration file to use")
				.value_name("FILE")
				.action(clap::ArgAction::Append),
		)
		.get_matches();

	let files: Vec<_> = args
		.get_many::<String>(CONFIG_ARG_ID)
		.map(|files| files.cloned().map(|file| (file, false)).collect())
		.unwrap_or_default();

	if files.is_empty() {
		vec![(DEFAULT_CONFIG_FILE.to_string(), true)]
	} else {
		files
	}
}

/// Layers `files` (path, optional) and then prefixed environment variables on top of `default`.
pub fn parse<T: ConfigExtention>(
	default: &AppConfig<T>,
	files: Vec<(String, bool)>,
	env_prefix: &str,
	vars: impl IntoIterator<Item = (String, String)>,
) -> anyhow::Result<AppConfig<T>> {
	let mut parser = SettingsParser::new(default).context("failed to serialize default config")?;
	let mut loaded = Vec::new();

	for (file, optional) in files {
		let contents = match std::fs::read_to_string(&file) {
			Ok(contents) => contents,
			Err(err) if optional && err.kind() == std::io::ErrorKind::NotFound => {
				tracing::debug!(file, "optional config file not found");
				continue;
			}
			Err(err) => return Err(err).with_context(|| format!("failed to read config file: {file}")),
		};

		parser
			.merge_str(&contents)
			.with_context(|| format!("failed to parse config file: {file}"))?;
		loaded.push(file);
	}

	parser.merge_env(env_prefix, vars);

	let mut config: AppConfig<T> = parser.parse().context("invalid configuration")?;
	config.config_files = loaded;

	Ok(config)
}

/// Merges YAML trees on top of a serialized default value.
#[derive(Debug, Clone)]
pub struct SettingsParser<S> {
	root: Value,
	_marker: std::marker::PhantomData<S>,
}

impl<S> SettingsParser<S> {
	pub fn new(default: &S) -> serde_yaml::Result<Self>
	where
		S: Serialize,
	{
		Ok(Self {
			root: serde_yaml::to_value(default)?,
			_marker: std::marker::PhantomData,
		})
	}

	pub fn merge(&mut self, incoming: Value) {
		let root = std::mem::take(&mut self.root);
		self.root = merge_values(root, incoming);
	}

	pub fn merge_str(&mut self, s: &str) -> serde_yaml::Result<()> {
		let incoming: Value = serde_yaml::from_str(s)?;
		// An empty file deserializes to null, which would wipe every default.
		if !incoming.is_null() {
			self.merge(incoming);
		}

		Ok(())
	}

	pub fn merge_env(&mut self, prefix: &str, vars: impl IntoIterator<Item = (String, String)>) {
		let prefix = format!("{prefix}_");

		for (key, value) in vars {
			let Some(path) = key.strip_prefix(&prefix) else {
				continue;
			};

			let value = env_value(value);
			// Built from the innermost key outwards.
			let incoming = path.rsplit("__").fold(value, |value, segment| {
				let mut map = Mapping::new();
				map.insert(Value::String(segment.to_lowercase()), value);
				Value::Mapping(map)
			});

			self.merge(incoming);
		}
	}

	pub fn parse(self) -> serde_yaml::Result<S>
	where
		S: DeserializeOwned,
	{
		serde_yaml::from_value(self.root)
	}
}

fn merge_values(root: Value, incoming: Value) -> Value {
	match (root, incoming) {
		(Value::Mapping(mut first), Value::Mapping(second)) => {
			for (key, value) in second {
				let combined = match first.remove(&key) {
					Some(existing) => merge_values(existing, value),
					None => value,
				};
				first.insert(key, combined);
			}
			Value::Mapping(first)
		}
		(_, incoming) => incoming,
	}
}

// Scalars and flow sequences are read as YAML so `true`, `5` and `[a, b]` keep
// their type; anything else is taken verbatim.
fn env_value(raw: String) -> Value {
	if raw.is_empty() {
		return Value::String(raw);
	}

	match serde_yaml::from_str::<Value>(&raw) {
		Ok(value @ (Value::Bool(_) | Value::Number(_) | Value::Null | Value::Sequence(_))) => value,
		_ => Value::String(raw),
	}
}
