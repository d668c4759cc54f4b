use std::io;
use std::sync::Arc;

use anyhow::Context as _;
pub use folio_utils::context::Context;
use folio_utils::database::deadpool_postgres::{Manager, ManagerConfig, RecyclingMethod, Runtime};
use folio_utils::database::tokio_postgres::config::SslMode;
use folio_utils::database::tokio_postgres::{self, NoTls};
use folio_utils::database::Pool;
use rustls::client::danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier};
use rustls::crypto::CryptoProvider;
use rustls::pki_types::{CertificateDer, ServerName, UnixTime};
use rustls::{DigitallySignedStruct, RootCertStore, SignatureScheme};

use crate::config::{DatabaseConfig, DatabaseTlsConfig};

#[macro_export]
macro_rules! impl_global_traits {
	($struct:ty) => {
		impl $crate::global::GlobalCtx for $struct {
			#[inline(always)]
			fn ctx(&self) -> &$crate::global::Context {
				&self.ctx
			}
		}

		impl $crate::global::GlobalConfig for $struct {}
	};
}

pub trait GlobalCtx {
	fn ctx(&self) -> &Context;
}

pub trait GlobalConfig {
	#[inline(always)]
	fn config<C>(&self) -> &C
	where
		Self: GlobalConfigProvider<C>,
	{
		GlobalConfigProvider::provide_config(self)
	}
}

pub trait GlobalConfigProvider<C> {
	fn provide_config(&self) -> &C;
}

/// Parses the database uri. A configured `tls` section forces `sslmode=require`,
/// otherwise the uri's own `sslmode` is kept.
pub fn postgres_config(config: &DatabaseConfig) -> anyhow::Result<tokio_postgres::Config> {
	let mut pg_config = config.uri.parse::<tokio_postgres::Config>().context("invalid database uri")?;

	if config.tls.is_some() {
		pg_config.ssl_mode(SslMode::Require);
	}

	Ok(pg_config)
}

pub async fn setup_database(config: &DatabaseConfig) -> anyhow::Result<Arc<Pool>> {
	let pg_config = postgres_config(config)?;

	let manager_config = ManagerConfig {
		recycling_method: RecyclingMethod::Fast,
	};

	// Like libpq, `prefer` and `require` without a CA encrypt but do not verify the server.
	let tls = match (&config.tls, pg_config.get_ssl_mode()) {
		(Some(tls), _) => Some(client_tls(tls).await?),
		(None, SslMode::Disable) => None,
		(None, _) => Some(client_tls(&DatabaseTlsConfig::default()).await?),
	};

	let manager = match tls {
		Some(tls) => Manager::from_config(pg_config, tokio_postgres_rustls::MakeRustlsConnect::new(tls), manager_config),
		None => Manager::from_config(pg_config, NoTls, manager_config),
	};

	Ok(Arc::new(
		Pool::builder(manager)
			.max_size(config.max_connections)
			.wait_timeout(Some(config.acquire_timeout))
			.runtime(Runtime::Tokio1)
			.build()
			.context("failed to create database pool")?,
	))
}

/// Accepts any server certificate, handshake signatures are still checked.
#[derive(Debug)]
struct NoServerVerification(Arc<CryptoProvider>);

impl ServerCertVerifier for NoServerVerification {
	fn verify_server_cert(
		&self,
		_end_entity: &CertificateDer<'_>,
		_intermediates: &[CertificateDer<'_>],
		_server_name: &ServerName<'_>,
		_ocsp_response: &[u8],
		_now: UnixTime,
	) -> Result<ServerCertVerified, rustls::Error> {
		Ok(ServerCertVerified::assertion())
	}

	fn verify_tls12_signature(
		&self,
		message: &[u8],
		cert: &CertificateDer<'_>,
		dss: &DigitallySignedStruct,
	) -> Result<HandshakeSignatureValid, rustls::Error> {
		rustls::crypto::verify_tls12_signature(message, cert, dss, &self.0.signature_verification_algorithms)
	}

	fn verify_tls13_signature(
		&self,
		message: &[u8],
		cert: &CertificateDer<'_>,
		dss: &DigitallySignedStruct,
	) -> Result<HandshakeSignatureValid, rustls::Error> {
		rustls::crypto::verify_tls13_signature(message, cert, dss, &self.0.signature_verification_algorithms)
	}

	fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
		self.0.signature_verification_algorithms.supported_schemes()
	}
}

async fn client_tls(tls: &DatabaseTlsConfig) -> anyhow::Result<rustls::ClientConfig> {
	// More than one crypto backend can end up enabled in the tree, so pin one.
	let provider = Arc::new(rustls::crypto::ring::default_provider());
	let builder = rustls::ClientConfig::builder_with_provider(provider.clone())
		.with_safe_default_protocol_versions()
		.context("failed to select tls protocol versions")?;

	let builder = match &tls.ca_cert {
		Some(ca_cert) => {
			let mut cert_store = RootCertStore::empty();

			let ca_cert = tokio::fs::read(ca_cert).await.context("failed to read database ca cert")?;
			for cert in rustls_pemfile::certs(&mut io::BufReader::new(io::Cursor::new(ca_cert))) {
				cert_store
					.add(cert.context("invalid database ca cert")?)
					.context("failed to add database ca cert")?;
			}

			builder.with_root_certificates(cert_store)
		}
		None => {
			tracing::warn!("no database ca cert configured, the server certificate is not verified");
			builder
				.dangerous()
				.with_custom_certificate_verifier(Arc::new(NoServerVerification(provider)))
		}
	};

	let (Some(cert), Some(key)) = (&tls.cert, &tls.key) else {
		return Ok(builder.with_no_client_auth());
	};

	let cert = tokio::fs::read(cert).await.context("failed to read database client cert")?;
	let key = tokio::fs::read(key)
		.await
		.context("failed to read database client private key")?;

	let key = rustls_pemfile::pkcs8_private_keys(&mut io::BufReader::new(io::Cursor::new(key)))
		.next()
		.ok_or_else(|| anyhow::anyhow!("failed to find private key in database client private key file"))??
		.into();

	let certs = rustls_pemfile::certs(&mut io::BufReader::new(io::Cursor::new(cert))).collect::<Result<Vec<_>, _>>()?;

	builder
		.with_client_auth_cert(certs, key)
		.context("failed to create database tls config")
}
