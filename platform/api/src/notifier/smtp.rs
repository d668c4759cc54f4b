use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Tokio1Executor};

use super::{Notification, Notifier, NotifierError};
use crate::config::SmtpConfig;

pub struct SmtpNotifier {
	host: String,
	transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl std::fmt::Debug for SmtpNotifier {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("SmtpNotifier").field("host", &self.host).finish_non_exhaustive()
	}
}

#[derive(Debug, thiserror::Error)]
pub enum SmtpNotifierError {
	#[error("invalid address: {0}")]
	Address(#[from] lettre::address::AddressError),
	#[error("failed to build message: {0}")]
	Build(#[from] lettre::error::Error),
	#[error("transport: {0}")]
	Transport(#[from] lettre::transport::smtp::Error),
}

impl SmtpNotifier {
	#[tracing::instrument(skip(config), name = "SmtpNotifier::new", fields(host = %config.host), err)]
	pub fn new(config: &SmtpConfig) -> Result<Self, SmtpNotifierError> {
		tracing::debug!("setting up smtp transport");

		let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?
			.credentials(Credentials::new(config.username.clone(), config.password.clone()))
			.timeout(Some(config.timeout));

		if let Some(port) = config.port {
			builder = builder.port(port);
		}

		Ok(Self {
			host: config.host.clone(),
			transport: builder.build(),
		})
	}

	async fn deliver(&self, notification: &Notification) -> Result<(), SmtpNotifierError> {
		let email = lettre::Message::builder()
			.from(notification.from.parse::<Mailbox>()?)
			.to(notification.to.parse::<Mailbox>()?)
			.subject(notification.subject.as_str())
			.header(ContentType::TEXT_HTML)
			.body(notification.html.clone())?;

		self.transport.send(email).await?;

		Ok(())
	}
}

impl Notifier for SmtpNotifier {
	fn name(&self) -> &str {
		"smtp"
	}

	#[tracing::instrument(skip_all, name = "SmtpNotifier::send", fields(host = %self.host), err)]
	async fn send(&self, notification: &Notification) -> Result<(), NotifierError> {
		self.deliver(notification).await?;
		tracing::debug!("notification sent");

		Ok(())
	}
}
