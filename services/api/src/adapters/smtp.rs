//! services/api/src/adapters/smtp.rs
//!
//! This module contains the adapter for the transactional SMTP relay.
//! It implements the `MailService` port from the `core` crate.

use async_trait::async_trait;
use lettre::{
    message::{Mailbox, MultiPart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use restaurant_core::{
    domain::EmailMessage,
    ports::{MailService, PortError, PortResult},
};
use tracing::info;

use crate::config::SmtpConfig;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `MailService` by relaying through an SMTP server
/// with STARTTLS.
#[derive(Clone)]
pub struct SmtpMailAdapter {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailAdapter {
    /// Creates a new `SmtpMailAdapter`. No connection is opened until the
    /// first message is sent.
    pub fn new(config: &SmtpConfig) -> PortResult<Self> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| PortError::Unexpected(format!("Invalid SMTP relay '{}': {}", config.host, e)))?
            .port(config.port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build();
        let from = config
            .from
            .parse::<Mailbox>()
            .map_err(|e| PortError::Unexpected(format!("MAIL_FROM is not a valid mailbox: {}", e)))?;
        Ok(Self { transport, from })
    }

    fn build_message(&self, message: &EmailMessage) -> PortResult<Message> {
        let to = message
            .to
            .parse::<Mailbox>()
            .map_err(|e| PortError::Unexpected(format!("Invalid recipient '{}': {}", message.to, e)))?;

        let mut builder = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(message.subject.clone());
        if let Some(reply_to) = &message.reply_to {
            let reply_to = reply_to
                .parse::<Mailbox>()
                .map_err(|e| PortError::Unexpected(format!("Invalid reply-to '{}': {}", reply_to, e)))?;
            builder = builder.reply_to(reply_to);
        }

        builder
            .multipart(MultiPart::alternative_plain_html(
                message.text_body.clone(),
                message.html_body.clone(),
            ))
            .map_err(|e| PortError::Unexpected(e.to_string()))
    }
}

//=========================================================================================
// `MailService` Trait Implementation
//=========================================================================================

#[async_trait]
impl MailService for SmtpMailAdapter {
    async fn send(&self, message: &EmailMessage) -> PortResult<()> {
        let email = self.build_message(message)?;

        // Map the transport error here; lettre errors never cross the port.
        let response = self
            .transport
            .send(email)
            .await
            .map_err(|e| PortError::Unexpected(format!("SMTP send failed: {}", e)))?;

        info!(
            to = %message.to,
            code = %response.code(),
            "Email accepted by SMTP relay"
        );
        Ok(())
    }
}
