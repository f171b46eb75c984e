//! The sending/retrieving mail client

use crate::dispatch::{self, SendObserver, SendOutcome};
use crate::{AccountConfig, CoreResult, OutboundMessage, Secret};
use async_trait::async_trait;
use courier_fetch::{FetchError, ImapFetcher, MessageSummary, Pop3Client};
use courier_smtp::{MailPayload, ProvideCredentials, SmtpError, SmtpMailer};
use std::path::Path;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Protocol used for message retrieval
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetrieveProtocol {
    /// POP3 over TLS
    Pop3,
    /// IMAP over TLS
    Imap,
}

/// Transmission seam between the client and the SMTP layer.
///
/// The production implementation is [`SmtpMailer`]; tests substitute a
/// fake to exercise the callback contract without a network.
#[async_trait]
pub trait MailTransport: Send + Sync {
    /// Transmit one payload, authenticating with the given credentials
    async fn transmit(
        &self,
        creds: &(dyn ProvideCredentials + Send + Sync),
        payload: MailPayload,
    ) -> Result<(), SmtpError>;
}

#[async_trait]
impl MailTransport for SmtpMailer {
    async fn transmit(
        &self,
        creds: &(dyn ProvideCredentials + Send + Sync),
        payload: MailPayload,
    ) -> Result<(), SmtpError> {
        self.send(creds, &payload).await
    }
}

/// Client bound to one account configuration and its secret.
///
/// The secret lives only here for the lifetime of the client; it is
/// never exposed through a getter, log line, or serialized form. The
/// configuration is read-only and safely shared across concurrent
/// sends.
#[derive(Clone)]
pub struct MailClient {
    config: AccountConfig,
    secret: Secret,
    transport: Arc<dyn MailTransport>,
}

impl MailClient {
    /// Create a client that sends through the configuration's SMTP
    /// server
    pub fn new(config: AccountConfig, secret: Secret) -> Self {
        let transport = Arc::new(SmtpMailer::new(
            config.smtp_host.clone(),
            config.smtp_port,
            config.socket_port,
        ));
        Self {
            config,
            secret,
            transport,
        }
    }

    /// Create a client with a caller-supplied transport
    pub fn with_transport(
        config: AccountConfig,
        secret: Secret,
        transport: Arc<dyn MailTransport>,
    ) -> Self {
        Self {
            config,
            secret,
            transport,
        }
    }

    /// The bound configuration
    pub fn config(&self) -> &AccountConfig {
        &self.config
    }

    /// Send a message as one background unit of work.
    ///
    /// An empty recipient list is a deliberate nothing-to-do
    /// short-circuit: the call returns `None` immediately and no
    /// callback fires. Otherwise exactly one of the observer's
    /// `on_success`/`on_error` hooks fires, followed by exactly one
    /// `on_complete`; errors never propagate to the caller. Each call is
    /// a single attempt with no retry.
    pub fn send(
        &self,
        message: OutboundMessage,
        observer: Arc<dyn SendObserver>,
    ) -> Option<JoinHandle<()>> {
        if message.recipients.is_empty() {
            debug!("Send with no recipients is a no-op");
            return None;
        }

        let client = self.clone();
        Some(tokio::spawn(async move {
            let outcome = match client.execute_send(message).await {
                Ok(()) => SendOutcome::Success,
                Err(cause) => SendOutcome::Failure(cause),
            };
            dispatch::notify(observer.as_ref(), outcome);
        }))
    }

    async fn execute_send(&self, message: OutboundMessage) -> CoreResult<()> {
        message.validate()?;

        // A fresh payload per call; nothing message-scoped is shared
        // between in-flight sends.
        let mut payload = MailPayload::new(
            self.config.email_address.clone(),
            message.body.unwrap_or_default(),
        );
        for recipient in message.recipients {
            payload = payload.to(recipient);
        }
        if let Some(subject) = message.subject {
            payload = payload.subject(subject);
        }
        if let Some(ref path) = message.attachment_path {
            if let Some((filename, data)) = load_attachment(path).await {
                payload = payload.attachment(filename, "application/octet-stream", data);
            }
        }

        self.transport.transmit(self, payload).await?;
        Ok(())
    }

    /// List messages from the account's POP3 or IMAP server.
    ///
    /// `(0, 0)` lists the whole mailbox, `(0, n)` the first `n`
    /// messages, `(s, e)` messages `s` through `e`, and `(s, 0)` from
    /// `s` to the end. Returns an error when the account has no server
    /// for the protocol or the session fails; retrieval never panics
    /// and never goes through the send callbacks.
    pub async fn list_messages(
        &self,
        protocol: RetrieveProtocol,
        start: u32,
        stop: u32,
    ) -> CoreResult<Vec<MessageSummary>> {
        match protocol {
            RetrieveProtocol::Pop3 => {
                if self.config.pop_host.is_empty() {
                    return Err(FetchError::Unavailable(
                        "account has no POP3 server configured".to_string(),
                    )
                    .into());
                }
                let mut client = Pop3Client::new();
                client
                    .connect(&self.config.pop_host, self.config.pop_port)
                    .await?;
                client
                    .login(&self.config.username, self.secret.expose())
                    .await?;
                let listing = client.list(start, stop).await;
                let _ = client.quit().await;
                Ok(listing?)
            }
            RetrieveProtocol::Imap => {
                if self.config.imap_host.is_empty() {
                    return Err(FetchError::Unavailable(
                        "account has no IMAP server configured".to_string(),
                    )
                    .into());
                }
                let mut client =
                    ImapFetcher::new(self.config.imap_host.clone(), self.config.imap_port);
                client
                    .login(&self.config.username, self.secret.expose())
                    .await?;
                let listing = client.list_inbox(start, stop).await;
                let _ = client.logout().await;
                Ok(listing?)
            }
        }
    }
}

impl ProvideCredentials for MailClient {
    fn username(&self) -> &str {
        &self.config.username
    }

    fn secret(&self) -> &str {
        self.secret.expose()
    }
}

/// Load an attachment best-effort: an unreadable file is logged and
/// skipped, and the send proceeds with the text body alone.
async fn load_attachment(path: &Path) -> Option<(String, Vec<u8>)> {
    match tokio::fs::read(path).await {
        Ok(data) => {
            let filename = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| "attachment".to_string());
            Some((filename, data))
        }
        Err(e) => {
            warn!(
                "Attachment {} unavailable ({}), sending without it",
                path.display(),
                e
            );
            None
        }
    }
}
