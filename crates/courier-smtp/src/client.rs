//! SMTP client implementation

use crate::{ProvideCredentials, SmtpError, SmtpResult};
use lettre::{
    message::{header::ContentType, Attachment, Mailbox, MultiPart, SinglePart},
    transport::smtp::authentication::{Credentials, Mechanism},
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::info;

/// The file part of an outgoing message, already loaded into memory
#[derive(Debug, Clone)]
pub struct AttachmentPart {
    /// Filename to display
    pub filename: String,
    /// MIME type (e.g., "application/pdf")
    pub mime_type: String,
    /// Raw file data
    pub data: Vec<u8>,
}

/// A message ready for transmission.
///
/// One payload is built per send call; the MIME container is never shared
/// between sends.
#[derive(Debug, Clone)]
pub struct MailPayload {
    /// From address
    pub from: String,
    /// To addresses
    pub to: Vec<String>,
    /// Subject line
    pub subject: Option<String>,
    /// Plain text body
    pub body: String,
    /// Optional single file attachment
    pub attachment: Option<AttachmentPart>,
}

impl MailPayload {
    /// Create a new payload with a sender and a plain-text body
    pub fn new(from: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: Vec::new(),
            subject: None,
            body: body.into(),
            attachment: None,
        }
    }

    /// Add a To recipient
    pub fn to(mut self, address: impl Into<String>) -> Self {
        self.to.push(address.into());
        self
    }

    /// Set the subject line
    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Attach a single file part
    pub fn attachment(
        mut self,
        filename: impl Into<String>,
        mime_type: impl Into<String>,
        data: Vec<u8>,
    ) -> Self {
        self.attachment = Some(AttachmentPart {
            filename: filename.into(),
            mime_type: mime_type.into(),
            data,
        });
        self
    }
}

/// SMTP client bound to one server endpoint
pub struct SmtpMailer {
    host: String,
    port: u16,
    socket_port: u16,
}

impl SmtpMailer {
    /// Create a new SMTP client. `socket_port` is the implicit-TLS port
    /// (465 for every common provider); when `port` equals it the session
    /// is TLS-wrapped from the first byte, otherwise STARTTLS is used.
    pub fn new(host: impl Into<String>, port: u16, socket_port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            socket_port,
        }
    }

    /// Send a payload using password authentication (PLAIN mechanism)
    pub async fn send(
        &self,
        creds: &(dyn ProvideCredentials + Send + Sync),
        payload: &MailPayload,
    ) -> SmtpResult<()> {
        info!("Sending email via SMTP to {} recipients", payload.to.len());

        let message = build_message(payload)?;

        let builder = if self.port == self.socket_port {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&self.host)
                .map_err(|e| SmtpError::ConnectionFailed(e.to_string()))?
                .port(self.socket_port)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.host)
                .map_err(|e| SmtpError::ConnectionFailed(e.to_string()))?
                .port(self.port)
        };

        let transport = builder
            .credentials(Credentials::new(
                creds.username().to_string(),
                creds.secret().to_string(),
            ))
            .authentication(vec![Mechanism::Plain])
            .build();

        transport
            .send(message)
            .await
            .map_err(|e| SmtpError::SendFailed(e.to_string()))?;

        info!("Email sent successfully");
        Ok(())
    }
}

/// Build a lettre Message from a payload
pub fn build_message(payload: &MailPayload) -> SmtpResult<Message> {
    let from_mailbox = Mailbox::new(
        None,
        payload
            .from
            .parse()
            .map_err(|e| SmtpError::InvalidAddress(format!("{}: {}", payload.from, e)))?,
    );

    let mut builder = Message::builder().from(from_mailbox).date_now();

    for to in &payload.to {
        let mailbox = Mailbox::new(
            None,
            to.parse()
                .map_err(|e| SmtpError::InvalidAddress(format!("{}: {}", to, e)))?,
        );
        builder = builder.to(mailbox);
    }

    if let Some(ref subject) = payload.subject {
        builder = builder.subject(subject);
    }

    let body_part = SinglePart::builder()
        .header(ContentType::TEXT_PLAIN)
        .body(payload.body.clone());

    let mut mixed = MultiPart::mixed().singlepart(body_part);

    if let Some(ref att) = payload.attachment {
        let content_type = att
            .mime_type
            .parse::<ContentType>()
            .unwrap_or(ContentType::parse("application/octet-stream").unwrap());

        let attachment = Attachment::new(att.filename.clone()).body(att.data.clone(), content_type);
        mixed = mixed.singlepart(attachment);
    }

    builder
        .multipart(mixed)
        .map_err(|e| SmtpError::MessageBuildError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_plain_message() {
        let payload = MailPayload::new("sender@example.com", "Have a great day at work!")
            .to("jane.doe@yahoo.com")
            .subject("I love you");

        let message = build_message(&payload).unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();

        assert!(raw.contains("Subject: I love you"));
        assert!(raw.contains("To: jane.doe@yahoo.com"));
        assert!(raw.contains("Have a great day at work!"));
        assert!(raw.contains("multipart/mixed"));
    }

    #[test]
    fn test_build_message_with_attachment() {
        let payload = MailPayload::new("sender@example.com", "see attached")
            .to("jane.doe@yahoo.com")
            .attachment("notes.txt", "text/plain", b"hello".to_vec());

        let message = build_message(&payload).unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();

        assert!(raw.contains("notes.txt"));
        assert!(raw.contains("see attached"));
    }

    #[test]
    fn test_build_message_no_subject() {
        let payload = MailPayload::new("sender@example.com", "body").to("a@example.com");

        let message = build_message(&payload).unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();

        assert!(!raw.contains("Subject:"));
    }

    #[test]
    fn test_invalid_recipient_address() {
        let payload = MailPayload::new("sender@example.com", "body").to("not an address");

        let err = build_message(&payload).unwrap_err();
        assert!(matches!(err, SmtpError::InvalidAddress(_)));
    }

    #[test]
    fn test_invalid_from_address() {
        let payload = MailPayload::new("###", "body").to("a@example.com");

        let err = build_message(&payload).unwrap_err();
        assert!(matches!(err, SmtpError::InvalidAddress(_)));
    }
}
