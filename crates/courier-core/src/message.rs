//! Outbound message model

use crate::{CoreError, CoreResult};
use std::path::{Path, PathBuf};

/// A send request: recipients, optional subject, body, and at most one
/// file attachment.
///
/// A send is only attempted when the recipient list is non-empty and a
/// body is present; an empty recipient list makes the whole send a
/// silent no-op.
#[derive(Debug, Clone, Default)]
pub struct OutboundMessage {
    /// Destination addresses, in order
    pub recipients: Vec<String>,
    /// Subject line
    pub subject: Option<String>,
    /// Plain-text body
    pub body: Option<String>,
    /// Filesystem path of a single attachment
    pub attachment_path: Option<PathBuf>,
}

impl OutboundMessage {
    /// Create an empty message
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a recipient
    pub fn to(mut self, address: impl Into<String>) -> Self {
        self.recipients.push(address.into());
        self
    }

    /// Add several recipients
    pub fn recipients<I, S>(mut self, addresses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.recipients.extend(addresses.into_iter().map(Into::into));
        self
    }

    /// Set the subject line
    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Set the plain-text body
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Attach a file by path
    pub fn attachment_path(mut self, path: impl AsRef<Path>) -> Self {
        self.attachment_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Check that the message can be sent (body present).
    ///
    /// Recipient emptiness is not an error: the client treats it as a
    /// deliberate nothing-to-do short-circuit instead.
    pub fn validate(&self) -> CoreResult<()> {
        match self.body {
            Some(ref body) if !body.is_empty() => Ok(()),
            _ => Err(CoreError::InvalidArgument(
                "message body is required".to_string(),
            )),
        }
    }
}
