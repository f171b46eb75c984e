//! Mapping/JSON options parsing
//!
//! Turns a caller-supplied options document into a complete send
//! request. Keys are matched case-insensitively through a single
//! normalization pass; unknown keys are ignored.

use crate::{
    AccountConfig, CoreError, CoreResult, OutboundMessage, Provider, ProviderRegistry, Secret,
};
use serde::Deserialize;
use serde_json::{Map, Value};

/// The `provider` option: either a registry name or an inline
/// connection template.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ProviderOption {
    /// Registry key, e.g. `"gmail"`
    Named(String),
    /// Inline configuration object
    Inline(AccountConfig),
}

/// The `destinations` option: an array of addresses or one
/// comma-separated string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Destinations {
    /// `[ "jane.doe@yahoo.com", "foobar@example.com" ]`
    Many(Vec<String>),
    /// `"jane.doe@yahoo.com,foobar@example.com"`
    Csv(String),
}

/// Parsed options document.
///
/// Recognized keys: `email`, `username`, `password`, `provider`,
/// `destination`, `destinations`, `subject`, `message`, `attachment`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MailOptions {
    /// Sender's email address
    #[serde(default)]
    pub email: Option<String>,
    /// Sender's username
    #[serde(default)]
    pub username: Option<String>,
    /// Sender's password
    #[serde(default)]
    pub password: Option<String>,
    /// Provider name or inline configuration
    #[serde(default)]
    pub provider: Option<ProviderOption>,
    /// Single destination address
    #[serde(default)]
    pub destination: Option<String>,
    /// Several destination addresses
    #[serde(default)]
    pub destinations: Option<Destinations>,
    /// Subject line
    #[serde(default)]
    pub subject: Option<String>,
    /// Message body
    #[serde(default)]
    pub message: Option<String>,
    /// Attachment file path
    #[serde(default)]
    pub attachment: Option<String>,
}

/// Everything needed for one send: configuration, secret, and message
#[derive(Debug)]
pub struct SendRequest {
    /// Account configuration
    pub config: AccountConfig,
    /// Account secret
    pub secret: Secret,
    /// The message to send
    pub message: OutboundMessage,
}

impl MailOptions {
    /// Parse a JSON options document
    pub fn from_json(json: &str) -> CoreResult<Self> {
        let value: Value =
            serde_json::from_str(json).map_err(|e| CoreError::Options(e.to_string()))?;
        match value {
            Value::Object(map) => Self::from_map(map),
            _ => Err(CoreError::Options("expected a JSON object".to_string())),
        }
    }

    /// Build options from a map of named values
    pub fn from_map(map: Map<String, Value>) -> CoreResult<Self> {
        // One normalization pass; field matching below is exact.
        let normalized: Map<String, Value> = map
            .into_iter()
            .map(|(key, value)| (key.to_ascii_lowercase(), value))
            .collect();

        serde_json::from_value(Value::Object(normalized))
            .map_err(|e| CoreError::Options(e.to_string()))
    }

    /// Resolve the options into a complete send request.
    ///
    /// A missing or unrecognized `provider` is a hard error, as is a
    /// missing `password` or identity (surfaced synchronously, before
    /// any network work starts).
    pub fn into_request(self, registry: &ProviderRegistry) -> CoreResult<SendRequest> {
        let MailOptions {
            email,
            username,
            password,
            provider,
            destination,
            destinations,
            subject,
            message,
            attachment,
        } = self;

        let secret = Secret::new(password.unwrap_or_default());

        let config = match provider {
            Some(ProviderOption::Named(name)) => {
                let provider: Provider = name.parse()?;
                AccountConfig::for_provider(
                    registry,
                    provider,
                    email.as_deref().unwrap_or(""),
                    username.as_deref().unwrap_or(""),
                    &secret,
                )?
            }
            Some(ProviderOption::Inline(template)) => AccountConfig::from_template(
                email.as_deref(),
                username.as_deref(),
                &secret,
                &template,
            )?,
            None => {
                return Err(CoreError::Options(
                    "missing provider (registry name or inline configuration)".to_string(),
                ))
            }
        };

        let mut recipients = Vec::new();
        if let Some(single) = destination {
            recipients.push(single);
        }
        match destinations {
            Some(Destinations::Many(list)) => recipients.extend(list),
            Some(Destinations::Csv(csv)) => recipients.extend(
                csv.split(',')
                    .map(|part| part.trim().to_string())
                    .filter(|part| !part.is_empty()),
            ),
            None => {}
        }

        let mut outbound = OutboundMessage::new().recipients(recipients);
        if let Some(subject) = subject {
            outbound = outbound.subject(subject);
        }
        if let Some(body) = message {
            outbound = outbound.body(body);
        }
        if let Some(path) = attachment {
            outbound = outbound.attachment_path(path);
        }

        Ok(SendRequest {
            config,
            secret,
            message: outbound,
        })
    }
}
