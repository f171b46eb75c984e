//! Core library for Courier
//!
//! Sends (and minimally retrieves) email over direct SMTP/POP3/IMAP
//! connections instead of delegating to an installed mail agent. This
//! crate provides the provider registry, account configuration, secret
//! handling, options parsing, and the asynchronous sending client;
//! protocol transmission lives in `courier-smtp` and `courier-fetch`.

mod account;
mod client;
mod dispatch;
mod error;
mod message;
mod options;
mod provider;
mod secret;

pub use account::AccountConfig;
pub use client::{MailClient, MailTransport, RetrieveProtocol};
pub use dispatch::{NullObserver, SendObserver, SendOutcome};
pub use error::{CoreError, CoreResult};
pub use message::OutboundMessage;
pub use options::{Destinations, MailOptions, ProviderOption, SendRequest};
pub use provider::{Provider, ProviderRegistry};
pub use secret::Secret;

/// Re-export the retrieval summary type for convenience
pub use courier_fetch::MessageSummary;
