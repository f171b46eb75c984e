//! SMTP transmission for Courier
//!
//! Builds MIME messages and sends them over a TLS SMTP session using
//! password authentication. Credentials are obtained through the
//! [`ProvideCredentials`] capability rather than held here.

mod client;
mod credentials;
mod error;

pub use client::{build_message, AttachmentPart, MailPayload, SmtpMailer};
pub use credentials::ProvideCredentials;
pub use error::{SmtpError, SmtpResult};
