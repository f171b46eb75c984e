//! Message retrieval for Courier
//!
//! Read-only mailbox listing over POP3 or IMAP. IMAP goes through
//! async-imap; POP3 is a small line-oriented client over the same TLS
//! stream stack, since no equivalent crate covers it.

mod error;
mod imap;
mod message;
mod pop3;
mod range;

pub use error::{FetchError, FetchResult};
pub use imap::ImapFetcher;
pub use message::MessageSummary;
pub use pop3::Pop3Client;
pub use range::FetchRange;
