//! Send one message from a JSON options document.
//!
//! Usage: `send_json path/to/options.json`
//!
//! ```json
//! {
//!     "email": "john.doe@gmail.com",
//!     "username": "john.doe",
//!     "password": "idkmypsswd",
//!     "provider": "gmail",
//!     "destinations": [ "jane.doe@yahoo.com" ],
//!     "subject": "I love you",
//!     "message": "Have a great day at work!"
//! }
//! ```

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use courier_core::{CoreError, MailClient, MailOptions, ProviderRegistry, SendObserver};

struct PrintingObserver;

impl SendObserver for PrintingObserver {
    fn on_success(&self) {
        println!("Message sent");
    }

    fn on_error(&self, error: &CoreError) {
        eprintln!("Send failed: {}", error);
    }

    fn on_complete(&self) {
        println!("Done");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let path = match std::env::args().nth(1) {
        Some(path) => path,
        None => bail!("usage: send_json <options.json>"),
    };

    let json = std::fs::read_to_string(&path).with_context(|| format!("reading {}", path))?;

    let registry = ProviderRegistry::with_defaults();
    let request = MailOptions::from_json(&json)?.into_request(&registry)?;

    let client = MailClient::new(request.config, request.secret);
    match client.send(request.message, Arc::new(PrintingObserver)) {
        Some(handle) => handle.await?,
        None => println!("No recipients, nothing to send"),
    }

    Ok(())
}
