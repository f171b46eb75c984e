//! IMAP mailbox listing via async-imap

use async_imap::Session;
use async_native_tls::TlsStream;
use async_std::net::TcpStream;
use futures::TryStreamExt;
use tracing::{debug, info};

use crate::message::parse_rfc2822_date;
use crate::{FetchError, FetchRange, FetchResult, MessageSummary};

type ImapStream = TlsStream<TcpStream>;

/// IMAP client for read-only INBOX listings
pub struct ImapFetcher {
    session: Option<Session<ImapStream>>,
    host: String,
    port: u16,
}

impl ImapFetcher {
    /// Create a new IMAP client
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            session: None,
            host: host.into(),
            port,
        }
    }

    /// Connect and authenticate with LOGIN (username/password)
    pub async fn login(&mut self, username: &str, secret: &str) -> FetchResult<()> {
        info!("Connecting to {}:{}", self.host, self.port);

        let tcp_stream = TcpStream::connect(format!("{}:{}", self.host, self.port))
            .await
            .map_err(|e| FetchError::ConnectionFailed(e.to_string()))?;

        let tls_connector = async_native_tls::TlsConnector::new();
        let tls_stream = tls_connector
            .connect(&self.host, tcp_stream)
            .await
            .map_err(|e| FetchError::TlsError(e.to_string()))?;

        debug!("TLS connection established");

        let client = async_imap::Client::new(tls_stream);

        let session = client
            .login(username, secret)
            .await
            .map_err(|(e, _)| FetchError::AuthenticationFailed(e.to_string()))?;

        self.session = Some(session);
        info!("LOGIN authentication successful");
        Ok(())
    }

    fn session_mut(&mut self) -> FetchResult<&mut Session<ImapStream>> {
        self.session.as_mut().ok_or(FetchError::NotConnected)
    }

    /// List INBOX messages in the resolved `(start, stop)` range
    pub async fn list_inbox(&mut self, start: u32, stop: u32) -> FetchResult<Vec<MessageSummary>> {
        let session = self.session_mut()?;

        let mailbox = session
            .select("INBOX")
            .await
            .map_err(|e| FetchError::ServerError(e.to_string()))?;

        debug!("INBOX holds {} messages", mailbox.exists);

        let range = match FetchRange::resolve(start, stop, mailbox.exists) {
            Some(range) => range,
            None => return Ok(Vec::new()),
        };

        let fetch_stream = session
            .fetch(range.to_imap_set(), "(ENVELOPE)")
            .await
            .map_err(|e| FetchError::ServerError(e.to_string()))?;

        let mut summaries = Vec::new();

        let mut stream = fetch_stream;
        while let Some(fetch) = stream
            .try_next()
            .await
            .map_err(|e| FetchError::ParseError(e.to_string()))?
        {
            summaries.push(summary_from_fetch(&fetch));
        }

        debug!("Fetched {} message summaries", summaries.len());
        Ok(summaries)
    }

    /// Check if the client has a session
    pub fn is_connected(&self) -> bool {
        self.session.is_some()
    }

    /// Close the connection
    pub async fn logout(&mut self) -> FetchResult<()> {
        if let Some(mut session) = self.session.take() {
            session
                .logout()
                .await
                .map_err(|e| FetchError::ServerError(e.to_string()))?;
        }
        Ok(())
    }
}

fn summary_from_fetch(fetch: &async_imap::types::Fetch) -> MessageSummary {
    let number = fetch.message;

    let envelope = match fetch.envelope() {
        Some(env) => env,
        None => return MessageSummary { number, ..MessageSummary::default() },
    };

    let from = first_address_display(envelope.from.as_ref());

    let subject = envelope
        .subject
        .as_ref()
        .map(|s| String::from_utf8_lossy(s).to_string());

    let date = envelope
        .date
        .as_ref()
        .and_then(|s| parse_rfc2822_date(&String::from_utf8_lossy(s)));

    MessageSummary {
        number,
        from,
        subject,
        date,
    }
}

/// Format the first envelope address as "Name <mailbox@host>"
fn first_address_display(
    addrs: Option<&Vec<imap_proto::types::Address>>,
) -> Option<String> {
    let addr = addrs?.first()?;

    let mailbox = addr
        .mailbox
        .as_ref()
        .map(|s| String::from_utf8_lossy(s).to_string())?;
    let address = match addr.host.as_ref() {
        // Some servers put the full address in the mailbox slot
        Some(host) => format!("{}@{}", mailbox, String::from_utf8_lossy(host)),
        None => mailbox,
    };

    match addr.name.as_ref().map(|s| String::from_utf8_lossy(s).to_string()) {
        Some(name) if !name.is_empty() => Some(format!("{} <{}>", name, address)),
        _ => Some(address),
    }
}
