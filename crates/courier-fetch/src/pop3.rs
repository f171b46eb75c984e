//! Minimal POP3 client over a TLS stream
//!
//! Line-oriented command/response client covering just what a read-only
//! mailbox listing needs: greeting, USER/PASS, STAT, TOP, QUIT.

use async_native_tls::TlsConnector;
use async_std::io::prelude::*;
use async_std::io::BufReader;
use async_std::net::TcpStream;
use tracing::{debug, info};

use crate::{FetchError, FetchRange, FetchResult, MessageSummary};

type TlsStream = async_native_tls::TlsStream<TcpStream>;

/// POP3 client for read-only mailbox listings
pub struct Pop3Client {
    stream: Option<BufReader<TlsStream>>,
}

impl Pop3Client {
    /// Create a new client
    pub fn new() -> Self {
        Self { stream: None }
    }

    /// Connect over TLS and consume the server greeting
    pub async fn connect(&mut self, host: &str, port: u16) -> FetchResult<()> {
        info!("Connecting to {}:{}", host, port);

        let tcp_stream = TcpStream::connect(format!("{}:{}", host, port))
            .await
            .map_err(|e| FetchError::ConnectionFailed(e.to_string()))?;

        let tls_connector = TlsConnector::new();
        let tls_stream = tls_connector
            .connect(host, tcp_stream)
            .await
            .map_err(|e| FetchError::TlsError(e.to_string()))?;

        debug!("TLS connection established");

        let mut stream = BufReader::new(tls_stream);

        let mut greeting = String::new();
        stream
            .read_line(&mut greeting)
            .await
            .map_err(|e| FetchError::ServerError(e.to_string()))?;

        debug!("Greeting: {}", greeting.trim());

        if !greeting.starts_with("+OK") {
            return Err(FetchError::ServerError(format!(
                "Unexpected greeting: {}",
                greeting.trim()
            )));
        }

        self.stream = Some(stream);
        Ok(())
    }

    /// Authenticate with USER/PASS
    pub async fn login(&mut self, username: &str, secret: &str) -> FetchResult<()> {
        let reply = self.command(&format!("USER {}", username)).await?;
        if !reply.starts_with("+OK") {
            return Err(FetchError::AuthenticationFailed(reply.trim().to_string()));
        }

        // The PASS line carries the secret and is never logged.
        let reply = self.command_quiet(&format!("PASS {}", secret)).await?;
        if !reply.starts_with("+OK") {
            return Err(FetchError::AuthenticationFailed(reply.trim().to_string()));
        }

        info!("POP3 authentication successful");
        Ok(())
    }

    /// Number of messages in the mailbox
    pub async fn stat(&mut self) -> FetchResult<u32> {
        let reply = self.command("STAT").await?;
        parse_stat(&reply)
    }

    /// Fetch the headers of one message with `TOP n 0`
    pub async fn top_headers(&mut self, number: u32) -> FetchResult<Vec<u8>> {
        let reply = self.command(&format!("TOP {} 0", number)).await?;
        if !reply.starts_with("+OK") {
            return Err(FetchError::ServerError(reply.trim().to_string()));
        }
        self.read_multiline().await
    }

    /// List messages in the resolved `(start, stop)` range.
    ///
    /// Malformed individual messages degrade to bare summaries; they never
    /// fail the listing.
    pub async fn list(&mut self, start: u32, stop: u32) -> FetchResult<Vec<MessageSummary>> {
        let total = self.stat().await?;
        debug!("Mailbox holds {} messages", total);

        let range = match FetchRange::resolve(start, stop, total) {
            Some(range) => range,
            None => return Ok(Vec::new()),
        };

        let mut summaries = Vec::with_capacity(range.len() as usize);
        for number in range.iter() {
            let raw = self.top_headers(number).await?;
            summaries.push(MessageSummary::from_headers(number, &raw));
        }
        Ok(summaries)
    }

    /// Check if the client has a connection
    pub fn is_connected(&self) -> bool {
        self.stream.is_some()
    }

    /// Send QUIT and drop the connection
    pub async fn quit(&mut self) -> FetchResult<()> {
        if let Some(stream) = self.stream.as_mut() {
            let _ = stream.get_mut().write_all(b"QUIT\r\n").await;
        }
        self.stream = None;
        Ok(())
    }

    async fn command(&mut self, line: &str) -> FetchResult<String> {
        debug!("POP3 command: {}", line);
        self.command_quiet(line).await
    }

    async fn command_quiet(&mut self, line: &str) -> FetchResult<String> {
        let stream = self.stream.as_mut().ok_or(FetchError::NotConnected)?;

        stream
            .get_mut()
            .write_all(format!("{}\r\n", line).as_bytes())
            .await
            .map_err(|e| FetchError::ServerError(e.to_string()))?;

        let mut reply = String::new();
        let n = stream
            .read_line(&mut reply)
            .await
            .map_err(|e| FetchError::ServerError(e.to_string()))?;
        if n == 0 {
            return Err(FetchError::ServerError(
                "connection closed by server".to_string(),
            ));
        }
        Ok(reply)
    }

    /// Read a dot-terminated multiline response, undoing byte-stuffing
    async fn read_multiline(&mut self) -> FetchResult<Vec<u8>> {
        let stream = self.stream.as_mut().ok_or(FetchError::NotConnected)?;

        let mut data = Vec::new();
        loop {
            let mut line = String::new();
            let n = stream
                .read_line(&mut line)
                .await
                .map_err(|e| FetchError::ServerError(e.to_string()))?;
            if n == 0 {
                return Err(FetchError::ServerError(
                    "connection closed mid-response".to_string(),
                ));
            }
            if line == ".\r\n" || line == ".\n" {
                break;
            }
            // A leading dot is doubled on the wire; strip one.
            match line.strip_prefix('.') {
                Some(rest) => data.extend_from_slice(rest.as_bytes()),
                None => data.extend_from_slice(line.as_bytes()),
            }
        }
        Ok(data)
    }
}

impl Default for Pop3Client {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a `+OK <count> <octets>` STAT reply
fn parse_stat(reply: &str) -> FetchResult<u32> {
    if !reply.starts_with("+OK") {
        return Err(FetchError::ServerError(reply.trim().to_string()));
    }
    reply
        .split_whitespace()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| FetchError::ParseError(format!("bad STAT reply: {}", reply.trim())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_stat() {
        assert_eq!(parse_stat("+OK 3 1024\r\n").unwrap(), 3);
        assert_eq!(parse_stat("+OK 0 0\r\n").unwrap(), 0);
    }

    #[test]
    fn test_parse_stat_error_reply() {
        let err = parse_stat("-ERR no mailbox\r\n").unwrap_err();
        assert!(matches!(err, FetchError::ServerError(_)));
    }

    #[test]
    fn test_parse_stat_malformed() {
        let err = parse_stat("+OK\r\n").unwrap_err();
        assert!(matches!(err, FetchError::ParseError(_)));
    }
}
