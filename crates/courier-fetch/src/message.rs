//! Retrieved message summaries

use chrono::{DateTime, FixedOffset};

/// Summary of one message in a mailbox listing
#[derive(Debug, Clone, Default)]
pub struct MessageSummary {
    /// 1-based sequence number within the mailbox
    pub number: u32,
    /// Sender, as "Name <address>" or a bare address
    pub from: Option<String>,
    /// Subject line
    pub subject: Option<String>,
    /// Date sent
    pub date: Option<DateTime<FixedOffset>>,
}

impl MessageSummary {
    /// Build a summary from raw RFC 822 headers (POP3 `TOP` output).
    ///
    /// Unparseable headers yield a summary with only the sequence number
    /// set; a listing never fails because one message is malformed.
    pub fn from_headers(number: u32, raw: &[u8]) -> Self {
        let parsed = match mail_parser::MessageParser::default().parse_headers(raw) {
            Some(message) => message,
            None => return Self { number, ..Self::default() },
        };

        let from = parsed.from().and_then(|address| address.first()).map(|addr| {
            let address = addr.address().unwrap_or_default();
            match addr.name() {
                Some(name) if !name.is_empty() => format!("{} <{}>", name, address),
                _ => address.to_string(),
            }
        });

        let subject = parsed.subject().map(|s| s.to_string());

        let date = parsed
            .date()
            .and_then(|d| DateTime::parse_from_rfc3339(&d.to_rfc3339()).ok());

        Self {
            number,
            from,
            subject,
            date,
        }
    }

    /// Get the subject, with a default for empty
    pub fn subject_display(&self) -> &str {
        self.subject.as_deref().unwrap_or("(No subject)")
    }

    /// Get the sender's display string
    pub fn from_display(&self) -> &str {
        self.from.as_deref().unwrap_or("(Unknown sender)")
    }
}

/// Parse an RFC 2822 date header value (IMAP envelope dates).
pub(crate) fn parse_rfc2822_date(raw: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc2822(raw.trim()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_from_headers() {
        let raw = b"From: Jane Doe <jane.doe@yahoo.com>\r\n\
Subject: hello\r\n\
Date: Tue, 1 Jul 2003 10:52:37 +0200\r\n\
\r\n";
        let summary = MessageSummary::from_headers(3, raw);

        assert_eq!(summary.number, 3);
        assert_eq!(summary.from.as_deref(), Some("Jane Doe <jane.doe@yahoo.com>"));
        assert_eq!(summary.subject.as_deref(), Some("hello"));
        let date = summary.date.unwrap();
        assert_eq!(date.timestamp(), 1057049557);
    }

    #[test]
    fn test_summary_bare_address() {
        let raw = b"From: jane.doe@yahoo.com\r\nSubject: x\r\n\r\n";
        let summary = MessageSummary::from_headers(1, raw);
        assert_eq!(summary.from.as_deref(), Some("jane.doe@yahoo.com"));
    }

    #[test]
    fn test_summary_defaults() {
        let summary = MessageSummary::from_headers(7, b"\r\n");
        assert_eq!(summary.number, 7);
        assert_eq!(summary.subject_display(), "(No subject)");
        assert_eq!(summary.from_display(), "(Unknown sender)");
    }

    #[test]
    fn test_parse_rfc2822_date() {
        let date = parse_rfc2822_date("Tue, 1 Jul 2003 10:52:37 +0200").unwrap();
        assert_eq!(date.timestamp(), 1057049557);
        assert!(parse_rfc2822_date("not a date").is_none());
    }
}
