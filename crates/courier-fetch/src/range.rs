//! Retrieval range resolution

/// Inclusive range of 1-based message sequence numbers to retrieve.
///
/// Mailbox listings take a `(start, stop)` pair where `0` means
/// "unspecified": `(0, 0)` selects the whole mailbox, `(0, n)` the first
/// `n` messages, `(s, e)` the messages numbered `s` through `e`, and
/// `(s, 0)` the messages from `s` through the end of the mailbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchRange {
    /// First sequence number, 1-based
    pub first: u32,
    /// Last sequence number, inclusive
    pub last: u32,
}

impl FetchRange {
    /// Resolve a `(start, stop)` request against the mailbox size.
    ///
    /// Returns `None` when the request selects nothing (empty mailbox, or
    /// a start past the end).
    pub fn resolve(start: u32, stop: u32, total: u32) -> Option<Self> {
        if total == 0 {
            return None;
        }
        let (first, last) = match (start, stop) {
            (0, 0) => (1, total),
            (0, n) => (1, n.min(total)),
            (s, 0) => (s, total),
            (s, e) => (s, e.min(total)),
        };
        if first > last || first > total {
            return None;
        }
        Some(Self { first, last })
    }

    /// Render as an IMAP sequence set, e.g. `3:8`.
    pub fn to_imap_set(&self) -> String {
        format!("{}:{}", self.first, self.last)
    }

    /// Iterate over the sequence numbers in the range.
    pub fn iter(&self) -> std::ops::RangeInclusive<u32> {
        self.first..=self.last
    }

    /// Number of messages selected.
    pub fn len(&self) -> u32 {
        self.last - self.first + 1
    }

    /// True when the range selects nothing. `resolve` never returns such
    /// a range; this exists for the `len`/`is_empty` pairing.
    pub fn is_empty(&self) -> bool {
        self.last < self.first
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_mailbox() {
        let range = FetchRange::resolve(0, 0, 12).unwrap();
        assert_eq!(range, FetchRange { first: 1, last: 12 });
        assert_eq!(range.len(), 12);
    }

    #[test]
    fn test_first_n() {
        let range = FetchRange::resolve(0, 5, 12).unwrap();
        assert_eq!(range, FetchRange { first: 1, last: 5 });
    }

    #[test]
    fn test_explicit_range() {
        let range = FetchRange::resolve(3, 8, 12).unwrap();
        assert_eq!(range, FetchRange { first: 3, last: 8 });
        assert_eq!(range.to_imap_set(), "3:8");
    }

    #[test]
    fn test_tail_range() {
        let range = FetchRange::resolve(9, 0, 12).unwrap();
        assert_eq!(range, FetchRange { first: 9, last: 12 });
    }

    #[test]
    fn test_stop_clamped_to_mailbox() {
        let range = FetchRange::resolve(0, 50, 12).unwrap();
        assert_eq!(range, FetchRange { first: 1, last: 12 });

        let range = FetchRange::resolve(10, 50, 12).unwrap();
        assert_eq!(range, FetchRange { first: 10, last: 12 });
    }

    #[test]
    fn test_empty_mailbox_selects_nothing() {
        assert_eq!(FetchRange::resolve(0, 0, 0), None);
        assert_eq!(FetchRange::resolve(1, 5, 0), None);
    }

    #[test]
    fn test_start_past_end_selects_nothing() {
        assert_eq!(FetchRange::resolve(13, 0, 12), None);
        assert_eq!(FetchRange::resolve(8, 3, 12), None);
    }
}
