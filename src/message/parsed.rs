use mailparse::MailHeaderMap;

use super::{Flag, FlagSet, Header, Message};
use crate::error::Result;

const MOZILLA_STATUS: &str = "X-Mozilla-Status";

// Bits of the X-Mozilla-Status header written by Netscape-family clients
const STATUS_READ: u32 = 0x0001;
const STATUS_REPLIED: u32 = 0x0002;
const STATUS_MARKED: u32 = 0x0004;
const STATUS_EXPUNGED: u32 = 0x0008;
const STATUS_FORWARDED: u32 = 0x1000;

/// An RFC 822 message read from disk or the network.
///
/// Only the header block is parsed; the body is kept as raw bytes.
/// A parsed message has no precomputed metadata, so it never declares the
/// extra capability itself.
#[derive(Debug, Clone)]
pub struct ParsedMessage {
    headers: Vec<Header>,
    body: Vec<u8>,
    flags: FlagSet,
}

impl ParsedMessage {
    pub fn parse(raw: &[u8]) -> Result<Self> {
        let (parsed, body_offset) = mailparse::parse_headers(raw)?;

        let flags = parsed
            .get_first_value(MOZILLA_STATUS)
            .and_then(|v| u32::from_str_radix(v.trim(), 16).ok())
            .map(flags_from_mozilla_status)
            .unwrap_or_default();

        let headers = parsed
            .iter()
            .map(|h| Header::new(h.get_key(), h.get_value()))
            .collect();

        Ok(Self {
            headers,
            body: raw[body_offset..].to_vec(),
            flags,
        })
    }

    /// Replace the flags derived from the message, e.g. with the store's own.
    pub fn with_flags(mut self, flags: FlagSet) -> Self {
        self.flags = flags;
        self
    }

    pub fn set_flag(&mut self, flag: Flag, on: bool) {
        if on {
            self.flags.insert(flag);
        } else {
            self.flags.remove(flag);
        }
    }
}

impl Message for ParsedMessage {
    fn headers(&self) -> &[Header] {
        &self.headers
    }

    fn body(&self) -> &[u8] {
        &self.body
    }

    fn flags(&self) -> FlagSet {
        self.flags
    }
}

fn flags_from_mozilla_status(status: u32) -> FlagSet {
    [
        (STATUS_READ, Flag::Seen),
        (STATUS_REPLIED, Flag::Answered),
        (STATUS_MARKED, Flag::Flagged),
        (STATUS_EXPUNGED, Flag::Deleted),
        (STATUS_FORWARDED, Flag::Forwarded),
    ]
    .into_iter()
    .filter(|(bit, _)| status & bit != 0)
    .map(|(_, flag)| flag)
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const RAW: &[u8] = b"From: Terry <terry@example.com>\r\n\
Subject: =?utf-8?q?caf=C3=A9?=\r\n\
X-Mozilla-Status: 1003\r\n\
\r\n\
Hello there\r\n";

    #[test]
    fn test_parse_splits_headers_and_body() {
        let msg = ParsedMessage::parse(RAW).unwrap();
        assert_eq!(msg.headers().len(), 3);
        assert_eq!(msg.header("from"), Some("Terry <terry@example.com>"));
        assert_eq!(msg.body(), b"Hello there\r\n");
    }

    #[test]
    fn test_encoded_words_are_decoded() {
        let msg = ParsedMessage::parse(RAW).unwrap();
        assert_eq!(msg.header("Subject"), Some("café"));
    }

    #[test]
    fn test_mozilla_status_flags() {
        let msg = ParsedMessage::parse(RAW).unwrap();
        let flags = msg.flags();
        assert!(flags.contains(Flag::Seen));
        assert!(flags.contains(Flag::Answered));
        assert!(flags.contains(Flag::Forwarded));
        assert!(!flags.contains(Flag::Flagged));
        assert!(!flags.contains(Flag::Deleted));
    }

    #[test]
    fn test_missing_or_bad_status_means_no_flags() {
        let msg = ParsedMessage::parse(b"Subject: x\r\n\r\n").unwrap();
        assert!(msg.flags().is_empty());

        let msg = ParsedMessage::parse(b"X-Mozilla-Status: zz\r\n\r\n").unwrap();
        assert!(msg.flags().is_empty());
    }

    #[test]
    fn test_flag_overrides() {
        let mut msg = ParsedMessage::parse(RAW)
            .unwrap()
            .with_flags(FlagSet::empty().with(Flag::Flagged));
        assert!(msg.flags().contains(Flag::Flagged));
        assert!(!msg.flags().contains(Flag::Seen));

        msg.set_flag(Flag::Flagged, false);
        assert!(msg.flags().is_empty());
    }

    #[test]
    fn test_parsed_message_is_not_natively_capable() {
        let msg = ParsedMessage::parse(RAW).unwrap();
        assert!(msg.as_extra().is_none());
    }
}
