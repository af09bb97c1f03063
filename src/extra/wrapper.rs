use std::fmt;

use chrono::{DateTime, Utc};
use mailparse::{MailAddr, SingleInfo};

use super::subject::SubjectRules;
use super::MessageExtra;
use crate::message::{FlagSet, Header, Message};

/// Computes [`MessageExtra`] for a message that cannot answer it itself.
///
/// Holds a borrowed handle to the message and derives every value from its
/// headers and flags on each call. Base [`Message`] operations are forwarded
/// unchanged.
#[derive(Clone, Copy)]
pub struct MessageExtraWrapper<'a> {
    message: &'a dyn Message,
    rules: &'a SubjectRules,
}

impl<'a> MessageExtraWrapper<'a> {
    pub fn new(message: &'a dyn Message) -> Self {
        Self::with_rules(message, SubjectRules::standard())
    }

    pub fn with_rules(message: &'a dyn Message, rules: &'a SubjectRules) -> Self {
        Self { message, rules }
    }

    /// The wrapped message.
    pub fn delegate(&self) -> &'a dyn Message {
        self.message
    }

    fn mailboxes(&self, name: &str) -> Vec<SingleInfo> {
        self.message
            .header_all(name)
            .into_iter()
            .flat_map(|value| match mailparse::addrparse(value) {
                Ok(list) => flatten(list.iter()),
                Err(e) => {
                    tracing::debug!("Unparsable {} header {:?}: {}", name, value, e);
                    Vec::new()
                }
            })
            .collect()
    }
}

impl fmt::Debug for MessageExtraWrapper<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageExtraWrapper")
            .field("message_id", &self.message.header("Message-ID"))
            .field("rules", self.rules)
            .finish()
    }
}

impl Message for MessageExtraWrapper<'_> {
    fn headers(&self) -> &[Header] {
        self.message.headers()
    }

    fn body(&self) -> &[u8] {
        self.message.body()
    }

    fn flags(&self) -> FlagSet {
        self.message.flags()
    }

    fn size(&self) -> usize {
        self.message.size()
    }

    // Resolving a wrapper again must not stack another wrapper on top.
    fn as_extra(&self) -> Option<&dyn MessageExtra> {
        Some(self)
    }
}

impl MessageExtra for MessageExtraWrapper<'_> {
    fn author(&self) -> String {
        let Some(from) = self.message.header("From") else {
            return String::new();
        };

        match self.mailboxes("From").into_iter().next() {
            Some(SingleInfo {
                display_name: Some(name),
                ..
            }) if !name.trim().is_empty() => name.trim().to_string(),
            Some(info) => info.addr,
            None => from.trim().to_string(),
        }
    }

    fn recipients(&self) -> Vec<String> {
        ["To", "Cc"]
            .into_iter()
            .flat_map(|name| self.mailboxes(name))
            .map(|info| info.addr)
            .collect()
    }

    fn simplified_subject(&self) -> String {
        let subject = self.message.header("Subject").unwrap_or_default();
        self.rules.simplify(subject).subject.to_string()
    }

    fn subject_is_reply(&self) -> bool {
        self.message
            .header("Subject")
            .map(|s| self.rules.simplify(s).is_reply)
            .unwrap_or(false)
    }

    fn message_id(&self) -> Option<String> {
        self.message.header("Message-ID").and_then(strip_angles)
    }

    fn references(&self) -> Vec<String> {
        let refs: Vec<String> = self
            .message
            .header_all("References")
            .into_iter()
            .flat_map(parse_id_list)
            .collect();
        if !refs.is_empty() {
            return refs;
        }

        self.message
            .header("In-Reply-To")
            .and_then(|v| parse_id_list(v).into_iter().next())
            .into_iter()
            .collect()
    }

    fn sent_date(&self) -> Option<DateTime<Utc>> {
        let value = self.message.header("Date")?;
        match parse_date(value) {
            Ok(date) => Some(date),
            Err(e) => {
                tracing::debug!("Unparsable Date header {:?}: {}", value, e);
                None
            }
        }
    }
}

/// Parse an RFC 2822 date, tolerating a trailing comment such as `(PST)`.
fn parse_date(value: &str) -> chrono::ParseResult<DateTime<Utc>> {
    let value = value.trim();
    let parsed = DateTime::parse_from_rfc2822(value).or_else(|e| match value.rfind('(') {
        Some(idx) if value.ends_with(')') => {
            DateTime::parse_from_rfc2822(value[..idx].trim_end())
        }
        _ => Err(e),
    })?;
    Ok(parsed.with_timezone(&Utc))
}

/// Remove surrounding whitespace and one pair of angle brackets.
fn strip_angles(value: &str) -> Option<String> {
    let trimmed = value.trim();
    let inner = trimmed
        .strip_prefix('<')
        .and_then(|v| v.strip_suffix('>'))
        .unwrap_or(trimmed)
        .trim();
    (!inner.is_empty()).then(|| inner.to_string())
}

fn flatten<'l>(addrs: impl Iterator<Item = &'l MailAddr>) -> Vec<SingleInfo> {
    addrs
        .flat_map(|addr| match addr {
            MailAddr::Single(info) => vec![info.clone()],
            MailAddr::Group(group) => group.addrs.clone(),
        })
        .collect()
}

/// Extract message ids from a header such as `References`.
///
/// Ids are taken from `<...>` groups when present, otherwise the value is
/// split on whitespace.
fn parse_id_list(value: &str) -> Vec<String> {
    if !value.contains('<') {
        return value.split_whitespace().map(str::to_string).collect();
    }

    let mut ids = Vec::new();
    let mut rest = value;
    while let Some(start) = rest.find('<') {
        let after = &rest[start + 1..];
        let Some(end) = after.find('>') else {
            break;
        };
        let id = after[..end].trim();
        if !id.is_empty() {
            ids.push(id.to_string());
        }
        rest = &after[end + 1..];
    }
    ids
}
