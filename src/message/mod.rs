//! Base message model shared by every storage backend.

pub mod parsed;

use serde::{Deserialize, Serialize};

use crate::extra::MessageExtra;

pub use parsed::ParsedMessage;

/// A single decoded header field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    pub name: String,
    pub value: String,
}

impl Header {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Header names are case-insensitive (RFC 5322 §1.2.2)
    pub fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

/// Per-message status flags kept by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Flag {
    Seen,
    Answered,
    Flagged,
    Deleted,
    Draft,
    Forwarded,
}

impl Flag {
    pub const ALL: [Flag; 6] = [
        Flag::Seen,
        Flag::Answered,
        Flag::Flagged,
        Flag::Deleted,
        Flag::Draft,
        Flag::Forwarded,
    ];

    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

/// Compact set of [`Flag`]s.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<Flag>", into = "Vec<Flag>")]
pub struct FlagSet(u8);

impl FlagSet {
    pub fn empty() -> Self {
        Self(0)
    }

    pub fn contains(&self, flag: Flag) -> bool {
        self.0 & flag.bit() != 0
    }

    pub fn insert(&mut self, flag: Flag) {
        self.0 |= flag.bit();
    }

    pub fn remove(&mut self, flag: Flag) {
        self.0 &= !flag.bit();
    }

    pub fn with(mut self, flag: Flag) -> Self {
        self.insert(flag);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = Flag> {
        let set = *self;
        Flag::ALL.into_iter().filter(move |f| set.contains(*f))
    }
}

impl FromIterator<Flag> for FlagSet {
    fn from_iter<I: IntoIterator<Item = Flag>>(iter: I) -> Self {
        let mut set = FlagSet::empty();
        for flag in iter {
            set.insert(flag);
        }
        set
    }
}

impl From<Vec<Flag>> for FlagSet {
    fn from(flags: Vec<Flag>) -> Self {
        flags.into_iter().collect()
    }
}

impl From<FlagSet> for Vec<Flag> {
    fn from(set: FlagSet) -> Self {
        set.iter().collect()
    }
}

/// Handle to a stored mail or news message.
///
/// Implementations that can answer [`MessageExtra`] queries themselves
/// declare it by overriding [`Message::as_extra`]. Everything else gets a
/// [`crate::MessageExtraWrapper`] from [`crate::extra::get`].
pub trait Message: Send + Sync {
    /// Decoded header fields in their original order.
    fn headers(&self) -> &[Header];

    /// Raw body bytes following the header block.
    fn body(&self) -> &[u8];

    fn flags(&self) -> FlagSet;

    /// First header with the given name, compared case-insensitively.
    fn header(&self, name: &str) -> Option<&str> {
        self.headers()
            .iter()
            .find(|h| h.is(name))
            .map(|h| h.value.as_str())
    }

    /// Every header with the given name, in order.
    fn header_all(&self, name: &str) -> Vec<&str> {
        self.headers()
            .iter()
            .filter(|h| h.is(name))
            .map(|h| h.value.as_str())
            .collect()
    }

    /// Approximate size of the message as it would be written out.
    fn size(&self) -> usize {
        let header_bytes: usize = self
            .headers()
            .iter()
            .map(|h| h.name.len() + h.value.len() + 4)
            .sum();
        header_bytes + 2 + self.body().len()
    }

    /// Native extra-metadata capability. `None` means the view must be
    /// computed from headers by a wrapper.
    fn as_extra(&self) -> Option<&dyn MessageExtra> {
        None
    }
}
