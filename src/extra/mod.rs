//! The extra-metadata capability and its resolver.
//!
//! If you want to call any [`MessageExtra`] method on a [`Message`], get the
//! view through [`get`] (or a configured [`MessageExtraFactory`]). Some
//! messages implement the capability directly; the rest have it computed
//! from their headers by a [`MessageExtraWrapper`].

pub mod factory;
pub mod subject;
pub mod wrapper;

use std::fmt;

use chrono::{DateTime, Utc};

use crate::hasher;
use crate::message::{Flag, Message};

pub use factory::{get, try_get, Extra, MessageExtraFactory};
pub use subject::SubjectRules;
pub use wrapper::MessageExtraWrapper;

/// Derived per-message metadata layered on top of the base [`Message`].
pub trait MessageExtra: Message {
    /// Display name of the sender, falling back to the bare address.
    fn author(&self) -> String;

    /// Addresses of every `To` and `Cc` recipient.
    fn recipients(&self) -> Vec<String>;

    /// Subject with reply and forward prefixes removed.
    fn simplified_subject(&self) -> String;

    /// Whether the subject carried at least one reply prefix.
    fn subject_is_reply(&self) -> bool;

    /// `Message-ID` without angle brackets.
    fn message_id(&self) -> Option<String>;

    fn message_id_hash(&self) -> Option<String> {
        self.message_id().map(|id| hasher::message_id_hash(&id))
    }

    /// Ids of the messages this one follows up, oldest first.
    fn references(&self) -> Vec<String>;

    fn sent_date(&self) -> Option<DateTime<Utc>>;

    fn is_read(&self) -> bool {
        self.flags().contains(Flag::Seen)
    }

    fn is_replied(&self) -> bool {
        self.flags().contains(Flag::Answered)
    }

    fn is_forwarded(&self) -> bool {
        self.flags().contains(Flag::Forwarded)
    }

    fn is_flagged(&self) -> bool {
        self.flags().contains(Flag::Flagged)
    }

    fn is_deleted(&self) -> bool {
        self.flags().contains(Flag::Deleted)
    }
}

impl fmt::Debug for dyn MessageExtra + '_ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageExtra")
            .field("message_id", &self.message_id())
            .field("flags", &self.flags())
            .finish_non_exhaustive()
    }
}
