//! Extended metadata for stored mail and news messages.
//!
//! Storage backends hand out [`Message`] handles. Some of them already know
//! their derived metadata (author, simplified subject, threading ids); the
//! rest need it computed from their headers. [`extra::get`] hides the
//! difference and always yields a [`MessageExtra`] view.

pub mod config;
pub mod error;
pub mod extra;
pub mod folder;
pub mod hasher;
pub mod message;
pub mod summary;

pub use error::{Error, Result};
pub use extra::{Extra, MessageExtra, MessageExtraFactory, MessageExtraWrapper};
pub use message::{Flag, FlagSet, Header, Message, ParsedMessage};
pub use summary::{Summarized, Summary};
