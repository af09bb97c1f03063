use std::ops::Deref;

use super::subject::SubjectRules;
use super::wrapper::MessageExtraWrapper;
use super::MessageExtra;
use crate::config::ExtraConfig;
use crate::error::{Error, Result};
use crate::message::Message;

/// A [`MessageExtra`] view of a message.
///
/// `Native` is the message itself; `Wrapped` is a fresh adapter computing
/// the metadata from the message's headers. Either way it dereferences to
/// `dyn MessageExtra`.
#[derive(Debug)]
pub enum Extra<'a> {
    Native(&'a dyn MessageExtra),
    Wrapped(MessageExtraWrapper<'a>),
}

impl<'a> Extra<'a> {
    pub fn is_native(&self) -> bool {
        matches!(self, Extra::Native(_))
    }

    pub fn wrapper(&self) -> Option<&MessageExtraWrapper<'a>> {
        match self {
            Extra::Native(_) => None,
            Extra::Wrapped(wrapper) => Some(wrapper),
        }
    }
}

impl<'a> Deref for Extra<'a> {
    type Target = dyn MessageExtra + 'a;

    fn deref(&self) -> &Self::Target {
        match self {
            Extra::Native(native) => *native,
            Extra::Wrapped(wrapper) => wrapper,
        }
    }
}

/// Resolves messages to [`Extra`] views using configured subject rules.
#[derive(Debug, Clone, Default)]
pub struct MessageExtraFactory {
    rules: SubjectRules,
}

impl MessageExtraFactory {
    pub fn new(rules: SubjectRules) -> Self {
        Self { rules }
    }

    pub fn from_config(config: &ExtraConfig) -> Self {
        Self::new(SubjectRules::from_config(config))
    }

    pub fn rules(&self) -> &SubjectRules {
        &self.rules
    }

    /// Resolve `message` with this factory's rules.
    ///
    /// The rules only apply when a wrapper has to be built. A message that
    /// already answers [`MessageExtra`] keeps its own answers, and that
    /// includes a [`MessageExtraWrapper`] built elsewhere with other rules.
    pub fn get<'a>(&'a self, message: &'a dyn Message) -> Extra<'a> {
        resolve(message, &self.rules)
    }

    pub fn try_get<'a>(&'a self, message: Option<&'a dyn Message>) -> Result<Extra<'a>> {
        let message = require(message)?;
        Ok(self.get(message))
    }
}

/// Get the extra-metadata view of `message` with the standard subject rules.
///
/// Messages that declare the capability are returned as-is; anything else
/// is wrapped. Never mutates the message and never caches: each call on a
/// non-capable message builds a new wrapper.
pub fn get(message: &dyn Message) -> Extra<'_> {
    resolve(message, SubjectRules::standard())
}

/// Like [`get`], failing with [`Error::InvalidArgument`] when no message is
/// supplied.
pub fn try_get(message: Option<&dyn Message>) -> Result<Extra<'_>> {
    let message = require(message)?;
    Ok(get(message))
}

fn require(message: Option<&dyn Message>) -> Result<&dyn Message> {
    message.ok_or_else(|| Error::InvalidArgument("message handle is absent".to_string()))
}

fn resolve<'a>(message: &'a dyn Message, rules: &'a SubjectRules) -> Extra<'a> {
    match message.as_extra() {
        Some(native) => {
            tracing::trace!("Message supports extra metadata natively");
            Extra::Native(native)
        }
        None => {
            tracing::trace!("Wrapping message to compute extra metadata");
            Extra::Wrapped(MessageExtraWrapper::with_rules(message, rules))
        }
    }
}
