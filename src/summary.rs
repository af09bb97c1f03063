//! Precomputed extra metadata.
//!
//! A [`Summary`] snapshots everything [`MessageExtra`] can answer. Pairing a
//! message with its summary gives a [`Summarized`] message, which supports
//! the capability natively and skips header parsing entirely. Summaries are
//! persisted one JSON object per line.

use std::collections::HashMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::extra::{self, MessageExtra, MessageExtraWrapper, SubjectRules};
use crate::hasher;
use crate::message::{FlagSet, Header, Message};

const SUMMARY_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Schema version for forward compatibility
    pub v: u32,
    pub author: String,
    pub recipients: Vec<String>,
    /// Simplified subject
    pub subject: String,
    pub is_reply: bool,
    pub message_id: Option<String>,
    pub message_id_hash: Option<String>,
    pub references: Vec<String>,
    pub sent_date: Option<DateTime<Utc>>,
    pub flags: FlagSet,
    pub size: usize,
    /// Hash of the headers and body the summary was computed from
    #[serde(default)]
    pub content_hash: String,
}

impl Summary {
    /// Snapshot every derived value of `extra`.
    pub fn capture(extra: &dyn MessageExtra) -> Self {
        Self {
            v: SUMMARY_VERSION,
            author: extra.author(),
            recipients: extra.recipients(),
            subject: extra.simplified_subject(),
            is_reply: extra.subject_is_reply(),
            message_id: extra.message_id(),
            message_id_hash: extra.message_id_hash(),
            references: extra.references(),
            sent_date: extra.sent_date(),
            flags: extra.flags(),
            size: extra.size(),
            content_hash: hasher::content_hash(extra.headers(), extra.body()),
        }
    }

    /// Whether this summary still describes `message`: same content and
    /// the same store flags as when it was captured.
    pub fn is_current_for(&self, message: &dyn Message) -> bool {
        self.flags == message.flags()
            && self.size == message.size()
            && self.content_hash == hasher::content_hash(message.headers(), message.body())
    }

    pub fn encode_line(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// A message carrying its own precomputed [`Summary`].
///
/// Flags and size are answered from the summary. Summaries coming from a
/// summary file should go through [`SummaryIndex::take`], which only hands
/// out summaries that still match the message.
#[derive(Debug, Clone)]
pub struct Summarized<M> {
    message: M,
    summary: Summary,
}

impl<M: Message> Summarized<M> {
    /// Compute the summary once from the message's headers.
    pub fn new(message: M, rules: &SubjectRules) -> Self {
        let summary = Summary::capture(&MessageExtraWrapper::with_rules(&message, rules));
        Self { message, summary }
    }

    /// Attach a summary loaded from a summary file.
    pub fn with_summary(message: M, summary: Summary) -> Self {
        Self { message, summary }
    }

    pub fn summary(&self) -> &Summary {
        &self.summary
    }

    pub fn inner(&self) -> &M {
        &self.message
    }

}

impl<M: Message> Message for Summarized<M> {
    fn headers(&self) -> &[Header] {
        self.message.headers()
    }

    fn body(&self) -> &[u8] {
        self.message.body()
    }

    fn flags(&self) -> FlagSet {
        self.summary.flags
    }

    fn size(&self) -> usize {
        self.summary.size
    }

    fn as_extra(&self) -> Option<&dyn MessageExtra> {
        Some(self)
    }
}

impl<M: Message> MessageExtra for Summarized<M> {
    fn author(&self) -> String {
        self.summary.author.clone()
    }

    fn recipients(&self) -> Vec<String> {
        self.summary.recipients.clone()
    }

    fn simplified_subject(&self) -> String {
        self.summary.subject.clone()
    }

    fn subject_is_reply(&self) -> bool {
        self.summary.is_reply
    }

    fn message_id(&self) -> Option<String> {
        self.summary.message_id.clone()
    }

    fn message_id_hash(&self) -> Option<String> {
        self.summary.message_id_hash.clone()
    }

    fn references(&self) -> Vec<String> {
        self.summary.references.clone()
    }

    fn sent_date(&self) -> Option<DateTime<Utc>> {
        self.summary.sent_date
    }
}

/// Summaries keyed by Message-ID hash, for matching against loaded messages.
#[derive(Debug, Default)]
pub struct SummaryIndex {
    by_hash: HashMap<String, Summary>,
}

impl SummaryIndex {
    pub fn new(summaries: impl IntoIterator<Item = Summary>) -> Self {
        let by_hash = summaries
            .into_iter()
            .filter_map(|s| Some((s.message_id_hash.clone()?, s)))
            .collect();
        Self { by_hash }
    }

    pub fn len(&self) -> usize {
        self.by_hash.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_hash.is_empty()
    }

    /// Remove and return the summary recorded for `message`, if it is still
    /// current. A stale summary is dropped so the caller recomputes it.
    pub fn take(&mut self, message: &dyn Message) -> Option<Summary> {
        let hash = extra::get(message).message_id_hash()?;
        let summary = self.by_hash.remove(&hash)?;
        if summary.is_current_for(message) {
            Some(summary)
        } else {
            tracing::debug!(
                "Discarding stale summary for {}",
                summary.message_id.as_deref().unwrap_or("?")
            );
            None
        }
    }
}

/// Write summaries to `path`, one JSON object per line.
pub async fn write_summaries(path: &Path, summaries: &[Summary]) -> Result<()> {
    let mut out = String::new();
    for summary in summaries {
        out.push_str(&summary.encode_line()?);
        out.push('\n');
    }
    tokio::fs::write(path, out).await?;
    tracing::info!("Wrote {} summaries to {}", summaries.len(), path.display());
    Ok(())
}

/// Read a summary file written by [`write_summaries`]. Blank lines are skipped.
pub async fn read_summaries(path: &Path) -> Result<Vec<Summary>> {
    let text = tokio::fs::read_to_string(path).await?;
    let mut summaries = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let summary = serde_json::from_str(line).map_err(|source| Error::Summary {
            line: idx + 1,
            source,
        })?;
        summaries.push(summary);
    }
    tracing::debug!("Read {} summaries from {}", summaries.len(), path.display());
    Ok(summaries)
}
