use std::sync::LazyLock;

use crate::config::ExtraConfig;

static STANDARD: LazyLock<SubjectRules> = LazyLock::new(SubjectRules::default);

/// Prefixes stripped from subjects when simplifying them.
///
/// A prefix matches case-insensitively, may carry a reply counter
/// (`Re[2]:`, `Re(3):`) and must be followed by a colon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectRules {
    reply_prefixes: Vec<String>,
    forward_prefixes: Vec<String>,
}

/// Result of simplifying one subject line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Simplified<'s> {
    pub subject: &'s str,
    pub is_reply: bool,
}

impl Default for SubjectRules {
    fn default() -> Self {
        Self::new(["Re"], ["Fwd", "Fw"])
    }
}

impl SubjectRules {
    pub fn new<R, F>(reply_prefixes: R, forward_prefixes: F) -> Self
    where
        R: IntoIterator,
        R::Item: Into<String>,
        F: IntoIterator,
        F::Item: Into<String>,
    {
        fn clean(items: impl IntoIterator<Item = String>) -> Vec<String> {
            items
                .into_iter()
                .map(|p| p.trim().trim_end_matches(':').to_string())
                .filter(|p| !p.is_empty())
                .collect()
        }

        Self {
            reply_prefixes: clean(reply_prefixes.into_iter().map(Into::into)),
            forward_prefixes: clean(forward_prefixes.into_iter().map(Into::into)),
        }
    }

    pub fn from_config(config: &ExtraConfig) -> Self {
        Self::new(
            config.reply_prefixes.iter().cloned(),
            config.forward_prefixes.iter().cloned(),
        )
    }

    /// Shared rules used when no configuration is supplied.
    pub fn standard() -> &'static SubjectRules {
        &STANDARD
    }

    pub fn simplify<'s>(&self, subject: &'s str) -> Simplified<'s> {
        let mut rest = subject.trim();
        let mut is_reply = false;

        loop {
            if let Some(after) = strip_any(rest, &self.reply_prefixes) {
                is_reply = true;
                rest = after.trim_start();
            } else if let Some(after) = strip_any(rest, &self.forward_prefixes) {
                rest = after.trim_start();
            } else {
                break;
            }
        }

        Simplified {
            subject: rest.trim_end(),
            is_reply,
        }
    }
}

fn strip_any<'s>(subject: &'s str, prefixes: &[String]) -> Option<&'s str> {
    prefixes.iter().find_map(|p| strip_prefix(subject, p))
}

/// Strip `prefix`, an optional `[n]`/`(n)` counter and the colon.
fn strip_prefix<'s>(subject: &'s str, prefix: &str) -> Option<&'s str> {
    let head = subject.get(..prefix.len())?;
    if !head.eq_ignore_ascii_case(prefix) {
        return None;
    }

    let mut rest = &subject[prefix.len()..];
    for (open, close) in [('[', ']'), ('(', ')')] {
        if let Some(inner) = rest.strip_prefix(open) {
            let end = inner.find(close)?;
            let counter = &inner[..end];
            if counter.is_empty() || !counter.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            rest = &inner[end + 1..];
            break;
        }
    }

    rest.trim_start_matches(' ').strip_prefix(':')
}
