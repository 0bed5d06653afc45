//! Regex-backed scanning for tracker object references.
//!
//! Three reference classes are scanned independently over raw message text.
//! All patterns are case-sensitive and word-bounded on both sides, so
//! `xT123`, `T123x` and `t123` are never references.

use std::{ops::Range, sync::LazyLock};

use {
    regex::{Captures, Regex},
    serde::{Deserialize, Serialize},
};

/// Files and pastes: `F`/`P` followed by at least two digits.
static LINK_ONLY: LazyLock<Regex> = LazyLock::new(|| compile(r"\b[FP][0-9]{2,}\b"));

/// Tasks and revisions: `T`/`D` followed by at least one digit.
static EMBEDDABLE: LazyLock<Regex> = LazyLock::new(|| compile(r"\b([TD])([0-9]+)\b"));

/// Commit hashes: 11 to 40 lowercase hex chars, optional `rB` callsign.
static COMMIT: LazyLock<Regex> = LazyLock::new(|| compile(r"\b(rB)?([a-f0-9]{11,40})\b"));

pub(crate) fn compile(pattern: &str) -> Regex {
    Regex::new(pattern)
        .unwrap_or_else(|err| panic!("invalid reference pattern `{pattern}`: {err}"))
}

/// The kind of tracker object a recognized reference denotes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RefKind {
    /// File or paste. Inline-linked only, never preview-enriched.
    LinkOnly,
    /// Maniphest task.
    Task,
    /// Differential revision.
    Revision,
    /// Version-control commit hash.
    Commit,
}

/// One scannable class of references.
///
/// Classes partition the reference grammar by how matches are consumed:
/// link-only and commit matches are rewritten in place before send,
/// embeddable matches are resolved into previews after send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefClass {
    /// `F`/`P` with two or more digits.
    LinkOnly,
    /// `T`/`D` with one or more digits.
    Embeddable,
    /// Bare or `rB`-prefixed commit hash.
    Commit,
}

/// A recognized span of message text denoting a tracker object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub kind: RefKind,
    /// Exact matched substring, `rB` prefix included when present.
    pub raw: String,
    /// Extracted identifier: the digits for `T`/`D`/`F`/`P`, the bare hex
    /// hash for commits.
    pub id: String,
    /// Byte range of `raw` in the scanned text.
    pub span: Range<usize>,
}

impl Reference {
    /// Canonical object name, used for display and per-pass deduplication.
    ///
    /// Leading zeros are dropped from numeric ids so `T01` and `T1` name
    /// the same object.
    pub fn canonical_name(&self) -> String {
        match self.kind {
            RefKind::Task => format!("T{}", trim_leading_zeros(&self.id)),
            RefKind::Revision => format!("D{}", trim_leading_zeros(&self.id)),
            RefKind::Commit => format!("rB{}", self.id),
            RefKind::LinkOnly => self.raw.clone(),
        }
    }
}

fn trim_leading_zeros(digits: &str) -> &str {
    let trimmed = digits.trim_start_matches('0');
    if trimmed.is_empty() { "0" } else { trimmed }
}

impl RefClass {
    fn regex(self) -> &'static Regex {
        match self {
            Self::LinkOnly => &LINK_ONLY,
            Self::Embeddable => &EMBEDDABLE,
            Self::Commit => &COMMIT,
        }
    }

    /// Whether `text` contains at least one reference of this class.
    pub fn is_match(self, text: &str) -> bool {
        self.regex().is_match(text)
    }

    /// Every reference of this class in `text`, in scan order.
    ///
    /// Repeated mentions of the same object are all returned, each with
    /// its own span; deduplication happens at resolution time.
    pub fn find_all(self, text: &str) -> Vec<Reference> {
        match self {
            Self::LinkOnly => LINK_ONLY
                .find_iter(text)
                .map(|found| Reference {
                    kind: RefKind::LinkOnly,
                    raw: found.as_str().to_string(),
                    id: found.as_str()[1..].to_string(),
                    span: found.range(),
                })
                .collect(),
            Self::Embeddable => EMBEDDABLE
                .captures_iter(text)
                .filter_map(embeddable_reference)
                .collect(),
            Self::Commit => COMMIT
                .captures_iter(text)
                .filter_map(commit_reference)
                .collect(),
        }
    }
}

fn embeddable_reference(caps: Captures<'_>) -> Option<Reference> {
    let whole = caps.get(0)?;
    let kind = match caps.get(1)?.as_str() {
        "T" => RefKind::Task,
        _ => RefKind::Revision,
    };
    Some(Reference {
        kind,
        raw: whole.as_str().to_string(),
        id: caps.get(2)?.as_str().to_string(),
        span: whole.range(),
    })
}

fn commit_reference(caps: Captures<'_>) -> Option<Reference> {
    let whole = caps.get(0)?;
    Some(Reference {
        kind: RefKind::Commit,
        raw: whole.as_str().to_string(),
        id: caps.get(2)?.as_str().to_string(),
        span: whole.range(),
    })
}
