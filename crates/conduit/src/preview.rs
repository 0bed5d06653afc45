//! Normalized object previews, ready to publish as message attachments.

use {phablink_refs::RefKind, serde::Serialize};

use crate::client::{RevisionFields, TaskInfo};

/// A resolved tracker object.
///
/// Previews live for a single enrichment pass; at most one preview per
/// distinct `object_name` is attached to a given message.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Preview {
    /// Canonical identifier, e.g. `T1234` or `D56`.
    pub object_name: String,
    pub title: String,
    /// Task description or revision summary; empty when the tracker has none.
    pub description: String,
    /// Canonical link to the object on the tracker.
    pub uri: String,
    pub kind: RefKind,
}

impl Preview {
    /// Build a task preview straight from the `maniphest.info` payload.
    pub fn for_task(info: TaskInfo) -> Self {
        Self {
            object_name: info.object_name,
            title: info.title,
            description: info.description.unwrap_or_default(),
            uri: info.uri,
            kind: RefKind::Task,
        }
    }

    /// Build a revision preview. The link is synthesized from the numeric
    /// id because the search endpoint does not return one.
    pub fn for_revision(fields: RevisionFields, base: &str) -> Self {
        Self {
            object_name: format!("D{}", fields.id),
            title: fields.title,
            description: fields.summary.unwrap_or_default(),
            uri: format!("{base}/D{}", fields.id),
            kind: RefKind::Revision,
        }
    }
}
