//! Resolution of embeddable references into previews.

use std::collections::HashSet;

use {
    phablink_refs::{RefKind, Reference},
    tracing::warn,
};

use crate::{
    client::ConduitClient,
    error::{Error, Result},
    preview::Preview,
};

/// Resolve every embeddable reference in `refs` into a preview.
///
/// References are processed in scan order and deduplicated by canonical
/// object name, so each distinct object is looked up exactly once and the
/// returned previews preserve first-occurrence order. A failed lookup is
/// logged and contributes no preview; it neither aborts the rest nor is
/// retried at later occurrences. Non-embeddable kinds are ignored.
pub async fn resolve_references(client: &ConduitClient, refs: &[Reference]) -> Vec<Preview> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut previews = Vec::new();

    for reference in refs {
        if !matches!(reference.kind, RefKind::Task | RefKind::Revision) {
            continue;
        }
        if !seen.insert(reference.canonical_name()) {
            continue;
        }
        let outcome = if reference.kind == RefKind::Task {
            task_preview(client, reference).await
        } else {
            revision_preview(client, reference).await
        };
        match outcome {
            Ok(preview) => previews.push(preview),
            Err(error) => {
                warn!(reference = %reference.raw, error = %error, "reference resolution failed");
            },
        }
    }

    previews
}

async fn task_preview(client: &ConduitClient, reference: &Reference) -> Result<Preview> {
    let info = client.task_info(numeric_id(reference)?).await?;
    Ok(Preview::for_task(info))
}

async fn revision_preview(client: &ConduitClient, reference: &Reference) -> Result<Preview> {
    let fields = client.search_revision(numeric_id(reference)?).await?;
    Ok(Preview::for_revision(fields, client.base()))
}

fn numeric_id(reference: &Reference) -> Result<u64> {
    reference.id.parse().map_err(|_| Error::InvalidId {
        id: reference.id.clone(),
    })
}
