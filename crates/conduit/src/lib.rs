//! Phabricator Conduit API client and reference resolution.
//!
//! Embeddable references found by `phablink-refs` are resolved one Conduit
//! call at a time (`maniphest.info` for tasks, `differential.revision.search`
//! for revisions) into normalized [`Preview`] records, deduplicated by
//! canonical object name and ordered by first occurrence in the message.

pub mod client;
pub mod config;
pub mod error;
pub mod preview;
pub mod resolve;

pub use {
    client::ConduitClient,
    config::TrackerConfig,
    error::{Error, Result},
    preview::Preview,
    resolve::resolve_references,
};
