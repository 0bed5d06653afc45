//! Tracker reference detection and inline link rewriting.
//!
//! Recognizes Phabricator-style object references in free-form chat text:
//! tasks (`T123`), revisions (`D123`), files (`F123`), pastes (`P123`) and
//! commit hashes with an optional `rB` callsign prefix. Link-only and commit
//! references are rewritten into markdown links before a message is sent;
//! embeddable task/revision references stay as plain text so they can be
//! enriched with rich previews after send.

pub mod matcher;
pub mod rewrite;

pub use {
    matcher::{RefClass, RefKind, Reference},
    rewrite::rewrite_refs,
};
