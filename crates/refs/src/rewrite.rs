//! Inline markdown link rewriting for link-only and commit references.

use std::{ops::Range, sync::LazyLock};

use regex::Regex;

use crate::matcher::{RefClass, Reference, compile};

/// Existing `[label](url)` markdown links; matches inside them are skipped.
static MARKDOWN_LINK: LazyLock<Regex> = LazyLock::new(|| compile(r"\[[^\]]*\]\([^)]*\)"));

/// Rewrite link-only (`F`/`P`) and commit references in `text` into
/// markdown links against `server_url`.
///
/// Runs two passes: link-only references first, commit references second.
/// Embeddable task/revision references are left untouched; they get rich
/// previews after send instead of an inline link. Candidates overlapping an
/// existing markdown link are skipped, so rewriting already-rewritten text
/// is a no-op. An unset server yields an empty base rather than a failure.
pub fn rewrite_refs(text: &str, server_url: &str) -> String {
    let base = server_url.trim_end_matches('/');
    let linked = replace_refs(text, RefClass::LinkOnly, |reference| {
        format!("[{}]({base}/{})", reference.raw, reference.raw)
    });
    replace_refs(&linked, RefClass::Commit, |reference| {
        format!("[{}]({base}/rB{})", reference.raw, reference.id)
    })
}

/// Replace every match of `class` in `text` using `link_for`, copying the
/// segments between matches verbatim.
fn replace_refs(text: &str, class: RefClass, link_for: impl Fn(&Reference) -> String) -> String {
    let taken = link_spans(text);
    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;
    for reference in class.find_all(text) {
        if overlaps(&taken, &reference.span) {
            continue;
        }
        out.push_str(&text[cursor..reference.span.start]);
        out.push_str(&link_for(&reference));
        cursor = reference.span.end;
    }
    out.push_str(&text[cursor..]);
    out
}

fn link_spans(text: &str) -> Vec<Range<usize>> {
    MARKDOWN_LINK.find_iter(text).map(|found| found.range()).collect()
}

fn overlaps(spans: &[Range<usize>], candidate: &Range<usize>) -> bool {
    spans
        .iter()
        .any(|span| candidate.start < span.end && span.start < candidate.end)
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    const SERVER: &str = "https://phab.example.org";

    #[test]
    fn rewrites_link_only_references() {
        let out = rewrite_refs("see F99 and P1234", SERVER);
        assert_eq!(
            out,
            "see [F99](https://phab.example.org/F99) and [P1234](https://phab.example.org/P1234)"
        );
    }

    #[test]
    fn rewrites_prefixed_commit_without_doubling_the_callsign() {
        let out = rewrite_refs("deploy rBdeadbeef11223", SERVER);
        assert_eq!(
            out,
            "deploy [rBdeadbeef11223](https://phab.example.org/rBdeadbeef11223)"
        );
    }

    #[test]
    fn rewrites_bare_commit_with_callsign_target() {
        let out = rewrite_refs("deploy deadbeef11223", SERVER);
        assert_eq!(
            out,
            "deploy [deadbeef11223](https://phab.example.org/rBdeadbeef11223)"
        );
    }

    #[test]
    fn leaves_task_and_revision_references_alone() {
        let out = rewrite_refs("T1234 relates to D56 and F99", SERVER);
        assert_eq!(out, "T1234 relates to D56 and [F99](https://phab.example.org/F99)");
    }

    #[test]
    fn trims_trailing_slash_from_base() {
        let out = rewrite_refs("F99", "https://phab.example.org/");
        assert_eq!(out, "[F99](https://phab.example.org/F99)");
    }

    #[test]
    fn empty_base_still_rewrites() {
        let out = rewrite_refs("F99", "");
        assert_eq!(out, "[F99](/F99)");
    }

    #[rstest]
    #[case("nothing to do here")]
    #[case("see F99 and P1234")]
    #[case("deploy rBdeadbeef11223 and deadbeef11223")]
    #[case("mixed: F99, T12, abcdef0123456789")]
    fn rewriting_twice_equals_rewriting_once(#[case] text: &str) {
        let once = rewrite_refs(text, SERVER);
        let twice = rewrite_refs(&once, SERVER);
        assert_eq!(once, twice);
    }

    #[test]
    fn no_references_returns_input_verbatim() {
        let text = "release notes for tuesday";
        assert_eq!(rewrite_refs(text, SERVER), text);
    }

    #[test]
    fn both_passes_compose_on_one_message() {
        let out = rewrite_refs("F99 fixed by deadbeef11223", SERVER);
        assert_eq!(
            out,
            "[F99](https://phab.example.org/F99) fixed by \
             [deadbeef11223](https://phab.example.org/rBdeadbeef11223)"
        );
    }
}
