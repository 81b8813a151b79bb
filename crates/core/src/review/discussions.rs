//! # Open Discussions
//!
//! Counts the discussion threads that still need attention.

use review_bot_developer_platforms::models::Discussion;

use crate::config::AcknowledgmentPolicy;

#[cfg(test)]
#[path = "discussions_tests.rs"]
mod tests;

/// Counts the unresolved notes across all `discussions`.
///
/// Every resolvable note that is not resolved counts once. A thread with
/// several unresolved replies therefore counts several times.
///
/// # Examples
///
/// ```
/// use review_bot_core::review::discussions::count_open_discussions;
/// use review_bot_developer_platforms::models::{Discussion, Note};
///
/// let open = Note { resolvable: true, resolved: false };
/// let done = Note { resolvable: true, resolved: true };
/// let discussions = vec![
///     Discussion { id: "a".to_string(), notes: vec![open.clone(), open.clone()] },
///     Discussion { id: "b".to_string(), notes: vec![open, done] },
/// ];
/// assert_eq!(count_open_discussions(&discussions), 3);
/// ```
pub fn count_open_discussions(discussions: &[Discussion]) -> usize {
    discussions
        .iter()
        .flat_map(|d| d.notes.iter())
        .filter(|n| n.resolvable && !n.resolved)
        .count()
}

/// Counts every note across all `discussions`, resolvable or not.
pub fn count_comments(discussions: &[Discussion]) -> usize {
    discussions.iter().map(|d| d.notes.len()).sum()
}

/// Counts the discussions of a request the way its platform supports.
///
/// GitHub conversations on a pull request cannot be resolved through the
/// issue API, so for review-state based platforms every comment counts.
pub fn count_discussions(policy: AcknowledgmentPolicy, discussions: &[Discussion]) -> usize {
    match policy {
        AcknowledgmentPolicy::ReactionBased => count_open_discussions(discussions),
        AcknowledgmentPolicy::ReviewStateBased => count_comments(discussions),
    }
}
