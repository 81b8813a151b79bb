//! # Acknowledgments
//!
//! Collects the identities that have already handled a request.
//!
//! On GitLab a reviewer acknowledges a merge request with an award emoji
//! (see [`ACKNOWLEDGING_REACTIONS`]). On GitHub a reviewer acknowledges a pull
//! request by approving it, or by having a review dismissed. A GitHub review
//! counts whether or not the reviewer is still listed as requested; GitHub
//! drops reviewers from that list once they submit, so restricting it would
//! ignore almost every real review.

use review_bot_developer_platforms::models::{AcknowledgmentSignal, ReviewRequest, ReviewState};
use tracing::trace;

use crate::config::{AcknowledgmentPolicy, IdentityKey, ACKNOWLEDGING_REACTIONS};

#[cfg(test)]
#[path = "acknowledgment_tests.rs"]
mod tests;

/// Whether `signal` acknowledges a request under `policy`.
pub fn is_acknowledgment(signal: &AcknowledgmentSignal, policy: AcknowledgmentPolicy) -> bool {
    match (policy, signal) {
        (AcknowledgmentPolicy::ReactionBased, AcknowledgmentSignal::Reaction { name, .. }) => {
            ACKNOWLEDGING_REACTIONS.contains(&name.as_str())
        }
        (AcknowledgmentPolicy::ReviewStateBased, AcknowledgmentSignal::Review { state, .. }) => {
            matches!(state, ReviewState::Approved | ReviewState::Dismissed)
        }
        _ => false,
    }
}

/// Returns the registry keys of everybody who handled `request`.
///
/// The author always counts as having handled their own request and comes
/// first. The acknowledging users follow in the order the signals were
/// received, each key listed once.
///
/// # Examples
///
/// ```
/// use review_bot_core::config::{AcknowledgmentPolicy, IdentityKey};
/// use review_bot_core::review::acknowledgment::acknowledged_identities;
/// use review_bot_developer_platforms::models::{AcknowledgmentSignal, ReviewRequest, User};
///
/// let request = ReviewRequest {
///     author: User { id: 1, ..Default::default() },
///     ..Default::default()
/// };
/// let signals = vec![
///     AcknowledgmentSignal::Reaction { name: "thumbsup".to_string(), user: User { id: 2, ..Default::default() } },
///     AcknowledgmentSignal::Reaction { name: "tada".to_string(), user: User { id: 3, ..Default::default() } },
/// ];
///
/// let acknowledged = acknowledged_identities(
///     &request,
///     &signals,
///     AcknowledgmentPolicy::ReactionBased,
///     IdentityKey::UserId,
/// );
/// assert_eq!(acknowledged, vec!["1".to_string(), "2".to_string()]);
/// ```
pub fn acknowledged_identities(
    request: &ReviewRequest,
    signals: &[AcknowledgmentSignal],
    policy: AcknowledgmentPolicy,
    identity_key: IdentityKey,
) -> Vec<String> {
    let mut acknowledged: Vec<String> = Vec::new();

    let candidates = std::iter::once(&request.author).chain(
        signals
            .iter()
            .filter(|s| is_acknowledgment(s, policy))
            .map(AcknowledgmentSignal::user),
    );

    for user in candidates {
        if let Some(key) = identity_key.key_for(user) {
            if !acknowledged.contains(&key) {
                trace!(request = request.id, identity = key, "Acknowledged");
                acknowledged.push(key);
            }
        }
    }

    acknowledged
}
