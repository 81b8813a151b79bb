//! # Responsible Person
//!
//! Works out whom the "you got all reviews" note is addressed to.

use review_bot_developer_platforms::models::{ReviewRequest, User};

use crate::config::IdentityKey;
use crate::registry::ReviewerRegistry;

#[cfg(test)]
#[path = "identity_tests.rs"]
mod tests;

/// Returns the chat name of the person responsible for `request`.
///
/// The assignee wins when it is set and registered, then the registered
/// author. Without any registry match the author's platform name is used,
/// so the function never fails.
///
/// # Examples
///
/// ```
/// use review_bot_core::config::IdentityKey;
/// use review_bot_core::registry::ReviewerRegistry;
/// use review_bot_core::review::identity::resolve_responsible;
/// use review_bot_developer_platforms::models::{ReviewRequest, User};
///
/// let request = ReviewRequest {
///     author: User { id: 5, username: "author".to_string(), name: "Author".to_string() },
///     ..Default::default()
/// };
/// let registry: ReviewerRegistry = [("5", "@author-of-mr")].into_iter().collect();
///
/// assert_eq!(resolve_responsible(&request, &registry, IdentityKey::UserId), "@author-of-mr");
/// assert_eq!(resolve_responsible(&request, &registry, IdentityKey::Username), "Author");
/// ```
pub fn resolve_responsible(
    request: &ReviewRequest,
    registry: &ReviewerRegistry,
    identity_key: IdentityKey,
) -> String {
    let registered = |user: &User| {
        identity_key
            .key_for(user)
            .and_then(|key| registry.get(&key).map(str::to_string))
    };

    if let Some(name) = request.assignee.as_ref().and_then(registered) {
        return name;
    }

    if let Some(name) = registered(&request.author) {
        return name;
    }

    request.author.display_label().to_string()
}
