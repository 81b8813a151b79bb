//! # Missing Reviewers
//!
//! Works out who still has to look at a request.

use review_bot_developer_platforms::models::User;

use crate::config::IdentityKey;
use crate::registry::ReviewerRegistry;

#[cfg(test)]
#[path = "missing_tests.rs"]
mod tests;

/// Every registered reviewer who has not acknowledged the request.
///
/// The registry is the full set of expected reviewers, so every request asks
/// for a reaction from everyone in it.
///
/// # Examples
///
/// ```
/// use review_bot_core::registry::ReviewerRegistry;
/// use review_bot_core::review::missing::missing_from_registry;
///
/// let registry: ReviewerRegistry = [("3", "@john"), ("5", "@max")].into_iter().collect();
/// let missing = missing_from_registry(&["3".to_string()], &registry);
/// assert_eq!(missing, vec!["@max".to_string()]);
/// ```
pub fn missing_from_registry(acknowledged: &[String], registry: &ReviewerRegistry) -> Vec<String> {
    registry
        .iter()
        .filter(|(key, _)| !acknowledged.iter().any(|a| a.as_str() == *key))
        .map(|(_, name)| name.to_string())
        .collect()
}

/// Every explicitly requested reviewer who has not acknowledged the request.
///
/// Registered reviewers are listed under their chat name unless they have
/// acknowledged. Reviewers without a registry entry are always listed, under
/// their platform login. A reviewer requested twice is listed once.
pub fn missing_requested_reviewers(
    requested: &[User],
    acknowledged: &[String],
    registry: &ReviewerRegistry,
    identity_key: IdentityKey,
) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    let mut missing = Vec::new();

    for reviewer in requested {
        let key = identity_key.key_for(reviewer);
        let seen_as = key.clone().unwrap_or_else(|| reviewer.username.clone());
        if seen.contains(&seen_as) {
            continue;
        }
        seen.push(seen_as);

        match key.as_deref().and_then(|k| registry.get(k).map(|name| (k, name))) {
            Some((k, name)) => {
                if !acknowledged.iter().any(|a| a.as_str() == k) {
                    missing.push(name.to_string());
                }
            }
            None => missing.push(reviewer.username.clone()),
        }
    }

    missing
}
