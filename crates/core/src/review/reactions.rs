//! # Reaction Tally
//!
//! Counts the reactions a request received, whether or not they acknowledge
//! it.

use std::collections::BTreeMap;

use review_bot_developer_platforms::models::AcknowledgmentSignal;

#[cfg(test)]
#[path = "reactions_tests.rs"]
mod tests;

/// Tallies the reaction signals by reaction name.
///
/// Review signals are ignored. The map is ordered by name so the rendered
/// tally is stable.
///
/// # Examples
///
/// ```
/// use review_bot_core::review::reactions::aggregate_reactions;
/// use review_bot_developer_platforms::models::{AcknowledgmentSignal, User};
///
/// let signals = vec![
///     AcknowledgmentSignal::Reaction { name: "thumbsup".to_string(), user: User::default() },
///     AcknowledgmentSignal::Reaction { name: "thumbsup".to_string(), user: User::default() },
///     AcknowledgmentSignal::Reaction { name: "tada".to_string(), user: User::default() },
/// ];
///
/// let tally = aggregate_reactions(&signals);
/// assert_eq!(tally.get("thumbsup"), Some(&2));
/// assert_eq!(tally.get("tada"), Some(&1));
/// ```
pub fn aggregate_reactions(signals: &[AcknowledgmentSignal]) -> BTreeMap<String, usize> {
    let mut tally = BTreeMap::new();

    for signal in signals {
        if let AcknowledgmentSignal::Reaction { name, .. } = signal {
            *tally.entry(name.clone()).or_insert(0) += 1;
        }
    }

    tally
}
