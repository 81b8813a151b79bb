use super::*;
use proptest::prelude::*;

fn registry() -> ReviewerRegistry {
    [("1", "@user1"), ("2", "@user2"), ("3", "@user3"), ("4", "@user4")]
        .into_iter()
        .collect()
}

fn login(login: &str) -> User {
    User {
        id: 0,
        username: login.to_string(),
        name: String::new(),
    }
}

fn keys(keys: &[&str]) -> Vec<String> {
    keys.iter().map(|k| k.to_string()).collect()
}

#[test]
fn test_missing_from_registry() {
    let missing = missing_from_registry(&keys(&["1", "3"]), &registry());
    assert_eq!(missing, vec!["@user2", "@user4"]);
}

#[test]
fn test_nobody_missing_when_everyone_acknowledged() {
    let missing = missing_from_registry(&keys(&["4", "3", "2", "1"]), &registry());
    assert!(missing.is_empty());
}

#[test]
fn test_unregistered_acknowledgments_are_ignored() {
    let missing = missing_from_registry(&keys(&["99", "1"]), &registry());
    assert_eq!(missing, vec!["@user2", "@user3", "@user4"]);
}

#[test]
fn test_empty_registry_has_nobody_missing() {
    let missing = missing_from_registry(&keys(&["1"]), &ReviewerRegistry::default());
    assert!(missing.is_empty());
}

#[test]
fn test_missing_requested_reviewers() {
    let registry: ReviewerRegistry = [("reviewer0", "@r0"), ("reviewer1", "@r1")]
        .into_iter()
        .collect();
    let requested = vec![login("reviewer0"), login("reviewer1"), login("reviewer2")];

    let missing = missing_requested_reviewers(
        &requested,
        &keys(&["owner", "reviewer1"]),
        &registry,
        IdentityKey::Username,
    );
    assert_eq!(missing, vec!["@r0", "reviewer2"]);
}

#[test]
fn test_unregistered_reviewer_is_listed_even_after_acknowledging() {
    let registry: ReviewerRegistry = [("someone", "@someone")].into_iter().collect();
    let requested = vec![login("ghost")];

    let missing = missing_requested_reviewers(
        &requested,
        &keys(&["author", "ghost"]),
        &registry,
        IdentityKey::Username,
    );
    assert_eq!(missing, vec!["ghost"]);
}

#[test]
fn test_no_requested_reviewers() {
    let missing = missing_requested_reviewers(
        &[],
        &keys(&["owner"]),
        &registry(),
        IdentityKey::Username,
    );
    assert!(missing.is_empty());
}

#[test]
fn test_duplicate_requested_reviewers_are_listed_once() {
    let requested = vec![login("reviewer0"), login("reviewer0")];

    let missing = missing_requested_reviewers(
        &requested,
        &[],
        &ReviewerRegistry::default(),
        IdentityKey::Username,
    );
    assert_eq!(missing, vec!["reviewer0"]);
}

#[test]
fn test_reviewers_sharing_a_chat_name_are_both_listed() {
    let registry: ReviewerRegistry = [("alice", "@team"), ("bob", "@team")]
        .into_iter()
        .collect();
    let requested = vec![login("alice"), login("bob")];

    let missing = missing_requested_reviewers(
        &requested,
        &keys(&["owner"]),
        &registry,
        IdentityKey::Username,
    );
    assert_eq!(missing, vec!["@team", "@team"]);
}

proptest! {
    #[test]
    fn test_missing_from_registry_ignores_acknowledgment_order(
        mut acknowledged in proptest::collection::vec("[0-9]", 0..8)
    ) {
        let registry: ReviewerRegistry = (0..10).map(|i| (i.to_string(), format!("@u{}", i))).collect();

        let first = missing_from_registry(&acknowledged, &registry);
        acknowledged.reverse();
        let second = missing_from_registry(&acknowledged, &registry);

        prop_assert_eq!(&first, &second);
        for name in &first {
            let key = name.trim_start_matches("@u");
            prop_assert!(!acknowledged.iter().any(|a| a == key));
        }
    }
}
