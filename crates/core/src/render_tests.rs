use super::*;
use review_bot_developer_platforms::models::ReviewRequest;
use std::collections::BTreeMap;
use std::io::Write;
use tempfile::NamedTempFile;

fn project(avatar_url: Option<&str>) -> Project {
    Project {
        name: "review-bot".to_string(),
        web_url: "https://gitlab.com/sj14/review-bot".to_string(),
        avatar_url: avatar_url.map(str::to_string),
    }
}

fn reminder(title: &str, missing: &[&str], discussions: usize, reactions: &[(&str, usize)]) -> Reminder {
    Reminder {
        request: ReviewRequest {
            id: 1,
            title: title.to_string(),
            url: format!("https://gitlab.com/sj14/review-bot/-/merge_requests/{}", title),
            ..Default::default()
        },
        missing_reviewers: missing.iter().map(|m| m.to_string()).collect(),
        open_discussions: discussions,
        responsible_person: "@owner".to_string(),
        reactions: reactions
            .iter()
            .map(|(name, count)| (name.to_string(), *count))
            .collect::<BTreeMap<_, _>>(),
    }
}

#[test]
fn test_default_gitlab_message() {
    let template = MessageTemplate::default_for(Platform::GitLab);
    let reminders = vec![
        reminder("1", &["@john", "@max"], 2, &[("thumbsup", 1), ("tada", 2)]),
        reminder("2", &[], 0, &[]),
    ];

    let message = template.render(&project(Some("https://gitlab.com/avatar.png")), &reminders);

    let expected = "# ![](https://gitlab.com/avatar.png =40x) [review-bot](https://gitlab.com/sj14/review-bot)\n\
        \n\
        **How-To**: *Got reminded? Just normally review the given merge request with 👍/👎 or use 😴 if you don't want to receive a reminder about this merge request.*\n\
        \n\
        ---\n\
        \n\
        **[1](https://gitlab.com/sj14/review-bot/-/merge_requests/1)**\n\
        2 💬 2 :tada: 1 :thumbsup: @john @max\n\
        \n\
        **[2](https://gitlab.com/sj14/review-bot/-/merge_requests/2)**\n\
        You got all reviews, @owner.\n";
    assert_eq!(message, expected);
}

#[test]
fn test_default_github_header() {
    let template = MessageTemplate::default_for(Platform::GitHub);

    let message = template.render(&project(Some("https://avatars/1")), &[]);

    assert_eq!(
        message,
        "# [review-bot](https://gitlab.com/sj14/review-bot)\n\n\
         **How-To**: *Got reminded? Just normally review the given pull request.*\n\n\
         ---\n\n"
    );
}

#[test]
fn test_missing_avatar_is_left_out() {
    let template = MessageTemplate {
        header: "{project_avatar}{project}".to_string(),
        reminder: String::new(),
        all_reviewed: String::new(),
    };

    assert_eq!(template.render(&project(None), &[]), "review-bot");
    assert_eq!(template.render(&project(Some("")), &[]), "review-bot");
}

#[test]
fn test_no_discussion_marker_without_discussions() {
    let template = MessageTemplate {
        header: String::new(),
        reminder: "[{discussions}]".to_string(),
        all_reviewed: String::new(),
    };

    assert_eq!(template.render(&project(None), &[reminder("1", &[], 0, &[])]), "[]");
    assert_eq!(
        template.render(&project(None), &[reminder("1", &[], 3, &[])]),
        "[3 💬 ]"
    );
}

#[test]
fn test_colon_wrapped_reaction_names_are_not_wrapped_again() {
    let template = MessageTemplate {
        header: String::new(),
        reminder: "{reactions}".to_string(),
        all_reviewed: String::new(),
    };

    let message = template.render(
        &project(None),
        &[reminder("1", &[], 0, &[(":thumbsup:", 1), ("thumbsup", 2)])],
    );

    assert_eq!(message, "1 :thumbsup: 2 :thumbsup: ");
}

#[test]
fn test_substituted_values_are_not_expanded_again() {
    let template = MessageTemplate {
        header: String::new(),
        reminder: "{title} {missing}".to_string(),
        all_reviewed: "{owner}".to_string(),
    };

    let message = template.render(&project(None), &[reminder("fix {owner} and {url}", &["@a"], 0, &[])]);

    assert_eq!(message, "fix {owner} and {url} @a");
}

#[test]
fn test_all_reviewed_uses_reminder_values() {
    let template = MessageTemplate {
        header: String::new(),
        reminder: "{missing}".to_string(),
        all_reviewed: "{title} is ready, {owner}".to_string(),
    };

    let message = template.render(&project(None), &[reminder("Feature", &[], 0, &[])]);

    assert_eq!(message, "Feature is ready, @owner");
}

#[test]
fn test_default_templates_are_valid() {
    assert!(MessageTemplate::default_for(Platform::GitLab).validate().is_ok());
    assert!(MessageTemplate::default_for(Platform::GitHub).validate().is_ok());
}

#[test]
fn test_unknown_placeholders_are_rejected() {
    let reminder_in_header = MessageTemplate {
        header: "{title}".to_string(),
        ..MessageTemplate::default_for(Platform::GitLab)
    };
    assert!(matches!(
        reminder_in_header.validate(),
        Err(ReviewBotError::TemplateError(_))
    ));

    let missing_in_all_reviewed = MessageTemplate {
        all_reviewed: "{missing}".to_string(),
        ..MessageTemplate::default_for(Platform::GitLab)
    };
    assert!(missing_in_all_reviewed.validate().is_err());

    let typo = MessageTemplate {
        reminder: "{tittle}".to_string(),
        ..MessageTemplate::default_for(Platform::GitLab)
    };
    let err = typo.validate().unwrap_err();
    assert!(err.to_string().contains("{tittle}"));
}

#[test]
fn test_from_toml_keeps_defaults_for_missing_parts() {
    let template = MessageTemplate::from_toml(
        r#"reminder = "- {title} {missing}""#,
        Platform::GitHub,
    )
    .unwrap();
    let defaults = MessageTemplate::default_for(Platform::GitHub);

    assert_eq!(template.header, defaults.header);
    assert_eq!(template.reminder, "- {title} {missing}");
    assert_eq!(template.all_reviewed, defaults.all_reviewed);
}

#[test]
fn test_from_toml_rejects_unknown_parts() {
    let result = MessageTemplate::from_toml(r#"footer = "bye""#, Platform::GitLab);
    assert!(matches!(result, Err(ReviewBotError::TemplateError(_))));
}

#[test]
fn test_from_toml_rejects_invalid_toml() {
    let result = MessageTemplate::from_toml("header = ", Platform::GitLab);
    assert!(matches!(result, Err(ReviewBotError::TemplateError(_))));
}

#[test]
fn test_load_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "header = \"## {{project}}\\n\"").unwrap();
    writeln!(file, "all_reviewed = \"Merge it, {{owner}}!\"").unwrap();

    let template = MessageTemplate::load(file.path(), Platform::GitLab).unwrap();

    assert_eq!(template.header, "## {project}\n");
    assert_eq!(template.all_reviewed, "Merge it, {owner}!");
}

#[test]
fn test_load_missing_file() {
    let result = MessageTemplate::load(Path::new("/does/not/exist.toml"), Platform::GitLab);
    assert!(matches!(result, Err(ReviewBotError::TemplateError(_))));
}
