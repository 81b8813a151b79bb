//! # Message Rendering
//!
//! Turns the reminders of one project into the Markdown message posted to
//! chat.
//!
//! A [`MessageTemplate`] has three parts:
//! - `header`: printed once, may use `{project}`, `{project_url}` and
//!   `{project_avatar}`
//! - `reminder`: printed once per reminder, may additionally use `{title}`,
//!   `{url}`, `{discussions}`, `{reactions}`, `{missing}` and `{owner}`
//! - `all_reviewed`: replaces `{missing}` when nobody is missing, may use the
//!   same placeholders as `reminder` except `{missing}`
//!
//! Templates are loaded from TOML. Every part is optional in the file and
//! falls back to the platform default:
//!
//! ```toml
//! all_reviewed = "Ready to merge, {owner}!"
//! ```

use std::fs;
use std::path::Path;

use indoc::{formatdoc, indoc};
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use review_bot_developer_platforms::models::{Platform, Project};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::ReviewBotError;
use crate::Reminder;

#[cfg(test)]
#[path = "render_tests.rs"]
mod tests;

lazy_static! {
    /// Matches a `{name}` placeholder and captures the name
    pub static ref PLACEHOLDER_REGEX: Regex =
        Regex::new(r"\{([A-Za-z0-9_]*)\}").expect("Failed to compile placeholder regex");
}

const HEADER_PLACEHOLDERS: &[&str] = &["project", "project_url", "project_avatar"];

const REMINDER_PLACEHOLDERS: &[&str] = &[
    "project",
    "project_url",
    "project_avatar",
    "title",
    "url",
    "discussions",
    "reactions",
    "missing",
    "owner",
];

const ALL_REVIEWED_PLACEHOLDERS: &[&str] = &[
    "project",
    "project_url",
    "project_avatar",
    "title",
    "url",
    "discussions",
    "reactions",
    "owner",
];

const GITLAB_HOW_TO: &str = "Got reminded? Just normally review the given merge request with 👍/👎 or use 😴 if you don't want to receive a reminder about this merge request.";

const GITHUB_HOW_TO: &str = "Got reminded? Just normally review the given pull request.";

/// The layout of a reminder message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageTemplate {
    /// Printed once at the top of the message
    pub header: String,

    /// Printed once per reminder
    pub reminder: String,

    /// Printed in place of `{missing}` when every reviewer has responded
    pub all_reviewed: String,
}

/// The template parts a file may override.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct TemplateOverrides {
    header: Option<String>,
    reminder: Option<String>,
    all_reviewed: Option<String>,
}

impl MessageTemplate {
    /// The default Markdown layout for `platform`.
    pub fn default_for(platform: Platform) -> Self {
        let (title_prefix, how_to) = match platform {
            Platform::GitLab => ("{project_avatar}", GITLAB_HOW_TO),
            Platform::GitHub => ("", GITHUB_HOW_TO),
        };

        let header = formatdoc!(
            "
            # {title_prefix}[{{project}}]({{project_url}})

            **How-To**: *{how_to}*

            ---

            ",
            title_prefix = title_prefix,
            how_to = how_to
        );

        let reminder = indoc!(
            "
            **[{title}]({url})**
            {discussions}{reactions}{missing}
            "
        );

        Self {
            header,
            reminder: reminder.to_string(),
            all_reviewed: "You got all reviews, {owner}.".to_string(),
        }
    }

    /// Parses a TOML template, filling the parts it leaves out from the
    /// default for `platform`.
    ///
    /// # Errors
    ///
    /// `TemplateError` when the TOML is malformed, names an unknown part, or
    /// uses a placeholder the part does not support.
    ///
    /// # Examples
    ///
    /// ```
    /// use review_bot_core::render::MessageTemplate;
    /// use review_bot_developer_platforms::models::Platform;
    ///
    /// let template = MessageTemplate::from_toml(
    ///     r#"all_reviewed = "Merge it, {owner}!""#,
    ///     Platform::GitLab,
    /// ).unwrap();
    /// assert_eq!(template.all_reviewed, "Merge it, {owner}!");
    ///
    /// assert!(MessageTemplate::from_toml(r#"header = "{nope}""#, Platform::GitLab).is_err());
    /// ```
    pub fn from_toml(content: &str, platform: Platform) -> Result<Self, ReviewBotError> {
        let overrides: TemplateOverrides = toml::from_str(content).map_err(|e| {
            ReviewBotError::TemplateError(format!("Failed to parse template: {}", e))
        })?;

        let defaults = Self::default_for(platform);
        let template = Self {
            header: overrides.header.unwrap_or(defaults.header),
            reminder: overrides.reminder.unwrap_or(defaults.reminder),
            all_reviewed: overrides.all_reviewed.unwrap_or(defaults.all_reviewed),
        };

        template.validate()?;
        Ok(template)
    }

    /// Loads a TOML template file.
    pub fn load(path: &Path, platform: Platform) -> Result<Self, ReviewBotError> {
        debug!("Loading template from {:?}", path);

        let content = fs::read_to_string(path).map_err(|e| {
            ReviewBotError::TemplateError(format!(
                "Failed to read template file {:?}: {}",
                path, e
            ))
        })?;

        Self::from_toml(&content, platform)
    }

    /// Checks that every part only uses the placeholders it supports.
    pub fn validate(&self) -> Result<(), ReviewBotError> {
        check_placeholders("header", &self.header, HEADER_PLACEHOLDERS)?;
        check_placeholders("reminder", &self.reminder, REMINDER_PLACEHOLDERS)?;
        check_placeholders("all_reviewed", &self.all_reviewed, ALL_REVIEWED_PLACEHOLDERS)
    }

    /// Renders the full message for `project`.
    ///
    /// The header is followed by the reminders, separated by blank lines, in
    /// the order given.
    pub fn render(&self, project: &Project, reminders: &[Reminder]) -> String {
        let mut message = substitute(&self.header, |name| project_value(project, name));

        let rendered: Vec<String> = reminders
            .iter()
            .map(|r| self.render_reminder(project, r))
            .collect();
        message.push_str(&rendered.join("\n"));

        message
    }

    fn render_reminder(&self, project: &Project, reminder: &Reminder) -> String {
        let value = |name: &str| match name {
            "title" => Some(reminder.request.title.clone()),
            "url" => Some(reminder.request.url.clone()),
            "owner" => Some(reminder.responsible_person.clone()),
            "discussions" => Some(discussions_fragment(reminder.open_discussions)),
            "reactions" => Some(reactions_fragment(reminder)),
            _ => project_value(project, name),
        };

        let missing = if reminder.missing_reviewers.is_empty() {
            substitute(&self.all_reviewed, value)
        } else {
            reminder.missing_reviewers.join(" ")
        };

        substitute(&self.reminder, |name| match name {
            "missing" => Some(missing.clone()),
            other => value(other),
        })
    }
}

fn check_placeholders(part: &str, text: &str, allowed: &[&str]) -> Result<(), ReviewBotError> {
    for caps in PLACEHOLDER_REGEX.captures_iter(text) {
        let name = &caps[1];
        if !allowed.contains(&name) {
            return Err(ReviewBotError::TemplateError(format!(
                "Unknown placeholder '{{{}}}' in {}",
                name, part
            )));
        }
    }

    Ok(())
}

/// Replaces every placeholder in one pass, so substituted values are never
/// expanded again. Placeholders without a value are left as they are.
fn substitute<F>(text: &str, value: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    PLACEHOLDER_REGEX
        .replace_all(text, |caps: &Captures| {
            value(&caps[1]).unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

fn project_value(project: &Project, name: &str) -> Option<String> {
    match name {
        "project" => Some(project.name.clone()),
        "project_url" => Some(project.web_url.clone()),
        "project_avatar" => Some(match project.avatar_url.as_deref() {
            Some(url) if !url.is_empty() => format!("![]({} =40x) ", url),
            _ => String::new(),
        }),
        _ => None,
    }
}

fn discussions_fragment(open_discussions: usize) -> String {
    if open_discussions == 0 {
        String::new()
    } else {
        format!("{} 💬 ", open_discussions)
    }
}

fn reactions_fragment(reminder: &Reminder) -> String {
    reminder
        .reactions
        .iter()
        .map(|(name, count)| format!("{} {} ", count, emoji_code(name)))
        .collect()
}

/// Wraps a reaction name in colons unless it already carries them.
fn emoji_code(name: &str) -> String {
    if name.len() > 1 && name.starts_with(':') && name.ends_with(':') {
        name.to_string()
    } else {
        format!(":{}:", name)
    }
}
