/// Configuration management commands
pub mod config_cmd;
/// Reminder collection and delivery
pub mod remind;
