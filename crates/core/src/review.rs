//! # Review State
//!
//! The building blocks of a reminder. Each submodule answers one question
//! about a single request:
//! - `identity`: who is responsible for the request
//! - `acknowledgment`: who has already handled it
//! - `missing`: who still has to handle it
//! - `discussions`: how many discussions are still open
//! - `reactions`: which reactions it received, and how often
//!
//! `ReviewBot` combines them into one `Reminder` per request.

pub mod acknowledgment;
pub mod discussions;
pub mod identity;
pub mod missing;
pub mod reactions;
