//! # Messages
//!
//! Contains constant strings and format functions for user-facing messages and notices.

pub const REROLL_EMPTY: &str = "try rolling something first";
pub const TIMESTAMP_SHRUG: &str = ":shrug: are you sure about that?";

pub const ROLL_INVALID: &str = "does not compute :slight_frown:";
pub const ROLL_EXCESSIVE: &str = "take it easy! :hushed:";
pub const ROLL_TIMEOUT: &str = "I don't have enough dice for that! :pensive:";
pub const ROLL_INTERNAL: &str =
    "awkward, something has gone wrong. The error has been logged for investigation.";
/// Appended when a roll breakdown is cut short.
pub const ROLL_TRUNCATED: &str = " ... I ... can't ... :boom:";

pub fn with_comment(result: &str, comment: &str) -> String {
    if comment.is_empty() {
        result.to_string()
    } else {
        format!("{result} ({comment})")
    }
}

pub fn lore_day(day: &str) -> String {
    format!("It is **{day}**")
}

pub fn lore_month(month: &str) -> String {
    format!("It is **{month}**")
}

pub fn lore_date(date: &str) -> String {
    format!("It is {date}")
}

pub fn lore_months(listing: &str) -> String {
    format!("Here you go!\n{listing}")
}

// Notices mirrored to the log channel.
pub const LOGGED_IN: &str = "Client logged in";

pub fn client_error(err: &str) -> String {
    format!("Client error: {err}")
}

pub fn invited(name: Option<&str>, id: &str) -> String {
    format!("Added to room **{}** ({id})", name.unwrap_or("unnamed"))
}

pub fn join_failed(id: &str, err: &str) -> String {
    format!("Failed to join room {id}: {err}")
}

pub fn log_notice(is_error: bool, msg: &str) -> String {
    let icon = if is_error { ":red_square:" } else { ":blue_square:" };
    format!("{icon} {msg}")
}
