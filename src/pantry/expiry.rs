use std::fmt;

use serde::Serialize;
use time::{macros::format_description, Date};

/// Accepts `YYYY-MM-DD` and the `YYYY/MM/DD` form the add-item screen asks for.
pub fn parse_expiry(raw: &str) -> Option<Date> {
    let raw = raw.trim();
    Date::parse(raw, format_description!("[year]-[month]-[day]"))
        .or_else(|_| Date::parse(raw, format_description!("[year]/[month]/[day]")))
        .ok()
}

/// Rewrites recognizable dates into the dashed form the backend parses.
/// Anything else is passed through untouched.
pub fn normalize_expiry(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let normalized = parse_expiry(trimmed)
        .and_then(|date| date.format(format_description!("[year]-[month]-[day]")).ok())
        .unwrap_or_else(|| trimmed.to_string());
    Some(normalized)
}

#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ExpiryStatus {
    Expired { days_ago: i64 },
    ExpiresSoon { days: i64 },
    Fresh { days: i64 },
    Unknown,
}

pub fn classify(expiry: Option<&str>, today: Date, soon_days: i64) -> ExpiryStatus {
    let Some(date) = expiry.and_then(parse_expiry) else {
        return ExpiryStatus::Unknown;
    };
    let days = (date - today).whole_days();
    if days < 0 {
        ExpiryStatus::Expired { days_ago: -days }
    } else if days <= soon_days {
        ExpiryStatus::ExpiresSoon { days }
    } else {
        ExpiryStatus::Fresh { days }
    }
}

fn plural(n: i64) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

impl fmt::Display for ExpiryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Expired { days_ago } => {
                write!(f, "expired {days_ago} day{} ago", plural(days_ago))
            }
            Self::ExpiresSoon { days: 0 } => f.write_str("expires today"),
            Self::ExpiresSoon { days } => write!(f, "expires in {days} day{}", plural(days)),
            Self::Fresh { days } => write!(f, "good for {days} day{}", plural(days)),
            Self::Unknown => f.write_str("no expiry"),
        }
    }
}
