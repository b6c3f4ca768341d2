//! Hour-grid slot helpers (`HH:00`).

use once_cell::sync::Lazy;
use regex::Regex;

static HOUR_SLOT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([01]\d|2[0-3]):00$").expect("valid hour slot regex"));

/// Last hour accepted on the day grid.
pub const MAX_HOUR: u32 = 23;

/// Formats `hour` as a zero-padded `HH:00` slot. Returns `None` past 23.
pub fn hour_slot(hour: u32) -> Option<String> {
    (hour <= MAX_HOUR).then(|| format!("{hour:02}:00"))
}

/// Returns whether `value` is a well-formed slot.
pub fn is_hour_slot(value: &str) -> bool {
    HOUR_SLOT_RE.is_match(value)
}

/// Parses an `HH:00` slot back to its hour.
pub fn parse_hour_slot(value: &str) -> Option<u32> {
    HOUR_SLOT_RE
        .captures(value)
        .and_then(|caps| caps.get(1))
        .and_then(|hour| hour.as_str().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::{hour_slot, is_hour_slot, parse_hour_slot};

    #[test]
    fn hour_slot_pads_and_bounds() {
        assert_eq!(hour_slot(7).as_deref(), Some("07:00"));
        assert_eq!(hour_slot(23).as_deref(), Some("23:00"));
        assert_eq!(hour_slot(24), None);
    }

    #[test]
    fn parse_round_trips_valid_slots_only() {
        assert_eq!(parse_hour_slot("00:00"), Some(0));
        assert_eq!(parse_hour_slot("18:00"), Some(18));
        assert_eq!(parse_hour_slot("24:00"), None);
        assert!(!is_hour_slot("08:30"));
    }
}
