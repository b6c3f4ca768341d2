//! Calendar helpers: week windows and "time ago" buckets.
//!
//! # Invariants
//! - Weeks are Monday-anchored; weekday numbering is ISO (Mon=1..Sun=7).
//! - Both helpers are pure given an explicit "now".

use crate::model::day::DayInfo;
use chrono::{Datelike, Duration, NaiveDate};

pub const WEEKDAY_LABELS: [&str; 7] = ["MON", "TUE", "WED", "THU", "FRI", "SAT", "SUN"];

const MINUTE_MS: i64 = 60 * 1000;
const HOUR_MS: i64 = 60 * MINUTE_MS;
const DAY_MS: i64 = 24 * HOUR_MS;

/// Returns the Monday of the week `offset` whole weeks away from `today`'s.
pub fn week_start(today: NaiveDate, offset: i64) -> NaiveDate {
    let iso_weekday = i64::from(today.weekday().number_from_monday());
    today - Duration::days(iso_weekday - 1) + Duration::weeks(offset)
}

/// Returns the seven dates of the week `offset` weeks from `today`'s.
pub fn week_range(today: NaiveDate, offset: i64) -> [NaiveDate; 7] {
    let monday = week_start(today, offset);
    std::array::from_fn(|index| monday + Duration::days(index as i64))
}

/// Builds empty `DayInfo` records for the week `offset` weeks from `today`'s.
pub fn week_days(today: NaiveDate, offset: i64) -> Vec<DayInfo> {
    week_range(today, offset)
        .iter()
        .zip(WEEKDAY_LABELS)
        .map(|(date, weekday)| {
            DayInfo::empty(
                date.day(),
                weekday,
                format!("{}/{}", date.month(), date.day()),
            )
        })
        .collect()
}

/// Discrete buckets describing how long ago something last happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeAgo {
    Never,
    Minutes(i64),
    Hours(i64),
    Today,
    Days(i64),
}

impl TimeAgo {
    pub fn label(self) -> String {
        match self {
            Self::Never => "never".to_string(),
            Self::Minutes(minutes) => format!("{minutes} min ago"),
            Self::Hours(hours) => format!("{hours} h ago"),
            Self::Today => "today".to_string(),
            Self::Days(1) => "1 day ago".to_string(),
            Self::Days(days) => format!("{days} days ago"),
        }
    }
}

/// Buckets `timestamp` (epoch ms) relative to `now_ms`.
///
/// Timestamps in the future (clock skew) fall into `Today`.
pub fn time_ago(timestamp: Option<i64>, now_ms: i64) -> TimeAgo {
    let Some(timestamp) = timestamp else {
        return TimeAgo::Never;
    };
    let diff = now_ms - timestamp;
    if diff < 0 {
        return TimeAgo::Today;
    }
    if diff < HOUR_MS {
        return TimeAgo::Minutes(diff / MINUTE_MS);
    }
    if diff < DAY_MS {
        return TimeAgo::Hours(diff / HOUR_MS);
    }
    TimeAgo::Days(diff / DAY_MS)
}

#[cfg(test)]
mod tests {
    use super::{time_ago, week_days, week_range, week_start, TimeAgo};
    use chrono::{Datelike, NaiveDate, Weekday};

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn week_is_monday_anchored_for_every_weekday() {
        let monday = date(2026, 1, 12);
        for offset in 0..7 {
            let today = monday + chrono::Duration::days(offset);
            assert_eq!(week_start(today, 0), monday, "weekday offset {offset}");
        }
    }

    #[test]
    fn week_range_applies_whole_week_offsets_across_months() {
        let sunday = date(2026, 2, 1);
        let next = week_range(sunday, 1);
        assert_eq!(next[0], date(2026, 2, 2));
        assert_eq!(next[6].weekday(), Weekday::Sun);

        let previous = week_range(sunday, -1);
        assert_eq!(previous[0], date(2026, 1, 19));
    }

    #[test]
    fn week_days_carry_labels() {
        let days = week_days(date(2026, 1, 14), 0);
        assert_eq!(days.len(), 7);
        assert_eq!(days[0].date, 12);
        assert_eq!(days[0].weekday, "MON");
        assert_eq!(days[6].full_date, "1/18");
        assert!(days.iter().all(|day| day.tasks.is_empty()));
    }

    #[test]
    fn time_ago_buckets() {
        let now = 10 * 24 * 3_600_000;
        assert_eq!(time_ago(None, now), TimeAgo::Never);
        assert_eq!(time_ago(Some(now - 5 * 60_000), now), TimeAgo::Minutes(5));
        assert_eq!(time_ago(Some(now - 3 * 3_600_000), now), TimeAgo::Hours(3));
        assert_eq!(time_ago(Some(now + 1_000), now), TimeAgo::Today);
        assert_eq!(time_ago(Some(now - 2 * 24 * 3_600_000), now), TimeAgo::Days(2));
        assert_eq!(TimeAgo::Days(1).label(), "1 day ago");
    }
}
