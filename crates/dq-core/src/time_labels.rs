//! Compact multi-line labels for time-axis ticks
//!
//! Each label only repeats the date parts that changed since the previous
//! tick: hourly ticks within a day show just `HH:MM`, the first tick of a new
//! day adds `Mon D`, the first tick of a new year adds the year.

use chrono::{DateTime, Datelike, TimeZone, Timelike};
use serde::Serialize;

/// Ticks closer than this always show their time of day
const TIME_OF_DAY_GAP_MS: i64 = 24 * 60 * 60 * 1000;

/// One or two text lines rendered under a tick
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TickLabel {
    Single(String),
    Double(String, String),
}

impl TickLabel {
    pub fn lines(&self) -> Vec<&str> {
        match self {
            Self::Single(line) => vec![line.as_str()],
            Self::Double(first, second) => vec![first.as_str(), second.as_str()],
        }
    }

    pub fn line_count(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::Double(..) => 2,
        }
    }
}

impl std::fmt::Display for TickLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Single(line) => write!(f, "{}", line),
            Self::Double(first, second) => write!(f, "{} {}", first, second),
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct Parts {
    year: bool,
    month: bool,
    day: bool,
    time: bool,
}

/// Build a label per tick, omitting date parts shared with the previous tick
pub fn format_smart_time_ticks<Tz: TimeZone>(ticks: &[DateTime<Tz>]) -> Vec<TickLabel>
where
    Tz::Offset: std::fmt::Display,
{
    ticks
        .iter()
        .enumerate()
        .map(|(i, tick)| {
            let parts = if i == 0 {
                first_tick_parts(tick, ticks.get(1))
            } else {
                following_tick_parts(&ticks[i - 1], tick)
            };
            assemble(tick, parts)
        })
        .collect()
}

fn first_tick_parts<Tz: TimeZone>(tick: &DateTime<Tz>, next: Option<&DateTime<Tz>>) -> Parts {
    let next_is_close = next.is_some_and(|n| gap_ms(tick, n) < TIME_OF_DAY_GAP_MS);
    Parts {
        year: true,
        month: true,
        day: true,
        time: next_is_close || !is_midnight(tick),
    }
}

fn following_tick_parts<Tz: TimeZone>(prev: &DateTime<Tz>, tick: &DateTime<Tz>) -> Parts {
    let mut parts = Parts::default();

    if tick.year() != prev.year() {
        parts.year = true;
        parts.month = true;
        parts.day = true;
    } else if tick.month() != prev.month() {
        parts.month = true;
        parts.day = true;
    } else if tick.day() != prev.day() {
        parts.day = true;
        parts.month = true;
    }

    parts.time = gap_ms(prev, tick) < TIME_OF_DAY_GAP_MS || !is_midnight(tick);
    parts
}

fn assemble<Tz: TimeZone>(tick: &DateTime<Tz>, parts: Parts) -> TickLabel
where
    Tz::Offset: std::fmt::Display,
{
    let time = parts.time.then(|| tick.format("%H:%M").to_string());
    let month_day = (parts.month || parts.day).then(|| tick.format("%b %-d").to_string());
    let year = parts.year.then(|| tick.year().to_string());

    let (line1, mut line2) = match (time, month_day) {
        (Some(time), Some(month_day)) => (time, month_day),
        (Some(time), None) => (time, String::new()),
        (None, Some(month_day)) => (month_day, String::new()),
        (None, None) => (String::new(), String::new()),
    };

    if let Some(year) = year {
        if line2.is_empty() {
            line2 = year;
        } else {
            line2 = format!("{}, {}", line2, year);
        }
    }

    if line2.is_empty() {
        TickLabel::Single(line1)
    } else {
        TickLabel::Double(line1, line2)
    }
}

fn gap_ms<Tz: TimeZone>(a: &DateTime<Tz>, b: &DateTime<Tz>) -> i64 {
    (b.timestamp_millis() - a.timestamp_millis()).abs()
}

fn is_midnight<Tz: TimeZone>(tick: &DateTime<Tz>) -> bool {
    tick.hour() == 0 && tick.minute() == 0 && tick.second() == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn single(s: &str) -> TickLabel {
        TickLabel::Single(s.to_string())
    }

    fn double(a: &str, b: &str) -> TickLabel {
        TickLabel::Double(a.to_string(), b.to_string())
    }

    #[test]
    fn test_empty() {
        assert!(format_smart_time_ticks::<Utc>(&[]).is_empty());
    }

    #[test]
    fn test_hourly_ticks_within_a_day() {
        let ticks: Vec<_> = (0..=24).step_by(8).map(|h| at(2024, 1, 1, 0) + chrono::Duration::hours(h)).collect();
        let labels = format_smart_time_ticks(&ticks);
        assert_eq!(
            labels,
            vec![
                double("00:00", "Jan 1, 2024"),
                single("08:00"),
                single("16:00"),
                double("00:00", "Jan 2"),
            ]
        );
    }

    #[test]
    fn test_daily_ticks_omit_time() {
        let ticks = vec![at(2024, 2, 27, 0), at(2024, 2, 28, 0), at(2024, 2, 29, 0), at(2024, 3, 1, 0)];
        let labels = format_smart_time_ticks(&ticks);
        assert_eq!(
            labels,
            vec![
                double("Feb 27", "2024"),
                single("Feb 28"),
                single("Feb 29"),
                single("Mar 1"),
            ]
        );
    }

    #[test]
    fn test_year_boundary_adds_year() {
        let ticks = vec![at(2023, 7, 1, 0), at(2024, 1, 1, 0), at(2024, 7, 1, 0)];
        let labels = format_smart_time_ticks(&ticks);
        assert_eq!(
            labels,
            vec![double("Jul 1", "2023"), double("Jan 1", "2024"), single("Jul 1")]
        );
    }

    #[test]
    fn test_non_midnight_daily_ticks_show_time() {
        let ticks = vec![at(2024, 5, 1, 12), at(2024, 5, 2, 12)];
        let labels = format_smart_time_ticks(&ticks);
        assert_eq!(labels, vec![double("12:00", "May 1, 2024"), double("12:00", "May 2")]);
    }

    #[test]
    fn test_single_tick() {
        let labels = format_smart_time_ticks(&[at(2024, 9, 9, 0)]);
        assert_eq!(labels, vec![double("Sep 9", "2024")]);
    }

    #[test]
    fn test_consecutive_labels_differ() {
        let start = at(2023, 12, 30, 0);
        for step_hours in [1, 4, 8, 24, 24 * 7] {
            let ticks: Vec<_> = (0..12)
                .map(|i| start + chrono::Duration::hours(i * step_hours))
                .collect();
            let labels = format_smart_time_ticks(&ticks);
            for pair in labels.windows(2) {
                assert_ne!(pair[0], pair[1], "step {step_hours}h");
            }
        }
    }

    #[test]
    fn test_serializes_as_string_or_pair() {
        let json = serde_json::to_string(&vec![single("08:00"), double("Jan 1", "2024")]).unwrap();
        assert_eq!(json, r#"["08:00",["Jan 1","2024"]]"#);
    }
}
