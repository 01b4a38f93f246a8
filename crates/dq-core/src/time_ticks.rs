//! Adaptive, calendar-aware tick generation for time axes
//!
//! A granularity is picked from a fixed catalogue (hour … year) so the tick
//! count stays inside a `[min_ticks, max_ticks]` window. Month-based
//! granularities step by calendar months; everything else steps by a fixed
//! duration.

use chrono::{DateTime, Datelike, Duration, Local, Months, NaiveDate, NaiveDateTime, TimeZone};
use serde::{Deserialize, Serialize};

pub const HOUR_MS: i64 = 3_600_000;
pub const DAY_MS: i64 = 24 * HOUR_MS;
pub const WEEK_MS: i64 = 7 * DAY_MS;

/// Upper bound on generated ticks, guards against runaway loops on bad input
const MAX_GENERATED_TICKS: usize = 10_000;

/// Anything that can be placed on a time axis
pub trait AsEpochMillis {
    fn epoch_millis(&self) -> i64;
}

impl AsEpochMillis for i64 {
    fn epoch_millis(&self) -> i64 {
        *self
    }
}

impl AsEpochMillis for f64 {
    fn epoch_millis(&self) -> i64 {
        self.round() as i64
    }
}

impl<Tz: TimeZone> AsEpochMillis for DateTime<Tz> {
    fn epoch_millis(&self) -> i64 {
        self.timestamp_millis()
    }
}

// ============================================================================
// GRANULARITY CATALOGUE
// ============================================================================

/// How a granularity advances from one tick to the next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GranularityStep {
    /// Fixed duration in milliseconds
    Fixed(i64),
    /// Whole calendar months
    Months(u32),
}

/// Time-axis tick granularity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TimeGranularity {
    Hour,
    FourHours,
    EightHours,
    Day,
    Week,
    Month,
    Quarter,
    HalfYear,
    Year,
}

impl TimeGranularity {
    /// All granularities, finest first
    pub const CATALOGUE: [TimeGranularity; 9] = [
        Self::Hour,
        Self::FourHours,
        Self::EightHours,
        Self::Day,
        Self::Week,
        Self::Month,
        Self::Quarter,
        Self::HalfYear,
        Self::Year,
    ];

    pub fn step(&self) -> GranularityStep {
        match self {
            Self::Hour => GranularityStep::Fixed(HOUR_MS),
            Self::FourHours => GranularityStep::Fixed(4 * HOUR_MS),
            Self::EightHours => GranularityStep::Fixed(8 * HOUR_MS),
            Self::Day => GranularityStep::Fixed(DAY_MS),
            Self::Week => GranularityStep::Fixed(WEEK_MS),
            Self::Month => GranularityStep::Months(1),
            Self::Quarter => GranularityStep::Months(3),
            Self::HalfYear => GranularityStep::Months(6),
            Self::Year => GranularityStep::Months(12),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Hour => "1h",
            Self::FourHours => "4h",
            Self::EightHours => "8h",
            Self::Day => "1d",
            Self::Week => "1w",
            Self::Month => "1mo",
            Self::Quarter => "3mo",
            Self::HalfYear => "6mo",
            Self::Year => "1y",
        }
    }

    fn index(&self) -> usize {
        Self::CATALOGUE
            .iter()
            .position(|g| g == self)
            .unwrap_or_default()
    }

    /// Next finer catalogue entry
    pub fn finer(&self) -> Option<Self> {
        self.index().checked_sub(1).map(|i| Self::CATALOGUE[i])
    }

    /// Next coarser catalogue entry
    pub fn coarser(&self) -> Option<Self> {
        Self::CATALOGUE.get(self.index() + 1).copied()
    }
}

// ============================================================================
// TICK PLANNING
// ============================================================================

/// Generated tick positions (epoch milliseconds) and the granularity used.
/// `granularity` is `None` when the millisecond fallback produced the ticks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeTicks {
    pub granularity: Option<TimeGranularity>,
    pub ticks: Vec<i64>,
}

impl TimeTicks {
    fn empty() -> Self {
        Self {
            granularity: None,
            ticks: Vec::new(),
        }
    }
}

/// Adaptive ticks in the browser's local timezone
pub fn adaptive_time_ticks<T: AsEpochMillis>(
    dates: &[T],
    min_ticks: usize,
    max_ticks: usize,
) -> Vec<DateTime<Local>> {
    adaptive_time_ticks_in(dates, min_ticks, max_ticks, &Local)
}

/// Adaptive ticks with calendar alignment in `tz`
pub fn adaptive_time_ticks_in<T: AsEpochMillis, Tz: TimeZone>(
    dates: &[T],
    min_ticks: usize,
    max_ticks: usize,
    tz: &Tz,
) -> Vec<DateTime<Tz>> {
    let millis: Vec<i64> = dates.iter().map(AsEpochMillis::epoch_millis).collect();
    plan_time_ticks(&millis, min_ticks, max_ticks, tz)
        .ticks
        .into_iter()
        .filter_map(|ms| tz.timestamp_millis_opt(ms).single())
        .collect()
}

/// Pick a granularity for `dates` and generate its ticks
pub fn plan_time_ticks<Tz: TimeZone>(
    dates: &[i64],
    min_ticks: usize,
    max_ticks: usize,
    tz: &Tz,
) -> TimeTicks {
    let (Some(&min_time), Some(&max_time)) = (dates.iter().min(), dates.iter().max()) else {
        return TimeTicks::empty();
    };

    let selected = TimeGranularity::CATALOGUE
        .iter()
        .copied()
        .find(|g| estimate_tick_count(*g, min_time, max_time, tz) <= max_ticks);

    let Some(mut granularity) = selected else {
        tracing::debug!(
            range_ms = max_time - min_time,
            max_ticks,
            "no calendar granularity fits, using millisecond step"
        );
        return TimeTicks {
            granularity: None,
            ticks: millisecond_ticks(min_time, max_time, max_ticks),
        };
    };

    let mut ticks = generate_ticks(granularity, min_time, max_time, tz);
    while ticks.len() < min_ticks {
        let Some(finer) = granularity.finer() else {
            break;
        };
        granularity = finer;
        ticks = generate_ticks(granularity, min_time, max_time, tz);
    }

    // Snapping the first tick down plus the trailing tick can overshoot the
    // estimate by one.
    while ticks.len() > max_ticks {
        let coarser = granularity
            .coarser()
            .map(|g| (g, generate_ticks(g, min_time, max_time, tz)))
            .filter(|(_, coarse)| coarse.len() >= min_ticks);
        match coarser {
            Some((g, coarse)) => {
                granularity = g;
                ticks = coarse;
            }
            None => {
                if ticks.last().is_some_and(|t| *t > max_time) {
                    ticks.pop();
                }
                break;
            }
        }
    }

    tracing::trace!(granularity = granularity.label(), count = ticks.len(), "time ticks");

    TimeTicks {
        granularity: Some(granularity),
        ticks,
    }
}

/// Expected tick count for `granularity` over `[min_time, max_time]`
pub fn estimate_tick_count<Tz: TimeZone>(
    granularity: TimeGranularity,
    min_time: i64,
    max_time: i64,
    tz: &Tz,
) -> usize {
    match granularity.step() {
        GranularityStep::Fixed(step) => {
            let range = (max_time - min_time).max(0);
            (range as f64 / step as f64).ceil() as usize + 1
        }
        GranularityStep::Months(step) => {
            let months = months_between(min_time, max_time, tz).max(0);
            (months as f64 / step as f64).ceil() as usize + 2
        }
    }
}

fn months_between<Tz: TimeZone>(min_time: i64, max_time: i64, tz: &Tz) -> i64 {
    match (naive_local(min_time, tz), naive_local(max_time, tz)) {
        (Some(start), Some(end)) => {
            (end.year() - start.year()) as i64 * 12 + end.month() as i64 - start.month() as i64
        }
        _ => 0,
    }
}

fn generate_ticks<Tz: TimeZone>(
    granularity: TimeGranularity,
    min_time: i64,
    max_time: i64,
    tz: &Tz,
) -> Vec<i64> {
    match granularity.step() {
        GranularityStep::Fixed(step) => fixed_ticks(min_time, max_time, step, tz),
        GranularityStep::Months(step) => month_ticks(min_time, max_time, step, tz),
    }
}

/// Fixed-duration ticks aligned to multiples of `step` in local wall-clock
/// time. Steps of a day or more start at local midnight and advance by
/// calendar days.
fn fixed_ticks<Tz: TimeZone>(min_time: i64, max_time: i64, step: i64, tz: &Tz) -> Vec<i64> {
    let Some(local_min) = naive_local(min_time, tz) else {
        return vec![min_time];
    };

    let local_ms = local_min.and_utc().timestamp_millis();
    let snapped_ms = local_ms.div_euclid(step) * step;
    let Some(mut cursor) = DateTime::from_timestamp_millis(snapped_ms).map(|d| d.naive_utc())
    else {
        return vec![min_time];
    };

    let whole_days = step >= DAY_MS;
    if whole_days {
        cursor = cursor.date().and_time(chrono::NaiveTime::MIN);
    }

    let advance = |current: i64, cursor: &mut NaiveDateTime| -> Option<i64> {
        if whole_days {
            *cursor = cursor.checked_add_signed(Duration::days(step / DAY_MS))?;
            to_millis(cursor, tz)
        } else {
            Some(current + step)
        }
    };

    let Some(start) = to_millis(&cursor, tz) else {
        return vec![min_time];
    };
    collect_ticks(start, max_time, |current| advance(current, &mut cursor))
}

/// Ticks on the first day of every `step`-th month
fn month_ticks<Tz: TimeZone>(min_time: i64, max_time: i64, step: u32, tz: &Tz) -> Vec<i64> {
    let Some(local_min) = naive_local(min_time, tz) else {
        return vec![min_time];
    };

    let month0 = local_min.month0() - local_min.month0() % step;
    let Some(mut cursor) = NaiveDate::from_ymd_opt(local_min.year(), month0 + 1, 1)
        .map(|d| d.and_time(chrono::NaiveTime::MIN))
    else {
        return vec![min_time];
    };

    let Some(start) = to_millis(&cursor, tz) else {
        return vec![min_time];
    };
    collect_ticks(start, max_time, |_| {
        cursor = cursor.checked_add_months(Months::new(step))?;
        to_millis(&cursor, tz)
    })
}

/// Emit ticks from `start` while `<= max_time`; the first tick past
/// `max_time` is kept when it overshoots by at most half a step.
fn collect_ticks(start: i64, max_time: i64, mut next: impl FnMut(i64) -> Option<i64>) -> Vec<i64> {
    let mut ticks = vec![start];
    let mut current = start;

    while ticks.len() < MAX_GENERATED_TICKS {
        let Some(candidate) = next(current).filter(|c| *c > current) else {
            break;
        };
        if candidate > max_time {
            if candidate - max_time <= (candidate - current) / 2 {
                ticks.push(candidate);
            }
            break;
        }
        ticks.push(candidate);
        current = candidate;
    }

    ticks
}

/// Calendar-agnostic fallback: a nice millisecond step between ticks
pub fn millisecond_ticks(min_time: i64, max_time: i64, max_ticks: usize) -> Vec<i64> {
    let range = (max_time - min_time) as f64;
    if range <= 0.0 {
        return vec![min_time];
    }

    let intervals = max_ticks.max(2) - 1;
    let step = nice_step(range / intervals as f64).max(1.0);
    let first = (min_time as f64 / step).floor();
    let last = (max_time as f64 / step).ceil();

    let count = ((last - first) as usize + 1).min(MAX_GENERATED_TICKS);
    (0..count)
        .map(|i| ((first + i as f64) * step).round() as i64)
        .collect()
}

/// `{1, 2, 5} × 10^k` step for a rough millisecond interval; fractions above
/// 5 jump to the next power of ten.
pub fn nice_step(rough: f64) -> f64 {
    let exponent = rough.log10().floor();
    let magnitude = 10.0_f64.powf(exponent);
    let fraction = rough / magnitude;

    if fraction < 1.5 {
        magnitude
    } else if fraction < 3.0 {
        2.0 * magnitude
    } else if fraction <= 5.0 {
        5.0 * magnitude
    } else {
        10.0_f64.powf(exponent + 1.0)
    }
}

fn naive_local<Tz: TimeZone>(millis: i64, tz: &Tz) -> Option<NaiveDateTime> {
    tz.timestamp_millis_opt(millis)
        .single()
        .map(|d| d.naive_local())
}

/// Local wall-clock time to epoch millis. A wall-clock time skipped by a
/// DST transition resolves one hour later.
fn to_millis<Tz: TimeZone>(local: &NaiveDateTime, tz: &Tz) -> Option<i64> {
    tz.from_local_datetime(local)
        .earliest()
        .or_else(|| {
            tz.from_local_datetime(&(*local + Duration::hours(1)))
                .earliest()
        })
        .map(|d| d.timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn ms(y: i32, m: u32, d: u32, h: u32) -> i64 {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap().timestamp_millis()
    }

    #[test]
    fn test_empty_input() {
        let ticks = adaptive_time_ticks_in::<i64, _>(&[], 4, 8, &Utc);
        assert!(ticks.is_empty());
    }

    #[test]
    fn test_catalogue_order() {
        assert_eq!(TimeGranularity::Hour.finer(), None);
        assert_eq!(TimeGranularity::Year.coarser(), None);
        assert_eq!(TimeGranularity::Week.finer(), Some(TimeGranularity::Day));
        assert_eq!(TimeGranularity::Month.coarser(), Some(TimeGranularity::Quarter));
    }

    #[test]
    fn test_estimate_fixed_and_months() {
        let (a, b) = (ms(2024, 1, 1, 0), ms(2024, 1, 2, 0));
        assert_eq!(estimate_tick_count(TimeGranularity::Hour, a, b, &Utc), 25);
        assert_eq!(estimate_tick_count(TimeGranularity::FourHours, a, b, &Utc), 7);
        assert_eq!(estimate_tick_count(TimeGranularity::Month, a, b, &Utc), 2);

        let (a, b) = (ms(2023, 1, 1, 0), ms(2024, 1, 1, 0));
        assert_eq!(estimate_tick_count(TimeGranularity::Month, a, b, &Utc), 14);
        assert_eq!(estimate_tick_count(TimeGranularity::Quarter, a, b, &Utc), 6);
    }

    #[test]
    fn test_single_day_uses_hours() {
        let plan = plan_time_ticks(&[ms(2024, 1, 1, 0), ms(2024, 1, 2, 0)], 4, 8, &Utc);
        assert_eq!(plan.granularity, Some(TimeGranularity::FourHours));
        assert_eq!(plan.ticks.first(), Some(&ms(2024, 1, 1, 0)));
        assert_eq!(plan.ticks.last(), Some(&ms(2024, 1, 2, 0)));
        assert_eq!(plan.ticks.len(), 7);
    }

    #[test]
    fn test_month_ticks_on_first_of_month() {
        let plan = plan_time_ticks(&[ms(2023, 1, 1, 0), ms(2024, 1, 1, 0)], 4, 8, &Utc);
        assert_eq!(plan.granularity, Some(TimeGranularity::Quarter));
        let expected: Vec<i64> = [(2023, 1), (2023, 4), (2023, 7), (2023, 10), (2024, 1)]
            .iter()
            .map(|&(y, m)| ms(y, m, 1, 0))
            .collect();
        assert_eq!(plan.ticks, expected);
    }

    #[test]
    fn test_month_snap_uses_step_multiple() {
        // Mid-May start with a quarterly step snaps back to April 1st.
        let ticks = month_ticks(ms(2023, 5, 17, 9), ms(2023, 12, 1, 0), 3, &Utc);
        assert_eq!(ticks[0], ms(2023, 4, 1, 0));
        assert_eq!(ticks[1], ms(2023, 7, 1, 0));
    }

    #[test]
    fn test_month_steps_handle_uneven_lengths() {
        let ticks = month_ticks(ms(2024, 1, 15, 0), ms(2024, 4, 15, 0), 1, &Utc);
        let expected: Vec<i64> = (1..=4).map(|m| ms(2024, m, 1, 0)).collect();
        assert_eq!(ticks, expected);
    }

    #[test]
    fn test_day_ticks_start_at_midnight() {
        let ticks = fixed_ticks(ms(2024, 3, 3, 15), ms(2024, 3, 6, 2), DAY_MS, &Utc);
        assert_eq!(ticks[0], ms(2024, 3, 3, 0));
        assert!(ticks.iter().all(|t| t % DAY_MS == 0));
    }

    #[test]
    fn test_trailing_tick_within_half_step() {
        // 22:00 is within half of a 4h step from midnight.
        let ticks = fixed_ticks(ms(2024, 1, 1, 0), ms(2024, 1, 1, 22), 4 * HOUR_MS, &Utc);
        assert_eq!(ticks.last(), Some(&ms(2024, 1, 2, 0)));

        // 21:00 is not.
        let ticks = fixed_ticks(ms(2024, 1, 1, 0), ms(2024, 1, 1, 21), 4 * HOUR_MS, &Utc);
        assert_eq!(ticks.last(), Some(&ms(2024, 1, 1, 20)));
    }

    #[test]
    fn test_min_ticks_retries_finer() {
        // January fits "month" under max=3 but only yields two ticks, so the
        // minimum of three forces weekly ticks.
        let plan = plan_time_ticks(&[ms(2024, 1, 1, 0), ms(2024, 1, 31, 0)], 3, 3, &Utc);
        assert_eq!(plan.granularity, Some(TimeGranularity::Week));
        assert!(plan.ticks.len() >= 3);

        let plan = plan_time_ticks(&[ms(2024, 6, 1, 0), ms(2024, 6, 3, 0)], 1, 4, &Utc);
        assert_eq!(plan.granularity, Some(TimeGranularity::Day));
    }

    #[test]
    fn test_unaligned_span_stays_within_max() {
        // 03:59 → 07:59 next day: 4h ticks snap back to 00:00 and add a
        // trailing 08:00, one more than fits.
        let start = ms(2024, 1, 1, 3) + 59 * 60_000;
        let end = start + 28 * HOUR_MS;
        let plan = plan_time_ticks(&[start, end], 4, 8, &Utc);
        assert_eq!(plan.granularity, Some(TimeGranularity::EightHours));
        assert!(plan.ticks.len() <= 8, "len {}", plan.ticks.len());
        assert!(plan.ticks.len() >= 4);
        assert!(plan.ticks[0] <= start);
        assert!(*plan.ticks.last().unwrap() >= end);
    }

    #[test]
    fn test_trailing_tick_dropped_when_coarser_is_too_sparse() {
        let start = ms(2024, 1, 1, 3) + 59 * 60_000;
        let end = start + 28 * HOUR_MS;
        let plan = plan_time_ticks(&[start, end], 6, 8, &Utc);
        assert_eq!(plan.granularity, Some(TimeGranularity::FourHours));
        assert_eq!(plan.ticks.len(), 8);
        assert_eq!(plan.ticks.last(), Some(&ms(2024, 1, 2, 4)));
    }

    #[test]
    fn test_millisecond_fallback() {
        // A century does not fit eight ticks at yearly granularity.
        let plan = plan_time_ticks(&[ms(1900, 1, 1, 0), ms(2000, 1, 1, 0)], 2, 8, &Utc);
        assert_eq!(plan.granularity, None);
        assert!(plan.ticks.len() >= 2);
        for pair in plan.ticks.windows(2) {
            assert!(pair[1] > pair[0]);
        }
        assert!(plan.ticks[0] <= ms(1900, 1, 1, 0));
        assert!(*plan.ticks.last().unwrap() >= ms(2000, 1, 1, 0));
    }

    #[test]
    fn test_single_instant_yields_one_tick() {
        let t = ms(2024, 2, 29, 13);
        let plan = plan_time_ticks(&[t, t], 4, 8, &Utc);
        assert!(!plan.ticks.is_empty());
        assert!(plan.ticks[0] <= t);
    }

    #[test]
    fn test_nice_step() {
        assert_eq!(nice_step(1.2), 1.0);
        assert_eq!(nice_step(2.5), 2.0);
        assert_eq!(nice_step(4.0), 5.0);
        assert_eq!(nice_step(6.0), 10.0);
        assert!((nice_step(60_000.0) - 100_000.0).abs() < 1e-6);
    }

    #[test]
    fn test_accepts_datetimes() {
        let dates = [
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap(),
        ];
        let ticks = adaptive_time_ticks_in(&dates, 4, 8, &Utc);
        assert_eq!(ticks.first(), dates.first());
    }
}
