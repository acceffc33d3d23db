//! Settlement-run scheduling
//!
//! Each league settles its pending claims at a configured weekday and
//! time-of-day (e.g. Wednesday 03:00 UTC). This module computes the next
//! run timestamp as a pure function of "now", so repeated calls before the
//! computed time always return the same instant.
//!
//! # Critical Invariants
//!
//! 1. The returned timestamp is strictly after `now`
//! 2. Idempotency: same `now` (or any earlier `now` on the same cycle
//!    boundary) → same result; claims submitted before a run all carry the
//!    identical `process_at`
//!
//! The engine does not own timers. The embedding system reads `process_at`
//! off submitted claims (or calls [`next_process_time`] directly) and
//! triggers [`crate::WaiverEngine::run_settlement`] when the time arrives,
//! so scheduled runs survive process restarts.

use chrono::{DateTime, Datelike, Days, NaiveTime, Timelike, Utc, Weekday};

/// Compute the next settlement run strictly after `now`
///
/// If `now` falls on the configured weekday before the configured time,
/// the run is today at that time; otherwise it is the next matching
/// weekday. `now` exactly at the configured instant rolls to next week.
///
/// # Example
/// ```
/// use chrono::{NaiveTime, TimeZone, Utc, Weekday};
/// use waiver_engine_core::core::schedule::next_process_time;
///
/// // Monday 2026-08-24 12:00, processing Wednesday 03:00
/// let now = Utc.with_ymd_and_hms(2026, 8, 24, 12, 0, 0).unwrap();
/// let time = NaiveTime::from_hms_opt(3, 0, 0).unwrap();
/// let next = next_process_time(now, Weekday::Wed, time);
/// assert_eq!(next, Utc.with_ymd_and_hms(2026, 8, 26, 3, 0, 0).unwrap());
///
/// // Calling again before the run yields the same instant
/// let later = Utc.with_ymd_and_hms(2026, 8, 25, 23, 59, 0).unwrap();
/// assert_eq!(next_process_time(later, Weekday::Wed, time), next);
/// ```
pub fn next_process_time(
    now: DateTime<Utc>,
    weekday: Weekday,
    time: NaiveTime,
) -> DateTime<Utc> {
    let days_ahead = weekday.num_days_from_monday() as i64
        - now.weekday().num_days_from_monday() as i64;
    let mut days_ahead = days_ahead.rem_euclid(7) as u64;

    // Same weekday: today only if the configured time is still ahead
    if days_ahead == 0 && now.time() >= time {
        days_ahead = 7;
    }

    let date = now
        .date_naive()
        .checked_add_days(Days::new(days_ahead))
        .unwrap_or(now.date_naive());
    date.and_time(time).and_utc()
}

/// Derive a per-run RNG seed from the run's wall-clock start
///
/// The `random` tiebreak is deliberately not reproducible across runs;
/// seeding from the run timestamp gives each run a fresh shuffle while
/// keeping all randomness inside [`crate::RngManager`].
pub fn run_seed(now: DateTime<Utc>) -> u64 {
    let secs = now.timestamp() as u64;
    (secs << 30) ^ now.nanosecond() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    fn three_am() -> NaiveTime {
        NaiveTime::from_hms_opt(3, 0, 0).unwrap()
    }

    #[test]
    fn test_same_day_before_time_runs_today() {
        // 2026-08-26 is a Wednesday
        let now = at(2026, 8, 26, 1, 30);
        let next = next_process_time(now, Weekday::Wed, three_am());
        assert_eq!(next, at(2026, 8, 26, 3, 0));
    }

    #[test]
    fn test_same_day_after_time_rolls_a_week() {
        let now = at(2026, 8, 26, 4, 0);
        let next = next_process_time(now, Weekday::Wed, three_am());
        assert_eq!(next, at(2026, 9, 2, 3, 0));
    }

    #[test]
    fn test_exactly_at_process_time_rolls_a_week() {
        let now = at(2026, 8, 26, 3, 0);
        let next = next_process_time(now, Weekday::Wed, three_am());
        assert_eq!(next, at(2026, 9, 2, 3, 0));
    }

    #[test]
    fn test_result_is_strictly_after_now() {
        let time = three_am();
        for day in 1..=28 {
            for hour in [0, 2, 3, 4, 23] {
                let now = at(2026, 8, day, hour, 0);
                for weekday in [Weekday::Mon, Weekday::Wed, Weekday::Sun] {
                    assert!(next_process_time(now, weekday, time) > now);
                }
            }
        }
    }

    #[test]
    fn test_idempotent_before_computed_time() {
        let time = three_am();
        let first = next_process_time(at(2026, 8, 24, 9, 0), Weekday::Wed, time);
        let second = next_process_time(at(2026, 8, 26, 2, 59), Weekday::Wed, time);
        assert_eq!(first, second);
    }

    #[test]
    fn test_target_earlier_in_week_wraps_forward() {
        // Friday asking for Tuesday processing
        let now = at(2026, 8, 28, 12, 0);
        let next = next_process_time(now, Weekday::Tue, three_am());
        assert_eq!(next, at(2026, 9, 1, 3, 0));
    }
}
