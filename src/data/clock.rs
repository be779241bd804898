//! Absolute timestamps for logs that only print the time of day.
//!
//! `top -b` headers carry `HH:MM:SS` and nothing else. The date comes from
//! the log's file name, and every later date is inferred by watching the
//! hour wrap around to `00`.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};

/// Resolves time-of-day stamps from one log into absolute date-times.
///
/// A rollover is detected the first time an hour-`00` sample follows a
/// non-`00` one. While still inside hour `00` further samples keep the same
/// date, so a log sampled every few seconds does not advance once per
/// sample. The window closes as soon as a sample from a later hour arrives.
///
/// Create one resolver per log file: its state only makes sense for a single
/// chronologically ordered stream.
///
/// # Example
///
/// ```
/// use chrono::{NaiveDate, NaiveTime};
/// use toplog::data::DateResolver;
///
/// let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
/// let mut resolver = DateResolver::new(start);
///
/// let before = resolver.resolve(NaiveTime::from_hms_opt(23, 59, 0).unwrap());
/// let after = resolver.resolve(NaiveTime::from_hms_opt(0, 1, 0).unwrap());
///
/// assert_eq!(before.date(), start);
/// assert_eq!(after.date(), NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
/// ```
#[derive(Debug, Clone)]
pub struct DateResolver {
    start: NaiveDate,
    current: Option<NaiveDate>,
    in_zero_hour: bool,
}

impl DateResolver {
    /// Create a resolver for a log that started on `start`.
    pub fn new(start: NaiveDate) -> Self {
        Self {
            start,
            current: None,
            in_zero_hour: false,
        }
    }

    /// Date the most recent sample resolved to, if any sample was seen.
    pub fn current_date(&self) -> Option<NaiveDate> {
        self.current
    }

    /// Resolve the next time of day in the log.
    pub fn resolve(&mut self, time: NaiveTime) -> NaiveDateTime {
        let zero_hour = time.hour() == 0;

        let mut date = match self.current {
            Some(date) => date,
            None => {
                // A log starting inside hour 00 is not a rollover.
                self.in_zero_hour = zero_hour;
                self.start
            }
        };

        if self.in_zero_hour && !zero_hour {
            self.in_zero_hour = false;
        } else if !self.in_zero_hour && zero_hour {
            self.in_zero_hour = true;
            date = date.succ_opt().unwrap_or(date);
        }

        self.current = Some(date);
        date.and_time(time)
    }
}

/// Parse an `HH:MM:SS` field from a log line.
pub fn parse_time_of_day(field: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(field, "%H:%M:%S").ok()
}
