//! Human-readable elapsed time ("about 3 hours", "12 days").
//!
//! Elapsed time is first bucketed into a [`Distance`], whose ordering follows
//! the elapsed duration, and then rendered as an English phrase.

use std::fmt;

use chrono::{DateTime, Utc};

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;
const MONTH: i64 = 30 * DAY;
const YEAR: i64 = 365 * DAY;

/// A coarse bucket of elapsed time.
///
/// Variants are declared from shortest to longest, so the derived `Ord`
/// ranks a longer elapsed time at least as high as a shorter one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Distance {
  LessThanAMinute,
  Minutes(i64),
  AboutHours(i64),
  Days(i64),
  AboutMonths(i64),
  AboutYears(i64),
  OverYears(i64),
}

impl Distance {
  /// Bucket an elapsed duration. Negative input counts as zero.
  pub fn from_seconds(seconds: i64) -> Self {
    let s = seconds.max(0);
    match s {
      s if s < MINUTE => Self::LessThanAMinute,
      s if s < 45 * MINUTE => Self::Minutes(s / MINUTE),
      s if s < DAY => Self::AboutHours(((s + HOUR / 2) / HOUR).max(1)),
      s if s < MONTH => Self::Days(s / DAY),
      s if s < YEAR => Self::AboutMonths(s / MONTH),
      s if s < 2 * YEAR => Self::AboutYears(1),
      s => Self::OverYears(s / YEAR),
    }
  }

  pub fn between(past: DateTime<Utc>, now: DateTime<Utc>) -> Self {
    Self::from_seconds((now - past).num_seconds())
  }
}

fn plural(n: i64, unit: &str) -> String {
  if n == 1 { format!("1 {unit}") } else { format!("{n} {unit}s") }
}

impl fmt::Display for Distance {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match *self {
      Self::LessThanAMinute => f.write_str("less than a minute"),
      Self::Minutes(n) => f.write_str(&plural(n, "minute")),
      Self::AboutHours(n) => write!(f, "about {}", plural(n, "hour")),
      Self::Days(n) => f.write_str(&plural(n, "day")),
      Self::AboutMonths(n) => write!(f, "about {}", plural(n, "month")),
      Self::AboutYears(n) => write!(f, "about {}", plural(n, "year")),
      Self::OverYears(n) => write!(f, "over {}", plural(n, "year")),
    }
  }
}

/// Describe how long ago `past` was, relative to `now`.
///
/// A `past` later than `now` reads as "less than a minute".
pub fn humanize(past: DateTime<Utc>, now: DateTime<Utc>) -> String {
  Distance::between(past, now).to_string()
}

#[cfg(test)]
mod tests {
  use chrono::{Duration, TimeZone};

  use super::*;

  fn now() -> DateTime<Utc> { Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap() }

  fn ago(seconds: i64) -> String { humanize(now() - Duration::seconds(seconds), now()) }

  #[test]
  fn phrases() {
    assert_eq!(ago(0), "less than a minute");
    assert_eq!(ago(30), "less than a minute");
    assert_eq!(ago(60), "1 minute");
    assert_eq!(ago(5 * MINUTE + 10), "5 minutes");
    assert_eq!(ago(50 * MINUTE), "about 1 hour");
    assert_eq!(ago(3 * HOUR), "about 3 hours");
    assert_eq!(ago(90_000), "1 day");
    assert_eq!(ago(12 * DAY), "12 days");
    assert_eq!(ago(40 * DAY), "about 1 month");
    assert_eq!(ago(200 * DAY), "about 6 months");
    assert_eq!(ago(400 * DAY), "about 1 year");
    assert_eq!(ago(3 * YEAR), "over 3 years");
  }

  #[test]
  fn future_clamps_to_zero() {
    assert_eq!(humanize(now() + Duration::hours(5), now()), "less than a minute");
  }

  #[test]
  fn day_is_larger_than_seconds() {
    let short = Distance::from_seconds(30);
    let long = Distance::from_seconds(90_000);
    assert_eq!(short, Distance::LessThanAMinute);
    assert!(matches!(long, Distance::Days(1)));
    assert!(long > short);
  }

  #[test]
  fn monotonic() {
    let samples: Vec<i64> = (0..2_000)
      .map(|i: i64| i * i * 97)
      .chain([MINUTE - 1, MINUTE, 45 * MINUTE - 1, 45 * MINUTE, DAY - 1, DAY])
      .chain([MONTH - 1, MONTH, YEAR - 1, YEAR, 2 * YEAR - 1, 2 * YEAR])
      .collect();
    let mut sorted = samples.clone();
    sorted.sort_unstable();

    for pair in sorted.windows(2) {
      let (a, b) = (Distance::from_seconds(pair[0]), Distance::from_seconds(pair[1]));
      assert!(a <= b, "{} s -> {a:?} but {} s -> {b:?}", pair[0], pair[1]);
    }
  }
}
