//! Calendar and elapsed timestamps.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;

/// Milliseconds in one day, the elapsed-time unit.
const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// How a series expresses time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TimeMode {
    /// Timezone-naive calendar date-times.
    #[default]
    Calendar,
    /// Floating-point days since an origin instant.
    Elapsed,
}

impl TimeMode {
    /// Lower-case name used in messages and files.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Calendar => "calendar",
            Self::Elapsed => "elapsed",
        }
    }
}

impl fmt::Display for TimeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "calendar" => Ok(Self::Calendar),
            "elapsed" => Ok(Self::Elapsed),
            other => Err(format!("unknown time mode: {other:?}")),
        }
    }
}

/// A sample time: either a calendar instant or an elapsed offset in days.
///
/// No timezone conversion is ever performed; callers keep zones consistent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Timestamp {
    /// Timezone-naive calendar instant.
    Calendar(NaiveDateTime),
    /// Days since the owning model's time origin.
    Elapsed(f64),
}

impl Timestamp {
    /// The time mode this timestamp belongs to.
    pub fn mode(self) -> TimeMode {
        match self {
            Self::Calendar(_) => TimeMode::Calendar,
            Self::Elapsed(_) => TimeMode::Elapsed,
        }
    }

    /// Returns the calendar instant, if this is a calendar timestamp.
    pub fn as_calendar(self) -> Option<NaiveDateTime> {
        match self {
            Self::Calendar(t) => Some(t),
            Self::Elapsed(_) => None,
        }
    }

    /// Returns the elapsed offset, if this is an elapsed timestamp.
    pub fn as_elapsed(self) -> Option<f64> {
        match self {
            Self::Calendar(_) => None,
            Self::Elapsed(d) => Some(d),
        }
    }

    /// Position on the elapsed-day axis anchored at `origin`.
    ///
    /// Calendar instants are converted; elapsed offsets are already relative
    /// to the model origin and are returned unchanged.
    pub fn elapsed_days(self, origin: NaiveDateTime) -> f64 {
        match self {
            Self::Calendar(t) => days_between(origin, t),
            Self::Elapsed(d) => d,
        }
    }

    /// Same instant with `-0.0` days folded into `0.0`.
    pub fn normalized(self) -> Self {
        match self {
            Self::Elapsed(d) => Self::Elapsed(d + 0.0),
            other => other,
        }
    }

    /// Total order used for sorting samples.
    ///
    /// Within one mode this is chronological order (elapsed offsets use
    /// `f64::total_cmp` with `-0.0 == 0.0`); calendar timestamps sort before
    /// elapsed ones.
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Calendar(a), Self::Calendar(b)) => a.cmp(b),
            (Self::Elapsed(a), Self::Elapsed(b)) => (a + 0.0).total_cmp(&(b + 0.0)),
            (Self::Calendar(_), Self::Elapsed(_)) => Ordering::Less,
            (Self::Elapsed(_), Self::Calendar(_)) => Ordering::Greater,
        }
    }
}

impl PartialOrd for Timestamp {
    /// Timestamps of different modes are not comparable.
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Calendar(a), Self::Calendar(b)) => Some(a.cmp(b)),
            (Self::Elapsed(a), Self::Elapsed(b)) => a.partial_cmp(b),
            _ => None,
        }
    }
}

impl From<NaiveDateTime> for Timestamp {
    fn from(t: NaiveDateTime) -> Self {
        Self::Calendar(t)
    }
}

impl From<f64> for Timestamp {
    fn from(d: f64) -> Self {
        Self::Elapsed(d)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Calendar(t) => write!(f, "{t}"),
            Self::Elapsed(d) => write!(f, "{d} d"),
        }
    }
}

/// Signed number of days from `origin` to `t`, at millisecond resolution.
pub fn days_between(origin: NaiveDateTime, t: NaiveDateTime) -> f64 {
    (t - origin).num_milliseconds() as f64 / MILLIS_PER_DAY
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    #[test]
    fn days_between_whole_and_fractional() {
        assert_relative_eq!(days_between(at(2023, 1, 1, 0), at(2023, 1, 8, 0)), 7.0);
        assert_relative_eq!(days_between(at(2023, 1, 1, 0), at(2023, 1, 1, 12)), 0.5);
        assert_relative_eq!(days_between(at(2023, 1, 8, 0), at(2023, 1, 1, 0)), -7.0);
    }

    #[test]
    fn elapsed_days_passes_elapsed_through() {
        let origin = at(2000, 1, 1, 0);
        assert_eq!(Timestamp::Elapsed(4.25).elapsed_days(origin), 4.25);
        assert_relative_eq!(
            Timestamp::Calendar(at(2000, 1, 3, 6)).elapsed_days(origin),
            2.25
        );
    }

    #[test]
    fn mixed_modes_are_not_comparable() {
        let a = Timestamp::Calendar(at(2000, 1, 1, 0));
        let b = Timestamp::Elapsed(0.0);
        assert!(a.partial_cmp(&b).is_none());
        assert_eq!(a.total_cmp(&b), Ordering::Less);
    }

    #[test]
    fn same_mode_ordering() {
        assert!(Timestamp::Elapsed(1.0) < Timestamp::Elapsed(2.0));
        assert!(Timestamp::Calendar(at(2000, 1, 2, 0)) > Timestamp::Calendar(at(2000, 1, 1, 0)));
    }

    #[test]
    fn signed_zero_is_one_instant() {
        let pos = Timestamp::Elapsed(0.0);
        let neg = Timestamp::Elapsed(-0.0);
        assert_eq!(pos.total_cmp(&neg), Ordering::Equal);
        assert!(neg.normalized().as_elapsed().unwrap().is_sign_positive());
    }

    #[test]
    fn time_mode_round_trips_through_str() {
        assert_eq!("calendar".parse::<TimeMode>().unwrap(), TimeMode::Calendar);
        assert_eq!("Elapsed".parse::<TimeMode>().unwrap(), TimeMode::Elapsed);
        assert!("julian".parse::<TimeMode>().is_err());
        assert_eq!(TimeMode::Elapsed.to_string(), "elapsed");
    }
}
