//! Time-sorted, duplicate-free sample sequence.

use std::cmp::Ordering;

use chrono::NaiveDateTime;

use crate::error::SeriesError;
use crate::timestamp::{TimeMode, Timestamp};

/// One `(timestamp, value)` observation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Sample time.
    pub timestamp: Timestamp,
    /// Measured water level.
    pub value: f64,
}

/// Water-level time series for one well.
///
/// Samples are kept strictly increasing by timestamp and every timestamp has
/// the series' [`TimeMode`]. All mutations either succeed completely or leave
/// the series unchanged.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TimeSeries {
    mode: TimeMode,
    samples: Vec<Sample>,
}

impl TimeSeries {
    /// Creates an empty series in the given mode.
    pub fn new(mode: TimeMode) -> Self {
        Self {
            mode,
            samples: Vec::new(),
        }
    }

    /// Creates a series from unordered samples.
    ///
    /// # Errors
    ///
    /// Same as [`TimeSeries::extend`].
    pub fn from_samples<I, T>(mode: TimeMode, samples: I) -> Result<Self, SeriesError>
    where
        I: IntoIterator<Item = (T, f64)>,
        T: Into<Timestamp>,
    {
        let mut series = Self::new(mode);
        series.extend(samples)?;
        Ok(series)
    }

    /// Creates a calendar-mode series.
    pub fn calendar<I>(samples: I) -> Result<Self, SeriesError>
    where
        I: IntoIterator<Item = (NaiveDateTime, f64)>,
    {
        Self::from_samples(TimeMode::Calendar, samples)
    }

    /// Creates an elapsed-mode series; times are days since the model origin.
    pub fn elapsed<I>(samples: I) -> Result<Self, SeriesError>
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        Self::from_samples(TimeMode::Elapsed, samples)
    }

    /// Returns the time mode.
    pub fn mode(&self) -> TimeMode {
        self.mode
    }

    /// Returns the number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Returns `true` if the series holds no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Returns the samples in time order.
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Iterates `(timestamp, value)` pairs in time order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (Timestamp, f64)> + Clone + '_ {
        self.samples.iter().map(|s| (s.timestamp, s.value))
    }

    /// Iterates timestamps in time order.
    pub fn timestamps(&self) -> impl ExactSizeIterator<Item = Timestamp> + '_ {
        self.samples.iter().map(|s| s.timestamp)
    }

    /// Returns the values in time order.
    pub fn values(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.value).collect()
    }

    /// Earliest sample.
    pub fn first(&self) -> Option<Sample> {
        self.samples.first().copied()
    }

    /// Latest sample.
    pub fn last(&self) -> Option<Sample> {
        self.samples.last().copied()
    }

    /// Value recorded at exactly `timestamp`.
    pub fn value_at(&self, timestamp: impl Into<Timestamp>) -> Option<f64> {
        let timestamp = timestamp.into();
        self.position(&timestamp).ok().map(|i| self.samples[i].value)
    }

    /// Inserts one sample, keeping time order.
    ///
    /// # Errors
    ///
    /// - [`SeriesError::ModeMismatch`] if the timestamp kind differs from the
    ///   series mode.
    /// - [`SeriesError::NonFiniteTime`] / [`SeriesError::NonFiniteValue`] for
    ///   NaN or infinite input.
    /// - [`SeriesError::DuplicateTimestamp`] if the timestamp already exists.
    pub fn add_sample(
        &mut self,
        timestamp: impl Into<Timestamp>,
        value: f64,
    ) -> Result<(), SeriesError> {
        let sample = self.check(timestamp.into(), value)?;
        match self.position(&sample.timestamp) {
            Ok(_) => Err(SeriesError::DuplicateTimestamp {
                timestamp: sample.timestamp,
            }),
            Err(idx) => {
                self.samples.insert(idx, sample);
                Ok(())
            }
        }
    }

    /// Bulk-inserts samples in any order.
    ///
    /// The whole batch is validated before the series is touched, so on error
    /// the series is unchanged.
    ///
    /// # Errors
    ///
    /// Same as [`TimeSeries::add_sample`]; duplicates within the batch are
    /// reported as [`SeriesError::DuplicateTimestamp`] too.
    pub fn extend<I, T>(&mut self, samples: I) -> Result<(), SeriesError>
    where
        I: IntoIterator<Item = (T, f64)>,
        T: Into<Timestamp>,
    {
        let mut batch = samples
            .into_iter()
            .map(|(t, v)| self.check(t.into(), v))
            .collect::<Result<Vec<_>, _>>()?;
        batch.sort_by(|a, b| a.timestamp.total_cmp(&b.timestamp));

        for pair in batch.windows(2) {
            if pair[0].timestamp.total_cmp(&pair[1].timestamp) == Ordering::Equal {
                return Err(SeriesError::DuplicateTimestamp {
                    timestamp: pair[1].timestamp,
                });
            }
        }
        for sample in &batch {
            if self.position(&sample.timestamp).is_ok() {
                return Err(SeriesError::DuplicateTimestamp {
                    timestamp: sample.timestamp,
                });
            }
        }

        self.samples.extend(batch);
        self.samples.sort_by(|a, b| a.timestamp.total_cmp(&b.timestamp));
        Ok(())
    }

    /// Lazy `(elapsed_days, value)` view anchored at `origin`.
    ///
    /// Calendar timestamps are converted by subtracting `origin`; an
    /// elapsed-mode series already holds offsets and yields them unchanged.
    /// The view can be cloned or requested again to restart it, and never
    /// changes the series mode.
    pub fn as_elapsed(&self, origin: NaiveDateTime) -> Elapsed<'_> {
        Elapsed {
            inner: self.samples.iter(),
            origin,
        }
    }

    /// Sample times on the elapsed-day axis anchored at `origin`.
    pub fn time_axis(&self, origin: NaiveDateTime) -> Vec<f64> {
        self.as_elapsed(origin).map(|(t, _)| t).collect()
    }

    /// Inclusive sub-series `start ..= end`, which must not be empty.
    ///
    /// # Errors
    ///
    /// - [`SeriesError::ModeMismatch`] if a bound has the wrong mode.
    /// - [`SeriesError::EmptyRange`] if no sample falls in the range.
    pub fn slice(
        &self,
        start: impl Into<Timestamp>,
        end: impl Into<Timestamp>,
    ) -> Result<TimeSeries, SeriesError> {
        let (start, end) = (start.into(), end.into());
        let sub = self.range(start, end)?;
        if sub.is_empty() {
            return Err(SeriesError::EmptyRange { start, end });
        }
        Ok(sub)
    }

    /// Inclusive sub-series `start ..= end`; may be empty.
    ///
    /// # Errors
    ///
    /// Returns [`SeriesError::ModeMismatch`] if a bound has the wrong mode.
    pub fn range(
        &self,
        start: impl Into<Timestamp>,
        end: impl Into<Timestamp>,
    ) -> Result<TimeSeries, SeriesError> {
        let (start, end) = (start.into().normalized(), end.into().normalized());
        for bound in [start, end] {
            self.check_mode(bound)?;
        }
        let lo = self
            .samples
            .partition_point(|s| s.timestamp.total_cmp(&start) == Ordering::Less);
        let hi = self
            .samples
            .partition_point(|s| s.timestamp.total_cmp(&end) != Ordering::Greater);
        let samples = if lo < hi {
            self.samples[lo..hi].to_vec()
        } else {
            Vec::new()
        };
        Ok(TimeSeries {
            mode: self.mode,
            samples,
        })
    }

    fn position(&self, timestamp: &Timestamp) -> Result<usize, usize> {
        self.samples.binary_search_by(|s| s.timestamp.total_cmp(timestamp))
    }

    fn check_mode(&self, timestamp: Timestamp) -> Result<(), SeriesError> {
        if timestamp.mode() != self.mode {
            return Err(SeriesError::ModeMismatch {
                expected: self.mode,
                got: timestamp.mode(),
            });
        }
        Ok(())
    }

    fn check(&self, timestamp: Timestamp, value: f64) -> Result<Sample, SeriesError> {
        self.check_mode(timestamp)?;
        if let Timestamp::Elapsed(d) = timestamp
            && !d.is_finite()
        {
            return Err(SeriesError::NonFiniteTime { value: d });
        }
        if !value.is_finite() {
            return Err(SeriesError::NonFiniteValue { timestamp, value });
        }
        Ok(Sample {
            timestamp: timestamp.normalized(),
            value,
        })
    }
}

/// Restartable `(elapsed_days, value)` iterator returned by
/// [`TimeSeries::as_elapsed`].
#[derive(Debug, Clone)]
pub struct Elapsed<'a> {
    inner: std::slice::Iter<'a, Sample>,
    origin: NaiveDateTime,
}

impl Iterator for Elapsed<'_> {
    type Item = (f64, f64);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .next()
            .map(|s| (s.timestamp.elapsed_days(self.origin), s.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl DoubleEndedIterator for Elapsed<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner
            .next_back()
            .map(|s| (s.timestamp.elapsed_days(self.origin), s.value))
    }
}

impl ExactSizeIterator for Elapsed<'_> {}
