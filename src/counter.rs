use crate::error::{CounterError, StorageError};
use crate::storage::{DATE_FORMAT, DateStore};
use crate::streak::{Clock, SystemClock, days_since};
use chrono::NaiveDate;
use tracing::{debug, info, warn};

pub const FUTURE_DATE_ERROR: &str = "Error: The date cannot be in the future.";
pub const SET_DATE_PROMPT: &str =
    "Please set the date you last drank soda using the calendar below.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterState {
    Unset,
    Set(NaiveDate),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    Saved(NaiveDate),
    RejectedFuture,
}

/// Owns the start date and keeps it in step with the backing file.
pub struct Counter<C: Clock = SystemClock> {
    store: DateStore,
    clock: C,
    state: CounterState,
    rejected: bool,
    warning: Option<StorageError>,
}

impl<C: Clock> Counter<C> {
    /// Loads the stored date. An unreadable or malformed file starts the
    /// counter unset and leaves the error in [`Counter::take_warning`].
    pub fn open(store: DateStore, clock: C) -> Self {
        let (state, warning) = match store.load() {
            Ok(Some(date)) => (CounterState::Set(date), None),
            Ok(None) => (CounterState::Unset, None),
            Err(e) => {
                warn!("ignoring stored start date: {e}");
                (CounterState::Unset, Some(e))
            }
        };

        debug!(
            today = %clock.today(),
            start_date = ?state,
            path = %store.path().display(),
            "counter opened"
        );

        Self {
            store,
            clock,
            state,
            rejected: false,
            warning,
        }
    }

    pub fn state(&self) -> CounterState {
        self.state
    }

    pub fn start_date(&self) -> Option<NaiveDate> {
        match self.state {
            CounterState::Set(date) => Some(date),
            CounterState::Unset => None,
        }
    }

    #[cfg(test)]
    pub(crate) fn store(&self) -> &DateStore {
        &self.store
    }

    pub fn take_warning(&mut self) -> Option<StorageError> {
        self.warning.take()
    }

    pub fn days_soda_free(&self) -> Option<i64> {
        self.start_date()
            .map(|start| days_since(start, self.clock.today()))
    }

    /// Applies a calendar selection.
    ///
    /// Dates after today are rejected without touching the file. A failed
    /// write leaves the counter at the last persisted date.
    pub fn submit(&mut self, year: i32, month: u32, day: u32) -> Result<Submission, CounterError> {
        debug!(year, month, day, "calendar selection submitted");

        let date = NaiveDate::from_ymd_opt(year, month, day)
            .ok_or(CounterError::InvalidDate { year, month, day })?;
        let today = self.clock.today();

        if date > today {
            debug!(%date, %today, "rejected future date");
            self.rejected = true;
            return Ok(Submission::RejectedFuture);
        }

        self.store.save(date)?;
        info!(%date, path = %self.store.path().display(), "saved start date");

        self.state = CounterState::Set(date);
        self.rejected = false;
        Ok(Submission::Saved(date))
    }

    pub fn label_text(&self) -> String {
        if self.rejected {
            return FUTURE_DATE_ERROR.to_string();
        }

        match self.state {
            CounterState::Unset => SET_DATE_PROMPT.to_string(),
            CounterState::Set(date) => format!(
                "You last drank soda on {}. \nYou have been soda-free for {} days!",
                date.format(DATE_FORMAT),
                days_since(date, self.clock.today())
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::streak::FixedClock;
    use std::fs;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn counter_at(dir: &tempfile::TempDir, today: NaiveDate) -> Counter<FixedClock> {
        let store = DateStore::new(dir.path().join("soda_free_date.txt"));
        Counter::open(store, FixedClock(today))
    }

    #[test]
    fn starts_unset_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut counter = counter_at(&dir, ymd(2024, 1, 11));

        assert_eq!(counter.state(), CounterState::Unset);
        assert_eq!(counter.days_soda_free(), None);
        assert!(counter.take_warning().is_none());
        assert_eq!(counter.label_text(), SET_DATE_PROMPT);
    }

    #[test]
    fn malformed_file_degrades_to_unset() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("soda_free_date.txt"), "not a date").unwrap();

        let mut counter = counter_at(&dir, ymd(2024, 1, 11));

        assert_eq!(counter.state(), CounterState::Unset);
        assert!(matches!(
            counter.take_warning(),
            Some(StorageError::Malformed { .. })
        ));
        assert!(counter.take_warning().is_none());
        assert_eq!(counter.label_text(), SET_DATE_PROMPT);
    }

    #[test]
    fn unreadable_file_degrades_to_unset() {
        let dir = tempfile::tempdir().unwrap();
        let store = DateStore::new(dir.path());

        let mut counter = Counter::open(store, FixedClock(ymd(2024, 1, 11)));

        assert_eq!(counter.state(), CounterState::Unset);
        assert!(matches!(
            counter.take_warning(),
            Some(StorageError::Read { .. })
        ));
        assert_eq!(counter.label_text(), SET_DATE_PROMPT);
    }

    #[test]
    fn label_shows_date_and_count() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("soda_free_date.txt"), "2024-01-01\n").unwrap();

        let counter = counter_at(&dir, ymd(2024, 1, 11));

        assert_eq!(counter.days_soda_free(), Some(10));
        assert_eq!(
            counter.label_text(),
            "You last drank soda on 2024-01-01. \nYou have been soda-free for 10 days!"
        );
    }

    #[test]
    fn stored_future_date_shows_negative_count() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("soda_free_date.txt"), "2024-01-15").unwrap();

        let counter = counter_at(&dir, ymd(2024, 1, 11));

        assert_eq!(counter.days_soda_free(), Some(-4));
        assert!(counter.label_text().contains("soda-free for -4 days!"));
    }

    #[test]
    fn today_is_accepted() {
        let dir = tempfile::tempdir().unwrap();
        let mut counter = counter_at(&dir, ymd(2024, 1, 11));

        let outcome = counter.submit(2024, 1, 11).unwrap();

        assert_eq!(outcome, Submission::Saved(ymd(2024, 1, 11)));
        assert_eq!(counter.days_soda_free(), Some(0));
        assert!(counter.label_text().contains("soda-free for 0 days!"));
    }

    #[test]
    fn future_date_is_rejected_and_not_saved() {
        let dir = tempfile::tempdir().unwrap();
        let mut counter = counter_at(&dir, ymd(2024, 1, 11));
        counter.submit(2024, 1, 1).unwrap();

        let outcome = counter.submit(2024, 1, 12).unwrap();

        assert_eq!(outcome, Submission::RejectedFuture);
        assert_eq!(counter.start_date(), Some(ymd(2024, 1, 1)));
        assert_eq!(counter.store().load().unwrap(), Some(ymd(2024, 1, 1)));
        assert_eq!(counter.label_text(), FUTURE_DATE_ERROR);
    }

    #[test]
    fn successful_save_clears_rejection() {
        let dir = tempfile::tempdir().unwrap();
        let mut counter = counter_at(&dir, ymd(2024, 1, 11));

        counter.submit(2025, 1, 1).unwrap();
        assert_eq!(counter.label_text(), FUTURE_DATE_ERROR);

        counter.submit(2024, 1, 10).unwrap();
        assert!(counter.label_text().contains("soda-free for 1 days!"));
    }

    #[test]
    fn invalid_calendar_date_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut counter = counter_at(&dir, ymd(2024, 1, 11));

        let err = counter.submit(2023, 2, 29).unwrap_err();

        assert!(matches!(err, CounterError::InvalidDate { month: 2, day: 29, .. }));
        assert_eq!(counter.state(), CounterState::Unset);
        assert!(!counter.store().exists());
    }

    #[test]
    fn failed_write_keeps_last_saved_date() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();
        let store = DateStore::new(blocker.join("soda_free_date.txt"));
        let mut counter = Counter::open(store, FixedClock(ymd(2024, 1, 11)));

        let err = counter.submit(2024, 1, 1).unwrap_err();

        assert!(matches!(err, CounterError::Storage(StorageError::Write { .. })));
        assert_eq!(counter.state(), CounterState::Unset);
        assert_eq!(counter.label_text(), SET_DATE_PROMPT);
    }
}
