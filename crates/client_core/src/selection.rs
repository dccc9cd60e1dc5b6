use chrono::{Duration, NaiveDate};

use crate::error::ViewModelError;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn parse_calendar_date(raw: &str) -> Result<NaiveDate, ViewModelError> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|_| ViewModelError::InvalidDate(raw.to_string()))
}

pub fn format_calendar_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Single selected day plus the today marker fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DaySelector {
    selected: NaiveDate,
    today: NaiveDate,
}

impl DaySelector {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            selected: today,
            today,
        }
    }

    pub fn selected(&self) -> NaiveDate {
        self.selected
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn is_today(&self) -> bool {
        self.selected == self.today
    }

    pub fn select(&mut self, date: NaiveDate) {
        self.selected = date;
    }

    /// Leaves the selection untouched when `raw` is not a calendar date.
    pub fn select_str(&mut self, raw: &str) -> Result<NaiveDate, ViewModelError> {
        let date = parse_calendar_date(raw)?;
        self.select(date);
        Ok(date)
    }

    pub fn step_days(&mut self, days: i64) -> NaiveDate {
        let next =
            Duration::try_days(days).and_then(|delta| self.selected.checked_add_signed(delta));
        if let Some(date) = next {
            self.selected = date;
        }
        self.selected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn starts_on_today() {
        let selector = DaySelector::new(date(2024, 5, 1));
        assert_eq!(selector.selected(), date(2024, 5, 1));
        assert!(selector.is_today());
    }

    #[test]
    fn select_replaces_selection_but_not_today() {
        let mut selector = DaySelector::new(date(2024, 5, 1));
        selector.select(date(2030, 1, 31));
        assert_eq!(selector.selected(), date(2030, 1, 31));
        assert_eq!(selector.today(), date(2024, 5, 1));
        assert!(!selector.is_today());
    }

    #[test]
    fn rejects_malformed_date_and_keeps_selection() {
        let mut selector = DaySelector::new(date(2024, 5, 1));
        let err = selector.select_str("2024-02-30").expect_err("invalid");
        assert_eq!(err, ViewModelError::InvalidDate("2024-02-30".into()));
        assert_eq!(selector.selected(), date(2024, 5, 1));
    }

    #[test]
    fn steps_across_month_boundary() {
        let mut selector = DaySelector::new(date(2024, 2, 28));
        assert_eq!(selector.step_days(2), date(2024, 3, 1));
        assert_eq!(selector.step_days(-1), date(2024, 2, 29));
    }

    #[test]
    fn formats_wire_date() {
        assert_eq!(format_calendar_date(date(2024, 5, 1)), "2024-05-01");
    }
}
