use std::collections::BTreeSet;

use chrono::{Datelike, Month, Months, NaiveDate};

pub const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Month view marking the days with workouts.
#[derive(Debug, Clone, PartialEq)]
pub struct Calendar {
    first_day: NaiveDate,
    today: NaiveDate,
    workout_dates: BTreeSet<NaiveDate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Day {
    pub date: NaiveDate,
    pub is_today: bool,
    pub has_workout: bool,
}

impl Calendar {
    #[must_use]
    pub fn new(today: NaiveDate) -> Self {
        Self {
            first_day: first_of_month(today),
            today,
            workout_dates: BTreeSet::new(),
        }
    }

    pub fn set_workout_dates(&mut self, dates: impl IntoIterator<Item = NaiveDate>) {
        self.workout_dates = dates.into_iter().collect();
    }

    #[must_use]
    pub fn has_workout(&self, date: NaiveDate) -> bool {
        self.workout_dates.contains(&date)
    }

    pub fn previous_month(&mut self) {
        if let Some(date) = self.first_day.checked_sub_months(Months::new(1)) {
            self.first_day = date;
        }
    }

    pub fn next_month(&mut self) {
        if let Some(date) = self.first_day.checked_add_months(Months::new(1)) {
            self.first_day = date;
        }
    }

    #[must_use]
    pub fn title(&self) -> String {
        let month = u8::try_from(self.first_day.month())
            .ok()
            .and_then(|m| Month::try_from(m).ok())
            .map_or("", |m| m.name());
        format!("{month} {}", self.first_day.year())
    }

    /// Cells of the month grid, starting on Sunday. Days of the adjacent months are `None`.
    #[must_use]
    pub fn cells(&self) -> Vec<Option<Day>> {
        let leading = self.first_day.weekday().num_days_from_sunday() as usize;
        let mut cells = vec![None; leading];
        cells.extend(
            self.first_day
                .iter_days()
                .take_while(|date| date.month() == self.first_day.month())
                .map(|date| {
                    Some(Day {
                        date,
                        is_today: date == self.today,
                        has_workout: self.has_workout(date),
                    })
                }),
        );
        cells
    }
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn test_cells() {
        let mut calendar = Calendar::new(date(2024, 1, 15));
        calendar.set_workout_dates([date(2024, 1, 1), date(2024, 1, 1), date(2024, 1, 20)]);

        let cells = calendar.cells();

        // January 2024 starts on a Monday
        assert_eq!(cells.len(), 1 + 31);
        assert_eq!(cells[0], None);
        assert_eq!(
            cells[1],
            Some(Day {
                date: date(2024, 1, 1),
                is_today: false,
                has_workout: true,
            })
        );
        assert_eq!(
            cells
                .iter()
                .flatten()
                .filter(|d| d.has_workout)
                .map(|d| d.date.day())
                .collect::<Vec<_>>(),
            vec![1, 20]
        );
        assert_eq!(
            cells
                .iter()
                .flatten()
                .filter(|d| d.is_today)
                .map(|d| d.date)
                .collect::<Vec<_>>(),
            vec![date(2024, 1, 15)]
        );
    }

    #[rstest]
    #[case(date(2024, 9, 10), 0, 30)]
    #[case(date(2024, 2, 29), 4, 29)]
    #[case(date(2023, 2, 1), 3, 28)]
    fn test_month_layout(#[case] today: NaiveDate, #[case] leading: usize, #[case] days: usize) {
        let cells = Calendar::new(today).cells();

        assert_eq!(cells.iter().take_while(|c| c.is_none()).count(), leading);
        assert_eq!(cells.iter().flatten().count(), days);
    }

    #[test]
    fn test_month_navigation() {
        let mut calendar = Calendar::new(date(2024, 1, 31));
        assert_eq!(calendar.title(), "January 2024");

        calendar.previous_month();
        assert_eq!(calendar.title(), "December 2023");

        calendar.next_month();
        calendar.next_month();
        assert_eq!(calendar.title(), "February 2024");
        assert!(calendar.cells().iter().flatten().all(|d| !d.is_today));
    }
}
