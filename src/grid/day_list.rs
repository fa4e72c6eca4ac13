use chrono::{Datelike, Duration, Months, NaiveDate};

use super::{GeometryError, DAYS_PER_WEEK};

/// Seven consecutive dates, first day of the week first
pub type Week = [NaiveDate; DAYS_PER_WEEK];

/// Flat list of the visible days of a grid, whole weeks only.
///
/// Both the month grid and a single-week strip are expressed as a `DayList`
/// so pointer mapping and gesture clamping work the same on either.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayList {
    days: Vec<NaiveDate>,
}

impl DayList {
    pub fn new(days: Vec<NaiveDate>) -> Result<Self, GeometryError> {
        if days.is_empty() {
            return Err(GeometryError::EmptyGrid {
                columns: DAYS_PER_WEEK,
                rows: 0,
            });
        }
        if days.len() % DAYS_PER_WEEK != 0 {
            return Err(GeometryError::PartialWeek(days.len()));
        }
        if let Some(pair) = days
            .windows(2)
            .find(|pair| pair[0].succ_opt() != Some(pair[1]))
        {
            return Err(GeometryError::NonConsecutive(pair[1]));
        }
        Ok(Self { days })
    }

    /// `weeks` whole weeks starting on `first_day`
    pub fn starting(first_day: NaiveDate, weeks: usize) -> Self {
        let count = weeks.max(1) * DAYS_PER_WEEK;
        let days = (0..count)
            .map(|offset| first_day + Duration::days(offset as i64))
            .collect();
        Self { days }
    }

    pub fn from_week(week: &Week) -> Self {
        Self {
            days: week.to_vec(),
        }
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn rows(&self) -> usize {
        self.days.len() / DAYS_PER_WEEK
    }

    pub fn first(&self) -> NaiveDate {
        self.days[0]
    }

    pub fn last(&self) -> NaiveDate {
        self.days[self.days.len() - 1]
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.first() && date <= self.last()
    }

    /// Day at `row`/`column`; indices past the end clamp to the last day
    pub fn get(&self, row: usize, column: usize) -> NaiveDate {
        let index = row * DAYS_PER_WEEK + column;
        self.days[index.min(self.days.len() - 1)]
    }

    /// Row and column of `date`, if it is visible
    pub fn position(&self, date: NaiveDate) -> Option<(usize, usize)> {
        self.days
            .iter()
            .position(|day| *day == date)
            .map(|index| (index / DAYS_PER_WEEK, index % DAYS_PER_WEEK))
    }

    pub fn weeks(&self) -> impl Iterator<Item = &Week> + '_ {
        self.days
            .chunks_exact(DAYS_PER_WEEK)
            .filter_map(|chunk| <&Week>::try_from(chunk).ok())
    }

    pub fn as_slice(&self) -> &[NaiveDate] {
        &self.days
    }
}

/// Start of the week holding `date`; `first_day_of_week` is 0 = Sunday ... 6 = Saturday
pub fn week_start(date: NaiveDate, first_day_of_week: u8) -> NaiveDate {
    let weekday = date.weekday().num_days_from_sunday() as i64;
    let offset = (weekday + 7 - (first_day_of_week % 7) as i64) % 7;
    date - Duration::days(offset)
}

pub fn week_containing(date: NaiveDate, first_day_of_week: u8) -> Week {
    let start = week_start(date, first_day_of_week);
    std::array::from_fn(|offset| start + Duration::days(offset as i64))
}

/// Whole weeks covering the month of `date`
pub fn month_grid(date: NaiveDate, first_day_of_week: u8) -> DayList {
    let first_of_month = date.with_day(1).unwrap_or(date);
    let last_of_month = first_of_month
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(first_of_month);

    let grid_start = week_start(first_of_month, first_day_of_week);
    let grid_end = week_start(last_of_month, first_day_of_week) + Duration::days(6);
    let weeks = ((grid_end - grid_start).num_days() as usize + 1) / DAYS_PER_WEEK;

    DayList::starting(grid_start, weeks)
}
