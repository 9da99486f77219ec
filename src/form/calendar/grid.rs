use chrono::{Datelike, Months, NaiveDate, Weekday};

use crate::domain::DayOfWeek;

/// Days of the week on which a date may be picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkingDays([bool; 7]);

impl WorkingDays {
    pub fn weekdays() -> Self {
        Self([true, true, true, true, true, false, false])
    }

    pub fn every_day() -> Self {
        Self([true; 7])
    }

    pub fn from_days(days: &[DayOfWeek]) -> Self {
        let mut flags = [false; 7];
        for day in days {
            flags[Weekday::from(*day).num_days_from_monday() as usize] = true;
        }
        Self(flags)
    }

    pub fn contains(&self, day: Weekday) -> bool {
        self.0[day.num_days_from_monday() as usize]
    }
}

impl Default for WorkingDays {
    fn default() -> Self {
        Self::weekdays()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayCell {
    pub date: NaiveDate,
    pub selectable: bool,
    pub is_today: bool,
}

/// Monday-first weeks of one month; cells outside the month are `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGrid {
    pub year: i32,
    pub month: u32,
    pub weeks: Vec<[Option<DayCell>; 7]>,
}

pub fn is_selectable(date: NaiveDate, today: NaiveDate, working_days: WorkingDays) -> bool {
    date >= today && working_days.contains(date.weekday())
}

pub fn month_grid(
    year: i32,
    month: u32,
    today: NaiveDate,
    working_days: WorkingDays,
) -> Option<MonthGrid> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next_month = first.checked_add_months(Months::new(1))?;
    let lead = first.weekday().num_days_from_monday() as usize;

    let mut weeks = Vec::new();
    let mut week: [Option<DayCell>; 7] = [None; 7];
    let mut column = lead;
    for date in first.iter_days().take_while(|date| *date < next_month) {
        week[column] = Some(DayCell {
            date,
            selectable: is_selectable(date, today, working_days),
            is_today: date == today,
        });
        column += 1;
        if column == 7 {
            weeks.push(week);
            week = [None; 7];
            column = 0;
        }
    }
    if column > 0 {
        weeks.push(week);
    }
    Some(MonthGrid { year, month, weeks })
}
