mod grid;
mod slot;

use chrono::{Datelike, Days, Months, NaiveDate};

pub use grid::{DayCell, MonthGrid, WorkingDays, is_selectable, month_grid};
pub use slot::{Slot, TimeOfDay};

pub const DEFAULT_MAX_SLOTS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmOutcome {
    Confirmed,
    /// The slot already exists; the list is unchanged.
    Duplicate,
    CapacityReached,
    /// Date or time of day missing.
    Incomplete,
}

/// Booking calendar: a display cursor, the in-progress date/time choice and
/// the confirmed slot list.
#[derive(Debug, Clone)]
pub struct CalendarState {
    year: i32,
    month: u32,
    selected_date: Option<NaiveDate>,
    selected_time: Option<TimeOfDay>,
    slots: Vec<Slot>,
    max_slots: usize,
    working_days: WorkingDays,
}

impl CalendarState {
    pub fn new(today: NaiveDate, working_days: WorkingDays, max_slots: usize) -> Self {
        Self {
            year: today.year(),
            month: today.month(),
            selected_date: None,
            selected_time: None,
            slots: Vec::new(),
            max_slots: max_slots.max(1),
            working_days,
        }
    }

    pub fn cursor(&self) -> (i32, u32) {
        (self.year, self.month)
    }

    pub fn selected_date(&self) -> Option<NaiveDate> {
        self.selected_date
    }

    pub fn selected_time(&self) -> Option<TimeOfDay> {
        self.selected_time
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn max_slots(&self) -> usize {
        self.max_slots
    }

    pub fn working_days(&self) -> WorkingDays {
        self.working_days
    }

    pub fn is_at_capacity(&self) -> bool {
        self.slots.len() >= self.max_slots
    }

    pub fn time_choices_enabled(&self) -> bool {
        self.selected_date.is_some()
    }

    pub fn grid(&self, today: NaiveDate) -> Option<MonthGrid> {
        month_grid(self.year, self.month, today, self.working_days)
    }

    /// Moves the displayed month only.
    pub fn navigate_month(&mut self, delta: i32) {
        let index = self.year * 12 + self.month as i32 - 1 + delta;
        self.year = index.div_euclid(12);
        self.month = index.rem_euclid(12) as u32 + 1;
    }

    /// Past and non-working dates are inert and return `false`.
    pub fn select_date(&mut self, date: NaiveDate, today: NaiveDate) -> bool {
        if !is_selectable(date, today, self.working_days) {
            return false;
        }
        self.selected_date = Some(date);
        self.selected_time = None;
        self.year = date.year();
        self.month = date.month();
        true
    }

    pub fn select_time(&mut self, time: TimeOfDay) -> bool {
        if self.selected_date.is_none() {
            return false;
        }
        self.selected_time = Some(time);
        true
    }

    pub fn confirm_slot(&mut self) -> ConfirmOutcome {
        let (Some(date), Some(time)) = (self.selected_date, self.selected_time) else {
            return ConfirmOutcome::Incomplete;
        };
        let slot = Slot::new(date, time);
        if self.slots.contains(&slot) {
            return ConfirmOutcome::Duplicate;
        }
        if self.is_at_capacity() {
            return ConfirmOutcome::CapacityReached;
        }
        self.slots.push(slot);
        self.selected_time = None;
        ConfirmOutcome::Confirmed
    }

    pub fn remove_slot(&mut self, slot_id: &str) -> bool {
        let before = self.slots.len();
        self.slots.retain(|slot| slot.id() != slot_id);
        self.slots.len() != before
    }

    /// Nearest selectable date `step` days at a time from `from`, looking at
    /// most a year ahead or back.
    pub fn step_selectable(&self, from: NaiveDate, step: i64, today: NaiveDate) -> Option<NaiveDate> {
        if step == 0 {
            return None;
        }
        let mut current = from;
        for _ in 0..366 {
            current = if step > 0 {
                current.checked_add_days(Days::new(step as u64))?
            } else {
                current.checked_sub_days(Days::new(step.unsigned_abs()))?
            };
            if current < today {
                return None;
            }
            if is_selectable(current, today, self.working_days) {
                return Some(current);
            }
        }
        None
    }

    /// First selectable date of the displayed month.
    pub fn first_selectable_in_view(&self, today: NaiveDate) -> Option<NaiveDate> {
        let first = NaiveDate::from_ymd_opt(self.year, self.month, 1)?;
        let next = first.checked_add_months(Months::new(1))?;
        first
            .iter_days()
            .take_while(|date| *date < next)
            .find(|date| is_selectable(*date, today, self.working_days))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("date")
    }

    fn today() -> NaiveDate {
        date(2026, 10, 14)
    }

    fn calendar() -> CalendarState {
        CalendarState::new(today(), WorkingDays::weekdays(), DEFAULT_MAX_SLOTS)
    }

    fn book(calendar: &mut CalendarState, day: NaiveDate, time: TimeOfDay) -> ConfirmOutcome {
        assert!(calendar.select_date(day, today()));
        assert!(calendar.select_time(time));
        calendar.confirm_slot()
    }

    #[test]
    fn five_slots_fit_and_sixth_is_rejected() {
        let mut cal = calendar();
        let dates = [14, 15, 16, 19, 20];
        for d in dates {
            assert_eq!(book(&mut cal, date(2026, 10, d), TimeOfDay::Morning), ConfirmOutcome::Confirmed);
        }
        assert!(cal.is_at_capacity());
        assert_eq!(
            book(&mut cal, date(2026, 10, 21), TimeOfDay::Morning),
            ConfirmOutcome::CapacityReached
        );
        assert_eq!(cal.slots().len(), 5);

        assert!(cal.remove_slot("2026-10-15-morning"));
        assert!(!cal.is_at_capacity());
        assert!(!cal.remove_slot("2026-10-15-morning"));
    }

    #[test]
    fn duplicate_confirmation_stores_one_slot() {
        let mut cal = calendar();
        let day = date(2026, 10, 19);
        assert_eq!(book(&mut cal, day, TimeOfDay::Afternoon), ConfirmOutcome::Confirmed);
        assert_eq!(book(&mut cal, day, TimeOfDay::Afternoon), ConfirmOutcome::Duplicate);
        assert_eq!(cal.slots().len(), 1);
        assert_eq!(cal.slots()[0].id(), "2026-10-19-afternoon");
    }

    #[test]
    fn confirmation_keeps_date_and_clears_time() {
        let mut cal = calendar();
        let day = date(2026, 10, 19);
        book(&mut cal, day, TimeOfDay::Morning);
        assert_eq!(cal.selected_date(), Some(day));
        assert_eq!(cal.selected_time(), None);
        assert_eq!(cal.confirm_slot(), ConfirmOutcome::Incomplete);
        assert!(cal.select_time(TimeOfDay::Afternoon));
        assert_eq!(cal.confirm_slot(), ConfirmOutcome::Confirmed);
        assert_eq!(cal.slots().len(), 2);
    }

    #[test]
    fn inert_dates_leave_state_untouched() {
        let mut cal = calendar();
        assert!(!cal.select_time(TimeOfDay::Morning), "no date yet");
        assert!(!cal.select_date(date(2026, 10, 13), today()));
        assert!(!cal.select_date(date(2026, 10, 17), today()));
        assert_eq!(cal.selected_date(), None);
        assert!(!cal.time_choices_enabled());
    }

    #[test]
    fn selecting_a_new_date_resets_time() {
        let mut cal = calendar();
        cal.select_date(date(2026, 10, 19), today());
        cal.select_time(TimeOfDay::Morning);
        cal.select_date(date(2026, 10, 20), today());
        assert_eq!(cal.selected_time(), None);
    }

    #[test]
    fn month_navigation_wraps_years_without_touching_selection() {
        let mut cal = calendar();
        cal.select_date(date(2026, 10, 19), today());
        cal.navigate_month(3);
        assert_eq!(cal.cursor(), (2027, 1));
        cal.navigate_month(-13);
        assert_eq!(cal.cursor(), (2025, 12));
        assert_eq!(cal.selected_date(), Some(date(2026, 10, 19)));
    }

    #[test]
    fn stepping_skips_weekends_and_past_days() {
        let cal = calendar();
        let friday = date(2026, 10, 16);
        assert_eq!(cal.step_selectable(friday, 1, today()), Some(date(2026, 10, 19)));
        assert_eq!(cal.step_selectable(today(), -1, today()), None);
        assert_eq!(cal.step_selectable(today(), 7, today()), Some(date(2026, 10, 21)));
        assert_eq!(cal.first_selectable_in_view(today()), Some(today()));
    }
}
