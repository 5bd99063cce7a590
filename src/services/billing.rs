use chrono::{Datelike, Duration, NaiveDate};

/// One 30-day attendance window. Windows repeat from the first-ever
/// attendance date; they are not calendar months.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleWindow {
    pub start: NaiveDate,
    /// Exclusive.
    pub end: NaiveDate,
    pub index: i64,
}

impl CycleWindow {
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date < self.end
    }
}

/// The window containing `today`, anchored at `first_attendance`.
/// index = floor(days-since-first / 30).
pub fn current_cycle(first_attendance: NaiveDate, today: NaiveDate) -> CycleWindow {
    let days_since_first = (today - first_attendance).num_days().max(0);
    let index = days_since_first / 30;
    let start = first_attendance + Duration::days(index * 30);
    CycleWindow {
        start,
        end: start + Duration::days(30),
        index,
    }
}

/// Count of attendance dates falling in the current window. The earliest
/// date in the slice anchors the cycle.
pub fn meals_in_current_cycle(dates: &[NaiveDate], today: NaiveDate) -> i64 {
    let Some(first) = dates.iter().min().copied() else {
        return 0;
    };
    let window = current_cycle(first, today);
    dates.iter().filter(|d| window.contains(**d)).count() as i64
}

/// estimated bill = (meals in the rolling 30-day cycle minus leaves approved
/// in the current *calendar* month) times the per-meal rate. Attendance uses
/// the rolling window while the leave deduction uses the calendar month;
/// leaves can push the estimate negative. Neither side is clamped.
pub fn estimated_bill(cycle_meals: i64, monthly_approved_leaves: i64, rate: i64) -> i64 {
    (cycle_meals - monthly_approved_leaves) * rate
}

/// [first day of month, first day of next month) around `today`.
pub fn calendar_month_bounds(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let start = NaiveDate::from_ymd_opt(today.year(), today.month(), 1)
        .expect("first of month is always valid");
    let end = if today.month() == 12 {
        NaiveDate::from_ymd_opt(today.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(today.year(), today.month() + 1, 1)
    }
    .expect("first of month is always valid");
    (start, end)
}

/// Billing-month label, e.g. "August 2026".
pub fn month_label(date: NaiveDate) -> String {
    date.format("%B %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn first_window_spans_thirty_days() {
        let first = d(2026, 1, 1);
        let w = current_cycle(first, d(2026, 1, 15));
        assert_eq!(w.index, 0);
        assert_eq!(w.start, d(2026, 1, 1));
        assert_eq!(w.end, d(2026, 1, 31));
        assert!(w.contains(d(2026, 1, 1)));
        assert!(w.contains(d(2026, 1, 30)));
        assert!(!w.contains(d(2026, 1, 31)));
    }

    #[test]
    fn windows_roll_over_every_thirty_days() {
        // Attendance on days 1, 15, 31, 40 relative to a day-1 first attendance:
        // days 1 and 15 belong to window 0; days 31 and 40 to window 1.
        let first = d(2026, 1, 1);
        let dates = [d(2026, 1, 1), d(2026, 1, 15), d(2026, 1, 31), d(2026, 2, 9)];

        let w0 = current_cycle(first, d(2026, 1, 15));
        assert_eq!(w0.index, 0);
        assert_eq!(
            dates.iter().filter(|x| w0.contains(**x)).count(),
            2,
            "window 0 holds days 1 and 15"
        );

        let w1 = current_cycle(first, d(2026, 2, 9));
        assert_eq!(w1.index, 1);
        assert_eq!(w1.start, d(2026, 1, 31));
        assert_eq!(
            dates.iter().filter(|x| w1.contains(**x)).count(),
            2,
            "window 1 holds days 31 and 40"
        );
    }

    #[test]
    fn meals_in_cycle_anchor_on_earliest_date() {
        let dates = [d(2026, 1, 1), d(2026, 1, 15), d(2026, 1, 31), d(2026, 2, 9)];
        assert_eq!(meals_in_current_cycle(&dates, d(2026, 1, 15)), 2);
        assert_eq!(meals_in_current_cycle(&dates, d(2026, 2, 9)), 2);
        assert_eq!(meals_in_current_cycle(&[], d(2026, 2, 9)), 0);
    }

    #[test]
    fn bill_is_meals_minus_leaves_times_rate() {
        assert_eq!(estimated_bill(10, 2, 80), 640);
        assert_eq!(estimated_bill(0, 0, 80), 0);
        // The estimate is not clamped at zero.
        assert_eq!(estimated_bill(1, 3, 80), -160);
    }

    #[test]
    fn month_bounds_and_label() {
        assert_eq!(
            calendar_month_bounds(d(2026, 8, 7)),
            (d(2026, 8, 1), d(2026, 9, 1))
        );
        assert_eq!(
            calendar_month_bounds(d(2026, 12, 31)),
            (d(2026, 12, 1), d(2027, 1, 1))
        );
        assert_eq!(month_label(d(2026, 8, 7)), "August 2026");
    }
}
