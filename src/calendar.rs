use chrono::{Datelike, NaiveDate, Weekday};

pub const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Short name for a 1-based month number.
pub fn month_name(month: u32) -> &'static str {
    MONTH_NAMES[(month.clamp(1, 12) - 1) as usize]
}

// ─── Day cells ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Today,
    Sunday,
    Past,
    Future,
}

impl Classification {
    /// Classify `date` against `today` at day granularity.
    ///
    /// Today always wins; a Sunday that already passed is just `Past`.
    pub fn of(date: NaiveDate, today: NaiveDate) -> Self {
        let diff = date.signed_duration_since(today).num_days();
        if diff == 0 {
            Self::Today
        } else if diff < 0 {
            Self::Past
        } else if date.weekday() == Weekday::Sun {
            Self::Sunday
        } else {
            Self::Future
        }
    }

    pub fn class_name(self) -> &'static str {
        match self {
            Self::Today => "today",
            Self::Sunday => "sunday",
            Self::Past => "past",
            Self::Future => "future",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayCell {
    pub date: NaiveDate,
    pub classification: Classification,
    /// Full date shown by the hover tooltip, e.g. `Thu, Oct 15, 2026`.
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthBlock {
    /// 1-based month number.
    pub month: u32,
    pub cells: Vec<DayCell>,
}

impl MonthBlock {
    pub fn name(&self) -> &'static str {
        month_name(self.month)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearView {
    pub year: i32,
    pub months: Vec<MonthBlock>,
}

impl YearView {
    pub fn cells(&self) -> impl Iterator<Item = &DayCell> {
        self.months.iter().flat_map(|m| m.cells.iter())
    }
}

// ─── Aggregates ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aggregates {
    pub remaining_days_in_year: i64,
    pub total_days_in_year: i64,
    pub remaining_days_in_month: i64,
    /// Percentage of the year left, one fractional digit.
    pub percent_remaining: String,
}

// ─── Date arithmetic ────────────────────────────────────────────────────────

/// Last day of `month` in `year`, i.e. the day before the first of the next month.
pub fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)?.pred_opt()
}

pub fn format_label(date: NaiveDate) -> String {
    date.format("%a, %b %-d, %Y").to_string()
}

/// Build the full 12-month view of `year`, classifying every day against `today`.
pub fn year_view(year: i32, today: NaiveDate) -> YearView {
    let months = (1..=12)
        .map(|month| {
            let last = last_day_of_month(year, month).map_or(0, |d| d.day());
            let cells = (1..=last)
                .filter_map(|day| NaiveDate::from_ymd_opt(year, month, day))
                .map(|date| DayCell {
                    date,
                    classification: Classification::of(date, today),
                    label: format_label(date),
                })
                .collect();
            MonthBlock { month, cells }
        })
        .collect();

    YearView { year, months }
}

/// Remaining and total day counts for the year and month containing `today`.
/// Both remaining counts include today itself.
pub fn aggregates(today: NaiveDate) -> Aggregates {
    let year = today.year();
    let year_start = NaiveDate::from_ymd_opt(year, 1, 1).unwrap_or(today);
    let year_end = NaiveDate::from_ymd_opt(year, 12, 31).unwrap_or(today);
    let month_end = last_day_of_month(year, today.month()).unwrap_or(today);

    let remaining_year = (year_end.signed_duration_since(today).num_days() + 1).max(0);
    let total = year_end.signed_duration_since(year_start).num_days() + 1;
    let remaining_month = (month_end.signed_duration_since(today).num_days() + 1).max(0);
    let percent = remaining_year as f64 / total as f64 * 100.0;

    Aggregates {
        remaining_days_in_year: remaining_year,
        total_days_in_year: total,
        remaining_days_in_month: remaining_month,
        percent_remaining: format!("{percent:.1}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn twelve_months_with_canonical_lengths() {
        let leap = year_view(2024, date(2024, 6, 1));
        let common = year_view(2023, date(2023, 6, 1));

        assert_eq!(leap.months.len(), 12);
        assert_eq!(common.months.len(), 12);

        let lens = |v: &YearView| v.months.iter().map(|m| m.cells.len()).collect::<Vec<_>>();
        assert_eq!(
            lens(&leap),
            vec![31, 29, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31]
        );
        assert_eq!(
            lens(&common),
            vec![31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31]
        );
    }

    #[test]
    fn months_carry_their_days_in_order() {
        let view = year_view(2025, date(2025, 3, 3));
        for block in &view.months {
            for (i, cell) in block.cells.iter().enumerate() {
                assert_eq!(cell.date.month(), block.month);
                assert_eq!(cell.date.day() as usize, i + 1);
            }
        }
        assert_eq!(view.months[1].name(), "Feb");
    }

    #[test]
    fn exactly_one_today() {
        for today in [date(2025, 1, 1), date(2025, 7, 13), date(2024, 2, 29), date(2025, 12, 31)] {
            let view = year_view(today.year(), today);
            let todays: Vec<_> = view
                .cells()
                .filter(|c| c.classification == Classification::Today)
                .collect();
            assert_eq!(todays.len(), 1);
            assert_eq!(todays[0].date, today);
        }
    }

    #[test]
    fn today_wins_over_sunday() {
        // 2025-06-15 is a Sunday.
        let today = date(2025, 6, 15);
        assert_eq!(today.weekday(), Weekday::Sun);
        assert_eq!(Classification::of(today, today), Classification::Today);
    }

    #[test]
    fn past_sundays_are_past_and_future_sundays_are_sunday() {
        let today = date(2025, 6, 15);
        assert_eq!(Classification::of(date(2025, 6, 8), today), Classification::Past);
        assert_eq!(Classification::of(date(2025, 6, 22), today), Classification::Sunday);
        assert_eq!(Classification::of(date(2025, 6, 16), today), Classification::Future);
        assert_eq!(Classification::of(date(2025, 6, 14), today), Classification::Past);
    }

    #[test]
    fn past_and_future_partition_the_rest() {
        let today = date(2025, 10, 15);
        let view = year_view(2025, today);
        for cell in view.cells() {
            match cell.classification {
                Classification::Today => assert_eq!(cell.date, today),
                Classification::Past => assert!(cell.date < today),
                Classification::Future => {
                    assert!(cell.date > today);
                    assert_ne!(cell.date.weekday(), Weekday::Sun);
                }
                Classification::Sunday => {
                    assert!(cell.date > today);
                    assert_eq!(cell.date.weekday(), Weekday::Sun);
                }
            }
        }
    }

    #[test]
    fn labels_are_full_dates() {
        let view = year_view(2026, date(2026, 10, 15));
        assert_eq!(view.months[9].cells[14].label, "Thu, Oct 15, 2026");
        assert_eq!(view.months[0].cells[0].label, "Thu, Jan 1, 2026");
    }

    #[test]
    fn remaining_days_at_year_edges() {
        let jan1 = aggregates(date(2025, 1, 1));
        assert_eq!(jan1.remaining_days_in_year, 365);
        assert_eq!(jan1.percent_remaining, "100.0");
        assert_eq!(jan1.remaining_days_in_month, 31);

        let dec31 = aggregates(date(2025, 12, 31));
        assert_eq!(dec31.remaining_days_in_year, 1);
        assert_eq!(dec31.remaining_days_in_month, 1);
        assert_eq!(dec31.percent_remaining, "0.3");
    }

    #[test]
    fn total_days_follow_leap_years() {
        assert_eq!(aggregates(date(2024, 5, 5)).total_days_in_year, 366);
        assert_eq!(aggregates(date(2028, 5, 5)).total_days_in_year, 366);
        assert_eq!(aggregates(date(2023, 5, 5)).total_days_in_year, 365);
        assert_eq!(aggregates(date(2025, 5, 5)).total_days_in_year, 365);
    }

    #[test]
    fn month_remaining_in_february() {
        assert_eq!(aggregates(date(2024, 2, 1)).remaining_days_in_month, 29);
        assert_eq!(aggregates(date(2023, 2, 28)).remaining_days_in_month, 1);
    }

    #[test]
    fn percentage_mid_year() {
        // 2026-10-15: 78 days left of 365 -> 21.369...
        let agg = aggregates(date(2026, 10, 15));
        assert_eq!(agg.remaining_days_in_year, 78);
        assert_eq!(agg.percent_remaining, "21.4");
    }
}
