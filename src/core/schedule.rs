//! Date arithmetic for recurring schedules.
//!
//! Monthly and yearly steps use calendar months. When the anchor day does not
//! exist in the target month the result is clamped to that month's last day,
//! so 2024-01-31 advances to 2024-02-29 and 2024-02-29 advances a year to
//! 2025-02-28. The clamp is not undone later: a definition that rolled from
//! Jan 31 to Feb 29 continues on the 29th.

use crate::{
    entities::Frequency,
    errors::{Error, Result},
};
use chrono::{Days, Months, NaiveDate};

/// Returns the occurrence that follows `date` for the given frequency.
///
/// # Errors
/// Returns `DateOutOfRange` if the result is not representable.
pub fn advance(date: NaiveDate, frequency: Frequency) -> Result<NaiveDate> {
    let next = match frequency {
        Frequency::Weekly => date.checked_add_days(Days::new(7)),
        Frequency::Monthly => date.checked_add_months(Months::new(1)),
        Frequency::Yearly => date.checked_add_months(Months::new(12)),
    };

    next.ok_or(Error::DateOutOfRange { date, frequency })
}

/// Counts the occurrences that have come due by `today` and not been materialized.
///
/// Zero when unscheduled or not yet due; otherwise the occurrence at `next_due`
/// plus every later one that is also on or before `today`.
#[must_use]
pub fn pending_occurrences(
    next_due: Option<NaiveDate>,
    today: NaiveDate,
    frequency: Frequency,
) -> u32 {
    let Some(mut due) = next_due else {
        return 0;
    };

    let mut count = 0;
    while due <= today {
        count += 1;
        match advance(due, frequency) {
            Ok(next) => due = next,
            Err(_) => break,
        }
    }
    count
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_advance_weekly() {
        assert_eq!(
            advance(date(2024, 1, 1), Frequency::Weekly).unwrap(),
            date(2024, 1, 8)
        );
        assert_eq!(
            advance(date(2024, 12, 28), Frequency::Weekly).unwrap(),
            date(2025, 1, 4)
        );
    }

    #[test]
    fn test_advance_monthly_same_day() {
        assert_eq!(
            advance(date(2024, 3, 15), Frequency::Monthly).unwrap(),
            date(2024, 4, 15)
        );
        assert_eq!(
            advance(date(2024, 12, 5), Frequency::Monthly).unwrap(),
            date(2025, 1, 5)
        );
    }

    #[test]
    fn test_advance_monthly_clamps_to_month_end() {
        assert_eq!(
            advance(date(2024, 1, 31), Frequency::Monthly).unwrap(),
            date(2024, 2, 29)
        );
        assert_eq!(
            advance(date(2023, 1, 31), Frequency::Monthly).unwrap(),
            date(2023, 2, 28)
        );
        assert_eq!(
            advance(date(2024, 3, 31), Frequency::Monthly).unwrap(),
            date(2024, 4, 30)
        );
    }

    #[test]
    fn test_advance_yearly() {
        assert_eq!(
            advance(date(2024, 6, 1), Frequency::Yearly).unwrap(),
            date(2025, 6, 1)
        );
        assert_eq!(
            advance(date(2024, 2, 29), Frequency::Yearly).unwrap(),
            date(2025, 2, 28)
        );
    }

    #[test]
    fn test_advance_out_of_range() {
        let result = advance(NaiveDate::MAX, Frequency::Weekly);
        assert!(matches!(
            result,
            Err(Error::DateOutOfRange {
                frequency: Frequency::Weekly,
                ..
            })
        ));
    }

    #[test]
    fn test_pending_occurrences() {
        let today = date(2024, 1, 22);
        assert_eq!(pending_occurrences(None, today, Frequency::Weekly), 0);
        assert_eq!(
            pending_occurrences(Some(date(2024, 1, 23)), today, Frequency::Weekly),
            0
        );
        assert_eq!(
            pending_occurrences(Some(today), today, Frequency::Weekly),
            1
        );
        // Jan 1, 8, 15, 22
        assert_eq!(
            pending_occurrences(Some(date(2024, 1, 1)), today, Frequency::Weekly),
            4
        );
        assert_eq!(
            pending_occurrences(Some(date(2023, 10, 22)), today, Frequency::Monthly),
            4
        );
    }

    fn frequency_strategy() -> impl Strategy<Value = Frequency> {
        prop_oneof![
            Just(Frequency::Weekly),
            Just(Frequency::Monthly),
            Just(Frequency::Yearly),
        ]
    }

    fn date_strategy() -> impl Strategy<Value = NaiveDate> {
        (1900i32..2200, 1u32..=12, 1u32..=31).prop_filter_map("valid date", |(y, m, d)| {
            NaiveDate::from_ymd_opt(y, m, d)
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(256))]

        #[test]
        fn prop_advance_is_strictly_increasing(
            start in date_strategy(),
            frequency in frequency_strategy(),
        ) {
            let next = advance(start, frequency).unwrap();
            prop_assert!(next > start);
        }

        #[test]
        fn prop_weekly_advance_is_seven_days(start in date_strategy()) {
            let next = advance(start, Frequency::Weekly).unwrap();
            prop_assert_eq!((next - start).num_days(), 7);
        }
    }
}
