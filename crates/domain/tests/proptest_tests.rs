//! Property-based tests for recurrence expansion and the month grid
//!
//! These tests use proptest to verify invariants across many random inputs.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use domain::{
    entities::{EventItem, RecurrenceRule},
    month_grid::{GridFilter, MonthGrid, WeekStart, days_in_month},
    recurrence::{materialize, occurrence_dates},
    value_objects::{Priority, SeriesId, WeekdaySet},
};
use proptest::prelude::*;

fn any_date() -> impl Strategy<Value = NaiveDate> {
    (2000i32..2040, 1u32..=12, 1u32..=28)
        .prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

fn any_weekday_set() -> impl Strategy<Value = WeekdaySet> {
    proptest::collection::vec(0u8..7, 1..=7).prop_map(|days| {
        days.into_iter()
            .map(|d| Weekday::try_from(d).unwrap())
            .collect()
    })
}

fn any_week_start() -> impl Strategy<Value = WeekStart> {
    prop_oneof![Just(WeekStart::Sunday), Just(WeekStart::Monday)]
}

// ============================================================================
// Recurrence Property Tests
// ============================================================================

mod recurrence_tests {
    use super::*;

    proptest! {
        #[test]
        fn daily_rule_hits_every_nth_day(
            start in any_date(),
            span in 0i64..120,
            interval in 1u32..10
        ) {
            let end = start + Duration::days(span);
            let rule = RecurrenceRule::daily(start, end).with_interval(interval);
            let dates = occurrence_dates(&rule).unwrap();

            let expected: Vec<NaiveDate> = (0..=span)
                .step_by(interval as usize)
                .map(|offset| start + Duration::days(offset))
                .collect();
            prop_assert_eq!(dates, expected);
        }

        #[test]
        fn weekly_dates_respect_weekdays_and_interval(
            start in any_date(),
            span in 0i64..200,
            interval in 1u32..5,
            weekdays in any_weekday_set()
        ) {
            let end = start + Duration::days(span);
            let rule = RecurrenceRule::weekly(weekdays, start, end).with_interval(interval);

            for date in occurrence_dates(&rule).unwrap() {
                prop_assert!(date >= start && date <= end);
                prop_assert!(weekdays.contains(date.weekday()));
                let week = (date - start).num_days() / 7;
                prop_assert_eq!(week % i64::from(interval), 0);
            }
        }

        #[test]
        fn dates_are_strictly_increasing(
            start in any_date(),
            span in 0i64..400,
            weekdays in any_weekday_set()
        ) {
            let end = start + Duration::days(span);
            let rule = RecurrenceRule::weekly(weekdays, start, end);
            let dates = occurrence_dates(&rule).unwrap();
            prop_assert!(dates.windows(2).all(|pair| pair[0] < pair[1]));
        }

        #[test]
        fn clones_share_series_and_fields(
            start in any_date(),
            span in 0i64..60,
            raw_series in 1u64..1000
        ) {
            let end = start + Duration::days(span);
            let series = SeriesId::new(raw_series);
            let seed = EventItem::all_day("Seminar", start)
                .with_location("Room 4")
                .with_recurrence(RecurrenceRule::daily(start, end).with_series_id(series));

            let clones = materialize(&seed).unwrap();
            prop_assert_eq!(clones.len() as i64, span);
            for clone in &clones {
                prop_assert_ne!(clone.id, seed.id);
                prop_assert_ne!(clone.date, seed.date);
                prop_assert_eq!(clone.series_id(), Some(series));
                prop_assert_eq!(&clone.name, &seed.name);
                prop_assert_eq!(&clone.location, &seed.location);
            }
        }

        #[test]
        fn materializing_twice_gives_the_same_dates(
            start in any_date(),
            span in 0i64..90,
            weekdays in any_weekday_set()
        ) {
            let end = start + Duration::days(span);
            let seed = EventItem::all_day("Lab", start).with_recurrence(
                RecurrenceRule::weekly(weekdays, start, end).with_series_id(SeriesId::new(7)),
            );

            let first: Vec<_> = materialize(&seed).unwrap().into_iter().map(|e| e.date).collect();
            let second: Vec<_> = materialize(&seed).unwrap().into_iter().map(|e| e.date).collect();
            prop_assert_eq!(first, second);
        }
    }
}

// ============================================================================
// Month Grid Property Tests
// ============================================================================

mod month_grid_tests {
    use super::*;

    proptest! {
        #[test]
        fn grid_covers_month_in_whole_weeks(
            year in 1990i32..2100,
            month in 1u32..=12,
            week_start in any_week_start()
        ) {
            let grid = MonthGrid::layout(year, month, week_start).unwrap();
            let cells = grid.cells();

            prop_assert_eq!(cells.len() % 7, 0);
            prop_assert!(cells.len() >= 35 && cells.len() <= 42);
            prop_assert_eq!(cells[0].date.weekday(), week_start.columns()[0]);

            let inside = cells.iter().filter(|c| !c.is_outside_current_month).count();
            prop_assert_eq!(inside as u32, days_in_month(year, month).unwrap());
            prop_assert!(cells.windows(2).all(|w| w[1].date - w[0].date == Duration::days(1)));
        }

        #[test]
        fn every_visible_item_lands_in_its_cell(
            year in 2000i32..2040,
            month in 1u32..=12,
            offsets in proptest::collection::vec(0i64..42, 0..20)
        ) {
            let grid = MonthGrid::layout(year, month, WeekStart::Sunday).unwrap();
            let items: Vec<_> = offsets
                .iter()
                .map(|offset| {
                    let date = grid.first_visible() + Duration::days(*offset);
                    domain::PlannerItem::from(
                        domain::Assignment::new("Essay", date).with_priority(Priority::default()),
                    )
                })
                .filter(|item| item.date() <= grid.last_visible())
                .collect();

            let built = MonthGrid::build(year, month, WeekStart::Sunday, &items, &GridFilter::default())
                .unwrap();
            for item in &items {
                let cell = built.cell_for(item.date()).unwrap();
                prop_assert!(cell.items.contains(&item.id()));
            }
            let placed: usize = built.cells().iter().map(|c| c.items.len()).sum();
            prop_assert_eq!(placed, items.len());
        }
    }
}
