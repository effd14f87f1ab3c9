//! Argument types shared by several subcommands

use anyhow::{Context, bail};
use application::{PlannerState, parse_date, parse_time};
use chrono::{Datelike, NaiveDate, NaiveTime};
use clap::Args;
use domain::{
    CourseId, EventTiming, Frequency, ItemId, PlannerItem, RecurrenceRule, TermId, WeekdaySet,
};

/// Parse a date argument such as `2024-03-05`, `03/05/2024` or `tomorrow`
pub fn parse_date_arg(input: &str) -> Result<NaiveDate, String> {
    parse_date(input)
        .ok_or_else(|| format!("unrecognized date '{input}', use YYYY-MM-DD or MM/DD/YYYY"))
}

/// Parse a time argument such as `14:30` or `2:30 PM`
pub fn parse_time_arg(input: &str) -> Result<NaiveTime, String> {
    parse_time(input).ok_or_else(|| format!("unrecognized time '{input}', use HH:MM or h:mm AM/PM"))
}

/// Parse a weight such as `25` or `12.5%`
pub fn parse_weight_arg(input: &str) -> Result<f64, String> {
    input
        .trim()
        .trim_end_matches('%')
        .trim_end()
        .parse::<f64>()
        .map_err(|_| format!("unrecognized weight '{input}', use a percentage such as 25 or 12.5%"))
}

/// Start and end time of an event
#[derive(Debug, Default, Args)]
pub struct TimingArgs {
    /// Start time; the event is all-day without one
    #[arg(long, value_parser = parse_time_arg)]
    pub start: Option<NaiveTime>,

    /// End time (defaults to the start time)
    #[arg(long, value_parser = parse_time_arg, requires = "start")]
    pub end: Option<NaiveTime>,
}

impl TimingArgs {
    /// Timing given on the command line, if any
    pub fn timing(&self) -> anyhow::Result<Option<EventTiming>> {
        let Some(start) = self.start else {
            return Ok(None);
        };
        let end = self.end.unwrap_or(start);
        Ok(Some(EventTiming::timed(start, end)?))
    }
}

/// Repeat pattern of an event
#[derive(Debug, Default, Args)]
pub struct RepeatArgs {
    /// Repeat pattern: daily, weekly, monthly or yearly
    #[arg(long)]
    pub repeat: Option<Frequency>,

    /// Repeat every N days, weeks, months or years
    #[arg(long)]
    pub every: Option<u32>,

    /// Weekdays of a weekly pattern, e.g. `mon,wed` (defaults to the start day)
    #[arg(long)]
    pub on: Option<WeekdaySet>,

    /// Last day the pattern may fall on
    #[arg(long, value_parser = parse_date_arg)]
    pub until: Option<NaiveDate>,
}

impl RepeatArgs {
    /// Build the rule starting on `start`, or `None` when no pattern was given
    pub fn rule(&self, start: NaiveDate) -> anyhow::Result<Option<RecurrenceRule>> {
        let frequency = match self.repeat {
            Some(Frequency::None) => return Ok(None),
            Some(frequency) => frequency,
            None => {
                if self.every.is_some() || self.on.is_some() || self.until.is_some() {
                    bail!("--every, --on and --until only apply together with --repeat");
                }
                return Ok(None);
            },
        };
        let until = self.until.context("--until is required with --repeat")?;

        let mut rule =
            RecurrenceRule::new(frequency, start, until).with_interval(self.every.unwrap_or(1));
        if frequency == Frequency::Weekly {
            let days = self
                .on
                .filter(|days| !days.is_empty())
                .unwrap_or_else(|| WeekdaySet::empty().with(start.weekday()));
            rule = rule.with_weekdays(days);
        } else if self.on.is_some() {
            bail!("--on only applies to weekly patterns");
        }
        rule.validate()?;
        Ok(Some(rule))
    }
}

/// Find the item whose id starts with `raw`
///
/// Accepts a full id or any unambiguous prefix of its hex digits, such as
/// the eight digits printed by `list`.
pub fn resolve_item_id(state: &PlannerState, raw: &str) -> anyhow::Result<ItemId> {
    let needle = raw.trim().to_lowercase().replace('-', "");
    if needle.is_empty() {
        bail!("item id is empty");
    }

    let matches: Vec<ItemId> = state
        .items()
        .iter()
        .map(PlannerItem::id)
        .filter(|id| id.as_uuid().simple().to_string().starts_with(&needle))
        .collect();
    match matches.as_slice() {
        [id] => Ok(*id),
        [] => bail!("no item matches id '{raw}'"),
        _ => bail!(
            "id '{raw}' matches {} items, give more digits",
            matches.len()
        ),
    }
}

/// Find the entry named `raw`, or else the one whose id starts with it
fn resolve_named<T: Copy>(
    kind: &str,
    raw: &str,
    entries: impl Iterator<Item = (T, String, String)>,
) -> anyhow::Result<T> {
    let name = raw.trim();
    let needle = name.to_lowercase().replace('-', "");
    if needle.is_empty() {
        bail!("{kind} is empty");
    }

    let mut by_id = Vec::new();
    for (id, entry_name, simple_id) in entries {
        if entry_name.eq_ignore_ascii_case(name) {
            return Ok(id);
        }
        if simple_id.starts_with(&needle) {
            by_id.push(id);
        }
    }
    match by_id.as_slice() {
        [id] => Ok(*id),
        [] => bail!("no {kind} is named '{raw}'"),
        _ => bail!("'{raw}' matches {} {kind}s, give the name or more digits", by_id.len()),
    }
}

/// Find a term by name or id prefix
pub fn resolve_term(state: &PlannerState, raw: &str) -> anyhow::Result<TermId> {
    resolve_named(
        "term",
        raw,
        state
            .terms()
            .iter()
            .map(|t| (t.id, t.name.clone(), t.id.as_uuid().simple().to_string())),
    )
}

/// Find a course by name or id prefix
///
/// Two terms may each have a course of the same name; the first one added wins.
pub fn resolve_course(state: &PlannerState, raw: &str) -> anyhow::Result<CourseId> {
    resolve_named(
        "course",
        raw,
        state
            .courses()
            .iter()
            .map(|c| (c.id, c.name.clone(), c.id.as_uuid().simple().to_string())),
    )
}

#[cfg(test)]
mod tests {
    use chrono::Weekday;
    use domain::{Assignment, Course, EventItem, Term};

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn date_arg_accepts_iso_and_us_formats() {
        assert_eq!(parse_date_arg("2024-03-05"), Ok(date(2024, 3, 5)));
        assert_eq!(parse_date_arg("03/05/2024"), Ok(date(2024, 3, 5)));
        assert!(parse_date_arg("the fifth of never").is_err());
    }

    #[test]
    fn time_arg_accepts_both_clocks() {
        assert_eq!(parse_time_arg("14:30"), Ok(time(14, 30)));
        assert_eq!(parse_time_arg("2:30 PM"), Ok(time(14, 30)));
        assert!(parse_time_arg("25:99").is_err());
    }

    #[test]
    fn timing_without_start_is_unset() {
        assert_eq!(TimingArgs::default().timing().unwrap(), None);
    }

    #[test]
    fn timing_end_defaults_to_start() {
        let args = TimingArgs {
            start: Some(time(9, 0)),
            end: None,
        };
        assert_eq!(
            args.timing().unwrap(),
            Some(EventTiming::Timed {
                start: time(9, 0),
                end: time(9, 0)
            })
        );
    }

    #[test]
    fn timing_rejects_end_before_start() {
        let args = TimingArgs {
            start: Some(time(10, 0)),
            end: Some(time(9, 0)),
        };
        assert!(args.timing().is_err());
    }

    #[test]
    fn no_repeat_means_no_rule() {
        assert!(RepeatArgs::default().rule(date(2024, 1, 1)).unwrap().is_none());
    }

    #[test]
    fn repeat_flags_without_pattern_are_rejected() {
        let args = RepeatArgs {
            until: Some(date(2024, 2, 1)),
            ..RepeatArgs::default()
        };
        assert!(args.rule(date(2024, 1, 1)).is_err());
    }

    #[test]
    fn repeat_requires_until() {
        let args = RepeatArgs {
            repeat: Some(Frequency::Daily),
            ..RepeatArgs::default()
        };
        assert!(args.rule(date(2024, 1, 1)).is_err());
    }

    #[test]
    fn weekly_defaults_to_start_weekday() {
        let args = RepeatArgs {
            repeat: Some(Frequency::Weekly),
            until: Some(date(2024, 1, 31)),
            ..RepeatArgs::default()
        };
        let rule = args.rule(date(2024, 1, 3)).unwrap().unwrap();
        assert_eq!(rule.weekdays, WeekdaySet::empty().with(Weekday::Wed));
        assert_eq!(rule.interval, 1);
    }

    #[test]
    fn weekly_with_days_and_interval() {
        let args = RepeatArgs {
            repeat: Some(Frequency::Weekly),
            every: Some(2),
            on: Some("mon,wed".parse().unwrap()),
            until: Some(date(2024, 1, 31)),
        };
        let rule = args.rule(date(2024, 1, 1)).unwrap().unwrap();
        assert_eq!(rule.interval, 2);
        assert!(rule.weekdays.contains(Weekday::Mon));
        assert!(rule.weekdays.contains(Weekday::Wed));
    }

    #[test]
    fn weekdays_rejected_for_monthly() {
        let args = RepeatArgs {
            repeat: Some(Frequency::Monthly),
            on: Some("mon".parse().unwrap()),
            until: Some(date(2024, 6, 1)),
            ..RepeatArgs::default()
        };
        assert!(args.rule(date(2024, 1, 1)).is_err());
    }

    #[test]
    fn until_before_start_is_malformed() {
        let args = RepeatArgs {
            repeat: Some(Frequency::Daily),
            until: Some(date(2023, 12, 1)),
            ..RepeatArgs::default()
        };
        assert!(args.rule(date(2024, 1, 1)).is_err());
    }

    #[test]
    fn resolve_full_and_short_ids() {
        let mut state = PlannerState::new();
        let essay = state.insert(Assignment::new("Essay", date(2024, 3, 1)));
        state.insert(EventItem::all_day("Exam", date(2024, 3, 2)));

        assert_eq!(resolve_item_id(&state, &essay.to_string()).unwrap(), essay);
        assert_eq!(resolve_item_id(&state, &essay.short()).unwrap(), essay);
        assert_eq!(
            resolve_item_id(&state, &essay.short().to_uppercase()).unwrap(),
            essay
        );
    }

    #[test]
    fn resolve_rejects_unknown_and_ambiguous_ids() {
        let mut state = PlannerState::new();
        for raw in [
            "7c9e6679-7425-40de-944b-e07fc1f90ae7",
            "7c9e1111-7425-40de-944b-e07fc1f90ae7",
        ] {
            let mut essay = Assignment::new("Essay", date(2024, 3, 1));
            essay.id = ItemId::parse(raw).unwrap();
            state.insert(essay);
        }

        assert!(resolve_item_id(&state, "  ").is_err());
        assert!(resolve_item_id(&state, "0000").is_err());
        assert!(resolve_item_id(&state, "7c9e").is_err());
        assert!(resolve_item_id(&state, "7c9e66").is_ok());
    }

    #[test]
    fn weight_arg_accepts_percent_sign() {
        assert_eq!(parse_weight_arg("25"), Ok(25.0));
        assert_eq!(parse_weight_arg("12.5%"), Ok(12.5));
        assert!(parse_weight_arg("a lot").is_err());
    }

    #[test]
    fn courses_resolve_by_name_or_id() {
        let mut state = PlannerState::new();
        let fall = Term::new("Fall", date(2024, 8, 26), date(2024, 12, 13)).unwrap();
        let term = state.push_term(fall);
        let chem = state.push_course(Course::new("CHEM 101", term));
        state.push_course(Course::new("HIST 210", term));

        assert_eq!(resolve_term(&state, "fall").unwrap(), term);
        assert_eq!(resolve_course(&state, "chem 101").unwrap(), chem);
        assert_eq!(resolve_course(&state, &chem.short()).unwrap(), chem);
        assert!(resolve_course(&state, "BIO 1").is_err());
        assert!(resolve_course(&state, "").is_err());
    }
}
