//! Academic planner CLI
//!
//! Shows month grids and edits the assignments and events kept in the
//! planner backup file.

#![allow(clippy::print_stdout)]

mod args;
mod render;

use std::{path::PathBuf, sync::Arc};

use anyhow::Context;
use application::{
    CommandOutcome, MonthView, PlannerService, PlannerState, SharedPlannerState, load_state,
};
use args::{
    RepeatArgs, TimingArgs, parse_date_arg, parse_time_arg, parse_weight_arg, resolve_course,
    resolve_item_id, resolve_term,
};
use chrono::{Datelike, Days, Local, NaiveDate, NaiveTime};
use clap::{Parser, Subcommand};
use domain::{
    Assignment, AssignmentType, Course, EventEdit, EventItem, EventTiming, PlannerCommand,
    Priority, SeriesScope, Term, ViewFilter, WeekStart,
};
use infrastructure::{JsonFileItemStore, PlannerConfig, SaveWorker, init_logging};
use tracing::debug;

/// Days shown by `list` when no end date is given
const DEFAULT_LIST_DAYS: u64 = 14;

/// Academic planner CLI
#[derive(Debug, Parser)]
#[command(name = "planner-cli")]
#[command(author, version, about = "Academic planner calendar", long_about = None)]
struct Cli {
    /// Verbosity level
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Configuration file (defaults to planner.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Backup file, overriding the configured path
    #[arg(short, long, global = true)]
    backup: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Show a month grid and its agenda
    Month {
        /// Year (defaults to the current year)
        #[arg(short, long)]
        year: Option<i32>,

        /// Month 1-12 (defaults to the current month)
        #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=12))]
        month: Option<u32>,

        /// First column: sunday or monday
        #[arg(long)]
        week_start: Option<WeekStart>,

        /// Items to show: all, assignments or events
        #[arg(long)]
        filter: Option<ViewFilter>,

        /// Leave finished assignments off the grid
        #[arg(long)]
        hide_completed: bool,
    },

    /// List items between two dates
    List {
        /// First day (defaults to today)
        #[arg(long, value_parser = parse_date_arg)]
        from: Option<NaiveDate>,

        /// Last day (defaults to two weeks after the first)
        #[arg(long, value_parser = parse_date_arg)]
        to: Option<NaiveDate>,
    },

    /// Add an event, optionally repeating
    ///
    /// Example: planner-cli add-event Lecture 2024-01-01 --start 9:00 --end 10:15
    /// --repeat weekly --on mon,wed --until 2024-05-01
    AddEvent {
        /// Event name
        name: String,

        /// Day of the event (first day of a repeating event)
        #[arg(value_parser = parse_date_arg)]
        date: NaiveDate,

        #[command(flatten)]
        timing: TimingArgs,

        #[arg(long)]
        category: Option<String>,

        #[arg(long)]
        location: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[command(flatten)]
        repeat: RepeatArgs,
    },

    /// Add an assignment
    AddAssignment {
        /// Assignment name
        name: String,

        /// Due date
        #[arg(value_parser = parse_date_arg)]
        due: NaiveDate,

        /// Due time
        #[arg(long, value_parser = parse_time_arg)]
        time: Option<NaiveTime>,

        /// Course the assignment belongs to, by name or id
        #[arg(long)]
        course: Option<String>,

        /// Assignment type within the course, such as Exams
        #[arg(long = "type", requires = "course")]
        assignment_type: Option<String>,

        /// Priority from 1 (lowest) to 5 (highest)
        #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u8).range(1..=5))]
        priority: u8,

        #[arg(long)]
        comments: Option<String>,
    },

    /// Edit an event, its whole series, or the series from it onwards
    EditEvent {
        /// Item id or a unique prefix of it
        id: String,

        /// Which events to change: this, all or following
        #[arg(long, default_value_t = SeriesScope::ThisInstance)]
        scope: SeriesScope,

        #[arg(long)]
        name: Option<String>,

        /// Move the event to another day
        #[arg(long, value_parser = parse_date_arg)]
        date: Option<NaiveDate>,

        #[command(flatten)]
        timing: TimingArgs,

        /// Make the event all-day
        #[arg(long, conflicts_with = "start")]
        all_day: bool,

        /// New category; an empty value clears it
        #[arg(long)]
        category: Option<String>,

        /// New location; an empty value clears it
        #[arg(long)]
        location: Option<String>,

        /// New description; an empty value clears it
        #[arg(long)]
        description: Option<String>,

        #[command(flatten)]
        repeat: RepeatArgs,
    },

    /// Remove an item, its whole series, or the series from it onwards
    Remove {
        /// Item id or a unique prefix of it
        id: String,

        /// Which events to remove: this, all or following
        #[arg(long, default_value_t = SeriesScope::ThisInstance)]
        scope: SeriesScope,
    },

    /// Copy an item; copied events never join the original's series
    Duplicate {
        /// Item id or a unique prefix of it
        id: String,
    },

    /// Mark an assignment as done
    Done {
        /// Item id or a unique prefix of it
        id: String,

        /// Mark as not done instead
        #[arg(long)]
        undo: bool,
    },

    /// Record an assignment's grade, or clear it when no grade is given
    Grade {
        /// Item id or a unique prefix of it
        id: String,

        /// Grade such as 92, 87.5% or A-; only numbers count toward course grades
        grade: Option<String>,
    },

    /// Add a term
    AddTerm {
        /// Term name, such as "Fall 2024"
        name: String,

        /// First day
        #[arg(value_parser = parse_date_arg)]
        start: NaiveDate,

        /// Last day
        #[arg(value_parser = parse_date_arg)]
        end: NaiveDate,
    },

    /// Add a course to a term
    AddCourse {
        /// Course name
        name: String,

        /// Term by name or id
        #[arg(long)]
        term: String,

        /// Credit hours
        #[arg(long, default_value_t = 0)]
        credits: u8,
    },

    /// Add a weighted assignment type to a course
    AddType {
        /// Course by name or id
        course: String,

        /// Type name, such as Exams
        name: String,

        /// Percent of the course grade, such as 40 or 12.5%
        #[arg(value_parser = parse_weight_arg)]
        weight: f64,
    },

    /// Show weighted course grades
    Grades {
        /// Only courses of this term, by name or id
        #[arg(long)]
        term: Option<String>,
    },
}

const fn log_filter_from_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Turn parsed arguments into a planner command, resolving item ids
fn build_command(
    command: Commands,
    state: &PlannerState,
    today: NaiveDate,
) -> anyhow::Result<PlannerCommand> {
    let command = match command {
        Commands::Month { year, month, .. } => PlannerCommand::ShowMonth {
            year: year.unwrap_or_else(|| today.year()),
            month: month.unwrap_or_else(|| today.month()),
        },
        Commands::List { from, to } => {
            let from = from.unwrap_or(today);
            let to = to
                .or_else(|| from.checked_add_days(Days::new(DEFAULT_LIST_DAYS)))
                .unwrap_or(from);
            PlannerCommand::ListItems { from, to }
        },
        Commands::AddEvent {
            name,
            date,
            timing,
            category,
            location,
            description,
            repeat,
        } => {
            let mut event =
                EventItem::new(name, date, timing.timing()?.unwrap_or(EventTiming::AllDay));
            event.category = category;
            event.location = location;
            event.description = description;
            event.recurrence = repeat.rule(date)?;
            PlannerCommand::AddEvent { event }
        },
        Commands::AddAssignment {
            name,
            due,
            time,
            course,
            assignment_type,
            priority,
            comments,
        } => {
            let mut assignment = Assignment::new(name, due).with_priority(Priority::new(priority)?);
            assignment.due_time = time;
            assignment.course_id = course
                .map(|raw| resolve_course(state, &raw))
                .transpose()?;
            assignment.assignment_type = assignment_type;
            assignment.comments = comments.unwrap_or_default();
            PlannerCommand::AddAssignment { assignment }
        },
        Commands::EditEvent {
            id,
            scope,
            name,
            date,
            timing,
            all_day,
            category,
            location,
            description,
            repeat,
        } => {
            let item_id = resolve_item_id(state, &id)?;
            let event = state
                .event(item_id)
                .with_context(|| format!("item {} is not an event", item_id.short()))?;
            let rule_start = date
                .or_else(|| {
                    event
                        .recurrence
                        .as_ref()
                        .filter(|_| scope == SeriesScope::AllInSeries)
                        .map(|rule| rule.start_date)
                })
                .unwrap_or(event.date);
            let edit = EventEdit {
                name,
                category,
                location,
                description,
                date,
                timing: if all_day {
                    Some(EventTiming::AllDay)
                } else {
                    timing.timing()?
                },
                recurrence: repeat.rule(rule_start)?,
            };
            if edit.is_empty() {
                anyhow::bail!("nothing to change, pass at least one field to edit");
            }
            PlannerCommand::EditEvent {
                item_id,
                edit,
                scope,
            }
        },
        Commands::Remove { id, scope } => PlannerCommand::RemoveItem {
            item_id: resolve_item_id(state, &id)?,
            scope,
        },
        Commands::Duplicate { id } => PlannerCommand::DuplicateItem {
            item_id: resolve_item_id(state, &id)?,
        },
        Commands::Done { id, undo } => PlannerCommand::SetAssignmentDone {
            item_id: resolve_item_id(state, &id)?,
            done: !undo,
        },
        Commands::Grade { id, grade } => PlannerCommand::SetAssignmentGrade {
            item_id: resolve_item_id(state, &id)?,
            grade,
        },
        Commands::AddTerm { name, start, end } => PlannerCommand::AddTerm {
            term: Term::new(name, start, end)?,
        },
        Commands::AddCourse {
            name,
            term,
            credits,
        } => PlannerCommand::AddCourse {
            course: Course::new(name, resolve_term(state, &term)?).with_credits(credits),
        },
        Commands::AddType {
            course,
            name,
            weight,
        } => PlannerCommand::AddAssignmentType {
            course_id: resolve_course(state, &course)?,
            assignment_type: AssignmentType::new(name, weight)?,
        },
        Commands::Grades { term } => PlannerCommand::ShowGrades {
            term_id: term.map(|raw| resolve_term(state, &raw)).transpose()?,
        },
    };
    Ok(command)
}

/// Month view settings, with command line flags taking precedence over config
fn month_view(config: &PlannerConfig, command: &Commands) -> MonthView {
    let mut view = MonthView {
        week_start: config.calendar.week_starts_on,
        filter: config.calendar.grid_filter(),
    };
    if let Commands::Month {
        week_start,
        filter,
        hide_completed,
        ..
    } = command
    {
        if let Some(week_start) = week_start {
            view.week_start = *week_start;
        }
        if let Some(filter) = filter {
            view.filter.kinds = *filter;
        }
        view.filter.hide_completed |= *hide_completed;
    }
    view
}

fn print_outcome(outcome: &CommandOutcome, state: &SharedPlannerState) {
    let state = state.lock();
    let text = match outcome {
        CommandOutcome::Changed(changes) => render::changes(changes, &state),
        CommandOutcome::Catalog(change) => render::catalog_change(change, &state),
        CommandOutcome::Grades(reports) => render::grades(reports),
        CommandOutcome::Month(grid) => render::month(grid, &state),
        CommandOutcome::Items(items) => render::items(items, &state),
    };
    print!("{text}");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = PlannerConfig::load_from(cli.config.as_deref())
        .context("Failed to load configuration")?;
    if cli.verbose > 0 {
        config.logging.log_filter = log_filter_from_verbosity(cli.verbose).to_string();
    }
    if let Some(backup) = cli.backup {
        config.storage.backup_path = backup;
    }
    init_logging(&config.logging)?;
    debug!(?config, "Configuration loaded");

    let store = Arc::new(JsonFileItemStore::new(&config.storage.backup_path));
    let state = load_state(store.as_ref())
        .await
        .with_context(|| {
            format!(
                "Failed to read planner from {}",
                config.storage.backup_path.display()
            )
        })?
        .into_shared();

    let view = month_view(&config, &cli.command);
    let command = {
        let guard = state.lock();
        build_command(cli.command, &guard, Local::now().date_naive())?
    };

    let worker = SaveWorker::spawn(store, Arc::clone(&state), config.storage.save_debounce());
    let service = PlannerService::new(Arc::clone(&state), worker.notifier()).with_view(view);
    let outcome = service.execute(command);
    worker
        .shutdown()
        .await
        .context("Failed to save planner")?;

    print_outcome(&outcome?, &state);
    Ok(())
}

#[cfg(test)]
mod tests {
    use domain::{Frequency, GridFilter};

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn log_filter_verbosity_zero() {
        assert_eq!(log_filter_from_verbosity(0), "warn");
    }

    #[test]
    fn log_filter_verbosity_one() {
        assert_eq!(log_filter_from_verbosity(1), "info");
    }

    #[test]
    fn log_filter_verbosity_two() {
        assert_eq!(log_filter_from_verbosity(2), "debug");
    }

    #[test]
    fn log_filter_verbosity_three_or_more() {
        assert_eq!(log_filter_from_verbosity(3), "trace");
        assert_eq!(log_filter_from_verbosity(255), "trace");
    }

    #[test]
    fn month_defaults_to_today() {
        let cli = parse(&["planner-cli", "month"]);
        let command = build_command(cli.command, &PlannerState::new(), date(2024, 3, 15)).unwrap();
        assert_eq!(
            command,
            PlannerCommand::ShowMonth {
                year: 2024,
                month: 3
            }
        );
    }

    #[test]
    fn month_flags_override_config() {
        let cli = parse(&[
            "planner-cli",
            "month",
            "--week-start",
            "monday",
            "--filter",
            "assignments",
            "--hide-completed",
        ]);
        let view = month_view(&PlannerConfig::default(), &cli.command);
        assert_eq!(view.week_start, WeekStart::Monday);
        assert_eq!(
            view.filter,
            GridFilter {
                kinds: ViewFilter::AssignmentsOnly,
                hide_completed: true,
            }
        );
    }

    #[test]
    fn list_defaults_to_two_weeks() {
        let cli = parse(&["planner-cli", "list", "--from", "2024-03-01"]);
        let command = build_command(cli.command, &PlannerState::new(), date(2024, 1, 1)).unwrap();
        assert_eq!(
            command,
            PlannerCommand::ListItems {
                from: date(2024, 3, 1),
                to: date(2024, 3, 15)
            }
        );
    }

    #[test]
    fn add_event_builds_weekly_rule() {
        let cli = parse(&[
            "planner-cli",
            "add-event",
            "Lecture",
            "01/01/2024",
            "--start",
            "9:00 AM",
            "--end",
            "10:15",
            "--repeat",
            "weekly",
            "--on",
            "mon,wed",
            "--until",
            "2024-01-31",
        ]);
        let command = build_command(cli.command, &PlannerState::new(), date(2024, 1, 1)).unwrap();
        let PlannerCommand::AddEvent { event } = command else {
            panic!("expected add-event");
        };
        assert_eq!(event.date, date(2024, 1, 1));
        assert!(!event.is_all_day());
        let rule = event.recurrence.unwrap();
        assert_eq!(rule.frequency, Frequency::Weekly);
        assert_eq!(rule.end_date, date(2024, 1, 31));
    }

    fn state_with_history() -> (PlannerState, domain::CourseId) {
        let mut state = PlannerState::new();
        let spring = Term::new("Spring", date(2024, 1, 8), date(2024, 5, 3)).unwrap();
        let term = state.push_term(spring);
        let course = state.push_course(Course::new("History", term));
        (state, course)
    }

    #[test]
    fn add_assignment_sets_optional_fields() {
        let (state, history) = state_with_history();
        let cli = parse(&[
            "planner-cli",
            "add-assignment",
            "Essay",
            "2024-03-05",
            "--time",
            "11:59 PM",
            "--course",
            "history",
            "--type",
            "Essays",
            "--priority",
            "5",
        ]);
        let command = build_command(cli.command, &state, date(2024, 1, 1)).unwrap();
        let PlannerCommand::AddAssignment { assignment } = command else {
            panic!("expected add-assignment");
        };
        assert_eq!(assignment.course_id, Some(history));
        assert_eq!(assignment.assignment_type.as_deref(), Some("Essays"));
        assert_eq!(assignment.priority.level(), 5);
        assert!(assignment.due_time.is_some());
    }

    #[test]
    fn unknown_course_is_rejected() {
        let cli = parse(&[
            "planner-cli",
            "add-assignment",
            "Essay",
            "2024-03-05",
            "--course",
            "Art",
        ]);
        assert!(build_command(cli.command, &PlannerState::new(), date(2024, 1, 1)).is_err());
    }

    #[test]
    fn type_requires_course() {
        let result = Cli::try_parse_from([
            "planner-cli",
            "add-assignment",
            "Essay",
            "2024-03-05",
            "--type",
            "Essays",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn catalog_commands_resolve_names() {
        let (state, history) = state_with_history();

        let cli = parse(&[
            "planner-cli",
            "add-course",
            "Biology",
            "--term",
            "spring",
            "--credits",
            "4",
        ]);
        let PlannerCommand::AddCourse { course } =
            build_command(cli.command, &state, date(2024, 1, 1)).unwrap()
        else {
            panic!("expected add-course");
        };
        assert_eq!(course.credits, 4);
        assert_eq!(Some(course.term_id), state.terms().first().map(|t| t.id));

        let cli = parse(&["planner-cli", "add-type", "History", "Essays", "40%"]);
        let PlannerCommand::AddAssignmentType {
            course_id,
            assignment_type,
        } = build_command(cli.command, &state, date(2024, 1, 1)).unwrap()
        else {
            panic!("expected add-type");
        };
        assert_eq!(course_id, history);
        assert_eq!(assignment_type.name, "Essays");

        let cli = parse(&["planner-cli", "add-type", "History", "Essays", "140"]);
        assert!(build_command(cli.command, &state, date(2024, 1, 1)).is_err());

        let cli = parse(&["planner-cli", "add-term", "Summer", "2024-06-30", "2024-06-01"]);
        assert!(build_command(cli.command, &state, date(2024, 1, 1)).is_err());
    }

    #[test]
    fn grade_without_value_clears() {
        let mut state = PlannerState::new();
        let id = state.insert(Assignment::new("Essay", date(2024, 1, 2)));
        let cli = parse(&["planner-cli", "grade", id.short().as_str()]);
        assert_eq!(
            build_command(cli.command, &state, date(2024, 1, 1)).unwrap(),
            PlannerCommand::SetAssignmentGrade {
                item_id: id,
                grade: None
            }
        );
    }

    #[test]
    fn priority_out_of_range_is_rejected() {
        let result = Cli::try_parse_from([
            "planner-cli",
            "add-assignment",
            "Essay",
            "2024-03-05",
            "--priority",
            "9",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn edit_event_resolves_prefix_and_scope() {
        let mut state = PlannerState::new();
        let id = state.insert(EventItem::all_day("Lab", date(2024, 1, 2)));
        let short = id.short();
        let cli = parse(&[
            "planner-cli",
            "edit-event",
            short.as_str(),
            "--scope",
            "following",
            "--name",
            "Chem lab",
        ]);
        let command = build_command(cli.command, &state, date(2024, 1, 1)).unwrap();
        let PlannerCommand::EditEvent {
            item_id,
            edit,
            scope,
        } = command
        else {
            panic!("expected edit-event");
        };
        assert_eq!(item_id, id);
        assert_eq!(scope, SeriesScope::AllFollowing);
        assert_eq!(edit.name.as_deref(), Some("Chem lab"));
    }

    #[test]
    fn edit_event_without_changes_is_rejected() {
        let mut state = PlannerState::new();
        let id = state.insert(EventItem::all_day("Lab", date(2024, 1, 2)));
        let cli = parse(&["planner-cli", "edit-event", id.to_string().as_str()]);
        assert!(build_command(cli.command, &state, date(2024, 1, 1)).is_err());
    }

    #[test]
    fn edit_event_rejects_assignments() {
        let mut state = PlannerState::new();
        let id = state.insert(Assignment::new("Essay", date(2024, 1, 2)));
        let cli = parse(&["planner-cli", "edit-event", id.short().as_str(), "--name", "x"]);
        assert!(build_command(cli.command, &state, date(2024, 1, 1)).is_err());
    }

    #[test]
    fn done_and_undo() {
        let mut state = PlannerState::new();
        let id = state.insert(Assignment::new("Essay", date(2024, 1, 2)));
        let cli = parse(&["planner-cli", "done", id.short().as_str(), "--undo"]);
        assert_eq!(
            build_command(cli.command, &state, date(2024, 1, 1)).unwrap(),
            PlannerCommand::SetAssignmentDone {
                item_id: id,
                done: false
            }
        );
    }

    #[test]
    fn remove_defaults_to_this_instance() {
        let cli = parse(&["planner-cli", "remove", "abc"]);
        assert!(matches!(
            cli.command,
            Commands::Remove {
                scope: SeriesScope::ThisInstance,
                ..
            }
        ));
    }

    #[test]
    fn global_options_after_subcommand() {
        let cli = parse(&["planner-cli", "list", "--backup", "/tmp/p.json", "-vv"]);
        assert_eq!(cli.backup, Some(PathBuf::from("/tmp/p.json")));
        assert_eq!(cli.verbose, 2);
    }
}
