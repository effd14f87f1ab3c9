//! Planner service
//!
//! Executes [`PlannerCommand`]s against the shared planner state and tells
//! the change notifier after every successful mutation.

use std::{fmt, sync::Arc};

use domain::{GridFilter, MonthGrid, PlannerCommand, PlannerItem, WeekStart};
use tracing::{debug, info, instrument, warn};

use crate::{
    error::ApplicationError,
    ports::{ChangeNotifierPort, ItemStorePort},
    services::{
        course_catalog::{CatalogChange, CourseCatalog, GradeReport, grade_reports},
        series_editor::{ChangeSet, SeriesEditor},
    },
    state::{PlannerState, SharedPlannerState},
};

/// How month views are laid out and filtered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MonthView {
    pub week_start: WeekStart,
    pub filter: GridFilter,
}

/// Result of executing a command
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    /// The item collection changed
    Changed(ChangeSet),
    /// A term, course or assignment type was added
    Catalog(CatalogChange),
    /// Course grades
    Grades(Vec<GradeReport>),
    /// A laid out and populated month
    Month(MonthGrid),
    /// Items in a date range, ordered by date
    Items(Vec<PlannerItem>),
}

/// Service that owns command dispatch for the planner
pub struct PlannerService {
    state: SharedPlannerState,
    notifier: Arc<dyn ChangeNotifierPort>,
    view: MonthView,
}

impl fmt::Debug for PlannerService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlannerService")
            .field("view", &self.view)
            .finish_non_exhaustive()
    }
}

impl PlannerService {
    /// Create a new planner service
    pub fn new(state: SharedPlannerState, notifier: Arc<dyn ChangeNotifierPort>) -> Self {
        Self {
            state,
            notifier,
            view: MonthView::default(),
        }
    }

    /// Use the given month view settings
    #[must_use]
    pub const fn with_view(mut self, view: MonthView) -> Self {
        self.view = view;
        self
    }

    /// Shared state handle, for collaborators that snapshot it
    pub fn state(&self) -> SharedPlannerState {
        Arc::clone(&self.state)
    }

    /// Execute one command
    ///
    /// # Errors
    ///
    /// Returns an error if the command refers to a missing item, targets the
    /// wrong kind of item, or carries an invalid repeat pattern or month. The
    /// state is left unchanged in every error case.
    #[instrument(skip(self, command), fields(command = %command.description()))]
    pub fn execute(&self, command: PlannerCommand) -> Result<CommandOutcome, ApplicationError> {
        if !command.is_mutation() {
            return self.query(command);
        }
        let outcome = match command {
            PlannerCommand::AddTerm { .. }
            | PlannerCommand::AddCourse { .. }
            | PlannerCommand::AddAssignmentType { .. } => {
                let change = self.update_catalog(command)?;
                self.notifier.data_changed();
                return Ok(CommandOutcome::Catalog(change));
            },
            mutation => self.mutate(mutation)?,
        };

        if !outcome.is_empty() {
            self.notifier.data_changed();
        }
        info!(
            created = outcome.created.len(),
            removed = outcome.removed.len(),
            updated = outcome.updated.len(),
            "Planner changed"
        );
        Ok(CommandOutcome::Changed(outcome))
    }

    /// Lay out `month` of `year` and place every visible item
    ///
    /// # Errors
    ///
    /// Returns an error if the month does not exist.
    #[instrument(skip(self))]
    pub fn show_month(&self, year: i32, month: u32) -> Result<MonthGrid, ApplicationError> {
        let state = self.state.lock();
        let grid = MonthGrid::build(
            year,
            month,
            self.view.week_start,
            state.items(),
            &self.view.filter,
        )?;
        let placed: usize = grid.cells().iter().map(|cell| cell.items.len()).sum();
        debug!(placed, total = state.len(), "Built month grid");
        Ok(grid)
    }

    fn query(&self, command: PlannerCommand) -> Result<CommandOutcome, ApplicationError> {
        match command {
            PlannerCommand::ShowMonth { year, month } => {
                self.show_month(year, month).map(CommandOutcome::Month)
            },
            PlannerCommand::ListItems { from, to } => {
                let state = self.state.lock();
                let items = state.items_between(from, to).into_iter().cloned().collect();
                Ok(CommandOutcome::Items(items))
            },
            PlannerCommand::ShowGrades { term_id } => {
                let state = self.state.lock();
                let reports = grade_reports(&state, term_id)?;
                debug!(courses = reports.len(), "Computed grades");
                Ok(CommandOutcome::Grades(reports))
            },
            other => Err(ApplicationError::Internal(format!(
                "mutation dispatched as a query: {}",
                other.description()
            ))),
        }
    }

    fn update_catalog(&self, command: PlannerCommand) -> Result<CatalogChange, ApplicationError> {
        let mut state = self.state.lock();
        let mut catalog = CourseCatalog::new(&mut state);
        match command {
            PlannerCommand::AddTerm { term } => catalog.add_term(term),
            PlannerCommand::AddCourse { course } => catalog.add_course(course),
            PlannerCommand::AddAssignmentType {
                course_id,
                assignment_type,
            } => catalog.add_assignment_type(course_id, assignment_type),
            other => Err(ApplicationError::Internal(format!(
                "not a catalog command: {}",
                other.description()
            ))),
        }
    }

    fn mutate(&self, command: PlannerCommand) -> Result<ChangeSet, ApplicationError> {
        let mut state = self.state.lock();
        let mut editor = SeriesEditor::new(&mut state);
        match command {
            PlannerCommand::AddEvent { event } => editor.add_event(event),
            PlannerCommand::AddAssignment { assignment } => editor.add_assignment(assignment),
            PlannerCommand::AttachRecurrence { item_id, rule } => {
                editor.attach_recurrence(item_id, rule)
            },
            PlannerCommand::EditEvent {
                item_id,
                edit,
                scope,
            } => editor.edit_event(item_id, &edit, scope),
            PlannerCommand::RemoveItem { item_id, scope } => editor.remove_item(item_id, scope),
            PlannerCommand::DuplicateItem { item_id } => editor.duplicate_item(item_id),
            PlannerCommand::SetAssignmentDone { item_id, done } => {
                editor.set_assignment_done(item_id, done)
            },
            PlannerCommand::SetAssignmentGrade { item_id, grade } => {
                editor.set_assignment_grade(item_id, grade)
            },
            other => Err(ApplicationError::Internal(format!(
                "not an item command: {}",
                other.description()
            ))),
        }
    }
}

/// Load the planner from `store`, starting empty if nothing was saved
///
/// # Errors
///
/// Returns an error if the store cannot be read.
#[instrument(skip(store))]
pub async fn load_state(store: &dyn ItemStorePort) -> Result<PlannerState, ApplicationError> {
    match store.load().await? {
        Some(snapshot) => {
            let state = PlannerState::from_snapshot(snapshot);
            info!(items = state.len(), "Loaded planner");
            Ok(state)
        },
        None => {
            warn!("No saved planner found, starting empty");
            Ok(PlannerState::new())
        },
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Weekday};
    use domain::{
        Assignment, AssignmentType, Course, EventEdit, EventItem, ItemId, RecurrenceRule,
        SeriesScope, Term, ViewFilter, WeekdaySet,
    };

    use super::*;
    use crate::{
        ports::{MockChangeNotifierPort, MockItemStorePort},
        state::PlannerSnapshot,
    };

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn service_expecting(notifications: usize) -> PlannerService {
        let mut notifier = MockChangeNotifierPort::new();
        notifier.expect_data_changed().times(notifications).return_const(());
        PlannerService::new(PlannerState::new().into_shared(), Arc::new(notifier))
    }

    fn changed(outcome: CommandOutcome) -> ChangeSet {
        match outcome {
            CommandOutcome::Changed(changes) => changes,
            other => panic!("expected a change, got {other:?}"),
        }
    }

    fn weekly_lecture() -> EventItem {
        EventItem::all_day("Lecture", date(2024, 1, 1)).with_recurrence(RecurrenceRule::weekly(
            WeekdaySet::empty().with(Weekday::Mon).with(Weekday::Wed),
            date(2024, 1, 1),
            date(2024, 1, 31),
        ))
    }

    #[test]
    fn add_event_notifies_once() {
        let service = service_expecting(1);
        let changes = changed(
            service
                .execute(PlannerCommand::AddEvent {
                    event: weekly_lecture(),
                })
                .unwrap(),
        );
        assert_eq!(changes.created.len(), 10);
    }

    #[test]
    fn failed_command_does_not_notify() {
        let service = service_expecting(0);
        let result = service.execute(PlannerCommand::RemoveItem {
            item_id: ItemId::new(),
            scope: SeriesScope::AllInSeries,
        });
        assert!(matches!(result, Err(ApplicationError::ItemNotFound(_))));
    }

    #[test]
    fn queries_do_not_notify() {
        let service = service_expecting(0);
        let outcome = service
            .execute(PlannerCommand::ShowMonth {
                year: 2024,
                month: 3,
            })
            .unwrap();
        assert!(matches!(outcome, CommandOutcome::Month(grid) if grid.cells().len() == 42));
    }

    #[test]
    fn invalid_month_is_an_error() {
        let service = service_expecting(0);
        let result = service.execute(PlannerCommand::ShowMonth {
            year: 2024,
            month: 13,
        });
        assert!(matches!(result, Err(ApplicationError::Domain(_))));
    }

    #[test]
    fn month_view_places_series_and_assignments() {
        let service = service_expecting(2);
        service
            .execute(PlannerCommand::AddEvent {
                event: weekly_lecture(),
            })
            .unwrap();
        service
            .execute(PlannerCommand::AddAssignment {
                assignment: Assignment::new("Essay", date(2024, 1, 3)),
            })
            .unwrap();

        let grid = service.show_month(2024, 1).unwrap();
        assert_eq!(grid.busy_days().len(), 10);
        let cell = grid.cell_for(date(2024, 1, 3)).unwrap();
        assert_eq!(cell.items.len(), 2);
    }

    #[test]
    fn view_filter_hides_events() {
        let service = service_expecting(2).with_view(MonthView {
            week_start: WeekStart::Monday,
            filter: GridFilter {
                kinds: ViewFilter::AssignmentsOnly,
                hide_completed: false,
            },
        });
        service
            .execute(PlannerCommand::AddEvent {
                event: weekly_lecture(),
            })
            .unwrap();
        service
            .execute(PlannerCommand::AddAssignment {
                assignment: Assignment::new("Essay", date(2024, 1, 3)),
            })
            .unwrap();

        let grid = service.show_month(2024, 1).unwrap();
        assert_eq!(grid.busy_days(), vec![date(2024, 1, 3)]);
    }

    #[test]
    fn edit_and_list() {
        let service = service_expecting(2);
        let created = changed(
            service
                .execute(PlannerCommand::AddEvent {
                    event: weekly_lecture(),
                })
                .unwrap(),
        )
        .created;
        service
            .execute(PlannerCommand::EditEvent {
                item_id: created[0],
                edit: EventEdit {
                    name: Some("Algebra".into()),
                    ..EventEdit::default()
                },
                scope: SeriesScope::AllInSeries,
            })
            .unwrap();

        let outcome = service
            .execute(PlannerCommand::ListItems {
                from: date(2024, 1, 1),
                to: date(2024, 1, 10),
            })
            .unwrap();
        let CommandOutcome::Items(items) = outcome else {
            panic!("expected items");
        };
        assert_eq!(items.len(), 4);
        assert!(items.iter().all(|item| item.name() == "Algebra"));
    }

    #[test]
    fn set_done_updates_assignment() {
        let service = service_expecting(2);
        let id = changed(
            service
                .execute(PlannerCommand::AddAssignment {
                    assignment: Assignment::new("Essay", date(2024, 1, 3)),
                })
                .unwrap(),
        )
        .created[0];
        service
            .execute(PlannerCommand::SetAssignmentDone {
                item_id: id,
                done: true,
            })
            .unwrap();

        let state = service.state();
        let guard = state.lock();
        assert!(guard.get(id).unwrap().as_assignment().unwrap().is_done);
    }

    #[test]
    fn grades_follow_catalog_and_graded_work() {
        let service = service_expecting(6);
        let term = Term::new("Spring 2024", date(2024, 1, 8), date(2024, 5, 3)).unwrap();
        let term_id = term.id;
        service.execute(PlannerCommand::AddTerm { term }).unwrap();
        let course = Course::new("MATH 241", term_id);
        let course_id = course.id;
        service.execute(PlannerCommand::AddCourse { course }).unwrap();
        let outcome = service
            .execute(PlannerCommand::AddAssignmentType {
                course_id,
                assignment_type: AssignmentType::new("Homework", 25.0).unwrap(),
            })
            .unwrap();
        assert!(matches!(outcome, CommandOutcome::Catalog(CatalogChange::TypeAdded { .. })));

        let homework = changed(
            service
                .execute(PlannerCommand::AddAssignment {
                    assignment: Assignment::new("Set 1", date(2024, 1, 12))
                        .with_course(course_id)
                        .with_assignment_type("Homework"),
                })
                .unwrap(),
        )
        .created[0];
        service
            .execute(PlannerCommand::SetAssignmentDone {
                item_id: homework,
                done: true,
            })
            .unwrap();
        service
            .execute(PlannerCommand::SetAssignmentGrade {
                item_id: homework,
                grade: Some("88".to_string()),
            })
            .unwrap();

        let outcome = service
            .execute(PlannerCommand::ShowGrades {
                term_id: Some(term_id),
            })
            .unwrap();
        let CommandOutcome::Grades(reports) = outcome else {
            panic!("expected grades");
        };
        assert_eq!(reports.len(), 1);
        let grade = reports[0].grade.as_ref().unwrap();
        assert!((grade.percent - 88.0).abs() < 1e-9);
    }

    #[test]
    fn rejected_catalog_command_does_not_notify() {
        let service = service_expecting(0);
        let result = service.execute(PlannerCommand::AddCourse {
            course: Course::new("MATH 241", domain::TermId::new()),
        });
        assert!(matches!(result, Err(ApplicationError::Domain(_))));
    }

    #[tokio::test]
    async fn load_state_from_store() {
        let mut store = MockItemStorePort::new();
        store.expect_load().returning(|| {
            Ok(Some(PlannerSnapshot {
                items: vec![Assignment::new("Essay", date(2024, 1, 3)).into()],
                next_series_id: 4,
                ..PlannerSnapshot::default()
            }))
        });

        let state = load_state(&store).await.unwrap();
        assert_eq!(state.len(), 1);
    }

    #[tokio::test]
    async fn load_state_starts_empty() {
        let mut store = MockItemStorePort::new();
        store.expect_load().returning(|| Ok(None));
        assert!(load_state(&store).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn load_state_propagates_errors() {
        let mut store = MockItemStorePort::new();
        store
            .expect_load()
            .returning(|| Err(ApplicationError::Storage("unreadable".into())));
        assert!(load_state(&store).await.is_err());
    }
}
