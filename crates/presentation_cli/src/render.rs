//! Plain text output

use std::fmt::Write;

use application::{
    CatalogChange, ChangeSet, GradeReport, PlannerState,
    date_parser::{format_us_date, format_us_time},
};
use chrono::NaiveDate;
use domain::{CalendarCell, EventItem, EventTiming, MonthGrid, PlannerItem};

/// Month grid followed by the agenda of its in-month days
///
/// Days of adjacent months are prefixed with `.`; days with items carry a `*`.
pub fn month(grid: &MonthGrid, state: &PlannerState) -> String {
    let mut out = String::new();
    let title = NaiveDate::from_ymd_opt(grid.year, grid.month, 1).map_or_else(
        || format!("{}-{:02}", grid.year, grid.month),
        |first| first.format("%B %Y").to_string(),
    );
    let _ = writeln!(out, "{title:^28}");

    for day in grid.week_start.columns() {
        let name = day.to_string();
        let _ = write!(out, "{:>3} ", &name[..2]);
    }
    out.push('\n');

    for week in grid.weeks() {
        for cell in week {
            out.push_str(&cell_text(cell));
        }
        out.push('\n');
    }

    let agenda: Vec<String> = grid
        .cells()
        .iter()
        .filter(|cell| !cell.is_outside_current_month)
        .flat_map(|cell| cell.items.iter().filter_map(|id| state.get(*id)))
        .map(|item| format!("{}  {}", item.date().format("%a %d"), item_line(item, state)))
        .collect();
    if !agenda.is_empty() {
        out.push('\n');
        for line in agenda {
            let _ = writeln!(out, "{line}");
        }
    }
    out
}

fn cell_text(cell: &CalendarCell) -> String {
    let marker = if cell.is_busy() { '*' } else { ' ' };
    if cell.is_outside_current_month {
        format!("{:>3}{marker}", format!(".{}", cell.day_number))
    } else {
        format!("{:>3}{marker}", cell.day_number)
    }
}

/// Dated listing, one item per line
pub fn items(items: &[PlannerItem], state: &PlannerState) -> String {
    if items.is_empty() {
        return "No items.\n".to_string();
    }
    items.iter().fold(String::new(), |mut out, item| {
        let _ = writeln!(out, "{}  {}", format_us_date(item.date()), item_line(item, state));
        out
    })
}

/// One item: short id, name and details
pub fn item_line(item: &PlannerItem, state: &PlannerState) -> String {
    let id = item.id().short();
    match item {
        PlannerItem::Assignment(assignment) => {
            let mut details = vec!["assignment".to_string()];
            if let Some(course) = assignment.course_id.and_then(|id| state.course(id)) {
                details.push(course.name.clone());
            }
            details.extend(assignment.assignment_type.clone());
            if let Some(time) = assignment.due_time {
                details.push(format!("due {}", format_us_time(time)));
            }
            details.push(format!("{} priority", assignment.priority.label().to_lowercase()));
            if assignment.is_done {
                details.push("done".to_string());
            }
            if let Some(grade) = &assignment.grade {
                details.push(format!("graded {grade}"));
            }
            format!("{id}  {}  ({})", assignment.name, details.join(", "))
        },
        PlannerItem::Event(event) => {
            format!("{id}  {}  ({})", event.name, event_details(event).join(", "))
        },
    }
}

fn event_details(event: &EventItem) -> Vec<String> {
    let mut details = vec![match event.timing {
        EventTiming::AllDay => "all day".to_string(),
        EventTiming::Timed { start, end } if start == end => format_us_time(start),
        EventTiming::Timed { start, end } => {
            format!("{} - {}", format_us_time(start), format_us_time(end))
        },
    }];
    details.extend(event.category.clone());
    details.extend(event.location.as_ref().map(|location| format!("at {location}")));
    if let Some(rule) = event.recurrence.as_ref().filter(|rule| rule.is_recurring()) {
        details.push(rule.summary());
    }
    details
}

/// Summary of what a command changed
pub fn changes(changes: &ChangeSet, state: &PlannerState) -> String {
    if changes.is_empty() {
        return "Nothing changed.\n".to_string();
    }
    let mut out = String::new();
    match changes.created.as_slice() {
        [] => {},
        [only] => {
            let label = state
                .get(*only)
                .map_or_else(|| only.short(), |item| item_line(item, state));
            let _ = writeln!(out, "Created {label}");
        },
        [first, ..] => {
            let _ = writeln!(
                out,
                "Created {} items (first {})",
                changes.created.len(),
                first.short()
            );
        },
    }
    if !changes.updated.is_empty() {
        let _ = writeln!(out, "Updated {} item(s)", changes.updated.len());
    }
    if !changes.removed.is_empty() {
        let _ = writeln!(out, "Removed {} item(s)", changes.removed.len());
    }
    out
}

/// Confirmation of an added term, course or assignment type
pub fn catalog_change(change: &CatalogChange, state: &PlannerState) -> String {
    match change {
        CatalogChange::TermAdded(id) => state.term(*id).map_or_else(
            || format!("Added term {}\n", id.short()),
            |term| {
                format!(
                    "Added term {}  {}  ({} - {})\n",
                    id.short(),
                    term.name,
                    format_us_date(term.start_date),
                    format_us_date(term.end_date)
                )
            },
        ),
        CatalogChange::CourseAdded(id) => state.course(*id).map_or_else(
            || format!("Added course {}\n", id.short()),
            |course| format!("Added course {}  {}\n", id.short(), course.name),
        ),
        CatalogChange::TypeAdded { course_id, name } => {
            let total = state.course(*course_id).map_or(0.0, |c| c.total_weight());
            format!("Added type {name} ({total}% of the course weighted)\n")
        },
    }
}

/// One block per course: overall grade, then each graded type
pub fn grades(reports: &[GradeReport]) -> String {
    if reports.is_empty() {
        return "No courses.\n".to_string();
    }
    let mut out = String::new();
    for report in reports {
        let course = &report.course;
        let heading = format!("{}  {} ({})", course.id.short(), course.name, report.term_name);
        let Some(grade) = &report.grade else {
            let _ = writeln!(out, "{heading}  no graded work");
            continue;
        };
        let _ = writeln!(
            out,
            "{heading}  {:.1}% from {} graded, {}% of weight",
            grade.percent,
            grade.graded(),
            grade.weight_graded
        );
        for kind in &grade.by_type {
            let _ = writeln!(
                out,
                "    {:<12} {:>5.1}%  x{}  weight {}%",
                kind.name, kind.average, kind.graded, kind.weight
            );
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveTime, Weekday};
    use domain::{
        Assignment, AssignmentType, Course, GridFilter, RecurrenceRule, SeriesId, Term, WeekStart,
        WeekdaySet,
    };

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn march_state() -> PlannerState {
        let mut state = PlannerState::new();
        let spring = Term::new("Spring", date(2024, 1, 8), date(2024, 5, 3)).unwrap();
        let term = state.push_term(spring);
        let history = state.push_course(Course::new("History", term));
        state.insert(Assignment::new("Essay", date(2024, 3, 5)).with_course(history));
        state.insert(EventItem::all_day("Spring fair", date(2024, 4, 2)));
        state
    }

    #[test]
    fn month_renders_title_header_and_weeks() {
        let state = march_state();
        let grid = MonthGrid::build(
            2024,
            3,
            WeekStart::Sunday,
            state.items(),
            &GridFilter::default(),
        )
        .unwrap();

        let text = month(&grid, &state);
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].contains("March 2024"));
        assert!(lines[1].trim_start().starts_with("Su"));
        assert!(lines[2].starts_with(".25"));
        // Week of Mar 3: the fifth is busy
        assert!(lines[3].contains("  5*"));
        assert!(text.contains("Essay"));
        assert!(text.contains("History"));
        assert!(!text.contains("Spring fair"));
    }

    #[test]
    fn month_with_monday_start_has_five_weeks() {
        let state = PlannerState::new();
        let grid = MonthGrid::layout(2024, 3, WeekStart::Monday).unwrap();
        let text = month(&grid, &state);
        assert!(text.lines().nth(1).unwrap().trim_start().starts_with("Mo"));
        assert_eq!(text.lines().count(), 2 + 5);
    }

    #[test]
    fn outside_cells_are_marked() {
        let cell = CalendarCell::new(date(2024, 2, 25), true);
        assert_eq!(cell_text(&cell), ".25 ");
        let mut cell = CalendarCell::new(date(2024, 3, 1), false);
        cell.items.push(domain::ItemId::new());
        assert_eq!(cell_text(&cell), "  1*");
    }

    #[test]
    fn item_lines_describe_both_kinds() {
        let state = PlannerState::new();
        let assignment: PlannerItem = Assignment::new("Essay", date(2024, 3, 5))
            .with_due_time(NaiveTime::from_hms_opt(23, 59, 0).unwrap())
            .into();
        let line = item_line(&assignment, &state);
        assert!(line.starts_with(&assignment.id().short()));
        assert!(line.contains("due 11:59 PM"));

        let event: PlannerItem = EventItem::new(
            "Lecture",
            date(2024, 1, 1),
            EventTiming::timed(
                NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
                NaiveTime::from_hms_opt(10, 15, 0).unwrap(),
            )
            .unwrap(),
        )
        .with_location("Hall B")
        .with_recurrence(
            RecurrenceRule::weekly(
                WeekdaySet::empty().with(Weekday::Mon),
                date(2024, 1, 1),
                date(2024, 1, 29),
            )
            .with_series_id(SeriesId::new(1)),
        )
        .into();
        let line = item_line(&event, &state);
        assert!(line.contains("9:00 AM - 10:15 AM"));
        assert!(line.contains("at Hall B"));
        assert!(line.contains("Every week"));
    }

    #[test]
    fn empty_listing_and_changes() {
        let state = PlannerState::new();
        assert_eq!(items(&[], &state), "No items.\n");
        assert_eq!(grades(&[]), "No courses.\n");
        assert_eq!(changes(&ChangeSet::default(), &state), "Nothing changed.\n");
    }

    #[test]
    fn single_creation_names_the_item() {
        let mut state = PlannerState::new();
        let id = state.insert(Assignment::new("Essay", date(2024, 3, 5)));
        let change_set = ChangeSet {
            created: vec![id],
            ..ChangeSet::default()
        };
        let text = changes(&change_set, &state);
        assert!(text.starts_with(&format!("Created {}", id.short())));
    }

    #[test]
    fn grade_blocks_list_types() {
        let mut state = march_state();
        let history = state.courses()[0].id;
        let mut course = state.courses()[0].clone();
        course
            .add_assignment_type(AssignmentType::new("Essays", 50.0).unwrap())
            .unwrap();
        let mut essay = Assignment::new("Essay", date(2024, 3, 5))
            .with_course(history)
            .with_assignment_type("Essays");
        essay.set_grade(Some("84".to_string()));
        essay.set_done(true);
        state.insert(essay);

        let graded = GradeReport {
            grade: domain::course_grade(&course, state.assignments()),
            course: course.clone(),
            term_name: "Spring".to_string(),
        };
        let ungraded = GradeReport {
            grade: None,
            course: Course::new("Art", course.term_id),
            term_name: "Spring".to_string(),
        };
        let text = grades(&[graded, ungraded]);
        assert!(text.contains("History (Spring)  84.0% from 1 graded, 50% of weight"));
        assert!(text.contains("Essays"));
        assert!(text.contains("Art (Spring)  no graded work"));
    }

    #[test]
    fn catalog_change_names_the_course() {
        let state = march_state();
        let history = state.courses()[0].id;
        let text = catalog_change(&CatalogChange::CourseAdded(history), &state);
        assert!(text.starts_with("Added course"));
        assert!(text.contains("History"));
    }
}
