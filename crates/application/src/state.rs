//! In-memory planner state
//!
//! A flat arena of planner items addressed by [`ItemId`], next to the terms
//! and courses those items are graded in. Grid cells and series refer to
//! items by id only.

use std::sync::Arc;

use chrono::NaiveDate;
use domain::{Assignment, Course, CourseId, EventItem, ItemId, PlannerItem, SeriesId, Term, TermId};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// State shared between the service and the save worker
pub type SharedPlannerState = Arc<Mutex<PlannerState>>;

/// Serialized form of the planner, as written to the backup file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlannerSnapshot {
    #[serde(default)]
    pub items: Vec<PlannerItem>,
    #[serde(default)]
    pub terms: Vec<Term>,
    #[serde(default)]
    pub courses: Vec<Course>,
    /// Next series id to hand out
    #[serde(default = "default_next_series_id")]
    pub next_series_id: u64,
}

const fn default_next_series_id() -> u64 {
    1
}

/// All assignments and events in insertion order, plus terms and courses
#[derive(Debug, Clone, PartialEq)]
pub struct PlannerState {
    items: Vec<PlannerItem>,
    terms: Vec<Term>,
    courses: Vec<Course>,
    next_series_id: u64,
}

impl Default for PlannerState {
    fn default() -> Self {
        Self::new()
    }
}

impl PlannerState {
    /// Create an empty planner
    pub const fn new() -> Self {
        Self {
            items: Vec::new(),
            terms: Vec::new(),
            courses: Vec::new(),
            next_series_id: default_next_series_id(),
        }
    }

    /// Wrap into the shared form
    pub fn into_shared(self) -> SharedPlannerState {
        Arc::new(Mutex::new(self))
    }

    /// Add an item, replacing any item with the same id in place
    pub fn insert(&mut self, item: impl Into<PlannerItem>) -> ItemId {
        let item = item.into();
        let id = item.id();
        match self.position(id) {
            Some(index) => self.items[index] = item,
            None => self.items.push(item),
        }
        id
    }

    pub fn get(&self, id: ItemId) -> Option<&PlannerItem> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn get_mut(&mut self, id: ItemId) -> Option<&mut PlannerItem> {
        self.items.iter_mut().find(|item| item.id() == id)
    }

    /// Look up an event by id
    pub fn event(&self, id: ItemId) -> Option<&EventItem> {
        self.get(id).and_then(PlannerItem::as_event)
    }

    pub fn remove(&mut self, id: ItemId) -> Option<PlannerItem> {
        self.position(id).map(|index| self.items.remove(index))
    }

    /// Keep only the items matching `keep`, returning the ids of the rest
    pub fn retain<F>(&mut self, mut keep: F) -> Vec<ItemId>
    where
        F: FnMut(&PlannerItem) -> bool,
    {
        let mut removed = Vec::new();
        self.items.retain(|item| {
            let kept = keep(item);
            if !kept {
                removed.push(item.id());
            }
            kept
        });
        removed
    }

    /// Ids of every event in `series`, in collection order
    pub fn series_members(&self, series: SeriesId) -> Vec<ItemId> {
        self.items
            .iter()
            .filter_map(PlannerItem::as_event)
            .filter(|event| event.series_id() == Some(series))
            .map(|event| event.id)
            .collect()
    }

    pub fn items(&self) -> &[PlannerItem] {
        &self.items
    }

    /// Items dated within `[from, to]`, ordered by date then display slot
    pub fn items_between(&self, from: NaiveDate, to: NaiveDate) -> Vec<&PlannerItem> {
        let mut found: Vec<_> = self
            .items
            .iter()
            .filter(|item| (from..=to).contains(&item.date()))
            .collect();
        found.sort_by_key(|item| (item.date(), item.display_slot()));
        found
    }

    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    pub fn term(&self, id: TermId) -> Option<&Term> {
        self.terms.iter().find(|term| term.id == id)
    }

    pub fn push_term(&mut self, term: Term) -> TermId {
        let id = term.id;
        self.terms.push(term);
        id
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn course(&self, id: CourseId) -> Option<&Course> {
        self.courses.iter().find(|course| course.id == id)
    }

    pub fn course_mut(&mut self, id: CourseId) -> Option<&mut Course> {
        self.courses.iter_mut().find(|course| course.id == id)
    }

    pub fn push_course(&mut self, course: Course) -> CourseId {
        let id = course.id;
        self.courses.push(course);
        id
    }

    /// Every assignment, in collection order
    pub fn assignments(&self) -> impl Iterator<Item = &Assignment> {
        self.items.iter().filter_map(PlannerItem::as_assignment)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Hand out a series id no stored item carries
    pub fn allocate_series_id(&mut self) -> SeriesId {
        loop {
            let candidate = SeriesId::new(self.next_series_id.max(1));
            self.next_series_id = candidate.value().saturating_add(1);
            if self.series_members(candidate).is_empty() {
                return candidate;
            }
        }
    }

    pub fn snapshot(&self) -> PlannerSnapshot {
        PlannerSnapshot {
            items: self.items.clone(),
            terms: self.terms.clone(),
            courses: self.courses.clone(),
            next_series_id: self.next_series_id,
        }
    }

    /// Rebuild from a snapshot, moving the series counter past every stored id
    pub fn from_snapshot(snapshot: PlannerSnapshot) -> Self {
        let highest = snapshot
            .items
            .iter()
            .filter_map(PlannerItem::as_event)
            .filter_map(EventItem::series_id)
            .map(SeriesId::value)
            .max()
            .unwrap_or(0);
        Self {
            next_series_id: snapshot.next_series_id.max(highest.saturating_add(1)),
            items: snapshot.items,
            terms: snapshot.terms,
            courses: snapshot.courses,
        }
    }

    fn position(&self, id: ItemId) -> Option<usize> {
        self.items.iter().position(|item| item.id() == id)
    }
}
