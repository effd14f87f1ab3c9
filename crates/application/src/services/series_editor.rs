//! Series editing
//!
//! Adds, edits and removes events while keeping every recurrence series
//! consistent. Each operation computes its result before touching the state,
//! so a failure leaves the planner unchanged.

use chrono::NaiveDate;
use domain::{
    Assignment, EventEdit, EventItem, Frequency, ItemId, PlannerItem, RecurrenceRule, SeriesId,
    SeriesScope, recurrence,
};
use tracing::{debug, info};

use crate::{
    error::ApplicationError,
    services::course_catalog::check_course_reference,
    state::PlannerState,
};

/// Ids touched by one mutation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    pub created: Vec<ItemId>,
    pub removed: Vec<ItemId>,
    pub updated: Vec<ItemId>,
}

impl ChangeSet {
    /// Check if nothing changed
    pub fn is_empty(&self) -> bool {
        self.created.is_empty() && self.removed.is_empty() && self.updated.is_empty()
    }
}

/// Mutations on a borrowed [`PlannerState`]
#[derive(Debug)]
pub struct SeriesEditor<'a> {
    state: &'a mut PlannerState,
}

impl<'a> SeriesEditor<'a> {
    pub fn new(state: &'a mut PlannerState) -> Self {
        Self { state }
    }

    /// Store a new event, expanding it when it carries a repeat pattern
    ///
    /// Any series id on the incoming rule is replaced by a fresh one.
    pub fn add_event(&mut self, mut event: EventItem) -> Result<ChangeSet, ApplicationError> {
        event.detach();
        let clones = self.expand_new_series(&mut event)?;

        let mut changes = ChangeSet::default();
        changes.created.push(self.state.insert(event));
        changes.created.extend(self.insert_all(clones));
        info!(created = changes.created.len(), "Added event");
        Ok(changes)
    }

    /// Store an assignment
    ///
    /// # Errors
    ///
    /// Fails if the assignment names a course or assignment type the
    /// planner does not know.
    pub fn add_assignment(
        &mut self,
        assignment: Assignment,
    ) -> Result<ChangeSet, ApplicationError> {
        check_course_reference(self.state, &assignment)?;
        let id = self.state.insert(assignment);
        debug!(item = %id, "Added assignment");
        Ok(ChangeSet {
            created: vec![id],
            ..ChangeSet::default()
        })
    }

    /// Make an existing event the seed of a new series
    pub fn attach_recurrence(
        &mut self,
        item_id: ItemId,
        rule: RecurrenceRule,
    ) -> Result<ChangeSet, ApplicationError> {
        let mut seed = self.event(item_id)?.clone();
        seed.recurrence = Some(RecurrenceRule {
            series_id: None,
            ..rule
        });
        let clones = self.expand_new_series(&mut seed)?;

        let mut changes = ChangeSet {
            updated: vec![self.state.insert(seed)],
            ..ChangeSet::default()
        };
        changes.created = self.insert_all(clones);
        info!(item = %item_id, created = changes.created.len(), "Attached recurrence");
        Ok(changes)
    }

    /// Apply `edit` to an event and, depending on `scope`, its siblings
    pub fn edit_event(
        &mut self,
        item_id: ItemId,
        edit: &EventEdit,
        scope: SeriesScope,
    ) -> Result<ChangeSet, ApplicationError> {
        let original = self.event(item_id)?.clone();
        let Some(series) = original.series_id() else {
            return self.edit_single(original, edit);
        };

        match scope {
            SeriesScope::ThisInstance => self.edit_single(original, edit),
            SeriesScope::AllInSeries => self.edit_all(original, series, edit),
            SeriesScope::AllFollowing => self.edit_following(original, series, edit),
        }
    }

    /// Remove an item and, depending on `scope`, its siblings
    pub fn remove_item(
        &mut self,
        item_id: ItemId,
        scope: SeriesScope,
    ) -> Result<ChangeSet, ApplicationError> {
        let item = self
            .state
            .get(item_id)
            .ok_or(ApplicationError::ItemNotFound(item_id))?;
        let series = item.as_event().and_then(EventItem::series_id);
        let cut = item.date();

        let mut changes = ChangeSet::default();
        match (series, scope) {
            (None, _) | (Some(_), SeriesScope::ThisInstance) => {
                self.state.remove(item_id);
                changes.removed.push(item_id);
            },
            (Some(series), SeriesScope::AllInSeries) => {
                changes.removed = self
                    .state
                    .retain(|item| series_of(item) != Some(series));
            },
            (Some(series), SeriesScope::AllFollowing) => {
                changes.removed = self
                    .state
                    .retain(|item| series_of(item) != Some(series) || item.date() < cut);
                changes.updated = self.truncate_and_rekey(series, cut);
            },
        }
        info!(item = %item_id, %scope, removed = changes.removed.len(), "Removed item");
        Ok(changes)
    }

    /// Copy an item under a new id; copied events stand alone
    pub fn duplicate_item(&mut self, item_id: ItemId) -> Result<ChangeSet, ApplicationError> {
        let copy = self
            .state
            .get(item_id)
            .ok_or(ApplicationError::ItemNotFound(item_id))?
            .duplicate();
        let id = self.state.insert(copy);
        debug!(source = %item_id, copy = %id, "Duplicated item");
        Ok(ChangeSet {
            created: vec![id],
            ..ChangeSet::default()
        })
    }

    /// Mark an assignment done or open
    pub fn set_assignment_done(
        &mut self,
        item_id: ItemId,
        done: bool,
    ) -> Result<ChangeSet, ApplicationError> {
        self.assignment_mut(item_id)?.set_done(done);
        Ok(ChangeSet {
            updated: vec![item_id],
            ..ChangeSet::default()
        })
    }

    /// Record an assignment's grade, or clear it with `None`
    pub fn set_assignment_grade(
        &mut self,
        item_id: ItemId,
        grade: Option<String>,
    ) -> Result<ChangeSet, ApplicationError> {
        let assignment = self.assignment_mut(item_id)?;
        assignment.set_grade(grade);
        debug!(item = %item_id, grade = ?assignment.grade, "Graded assignment");
        Ok(ChangeSet {
            updated: vec![item_id],
            ..ChangeSet::default()
        })
    }

    /// Edit one event, detaching it from any series
    ///
    /// A replacement repeat pattern turns the event into the seed of a new series.
    fn edit_single(
        &mut self,
        original: EventItem,
        edit: &EventEdit,
    ) -> Result<ChangeSet, ApplicationError> {
        let mut updated = original;
        updated.detach();
        edit.apply_to(&mut updated);
        let clones = if edit.recurrence.is_some() {
            self.expand_new_series(&mut updated)?
        } else {
            Vec::new()
        };

        let mut changes = ChangeSet {
            updated: vec![self.state.insert(updated)],
            ..ChangeSet::default()
        };
        changes.created = self.insert_all(clones);
        Ok(changes)
    }

    /// Edit the whole series: the edited event becomes the seed and the
    /// siblings are regenerated from it
    fn edit_all(
        &mut self,
        original: EventItem,
        series: SeriesId,
        edit: &EventEdit,
    ) -> Result<ChangeSet, ApplicationError> {
        let seed_id = original.id;
        let mut seed = original;
        edit.apply_to(&mut seed);
        let clones = recurrence::materialize(&seed)?;
        if clones.is_empty() && !seed.recurrence.as_ref().is_some_and(RecurrenceRule::is_recurring)
        {
            seed.detach();
        }

        let removed = self
            .state
            .retain(|item| item.id() == seed_id || series_of(item) != Some(series));
        let mut changes = ChangeSet {
            removed,
            updated: vec![self.state.insert(seed)],
            ..ChangeSet::default()
        };
        changes.created = self.insert_all(clones);
        info!(%series, regenerated = changes.created.len(), "Edited whole series");
        Ok(changes)
    }

    /// Split the series at the edited event: earlier siblings end the day
    /// before it, the edited event seeds a new series from its own date
    ///
    /// Unless the edit moves the event or replaces the pattern, the new
    /// series keeps the old one's interval phase.
    fn edit_following(
        &mut self,
        original: EventItem,
        series: SeriesId,
        edit: &EventEdit,
    ) -> Result<ChangeSet, ApplicationError> {
        let seed_id = original.id;
        let cut = original.date;
        let mut seed = original;
        seed.detach();
        edit.apply_to(&mut seed);
        let keeps_phase = seed.date == cut && edit.recurrence.is_none();
        if let Some(rule) = seed.recurrence.as_mut() {
            if keeps_phase {
                rule.start_on(cut);
            } else {
                rule.anchor = None;
                rule.start_date = seed.date;
            }
        }
        let clones = self.expand_new_series(&mut seed)?;

        let removed = self.state.retain(|item| {
            item.id() == seed_id || series_of(item) != Some(series) || item.date() < cut
        });
        let seed_id = self.state.insert(seed);
        let mut updated = self.truncate_series(series, cut);
        updated.push(seed_id);
        let changes = ChangeSet {
            created: self.insert_all(clones),
            removed,
            updated,
        };
        info!(%series, created = changes.created.len(), "Split series");
        Ok(changes)
    }

    /// Validate the seed's rule, give it a fresh series id and expand it
    ///
    /// A seed without a rule, or with a non-repeating one, stays standalone.
    fn expand_new_series(
        &mut self,
        seed: &mut EventItem,
    ) -> Result<Vec<EventItem>, ApplicationError> {
        let Some(rule) = seed.recurrence.as_mut() else {
            return Ok(Vec::new());
        };
        if rule.frequency == Frequency::None {
            rule.series_id = None;
            return Ok(Vec::new());
        }
        rule.validate()?;
        rule.series_id = Some(self.state.allocate_series_id());
        Ok(recurrence::materialize(seed)?)
    }

    /// End every remaining member of `series` the day before `cut`
    fn truncate_series(&mut self, series: SeriesId, cut: NaiveDate) -> Vec<ItemId> {
        let end = cut.pred_opt().unwrap_or(cut);
        let members = self.state.series_members(series);
        for id in &members {
            if let Some(rule) = self
                .state
                .get_mut(*id)
                .and_then(PlannerItem::as_event_mut)
                .and_then(|event| event.recurrence.as_mut())
            {
                rule.end_date = end;
                rule.start_date = rule.start_date.min(end);
            }
        }
        members
    }

    /// Truncate the remainder of `series` and move it under a fresh id
    fn truncate_and_rekey(&mut self, series: SeriesId, cut: NaiveDate) -> Vec<ItemId> {
        let members = self.truncate_series(series, cut);
        if members.is_empty() {
            return members;
        }
        let fresh = self.state.allocate_series_id();
        for id in &members {
            if let Some(rule) = self
                .state
                .get_mut(*id)
                .and_then(PlannerItem::as_event_mut)
                .and_then(|event| event.recurrence.as_mut())
            {
                rule.series_id = Some(fresh);
            }
        }
        debug!(from = %series, to = %fresh, members = members.len(), "Re-keyed series");
        members
    }

    fn assignment_mut(&mut self, item_id: ItemId) -> Result<&mut Assignment, ApplicationError> {
        self.state
            .get_mut(item_id)
            .ok_or(ApplicationError::ItemNotFound(item_id))?
            .as_assignment_mut()
            .ok_or_else(|| {
                ApplicationError::WrongItemKind(format!("{item_id} is not an assignment"))
            })
    }

    fn event(&self, item_id: ItemId) -> Result<&EventItem, ApplicationError> {
        self.state
            .get(item_id)
            .ok_or(ApplicationError::ItemNotFound(item_id))?
            .as_event()
            .ok_or_else(|| ApplicationError::WrongItemKind(format!("{item_id} is not an event")))
    }

    fn insert_all(&mut self, events: Vec<EventItem>) -> Vec<ItemId> {
        events
            .into_iter()
            .map(|event| self.state.insert(event))
            .collect()
    }
}

fn series_of(item: &PlannerItem) -> Option<SeriesId> {
    item.as_event().and_then(EventItem::series_id)
}
