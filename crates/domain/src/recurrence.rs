//! Recurring event expansion
//!
//! Turns a seed event carrying a [`RecurrenceRule`] into the concrete
//! instances the rule selects. Pure and synchronous; the caller decides
//! where the instances are stored.

use chrono::NaiveDate;

use crate::{
    entities::{EventItem, Frequency, RecurrenceRule},
    errors::DomainError,
};

/// Every date in `[start_date, end_date]` the rule selects, in order
///
/// # Errors
///
/// Returns [`DomainError::MalformedRecurrence`] if the rule fails validation.
pub fn occurrence_dates(rule: &RecurrenceRule) -> Result<Vec<NaiveDate>, DomainError> {
    if rule.frequency == Frequency::None {
        return Ok(Vec::new());
    }
    rule.validate()?;

    Ok(rule
        .start_date
        .iter_days()
        .take_while(|day| *day <= rule.end_date)
        .filter(|day| rule.selects(*day))
        .collect())
}

/// Clone the seed onto every selected date except its own
///
/// Each clone gets a fresh id and shares the seed's series id and all other
/// fields as they are at the time of the call.
///
/// # Errors
///
/// Fails without producing anything if the rule is malformed or the seed
/// has not been assigned a series id.
pub fn materialize(seed: &EventItem) -> Result<Vec<EventItem>, DomainError> {
    let Some(rule) = seed.recurrence.as_ref() else {
        return Ok(Vec::new());
    };
    if rule.frequency == Frequency::None {
        return Ok(Vec::new());
    }
    if rule.series_id.is_none() {
        return Err(DomainError::NotPermitted(format!(
            "event {} has a repeat pattern but no series",
            seed.id
        )));
    }

    Ok(occurrence_dates(rule)?
        .into_iter()
        .filter(|day| *day != seed.date)
        .map(|day| seed.instance_on(day))
        .collect())
}
