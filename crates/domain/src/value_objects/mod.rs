//! Value Objects - Immutable, identity-less domain primitives

mod course_id;
mod item_id;
mod priority;
mod series_id;
mod term_id;
mod weekday_set;

pub use course_id::CourseId;
pub use item_id::ItemId;
pub use priority::Priority;
pub use series_id::SeriesId;
pub use term_id::TermId;
pub use weekday_set::WeekdaySet;
