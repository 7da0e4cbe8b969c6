//! Recurrences module - schedule math, templates, and materialization.

mod materializer;
mod recurrences_errors;
mod recurrences_model;
mod recurrences_service;
mod recurrences_traits;
mod schedule;


pub use materializer::{
    MaterializationReport, MissingOccurrences, OccurrenceError, RecurrenceMaterializer,
};
pub use recurrences_errors::RecurrenceError;
pub use recurrences_model::{NewRecurrence, Recurrence, RecurrenceKind, RecurrenceUpdate};
pub use recurrences_service::RecurrenceService;
pub use recurrences_traits::{
    RecurrenceMaterializerTrait, RecurrenceRepositoryTrait, RecurrenceServiceTrait,
};
pub use schedule::{
    next_occurrence, occurrence_at, occurrences, upcoming_occurrences, Frequency, Occurrences,
};
