//! SQLite storage implementation for recurrences.

mod model;
mod repository;

pub use model::RecurrenceDB;
pub use repository::RecurrenceRepository;
