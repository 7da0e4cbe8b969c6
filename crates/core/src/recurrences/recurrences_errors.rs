use thiserror::Error;

/// Errors raised by recurrence management and materialization.
#[derive(Error, Debug)]
pub enum RecurrenceError {
    #[error("Recurrence '{0}' is inactive")]
    Inactive(String),

    #[error("Recurrence '{0}' is not owned by the caller")]
    NotOwned(String),

    #[error("Invalid schedule: {0}")]
    InvalidSchedule(String),

    #[error("Recurrence '{0}' still owns generated transactions; deactivate it instead")]
    HasTransactions(String),
}
