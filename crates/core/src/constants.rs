//! Crate-wide constants.

/// Date format used for ledger dates exchanged as strings.
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Upper bound on occurrences materialized in a single scheduler run.
///
/// A daily recurrence left unattended for years would otherwise make one
/// batch invocation attempt thousands of ledger writes. Overflow is
/// reported in the run's result, never silently dropped.
pub const MAX_OCCURRENCES_PER_RUN: usize = 366;
