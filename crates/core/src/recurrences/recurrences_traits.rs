use async_trait::async_trait;
use chrono::NaiveDate;

use super::materializer::{MaterializationReport, MissingOccurrences};
use super::recurrences_model::{NewRecurrence, Recurrence, RecurrenceUpdate};
use crate::Result;

/// Trait defining the contract for recurrence repository operations.
#[async_trait]
pub trait RecurrenceRepositoryTrait: Send + Sync {
    fn get_by_id(&self, recurrence_id: &str) -> Result<Recurrence>;
    fn list(&self, owner_id: &str, is_active_filter: Option<bool>) -> Result<Vec<Recurrence>>;
    /// Active recurrences, for every owner when `owner_id` is `None`.
    fn list_active(&self, owner_id: Option<&str>) -> Result<Vec<Recurrence>>;
    async fn create(&self, new_recurrence: NewRecurrence) -> Result<Recurrence>;
    async fn update(&self, recurrence_update: RecurrenceUpdate) -> Result<Recurrence>;
    async fn set_active(&self, recurrence_id: &str, active: bool) -> Result<Recurrence>;
    async fn delete(&self, recurrence_id: &str) -> Result<usize>;
}

/// Trait defining the contract for recurrence service operations.
#[async_trait]
pub trait RecurrenceServiceTrait: Send + Sync {
    fn get_recurrence(&self, owner_id: &str, recurrence_id: &str) -> Result<Recurrence>;
    fn list_recurrences(
        &self,
        owner_id: &str,
        is_active_filter: Option<bool>,
    ) -> Result<Vec<Recurrence>>;
    async fn create_recurrence(&self, new_recurrence: NewRecurrence) -> Result<Recurrence>;
    async fn update_recurrence(
        &self,
        owner_id: &str,
        recurrence_update: RecurrenceUpdate,
    ) -> Result<Recurrence>;
    /// Active ⇄ Inactive. Materialization only runs while active; both
    /// states keep history queryable.
    async fn toggle_recurrence(&self, owner_id: &str, recurrence_id: &str) -> Result<Recurrence>;
    /// Refused while generated transactions exist.
    async fn delete_recurrence(&self, owner_id: &str, recurrence_id: &str) -> Result<usize>;
}

/// Trait defining the contract for recurrence materialization.
#[async_trait]
pub trait RecurrenceMaterializerTrait: Send + Sync {
    /// Materializes every due, not-yet-generated occurrence of one active
    /// recurrence up to `today`. Idempotent per (recurrence, date).
    async fn process_due(
        &self,
        owner_id: &str,
        recurrence_id: &str,
        today: NaiveDate,
    ) -> Result<MaterializationReport>;

    /// Best-effort batch over every active recurrence of the owner;
    /// failures are collected per recurrence and per occurrence.
    async fn process_all_due(
        &self,
        owner_id: &str,
        today: NaiveDate,
    ) -> Result<Vec<MaterializationReport>>;

    /// Gaps between the expected occurrence set and the generated
    /// transactions, per recurrence (e.g. after missed scheduled runs).
    fn check_missing(&self, owner_id: &str, today: NaiveDate) -> Result<Vec<MissingOccurrences>>;

    /// Materializes exactly the requested dates, each validated against
    /// the expected set and processed independently.
    async fn generate_missing(
        &self,
        owner_id: &str,
        recurrence_id: &str,
        dates: &[NaiveDate],
        today: NaiveDate,
    ) -> Result<MaterializationReport>;
}
