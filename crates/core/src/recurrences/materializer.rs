//! Recurrence materialization: turning schedule templates into committed
//! ledger transactions, exactly once per (recurrence, date).

use async_trait::async_trait;
use chrono::NaiveDate;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

use super::recurrences_errors::RecurrenceError;
use super::recurrences_model::Recurrence;
use super::recurrences_traits::{RecurrenceMaterializerTrait, RecurrenceRepositoryTrait};
use crate::constants::MAX_OCCURRENCES_PER_RUN;
use crate::ledger::LedgerMutatorTrait;
use crate::transactions::{Transaction, TransactionRepositoryTrait};
use crate::Result;

/// One occurrence that failed to materialize.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OccurrenceError {
    pub date: NaiveDate,
    pub message: String,
}

/// Outcome of one materialization run over a single recurrence.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterializationReport {
    pub recurrence_id: String,
    /// Transactions committed by this run.
    pub created: Vec<Transaction>,
    /// Occurrence dates already materialized by an earlier run.
    pub skipped: Vec<NaiveDate>,
    /// Per-occurrence failures; the rest of the batch still ran.
    pub errors: Vec<OccurrenceError>,
    /// True when the run hit the per-invocation occurrence cap before
    /// reaching `today`; the remainder is picked up by the next run.
    pub truncated: bool,
}

/// A recurrence with scheduled dates that have no generated transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MissingOccurrences {
    pub recurrence: Recurrence,
    pub missing_dates: Vec<NaiveDate>,
}

/// Orchestrates the pure scheduler against the ledger store.
pub struct RecurrenceMaterializer {
    recurrence_repository: Arc<dyn RecurrenceRepositoryTrait>,
    transaction_repository: Arc<dyn TransactionRepositoryTrait>,
    ledger: Arc<dyn LedgerMutatorTrait>,
}

impl RecurrenceMaterializer {
    pub fn new(
        recurrence_repository: Arc<dyn RecurrenceRepositoryTrait>,
        transaction_repository: Arc<dyn TransactionRepositoryTrait>,
        ledger: Arc<dyn LedgerMutatorTrait>,
    ) -> Self {
        Self {
            recurrence_repository,
            transaction_repository,
            ledger,
        }
    }

    fn owned_recurrence(&self, recurrence_id: &str, owner_id: &str) -> Result<Recurrence> {
        let recurrence = self.recurrence_repository.get_by_id(recurrence_id)?;
        if recurrence.owner_id != owner_id {
            return Err(RecurrenceError::NotOwned(recurrence_id.to_string()).into());
        }
        Ok(recurrence)
    }

    /// Expected occurrence dates up to `today`, capped per invocation.
    /// Returns the dates and whether the cap cut the sequence short.
    fn expected_dates(recurrence: &Recurrence, today: NaiveDate) -> (Vec<NaiveDate>, bool) {
        let mut occurrences = recurrence.occurrences_until(today);
        let dates: Vec<NaiveDate> = occurrences.by_ref().take(MAX_OCCURRENCES_PER_RUN).collect();
        let truncated = occurrences.next().is_some();
        (dates, truncated)
    }

    fn generated_dates(&self, recurrence_id: &str) -> Result<HashSet<NaiveDate>> {
        Ok(self
            .transaction_repository
            .get_recurrence_dates(recurrence_id)?
            .into_iter()
            .collect())
    }

    /// Materializes `dates` one at a time, recording per-date outcomes.
    /// A failing date never blocks the dates after it.
    async fn materialize_dates(
        &self,
        recurrence: &Recurrence,
        dates: Vec<NaiveDate>,
        existing: &HashSet<NaiveDate>,
        report: &mut MaterializationReport,
    ) {
        for date in dates {
            if existing.contains(&date) {
                report.skipped.push(date);
                continue;
            }
            match self.ledger.execute(recurrence.to_intent(date)).await {
                Ok(entry) => {
                    debug!(
                        "materialized recurrence {} occurrence {}",
                        recurrence.id, date
                    );
                    report.created.push(entry.primary().clone());
                }
                Err(err) => {
                    warn!(
                        "recurrence {} occurrence {} failed: {}",
                        recurrence.id, date, err
                    );
                    report.errors.push(OccurrenceError {
                        date,
                        message: err.to_string(),
                    });
                }
            }
        }
    }
}

#[async_trait]
impl RecurrenceMaterializerTrait for RecurrenceMaterializer {
    async fn process_due(
        &self,
        owner_id: &str,
        recurrence_id: &str,
        today: NaiveDate,
    ) -> Result<MaterializationReport> {
        let recurrence = self.owned_recurrence(recurrence_id, owner_id)?;
        if !recurrence.is_active {
            return Err(RecurrenceError::Inactive(recurrence_id.to_string()).into());
        }

        let (due, truncated) = Self::expected_dates(&recurrence, today);
        let existing = self.generated_dates(&recurrence.id)?;

        let mut report = MaterializationReport {
            recurrence_id: recurrence.id.clone(),
            truncated,
            ..Default::default()
        };
        self.materialize_dates(&recurrence, due, &existing, &mut report)
            .await;
        Ok(report)
    }

    async fn process_all_due(
        &self,
        owner_id: &str,
        today: NaiveDate,
    ) -> Result<Vec<MaterializationReport>> {
        let active = self.recurrence_repository.list_active(Some(owner_id))?;
        let mut reports = Vec::with_capacity(active.len());

        for recurrence in active {
            match self.process_due(owner_id, &recurrence.id, today).await {
                Ok(report) => reports.push(report),
                // A broken recurrence must not starve the others.
                Err(err) => {
                    warn!("recurrence {} batch run failed: {}", recurrence.id, err);
                    reports.push(MaterializationReport {
                        recurrence_id: recurrence.id.clone(),
                        errors: vec![OccurrenceError {
                            date: today,
                            message: err.to_string(),
                        }],
                        ..Default::default()
                    });
                }
            }
        }
        Ok(reports)
    }

    fn check_missing(&self, owner_id: &str, today: NaiveDate) -> Result<Vec<MissingOccurrences>> {
        let recurrences = self.recurrence_repository.list(owner_id, None)?;
        let mut gaps = Vec::new();

        for recurrence in recurrences {
            let (expected, _) = Self::expected_dates(&recurrence, today);
            let existing = self.generated_dates(&recurrence.id)?;
            let missing_dates: Vec<NaiveDate> = expected
                .into_iter()
                .filter(|date| !existing.contains(date))
                .collect();
            if !missing_dates.is_empty() {
                gaps.push(MissingOccurrences {
                    recurrence,
                    missing_dates,
                });
            }
        }
        Ok(gaps)
    }

    async fn generate_missing(
        &self,
        owner_id: &str,
        recurrence_id: &str,
        dates: &[NaiveDate],
        today: NaiveDate,
    ) -> Result<MaterializationReport> {
        let recurrence = self.owned_recurrence(recurrence_id, owner_id)?;

        let (expected, truncated) = Self::expected_dates(&recurrence, today);
        let expected: HashSet<NaiveDate> = expected.into_iter().collect();
        let existing = self.generated_dates(&recurrence.id)?;

        let mut report = MaterializationReport {
            recurrence_id: recurrence.id.clone(),
            truncated,
            ..Default::default()
        };

        let mut valid = Vec::new();
        for date in dates {
            if expected.contains(date) {
                valid.push(*date);
            } else {
                report.errors.push(OccurrenceError {
                    date: *date,
                    message: format!(
                        "{} is not a scheduled occurrence of recurrence {}",
                        date, recurrence.id
                    ),
                });
            }
        }

        self.materialize_dates(&recurrence, valid, &existing, &mut report)
            .await;
        Ok(report)
    }
}
