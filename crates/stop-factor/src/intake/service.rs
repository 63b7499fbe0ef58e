use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error, info};

use super::domain::{LoanRequestId, LoanRequestPayload, RequestContent};
use super::extract::parse_payload;
use super::repository::{LoanRequestRepository, RepositoryError};

/// Service turning raw loan-request payloads into stored entities.
pub struct LoanRequestIntakeService<R> {
    repository: Arc<R>,
}

impl<R> LoanRequestIntakeService<R>
where
    R: LoanRequestRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Parse and store a single payload. Entities already stored for the loan request are kept.
    pub fn process(&self, raw: &str) -> Result<LoanRequestId, IntakeError> {
        let payload = parse_payload(raw)?;
        let loan_request_id = payload.loan_request_id.clone();
        self.store(payload)?;
        Ok(loan_request_id)
    }

    /// Re-run extraction over every stored payload, skipping the ones that fail.
    pub fn process_all(&self) -> Result<BatchSummary, IntakeError> {
        let mut summary = BatchSummary::default();

        for request in self.repository.all_request_contents()? {
            match self.process(&request.content) {
                Ok(_) => summary.processed += 1,
                Err(err) => {
                    error!(
                        loan_request_id = %request.loan_request_id,
                        error = %err,
                        "failed to process stored request"
                    );
                    summary.failed += 1;
                }
            }
        }

        info!(
            processed = summary.processed,
            failed = summary.failed,
            "stored requests reprocessed"
        );
        Ok(summary)
    }

    fn store(&self, payload: LoanRequestPayload) -> Result<(), IntakeError> {
        let LoanRequestPayload {
            loan_request_id,
            content,
            reg_person,
            verified_name,
            accounts,
        } = payload;

        if self
            .repository
            .find_request_content(&loan_request_id)?
            .is_none()
        {
            let inserted = self.repository.insert_request_content(RequestContent {
                loan_request_id: loan_request_id.clone(),
                content,
                created_at: Utc::now(),
            });
            if stored_now(inserted, &loan_request_id)? {
                debug!(%loan_request_id, "stored request content");
            }
        }

        if let Some(person) = reg_person {
            if self.repository.find_reg_person(&loan_request_id)?.is_none()
                && stored_now(self.repository.insert_reg_person(person), &loan_request_id)?
            {
                debug!(%loan_request_id, "stored registration identity");
            }
        }

        if let Some(name) = verified_name {
            if self.repository.find_verified_name(&loan_request_id)?.is_none()
                && stored_now(self.repository.insert_verified_name(name), &loan_request_id)?
            {
                debug!(%loan_request_id, "stored verified identity");
            }
        }

        if let Some(accounts) = accounts {
            if self.repository.find_accounts(&loan_request_id)?.is_empty() {
                let count = accounts.len();
                let inserted = self.repository.insert_accounts(&loan_request_id, accounts);
                if stored_now(inserted, &loan_request_id)? {
                    debug!(%loan_request_id, count, "stored bureau accounts");
                }
            }
        }

        Ok(())
    }
}

/// A conflicting insert means a concurrent request stored the record first.
fn stored_now<T>(
    result: Result<T, RepositoryError>,
    loan_request_id: &LoanRequestId,
) -> Result<bool, RepositoryError> {
    match result {
        Ok(_) => Ok(true),
        Err(RepositoryError::Conflict) => {
            debug!(%loan_request_id, "record already stored by a concurrent request");
            Ok(false)
        }
        Err(other) => Err(other),
    }
}

/// Outcome counts of a batch reprocessing run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub processed: usize,
    pub failed: usize,
}

/// Error raised while ingesting a payload.
#[derive(Debug, thiserror::Error)]
pub enum IntakeError {
    #[error("malformed JSON request: {0}")]
    MalformedJson(#[from] serde_json::Error),
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
