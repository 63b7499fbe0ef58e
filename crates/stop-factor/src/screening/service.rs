use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

use crate::intake::{LoanRequestId, LoanRequestRepository, RepositoryError};
use crate::matching::{normalize_name, SimilarityEngine, SimilarityThreshold};
use crate::settings::{SettingsError, SettingsRepository, SettingsService};

/// Stop-factor outcome for one stored loan request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StopFactorReport {
    pub loan_request_id: LoanRequestId,
    pub reg_person: String,
    pub verified_name: String,
    pub stop_factor: bool,
}

/// Service combining stored identities, the configured threshold and the matching engine.
pub struct StopFactorService<R, S> {
    repository: Arc<R>,
    settings: SettingsService<S>,
    engine: SimilarityEngine,
}

impl<R, S> StopFactorService<R, S>
where
    R: LoanRequestRepository + 'static,
    S: SettingsRepository + 'static,
{
    pub fn new(repository: Arc<R>, settings: SettingsService<S>) -> Self {
        Self::with_engine(repository, settings, SimilarityEngine::default())
    }

    pub fn with_engine(
        repository: Arc<R>,
        settings: SettingsService<S>,
        engine: SimilarityEngine,
    ) -> Self {
        Self {
            repository,
            settings,
            engine,
        }
    }

    /// Compare two assembled names using the stored threshold.
    pub fn calculate(
        &self,
        reg_person: Option<&str>,
        verified_name: Option<&str>,
    ) -> Result<bool, StopFactorServiceError> {
        let threshold = self.settings.distance_ratio_threshold()?;
        Ok(self
            .engine
            .is_stop_factor(reg_person, verified_name, threshold))
    }

    /// Evaluate the identities stored for `loan_request_id`.
    pub fn evaluate(
        &self,
        loan_request_id: &LoanRequestId,
    ) -> Result<StopFactorReport, StopFactorServiceError> {
        let threshold = self.settings.distance_ratio_threshold()?;
        self.evaluate_with(loan_request_id, threshold)?
            .ok_or_else(|| StopFactorServiceError::IdentityNotFound(loan_request_id.clone()))
    }

    /// Evaluate every stored loan request that carries both identities.
    pub fn evaluate_all(&self) -> Result<Vec<StopFactorReport>, StopFactorServiceError> {
        let threshold = self.settings.distance_ratio_threshold()?;
        let mut reports = Vec::new();

        for request in self.repository.all_request_contents()? {
            match self.evaluate_with(&request.loan_request_id, threshold)? {
                Some(report) => reports.push(report),
                None => debug!(
                    loan_request_id = %request.loan_request_id,
                    "skipping request without both identities"
                ),
            }
        }

        Ok(reports)
    }

    fn evaluate_with(
        &self,
        loan_request_id: &LoanRequestId,
        threshold: SimilarityThreshold,
    ) -> Result<Option<StopFactorReport>, StopFactorServiceError> {
        let reg_person = self.repository.find_reg_person(loan_request_id)?;
        let verified_name = self.repository.find_verified_name(loan_request_id)?;

        let (Some(reg_person), Some(verified_name)) = (reg_person, verified_name) else {
            return Ok(None);
        };

        let reg_person = normalize_name(Some(&reg_person));
        let verified_name = normalize_name(Some(&verified_name));
        let stop_factor = self.engine.is_stop_factor(
            Some(reg_person.as_str()),
            Some(verified_name.as_str()),
            threshold,
        );

        info!(
            %loan_request_id,
            %reg_person,
            %verified_name,
            stop_factor,
            "stop factor evaluated"
        );

        Ok(Some(StopFactorReport {
            loan_request_id: loan_request_id.clone(),
            reg_person,
            verified_name,
            stop_factor,
        }))
    }
}

/// Error raised by the stop-factor service.
#[derive(Debug, thiserror::Error)]
pub enum StopFactorServiceError {
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("loan request {0} has no registration or verified identity")]
    IdentityNotFound(LoanRequestId),
}
