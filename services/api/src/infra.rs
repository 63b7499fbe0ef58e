use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use stop_factor::config::MatchingConfig;
use stop_factor::intake::{
    AccountInfo, LoanRequestId, LoanRequestRepository, RegPerson, RepositoryError, RequestContent,
    VerifiedName,
};
use stop_factor::settings::{Setting, SettingsError, SettingsRepository, SettingsService};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default)]
struct Tables {
    contents: HashMap<LoanRequestId, RequestContent>,
    reg_persons: HashMap<LoanRequestId, RegPerson>,
    verified_names: HashMap<LoanRequestId, VerifiedName>,
    accounts: HashMap<LoanRequestId, Vec<AccountInfo>>,
}

/// Process-local stand-in for the loan-request tables.
#[derive(Default, Clone)]
pub(crate) struct InMemoryLoanRequestRepository {
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryLoanRequestRepository {
    fn tables(&self) -> Result<std::sync::MutexGuard<'_, Tables>, RepositoryError> {
        self.tables
            .lock()
            .map_err(|_| RepositoryError::Unavailable("repository mutex poisoned".to_string()))
    }
}

impl LoanRequestRepository for InMemoryLoanRequestRepository {
    fn insert_request_content(
        &self,
        content: RequestContent,
    ) -> Result<RequestContent, RepositoryError> {
        let mut tables = self.tables()?;
        if tables.contents.contains_key(&content.loan_request_id) {
            return Err(RepositoryError::Conflict);
        }
        tables
            .contents
            .insert(content.loan_request_id.clone(), content.clone());
        Ok(content)
    }

    fn find_request_content(
        &self,
        id: &LoanRequestId,
    ) -> Result<Option<RequestContent>, RepositoryError> {
        Ok(self.tables()?.contents.get(id).cloned())
    }

    fn all_request_contents(&self) -> Result<Vec<RequestContent>, RepositoryError> {
        let mut contents: Vec<_> = self.tables()?.contents.values().cloned().collect();
        contents.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(contents)
    }

    fn insert_reg_person(&self, person: RegPerson) -> Result<(), RepositoryError> {
        let mut tables = self.tables()?;
        if tables.reg_persons.contains_key(&person.loan_request_id) {
            return Err(RepositoryError::Conflict);
        }
        tables
            .reg_persons
            .insert(person.loan_request_id.clone(), person);
        Ok(())
    }

    fn find_reg_person(&self, id: &LoanRequestId) -> Result<Option<RegPerson>, RepositoryError> {
        Ok(self.tables()?.reg_persons.get(id).cloned())
    }

    fn insert_verified_name(&self, name: VerifiedName) -> Result<(), RepositoryError> {
        let mut tables = self.tables()?;
        if tables.verified_names.contains_key(&name.loan_request_id) {
            return Err(RepositoryError::Conflict);
        }
        tables
            .verified_names
            .insert(name.loan_request_id.clone(), name);
        Ok(())
    }

    fn find_verified_name(
        &self,
        id: &LoanRequestId,
    ) -> Result<Option<VerifiedName>, RepositoryError> {
        Ok(self.tables()?.verified_names.get(id).cloned())
    }

    fn insert_accounts(
        &self,
        id: &LoanRequestId,
        accounts: Vec<AccountInfo>,
    ) -> Result<(), RepositoryError> {
        self.tables()?
            .accounts
            .entry(id.clone())
            .or_default()
            .extend(accounts);
        Ok(())
    }

    fn find_accounts(&self, id: &LoanRequestId) -> Result<Vec<AccountInfo>, RepositoryError> {
        Ok(self.tables()?.accounts.get(id).cloned().unwrap_or_default())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemorySettingsRepository {
    values: Arc<Mutex<HashMap<String, String>>>,
}

impl SettingsRepository for InMemorySettingsRepository {
    fn find_by_name(&self, name: &str) -> Result<Option<Setting>, RepositoryError> {
        let guard = self
            .values
            .lock()
            .map_err(|_| RepositoryError::Unavailable("settings mutex poisoned".to_string()))?;
        Ok(guard.get(name).map(|value| Setting {
            name: name.to_string(),
            value: value.clone(),
        }))
    }

    fn upsert(&self, setting: Setting) -> Result<(), RepositoryError> {
        let mut guard = self
            .values
            .lock()
            .map_err(|_| RepositoryError::Unavailable("settings mutex poisoned".to_string()))?;
        guard.insert(setting.name, setting.value);
        Ok(())
    }
}

/// Settings store seeded from configuration; stays empty when no threshold is configured.
pub(crate) fn seeded_settings(
    config: &MatchingConfig,
) -> Result<SettingsService<InMemorySettingsRepository>, SettingsError> {
    let settings = SettingsService::new(Arc::new(InMemorySettingsRepository::default()));
    if let Some(threshold) = config.distance_ratio_threshold {
        settings.set_distance_ratio_threshold(threshold)?;
        info!(threshold, "distance ratio threshold seeded from configuration");
    }
    Ok(settings)
}
