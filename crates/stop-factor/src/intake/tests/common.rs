use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::{json, Value};

use crate::intake::domain::{
    AccountInfo, LoanRequestId, RegPerson, RequestContent, VerifiedName,
};
use crate::intake::repository::{LoanRequestRepository, RepositoryError};
use crate::intake::service::LoanRequestIntakeService;

pub(crate) const LOAN_REQUEST_ID: &str = "0190e7b2-14a8-72e4-8528-89a8cd91d430";

pub(crate) fn payload() -> Value {
    json!({
        "loanRequestID": LOAN_REQUEST_ID,
        "regPerson": {
            "firstName": "Ogada",
            "middleName": "Isaac Abraham",
            "lastName": "Samuel"
        },
        "creditBureau": {
            "verified_name": {
                "first_name": "ISAAC",
                "other_name": "ABRAHAM SAMUEL",
                "surname": "OGADA"
            },
            "account_info": [
                {
                    "account_number": "7311",
                    "account_status": "Closed",
                    "current_balance": "0.00",
                    "date_opened": "2021-03-14",
                    "days_in_arrears": 0,
                    "is_your_account": true
                },
                {
                    "account_number": "9120",
                    "account_status": "Active",
                    "current_balance": 1520.5,
                    "overdue_date": "null"
                }
            ]
        }
    })
}

pub(crate) fn payload_with_names(id: &str, reg_first: &str, verified_first: &str) -> String {
    json!({
        "loanRequestID": id,
        "regPerson": {"firstName": reg_first},
        "verified_name": {"first_name": verified_first}
    })
    .to_string()
}

pub(crate) fn build_service() -> (LoanRequestIntakeService<MemoryRepository>, Arc<MemoryRepository>) {
    let repository = Arc::new(MemoryRepository::default());
    let service = LoanRequestIntakeService::new(repository.clone());
    (service, repository)
}

#[derive(Default)]
struct Tables {
    contents: HashMap<LoanRequestId, RequestContent>,
    reg_persons: HashMap<LoanRequestId, RegPerson>,
    verified_names: HashMap<LoanRequestId, VerifiedName>,
    accounts: HashMap<LoanRequestId, Vec<AccountInfo>>,
}

#[derive(Default, Clone)]
pub(crate) struct MemoryRepository {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryRepository {
    pub(crate) fn seed_content(&self, id: &str, content: &str) {
        let mut tables = self.tables.lock().expect("repository mutex poisoned");
        let id = LoanRequestId::new(id);
        tables.contents.insert(
            id.clone(),
            RequestContent {
                loan_request_id: id,
                content: content.to_string(),
                created_at: chrono::Utc::now(),
            },
        );
    }

    pub(crate) fn content_count(&self) -> usize {
        self.tables
            .lock()
            .expect("repository mutex poisoned")
            .contents
            .len()
    }
}

impl LoanRequestRepository for MemoryRepository {
    fn insert_request_content(
        &self,
        content: RequestContent,
    ) -> Result<RequestContent, RepositoryError> {
        let mut tables = self.tables.lock().expect("repository mutex poisoned");
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
        let tables = self.tables.lock().expect("repository mutex poisoned");
        Ok(tables.contents.get(id).cloned())
    }

    fn all_request_contents(&self) -> Result<Vec<RequestContent>, RepositoryError> {
        let tables = self.tables.lock().expect("repository mutex poisoned");
        let mut contents: Vec<_> = tables.contents.values().cloned().collect();
        contents.sort_by(|a, b| a.loan_request_id.cmp(&b.loan_request_id));
        Ok(contents)
    }

    fn insert_reg_person(&self, person: RegPerson) -> Result<(), RepositoryError> {
        let mut tables = self.tables.lock().expect("repository mutex poisoned");
        tables
            .reg_persons
            .insert(person.loan_request_id.clone(), person);
        Ok(())
    }

    fn find_reg_person(&self, id: &LoanRequestId) -> Result<Option<RegPerson>, RepositoryError> {
        let tables = self.tables.lock().expect("repository mutex poisoned");
        Ok(tables.reg_persons.get(id).cloned())
    }

    fn insert_verified_name(&self, name: VerifiedName) -> Result<(), RepositoryError> {
        let mut tables = self.tables.lock().expect("repository mutex poisoned");
        tables
            .verified_names
            .insert(name.loan_request_id.clone(), name);
        Ok(())
    }

    fn find_verified_name(
        &self,
        id: &LoanRequestId,
    ) -> Result<Option<VerifiedName>, RepositoryError> {
        let tables = self.tables.lock().expect("repository mutex poisoned");
        Ok(tables.verified_names.get(id).cloned())
    }

    fn insert_accounts(
        &self,
        id: &LoanRequestId,
        accounts: Vec<AccountInfo>,
    ) -> Result<(), RepositoryError> {
        let mut tables = self.tables.lock().expect("repository mutex poisoned");
        tables.accounts.entry(id.clone()).or_default().extend(accounts);
        Ok(())
    }

    fn find_accounts(&self, id: &LoanRequestId) -> Result<Vec<AccountInfo>, RepositoryError> {
        let tables = self.tables.lock().expect("repository mutex poisoned");
        Ok(tables.accounts.get(id).cloned().unwrap_or_default())
    }
}

pub(crate) struct UnavailableRepository;

impl LoanRequestRepository for UnavailableRepository {
    fn insert_request_content(
        &self,
        _content: RequestContent,
    ) -> Result<RequestContent, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn find_request_content(
        &self,
        _id: &LoanRequestId,
    ) -> Result<Option<RequestContent>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn all_request_contents(&self) -> Result<Vec<RequestContent>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn insert_reg_person(&self, _person: RegPerson) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn find_reg_person(&self, _id: &LoanRequestId) -> Result<Option<RegPerson>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn insert_verified_name(&self, _name: VerifiedName) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn find_verified_name(
        &self,
        _id: &LoanRequestId,
    ) -> Result<Option<VerifiedName>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn insert_accounts(
        &self,
        _id: &LoanRequestId,
        _accounts: Vec<AccountInfo>,
    ) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn find_accounts(&self, _id: &LoanRequestId) -> Result<Vec<AccountInfo>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

/// Sees no stored records yet rejects every insert, as when a concurrent request wins the race.
pub(crate) struct RacedRepository;

impl LoanRequestRepository for RacedRepository {
    fn insert_request_content(
        &self,
        _content: RequestContent,
    ) -> Result<RequestContent, RepositoryError> {
        Err(RepositoryError::Conflict)
    }

    fn find_request_content(
        &self,
        _id: &LoanRequestId,
    ) -> Result<Option<RequestContent>, RepositoryError> {
        Ok(None)
    }

    fn all_request_contents(&self) -> Result<Vec<RequestContent>, RepositoryError> {
        Ok(Vec::new())
    }

    fn insert_reg_person(&self, _person: RegPerson) -> Result<(), RepositoryError> {
        Err(RepositoryError::Conflict)
    }

    fn find_reg_person(&self, _id: &LoanRequestId) -> Result<Option<RegPerson>, RepositoryError> {
        Ok(None)
    }

    fn insert_verified_name(&self, _name: VerifiedName) -> Result<(), RepositoryError> {
        Err(RepositoryError::Conflict)
    }

    fn find_verified_name(
        &self,
        _id: &LoanRequestId,
    ) -> Result<Option<VerifiedName>, RepositoryError> {
        Ok(None)
    }

    fn insert_accounts(
        &self,
        _id: &LoanRequestId,
        _accounts: Vec<AccountInfo>,
    ) -> Result<(), RepositoryError> {
        Err(RepositoryError::Conflict)
    }

    fn find_accounts(&self, _id: &LoanRequestId) -> Result<Vec<AccountInfo>, RepositoryError> {
        Ok(Vec::new())
    }
}

pub(crate) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 4096)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
