use super::domain::{AccountInfo, LoanRequestId, RegPerson, RequestContent, VerifiedName};

/// Storage abstraction for everything extracted from loan-request payloads.
///
/// Each entity is stored at most once per loan request; callers check for an existing record
/// before inserting, and implementations may reject duplicates with [`RepositoryError::Conflict`].
pub trait LoanRequestRepository: Send + Sync {
    fn insert_request_content(
        &self,
        content: RequestContent,
    ) -> Result<RequestContent, RepositoryError>;
    fn find_request_content(
        &self,
        id: &LoanRequestId,
    ) -> Result<Option<RequestContent>, RepositoryError>;
    fn all_request_contents(&self) -> Result<Vec<RequestContent>, RepositoryError>;

    fn insert_reg_person(&self, person: RegPerson) -> Result<(), RepositoryError>;
    fn find_reg_person(&self, id: &LoanRequestId) -> Result<Option<RegPerson>, RepositoryError>;

    fn insert_verified_name(&self, name: VerifiedName) -> Result<(), RepositoryError>;
    fn find_verified_name(
        &self,
        id: &LoanRequestId,
    ) -> Result<Option<VerifiedName>, RepositoryError>;

    fn insert_accounts(
        &self,
        id: &LoanRequestId,
        accounts: Vec<AccountInfo>,
    ) -> Result<(), RepositoryError>;
    fn find_accounts(&self, id: &LoanRequestId) -> Result<Vec<AccountInfo>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
