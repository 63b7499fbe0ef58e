//! Loan-request payload intake.
//!
//! Payloads are parsed once, and the registration identity, bureau-verified identity and bureau
//! accounts they carry are stored through [`LoanRequestRepository`]. Reprocessing a payload never
//! overwrites entities that already exist for its loan request.

pub mod domain;
mod extract;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
pub(crate) mod tests;

pub use domain::{
    AccountInfo, LoanRequestId, LoanRequestPayload, RegPerson, RequestContent, VerifiedName,
};
pub use repository::{LoanRequestRepository, RepositoryError};
pub use router::intake_router;
pub use service::{BatchSummary, IntakeError, LoanRequestIntakeService};
