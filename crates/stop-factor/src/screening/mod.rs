//! Stop-factor screening of stored loan requests.

pub mod router;
pub mod service;

pub use router::screening_router;
pub use service::{StopFactorReport, StopFactorService, StopFactorServiceError};
