//! Loan-request intake and stop-factor screening.
//!
//! [`matching`] holds the pure fuzzy name comparison. [`intake`], [`settings`] and [`screening`]
//! wrap it with payload extraction, storage contracts and HTTP routes.

pub mod config;
pub mod error;
pub mod intake;
pub mod matching;
pub mod screening;
pub mod settings;
pub mod telemetry;
