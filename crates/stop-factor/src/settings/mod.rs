//! Named runtime settings, most importantly the name-matching threshold.

use serde::{Deserialize, Serialize};
use std::num::ParseFloatError;
use std::sync::Arc;
use tracing::warn;

use crate::intake::RepositoryError;
use crate::matching::SimilarityThreshold;

/// Setting holding the minimum Levenshtein ratio for a stop-factor match.
pub const DISTANCE_RATIO_THRESHOLD: &str = "distanceRatioThreshold";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Setting {
    pub name: String,
    pub value: String,
}

pub trait SettingsRepository: Send + Sync {
    fn find_by_name(&self, name: &str) -> Result<Option<Setting>, RepositoryError>;
    fn upsert(&self, setting: Setting) -> Result<(), RepositoryError>;
}

/// Typed access to the settings store.
pub struct SettingsService<S> {
    repository: Arc<S>,
}

impl<S> Clone for SettingsService<S> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<S> SettingsService<S>
where
    S: SettingsRepository + 'static,
{
    pub fn new(repository: Arc<S>) -> Self {
        Self { repository }
    }

    pub fn distance_ratio_threshold(&self) -> Result<SimilarityThreshold, SettingsError> {
        let setting = self
            .repository
            .find_by_name(DISTANCE_RATIO_THRESHOLD)?
            .ok_or(SettingsError::Missing {
                name: DISTANCE_RATIO_THRESHOLD,
            })?;

        let value: f64 = setting
            .value
            .trim()
            .parse()
            .map_err(|source| SettingsError::Invalid {
                name: DISTANCE_RATIO_THRESHOLD,
                value: setting.value.clone(),
                source,
            })?;

        let threshold = SimilarityThreshold::new(value);
        if !threshold.is_in_unit_range() {
            warn!(
                threshold = value,
                "distance ratio threshold outside [0, 1]; matching sensitivity is skewed"
            );
        }
        Ok(threshold)
    }

    pub fn set_distance_ratio_threshold(&self, value: f64) -> Result<(), SettingsError> {
        self.repository.upsert(Setting {
            name: DISTANCE_RATIO_THRESHOLD.to_string(),
            value: value.to_string(),
        })?;
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("setting '{name}' is not configured")]
    Missing { name: &'static str },
    #[error("setting '{name}' has non-numeric value '{value}'")]
    Invalid {
        name: &'static str,
        value: String,
        #[source]
        source: ParseFloatError,
    },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
