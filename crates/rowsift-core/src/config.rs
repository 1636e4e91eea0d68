//! Declarative row source plans.
//!
//! A plan is a scan, optionally wrapped in a distinct filter:
//!
//! ```toml
//! [scan]
//! direction = "desc"
//!
//! [distinct]
//! column = "sym"
//! ```

use crate::{
    db::{
        Direction,
        executor::{DistinctRowSource, RowSourceBox, ScanRowSource},
    },
    error::{ErrorClass, ErrorOrigin, InternalError},
};
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

///
/// ConfigError
///

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("invalid plan config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("distinct column name must not be empty")]
    EmptyColumn,
}

impl From<ConfigError> for InternalError {
    fn from(err: ConfigError) -> Self {
        Self::new(ErrorClass::Unsupported, ErrorOrigin::Config, err.to_string())
    }
}

///
/// PlanConfig
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PlanConfig {
    #[serde(default)]
    pub scan: ScanConfig,

    #[serde(default)]
    pub distinct: Option<DistinctConfig>,
}

impl PlanConfig {
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(input)?;
        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(distinct) = &self.distinct
            && distinct.column.trim().is_empty()
        {
            return Err(ConfigError::EmptyColumn);
        }

        Ok(())
    }

    /// Compose the configured row sources, outermost last.
    #[must_use]
    pub fn build(&self) -> RowSourceBox {
        let scan = ScanRowSource::new(self.scan.direction);

        match &self.distinct {
            Some(distinct) => Box::new(DistinctRowSource::new(scan, distinct.column.clone())),
            None => Box::new(scan),
        }
    }
}

///
/// ScanConfig
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ScanConfig {
    #[serde(default)]
    pub direction: Direction,
}

///
/// DistinctConfig
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DistinctConfig {
    pub column: String,
}

///
/// TESTS
///
