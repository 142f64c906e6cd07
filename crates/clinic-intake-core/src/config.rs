//! Core runtime configuration.
//!
//! Resolved once at process startup and passed into `IntakeCore`, so nothing
//! in the core reads environment variables while handling requests.

use std::path::{Path, PathBuf};

use crate::recorder::UnknownTemplatePolicy;
use crate::IntakeError;

/// Path that opens a private in-memory SQLite database.
pub const IN_MEMORY_DATABASE: &str = ":memory:";

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    database_path: PathBuf,
    unknown_template_policy: UnknownTemplatePolicy,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    pub fn new(
        database_path: PathBuf,
        unknown_template_policy: UnknownTemplatePolicy,
    ) -> Result<Self, IntakeError> {
        if database_path.as_os_str().is_empty() {
            return Err(IntakeError::InvalidInput(
                "database path cannot be empty".into(),
            ));
        }

        Ok(Self {
            database_path,
            unknown_template_policy,
        })
    }

    /// Configuration for an in-memory database (tests, demos).
    pub fn in_memory() -> Self {
        Self {
            database_path: PathBuf::from(IN_MEMORY_DATABASE),
            unknown_template_policy: UnknownTemplatePolicy::default(),
        }
    }

    pub fn with_unknown_template_policy(mut self, policy: UnknownTemplatePolicy) -> Self {
        self.unknown_template_policy = policy;
        self
    }

    pub fn database_path(&self) -> &Path {
        &self.database_path
    }

    pub fn is_in_memory(&self) -> bool {
        self.database_path.as_os_str() == IN_MEMORY_DATABASE
    }

    pub fn unknown_template_policy(&self) -> UnknownTemplatePolicy {
        self.unknown_template_policy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_path_rejected() {
        let result = CoreConfig::new(PathBuf::new(), UnknownTemplatePolicy::Reject);
        assert!(matches!(result, Err(IntakeError::InvalidInput(_))));
    }

    #[test]
    fn test_in_memory() {
        let config = CoreConfig::in_memory();
        assert!(config.is_in_memory());
        assert_eq!(config.unknown_template_policy(), UnknownTemplatePolicy::Degrade);

        let file = CoreConfig::new("intake.db".into(), UnknownTemplatePolicy::Reject).unwrap();
        assert!(!file.is_in_memory());
        assert_eq!(file.unknown_template_policy(), UnknownTemplatePolicy::Reject);
    }
}
