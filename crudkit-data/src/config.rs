use crudkit_core::{ConfigError, ConfigProperties, CrudConfig};

/// Tunables shared by every repository, read from the `crudkit.*` keys.
///
/// ```yaml
/// crudkit:
///   list:
///     limit: 50
///     max: 500
///   sql:
///     quote: true
///   update:
///     lock: false
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryConfig {
    /// Limit used when a list query carries none.
    pub default_limit: Option<u64>,
    /// Upper bound applied to every list limit.
    pub max_limit: Option<u64>,
    pub quote_identifiers: bool,
    /// Lock the row (`FOR UPDATE NOWAIT`) while updating, where supported.
    pub lock_on_update: bool,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            default_limit: None,
            max_limit: None,
            quote_identifiers: false,
            lock_on_update: true,
        }
    }
}

impl RepositoryConfig {
    /// The limit to apply for a requested one: the default fills a missing
    /// limit, and the maximum caps the result.
    pub fn effective_limit(&self, requested: Option<u64>) -> Option<u64> {
        match (requested.or(self.default_limit), self.max_limit) {
            (Some(limit), Some(max)) => Some(limit.min(max)),
            (None, Some(max)) => Some(max),
            (limit, None) => limit,
        }
    }
}

impl ConfigProperties for RepositoryConfig {
    fn prefix() -> &'static str {
        "crudkit"
    }

    fn from_config(config: &CrudConfig) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            default_limit: config.get_or(&Self::key("list.limit"), defaults.default_limit)?,
            max_limit: config.get_or(&Self::key("list.max"), defaults.max_limit)?,
            quote_identifiers: config.get_or(&Self::key("sql.quote"), defaults.quote_identifiers)?,
            lock_on_update: config.get_or(&Self::key("update.lock"), defaults.lock_on_update)?,
        })
    }
}
