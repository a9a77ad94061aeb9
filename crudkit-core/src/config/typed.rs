use super::{ConfigError, CrudConfig};

/// Trait for strongly-typed configuration sections.
///
/// ```ignore
/// impl ConfigProperties for RepositoryConfig {
///     fn prefix() -> &'static str { "crudkit" }
///
///     fn from_config(config: &CrudConfig) -> Result<Self, ConfigError> {
///         Ok(Self { limit: config.get_or("crudkit.list.limit", None)?, .. })
///     }
/// }
/// ```
pub trait ConfigProperties: Sized {
    /// The configuration key prefix (e.g., `"crudkit"`).
    fn prefix() -> &'static str;

    /// Construct from a `CrudConfig` instance.
    fn from_config(config: &CrudConfig) -> Result<Self, ConfigError>;

    /// Absolute key for a property relative to [`prefix`](Self::prefix).
    fn key(relative: &str) -> String {
        format!("{}.{relative}", Self::prefix())
    }
}
