use crate::container::Container;
use crate::error::RegistryError;
use std::fmt::Debug;

/// A unit of registration logic, run in two phases.
///
/// `register` runs as soon as the provider is registered; `boot` runs once the
/// container boots (or immediately, when registered after boot).
pub trait ServiceProvider: Debug + Send + Sync {
    /// Bind phase: declare bindings, nothing else.
    ///
    /// # Errors
    /// Any [`RegistryError`] raised while binding.
    fn register(&self, container: &Container) -> Result<(), RegistryError>;

    /// Boot phase: every provider is registered by now, so resolving is safe.
    ///
    /// # Errors
    /// Any [`RegistryError`] raised while resolving.
    fn boot(&self, _container: &Container) -> Result<(), RegistryError> {
        Ok(())
    }
}

/// A console command. The container deduplicates commands by [`Command::name`].
pub trait Command: Debug + Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str {
        ""
    }
}
