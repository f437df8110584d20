//! Registration primitives the module loader drives.
//!
//! The loader only talks to [`Registry`]; [`crate::Container`] is the production
//! implementation and tests substitute recording fakes.

use crate::error::RegistryError;
use modkit_domain::artifact::Category;
use modkit_domain::module::Identifier;
use modkit_domain::registry::Component;
use std::collections::HashSet;
use std::fmt;
use std::hash::BuildHasher;
use std::path::Path;
use std::sync::Arc;

/// Answers whether an identifier names a declared type.
pub trait TypeIndex {
    fn type_exists(&self, identifier: &str) -> bool;
}

impl<S: BuildHasher> TypeIndex for HashSet<Identifier, S> {
    fn type_exists(&self, identifier: &str) -> bool {
        self.contains(identifier)
    }
}

impl<S: BuildHasher> TypeIndex for HashSet<String, S> {
    fn type_exists(&self, identifier: &str) -> bool {
        self.contains(identifier)
    }
}

/// Hands out components by binding name or identifier.
pub trait Resolver {
    /// # Errors
    /// Returns [`RegistryError`] when nothing is bound under `name` or construction fails.
    fn make(&self, name: &str) -> Result<Arc<dyn Component>, RegistryError>;
}

pub type Factory =
    Arc<dyn Fn(&dyn Resolver) -> Result<Arc<dyn Component>, RegistryError> + Send + Sync>;

/// How a lazy singleton produces its instance on first use.
#[derive(Clone)]
pub enum Binding {
    /// Construct the catalog type with this identifier.
    Type(Identifier),
    /// Run a host-supplied factory.
    Factory(Factory),
}

impl Binding {
    pub fn factory<T, F>(factory: F) -> Self
    where
        T: Component,
        F: Fn(&dyn Resolver) -> Result<T, RegistryError> + Send + Sync + 'static,
    {
        Self::Factory(Arc::new(move |resolver| {
            factory(resolver).map(|component| Arc::new(component) as Arc<dyn Component>)
        }))
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Type(identifier) => f.debug_tuple("Type").field(identifier).finish(),
            Self::Factory(_) => f.write_str("Factory(..)"),
        }
    }
}

/// Mutation side of the host runtime.
///
/// Every method takes `&self`; implementations guard their own tables.
pub trait Registry: TypeIndex {
    /// Instantiates the component now and caches it under its identifier.
    ///
    /// # Errors
    /// * [`RegistryError::UnknownType`] when the identifier is not declared.
    /// * [`RegistryError::Construction`] when the constructor fails.
    /// * [`RegistryError::Conflict`] when the identifier is already cached.
    fn construct_eager(&self, identifier: &Identifier) -> Result<(), RegistryError>;

    /// Registers a service provider and runs its bind phase.
    ///
    /// # Errors
    /// [`RegistryError::Conflict`] for a duplicate provider, plus any error of the provider itself.
    fn register_provider(&self, identifier: &Identifier) -> Result<(), RegistryError>;

    /// Hands a whole directory (or route file) to the category loader.
    ///
    /// # Errors
    /// Implementation specific; the container never fails here.
    fn load_from(&self, category: Category, path: &Path) -> Result<(), RegistryError>;

    /// Merges one configuration file into `namespace`. Existing keys win.
    ///
    /// # Errors
    /// [`RegistryError::Config`] when the file cannot be parsed.
    fn merge_config_from(&self, path: &Path, namespace: &str) -> Result<(), RegistryError>;

    /// # Errors
    /// [`RegistryError::Conflict`] when another command already uses the same name.
    fn register_command(&self, identifier: &Identifier) -> Result<(), RegistryError>;

    /// Binds `name` to a lazily constructed singleton. `origin` is reported on conflicts.
    ///
    /// # Errors
    /// [`RegistryError::Conflict`] when `name` is already bound.
    fn bind_singleton(&self, name: &str, binding: Binding, origin: &str) -> Result<(), RegistryError>;
}
