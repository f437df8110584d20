//! Static declaration of every type the container may construct.

use crate::error::{RegistryError, RegistryErrorExt};
use crate::provider::{Command, ServiceProvider};
use crate::registry::{Resolver, TypeIndex};
use fxhash::FxHashMap;
use modkit_domain::module::Identifier;
use modkit_domain::registry::Component;
use std::fmt;
use std::sync::Arc;

type ComponentCtor =
    Arc<dyn Fn(&dyn Resolver) -> Result<Arc<dyn Component>, RegistryError> + Send + Sync>;
type ProviderCtor = Arc<dyn Fn() -> Arc<dyn ServiceProvider> + Send + Sync>;
type CommandCtor = Arc<dyn Fn() -> Arc<dyn Command> + Send + Sync>;

#[derive(Clone)]
pub(crate) enum Entry {
    Component(ComponentCtor),
    Provider(ProviderCtor),
    Command(CommandCtor),
}

impl Entry {
    const fn label(&self) -> &'static str {
        match self {
            Self::Component(_) => "component",
            Self::Provider(_) => "provider",
            Self::Command(_) => "command",
        }
    }
}

/// Identifier -> constructor table. Immutable once built.
#[derive(Clone, Default)]
pub struct TypeCatalog {
    entries: FxHashMap<Identifier, Entry>,
}

impl TypeCatalog {
    #[must_use]
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::default()
    }

    #[must_use]
    pub fn contains(&self, identifier: &str) -> bool {
        self.entries.contains_key(identifier)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Declared identifiers, sorted.
    #[must_use]
    pub fn identifiers(&self) -> Vec<&Identifier> {
        let mut ids: Vec<_> = self.entries.keys().collect();
        ids.sort();
        ids
    }

    pub(crate) fn construct(
        &self,
        identifier: &str,
        resolver: &dyn Resolver,
    ) -> Result<Arc<dyn Component>, RegistryError> {
        match self.entries.get(identifier) {
            Some(Entry::Component(ctor)) => ctor(resolver),
            Some(other) => Err(not_a(identifier, "component", other)),
            None => Err(RegistryError::unknown(identifier)),
        }
    }

    pub(crate) fn provider(&self, identifier: &str) -> Result<Arc<dyn ServiceProvider>, RegistryError> {
        match self.entries.get(identifier) {
            Some(Entry::Provider(ctor)) => Ok(ctor()),
            Some(other) => Err(not_a(identifier, "provider", other)),
            None => Err(RegistryError::unknown(identifier)),
        }
    }

    pub(crate) fn command(&self, identifier: &str) -> Result<Arc<dyn Command>, RegistryError> {
        match self.entries.get(identifier) {
            Some(Entry::Command(ctor)) => Ok(ctor()),
            Some(other) => Err(not_a(identifier, "command", other)),
            None => Err(RegistryError::unknown(identifier)),
        }
    }
}

impl TypeIndex for TypeCatalog {
    fn type_exists(&self, identifier: &str) -> bool {
        self.contains(identifier)
    }
}

impl fmt::Debug for TypeCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeCatalog").field("identifiers", &self.identifiers()).finish()
    }
}

fn not_a(identifier: &str, expected: &str, found: &Entry) -> RegistryError {
    RegistryError::construction(
        identifier,
        format!("declared as a {}, not a {expected}", found.label()),
    )
}

/// Collects catalog entries. Duplicates are reported by [`CatalogBuilder::build`].
#[derive(Default)]
pub struct CatalogBuilder {
    entries: FxHashMap<Identifier, Entry>,
    duplicates: Vec<Identifier>,
}

impl CatalogBuilder {
    #[must_use]
    pub fn component<T, F>(self, identifier: impl Into<Identifier>, ctor: F) -> Self
    where
        T: Component,
        F: Fn(&dyn Resolver) -> Result<T, RegistryError> + Send + Sync + 'static,
    {
        self.insert(
            identifier.into(),
            Entry::Component(Arc::new(move |resolver| {
                ctor(resolver).map(|component| Arc::new(component) as Arc<dyn Component>)
            })),
        )
    }

    #[must_use]
    pub fn provider<P, F>(self, identifier: impl Into<Identifier>, ctor: F) -> Self
    where
        P: ServiceProvider + 'static,
        F: Fn() -> P + Send + Sync + 'static,
    {
        self.insert(
            identifier.into(),
            Entry::Provider(Arc::new(move || Arc::new(ctor()) as Arc<dyn ServiceProvider>)),
        )
    }

    #[must_use]
    pub fn command<C, F>(self, identifier: impl Into<Identifier>, ctor: F) -> Self
    where
        C: Command + 'static,
        F: Fn() -> C + Send + Sync + 'static,
    {
        self.insert(
            identifier.into(),
            Entry::Command(Arc::new(move || Arc::new(ctor()) as Arc<dyn Command>)),
        )
    }

    fn insert(mut self, identifier: Identifier, entry: Entry) -> Self {
        if self.entries.contains_key(&identifier) {
            self.duplicates.push(identifier);
        } else {
            self.entries.insert(identifier, entry);
        }
        self
    }

    /// # Errors
    /// Returns [`RegistryError::Conflict`] for the first identifier declared twice.
    pub fn build(self) -> Result<TypeCatalog, RegistryError> {
        if let Some(duplicate) = self.duplicates.into_iter().next() {
            let name = duplicate.to_string();
            return Err(RegistryError::conflict(name.clone(), name.clone(), name))
                .context("Duplicate catalog entry");
        }
        Ok(TypeCatalog { entries: self.entries })
    }
}

impl fmt::Debug for CatalogBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CatalogBuilder")
            .field("entries", &self.entries.len())
            .field("duplicates", &self.duplicates)
            .finish()
    }
}
