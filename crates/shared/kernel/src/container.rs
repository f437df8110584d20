//! The host container: the production [`Registry`].

use crate::catalog::TypeCatalog;
use crate::error::{RegistryError, RegistryErrorExt};
use crate::provider::{Command, ServiceProvider};
use crate::registry::{Binding, Registry, Resolver, TypeIndex};
use config::{Config, File};
use fxhash::FxHashMap;
use modkit_domain::artifact::Category;
use modkit_domain::module::Identifier;
use modkit_domain::registry::{Component, downcast};
use parking_lot::{Mutex, RwLock};
use serde_json::{Map, Value};
use std::cell::RefCell;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

thread_local! {
    // (container address, binding name) pairs currently under construction on this thread.
    static RESOLVING: RefCell<Vec<(usize, String)>> = const { RefCell::new(Vec::new()) };
}

struct ResolvingGuard {
    key: (usize, String),
}

impl ResolvingGuard {
    fn enter(container: &Container, name: &str) -> Result<Self, RegistryError> {
        let key = (std::ptr::from_ref(container).addr(), name.to_owned());
        RESOLVING.with_borrow_mut(|stack| {
            if stack.contains(&key) {
                return Err(RegistryError::CircularDependency { name: key.1.clone(), context: None });
            }
            stack.push(key.clone());
            Ok(Self { key })
        })
    }
}

impl Drop for ResolvingGuard {
    fn drop(&mut self) {
        RESOLVING.with_borrow_mut(|stack| {
            if let Some(pos) = stack.iter().rposition(|entry| *entry == self.key) {
                stack.remove(pos);
            }
        });
    }
}

struct SingletonBinding {
    binding: Binding,
    origin: String,
    instance: Mutex<Option<Arc<dyn Component>>>,
}

struct CommandEntry {
    identifier: Identifier,
    command: Arc<dyn Command>,
}

#[derive(Default)]
struct ProviderTable {
    entries: Vec<(Identifier, Arc<dyn ServiceProvider>)>,
    booted: bool,
}

/// Owns the type catalog and every table the loader fills.
///
/// All tables sit behind their own lock. Lazy singletons are built under the
/// binding's lock only, so constructors may resolve other components.
pub struct Container {
    catalog: TypeCatalog,
    instances: RwLock<FxHashMap<Identifier, Arc<dyn Component>>>,
    singletons: RwLock<FxHashMap<String, Arc<SingletonBinding>>>,
    providers: Mutex<ProviderTable>,
    commands: RwLock<FxHashMap<String, CommandEntry>>,
    sources: RwLock<FxHashMap<Category, Vec<PathBuf>>>,
    configs: RwLock<FxHashMap<String, Value>>,
}

impl Container {
    #[must_use]
    pub fn new(catalog: TypeCatalog) -> Self {
        Self {
            catalog,
            instances: RwLock::default(),
            singletons: RwLock::default(),
            providers: Mutex::default(),
            commands: RwLock::default(),
            sources: RwLock::default(),
            configs: RwLock::default(),
        }
    }

    #[must_use]
    pub const fn catalog(&self) -> &TypeCatalog {
        &self.catalog
    }

    /// Resolves `name`: eager instance, then singleton binding, then a fresh catalog construction.
    ///
    /// # Errors
    /// * [`RegistryError::UnknownType`] when nothing answers to `name`.
    /// * [`RegistryError::Unresolvable`] when a singleton binding cannot produce its instance.
    /// * [`RegistryError::CircularDependency`] on re-entrant resolution of the same name.
    pub fn make(&self, name: &str) -> Result<Arc<dyn Component>, RegistryError> {
        if let Some(instance) = self.instances.read().get(name) {
            return Ok(Arc::clone(instance));
        }

        let _guard = ResolvingGuard::enter(self, name)?;
        let binding = self.singletons.read().get(name).cloned();
        match binding {
            Some(binding) => self.resolve_singleton(name, &binding),
            None => self.catalog.construct(name, self),
        }
    }

    /// Typed variant of [`Container::make`].
    ///
    /// # Errors
    /// Every error of [`Container::make`], plus [`RegistryError::Unresolvable`] when the
    /// instance is not a `T`.
    pub fn resolve<T: Component>(&self, name: &str) -> Result<Arc<T>, RegistryError> {
        let component = self.make(name)?;
        downcast::<T>(component).ok_or_else(|| {
            RegistryError::unresolvable(name, format!("not a {}", std::any::type_name::<T>()))
        })
    }

    fn resolve_singleton(
        &self,
        name: &str,
        binding: &SingletonBinding,
    ) -> Result<Arc<dyn Component>, RegistryError> {
        let mut slot = binding.instance.lock();
        if let Some(instance) = slot.as_ref() {
            return Ok(Arc::clone(instance));
        }

        let instance = match &binding.binding {
            Binding::Type(identifier) => {
                // A singleton bound to its own identifier must not look itself up again.
                if identifier.as_str() == name {
                    self.catalog.construct(name, self)
                } else {
                    self.make(identifier.as_str())
                }
            },
            Binding::Factory(factory) => factory(self),
        }
        .map_err(|err| match err {
            RegistryError::UnknownType { identifier, .. } => {
                RegistryError::unresolvable(name, format!("unknown type {identifier}"))
            },
            RegistryError::Construction { identifier, message, .. } => {
                RegistryError::unresolvable(name, format!("{identifier}: {message}"))
            },
            other => other,
        })?;

        debug!(binding = %name, origin = %binding.origin, "Singleton constructed");
        *slot = Some(Arc::clone(&instance));
        Ok(instance)
    }

    /// Runs the boot phase of every registered provider, in registration order.
    ///
    /// A provider that fails to boot does not stop the others. Providers registered afterwards
    /// are booted on registration. Calling this twice is a no-op.
    ///
    /// Returns each provider whose `boot` failed, with its error.
    #[must_use = "boot failures belong in the load report"]
    pub fn boot(&self) -> Vec<(Identifier, RegistryError)> {
        let providers = {
            let mut table = self.providers.lock();
            if table.booted {
                return Vec::new();
            }
            table.booted = true;
            table.entries.clone()
        };

        let failures: Vec<_> = providers
            .iter()
            .filter_map(|(identifier, provider)| {
                let err = provider.boot(self).context(format!("Booting {identifier}")).err()?;
                warn!(%identifier, error = %err, "Provider failed to boot");
                Some((identifier.clone(), err))
            })
            .collect();
        info!(providers = providers.len(), failed = failures.len(), "Container booted");
        failures
    }

    #[must_use]
    pub fn is_booted(&self) -> bool {
        self.providers.lock().booted
    }

    /// Eagerly constructed instance cached under `identifier`.
    #[must_use]
    pub fn instance(&self, identifier: &str) -> Option<Arc<dyn Component>> {
        self.instances.read().get(identifier).cloned()
    }

    #[must_use]
    pub fn instance_count(&self) -> usize {
        self.instances.read().len()
    }

    #[must_use]
    pub fn has_binding(&self, name: &str) -> bool {
        self.singletons.read().contains_key(name)
    }

    /// Bound singleton names, sorted.
    #[must_use]
    pub fn binding_names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.singletons.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Where the binding for `name` was declared.
    #[must_use]
    pub fn binding_origin(&self, name: &str) -> Option<String> {
        self.singletons.read().get(name).map(|binding| binding.origin.clone())
    }

    /// Registered provider identifiers, in registration order.
    #[must_use]
    pub fn providers(&self) -> Vec<Identifier> {
        self.providers.lock().entries.iter().map(|(identifier, _)| identifier.clone()).collect()
    }

    #[must_use]
    pub fn command(&self, name: &str) -> Option<Arc<dyn Command>> {
        self.commands.read().get(name).map(|entry| Arc::clone(&entry.command))
    }

    /// Registered command names, sorted.
    #[must_use]
    pub fn command_names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.commands.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Paths handed to `category`, in registration order.
    #[must_use]
    pub fn sources(&self, category: Category) -> Vec<PathBuf> {
        self.sources.read().get(&category).cloned().unwrap_or_default()
    }

    /// Merged configuration tree of `namespace`.
    #[must_use]
    pub fn config(&self, namespace: &str) -> Option<Value> {
        self.configs.read().get(namespace).cloned()
    }

    /// Looks up a dotted key, e.g. `billing.currency`.
    #[must_use]
    pub fn config_value(&self, key: &str) -> Option<Value> {
        let mut parts = key.split('.');
        let namespace = parts.next()?;
        let configs = self.configs.read();
        let mut node = configs.get(namespace)?;
        for part in parts {
            node = node.get(part)?;
        }
        Some(node.clone())
    }

    /// Pre-populates host configuration. Keys set here win over merged module files.
    pub fn seed_config(&self, namespace: &str, value: Value) {
        let mut configs = self.configs.write();
        match configs.get_mut(namespace) {
            Some(existing) => overlay(existing, value),
            None => {
                configs.insert(namespace.to_owned(), value);
            },
        }
    }
}

impl TypeIndex for Container {
    fn type_exists(&self, identifier: &str) -> bool {
        self.catalog.contains(identifier)
    }
}

impl Resolver for Container {
    fn make(&self, name: &str) -> Result<Arc<dyn Component>, RegistryError> {
        Self::make(self, name)
    }
}

impl Registry for Container {
    fn construct_eager(&self, identifier: &Identifier) -> Result<(), RegistryError> {
        if self.instances.read().contains_key(identifier) {
            return Err(RegistryError::conflict(identifier.as_str(), identifier.as_str(), identifier.as_str()));
        }

        let instance = {
            let _guard = ResolvingGuard::enter(self, identifier.as_str())?;
            self.catalog.construct(identifier.as_str(), self).map_err(|err| match err {
                RegistryError::UnknownType { .. }
                | RegistryError::Construction { .. }
                | RegistryError::CircularDependency { .. } => err,
                other => RegistryError::construction(identifier.as_str(), other.to_string()),
            })?
        };

        let mut instances = self.instances.write();
        if instances.contains_key(identifier) {
            return Err(RegistryError::conflict(identifier.as_str(), identifier.as_str(), identifier.as_str()));
        }
        instances.insert(identifier.clone(), instance);
        debug!(%identifier, "Eager instance cached");
        Ok(())
    }

    fn register_provider(&self, identifier: &Identifier) -> Result<(), RegistryError> {
        if self.providers.lock().entries.iter().any(|(existing, _)| existing == identifier) {
            return Err(RegistryError::conflict(identifier.as_str(), identifier.as_str(), identifier.as_str()))
                .context("Provider already registered");
        }

        let provider = self.catalog.provider(identifier.as_str())?;
        provider.register(self).context(format!("Registering {identifier}"))?;

        let booted = {
            let mut table = self.providers.lock();
            if table.entries.iter().any(|(existing, _)| existing == identifier) {
                return Err(RegistryError::conflict(identifier.as_str(), identifier.as_str(), identifier.as_str()))
                    .context("Provider already registered");
            }
            table.entries.push((identifier.clone(), Arc::clone(&provider)));
            table.booted
        };
        debug!(%identifier, booted, "Provider registered");

        if booted {
            provider.boot(self).context(format!("Booting {identifier}"))?;
        }
        Ok(())
    }

    fn load_from(&self, category: Category, path: &Path) -> Result<(), RegistryError> {
        let mut sources = self.sources.write();
        let paths = sources.entry(category).or_default();
        if !paths.iter().any(|known| known == path) {
            paths.push(path.to_path_buf());
            debug!(%category, path = %path.display(), "Source registered");
        }
        Ok(())
    }

    fn merge_config_from(&self, path: &Path, namespace: &str) -> Result<(), RegistryError> {
        let incoming = Config::builder()
            .add_source(File::from(path).required(true))
            .build()
            .and_then(|config| config.try_deserialize::<Value>())
            .context(format!("Merging {}", path.display()))?;

        let mut configs = self.configs.write();
        let target = configs.entry(namespace.to_owned()).or_insert_with(|| Value::Object(Map::new()));
        fill_missing(target, incoming);
        debug!(namespace, path = %path.display(), "Config merged");
        Ok(())
    }

    fn register_command(&self, identifier: &Identifier) -> Result<(), RegistryError> {
        let command = self.catalog.command(identifier.as_str())?;
        let name = command.name().to_owned();

        let mut commands = self.commands.write();
        if let Some(existing) = commands.get(&name) {
            return Err(RegistryError::conflict(name, existing.identifier.as_str(), identifier.as_str()))
                .context("Console command name taken");
        }
        debug!(command = %name, %identifier, "Command registered");
        commands.insert(name, CommandEntry { identifier: identifier.clone(), command });
        Ok(())
    }

    fn bind_singleton(&self, name: &str, binding: Binding, origin: &str) -> Result<(), RegistryError> {
        let mut singletons = self.singletons.write();
        if let Some(existing) = singletons.get(name) {
            return Err(RegistryError::conflict(name, existing.origin.as_str(), origin));
        }
        debug!(name, origin, ?binding, "Singleton bound");
        singletons.insert(
            name.to_owned(),
            Arc::new(SingletonBinding { binding, origin: origin.to_owned(), instance: Mutex::new(None) }),
        );
        Ok(())
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("catalog", &self.catalog.len())
            .field("instances", &self.instance_count())
            .field("singletons", &self.binding_names())
            .field("providers", &self.providers())
            .field("commands", &self.command_names())
            .finish_non_exhaustive()
    }
}

/// Copies keys of `incoming` that `target` lacks. Existing values win at every depth.
fn fill_missing(target: &mut Value, incoming: Value) {
    if let (Value::Object(target), Value::Object(incoming)) = (target, incoming) {
        for (key, value) in incoming {
            match target.get_mut(&key) {
                Some(existing) => fill_missing(existing, value),
                None => {
                    target.insert(key, value);
                },
            }
        }
    }
}

/// Writes `incoming` over `target`. Nested objects are merged key by key.
fn overlay(target: &mut Value, incoming: Value) {
    match (target, incoming) {
        (Value::Object(target), Value::Object(incoming)) => {
            for (key, value) in incoming {
                match target.get_mut(&key) {
                    Some(existing) => overlay(existing, value),
                    None => {
                        target.insert(key, value);
                    },
                }
            }
        },
        (target, incoming) => *target = incoming,
    }
}
