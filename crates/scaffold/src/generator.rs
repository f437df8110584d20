use crate::error::{ScaffoldError, ScaffoldErrorExt};
use crate::stub::StubKind;
use modkit_domain::config::ModulesConfig;
use modkit_domain::module::Identifier;
use modkit_loader::{BindingManifest, FacadeEntry, PathResolver, ServiceScope, is_identifier_token};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::PathBuf;
use tracing::{debug, info, instrument};

/// A file written by a generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generated {
    pub kind: StubKind,
    pub identifier: Identifier,
    pub path: PathBuf,
}

/// Result of [`Generator::facade`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFacade {
    pub facade: Generated,
    /// Set when no service existed and one was generated.
    pub service: Option<Generated>,
    pub entry: FacadeEntry,
    pub manifest: PathBuf,
    /// `false` when the manifest already held the same entry.
    pub manifest_updated: bool,
}

/// Writes controllers, services, entities and facades at their conventional locations.
#[derive(Debug, Clone)]
pub struct Generator {
    paths: PathResolver,
    extension: String,
}

impl Generator {
    #[must_use]
    pub fn new(paths: PathResolver, extension: impl Into<String>) -> Self {
        Self { paths, extension: extension.into() }
    }

    #[must_use]
    pub fn from_config(config: &ModulesConfig) -> Self {
        Self::new(PathResolver::from_config(config), config.source_extension.as_str())
    }

    #[must_use]
    pub const fn paths(&self) -> &PathResolver {
        &self.paths
    }

    /// Where `name` of `kind` would be written, and under which identifier.
    ///
    /// # Errors
    /// [`ScaffoldError::InvalidName`] for names (or module names) that are not identifier tokens.
    pub fn target(
        &self,
        kind: StubKind,
        name: &str,
        module: Option<&str>,
    ) -> Result<(Identifier, PathBuf), ScaffoldError> {
        if !is_identifier_token(name) {
            return Err(ScaffoldError::InvalidName { name: name.to_owned(), context: None });
        }
        let artifact = kind.artifact();
        let file = format!("{name}.{}", self.extension);

        match module {
            Some(module) => {
                let descriptor = self.paths.describe(module)?;
                let namespace = self.paths.names().kind_namespace(&descriptor, artifact);
                Ok((namespace.join(name), self.paths.resolve(module, artifact).join(file)))
            },
            None => {
                let segments = artifact.segments();
                let namespace = self.paths.names().root_namespace().join_all(segments.iter().copied());
                let mut path = self.paths.app_path().to_path_buf();
                path.extend(segments);
                Ok((namespace.join(name), path.join(file)))
            },
        }
    }

    /// Renders the stub of `kind` for `name` and writes it. Never overwrites.
    ///
    /// # Errors
    /// * [`ScaffoldError::TargetExists`] when the file is already there.
    /// * [`ScaffoldError::InvalidName`] for unusable names.
    /// * [`ScaffoldError::Io`] when the file or its directories cannot be created.
    #[instrument(skip(self))]
    pub fn generate(&self, kind: StubKind, name: &str, module: Option<&str>) -> Result<Generated, ScaffoldError> {
        let (identifier, path) = self.target(kind, name, module)?;
        let namespace = identifier.as_str().rsplit_once("::").map_or("", |(namespace, _)| namespace);
        let source = kind.render(namespace, name);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context(format!("Creating {}", parent.display()))?;
        }
        let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::AlreadyExists => {
                return Err(ScaffoldError::TargetExists { path, context: None });
            },
            Err(err) => return Err(err).context(format!("Creating {}", path.display())),
        };
        file.write_all(source.as_bytes()).context(format!("Writing {}", path.display()))?;

        info!(%kind, %identifier, path = %path.display(), "Generated");
        Ok(Generated { kind, identifier, path })
    }

    /// Generates facade `name`, makes sure its service exists and records the pair in the
    /// bindings manifest of the module (or of the application).
    ///
    /// The service defaults to `{name}Service`. With a module, the module's `Services/` is
    /// searched before the application's; a missing service is generated beside the facade's scope.
    ///
    /// # Errors
    /// Every error of [`Generator::generate`], plus manifest read and write failures.
    #[instrument(skip(self))]
    pub fn facade(
        &self,
        name: &str,
        service: Option<&str>,
        module: Option<&str>,
    ) -> Result<GeneratedFacade, ScaffoldError> {
        let service = service.map_or_else(|| format!("{name}Service"), str::to_owned);
        if !is_identifier_token(&service) {
            return Err(ScaffoldError::InvalidName { name: service, context: None });
        }
        // Validate the service target before anything is written.
        self.target(StubKind::Service, &service, module)?;

        let facade = self.generate(StubKind::Facade, name, module)?;

        let (scope, generated) = match self.locate_service(&service, module)? {
            Some(scope) => (scope, None),
            None => {
                let generated = self.generate(StubKind::Service, &service, module)?;
                let scope = if module.is_some() { ServiceScope::Module } else { ServiceScope::App };
                (scope, Some(generated))
            },
        };

        let manifest = match module {
            Some(module) => self.paths.manifest_path(module),
            None => self.paths.app_manifest_path(),
        };
        let entry = FacadeEntry::new(name, service, scope);
        let mut bindings = BindingManifest::load(&manifest)?;
        let manifest_updated = bindings.upsert(entry.clone());
        if manifest_updated {
            bindings.save(&manifest)?;
        }
        debug!(manifest = %manifest.display(), updated = manifest_updated, "Facade binding recorded");

        Ok(GeneratedFacade { facade, service: generated, entry, manifest, manifest_updated })
    }

    /// Scope of an existing service file named `service`: module first, then application.
    fn locate_service(&self, service: &str, module: Option<&str>) -> Result<Option<ServiceScope>, ScaffoldError> {
        if let Some(module) = module {
            let (_, path) = self.target(StubKind::Service, service, Some(module))?;
            if path.is_file() {
                return Ok(Some(ServiceScope::Module));
            }
        }
        let (_, path) = self.target(StubKind::Service, service, None)?;
        Ok(path.is_file().then_some(ServiceScope::App))
    }
}
