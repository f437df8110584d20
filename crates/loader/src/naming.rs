//! File name -> component identifier conventions.

use crate::error::LoaderError;
use modkit_domain::artifact::ArtifactKind;
use modkit_domain::config::ModulesConfig;
use modkit_domain::module::{Identifier, ModuleDescriptor};
use std::path::Path;

const MODULES_SEGMENT: &str = "Modules";
const PROVIDERS_SEGMENT: &str = "Providers";
const SERVICES_SEGMENT: &str = "Services";
const FACADES_SEGMENT: &str = "Facades";

/// `true` when `token` can be used as a type name: a letter or `_` first, then ASCII
/// alphanumerics or `_`.
#[must_use]
pub fn is_identifier_token(token: &str) -> bool {
    let mut chars = token.chars();
    chars.next().is_some_and(|first| first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Derives fully-qualified identifiers from module names and file names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassNameResolver {
    root: Identifier,
}

impl ClassNameResolver {
    pub fn new(root_namespace: impl Into<Identifier>) -> Self {
        Self { root: root_namespace.into() }
    }

    #[must_use]
    pub fn from_config(config: &ModulesConfig) -> Self {
        Self::new(config.root_namespace.as_str())
    }

    #[must_use]
    pub const fn root_namespace(&self) -> &Identifier {
        &self.root
    }

    /// `{root}::Modules::{module}`.
    #[must_use]
    pub fn module_namespace(&self, module: &str) -> Identifier {
        self.root.join(MODULES_SEGMENT).join(module)
    }

    /// Namespace mirroring the kind's directory, e.g. `App::Modules::Billing::Http::Controllers`.
    #[must_use]
    pub fn kind_namespace(&self, module: &ModuleDescriptor, kind: ArtifactKind) -> Identifier {
        module.namespace().join_all(kind.segments().iter().copied())
    }

    /// Strips the extension of `file` and qualifies the stem with the kind namespace.
    ///
    /// # Errors
    /// [`LoaderError::InvalidIdentifier`] when the stem is not an identifier token.
    pub fn identifier_for(
        &self,
        module: &ModuleDescriptor,
        kind: ArtifactKind,
        file: impl AsRef<Path>,
    ) -> Result<Identifier, LoaderError> {
        let file = file.as_ref();
        let stem = file.file_stem().and_then(|stem| stem.to_str()).unwrap_or_default();
        if !is_identifier_token(stem) {
            let shown = file.file_name().map_or_else(
                || file.display().to_string(),
                |name| name.to_string_lossy().into_owned(),
            );
            return Err(LoaderError::invalid_identifier(shown));
        }
        Ok(self.kind_namespace(module, kind).join(stem))
    }

    /// `{ns}::Providers::{M}ServiceProvider`.
    #[must_use]
    pub fn module_provider(&self, module: &ModuleDescriptor) -> Identifier {
        module.namespace().join(PROVIDERS_SEGMENT).join(module.name()).with_suffix("ServiceProvider")
    }

    /// `{ns}::Providers::ServiceProviders`, registered when `Services/` exists.
    #[must_use]
    pub fn services_provider(&self, module: &ModuleDescriptor) -> Identifier {
        module.namespace().join(PROVIDERS_SEGMENT).join("ServiceProviders")
    }

    /// `{ns}::Providers::RepositoryProviders`, registered when `Repositories/` exists.
    #[must_use]
    pub fn repositories_provider(&self, module: &ModuleDescriptor) -> Identifier {
        module.namespace().join(PROVIDERS_SEGMENT).join("RepositoryProviders")
    }

    /// Conventional companion of a facade: `{ns}::Facades::{facade}Service`.
    #[must_use]
    pub fn facade_service(&self, module: &ModuleDescriptor, facade: &str) -> Identifier {
        self.kind_namespace(module, ArtifactKind::Facade).join(facade).with_suffix("Service")
    }

    /// `{ns}::Services::{service}`.
    #[must_use]
    pub fn module_service(&self, module: &ModuleDescriptor, service: &str) -> Identifier {
        module.namespace().join(SERVICES_SEGMENT).join(service)
    }

    /// `{root}::Services::{service}`.
    #[must_use]
    pub fn app_service(&self, service: &str) -> Identifier {
        self.root.join(SERVICES_SEGMENT).join(service)
    }

    /// `{root}::Facades::{facade}`.
    #[must_use]
    pub fn app_facade(&self, facade: &str) -> Identifier {
        self.root.join(FACADES_SEGMENT).join(facade)
    }
}
