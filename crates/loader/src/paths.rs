//! Convention table: (module, kind) -> path. No I/O.

use crate::error::LoaderError;
use crate::naming::{ClassNameResolver, is_identifier_token};
use modkit_domain::artifact::ArtifactKind;
use modkit_domain::config::ModulesConfig;
use modkit_domain::module::ModuleDescriptor;
use std::path::{Path, PathBuf};

/// File name of the structured facade bindings manifest under `Providers/`.
pub const MANIFEST_FILE: &str = "bindings.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathResolver {
    base_path: PathBuf,
    app_path: PathBuf,
    route_file: String,
    names: ClassNameResolver,
}

impl PathResolver {
    #[must_use]
    pub fn from_config(config: &ModulesConfig) -> Self {
        Self {
            base_path: config.base_path.clone(),
            app_path: config.app_path.clone(),
            route_file: config.route_file.clone(),
            names: ClassNameResolver::from_config(config),
        }
    }

    #[must_use]
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    #[must_use]
    pub fn app_path(&self) -> &Path {
        &self.app_path
    }

    #[must_use]
    pub fn route_file(&self) -> &str {
        &self.route_file
    }

    #[must_use]
    pub const fn names(&self) -> &ClassNameResolver {
        &self.names
    }

    /// `{base}/{module}`.
    #[must_use]
    pub fn module_root(&self, module: &str) -> PathBuf {
        self.base_path.join(module)
    }

    /// Expected location of `kind` inside `module`.
    #[must_use]
    pub fn resolve(&self, module: &str, kind: ArtifactKind) -> PathBuf {
        let mut path = self.module_root(module);
        path.extend(kind.segments());
        if kind == ArtifactKind::Route {
            path.push(&self.route_file);
        }
        path
    }

    /// `{base}/{module}/Repositories/Migrations`.
    #[must_use]
    pub fn repository_migrations(&self, module: &str) -> PathBuf {
        self.resolve(module, ArtifactKind::Repository).join("Migrations")
    }

    /// `{base}/{module}/Providers/bindings.toml`.
    #[must_use]
    pub fn manifest_path(&self, module: &str) -> PathBuf {
        self.resolve(module, ArtifactKind::Provider).join(MANIFEST_FILE)
    }

    /// `{app}/Providers/bindings.toml`.
    #[must_use]
    pub fn app_manifest_path(&self) -> PathBuf {
        self.app_path.join("Providers").join(MANIFEST_FILE)
    }

    /// Builds the descriptor of a declared module.
    ///
    /// # Errors
    /// [`LoaderError::InvalidModule`] when `name` is not an identifier token.
    pub fn describe(&self, name: &str) -> Result<ModuleDescriptor, LoaderError> {
        if !is_identifier_token(name) {
            return Err(LoaderError::InvalidModule {
                name: name.to_owned(),
                message: "module names must be identifier tokens".into(),
                context: None,
            });
        }
        Ok(ModuleDescriptor::new(name, self.module_root(name), self.names.module_namespace(name)))
    }
}
