//! Structured facade bindings (`Providers/bindings.toml`).
//!
//! ```toml
//! [[facade]]
//! name = "Invoice"
//! service = "InvoiceService"
//! scope = "module"
//! ```

use crate::error::{LoaderError, LoaderErrorExt};
use crate::naming::ClassNameResolver;
use modkit_domain::module::{Identifier, ModuleDescriptor, NAMESPACE_SEPARATOR};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::debug;

/// Where a manifest's service name is looked up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceScope {
    /// `{module}::Services::{service}`.
    #[default]
    Module,
    /// `{root}::Services::{service}`.
    App,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacadeEntry {
    pub name: String,
    /// Short service name, or a fully-qualified identifier.
    pub service: String,
    #[serde(default)]
    pub scope: ServiceScope,
}

impl FacadeEntry {
    pub fn new(name: impl Into<String>, service: impl Into<String>, scope: ServiceScope) -> Self {
        Self { name: name.into(), service: service.into(), scope }
    }

    /// Fully-qualified service identifier. Module scope without a module falls back to app scope.
    #[must_use]
    pub fn service_identifier(
        &self,
        names: &ClassNameResolver,
        module: Option<&ModuleDescriptor>,
    ) -> Identifier {
        if self.service.contains(NAMESPACE_SEPARATOR) {
            return Identifier::new(self.service.as_str());
        }
        match (self.scope, module) {
            (ServiceScope::Module, Some(module)) => names.module_service(module, &self.service),
            _ => names.app_service(&self.service),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingManifest {
    #[serde(default, rename = "facade", skip_serializing_if = "Vec::is_empty")]
    pub facades: Vec<FacadeEntry>,
}

impl BindingManifest {
    /// Reads the manifest at `path`. A missing file is an empty manifest.
    ///
    /// # Errors
    /// * [`LoaderError::UnreadablePath`] when the file exists but cannot be read.
    /// * [`LoaderError::Manifest`] when it is not a valid manifest.
    pub fn load(path: &Path) -> Result<Self, LoaderError> {
        match fs::read_to_string(path) {
            Ok(raw) => Self::parse(&raw).context(format!("Parsing {}", path.display())),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(LoaderError::unreadable(path, err)),
        }
    }

    /// # Errors
    /// [`LoaderError::Manifest`] on malformed TOML or unknown scope values.
    pub fn parse(raw: &str) -> Result<Self, LoaderError> {
        Ok(toml::from_str(raw)?)
    }

    #[must_use]
    pub fn get(&self, facade: &str) -> Option<&FacadeEntry> {
        self.facades.iter().find(|entry| entry.name == facade)
    }

    /// Inserts or replaces the entry for `entry.name`. Returns `false` when nothing changed.
    pub fn upsert(&mut self, entry: FacadeEntry) -> bool {
        match self.facades.iter_mut().find(|existing| existing.name == entry.name) {
            Some(existing) if *existing == entry => false,
            Some(existing) => {
                *existing = entry;
                true
            },
            None => {
                self.facades.push(entry);
                true
            },
        }
    }

    /// Writes the manifest, creating parent directories.
    ///
    /// # Errors
    /// [`LoaderError::ManifestWrite`] or [`LoaderError::Io`].
    pub fn save(&self, path: &Path) -> Result<(), LoaderError> {
        let raw = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context(format!("Creating {}", parent.display()))?;
        }
        fs::write(path, raw).context(format!("Writing {}", path.display()))?;
        debug!(path = %path.display(), facades = self.facades.len(), "Bindings manifest saved");
        Ok(())
    }
}
