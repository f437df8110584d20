use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub const NAMESPACE_SEPARATOR: &str = "::";

/// A fully-qualified component identifier, e.g. `App::Modules::Billing::Facades::Invoice`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identifier(String);

impl Identifier {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Appends one namespace segment.
    #[must_use]
    pub fn join(&self, segment: &str) -> Self {
        if self.0.is_empty() {
            return Self(segment.to_owned());
        }
        Self(format!("{}{NAMESPACE_SEPARATOR}{segment}", self.0))
    }

    #[must_use]
    pub fn join_all<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> Self {
        segments.into_iter().fold(self.clone(), |id, segment| id.join(segment))
    }

    /// Appends `suffix` to the last segment (`Invoice` -> `InvoiceService`).
    #[must_use]
    pub fn with_suffix(&self, suffix: &str) -> Self {
        Self(format!("{}{suffix}", self.0))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Last namespace segment, i.e. the short type name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.0.rsplit(NAMESPACE_SEPARATOR).next().unwrap_or(&self.0)
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Identifier {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Identifier {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for Identifier {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A declared module. Built once from configuration and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModuleDescriptor {
    name: Arc<str>,
    base_path: PathBuf,
    namespace: Identifier,
}

impl ModuleDescriptor {
    pub fn new(name: impl Into<Arc<str>>, base_path: impl Into<PathBuf>, namespace: Identifier) -> Self {
        Self { name: name.into(), base_path: base_path.into(), namespace }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Module root directory, e.g. `app/Modules/Billing`.
    #[must_use]
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Module namespace, e.g. `App::Modules::Billing`.
    #[must_use]
    pub const fn namespace(&self) -> &Identifier {
        &self.namespace
    }
}

impl fmt::Display for ModuleDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
