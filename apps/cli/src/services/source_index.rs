//! Answers `type_exists` from the source tree, for commands that run without a host catalog.

use modkit::domain::module::NAMESPACE_SEPARATOR;
use modkit::kernel::TypeIndex;
use modkit::loader::PathResolver;
use std::path::PathBuf;

const MODULES_SEGMENT: &str = "Modules";

/// A type exists when its conventional source file does:
/// `App::Modules::Billing::Services::Ledger` -> `{base}/Billing/Services/Ledger.{ext}`,
/// `App::Services::Mailer` -> `{app}/Services/Mailer.{ext}`.
#[derive(Debug, Clone)]
pub struct SourceIndex {
    paths: PathResolver,
    extension: String,
}

impl SourceIndex {
    pub fn new(paths: PathResolver, extension: impl Into<String>) -> Self {
        Self { paths, extension: extension.into() }
    }

    /// Source file an identifier maps to, or `None` outside the root namespace.
    #[must_use]
    pub fn source_path(&self, identifier: &str) -> Option<PathBuf> {
        let rest = identifier
            .strip_prefix(self.paths.names().root_namespace().as_str())?
            .strip_prefix(NAMESPACE_SEPARATOR)?;

        let mut segments = rest.split(NAMESPACE_SEPARATOR).peekable();
        let mut path = if segments.peek() == Some(&MODULES_SEGMENT) {
            segments.next();
            self.paths.base_path().to_path_buf()
        } else {
            self.paths.app_path().to_path_buf()
        };
        path.extend(segments);
        path.set_extension(&self.extension);
        Some(path)
    }
}

impl TypeIndex for SourceIndex {
    fn type_exists(&self, identifier: &str) -> bool {
        self.source_path(identifier).is_some_and(|path| path.is_file())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use modkit::domain::config::ModulesConfig;
    use std::fs;
    use std::path::Path;

    fn index(root: &Path) -> SourceIndex {
        let config = ModulesConfig {
            base_path: root.join("Modules"),
            app_path: root.to_path_buf(),
            ..ModulesConfig::default()
        };
        SourceIndex::new(PathResolver::from_config(&config), "rs")
    }

    #[test]
    fn maps_module_and_app_identifiers() {
        let index = index(Path::new("/srv/app"));
        assert_eq!(
            index.source_path("App::Modules::Billing::Services::Ledger"),
            Some(PathBuf::from("/srv/app/Modules/Billing/Services/Ledger.rs"))
        );
        assert_eq!(index.source_path("App::Services::Mailer"), Some(PathBuf::from("/srv/app/Services/Mailer.rs")));
        assert_eq!(index.source_path("Vendor::Services::Mailer"), None);
        assert_eq!(index.source_path("Application::Mailer"), None);
    }

    #[test]
    fn existence_follows_the_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let index = index(dir.path());
        assert!(!index.type_exists("App::Modules::Billing::Providers::BillingServiceProvider"));

        fs::create_dir_all(dir.path().join("Modules/Billing/Providers")).expect("mkdir");
        fs::write(dir.path().join("Modules/Billing/Providers/BillingServiceProvider.rs"), "").expect("write");
        assert!(index.type_exists("App::Modules::Billing::Providers::BillingServiceProvider"));
    }
}
