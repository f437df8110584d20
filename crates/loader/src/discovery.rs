//! Discovery: turns the filesystem layout of one module into typed artifacts.
//!
//! Nothing here touches the registry; [`crate::ModuleLoader`] registers what is found.

use crate::error::LoaderError;
use crate::manifest::BindingManifest;
use crate::naming::ClassNameResolver;
use crate::paths::PathResolver;
use crate::probe::ArtifactProbe;
use modkit_domain::artifact::{
    ArtifactKind, Category, DiscoveredArtifact, FacadeSource, Operation, Target,
};
use modkit_domain::module::{Identifier, ModuleDescriptor};
use modkit_kernel::TypeIndex;
use std::fmt;
use std::path::{Path, PathBuf};

/// A single artifact dropped during discovery; the rest of the step goes on.
#[derive(Debug)]
pub struct Rejected {
    pub path: PathBuf,
    pub error: LoaderError,
}

/// Result of discovering one artifact kind of one module.
#[derive(Debug, Default)]
pub struct Discovery {
    pub artifacts: Vec<DiscoveredArtifact>,
    pub rejected: Vec<Rejected>,
}

impl Discovery {
    fn of(artifacts: Vec<DiscoveredArtifact>) -> Self {
        Self { artifacts, rejected: Vec::new() }
    }

    /// Nothing found and nothing rejected: the category is absent.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty() && self.rejected.is_empty()
    }
}

pub struct Discoverer<'a> {
    paths: &'a PathResolver,
    probe: &'a dyn ArtifactProbe,
    types: &'a dyn TypeIndex,
}

impl<'a> Discoverer<'a> {
    pub fn new(paths: &'a PathResolver, probe: &'a dyn ArtifactProbe, types: &'a dyn TypeIndex) -> Self {
        Self { paths, probe, types }
    }

    fn names(&self) -> &ClassNameResolver {
        self.paths.names()
    }

    /// Discovers every artifact of `kind` in `module`.
    ///
    /// An absent path yields an empty [`Discovery`].
    ///
    /// # Errors
    /// * [`LoaderError::UnreadablePath`] when a path cannot be checked, or a directory exists but
    ///   cannot be listed.
    /// * [`LoaderError::InvalidIdentifier`] when a listed file name is not an identifier token.
    /// * [`LoaderError::Manifest`] when the facade bindings manifest is malformed.
    pub fn discover(&self, module: &ModuleDescriptor, kind: ArtifactKind) -> Result<Discovery, LoaderError> {
        let path = self.paths.resolve(module.name(), kind);
        match kind {
            ArtifactKind::Controller => self.each_file(module, kind, &path, |_| Target::Construct),
            ArtifactKind::ConsoleCommand => self.each_file(module, kind, &path, |_| Target::Command),
            ArtifactKind::Config => self.config_files(module, &path),
            ArtifactKind::Facade => self.facades(module, &path),
            ArtifactKind::Service => {
                self.provider_if_present(module, kind, &path, self.names().services_provider(module))
            },
            ArtifactKind::Repository => self.repositories(module, &path),
            ArtifactKind::Provider => Ok(self.module_provider(module)),
            ArtifactKind::Migration
            | ArtifactKind::Seeder
            | ArtifactKind::Factory
            | ArtifactKind::Model
            | ArtifactKind::Transformer
            | ArtifactKind::Route => self.bulk(module, kind, &path),
        }
    }

    fn artifact(
        module: &ModuleDescriptor,
        kind: ArtifactKind,
        identifier: Identifier,
        path: &Path,
        target: Target,
    ) -> DiscoveredArtifact {
        DiscoveredArtifact { module: module.clone(), kind, identifier, path: path.to_path_buf(), target }
    }

    fn each_file(
        &self,
        module: &ModuleDescriptor,
        kind: ArtifactKind,
        dir: &Path,
        target: impl Fn(&Identifier) -> Target,
    ) -> Result<Discovery, LoaderError> {
        if !self.probe.exists(dir)? {
            return Ok(Discovery::default());
        }
        let mut artifacts = Vec::new();
        for file in self.probe.list_files(dir)? {
            let identifier = self.names().identifier_for(module, kind, &file)?;
            let target = target(&identifier);
            artifacts.push(Self::artifact(module, kind, identifier, &file, target));
        }
        Ok(Discovery::of(artifacts))
    }

    // Config file names are not type names, so they skip token validation.
    fn config_files(&self, module: &ModuleDescriptor, dir: &Path) -> Result<Discovery, LoaderError> {
        if !self.probe.exists(dir)? {
            return Ok(Discovery::default());
        }
        let namespace = self.names().kind_namespace(module, ArtifactKind::Config);
        let artifacts = self
            .probe
            .list_files(dir)?
            .into_iter()
            .map(|file| {
                let stem = file.file_stem().map(|stem| stem.to_string_lossy().into_owned()).unwrap_or_default();
                let target = Target::MergeConfig { namespace: module.name().to_owned() };
                Self::artifact(module, ArtifactKind::Config, namespace.join(&stem), &file, target)
            })
            .collect();
        Ok(Discovery::of(artifacts))
    }

    fn bulk(&self, module: &ModuleDescriptor, kind: ArtifactKind, path: &Path) -> Result<Discovery, LoaderError> {
        let Operation::Load(category) = kind.operation() else {
            return Ok(Discovery::default());
        };
        if !self.probe.exists(path)? {
            return Ok(Discovery::default());
        }
        let identifier = self.names().kind_namespace(module, kind);
        Ok(Discovery::of(vec![Self::artifact(module, kind, identifier, path, Target::Load(category))]))
    }

    fn provider_if_present(
        &self,
        module: &ModuleDescriptor,
        kind: ArtifactKind,
        dir: &Path,
        provider: Identifier,
    ) -> Result<Discovery, LoaderError> {
        if !self.probe.exists(dir)? {
            return Ok(Discovery::default());
        }
        Ok(Discovery::of(vec![Self::artifact(module, kind, provider, dir, Target::Provider)]))
    }

    fn repositories(&self, module: &ModuleDescriptor, dir: &Path) -> Result<Discovery, LoaderError> {
        if !self.probe.exists(dir)? {
            return Ok(Discovery::default());
        }
        let mut artifacts = Vec::with_capacity(2);
        let migrations = self.paths.repository_migrations(module.name());
        if self.probe.exists(&migrations)? {
            let identifier = self.names().kind_namespace(module, ArtifactKind::Repository).join("Migrations");
            artifacts.push(Self::artifact(
                module,
                ArtifactKind::Repository,
                identifier,
                &migrations,
                Target::Load(Category::Migrations),
            ));
        }
        artifacts.push(Self::artifact(
            module,
            ArtifactKind::Repository,
            self.names().repositories_provider(module),
            dir,
            Target::Provider,
        ));
        Ok(Discovery::of(artifacts))
    }

    // Derived from the module name: only registered when the type is declared.
    fn module_provider(&self, module: &ModuleDescriptor) -> Discovery {
        let identifier = self.names().module_provider(module);
        if !self.types.type_exists(identifier.as_str()) {
            return Discovery::default();
        }
        let path = self.paths.resolve(module.name(), ArtifactKind::Provider);
        Discovery::of(vec![Self::artifact(module, ArtifactKind::Provider, identifier, &path, Target::Provider)])
    }

    fn facades(&self, module: &ModuleDescriptor, dir: &Path) -> Result<Discovery, LoaderError> {
        if !self.probe.exists(dir)? {
            return Ok(Discovery::default());
        }
        let manifest = BindingManifest::load(&self.paths.manifest_path(module.name()))?;

        let mut discovery = Discovery::default();
        for file in self.probe.list_files(dir)? {
            let identifier = self.names().identifier_for(module, ArtifactKind::Facade, &file)?;
            let name = identifier.name().to_owned();
            match self.facade_source(module, &manifest, &name) {
                Ok(source) => discovery.artifacts.push(Self::artifact(
                    module,
                    ArtifactKind::Facade,
                    identifier,
                    &file,
                    Target::Facade { name, source },
                )),
                Err(error) => discovery.rejected.push(Rejected { path: file, error }),
            }
        }
        Ok(discovery)
    }

    /// Manifest entry, then `{F}Service` beside the facade, then the facade itself.
    fn facade_source(
        &self,
        module: &ModuleDescriptor,
        manifest: &BindingManifest,
        facade: &str,
    ) -> Result<FacadeSource, LoaderError> {
        if let Some(entry) = manifest.get(facade) {
            let service = entry.service_identifier(self.names(), Some(module));
            if !self.types.type_exists(service.as_str()) {
                return Err(LoaderError::InvalidBinding {
                    facade: facade.to_owned(),
                    message: format!("service {service} is not a declared type").into(),
                    context: None,
                });
            }
            return Ok(FacadeSource::Service(service));
        }

        let service = self.names().facade_service(module, facade);
        if self.types.type_exists(service.as_str()) {
            Ok(FacadeSource::Service(service))
        } else {
            Ok(FacadeSource::SelfType)
        }
    }
}

impl fmt::Debug for Discoverer<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Discoverer").field("paths", self.paths).finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::FsProbe;
    use fxhash::FxHashSet;
    use modkit_domain::config::ModulesConfig;
    use std::fs;

    struct Fixture {
        _dir: tempfile::TempDir,
        paths: PathResolver,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = tempfile::tempdir().expect("tempdir");
            let config = ModulesConfig {
                base_path: dir.path().join("Modules"),
                app_path: dir.path().to_path_buf(),
                ..ModulesConfig::default()
            };
            Self { paths: PathResolver::from_config(&config), _dir: dir }
        }

        fn touch(&self, relative: &str) {
            let path = self.paths.base_path().join(relative);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).expect("mkdir");
            }
            fs::write(path, "").expect("write");
        }

        fn mkdir(&self, relative: &str) {
            fs::create_dir_all(self.paths.base_path().join(relative)).expect("mkdir");
        }
    }

    fn types(ids: &[&str]) -> FxHashSet<Identifier> {
        ids.iter().map(|id| Identifier::from(*id)).collect()
    }

    #[test]
    fn absent_categories_discover_nothing() {
        let fixture = Fixture::new();
        fixture.mkdir("Empty");
        let module = fixture.paths.describe("Empty").expect("module");
        let types = types(&[]);
        let discoverer = Discoverer::new(&fixture.paths, &FsProbe, &types);

        for kind in ArtifactKind::ORDER {
            assert!(discoverer.discover(&module, kind).expect("discover").is_empty(), "{kind}");
        }
    }

    #[test]
    fn controllers_are_listed_in_name_order() {
        let fixture = Fixture::new();
        fixture.touch("Billing/Http/Controllers/ReceiptController.rs");
        fixture.touch("Billing/Http/Controllers/InvoiceController.rs");
        let module = fixture.paths.describe("Billing").expect("module");
        let types = types(&[]);

        let found = Discoverer::new(&fixture.paths, &FsProbe, &types)
            .discover(&module, ArtifactKind::Controller)
            .expect("discover");
        let ids: Vec<_> = found.artifacts.iter().map(|a| a.identifier.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "App::Modules::Billing::Http::Controllers::InvoiceController",
                "App::Modules::Billing::Http::Controllers::ReceiptController",
            ]
        );
        assert!(found.artifacts.iter().all(|a| a.target == Target::Construct));
    }

    #[test]
    fn invalid_file_name_fails_the_step() {
        let fixture = Fixture::new();
        fixture.touch("Billing/Console/Commands/send-invoices.rs");
        let module = fixture.paths.describe("Billing").expect("module");
        let types = types(&[]);

        let err = Discoverer::new(&fixture.paths, &FsProbe, &types)
            .discover(&module, ArtifactKind::ConsoleCommand)
            .expect_err("invalid identifier");
        assert!(matches!(err, LoaderError::InvalidIdentifier { .. }));
    }

    #[test]
    fn repositories_register_nested_migrations_first() {
        let fixture = Fixture::new();
        fixture.mkdir("Billing/Repositories/Migrations");
        let module = fixture.paths.describe("Billing").expect("module");
        let types = types(&[]);

        let found = Discoverer::new(&fixture.paths, &FsProbe, &types)
            .discover(&module, ArtifactKind::Repository)
            .expect("discover");
        let targets: Vec<_> = found.artifacts.iter().map(|a| a.target.clone()).collect();
        assert_eq!(targets, vec![Target::Load(Category::Migrations), Target::Provider]);
        assert_eq!(
            found.artifacts[1].identifier.as_str(),
            "App::Modules::Billing::Providers::RepositoryProviders"
        );
    }

    #[test]
    fn module_provider_requires_a_declared_type() {
        let fixture = Fixture::new();
        fixture.mkdir("Billing");
        let module = fixture.paths.describe("Billing").expect("module");

        let none = types(&[]);
        let absent = Discoverer::new(&fixture.paths, &FsProbe, &none)
            .discover(&module, ArtifactKind::Provider)
            .expect("discover");
        assert!(absent.is_empty());

        let declared = types(&["App::Modules::Billing::Providers::BillingServiceProvider"]);
        let present = Discoverer::new(&fixture.paths, &FsProbe, &declared)
            .discover(&module, ArtifactKind::Provider)
            .expect("discover");
        assert_eq!(present.artifacts.len(), 1);
    }

    #[test]
    fn facade_sources_follow_lookup_order() {
        let fixture = Fixture::new();
        fixture.touch("Billing/Facades/Invoice.rs");
        fixture.touch("Billing/Facades/Ledger.rs");
        fixture.touch("Billing/Facades/Receipt.rs");
        fs::create_dir_all(fixture.paths.base_path().join("Billing/Providers")).expect("mkdir");
        fs::write(
            fixture.paths.manifest_path("Billing"),
            "[[facade]]\nname = \"Ledger\"\nservice = \"LedgerService\"\n\n[[facade]]\nname = \"Receipt\"\nservice = \"Missing\"\n",
        )
        .expect("manifest");
        let module = fixture.paths.describe("Billing").expect("module");
        let types = types(&[
            "App::Modules::Billing::Facades::InvoiceService",
            "App::Modules::Billing::Services::LedgerService",
        ]);

        let found = Discoverer::new(&fixture.paths, &FsProbe, &types)
            .discover(&module, ArtifactKind::Facade)
            .expect("discover");

        let sources: Vec<_> = found
            .artifacts
            .iter()
            .map(|a| match &a.target {
                Target::Facade { name, source } => (name.as_str(), source.clone()),
                other => panic!("unexpected target {other:?}"),
            })
            .collect();
        assert_eq!(
            sources,
            vec![
                ("Invoice", FacadeSource::Service("App::Modules::Billing::Facades::InvoiceService".into())),
                ("Ledger", FacadeSource::Service("App::Modules::Billing::Services::LedgerService".into())),
            ]
        );
        assert_eq!(found.rejected.len(), 1);
        assert!(matches!(found.rejected[0].error, LoaderError::InvalidBinding { ref facade, .. } if facade == "Receipt"));
    }

    #[test]
    fn facade_without_service_binds_itself() {
        let fixture = Fixture::new();
        fixture.touch("Billing/Facades/Invoice.rs");
        let module = fixture.paths.describe("Billing").expect("module");
        let types = types(&[]);

        let found = Discoverer::new(&fixture.paths, &FsProbe, &types)
            .discover(&module, ArtifactKind::Facade)
            .expect("discover");
        assert_eq!(
            found.artifacts[0].target,
            Target::Facade { name: "Invoice".to_owned(), source: FacadeSource::SelfType }
        );
    }

    #[test]
    fn malformed_manifest_fails_the_facade_step() {
        let fixture = Fixture::new();
        fixture.touch("Billing/Facades/Invoice.rs");
        fixture.touch("Billing/Providers/bindings.toml");
        fs::write(fixture.paths.manifest_path("Billing"), "[[facade]\n").expect("manifest");
        let module = fixture.paths.describe("Billing").expect("module");
        let types = types(&[]);

        let err = Discoverer::new(&fixture.paths, &FsProbe, &types)
            .discover(&module, ArtifactKind::Facade)
            .expect_err("malformed manifest");
        assert!(matches!(err, LoaderError::Manifest { .. }));
    }

    #[test]
    fn configs_merge_into_module_namespace() {
        let fixture = Fixture::new();
        fixture.touch("Billing/Config/billing-settings.toml");
        let module = fixture.paths.describe("Billing").expect("module");
        let types = types(&[]);

        let found = Discoverer::new(&fixture.paths, &FsProbe, &types)
            .discover(&module, ArtifactKind::Config)
            .expect("discover");
        assert_eq!(found.artifacts.len(), 1);
        assert_eq!(found.artifacts[0].target, Target::MergeConfig { namespace: "Billing".to_owned() });
    }
}
