//! The orchestrator: walks every declared module through the fixed load sequence.

use crate::discovery::{Discoverer, Discovery};
use crate::error::LoaderError;
use crate::manifest::BindingManifest;
use crate::paths::PathResolver;
use crate::probe::{ArtifactProbe, FsProbe};
use crate::report::{LoadReport, ModuleReport};
use fxhash::FxHashSet;
use modkit_domain::artifact::{ArtifactKind, DiscoveredArtifact, FacadeSource, Target};
use modkit_domain::config::ModulesConfig;
use modkit_domain::module::ModuleDescriptor;
use modkit_domain::outcome::{ErrorClass, LoadState, OutcomeStatus, RegistrationOutcome};
use modkit_kernel::{Binding, Registry, RegistryError, TypeIndex};
use std::fmt;
use tracing::{debug, error, info, instrument, warn};

const APP_ORIGIN: &str = "app";

#[derive(Debug)]
pub struct NoPaths;
#[derive(Debug)]
pub struct WithPaths(PathResolver);

/// Builder for [`ModuleLoader`]. A [`PathResolver`] is required before [`ModuleLoaderBuilder::build`].
pub struct ModuleLoaderBuilder<P = NoPaths> {
    paths: P,
    modules: Vec<String>,
    probe: Box<dyn ArtifactProbe + Send + Sync>,
}

impl ModuleLoaderBuilder<NoPaths> {
    pub fn paths(self, paths: PathResolver) -> ModuleLoaderBuilder<WithPaths> {
        ModuleLoaderBuilder { paths: WithPaths(paths), modules: self.modules, probe: self.probe }
    }
}

impl<P> ModuleLoaderBuilder<P> {
    /// Declared module names, loaded in iteration order.
    #[must_use]
    pub fn modules<I, S>(mut self, modules: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.modules = modules.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn probe(mut self, probe: impl ArtifactProbe + Send + Sync + 'static) -> Self {
        self.probe = Box::new(probe);
        self
    }
}

impl ModuleLoaderBuilder<WithPaths> {
    #[must_use]
    pub fn build(self) -> ModuleLoader {
        ModuleLoader { paths: self.paths.0, modules: self.modules, probe: self.probe }
    }
}

impl<P: fmt::Debug> fmt::Debug for ModuleLoaderBuilder<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleLoaderBuilder")
            .field("paths", &self.paths)
            .field("modules", &self.modules)
            .finish_non_exhaustive()
    }
}

/// Discovery result of one step, for dry runs.
#[derive(Debug)]
pub struct PlannedStep {
    pub kind: ArtifactKind,
    pub discovery: Result<Discovery, LoaderError>,
}

/// What a load pass would register for one module, without touching a registry.
#[derive(Debug)]
pub struct ModulePlan {
    pub module: String,
    pub steps: Vec<PlannedStep>,
    /// Set when the module name itself is rejected.
    pub error: Option<LoaderError>,
}

/// Loads declared modules into a [`Registry`], one module at a time, each through the
/// thirteen steps of [`ArtifactKind::ORDER`].
///
/// Step-level failures are recorded and the module goes on; construction failures
/// abort the rest of the module and the loader moves to the next one.
pub struct ModuleLoader {
    paths: PathResolver,
    modules: Vec<String>,
    probe: Box<dyn ArtifactProbe + Send + Sync>,
}

impl ModuleLoader {
    #[must_use]
    pub fn builder() -> ModuleLoaderBuilder {
        ModuleLoaderBuilder { paths: NoPaths, modules: Vec::new(), probe: Box::new(FsProbe) }
    }

    /// Loader over the real filesystem for the modules declared in `config`.
    #[must_use]
    pub fn from_config(config: &ModulesConfig) -> Self {
        Self::builder()
            .paths(PathResolver::from_config(config))
            .modules(config.modules.iter().cloned())
            .build()
    }

    #[must_use]
    pub const fn paths(&self) -> &PathResolver {
        &self.paths
    }

    #[must_use]
    pub fn modules(&self) -> &[String] {
        &self.modules
    }

    /// Runs every declared module. Duplicate names are loaded once.
    #[instrument(skip_all, fields(modules = self.modules.len()))]
    pub fn load(&self, registry: &dyn Registry) -> LoadReport {
        let mut seen = FxHashSet::default();
        let mut report = LoadReport::default();

        for name in &self.modules {
            if !seen.insert(name.as_str()) {
                warn!(module = %name, "Duplicate module declaration skipped");
                continue;
            }
            report.modules.push(self.load_module(registry, name));
        }

        info!(
            modules = report.modules.len(),
            registered = report.registered_count(),
            aborted = report.fatal_count(),
            "Modules loaded"
        );
        report
    }

    /// Runs a single module through the load sequence.
    #[instrument(skip(self, registry))]
    pub fn load_module(&self, registry: &dyn Registry, name: &str) -> ModuleReport {
        let mut report = ModuleReport::new(name);
        let module = match self.paths.describe(name) {
            Ok(module) => module,
            Err(err) => {
                error!(error = %err, "Module rejected");
                report.abort(err.to_string());
                return report;
            },
        };

        let discoverer = Discoverer::new(&self.paths, self.probe.as_ref(), registry);
        while let Some(kind) = report.state.next_kind() {
            match Self::run_step(registry, &discoverer, &module, kind, &mut report) {
                Ok(()) => report.state = LoadState::after(kind),
                Err(err) => {
                    error!(step = %kind, error = %err, "Module aborted");
                    report.abort(format!("{kind}: {err}"));
                },
            }
        }

        debug!(state = %report.state, registered = report.registered_count(), "Module done");
        report
    }

    fn run_step(
        registry: &dyn Registry,
        discoverer: &Discoverer<'_>,
        module: &ModuleDescriptor,
        kind: ArtifactKind,
        report: &mut ModuleReport,
    ) -> Result<(), RegistryError> {
        let discovery = match discoverer.discover(module, kind) {
            Ok(discovery) => discovery,
            Err(err) => {
                warn!(step = %kind, error = %err, "Discovery failed");
                report.record(RegistrationOutcome::failed(kind, None, err.class(), err.to_string()));
                return Ok(());
            },
        };

        if discovery.is_empty() {
            report.record(RegistrationOutcome::skipped(kind, None, "absent"));
            return Ok(());
        }

        for rejected in discovery.rejected {
            warn!(step = %kind, path = %rejected.path.display(), error = %rejected.error, "Artifact rejected");
            report.record(RegistrationOutcome::failed(
                kind,
                None,
                rejected.error.class(),
                rejected.error.to_string(),
            ));
        }

        for artifact in discovery.artifacts {
            match register(registry, &artifact) {
                Ok(()) => {
                    debug!(step = %kind, identifier = %artifact.identifier, "Registered");
                    report.record(RegistrationOutcome::registered(artifact));
                },
                Err(err) if err.is_fatal() => {
                    report.record(RegistrationOutcome::failed(kind, Some(artifact), err.class(), err.to_string()));
                    return Err(err);
                },
                Err(err) => {
                    warn!(step = %kind, identifier = %artifact.identifier, error = %err, "Registration failed");
                    report.record(RegistrationOutcome::failed(kind, Some(artifact), err.class(), err.to_string()));
                },
            }
        }
        Ok(())
    }

    /// Binds the facades listed in the application manifest (`{app}/Providers/bindings.toml`).
    ///
    /// Entries resolve against app-scoped services unless they carry a fully-qualified identifier.
    #[instrument(skip_all)]
    pub fn bind_app_facades(&self, registry: &dyn Registry) -> Vec<RegistrationOutcome> {
        let path = self.paths.app_manifest_path();
        let manifest = match BindingManifest::load(&path) {
            Ok(manifest) => manifest,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "App manifest unusable");
                return vec![RegistrationOutcome::failed(ArtifactKind::Facade, None, err.class(), err.to_string())];
            },
        };

        manifest
            .facades
            .iter()
            .map(|entry| {
                let service = entry.service_identifier(self.paths.names(), None);
                let status = if registry.type_exists(service.as_str()) {
                    match registry.bind_singleton(&entry.name, Binding::Type(service.clone()), APP_ORIGIN) {
                        Ok(()) => OutcomeStatus::Registered,
                        Err(err) => {
                            warn!(facade = %entry.name, error = %err, "App facade not bound");
                            OutcomeStatus::Failed(err.class())
                        },
                    }
                } else {
                    warn!(facade = %entry.name, %service, "App facade names an undeclared service");
                    OutcomeStatus::Failed(ErrorClass::InvalidManifest)
                };
                RegistrationOutcome {
                    kind: ArtifactKind::Facade,
                    artifact: None,
                    status,
                    reason: Some(format!("{} -> {service}", entry.name)),
                }
            })
            .collect()
    }

    /// Discovery dry run over every declared module.
    pub fn plan(&self, types: &dyn TypeIndex) -> Vec<ModulePlan> {
        let discoverer = Discoverer::new(&self.paths, self.probe.as_ref(), types);
        let mut seen = FxHashSet::default();

        self.modules
            .iter()
            .filter(|name| seen.insert(name.as_str()))
            .map(|name| match self.paths.describe(name) {
                Ok(module) => ModulePlan {
                    module: name.clone(),
                    steps: ArtifactKind::ORDER
                        .into_iter()
                        .map(|kind| PlannedStep { kind, discovery: discoverer.discover(&module, kind) })
                        .collect(),
                    error: None,
                },
                Err(err) => ModulePlan { module: name.clone(), steps: Vec::new(), error: Some(err) },
            })
            .collect()
    }
}

impl fmt::Debug for ModuleLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleLoader")
            .field("paths", &self.paths)
            .field("modules", &self.modules)
            .finish_non_exhaustive()
    }
}

/// Issues the registry call an artifact stands for.
fn register(registry: &dyn Registry, artifact: &DiscoveredArtifact) -> Result<(), RegistryError> {
    match &artifact.target {
        Target::Construct => registry.construct_eager(&artifact.identifier),
        Target::Provider => registry.register_provider(&artifact.identifier),
        Target::Load(category) => registry.load_from(*category, &artifact.path),
        Target::MergeConfig { namespace } => registry.merge_config_from(&artifact.path, namespace),
        Target::Command => registry.register_command(&artifact.identifier),
        Target::Facade { name, source } => {
            let binding = match source {
                FacadeSource::Service(service) => Binding::Type(service.clone()),
                FacadeSource::SelfType => Binding::Type(artifact.identifier.clone()),
            };
            registry.bind_singleton(name, binding, artifact.identifier.as_str())
        },
    }
}
