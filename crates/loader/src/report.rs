use modkit_domain::artifact::{ArtifactKind, DiscoveredArtifact, Target};
use modkit_domain::kinds::KindSet;
use modkit_domain::module::Identifier;
use modkit_domain::outcome::{LoadState, OutcomeStatus, RegistrationOutcome};
use modkit_kernel::RegistryError;

/// Everything that happened to one declared module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleReport {
    pub module: String,
    pub state: LoadState,
    pub outcomes: Vec<RegistrationOutcome>,
    /// Reason the module was aborted, if it was.
    pub fatal: Option<String>,
    /// Kinds with at least one registered artifact.
    pub populated: KindSet,
}

impl ModuleReport {
    #[must_use]
    pub fn new(module: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            state: LoadState::Pending,
            outcomes: Vec::new(),
            fatal: None,
            populated: KindSet::empty(),
        }
    }

    pub(crate) fn record(&mut self, outcome: RegistrationOutcome) {
        if outcome.status == OutcomeStatus::Registered {
            self.populated |= KindSet::from(outcome.kind);
        }
        self.outcomes.push(outcome);
    }

    pub(crate) fn abort(&mut self, reason: String) {
        self.fatal = Some(reason);
        self.state = LoadState::Aborted;
    }

    /// The provider artifact this module registered as `provider`, if any.
    #[must_use]
    pub fn registered_provider(&self, provider: &Identifier) -> Option<&DiscoveredArtifact> {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.status == OutcomeStatus::Registered)
            .filter_map(|outcome| outcome.artifact.as_ref())
            .find(|artifact| artifact.target == Target::Provider && artifact.identifier == *provider)
    }

    /// Records that `provider`, registered by this module, failed to boot. Fatal to the module.
    pub fn boot_failed(&mut self, provider: &Identifier, error: &RegistryError) {
        let artifact = self.registered_provider(provider).cloned();
        let kind = artifact.as_ref().map_or(ArtifactKind::Provider, |artifact| artifact.kind);
        self.record(RegistrationOutcome::failed(kind, artifact, error.class(), error.to_string()));
        self.abort(format!("boot: {error}"));
    }

    #[must_use]
    pub const fn is_aborted(&self) -> bool {
        matches!(self.state, LoadState::Aborted)
    }

    #[must_use]
    pub fn registered_count(&self) -> usize {
        self.outcomes.iter().filter(|outcome| outcome.status == OutcomeStatus::Registered).count()
    }

    pub fn failures(&self) -> impl Iterator<Item = &RegistrationOutcome> {
        self.outcomes.iter().filter(|outcome| outcome.status.is_failure())
    }

    /// Outcomes of a single step.
    pub fn outcomes_of(&self, kind: ArtifactKind) -> impl Iterator<Item = &RegistrationOutcome> {
        self.outcomes.iter().filter(move |outcome| outcome.kind == kind)
    }
}

/// Result of one load pass over every declared module.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub modules: Vec<ModuleReport>,
    /// App-level bindings from the application manifest.
    pub app: Vec<RegistrationOutcome>,
}

impl LoadReport {
    #[must_use]
    pub fn module(&self, name: &str) -> Option<&ModuleReport> {
        self.modules.iter().find(|report| report.module == name)
    }

    #[must_use]
    pub fn registered_count(&self) -> usize {
        self.modules.iter().map(ModuleReport::registered_count).sum::<usize>()
            + self.app.iter().filter(|outcome| outcome.status == OutcomeStatus::Registered).count()
    }

    #[must_use]
    pub fn fatal_count(&self) -> usize {
        self.modules.iter().filter(|report| report.is_aborted()).count()
    }

    /// Charges a provider boot failure to the module that registered the provider.
    ///
    /// Failures of providers no module registered are kept with the app-level outcomes.
    pub fn record_boot_failure(&mut self, provider: &Identifier, error: &RegistryError) {
        match self.modules.iter_mut().find(|module| module.registered_provider(provider).is_some()) {
            Some(module) => module.boot_failed(provider, error),
            None => self.app.push(RegistrationOutcome::failed(
                ArtifactKind::Provider,
                None,
                error.class(),
                format!("{provider}: {error}"),
            )),
        }
    }

    pub fn failures(&self) -> impl Iterator<Item = &RegistrationOutcome> {
        self.modules
            .iter()
            .flat_map(ModuleReport::failures)
            .chain(self.app.iter().filter(|outcome| outcome.status.is_failure()))
    }
}
