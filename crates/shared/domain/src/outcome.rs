//! Per-step results and the module load state machine.

use crate::artifact::{ArtifactKind, DiscoveredArtifact};
use serde::Serialize;
use std::fmt;
use strum_macros::{Display, IntoStaticStr};

/// Failure classes a load step can end in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr, Serialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ErrorClass {
    UnreadablePath,
    InvalidIdentifier,
    RegistrationConflict,
    Construction,
    UnresolvableReference,
    InvalidManifest,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    Registered,
    Skipped,
    Failed(ErrorClass),
}

impl OutcomeStatus {
    #[must_use]
    pub const fn is_failure(self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

impl fmt::Display for OutcomeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Registered => f.write_str("registered"),
            Self::Skipped => f.write_str("skipped"),
            Self::Failed(class) => write!(f, "failed ({class})"),
        }
    }
}

/// What happened to one artifact (or to a whole step when nothing was discovered).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationOutcome {
    pub kind: ArtifactKind,
    pub artifact: Option<DiscoveredArtifact>,
    pub status: OutcomeStatus,
    pub reason: Option<String>,
}

impl RegistrationOutcome {
    #[must_use]
    pub fn registered(artifact: DiscoveredArtifact) -> Self {
        Self { kind: artifact.kind, artifact: Some(artifact), status: OutcomeStatus::Registered, reason: None }
    }

    #[must_use]
    pub fn skipped(kind: ArtifactKind, artifact: Option<DiscoveredArtifact>, reason: impl Into<String>) -> Self {
        Self { kind, artifact, status: OutcomeStatus::Skipped, reason: Some(reason.into()) }
    }

    #[must_use]
    pub fn failed(
        kind: ArtifactKind,
        artifact: Option<DiscoveredArtifact>,
        class: ErrorClass,
        reason: impl Into<String>,
    ) -> Self {
        Self { kind, artifact, status: OutcomeStatus::Failed(class), reason: Some(reason.into()) }
    }
}

/// Progress of one module through the load sequence.
///
/// Each state names the last completed step. `Aborted` is terminal; it is reached
/// from a state before `FacadesLoaded`, or after loading when one of the module's
/// providers fails to boot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum LoadState {
    Pending,
    ControllersLoaded,
    ServicesLoaded,
    RepositoriesLoaded,
    MigrationsLoaded,
    SeedersLoaded,
    FactoriesLoaded,
    CommandsLoaded,
    ModelsLoaded,
    TransformersLoaded,
    ConfigsLoaded,
    RoutesLoaded,
    ProvidersLoaded,
    FacadesLoaded,
    Aborted,
}

impl LoadState {
    /// State reached once the step for `kind` completes.
    #[must_use]
    pub const fn after(kind: ArtifactKind) -> Self {
        match kind {
            ArtifactKind::Controller => Self::ControllersLoaded,
            ArtifactKind::Service => Self::ServicesLoaded,
            ArtifactKind::Repository => Self::RepositoriesLoaded,
            ArtifactKind::Migration => Self::MigrationsLoaded,
            ArtifactKind::Seeder => Self::SeedersLoaded,
            ArtifactKind::Factory => Self::FactoriesLoaded,
            ArtifactKind::ConsoleCommand => Self::CommandsLoaded,
            ArtifactKind::Model => Self::ModelsLoaded,
            ArtifactKind::Transformer => Self::TransformersLoaded,
            ArtifactKind::Config => Self::ConfigsLoaded,
            ArtifactKind::Route => Self::RoutesLoaded,
            ArtifactKind::Provider => Self::ProvidersLoaded,
            ArtifactKind::Facade => Self::FacadesLoaded,
        }
    }

    /// Kind of the step that runs next, or `None` in a terminal state.
    #[must_use]
    pub const fn next_kind(self) -> Option<ArtifactKind> {
        match self {
            Self::Pending => Some(ArtifactKind::Controller),
            Self::ControllersLoaded => Some(ArtifactKind::Service),
            Self::ServicesLoaded => Some(ArtifactKind::Repository),
            Self::RepositoriesLoaded => Some(ArtifactKind::Migration),
            Self::MigrationsLoaded => Some(ArtifactKind::Seeder),
            Self::SeedersLoaded => Some(ArtifactKind::Factory),
            Self::FactoriesLoaded => Some(ArtifactKind::ConsoleCommand),
            Self::CommandsLoaded => Some(ArtifactKind::Model),
            Self::ModelsLoaded => Some(ArtifactKind::Transformer),
            Self::TransformersLoaded => Some(ArtifactKind::Config),
            Self::ConfigsLoaded => Some(ArtifactKind::Route),
            Self::RoutesLoaded => Some(ArtifactKind::Provider),
            Self::ProvidersLoaded => Some(ArtifactKind::Facade),
            Self::FacadesLoaded | Self::Aborted => None,
        }
    }

    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::FacadesLoaded | Self::Aborted)
    }
}
