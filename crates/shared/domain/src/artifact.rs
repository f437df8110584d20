//! Artifact kinds and the static convention table behind them.

use crate::module::{Identifier, ModuleDescriptor};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

/// The fixed categories of component a module may contain.
///
/// Declaration order is load order.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    EnumIter,
    EnumString,
    IntoStaticStr,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    Controller,
    Service,
    Repository,
    Migration,
    Seeder,
    Factory,
    ConsoleCommand,
    Model,
    Transformer,
    Config,
    Route,
    Provider,
    Facade,
}

/// How an artifact kind is laid out on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactShape {
    /// One well-known file.
    SingleFile,
    /// A directory handed over as a whole.
    Directory,
    /// A directory whose files are registered one by one.
    DirectoryOfFiles,
    /// No file lookup; the identifier is derived from the module name.
    Derived,
}

/// Host-side categories that accept a whole directory at once.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumIter, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Migrations,
    Seeders,
    Factories,
    Models,
    Transformers,
    Routes,
}

/// Registry operation an artifact kind feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    ConstructEager,
    RegisterProvider,
    Load(Category),
    MergeConfig,
    RegisterCommands,
    BindSingletons,
}

impl ArtifactKind {
    pub const ORDER: [Self; 13] = [
        Self::Controller,
        Self::Service,
        Self::Repository,
        Self::Migration,
        Self::Seeder,
        Self::Factory,
        Self::ConsoleCommand,
        Self::Model,
        Self::Transformer,
        Self::Config,
        Self::Route,
        Self::Provider,
        Self::Facade,
    ];

    /// Directory segments below the module root. Namespaces mirror them.
    #[must_use]
    pub const fn segments(self) -> &'static [&'static str] {
        match self {
            Self::Controller => &["Http", "Controllers"],
            Self::Service => &["Services"],
            Self::Repository => &["Repositories"],
            Self::Migration => &["Database", "Migrations"],
            Self::Seeder => &["Database", "Seeders"],
            Self::Factory => &["Database", "Factories"],
            Self::ConsoleCommand => &["Console", "Commands"],
            Self::Model => &["Models"],
            Self::Transformer => &["Transformers"],
            Self::Config => &["Config"],
            Self::Route => &["Routes"],
            Self::Provider => &["Providers"],
            Self::Facade => &["Facades"],
        }
    }

    #[must_use]
    pub const fn shape(self) -> ArtifactShape {
        match self {
            Self::Controller | Self::ConsoleCommand | Self::Config | Self::Facade => {
                ArtifactShape::DirectoryOfFiles
            },
            Self::Route => ArtifactShape::SingleFile,
            Self::Provider => ArtifactShape::Derived,
            Self::Service
            | Self::Repository
            | Self::Migration
            | Self::Seeder
            | Self::Factory
            | Self::Model
            | Self::Transformer => ArtifactShape::Directory,
        }
    }

    #[must_use]
    pub const fn operation(self) -> Operation {
        match self {
            Self::Controller => Operation::ConstructEager,
            Self::Service | Self::Repository | Self::Provider => Operation::RegisterProvider,
            Self::Migration => Operation::Load(Category::Migrations),
            Self::Seeder => Operation::Load(Category::Seeders),
            Self::Factory => Operation::Load(Category::Factories),
            Self::Model => Operation::Load(Category::Models),
            Self::Transformer => Operation::Load(Category::Transformers),
            Self::Route => Operation::Load(Category::Routes),
            Self::Config => Operation::MergeConfig,
            Self::ConsoleCommand => Operation::RegisterCommands,
            Self::Facade => Operation::BindSingletons,
        }
    }
}

/// Where a facade binding gets its instance from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FacadeSource {
    /// Lazily constructed from this service type.
    Service(Identifier),
    /// Lazily constructed from the facade's own type.
    SelfType,
}

/// The registry call a discovered artifact turns into.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Target {
    Construct,
    Provider,
    Load(Category),
    MergeConfig { namespace: String },
    Command,
    Facade { name: String, source: FacadeSource },
}

/// One artifact found on disk (or derived from the module name), ready to register.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredArtifact {
    pub module: ModuleDescriptor,
    pub kind: ArtifactKind,
    pub identifier: Identifier,
    pub path: PathBuf,
    pub target: Target,
}
